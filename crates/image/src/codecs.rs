//! Pluggable decompressors for packed File payloads.
//!
//! A packed payload starts with a 4-byte magic naming its compression. The
//! registry maps magics to decode functions; lookups go in registration
//! order and the first match wins.

use std::error::Error;
use std::fmt;

/// Error returned by a decode function.
pub type CodecError = Box<dyn Error + Send + Sync>;

/// Decode function registered for one magic.
pub type Decode = dyn Fn(&[u8]) -> Result<Vec<u8>, CodecError> + Send + Sync;

/// Magic of CPRS-compressed payloads.
pub const CPRS_MAGIC: [u8; 4] = *b"CPRS";

/// Magic of LZMA-compressed payloads.
pub const LZMA_MAGIC: [u8; 4] = *b"LZMA";

/// Ordered `(magic, decode)` list.
#[derive(Default)]
pub struct Codecs {
    entries: Vec<([u8; 4], Box<Decode>)>,
}

impl Codecs {
    /// An empty registry; every packed payload passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a decoder for `magic`. An earlier registration for the same
    /// magic keeps precedence.
    ///
    /// # Example
    ///
    /// ```
    /// use seag_image::{Codecs, CPRS_MAGIC};
    ///
    /// let codecs = Codecs::new().with(CPRS_MAGIC, |data| Ok(data[4..].to_vec()));
    /// assert!(codecs.get(b"CPRS\x01\x02").is_some());
    /// assert!(codecs.get(b"LZMA").is_none());
    /// ```
    pub fn with<F>(mut self, magic: [u8; 4], decode: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        self.register(magic, decode);
        self
    }

    pub fn register<F>(&mut self, magic: [u8; 4], decode: F)
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        self.entries.push((magic, Box::new(decode)));
    }

    /// Decoder for the magic `payload` starts with.
    pub fn get(&self, payload: &[u8]) -> Option<&Decode> {
        let magic = payload.get(..4)?;
        self.entries
            .iter()
            .find(|(known, _)| known.as_slice() == magic)
            .map(|(_, decode)| decode.as_ref())
    }

}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(magic, _)| format_magic(magic)))
            .finish()
    }
}

/// Renders a magic as text when printable, hex otherwise.
pub fn format_magic(magic: &[u8; 4]) -> String {
    if magic.iter().all(u8::is_ascii_graphic) {
        format!("\"{}\"", magic.iter().map(|&b| b as char).collect::<String>())
    } else {
        format!("0x{:08x}", u32::from_be_bytes(*magic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_wins() {
        let codecs = Codecs::new()
            .with(LZMA_MAGIC, |_| Ok(vec![1]))
            .with(LZMA_MAGIC, |_| Ok(vec![2]));
        let decode = codecs.get(b"LZMA....").unwrap();
        assert_eq!(decode(b"LZMA").unwrap(), vec![1]);
    }

    #[test]
    fn short_payload_has_no_codec() {
        let codecs = Codecs::new().with(CPRS_MAGIC, |data| Ok(data.to_vec()));
        assert!(codecs.get(b"CPR").is_none());
        assert!(codecs.get(b"").is_none());
    }

    #[test]
    fn magic_formatting() {
        assert_eq!(format_magic(&CPRS_MAGIC), "\"CPRS\"");
        assert_eq!(format_magic(&[0xde, 0xad, 0xbe, 0xef]), "0xdeadbeef");
    }
}
