//! Bit-packed 8-byte File header.
//!
//! Layout (little-endian):
//!
//! ```text
//! byte 0     bit 0 packed | bits 1-4 slot id | bits 5-7 file type
//! byte 1     bits 4-7 size remainder / 4 | bits 0-3 unknown
//! bytes 2-3  size in 64-byte chunks
//! bytes 4-7  load address
//! ```
//!
//! The remainder is written as `remainder << 2` OR'd with `unknown` and
//! without masking, so a remainder that is not a multiple of 4 bleeds into
//! the low nibble. Decoding only looks at the high nibble. Images rely on
//! this exact behaviour, so it is kept as is.

use seag_buffers::{BufferError, Reader, Writer};

use crate::RomError;

/// Encoded size of a File header.
pub const FILE_HEADER_LEN: usize = 8;

/// Unit of the chunked payload length.
pub const CHUNK_SIZE: usize = 0x40;

/// Load address that marks a range as not holding a File sequence.
pub const INVALID_LOAD_ADDRESS: u32 = 0xffff_ffff;

/// Decoded fields of a File header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileHeader {
    pub packed: bool,
    /// 4-bit slot id; 0 terminates a directory.
    pub slot_id: u8,
    /// 3-bit file type.
    pub file_type: u8,
    /// Opaque low nibble of byte 1.
    pub unknown: u8,
    /// Payload length in bytes.
    pub size: u32,
    pub load_address: u32,
}

impl FileHeader {
    /// Reads a header at the reader's cursor.
    pub fn read(reader: &mut Reader<'_>) -> Result<Self, BufferError> {
        let [file_info, size_and_unknown] = reader.array()?;
        let size_chunks = reader.u16()?;
        let load_address = reader.u32()?;

        let size_bytes = u32::from((size_and_unknown & 0xf0) >> 2);

        Ok(Self {
            packed: file_info & 1 == 1,
            slot_id: (file_info >> 1) & 0x0f,
            file_type: file_info >> 5,
            unknown: size_and_unknown & 0x0f,
            size: u32::from(size_chunks) * CHUNK_SIZE as u32 + size_bytes,
            load_address,
        })
    }

    /// Decodes the first 8 bytes of `data`.
    ///
    /// # Example
    ///
    /// ```
    /// use seag_rom::FileHeader;
    ///
    /// let header = FileHeader::decode(&[0x23, 0x45, 0x02, 0x00, 0x00, 0x10, 0x00, 0x00]).unwrap();
    /// assert!(header.packed);
    /// assert_eq!(header.slot_id, 1);
    /// assert_eq!(header.file_type, 1);
    /// assert_eq!(header.unknown, 5);
    /// assert_eq!(header.size, 2 * 64 + 16);
    /// assert_eq!(header.load_address, 0x1000);
    /// ```
    pub fn decode(data: &[u8]) -> Result<Self, RomError> {
        Self::decode_at(data, 0)
    }

    pub(crate) fn decode_at(data: &[u8], base: usize) -> Result<Self, RomError> {
        if data.len() < FILE_HEADER_LEN {
            return Err(RomError::MalformedHeader {
                what: "file header",
                offset: base,
                needed: FILE_HEADER_LEN,
                available: data.len(),
            });
        }
        Self::read(&mut Reader::new(data)).map_err(RomError::malformed("file header", base))
    }

    /// Writes the header, deriving chunk count and remainder from `size`.
    ///
    /// `size` beyond `0xffff * 64 + 63` wraps the chunk count.
    pub fn write(&self, writer: &mut Writer) {
        let size = self.size as usize;

        let file_info = u8::from(self.packed) | (self.slot_id << 1) | (self.file_type << 5);

        let size_bytes = (size % CHUNK_SIZE) as u8;
        let size_and_unknown = (size_bytes << 2) | self.unknown;

        writer.u8(file_info);
        writer.u8(size_and_unknown);
        writer.u16((size / CHUNK_SIZE) as u16);
        writer.u32(self.load_address);
    }

    /// Encodes the header into its 8-byte form.
    pub fn encode(&self) -> [u8; FILE_HEADER_LEN] {
        let mut writer = Writer::with_capacity(FILE_HEADER_LEN);
        self.write(&mut writer);
        let mut out = [0u8; FILE_HEADER_LEN];
        out.copy_from_slice(writer.as_slice());
        out
    }

    /// Payload length as a `usize`.
    pub fn payload_len(&self) -> usize {
        self.size as usize
    }
}
