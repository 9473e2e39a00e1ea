//! Little-endian binary reader with cursor tracking.

use crate::BufferError;

/// A bounds-checked binary reader over a byte slice.
///
/// The reader keeps a cursor position and every read checks the remaining
/// length first, so truncated input surfaces as [`BufferError::EndOfBuffer`]
/// rather than a panic. All multi-byte integers are little-endian.
///
/// # Example
///
/// ```
/// use seag_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0302);
/// assert!(reader.u32().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader from a slice with custom start and end positions.
    ///
    /// `end` is clamped to the slice length.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        let end = end.min(uint8.len());
        Self { uint8, x, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Returns `true` when no bytes remain.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn ensure(&self, needed: usize) -> Result<(), BufferError> {
        if self.size() < needed {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.ensure(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..self.x])
    }

    /// Reads a fixed-size array and advances the cursor.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.ensure(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    /// Reads an unsigned 24-bit integer (little-endian) into a `u32`.
    #[inline]
    pub fn u24(&mut self) -> Result<u32, BufferError> {
        let [a, b, c] = self.array()?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_le_bytes(self.array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8().unwrap(), 0x01);
        assert_eq!(reader.u8().unwrap(), 0x02);
        assert_eq!(reader.u8().unwrap(), 0x03);
        assert!(reader.u8().is_err());
    }

    #[test]
    fn test_u16() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u16().unwrap(), 0x0201);
        assert_eq!(reader.u16().unwrap(), 0x0403);
    }

    #[test]
    fn test_u24_zeroes_high_byte() {
        let data = [0x01, 0x02, 0x03, 0xff];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u24().unwrap(), 0x030201);
        assert_eq!(reader.size(), 1);
    }

    #[test]
    fn test_u32() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32().unwrap(), 0x04030201);
    }

    #[test]
    fn test_short_read_reports_position() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        reader.u8().unwrap();
        assert_eq!(
            reader.u32(),
            Err(BufferError::EndOfBuffer {
                offset: 1,
                needed: 4,
                available: 2
            })
        );
        // failed reads leave the cursor alone
        assert_eq!(reader.x, 1);
    }

    #[test]
    fn test_from_slice_window() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = Reader::from_slice(&data, 1, 3);
        assert_eq!(reader.buf(2).unwrap(), &[0x02, 0x03]);
        assert!(reader.is_empty());
    }
}
