//! Little-endian binary writer backed by a growable buffer.

/// Writes binary data to an auto-growing buffer.
///
/// All multi-byte integers are written little-endian. [`Writer::flush`]
/// hands out everything written since the last flush.
///
/// # Example
///
/// ```
/// use seag_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0302);
/// writer.u24(0x060504);
/// assert_eq!(writer.flush(), vec![1, 2, 3, 4, 5, 6]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Takes the written bytes, leaving the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes the low 24 bits of `val`; the high byte is dropped.
    #[inline]
    pub fn u24(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes()[..3]);
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes `count` zero bytes.
    pub fn zeros(&mut self, count: usize) {
        self.uint8.resize(self.uint8.len() + count, 0);
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }
}
