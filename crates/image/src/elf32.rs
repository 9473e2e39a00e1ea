//! Minimal ELF32 writer: one `PT_LOAD` program header per segment, a single
//! null section header and the raw segment bytes.
//!
//! ```text
//! 0x00                       ELF header (0x34)
//! 0x34                       n program headers (0x20 each)
//! 0x34 + 0x20n               null section header (0x28)
//! 0x34 + 0x20n + 0x28        segment data, in order
//! ```

use seag_buffers::Writer;

use crate::{ImageError, Segment};

pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
pub const ELFCLASS32: u8 = 1;
pub const ELFDATA2LSB: u8 = 1;
pub const EV_CURRENT: u8 = 1;
pub const ELFOSABI_SYSV: u8 = 0;

pub const ET_EXEC: u16 = 2;
pub const EM_ARM: u16 = 0x28;

pub const PT_LOAD: u32 = 1;
pub const PF_X: u32 = 1;
pub const PF_W: u32 = 2;
pub const PF_R: u32 = 4;

pub const SHT_NULL: u32 = 0;

pub const ELF_HEADER_LEN: usize = 0x34;
pub const PROGRAM_HEADER_LEN: usize = 0x20;
pub const SECTION_HEADER_LEN: usize = 0x28;

/// Segments to be written as an executable ARM image with entry point 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elf32Image {
    pub segments: Vec<Segment>,
}

impl Elf32Image {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    fn section_header_offset(&self) -> usize {
        ELF_HEADER_LEN + PROGRAM_HEADER_LEN * self.segments.len()
    }

    /// File offset of the first segment's bytes.
    pub fn data_offset(&self) -> usize {
        self.section_header_offset() + SECTION_HEADER_LEN
    }

    /// Total size of [`Elf32Image::to_bytes`].
    pub fn file_len(&self) -> usize {
        self.data_offset() + self.segments.iter().map(Segment::len).sum::<usize>()
    }

    /// Serializes the image.
    ///
    /// Fails only when a segment would end past the 32-bit file offset
    /// range.
    ///
    /// # Example
    ///
    /// ```
    /// use seag_image::{Elf32Image, Segment};
    ///
    /// let image = Elf32Image::new(vec![
    ///     Segment::new(0x0, vec![0x01, 0x02]),
    ///     Segment::new(0x1000, vec![0x03, 0x04]),
    /// ]);
    /// let bytes = image.to_bytes().unwrap();
    /// assert_eq!(&bytes[..4], b"\x7fELF");
    /// assert_eq!(&bytes[0x34 + 0x40 + 0x28..], &[0x01, 0x02, 0x03, 0x04]);
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageError> {
        let phnum = u16::try_from(self.segments.len()).map_err(|_| self.too_large(0))?;
        let shoff = self.offset_u32(self.section_header_offset(), 0)?;
        let mut writer = Writer::with_capacity(self.file_len());

        writer.buf(&ELF_MAGIC);
        writer.buf(&[ELFCLASS32, ELFDATA2LSB, EV_CURRENT, ELFOSABI_SYSV]);
        writer.zeros(8);
        writer.u16(ET_EXEC);
        writer.u16(EM_ARM);
        writer.u32(u32::from(EV_CURRENT));
        writer.u32(0); // e_entry
        writer.u32(ELF_HEADER_LEN as u32);
        writer.u32(shoff);
        writer.u32(0); // e_flags
        writer.u16(ELF_HEADER_LEN as u16);
        writer.u16(PROGRAM_HEADER_LEN as u16);
        writer.u16(phnum);
        writer.u16(SECTION_HEADER_LEN as u16);
        writer.u16(1); // e_shnum
        writer.u16(0); // e_shstrndx

        let mut offset = self.data_offset();
        for (i, segment) in self.segments.iter().enumerate() {
            let start = self.offset_u32(offset, i)?;
            let len = self.offset_u32(segment.len(), i)?;
            self.offset_u32(offset + segment.len(), i)?;

            writer.u32(PT_LOAD);
            writer.u32(start);
            writer.u32(segment.address);
            writer.u32(0); // p_paddr
            writer.u32(len);
            writer.u32(len);
            writer.u32(PF_R | PF_W | PF_X);
            writer.u32(0); // p_align
            offset += segment.len();
        }

        writer.u32(0); // sh_name
        writer.u32(SHT_NULL);
        writer.zeros(SECTION_HEADER_LEN - 8);

        for segment in &self.segments {
            writer.buf(&segment.data);
        }
        Ok(writer.flush())
    }

    fn offset_u32(&self, value: usize, index: usize) -> Result<u32, ImageError> {
        u32::try_from(value).map_err(|_| self.too_large(index))
    }

    fn too_large(&self, index: usize) -> ImageError {
        let segment = self.segments.get(index);
        ImageError::SegmentTooLarge {
            address: segment.map_or(0, |s| s.address),
            len: segment.map_or(0, Segment::len),
        }
    }
}
