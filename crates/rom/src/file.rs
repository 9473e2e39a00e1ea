//! Files and the table-less directories that hold them.

use log::{debug, trace};
use seag_buffers::Writer;

use crate::header::{FileHeader, FILE_HEADER_LEN};
use crate::{Blob, Element, RomError, EXTRA_SPACE_ID};

/// One loadable firmware segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub packed: bool,
    /// 4-bit slot id; 0 ends a directory.
    pub slot_id: u8,
    pub file_type: u8,
    /// Opaque header nibble, written back untouched.
    pub unknown: u8,
    pub load_address: u32,
    pub payload: Vec<u8>,
}

impl File {
    /// Parses a File from the start of `data`; trailing bytes are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        Self::parse_at(data, 0)
    }

    pub(crate) fn parse_at(data: &[u8], base: usize) -> Result<Self, RomError> {
        let header = FileHeader::decode_at(data, base)?;
        let size = header.payload_len();
        let available = data.len() - FILE_HEADER_LEN;
        if size > available {
            return Err(RomError::MalformedHeader {
                what: "file payload",
                offset: base + FILE_HEADER_LEN,
                needed: size,
                available,
            });
        }

        Ok(Self {
            packed: header.packed,
            slot_id: header.slot_id,
            file_type: header.file_type,
            unknown: header.unknown,
            load_address: header.load_address,
            payload: data[FILE_HEADER_LEN..FILE_HEADER_LEN + size].to_vec(),
        })
    }

    /// Header for the current payload.
    pub fn header(&self) -> FileHeader {
        FileHeader {
            packed: self.packed,
            slot_id: self.slot_id,
            file_type: self.file_type,
            unknown: self.unknown,
            size: self.payload.len() as u32,
            load_address: self.load_address,
        }
    }

    /// Slot id 0 closes the enclosing directory.
    pub fn is_terminator(&self) -> bool {
        self.slot_id == 0
    }

    pub fn write_to(&self, writer: &mut Writer) {
        self.header().write(writer);
        writer.buf(&self.payload);
    }

    pub fn serialized_len(&self) -> usize {
        FILE_HEADER_LEN + self.payload.len()
    }
}

/// Back-to-back Files with no table in front of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub id: u8,
    /// Files, optionally followed by one spare-space [`Blob`].
    pub children: Vec<Element>,
}

impl Directory {
    /// Walks File headers until a terminator File, until no full header is
    /// left, or until a header declares more payload than remains. What is
    /// left becomes a spare-space blob with id 0.
    pub fn parse(id: u8, data: &[u8]) -> Result<Self, RomError> {
        Self::parse_at(id, data, 0)
    }

    pub(crate) fn parse_at(id: u8, data: &[u8], base: usize) -> Result<Self, RomError> {
        let mut children = Vec::new();
        let mut offset = 0;

        while data.len() - offset >= FILE_HEADER_LEN {
            let rest = &data[offset..];
            let header = FileHeader::decode_at(rest, base + offset)?;
            if header.payload_len() > rest.len() - FILE_HEADER_LEN {
                debug!(
                    "directory {id:#04x}: header at {:#x} wants {} bytes, {} left",
                    base + offset,
                    header.payload_len(),
                    rest.len() - FILE_HEADER_LEN
                );
                break;
            }
            let file = File::parse_at(rest, base + offset)?;
            trace!(
                "file slot {} type {} at {:#x}: {} bytes for {:#010x}{}",
                file.slot_id,
                file.file_type,
                base + offset,
                file.payload.len(),
                file.load_address,
                if file.packed { " (packed)" } else { "" }
            );
            offset += file.serialized_len();
            let terminator = file.is_terminator();
            children.push(Element::File(file));
            if terminator {
                break;
            }
        }

        if offset != data.len() {
            trace!(
                "directory {id:#04x}: {} bytes of spare space at {:#x}",
                data.len() - offset,
                base + offset
            );
            children.push(Blob::new(EXTRA_SPACE_ID, &data[offset..]).into());
        }

        Ok(Self { id, children })
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.children.iter().filter_map(|child| match child {
            Element::File(file) => Some(file),
            _ => None,
        })
    }
}
