//! Guessing what a table entry's byte range holds.
//!
//! The format carries no type tags, so the decision is heuristic: a range is
//! a disc container when it carries the disc signature, a directory when it
//! starts with a plausible File header, and an opaque blob otherwise.

use crate::container::{has_disc_signature, Dialect};
use crate::header::{FileHeader, FILE_HEADER_LEN, INVALID_LOAD_ADDRESS};
use crate::table::TABLE_ENTRY_LEN;

/// Node kind chosen for a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Blob,
    Directory,
    DiscContainer,
}

/// Smallest range that can hold a disc pre-table header and one entry.
const MIN_DISC_CONTAINER_LEN: usize = Dialect::Disc.header_len() + TABLE_ENTRY_LEN;

/// Picks the node kind for `data`.
///
/// # Example
///
/// ```
/// use seag_rom::{classify, ElementKind};
///
/// assert_eq!(classify(&[0u8; 4]), ElementKind::Blob);
/// // slot 1, 16-byte payload at 0x1000
/// let mut file = vec![0x02, 0x40, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00];
/// file.resize(8 + 16, 0);
/// assert_eq!(classify(&file), ElementKind::Directory);
/// ```
pub fn classify(data: &[u8]) -> ElementKind {
    if data.len() > MIN_DISC_CONTAINER_LEN && has_disc_signature(data) {
        return ElementKind::DiscContainer;
    }

    if data.len() < FILE_HEADER_LEN {
        return ElementKind::Blob;
    }

    match FileHeader::decode(data) {
        Ok(header)
            if header.payload_len() <= data.len()
                && header.load_address != INVALID_LOAD_ADDRESS =>
        {
            ElementKind::Directory
        }
        _ => ElementKind::Blob,
    }
}
