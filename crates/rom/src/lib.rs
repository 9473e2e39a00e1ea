//! Decoder and round-trip encoder for nested firmware container images.
//!
//! An image is a tree: containers hold an offset table pointing at their
//! children, directories hold back-to-back files, and everything that does
//! not look like either is kept as an opaque blob. Decoding never loses a
//! byte, so re-encoding an untouched tree reproduces the input exactly.
//! Edited trees get their offset tables rebuilt from the re-encoded children.
//!
//! # Example
//!
//! ```
//! let mut image = vec![0u8; 16];
//! image.extend([0x01, 0x18, 0x00, 0x00, 0x02, 0x1c, 0x00, 0x00]);
//! image.extend([0xaa; 8]);
//!
//! let root = seag_rom::parse(&image).unwrap();
//! assert_eq!(root.serialize(), image);
//! print!("{}", seag_rom::dump_tree(&root));
//! ```

mod classify;
mod container;
mod element;
mod error;
mod file;
mod header;
mod print;
mod table;

pub use classify::{classify, ElementKind};
pub use container::{
    build_root_container, has_disc_signature, Container, Dialect, DISC_SIGNATURE,
    DISC_SIGNATURE_OFFSET,
};
pub use element::{Blob, Element};
pub use error::RomError;
pub use file::{Directory, File};
pub use header::{FileHeader, CHUNK_SIZE, FILE_HEADER_LEN, INVALID_LOAD_ADDRESS};
pub use print::{dump_tree, write_tree};
pub use table::{
    last_present, read_table, rebuild_table, TableEntry, TableFormat, MAX_TABLE_OFFSET,
    TABLE_ENTRY_LEN,
};

/// Id of the blob that holds spare space, and of the entry closing a
/// terminated table.
pub const EXTRA_SPACE_ID: u8 = 0x00;

/// Id given to the synthetic root container.
pub const ROOT_CONTAINER_ID: u8 = 0x1d;

/// Parses a whole image; alias of [`build_root_container`].
pub fn parse(data: &[u8]) -> Result<Element, RomError> {
    build_root_container(data)
}
