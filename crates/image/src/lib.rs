//! Flattens decoded firmware images into ELF32 files.
//!
//! Every File in the tree becomes one loadable segment at its load address.
//! Packed payloads go through an injected [`Codecs`] registry first, and
//! overlapping segments can be folded together on request.
//!
//! # Example
//!
//! ```
//! use seag_image::{rom_to_elf, Codecs, ImageOptions};
//!
//! // old-style container holding one directory with a single 4-byte file
//! let mut image = vec![0u8; 16];
//! image.extend([0x01, 0x18, 0x00, 0x00, 0x00, 0x24, 0x00, 0x00]);
//! image.extend([0x02, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0xde, 0xad, 0xbe, 0xef]);
//!
//! let elf = rom_to_elf(&image, &Codecs::new(), &ImageOptions::default()).unwrap();
//! assert_eq!(&elf[..4], b"\x7fELF");
//! assert_eq!(&elf[elf.len() - 4..], &[0xde, 0xad, 0xbe, 0xef]);
//! ```

mod codecs;
mod elf32;
mod error;
mod overlap;
mod rom2elf;
mod segment;

pub use codecs::{format_magic, CodecError, Codecs, Decode, CPRS_MAGIC, LZMA_MAGIC};
pub use elf32::*;
pub use error::ImageError;
pub use overlap::merge_overlapping;
pub use rom2elf::{build_image, rom_to_elf, segments_from_tree, unpack, ImageOptions};
pub use segment::Segment;
