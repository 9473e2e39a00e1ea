//! Image builder error type.

use seag_rom::RomError;
use thiserror::Error;

use crate::codecs::{format_magic, CodecError};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image: {0}")]
    Rom(#[from] RomError),
    #[error("{} decompression failed for file loading at {load_address:#010x}: {source}", format_magic(.magic))]
    Decompress {
        magic: [u8; 4],
        load_address: u32,
        #[source]
        source: CodecError,
    },
    #[error("segment at {address:#010x} ({len} bytes) ends past the 4 GiB limit of a 32-bit image")]
    SegmentTooLarge { address: u32, len: usize },
}
