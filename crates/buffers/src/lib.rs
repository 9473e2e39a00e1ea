//! Binary buffer utilities for seag-romtools.
//!
//! Firmware images are little-endian throughout, so both halves of this
//! crate only speak little-endian.
//!
//! # Overview
//!
//! - [`Reader`] - Bounds-checked reads from a byte slice with cursor tracking
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`print_octets`] - Short hex rendering for diagnostics
//!
//! # Example
//!
//! ```
//! use seag_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x1d);
//! writer.u24(0x000040);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x1d);
//! assert_eq!(reader.u24().unwrap(), 0x40);
//! ```

mod print_octets;
mod reader;
mod writer;

pub use print_octets::print_octets;
pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer at offset {offset}: needed {needed} bytes, {available} available")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
}
