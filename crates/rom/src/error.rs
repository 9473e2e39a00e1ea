//! Decode error type.

use seag_buffers::BufferError;
use thiserror::Error;

use crate::Dialect;

/// Error type for decoding a firmware image.
///
/// Offsets are absolute, counted from the start of the buffer handed to the
/// top-level parse call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RomError {
    #[error("malformed {what} at offset {offset:#x}: needed {needed} bytes, {available} available")]
    MalformedHeader {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("{dialect} at offset {offset:#x} {}, found {found}", .dialect.signature_rule())]
    SignatureMismatch {
        offset: usize,
        dialect: Dialect,
        found: String,
    },
    #[error("inconsistent offset table at offset {offset:#x}: {reason}")]
    InconsistentTable { offset: usize, reason: String },
}

impl RomError {
    /// Maps a short read inside a structure that starts at `base`.
    pub(crate) fn malformed(what: &'static str, base: usize) -> impl FnOnce(BufferError) -> Self {
        move |err| {
            let BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } = err;
            RomError::MalformedHeader {
                what,
                offset: base + offset,
                needed,
                available,
            }
        }
    }

    pub(crate) fn table(offset: usize, reason: impl Into<String>) -> Self {
        RomError::InconsistentTable {
            offset,
            reason: reason.into(),
        }
    }

    /// Absolute byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            RomError::MalformedHeader { offset, .. }
            | RomError::SignatureMismatch { offset, .. }
            | RomError::InconsistentTable { offset, .. } => *offset,
        }
    }
}
