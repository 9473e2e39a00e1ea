//! From a raw firmware image to an ELF32 file.

use log::{debug, info, warn};
use seag_rom::{Element, File};

use crate::{format_magic, merge_overlapping, Codecs, Elf32Image, ImageError, Segment};

/// Knobs for [`rom_to_elf`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageOptions {
    /// Fold overlapping segments together before writing them out.
    pub merge_overlaps: bool,
}

impl ImageOptions {
    pub fn merge_overlaps(mut self, merge_overlaps: bool) -> Self {
        self.merge_overlaps = merge_overlaps;
        self
    }
}

/// Decodes `data`, collects its Files level by level and writes them out
/// as an ELF32 image.
pub fn rom_to_elf(
    data: &[u8],
    codecs: &Codecs,
    options: &ImageOptions,
) -> Result<Vec<u8>, ImageError> {
    let root = seag_rom::parse(data)?;
    build_image(&root, codecs, options)?.to_bytes()
}

/// Image for an already decoded tree.
pub fn build_image(
    root: &Element,
    codecs: &Codecs,
    options: &ImageOptions,
) -> Result<Elf32Image, ImageError> {
    let mut segments = segments_from_tree(root, codecs)?;
    if options.merge_overlaps {
        let before = segments.len();
        merge_overlapping(&mut segments);
        debug!("merged {before} segments into {}", segments.len());
    }
    info!(
        "{} segments, {} bytes of data",
        segments.len(),
        segments.iter().map(Segment::len).sum::<usize>()
    );
    Ok(Elf32Image::new(segments))
}

/// One segment per File, in breadth-first order, with packed payloads run
/// through the matching codec.
pub fn segments_from_tree(root: &Element, codecs: &Codecs) -> Result<Vec<Segment>, ImageError> {
    root.files()
        .into_iter()
        .map(|file| Ok(Segment::new(file.load_address, unpack(file, codecs)?)))
        .collect()
}

/// Payload bytes as they belong in memory.
///
/// Unpacked payloads are used as they are. A packed payload whose magic has
/// no registered codec is logged and used raw.
pub fn unpack(file: &File, codecs: &Codecs) -> Result<Vec<u8>, ImageError> {
    if !file.packed {
        return Ok(file.payload.clone());
    }

    let magic = payload_magic(&file.payload);
    match codecs.get(&file.payload) {
        Some(decode) => {
            let data = decode(&file.payload).map_err(|source| ImageError::Decompress {
                magic,
                load_address: file.load_address,
                source,
            })?;
            debug!(
                "file at {:#010x}: {} packed bytes unpacked to {}",
                file.load_address,
                file.payload.len(),
                data.len()
            );
            Ok(data)
        }
        None => {
            warn!(
                "unsupported compression {} in file loading at {:#010x}; using raw payload",
                format_magic(&magic),
                file.load_address
            );
            Ok(file.payload.clone())
        }
    }
}

fn payload_magic(payload: &[u8]) -> [u8; 4] {
    let mut magic = [0u8; 4];
    let len = payload.len().min(4);
    magic[..len].copy_from_slice(&payload[..len]);
    magic
}
