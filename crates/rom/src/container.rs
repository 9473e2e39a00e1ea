//! Containers: a pre-table header, an offset table and the children the
//! table points at.

use std::fmt;

use log::{debug, trace};
use seag_buffers::{print_octets, Writer};

use crate::classify::{classify, ElementKind};
use crate::file::Directory;
use crate::table::{self, TableEntry, TABLE_ENTRY_LEN};
use crate::{Blob, Element, RomError, ROOT_CONTAINER_ID};

/// Signature carried by disc containers.
pub const DISC_SIGNATURE: &[u8; 4] = b"csiD";

/// Where the disc signature sits inside a container.
pub const DISC_SIGNATURE_OFFSET: usize = 16;

/// `true` when `data` carries [`DISC_SIGNATURE`] at [`DISC_SIGNATURE_OFFSET`].
pub fn has_disc_signature(data: &[u8]) -> bool {
    data.get(DISC_SIGNATURE_OFFSET..DISC_SIGNATURE_OFFSET + DISC_SIGNATURE.len())
        == Some(DISC_SIGNATURE.as_slice())
}

/// Container framing, told apart by the disc signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// 32-byte pre-table header carrying the disc signature.
    Disc,
    /// 16-byte pre-table header, no signature.
    Old,
}

impl Dialect {
    /// Picks the dialect from the signature bytes.
    pub fn detect(data: &[u8]) -> Self {
        if has_disc_signature(data) {
            Dialect::Disc
        } else {
            Dialect::Old
        }
    }

    pub const fn header_len(self) -> usize {
        match self {
            Dialect::Disc => 32,
            Dialect::Old => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Disc => "DiscContainer",
            Dialect::Old => "OldContainer",
        }
    }

    pub(crate) fn signature_rule(self) -> &'static str {
        match self {
            Dialect::Disc => "requires the \"csiD\" signature",
            Dialect::Old => "must not carry the \"csiD\" signature",
        }
    }

    fn check_signature(self, data: &[u8], base: usize) -> Result<(), RomError> {
        if has_disc_signature(data) == (self == Dialect::Disc) {
            return Ok(());
        }
        let found = data
            .get(DISC_SIGNATURE_OFFSET..)
            .map(|rest| &rest[..rest.len().min(DISC_SIGNATURE.len())])
            .filter(|bytes| !bytes.is_empty())
            .map_or_else(|| "nothing".to_string(), |bytes| print_octets(bytes, 4));
        Err(RomError::SignatureMismatch {
            offset: base + DISC_SIGNATURE_OFFSET,
            dialect: self,
            found,
        })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A framed region whose children are located through an offset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: u8,
    pub dialect: Dialect,
    /// Opaque bytes in front of the table.
    pub pre_table_header: Vec<u8>,
    pub children: Vec<Element>,
}

impl Container {
    /// Parses `data` with the dialect its signature bytes select.
    pub fn parse(id: u8, data: &[u8]) -> Result<Self, RomError> {
        Self::parse_at(Dialect::detect(data), id, data, 0)
    }

    /// Parses `data` as `dialect`, rejecting a contradicting signature.
    pub fn parse_as(dialect: Dialect, id: u8, data: &[u8]) -> Result<Self, RomError> {
        Self::parse_at(dialect, id, data, 0)
    }

    pub(crate) fn parse_at(
        dialect: Dialect,
        id: u8,
        data: &[u8],
        base: usize,
    ) -> Result<Self, RomError> {
        dialect.check_signature(data, base)?;

        let header_len = dialect.header_len();
        if data.len() < header_len + TABLE_ENTRY_LEN {
            return Err(RomError::MalformedHeader {
                what: "container pre-table header",
                offset: base,
                needed: header_len + TABLE_ENTRY_LEN,
                available: data.len(),
            });
        }

        let (format, entries) = table::read_table(data, header_len, base)?;
        debug!(
            "{dialect} {id:#04x} at {base:#x}: {} bytes, {format:?} table with {} entries",
            data.len(),
            entries.len()
        );

        let mut children = Vec::with_capacity(entries.len());
        for pair in entries.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let range = carve(data, current, next.offset as usize, base)?;
            let child = if current.id == ROOT_CONTAINER_ID || !current.is_present() {
                Blob::new(current.id, range).into()
            } else {
                build_child(current.id, range, base + current.offset as usize)?
            };
            children.push(child);
        }

        // The last entry runs to the end of the container. Placeholder
        // entries at the tail borrow the start of the last present one.
        let last = entries[entries.len() - 1];
        let start_index = table::last_present(&entries).ok_or_else(|| {
            RomError::table(base + header_len, "no table entry has a nonzero offset")
        })?;
        let start = entries[start_index].offset as usize;
        if start > data.len() {
            return Err(out_of_bounds(start, data.len(), base));
        }
        children.push(build_child(last.id, &data[start..], base + start)?);

        Ok(Self {
            id,
            dialect,
            pre_table_header: data[..header_len].to_vec(),
            children,
        })
    }

    /// A container whose first child carries the root id is written as the
    /// bare concatenation of its children; its framing lives in that child.
    pub fn is_degenerate(&self) -> bool {
        matches!(self.children.first(), Some(first) if first.id() == ROOT_CONTAINER_ID)
    }

    /// Table entries matching the current children.
    pub fn table(&self) -> Vec<TableEntry> {
        let sizes: Vec<(u8, usize)> = self
            .children
            .iter()
            .map(|child| (child.id(), child.serialized_len()))
            .collect();
        table::rebuild_table(self.pre_table_header.len(), &sizes)
    }

    /// Encodes the children first and derives the table from their encoded
    /// lengths, then writes header, table and children.
    pub fn write_to(&self, writer: &mut Writer) {
        let encoded: Vec<Vec<u8>> = self.children.iter().map(Element::serialize).collect();

        if !self.is_degenerate() {
            let sizes: Vec<(u8, usize)> = self
                .children
                .iter()
                .zip(&encoded)
                .map(|(child, bytes)| (child.id(), bytes.len()))
                .collect();
            writer.buf(&self.pre_table_header);
            for entry in table::rebuild_table(self.pre_table_header.len(), &sizes) {
                entry.write(writer);
            }
        }

        for bytes in &encoded {
            writer.buf(bytes);
        }
    }

    pub fn serialized_len(&self) -> usize {
        let framing = if self.is_degenerate() {
            0
        } else {
            self.pre_table_header.len() + TABLE_ENTRY_LEN * self.children.len()
        };
        framing
            + self
                .children
                .iter()
                .map(Element::serialized_len)
                .sum::<usize>()
    }
}

/// Parses a whole image as the root container.
///
/// # Example
///
/// ```
/// use seag_rom::{build_root_container, ROOT_CONTAINER_ID};
///
/// let mut image = vec![0u8; 16];
/// image.extend([0x01, 0x18, 0x00, 0x00, 0x02, 0x1c, 0x00, 0x00]);
/// image.extend([0xaa; 4]);
/// image.extend([0xbb; 4]);
///
/// let root = build_root_container(&image).unwrap();
/// assert_eq!(root.id(), ROOT_CONTAINER_ID);
/// assert_eq!(root.kind_name(), "OldContainer");
/// assert_eq!(root.children().len(), 2);
/// assert_eq!(root.serialize(), image);
/// ```
pub fn build_root_container(data: &[u8]) -> Result<Element, RomError> {
    let dialect = Dialect::detect(data);
    debug!("root container: {dialect}, {} bytes", data.len());
    Container::parse_at(dialect, ROOT_CONTAINER_ID, data, 0).map(Element::Container)
}

/// Byte range of an entry that ends where the next entry starts.
///
/// An absent next entry (offset 0) yields an empty range.
fn carve<'a>(
    data: &'a [u8],
    entry: TableEntry,
    end: usize,
    base: usize,
) -> Result<&'a [u8], RomError> {
    let start = entry.offset as usize;
    if start > data.len() {
        return Err(out_of_bounds(start, data.len(), base));
    }
    if end == 0 {
        return Ok(&[]);
    }
    if end > data.len() {
        return Err(out_of_bounds(end, data.len(), base));
    }
    if end < start {
        return Err(RomError::table(
            base + start,
            format!(
                "entry {:#04x} ends at {end:#x} before it starts at {start:#x}",
                entry.id
            ),
        ));
    }
    Ok(&data[start..end])
}

fn out_of_bounds(offset: usize, len: usize, base: usize) -> RomError {
    RomError::table(
        base,
        format!("entry offset {offset:#x} is past the container end {len:#x}"),
    )
}

fn build_child(id: u8, data: &[u8], base: usize) -> Result<Element, RomError> {
    let kind = classify(data);
    trace!("element {id:#04x} at {base:#x}: {} bytes, {kind:?}", data.len());
    Ok(match kind {
        ElementKind::DiscContainer => Container::parse_at(Dialect::Disc, id, data, base)?.into(),
        ElementKind::Directory => Directory::parse_at(id, data, base)?.into(),
        ElementKind::Blob => Blob::new(id, data).into(),
    })
}
