//! Container offset table.
//!
//! Every entry is four bytes: a one-byte element id followed by a 24-bit
//! little-endian offset from the start of the container. Two table layouts
//! exist and are told apart by the first entry:
//!
//! - [`TableFormat::SelfSized`]: the first offset is nonzero and marks the end
//!   of the table itself.
//! - [`TableFormat::Terminated`]: the first offset is zero and entries run up
//!   to and including the first one carrying [`EXTRA_SPACE_ID`].
//!
//! An offset of zero on any later entry marks an absent element.

use log::trace;
use seag_buffers::{BufferError, Reader, Writer};

use crate::{RomError, EXTRA_SPACE_ID};

/// Encoded size of one table entry.
pub const TABLE_ENTRY_LEN: usize = 4;

/// Largest offset an entry can hold.
pub const MAX_TABLE_OFFSET: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub id: u8,
    pub offset: u32,
}

impl TableEntry {
    pub fn new(id: u8, offset: u32) -> Self {
        Self { id, offset }
    }

    pub fn read(reader: &mut Reader<'_>) -> Result<Self, BufferError> {
        let [id, a, b, c] = reader.array()?;
        Ok(Self {
            id,
            offset: u32::from_le_bytes([a, b, c, 0]),
        })
    }

    /// Writes the entry; offset bits above 24 are dropped.
    pub fn write(&self, writer: &mut Writer) {
        writer.u8(self.id);
        writer.u24(self.offset & MAX_TABLE_OFFSET);
    }

    /// `false` for the zero-offset placeholder of an absent element.
    pub fn is_present(&self) -> bool {
        self.offset != 0
    }
}

/// Which of the two table layouts a container uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Legacy layout; the first entry's offset is the table end.
    SelfSized,
    /// Newer layout; ends with the extra-space entry.
    Terminated,
}

/// Reads the table that starts `table_start` bytes into `data`.
///
/// `base` is the absolute position of `data` and only feeds error offsets.
pub fn read_table(
    data: &[u8],
    table_start: usize,
    base: usize,
) -> Result<(TableFormat, Vec<TableEntry>), RomError> {
    let mut reader = Reader::from_slice(data, table_start, data.len());
    let first =
        TableEntry::read(&mut reader).map_err(RomError::malformed("offset table entry", base))?;

    if first.is_present() {
        let end = first.offset as usize;
        if end > data.len() {
            return Err(RomError::table(
                base + table_start,
                format!(
                    "table end {end:#x} is past the container end {:#x}",
                    data.len()
                ),
            ));
        }
        if end < table_start + TABLE_ENTRY_LEN || (end - table_start) % TABLE_ENTRY_LEN != 0 {
            return Err(RomError::table(
                base + table_start,
                format!("table end {end:#x} does not close a whole number of entries"),
            ));
        }

        let mut entries = Vec::with_capacity((end - table_start) / TABLE_ENTRY_LEN);
        entries.push(first);
        while reader.x < end {
            let entry = TableEntry::read(&mut reader)
                .map_err(RomError::malformed("offset table entry", base))?;
            entries.push(entry);
        }
        trace_entries(TableFormat::SelfSized, &entries);
        return Ok((TableFormat::SelfSized, entries));
    }

    let mut entries = vec![first];
    let mut last = first;
    while last.id != EXTRA_SPACE_ID {
        last = TableEntry::read(&mut reader).map_err(|err| {
            let BufferError::EndOfBuffer { offset, .. } = err;
            RomError::table(
                base + offset,
                "table runs past the container end without an extra-space entry",
            )
        })?;
        entries.push(last);
    }
    trace_entries(TableFormat::Terminated, &entries);
    Ok((TableFormat::Terminated, entries))
}

fn trace_entries(format: TableFormat, entries: &[TableEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        trace!(
            "{format:?} table entry {i}: id {:#04x} offset {:#08x}",
            entry.id,
            entry.offset
        );
    }
}

/// Index of the last entry with a nonzero offset.
pub fn last_present(entries: &[TableEntry]) -> Option<usize> {
    entries.iter().rposition(TableEntry::is_present)
}

/// Rebuilds table entries from `(id, encoded_len)` pairs of the children.
///
/// Offsets start right after the table. A child with a nonzero length
/// advances the cursor by that length; a zero-length child resets it to zero
/// for everything that follows.
///
/// # Example
///
/// ```
/// use seag_rom::{rebuild_table, TableEntry};
///
/// let entries = rebuild_table(16, &[(1, 0x20), (2, 0), (3, 0x10)]);
/// assert_eq!(
///     entries,
///     vec![TableEntry::new(1, 0x1c), TableEntry::new(2, 0x3c), TableEntry::new(3, 0)]
/// );
/// ```
pub fn rebuild_table(table_start: usize, children: &[(u8, usize)]) -> Vec<TableEntry> {
    let start = (table_start + TABLE_ENTRY_LEN * children.len()) as u32;
    children
        .iter()
        .scan(start, |cursor, &(id, len)| {
            let entry = TableEntry::new(id, *cursor);
            *cursor = match len {
                0 => 0,
                len => cursor.wrapping_add(len as u32),
            };
            Some(entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(bytes: &[&[u8]]) -> Vec<u8> {
        bytes.concat()
    }

    #[test]
    fn reads_self_sized_table() {
        let mut data = vec![0xee; 4];
        data.extend(table(&[
            &[0x01, 0x10, 0x00, 0x00],
            &[0x02, 0x20, 0x00, 0x00],
            &[0x03, 0x00, 0x00, 0x00],
        ]));
        data.resize(0x30, 0);
        let (format, entries) = read_table(&data, 4, 0).unwrap();
        assert_eq!(format, TableFormat::SelfSized);
        assert_eq!(
            entries,
            vec![TableEntry::new(1, 0x10), TableEntry::new(2, 0x20), TableEntry::new(3, 0)]
        );
    }

    #[test]
    fn reads_terminated_table() {
        let data = table(&[
            &[0x1d, 0x00, 0x00, 0x00],
            &[0x05, 0x40, 0x00, 0x00],
            &[0x00, 0x80, 0x00, 0x00],
            &[0x07, 0x99, 0x00, 0x00],
        ]);
        let (format, entries) = read_table(&data, 0, 0).unwrap();
        assert_eq!(format, TableFormat::Terminated);
        assert_eq!(
            entries,
            vec![
                TableEntry::new(0x1d, 0),
                TableEntry::new(5, 0x40),
                TableEntry::new(0, 0x80)
            ]
        );
    }

    #[test]
    fn unterminated_table_is_inconsistent() {
        let data = table(&[&[0x1d, 0x00, 0x00, 0x00], &[0x05, 0x40, 0x00, 0x00], &[0x06]]);
        let err = read_table(&data, 0, 0x100).unwrap_err();
        assert!(matches!(err, RomError::InconsistentTable { offset: 0x108, .. }));
    }

    #[test]
    fn self_sized_table_past_end_is_inconsistent() {
        let data = table(&[&[0x01, 0x40, 0x00, 0x00], &[0x02, 0x00, 0x00, 0x00]]);
        let err = read_table(&data, 0, 0).unwrap_err();
        assert!(matches!(err, RomError::InconsistentTable { .. }));
    }

    #[test]
    fn self_sized_table_must_be_entry_aligned() {
        let mut data = table(&[&[0x01, 0x06, 0x00, 0x00]]);
        data.resize(8, 0);
        assert!(matches!(
            read_table(&data, 0, 0),
            Err(RomError::InconsistentTable { .. })
        ));
    }

    #[test]
    fn missing_first_entry_is_malformed() {
        let data = [0x01, 0x02];
        assert!(matches!(
            read_table(&data, 0, 0),
            Err(RomError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn last_present_scans_backwards() {
        let entries = [
            TableEntry::new(1, 0x10),
            TableEntry::new(2, 0x20),
            TableEntry::new(3, 0),
            TableEntry::new(0, 0),
        ];
        assert_eq!(last_present(&entries), Some(1));
        assert_eq!(last_present(&entries[2..]), None);
    }

    #[test]
    fn rebuild_resets_cursor_after_empty_child() {
        let entries = rebuild_table(16, &[(1, 0xe0), (2, 0), (3, 0), (4, 0x40)]);
        assert_eq!(
            entries,
            vec![
                TableEntry::new(1, 0x20),
                TableEntry::new(2, 0x100),
                TableEntry::new(3, 0),
                TableEntry::new(4, 0),
            ]
        );
    }

    #[test]
    fn write_truncates_offset_to_24_bits() {
        let mut writer = Writer::new();
        TableEntry::new(0x42, 0x0123_4567).write(&mut writer);
        assert_eq!(writer.flush(), vec![0x42, 0x67, 0x45, 0x23]);
    }
}
