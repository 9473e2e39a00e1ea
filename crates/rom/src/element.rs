//! The element tree.
//!
//! Every node serializes as its header bytes, then its children, then its
//! footer bytes. Parsing only ever builds nodes; serializing an untouched
//! tree gives back the bytes it was parsed from.

use std::collections::VecDeque;

use seag_buffers::Writer;

use crate::file::{Directory, File};
use crate::Container;

/// Opaque byte range: unclassifiable data and spare space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub id: u8,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(id: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }
}

/// A node of the decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Blob(Blob),
    File(File),
    Directory(Directory),
    Container(Container),
}

impl Element {
    /// Slot identifier; a File reports its slot id.
    pub fn id(&self) -> u8 {
        match self {
            Element::Blob(blob) => blob.id,
            Element::File(file) => file.slot_id,
            Element::Directory(dir) => dir.id,
            Element::Container(container) => container.id,
        }
    }

    /// Human-readable node kind, as used by the tree dump.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Blob(_) => "Blob",
            Element::File(_) => "File",
            Element::Directory(_) => "Directory",
            Element::Container(container) => container.dialect.name(),
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::Blob(_) | Element::File(_) => &[],
            Element::Directory(dir) => &dir.children,
            Element::Container(container) => &container.children,
        }
    }

    /// Appends the encoded node to `writer`.
    pub fn write_to(&self, writer: &mut Writer) {
        match self {
            Element::Blob(blob) => writer.buf(&blob.data),
            Element::File(file) => file.write_to(writer),
            Element::Directory(dir) => {
                for child in &dir.children {
                    child.write_to(writer);
                }
            }
            Element::Container(container) => container.write_to(writer),
        }
    }

    /// Encodes the node and everything below it.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(self.serialized_len());
        self.write_to(&mut writer);
        writer.flush()
    }

    /// Length of [`Element::serialize`] without building the bytes.
    pub fn serialized_len(&self) -> usize {
        match self {
            Element::Blob(blob) => blob.data.len(),
            Element::File(file) => file.serialized_len(),
            Element::Directory(dir) => dir.children.iter().map(Element::serialized_len).sum(),
            Element::Container(container) => container.serialized_len(),
        }
    }

    /// Visits this node and all descendants depth-first, parents before
    /// children, passing the depth below `self`.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Element, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<'a, F>(&'a self, depth: usize, visit: &mut F)
    where
        F: FnMut(&'a Element, usize),
    {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }

    /// All File leaves below this node, level by level.
    ///
    /// Files closer to the root come first; within a level they keep table
    /// order.
    pub fn files(&self) -> Vec<&File> {
        let mut files = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(element) = queue.pop_front() {
            for child in element.children() {
                match child {
                    Element::File(file) => files.push(file),
                    other => queue.push_back(other),
                }
            }
        }
        files
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Element::Container(container) => Some(container),
            _ => None,
        }
    }
}

impl From<Blob> for Element {
    fn from(blob: Blob) -> Self {
        Element::Blob(blob)
    }
}

impl From<File> for Element {
    fn from(file: File) -> Self {
        Element::File(file)
    }
}

impl From<Directory> for Element {
    fn from(dir: Directory) -> Self {
        Element::Directory(dir)
    }
}

impl From<Container> for Element {
    fn from(container: Container) -> Self {
        Element::Container(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(slot_id: u8, load_address: u32, payload: &[u8]) -> File {
        File {
            packed: false,
            slot_id,
            file_type: 0,
            unknown: 0,
            load_address,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn blob_serializes_as_its_data() {
        let element = Element::from(Blob::new(3, vec![1, 2, 3]));
        assert_eq!(element.serialize(), vec![1, 2, 3]);
        assert_eq!(element.serialized_len(), 3);
        assert!(element.children().is_empty());
    }

    #[test]
    fn directory_concatenates_children() {
        let dir = Element::from(Directory {
            id: 9,
            children: vec![
                file(1, 0x100, &[0xaa; 4]).into(),
                Blob::new(0, vec![0xee; 2]).into(),
            ],
        });
        let bytes = dir.serialize();
        assert_eq!(bytes.len(), 8 + 4 + 2);
        assert_eq!(dir.serialized_len(), bytes.len());
        assert_eq!(&bytes[8..], &[0xaa, 0xaa, 0xaa, 0xaa, 0xee, 0xee]);
    }

    #[test]
    fn files_are_collected_level_by_level() {
        let deep = Directory {
            id: 2,
            children: vec![file(3, 0x3000, &[]).into()],
        };
        let tree = Element::from(Directory {
            id: 1,
            children: vec![
                Element::from(Directory {
                    id: 4,
                    children: vec![deep.into()],
                }),
                file(1, 0x1000, &[]).into(),
                file(2, 0x2000, &[]).into(),
            ],
        });
        let addresses: Vec<u32> = tree.files().iter().map(|f| f.load_address).collect();
        assert_eq!(addresses, vec![0x1000, 0x2000, 0x3000]);
    }

    #[test]
    fn walk_reports_depth() {
        let tree = Element::from(Directory {
            id: 1,
            children: vec![file(1, 0, &[]).into(), Blob::new(0, vec![]).into()],
        });
        let mut seen = Vec::new();
        tree.walk(&mut |element, depth| seen.push((element.kind_name(), depth)));
        assert_eq!(seen, vec![("Directory", 0), ("File", 1), ("Blob", 1)]);
    }
}
