//! Machine-readable tree summary.

use seag_rom::Element;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub kind: &'static str,
    pub id: u8,
    pub size: usize,
    #[serde(flatten)]
    pub file: Option<FileSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSummary>,
}

/// Header fields of a File node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub packed: bool,
    pub slot: u8,
    #[serde(rename = "type")]
    pub file_type: u8,
    pub unknown: u8,
    pub load_address: u32,
    pub payload_len: usize,
}

impl NodeSummary {
    pub fn from_element(element: &Element) -> Self {
        let file = match element {
            Element::File(file) => Some(FileSummary {
                packed: file.packed,
                slot: file.slot_id,
                file_type: file.file_type,
                unknown: file.unknown,
                load_address: file.load_address,
                payload_len: file.payload.len(),
            }),
            _ => None,
        };
        Self {
            kind: element.kind_name(),
            id: element.id(),
            size: element.serialized_len(),
            file,
            children: element.children().iter().map(Self::from_element).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seag_rom::{Blob, Directory, File};
    use serde_json::json;

    #[test]
    fn summarizes_nested_nodes() {
        let tree = Element::from(Directory {
            id: 4,
            children: vec![
                File {
                    packed: true,
                    slot_id: 2,
                    file_type: 1,
                    unknown: 3,
                    load_address: 0x1000,
                    payload: vec![0; 12],
                }
                .into(),
                Blob::new(0, vec![0xff; 4]).into(),
            ],
        });
        assert_eq!(
            NodeSummary::from_element(&tree).to_json().unwrap(),
            json!({
                "kind": "Directory",
                "id": 4,
                "size": 24,
                "children": [
                    {
                        "kind": "File",
                        "id": 2,
                        "size": 20,
                        "packed": true,
                        "slot": 2,
                        "type": 1,
                        "unknown": 3,
                        "load_address": 4096,
                        "payload_len": 12
                    },
                    { "kind": "Blob", "id": 0, "size": 4 }
                ]
            })
        );
    }
}
