//! Indented one-line-per-node dump of an element tree.

use std::fmt::{self, Write};

use crate::Element;

const INDENT: &str = "    ";

/// Writes one line per node, children indented four spaces below their
/// parent.
pub fn write_tree<W: Write>(root: &Element, out: &mut W) -> fmt::Result {
    let mut result = Ok(());
    root.walk(&mut |element, depth| {
        if result.is_ok() {
            result = write_line(element, depth, out);
        }
    });
    result
}

/// [`write_tree`] into a fresh string.
///
/// # Example
///
/// ```
/// use seag_rom::{dump_tree, Blob, Element};
///
/// let blob = Element::from(Blob::new(0x1d, vec![0; 0x20]));
/// assert_eq!(dump_tree(&blob), "Blob 0x1d: 0x00 children. size=0x000020\n");
/// ```
pub fn dump_tree(root: &Element) -> String {
    let mut out = String::new();
    let _ = write_tree(root, &mut out);
    out
}

fn write_line<W: Write>(element: &Element, depth: usize, out: &mut W) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    writeln!(
        out,
        "{} 0x{:02x}: 0x{:02x} children. size=0x{:06x}",
        element.kind_name(),
        element.id(),
        element.children().len(),
        element.serialized_len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blob, Directory, File};

    #[test]
    fn nests_by_depth() {
        let tree = Element::from(Directory {
            id: 3,
            children: vec![
                File {
                    packed: true,
                    slot_id: 1,
                    file_type: 2,
                    unknown: 0,
                    load_address: 0x1000,
                    payload: vec![0; 8],
                }
                .into(),
                Blob::new(0, vec![0xff; 0x123]).into(),
            ],
        });
        assert_eq!(
            dump_tree(&tree),
            "Directory 0x03: 0x02 children. size=0x000133\n\
             \x20   File 0x01: 0x00 children. size=0x000010\n\
             \x20   Blob 0x00: 0x00 children. size=0x000123\n"
        );
    }
}
