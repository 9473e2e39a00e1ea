//! Hex rendering of short byte runs for error messages and logs.

use std::fmt::Write;

/// Formats up to `max` bytes as space-separated hex, noting how many bytes
/// were left out.
///
/// Printable ASCII is echoed after the hex so signatures such as `csiD` are
/// readable in diagnostics.
///
/// # Example
///
/// ```
/// use seag_buffers::print_octets;
///
/// assert_eq!(print_octets(b"csiD", 16), "63 73 69 44 |csiD|");
/// assert_eq!(print_octets(&[0x00, 0xff], 16), "00 ff |..|");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    if octets.is_empty() {
        return String::new();
    }

    let shown = &octets[..octets.len().min(max)];
    let mut result = String::with_capacity(shown.len() * 4 + 16);
    for (i, byte) in shown.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        let _ = write!(result, "{byte:02x}");
    }

    result.push_str(" |");
    result.extend(shown.iter().map(|&b| {
        if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        }
    }));
    result.push('|');

    if octets.len() > max {
        let _ = write!(result, "... ({} more)", octets.len() - max);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_octets_empty() {
        assert_eq!(print_octets(&[], 16), "");
    }

    #[test]
    fn test_print_octets_signature() {
        assert_eq!(print_octets(b"LZMA", 16), "4c 5a 4d 41 |LZMA|");
    }

    #[test]
    fn test_print_octets_truncated() {
        let data: Vec<u8> = (0..20).collect();
        let result = print_octets(&data, 10);
        assert!(result.starts_with("00 01 02"));
        assert!(result.ends_with("... (10 more)"));
    }
}
