//! Folding overlapping segments together.

use log::debug;

use crate::Segment;

/// Merges every segment into the first earlier one it touches.
///
/// Segments are taken in order. Each one is compared with the segments
/// kept so far and merged into the first that intersects it or shares a
/// boundary with it; the incoming bytes win where both have data. A segment
/// touching nothing is appended. Only one merge happens per incoming
/// segment, so the outcome depends on input order.
///
/// # Example
///
/// ```
/// use seag_image::{merge_overlapping, Segment};
///
/// let mut segments = vec![
///     Segment::new(0x1000, vec![0xaa; 16]),
///     Segment::new(0x1008, vec![0xbb; 16]),
/// ];
/// merge_overlapping(&mut segments);
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].address, 0x1000);
/// assert_eq!(segments[0].data[..8], [0xaa; 8]);
/// assert_eq!(segments[0].data[8..], [0xbb; 16]);
/// ```
pub fn merge_overlapping(segments: &mut Vec<Segment>) {
    let mut incoming = std::mem::take(segments).into_iter();
    let Some(first) = incoming.next() else {
        return;
    };
    segments.push(first);

    for segment in incoming {
        match segments.iter().position(|kept| kept.touches(&segment)) {
            Some(i) => {
                debug!(
                    "merging {:#010x}+{:#x} into {:#010x}+{:#x}",
                    segment.address,
                    segment.len(),
                    segments[i].address,
                    segments[i].len()
                );
                let merged = merge(&segments[i], segment);
                segments[i] = merged;
            }
            None => segments.push(segment),
        }
    }
}

/// Lays `incoming` over `kept`; the two must touch.
fn merge(kept: &Segment, incoming: Segment) -> Segment {
    let kept_start = u64::from(kept.address);
    let head_len = (u64::from(incoming.address).saturating_sub(kept_start) as usize).min(kept.len());
    let tail_start = (incoming.end().saturating_sub(kept_start) as usize).min(kept.len());

    let mut data = Vec::with_capacity(head_len + incoming.len() + (kept.len() - tail_start));
    data.extend_from_slice(&kept.data[..head_len]);
    data.extend_from_slice(&incoming.data);
    data.extend_from_slice(&kept.data[tail_start..]);

    Segment {
        address: kept.address.min(incoming.address),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_bytes_win_inside_existing_segment() {
        let mut segments = vec![
            Segment::new(0x100, vec![0x11; 16]),
            Segment::new(0x104, vec![0x22; 4]),
        ];
        merge_overlapping(&mut segments);
        let mut expected = vec![0x11; 16];
        expected[4..8].fill(0x22);
        assert_eq!(segments, vec![Segment::new(0x100, expected)]);
    }

    #[test]
    fn segment_in_front_extends_start() {
        let mut segments = vec![
            Segment::new(0x110, vec![0x11; 4]),
            Segment::new(0x100, vec![0x22; 0x10]),
        ];
        merge_overlapping(&mut segments);
        let mut expected = vec![0x22; 0x10];
        expected.extend([0x11; 4]);
        assert_eq!(segments, vec![Segment::new(0x100, expected)]);
    }

    #[test]
    fn shared_boundary_counts_as_overlap() {
        let mut segments = vec![
            Segment::new(0x100, vec![0x11; 4]),
            Segment::new(0x104, vec![0x22; 4]),
        ];
        merge_overlapping(&mut segments);
        assert_eq!(segments, vec![Segment::new(0x100, [[0x11; 4], [0x22; 4]].concat())]);
    }

    #[test]
    fn disjoint_segments_are_kept_in_order() {
        let mut segments = vec![
            Segment::new(0x300, vec![3]),
            Segment::new(0x100, vec![1]),
            Segment::new(0x200, vec![2]),
        ];
        let before = segments.clone();
        merge_overlapping(&mut segments);
        assert_eq!(segments, before);
    }

    #[test]
    fn only_first_match_is_merged() {
        // the bridge touches both kept segments but only joins the first
        let mut segments = vec![
            Segment::new(0x100, vec![1; 4]),
            Segment::new(0x108, vec![2; 4]),
            Segment::new(0x104, vec![3; 4]),
        ];
        merge_overlapping(&mut segments);
        assert_eq!(
            segments,
            vec![
                Segment::new(0x100, [[1; 4], [3; 4]].concat()),
                Segment::new(0x108, vec![2; 4]),
            ]
        );
    }

    #[test]
    fn empty_list_is_untouched() {
        let mut segments = Vec::new();
        merge_overlapping(&mut segments);
        assert!(segments.is_empty());
    }

    #[test]
    fn segment_at_top_of_address_space_does_not_wrap() {
        let mut segments = vec![
            Segment::new(0xffff_fff0, vec![1; 0x10]),
            Segment::new(0x0, vec![2; 4]),
        ];
        merge_overlapping(&mut segments);
        assert_eq!(segments.len(), 2);
    }
}
