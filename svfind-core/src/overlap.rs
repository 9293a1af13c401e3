//! Orientation utilities for overlap records
//!
//! Mirroring swaps the roles of the two sequences in an alignment. It is used
//! to synthesize the reverse direction of self-alignments and to re-target a
//! working set at the other sequence set before a second report.

use std::cmp::Ordering;

use crate::types::Overlap;

impl Overlap {
    /// The same alignment seen from `b`: reads and intervals swapped,
    /// orientation unchanged.
    pub fn mirrored(&self) -> Overlap {
        Overlap {
            a_read: self.b_read,
            b_read: self.a_read,
            a_begin: self.b_begin,
            a_end: self.b_end,
            b_begin: self.a_begin,
            b_end: self.a_end,
            is_complement: self.is_complement,
        }
    }

    /// Mirror in place.
    pub fn mirror(&mut self) {
        *self = self.mirrored();
    }
}

/// Scan order: by `b_read`, then `a_read`, then `b_begin`.
///
/// Every `(a_read, b_read)` pair ends up in one contiguous run, ordered along
/// `b` within the run.
pub fn overlap_order(x: &Overlap, y: &Overlap) -> Ordering {
    x.b_read
        .cmp(&y.b_read)
        .then(x.a_read.cmp(&y.a_read))
        .then(x.b_begin.cmp(&y.b_begin))
}

pub fn sort_for_scan(overlaps: &mut [Overlap]) {
    overlaps.sort_by(overlap_order);
}

/// Append the mirror of every overlap, turning a one-directional set of
/// self-alignments into a symmetric one. Returns the new count.
pub fn double_self_alignments(overlaps: &mut Vec<Overlap>) -> usize {
    let n = overlaps.len();
    overlaps.reserve_exact(n);
    for i in 0..n {
        let mirrored = overlaps[i].mirrored();
        overlaps.push(mirrored);
    }
    overlaps.len()
}

/// Mirror a whole working set in place so that a report looks for
/// insertions in the other sequence set.
pub fn mirror_all(overlaps: &mut [Overlap]) {
    overlaps.iter_mut().for_each(Overlap::mirror);
}
