use serde::{Deserialize, Serialize};
use std::fmt;

pub type GenomicPos = u64;
pub type SeqId = u32;

/// Half-open, 0-indexed interval `[start, end)` on one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub contig_id: SeqId,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl GenomicInterval {
    pub fn new(contig_id: SeqId, start: GenomicPos, end: GenomicPos) -> Self {
        Self { contig_id, start, end }
    }

    /// Number of bases covered; zero when `end <= start`.
    pub fn len(&self) -> GenomicPos {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig_id, self.start, self.end)
    }
}

/// One local alignment between sequence `a_read` and sequence `b_read`.
///
/// When `is_complement` is set the `b` interval is matched against the
/// reverse complement of `b`; both intervals are still given in forward
/// coordinates with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Overlap {
    pub a_read: SeqId,
    pub b_read: SeqId,
    pub a_begin: GenomicPos,
    pub a_end: GenomicPos,
    pub b_begin: GenomicPos,
    pub b_end: GenomicPos,
    pub is_complement: bool,
}

impl Overlap {
    pub fn new(
        a_read: SeqId,
        a_begin: GenomicPos,
        a_end: GenomicPos,
        b_read: SeqId,
        b_begin: GenomicPos,
        b_end: GenomicPos,
    ) -> Self {
        Self {
            a_read,
            b_read,
            a_begin,
            a_end,
            b_begin,
            b_end,
            is_complement: false,
        }
    }

    pub fn with_complement(mut self, is_complement: bool) -> Self {
        self.is_complement = is_complement;
        self
    }

    pub fn a_interval(&self) -> GenomicInterval {
        GenomicInterval::new(self.a_read, self.a_begin, self.a_end)
    }

    pub fn b_interval(&self) -> GenomicInterval {
        GenomicInterval::new(self.b_read, self.b_begin, self.b_end)
    }

    /// True when both intervals satisfy `begin <= end`.
    pub fn is_well_formed(&self) -> bool {
        self.a_begin <= self.a_end && self.b_begin <= self.b_end
    }
}

/// A putative insertion in `insert.contig_id`, bracketed by two alignments
/// to `flank.contig_id`.
///
/// `flank` runs from the end of the first flanking alignment to the start of
/// the second. The two alignments may overlap on `b` by up to the overhang
/// limit, in which case `flank.start > flank.end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Insertion {
    pub insert: GenomicInterval,
    pub flank: GenomicInterval,
}

impl Insertion {
    pub fn new(insert: GenomicInterval, flank: GenomicInterval) -> Self {
        Self { insert, flank }
    }

    /// Identifier of the form `a:start-end_b:start-end`.
    pub fn identifier(&self) -> String {
        format!("{}_{}", self.insert, self.flank)
    }
}
