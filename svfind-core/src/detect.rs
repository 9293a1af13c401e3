//! Insertion detection
//!
//! Overlaps are sorted so that all alignments between one pair of sequences
//! lie together, ordered along the reference sequence `b`. Two alignments of
//! the same orientation whose `b` boundaries meet within the overhang limit,
//! but whose `a` boundaries leave a gap, bracket material present in `a` and
//! absent from `b`: a putative insertion in `a`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::array::GrowArray;
use crate::overlap::sort_for_scan;
use crate::types::{GenomicInterval, GenomicPos, Insertion, Overlap};

pub const DEFAULT_MAX_OVERHANG: GenomicPos = 50;
pub const DEFAULT_MAX_SIZE: GenomicPos = 50_000;

// Starting capacity of the candidate accumulator.
const INITIAL_CAPACITY: usize = 4096;

/// Errors raised while configuring detection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("max_overhang {0} must be a positive integer")]
    InvalidOverhang(GenomicPos),

    #[error("max_size {0} must be a positive integer")]
    InvalidSize(GenomicPos),
}

pub type DetectResult<T> = Result<T, DetectError>;

/// Policy for classifying a pair of alignments as an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectParams {
    /// Maximum slack between the `b` end of the first alignment and the `b`
    /// start of the second
    pub max_overhang: GenomicPos,
    /// Insertions must be strictly shorter than this
    pub max_size: GenomicPos,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            max_overhang: DEFAULT_MAX_OVERHANG,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl DetectParams {
    pub fn new(max_overhang: GenomicPos, max_size: GenomicPos) -> DetectResult<Self> {
        let params = Self {
            max_overhang,
            max_size,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> DetectResult<()> {
        if self.max_overhang == 0 {
            return Err(DetectError::InvalidOverhang(self.max_overhang));
        }
        if self.max_size == 0 {
            return Err(DetectError::InvalidSize(self.max_size));
        }
        Ok(())
    }
}

/// Output order: by insertion sequence, then start, then end.
pub fn insertion_order(x: &Insertion, y: &Insertion) -> Ordering {
    x.insert
        .contig_id
        .cmp(&y.insert.contig_id)
        .then(x.insert.start.cmp(&y.insert.start))
        .then(x.insert.end.cmp(&y.insert.end))
}

/// Sort into output order and collapse entries with the same insertion
/// interval. Returns the number of entries removed.
pub fn dedup_insertions(insertions: &mut GrowArray<Insertion>) -> usize {
    let before = insertions.len();
    insertions.sort_by(insertion_order);
    insertions.compress_by(insertion_order);
    before - insertions.len()
}

/// What the inner scan does with the pair `(i, j)`
enum Step {
    /// `j` left the group or the overhang window; no later `j` can match
    Stop,
    /// `j` cannot pair with `i` but a later `j` might
    Skip,
    /// Within the window; classify
    Candidate,
}

#[derive(Debug, Clone)]
pub struct InsertionDetector {
    params: DetectParams,
}

impl InsertionDetector {
    pub fn new(params: DetectParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DetectParams {
        &self.params
    }

    /// Sort `overlaps` into scan order, sweep them and return the
    /// deduplicated insertions in output order.
    pub fn detect(&self, overlaps: &mut [Overlap]) -> GrowArray<Insertion> {
        sort_for_scan(overlaps);
        let mut insertions = self.scan_sorted(overlaps);
        dedup_insertions(&mut insertions);
        insertions
    }

    /// Sweep overlaps already in scan order. Every qualifying pair yields one
    /// entry; the result may contain duplicates and is in sweep order.
    pub fn scan_sorted(&self, overlaps: &[Overlap]) -> GrowArray<Insertion> {
        let mut insertions = GrowArray::with_capacity(INITIAL_CAPACITY);

        for (i, oi) in overlaps.iter().enumerate() {
            for oj in &overlaps[i + 1..] {
                match self.step(oi, oj) {
                    Step::Stop => break,
                    Step::Skip => continue,
                    Step::Candidate => {
                        if let Some(insertion) = self.classify(oi, oj) {
                            insertions.push(insertion);
                        }
                    }
                }
            }
        }

        log::debug!(
            "scanned {} overlaps, {} candidate insertions",
            overlaps.len(),
            insertions.len()
        );
        insertions
    }

    fn step(&self, oi: &Overlap, oj: &Overlap) -> Step {
        let overhang = self.params.max_overhang;
        if oj.a_read != oi.a_read || oj.b_read != oi.b_read {
            Step::Stop
        } else if oj.is_complement != oi.is_complement {
            Step::Skip
        } else if oj.b_begin.saturating_add(overhang) < oi.b_end {
            Step::Skip
        } else if oj.b_begin > oi.b_end.saturating_add(overhang) {
            Step::Stop
        } else {
            Step::Candidate
        }
    }

    fn classify(&self, oi: &Overlap, oj: &Overlap) -> Option<Insertion> {
        let max_size = self.params.max_size;
        // on the reverse strand `j` precedes `i` along `a`
        let (begin, end) = if oj.is_complement {
            (oj.a_end, oi.a_begin)
        } else {
            (oi.a_end, oj.a_begin)
        };

        if end > begin && end < begin.saturating_add(max_size) {
            Some(Insertion::new(
                GenomicInterval::new(oj.a_read, begin, end),
                GenomicInterval::new(oj.b_read, oi.b_end, oj.b_begin),
            ))
        } else {
            None
        }
    }
}
