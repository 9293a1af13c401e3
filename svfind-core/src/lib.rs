//! svfind Core Library
//!
//! Insertion detection from pairwise alignments, forward-only contig
//! extraction, and the alignment/variant record files.

pub mod types;
pub mod array;
pub mod overlap;
pub mod detect;
pub mod contig;
pub mod io;
pub mod report;

// Re-export commonly used types and functions
pub use types::{GenomicInterval, GenomicPos, Insertion, Overlap, SeqId};
pub use array::GrowArray;
pub use overlap::{double_self_alignments, mirror_all, sort_for_scan};
pub use detect::{DetectError, DetectParams, InsertionDetector};
pub use contig::{open_contigs, ContigError, ContigReader, FastxSource, MemorySource, SequenceSource};
pub use io::{AlnFile, AlnReader, SvHeader, SvReader, SvRecord, SvWriter};
pub use report::{run_report, ReportError, ReportSummary};

/// Version information for the svfind core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
