//! Insertion report generation
//!
//! Ties detection to output: overlaps are swept for insertions, the inserted
//! bases are pulled from the `a` sequences and every insertion is written to
//! a `.1sv` file in output order.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::contig::{ContigError, ContigReader, SequenceSource};
use crate::detect::{dedup_insertions, DetectParams, InsertionDetector};
use crate::io::sv::{SvError, SvWriter};
use crate::overlap::sort_for_scan;
use crate::types::Overlap;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("contig error: {0}")]
    Contig(#[from] ContigError),

    #[error("output error: {0}")]
    Output(#[from] SvError),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Counts from one report run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Qualifying pairs found by the sweep, duplicates included
    pub candidates: usize,
    /// Insertions written after deduplication
    pub insertions: usize,
    /// Total inserted bases written
    pub inserted_bases: u64,
}

/// Find insertions in `overlaps` and write them to `out`.
///
/// `overlaps` is re-sorted in place. `contigs` must yield the sequences the
/// `a` side of the overlaps refers to; since it only moves forward, the
/// insertions are written in order of their `a` sequence.
pub fn run_report<S, W>(
    overlaps: &mut [Overlap],
    params: &DetectParams,
    contigs: &mut ContigReader<S>,
    out: &mut SvWriter<W>,
) -> ReportResult<ReportSummary>
where
    S: SequenceSource,
    W: Write,
{
    let detector = InsertionDetector::new(*params);
    sort_for_scan(overlaps);
    let mut insertions = detector.scan_sorted(overlaps);
    let candidates = insertions.len();
    let removed = dedup_insertions(&mut insertions);
    log::debug!("removed {} duplicate insertions", removed);

    out.write_max_overhang(params.max_overhang)?;
    out.write_max_size(params.max_size)?;

    let mut summary = ReportSummary {
        candidates,
        ..ReportSummary::default()
    };
    for insertion in &insertions {
        let insert = &insertion.insert;
        let bases = contigs.bases(insert.contig_id as usize, insert.start, insert.end)?;
        out.write_insertion(insertion, bases)?;
        summary.insertions += 1;
        summary.inserted_bases += bases.len() as u64;
    }

    log::trace!("report summary: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig::MemorySource;
    use crate::io::sv::{SvHeader, SvReader, SvRecord};
    use crate::types::GenomicInterval;
    use std::io::Cursor;

    fn run(
        overlaps: &[Overlap],
        records: &[&str],
        params: DetectParams,
    ) -> (ReportResult<ReportSummary>, Vec<SvRecord>) {
        let mut overlaps = overlaps.to_vec();
        let mut contigs = ContigReader::new(MemorySource::new(
            records.iter().map(|r| r.as_bytes().to_vec()),
        ));
        let mut out = SvWriter::new(Vec::new(), &SvHeader::new()).unwrap();
        let result = run_report(&mut overlaps, &params, &mut contigs, &mut out);
        let text = out.finish().unwrap();
        let records = SvReader::parse_reader(Cursor::new(text)).unwrap();
        (result, records)
    }

    fn seq(len: usize, unit: &str) -> String {
        unit.repeat(len / unit.len() + 1)[..len].to_string()
    }

    #[test]
    fn test_single_insertion_report() {
        let contig = seq(300, "ACGT");
        let overlaps = [
            Overlap::new(0, 0, 100, 0, 0, 100),
            Overlap::new(0, 150, 250, 0, 100, 200),
        ];
        let (result, records) = run(&overlaps, &[&contig], DetectParams::new(50, 1000).unwrap());

        let summary = result.unwrap();
        assert_eq!(
            summary,
            ReportSummary {
                candidates: 1,
                insertions: 1,
                inserted_bases: 50
            }
        );
        assert_eq!(
            records,
            vec![
                SvRecord::MaxOverhang(50),
                SvRecord::MaxSize(1000),
                SvRecord::Variant(GenomicInterval::new(0, 100, 150)),
                SvRecord::Flank(GenomicInterval::new(0, 100, 100)),
                SvRecord::Sequence(contig[100..150].to_lowercase()),
                SvRecord::Identifier("0:100-150_0:100-100".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_input_writes_globals_only() {
        let (result, records) = run(&[], &[], DetectParams::default());
        assert_eq!(result.unwrap(), ReportSummary::default());
        assert_eq!(
            records,
            vec![SvRecord::MaxOverhang(50), SvRecord::MaxSize(50_000)]
        );
    }

    #[test]
    fn test_insertions_across_contigs_in_order() {
        let first = seq(200, "AC");
        let second = seq(200, "GT");
        let overlaps = [
            // listed out of order; the report sorts them
            Overlap::new(1, 120, 180, 4, 60, 100),
            Overlap::new(0, 0, 50, 2, 0, 50),
            Overlap::new(1, 0, 60, 4, 0, 60),
            Overlap::new(0, 80, 150, 2, 55, 125),
        ];
        let records = format!("{}NNNN{}", first, second);
        let (result, out) = run(&overlaps, &[&records], DetectParams::new(10, 500).unwrap());

        assert_eq!(result.unwrap().insertions, 2);
        let variants: Vec<&GenomicInterval> = out
            .iter()
            .filter_map(|r| match r {
                SvRecord::Variant(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(
            variants,
            vec![
                &GenomicInterval::new(0, 50, 80),
                &GenomicInterval::new(1, 60, 120),
            ]
        );
        assert!(out.contains(&SvRecord::Sequence(second[60..120].to_lowercase())));
    }

    #[test]
    fn test_duplicates_counted_as_candidates() {
        let contig = seq(400, "ACGT");
        // two upstream alignments ending at the same place pair with one
        // downstream alignment and give the same insertion twice
        let overlaps = [
            Overlap::new(0, 0, 100, 1, 0, 100),
            Overlap::new(0, 50, 100, 1, 50, 100),
            Overlap::new(0, 150, 250, 1, 100, 200),
        ];
        let (result, _) = run(&overlaps, &[&contig], DetectParams::new(50, 1000).unwrap());
        let summary = result.unwrap();
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.insertions, 1);
    }

    #[test]
    fn test_missing_contig_is_an_error() {
        let overlaps = [
            Overlap::new(3, 0, 100, 0, 0, 100),
            Overlap::new(3, 150, 250, 0, 100, 200),
        ];
        let (result, _) = run(&overlaps, &["ACGT"], DetectParams::new(50, 1000).unwrap());
        match result {
            Err(ReportError::Contig(ContigError::Exhausted {
                requested,
                reached,
            })) => {
                assert_eq!(requested, 3);
                assert_eq!(reached, 0);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }
}
