//! Alignment file reader
//!
//! Reads the ASCII form of a `.1aln` pairwise alignment file. Only the parts
//! needed for insertion finding are kept: the names of the sequence files the
//! alignments refer to, and for every alignment its two intervals and
//! orientation. Trace points, diff counts and other payload lines are skipped.
//!
//! ```text
//! 1 3 aln 1 0
//! < 10 genomeA.fa 1
//! < 10 genomeB.fa 2
//! A 0 1000 2000 3 50 1050
//! R
//! D 12
//! T 5 1 2 3 4 5
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{open_text, Fields};
use crate::types::{GenomicPos, Overlap, SeqId};

#[derive(Debug, Error)]
pub enum AlnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: 'R' record before any 'A' record")]
    OrphanComplement { line: usize },

    #[error("line {line}: inverted interval in alignment {overlap:?}")]
    InvertedInterval { line: usize, overlap: Overlap },
}

pub type AlnResult<T> = Result<T, AlnError>;

/// Contents of an alignment file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlnFile {
    /// Sequence file of the `a` sequences
    pub first_db: Option<String>,
    /// Sequence file of the `b` sequences; absent for self-alignments
    pub second_db: Option<String>,
    /// Directory the sequence files are relative to
    pub cpath: Option<PathBuf>,
    pub overlaps: Vec<Overlap>,
}

impl AlnFile {
    /// True if every alignment is between sequences of the same set.
    pub fn is_self_alignment(&self) -> bool {
        self.second_db.is_none()
    }
}

/// Reader for ASCII alignment files
pub struct AlnReader;

impl AlnReader {
    /// Read an alignment file, gzipped or plain.
    pub fn read_file<P: AsRef<Path>>(path: P) -> AlnResult<AlnFile> {
        let reader = open_text(&path)?;
        Self::read_reader(reader)
    }

    /// Read alignment records from any BufRead source
    pub fn read_reader<R: BufRead>(reader: R) -> AlnResult<AlnFile> {
        let mut aln = AlnFile::default();
        let mut current: Option<(usize, Overlap)> = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = line_num + 1;
            let malformed = |message: String| AlnError::Malformed {
                line: line_num,
                message,
            };

            let mut chars = line.chars();
            let kind = match chars.next() {
                Some(c) => c,
                None => continue,
            };
            let mut fields = Fields::new(chars.as_str());

            match kind {
                'A' => {
                    if let Some((at, overlap)) = current.take() {
                        Self::push(&mut aln, at, overlap)?;
                    }
                    let a_read: SeqId = fields.int().map_err(malformed)?;
                    let a_begin: GenomicPos = fields.int().map_err(malformed)?;
                    let a_end: GenomicPos = fields.int().map_err(malformed)?;
                    let b_read: SeqId = fields.int().map_err(malformed)?;
                    let b_begin: GenomicPos = fields.int().map_err(malformed)?;
                    let b_end: GenomicPos = fields.int().map_err(malformed)?;
                    current = Some((
                        line_num,
                        Overlap::new(a_read, a_begin, a_end, b_read, b_begin, b_end),
                    ));
                }
                'R' => match current.as_mut() {
                    Some((_, overlap)) => overlap.is_complement = true,
                    None => return Err(AlnError::OrphanComplement { line: line_num }),
                },
                '<' => {
                    let name = fields.string().map_err(malformed)?.to_string();
                    let count: u64 = fields.int().map_err(malformed)?;
                    match count {
                        1 => aln.first_db = Some(name),
                        2 => aln.second_db = Some(name),
                        3 => aln.cpath = Some(PathBuf::from(name)),
                        other => log::warn!("line {}: ignoring reference {} with count {}", line_num, name, other),
                    }
                }
                '#' => {
                    // count line "# A n" gives the number of alignments up front
                    if fields.token() == Some("A") {
                        if let Ok(n) = fields.int::<usize>() {
                            aln.overlaps.reserve(n);
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some((at, overlap)) = current.take() {
            Self::push(&mut aln, at, overlap)?;
        }
        Ok(aln)
    }

    fn push(aln: &mut AlnFile, line: usize, overlap: Overlap) -> AlnResult<()> {
        if !overlap.is_well_formed() {
            return Err(AlnError::InvertedInterval { line, overlap });
        }
        aln.overlaps.push(overlap);
        Ok(())
    }
}
