//! Forward-only contig extraction
//!
//! Sequence records are split into contigs: maximal runs of `ACGT` bases
//! (either case). Anything else, typically runs of `N`, separates contigs.
//! Contigs are numbered from 0 in file order across all records, matching the
//! sequence numbering used by the alignment file.
//!
//! Alignment files may name a `.1gdb` genome skeleton instead of the sequence
//! file itself; the skeleton's first reference leads to the sequence file.
//!
//! `ContigReader` can only move forward. Callers must request contig indices
//! in non-decreasing order; asking for an earlier contig is an error.

use std::io::{BufRead, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use thiserror::Error;

use crate::io::{open_text, Fields};
use crate::types::GenomicPos;

const GDB_HEADER: &[u8] = b"1 3 gdb";

#[derive(Debug, Error)]
pub enum ContigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sequence parse error: {0}")]
    Parse(String),

    #[error("failed to open sequence file {name} or {}", .full_path.display())]
    NotFound { name: String, full_path: PathBuf },

    #[error("failed to find reference name in GDB file {}", .path.display())]
    GdbReference { path: PathBuf },

    #[error("contig {requested} requested after contig {current}: contigs can only be read forwards")]
    Backwards { requested: usize, current: usize },

    #[error("run out of contig sequences at {reached} < {requested}")]
    Exhausted { requested: usize, reached: usize },

    #[error("interval [{start},{end}) is outside contig {index} of length {length}")]
    OutOfBounds {
        index: usize,
        start: GenomicPos,
        end: GenomicPos,
        length: usize,
    },
}

pub type ContigResult<T> = Result<T, ContigError>;

const fn acgt_table() -> [bool; 256] {
    let mut table = [false; 256];
    let bases = *b"ACGTacgt";
    let mut i = 0;
    while i < bases.len() {
        table[bases[i] as usize] = true;
        i += 1;
    }
    table
}

static IS_ACGT: [bool; 256] = acgt_table();

#[inline]
fn is_base(byte: u8) -> bool {
    IS_ACGT[byte as usize]
}

fn skip_gaps(record: &[u8], from: usize) -> usize {
    from + record[from..].iter().take_while(|&&b| !is_base(b)).count()
}

/// A stream of raw sequence records
pub trait SequenceSource {
    /// Bases of the next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> ContigResult<Option<Vec<u8>>>;
}

/// Records held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: std::vec::IntoIter<Vec<u8>>,
}

impl MemorySource {
    pub fn new<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Vec<u8>>,
    {
        let records: Vec<Vec<u8>> = records.into_iter().map(Into::into).collect();
        Self {
            records: records.into_iter(),
        }
    }
}

impl SequenceSource for MemorySource {
    fn next_record(&mut self) -> ContigResult<Option<Vec<u8>>> {
        Ok(self.records.next())
    }
}

/// FASTA/FASTQ records, plain or gzipped, read through needletail
pub struct FastxSource {
    reader: Box<dyn FastxReader>,
}

impl FastxSource {
    pub fn open<P: AsRef<Path>>(path: P) -> ContigResult<Self> {
        let reader = parse_fastx_file(&path).map_err(|e| {
            ContigError::Parse(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(Self { reader })
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> ContigResult<Self> {
        let reader = parse_fastx_reader(reader).map_err(|e| ContigError::Parse(e.to_string()))?;
        Ok(Self { reader })
    }
}

impl SequenceSource for FastxSource {
    fn next_record(&mut self) -> ContigResult<Option<Vec<u8>>> {
        match self.reader.next() {
            None => Ok(None),
            Some(Ok(record)) => Ok(Some(record.seq().into_owned())),
            Some(Err(e)) => Err(ContigError::Parse(e.to_string())),
        }
    }
}

/// Locate a sequence file: `name` as given, else `name` inside `cpath`.
/// A genome skeleton is replaced by the sequence file it refers to, located
/// the same way.
pub fn resolve_sequence_path(name: &str, cpath: Option<&Path>) -> ContigResult<PathBuf> {
    let path = locate(name, cpath)?;
    match gdb_source(&path)? {
        Some(source) => {
            log::debug!("{} is a genome skeleton of {}", path.display(), source);
            locate(&source, cpath)
        }
        None => Ok(path),
    }
}

fn locate(name: &str, cpath: Option<&Path>) -> ContigResult<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Ok(direct);
    }
    let full_path = match cpath {
        Some(dir) => dir.join(name),
        None => direct,
    };
    if full_path.is_file() {
        Ok(full_path)
    } else {
        Err(ContigError::NotFound {
            name: name.to_string(),
            full_path,
        })
    }
}

/// The count-1 reference of a `.1gdb` file, or `None` if `path` is not one.
fn gdb_source(path: &Path) -> ContigResult<Option<String>> {
    let mut reader = open_text(path)?;
    let mut header = Vec::new();
    // sequence files may hold a whole chromosome on one line
    reader.by_ref().take(64).read_until(b'\n', &mut header)?;
    if !header.starts_with(GDB_HEADER) {
        return Ok(None);
    }

    for line in reader.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix('<') {
            let mut fields = Fields::new(rest);
            if let (Ok(name), Ok(1)) = (fields.string(), fields.int::<u64>()) {
                return Ok(Some(name.to_string()));
            }
        }
    }
    Err(ContigError::GdbReference {
        path: path.to_path_buf(),
    })
}

/// Open a sequence file as a contig reader, looking in `cpath` when `name`
/// is not found directly.
pub fn open_contigs(name: &str, cpath: Option<&Path>) -> ContigResult<ContigReader<FastxSource>> {
    let path = resolve_sequence_path(name, cpath)?;
    log::debug!("reading contigs from {}", path.display());
    Ok(ContigReader::new(FastxSource::open(&path)?))
}

/// Forward-only cursor over the contigs of a sequence source
pub struct ContigReader<S> {
    source: S,
    record: Vec<u8>,
    cursor: usize,
    contig: Range<usize>,
    index: Option<usize>,
}

impl<S: SequenceSource> ContigReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            record: Vec::new(),
            cursor: 0,
            contig: 0..0,
            index: None,
        }
    }

    /// Index of the contig the cursor is on, `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// Advance to the next contig. Returns `None` once the source is
    /// exhausted; the cursor then stays on the last contig.
    pub fn next_contig(&mut self) -> ContigResult<Option<&[u8]>> {
        let mut start = skip_gaps(&self.record, self.cursor);
        while start == self.record.len() {
            // a record without bases never replaces the current one
            match self.source.next_record()? {
                Some(record) => {
                    let first = skip_gaps(&record, 0);
                    if first < record.len() {
                        self.record = record;
                        start = first;
                    }
                }
                None => return Ok(None),
            }
        }

        let end = start
            + self.record[start..]
                .iter()
                .take_while(|&&b| is_base(b))
                .count();
        self.cursor = end;
        self.contig = start..end;
        self.index = Some(self.index.map_or(0, |i| i + 1));
        Ok(Some(&self.record[start..end]))
    }

    /// Bases of contig `index`, advancing as far as needed. Requesting the
    /// current contig again is allowed; requesting an earlier one is not.
    pub fn contig(&mut self, index: usize) -> ContigResult<&[u8]> {
        if let Some(current) = self.index {
            if index < current {
                return Err(ContigError::Backwards {
                    requested: index,
                    current,
                });
            }
        }
        while self.index != Some(index) {
            if self.next_contig()?.is_none() {
                return Err(ContigError::Exhausted {
                    requested: index,
                    reached: self.index.unwrap_or(0),
                });
            }
        }
        Ok(&self.record[self.contig.clone()])
    }

    /// Bases `[start, end)` of contig `index`.
    pub fn bases(&mut self, index: usize, start: GenomicPos, end: GenomicPos) -> ContigResult<&[u8]> {
        let contig = self.contig(index)?;
        let length = contig.len();
        if start > end || end > length as GenomicPos {
            return Err(ContigError::OutOfBounds {
                index,
                start,
                end,
                length,
            });
        }
        Ok(&contig[start as usize..end as usize])
    }
}

impl<S: SequenceSource> Iterator for ContigReader<S> {
    type Item = ContigResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_contig() {
            Ok(Some(contig)) => Some(Ok(contig.to_vec())),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
