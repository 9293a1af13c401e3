//! Structural-variant file writer and reader
//!
//! Output files are ASCII `.1sv` files. After the header (file type,
//! provenance, references to the source sequence files) come the two global
//! policy values and then four lines per insertion:
//!
//! ```text
//! o 50                        maximum overhang
//! i 50000                     maximum insert size
//! V 3 1000 1250               variant: sequence, start, end
//! B 7 500 510                 flank match: sequence, start, end
//! S 250 acgt...               inserted bases, lower case
//! I 21 3:1000-1250_7:500-510  identifier
//! ```

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::{open_text, Fields};
use crate::types::{GenomicInterval, GenomicPos, Insertion};

const PRIMARY_TYPE: &str = "seq";
const SECONDARY_TYPE: &str = "sv";
const FORMAT_MAJOR: u32 = 1;
const FORMAT_MINOR: u32 = 0;

#[derive(Debug, Error)]
pub enum SvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

pub type SvResult<T> = Result<T, SvError>;

/// Which program wrote a file, and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub program: String,
    pub version: String,
    pub command_line: String,
    pub date: String,
}

/// A file the output refers to; `count` gives its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvHeader {
    pub provenance: Vec<Provenance>,
    pub references: Vec<Reference>,
}

impl SvHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provenance line stamped with the current local time.
    pub fn with_provenance(mut self, program: &str, version: &str, command_line: &str) -> Self {
        self.provenance.push(Provenance {
            program: program.to_string(),
            version: version.to_string(),
            command_line: command_line.to_string(),
            date: chrono::Local::now().format("%Y-%m-%d_%H:%M:%S").to_string(),
        });
        self
    }

    pub fn with_reference<S: Into<String>>(mut self, name: S, count: u64) -> Self {
        self.references.push(Reference {
            name: name.into(),
            count,
        });
        self
    }
}

/// One line of a `.1sv` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvRecord {
    Provenance(Provenance),
    Reference(Reference),
    MaxOverhang(GenomicPos),
    MaxSize(GenomicPos),
    Variant(GenomicInterval),
    Flank(GenomicInterval),
    Sequence(String),
    Identifier(String),
}

/// Writer for `.1sv` files
pub struct SvWriter<W: Write> {
    inner: W,
    variants: usize,
}

impl SvWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P, header: &SvHeader) -> SvResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write> SvWriter<W> {
    /// Wrap `inner` and write the header immediately.
    pub fn new(mut inner: W, header: &SvHeader) -> SvResult<Self> {
        writeln!(
            inner,
            "1 {} {} {} {}",
            PRIMARY_TYPE.len(),
            PRIMARY_TYPE,
            FORMAT_MAJOR,
            FORMAT_MINOR
        )?;
        writeln!(inner, "2 {} {}", SECONDARY_TYPE.len(), SECONDARY_TYPE)?;
        for p in &header.provenance {
            write!(inner, "! 4")?;
            for field in [&p.program, &p.version, &p.command_line, &p.date] {
                write!(inner, " {} {}", field.len(), field)?;
            }
            writeln!(inner)?;
        }
        for r in &header.references {
            writeln!(inner, "< {} {} {}", r.name.len(), r.name, r.count)?;
        }
        Ok(Self { inner, variants: 0 })
    }

    pub fn write_max_overhang(&mut self, max_overhang: GenomicPos) -> SvResult<()> {
        writeln!(self.inner, "o {}", max_overhang)?;
        Ok(())
    }

    pub fn write_max_size(&mut self, max_size: GenomicPos) -> SvResult<()> {
        writeln!(self.inner, "i {}", max_size)?;
        Ok(())
    }

    pub fn write_variant(&mut self, interval: &GenomicInterval) -> SvResult<()> {
        self.write_interval('V', interval)?;
        self.variants += 1;
        Ok(())
    }

    pub fn write_flank(&mut self, interval: &GenomicInterval) -> SvResult<()> {
        self.write_interval('B', interval)
    }

    /// Bases are written in lower case whatever their case in the source.
    pub fn write_sequence(&mut self, bases: &[u8]) -> SvResult<()> {
        write!(self.inner, "S {} ", bases.len())?;
        self.inner.write_all(&bases.to_ascii_lowercase())?;
        writeln!(self.inner)?;
        Ok(())
    }

    pub fn write_identifier(&mut self, identifier: &str) -> SvResult<()> {
        writeln!(self.inner, "I {} {}", identifier.len(), identifier)?;
        Ok(())
    }

    /// The four records of one insertion, in file order.
    pub fn write_insertion(&mut self, insertion: &Insertion, bases: &[u8]) -> SvResult<()> {
        self.write_variant(&insertion.insert)?;
        self.write_flank(&insertion.flank)?;
        self.write_sequence(bases)?;
        self.write_identifier(&insertion.identifier())
    }

    /// Number of variant records written so far.
    pub fn variant_count(&self) -> usize {
        self.variants
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> SvResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_interval(&mut self, kind: char, interval: &GenomicInterval) -> SvResult<()> {
        writeln!(
            self.inner,
            "{} {} {} {}",
            kind, interval.contig_id, interval.start, interval.end
        )?;
        Ok(())
    }
}

/// Reader for `.1sv` files
pub struct SvReader;

impl SvReader {
    pub fn read_file<P: AsRef<Path>>(path: P) -> SvResult<Vec<SvRecord>> {
        Self::parse_reader(open_text(path)?)
    }

    pub fn parse_reader<R: BufRead>(reader: R) -> SvResult<Vec<SvRecord>> {
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let mut chars = line.chars();
            let kind = match chars.next() {
                Some(c) => c,
                None => continue,
            };
            let mut fields = Fields::new(chars.as_str());
            let record = Self::parse_record(kind, &mut fields).map_err(|message| {
                SvError::Malformed {
                    line: line_num + 1,
                    message,
                }
            })?;
            if let Some(record) = record {
                records.push(record);
            }
        }

        Ok(records)
    }

    fn parse_record(kind: char, fields: &mut Fields<'_>) -> Result<Option<SvRecord>, String> {
        let record = match kind {
            '!' => {
                let _count: u32 = fields.int()?;
                SvRecord::Provenance(Provenance {
                    program: fields.string()?.to_string(),
                    version: fields.string()?.to_string(),
                    command_line: fields.string()?.to_string(),
                    date: fields.string()?.to_string(),
                })
            }
            '<' => SvRecord::Reference(Reference {
                name: fields.string()?.to_string(),
                count: fields.int()?,
            }),
            'o' => SvRecord::MaxOverhang(fields.int()?),
            'i' => SvRecord::MaxSize(fields.int()?),
            'V' => SvRecord::Variant(Self::interval(fields)?),
            'B' => SvRecord::Flank(Self::interval(fields)?),
            'S' => SvRecord::Sequence(fields.string()?.to_string()),
            'I' => SvRecord::Identifier(fields.string()?.to_string()),
            _ => return Ok(None),
        };
        Ok(Some(record))
    }

    fn interval(fields: &mut Fields<'_>) -> Result<GenomicInterval, String> {
        Ok(GenomicInterval::new(fields.int()?, fields.int()?, fields.int()?))
    }
}
