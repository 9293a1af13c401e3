//! Line-record file I/O for svfind
//!
//! Both the alignment input and the variant output are ONE-style ASCII files:
//! one record per line, a single-character record type first, then
//! space-separated fields. Integers are written in decimal; strings and
//! sequences are written as a length followed by the bytes.

pub mod aln;
pub mod sv;

pub use aln::{AlnError, AlnFile, AlnReader};
pub use sv::{SvError, SvHeader, SvReader, SvRecord, SvWriter};

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

/// Open a text file for buffered reading, decompressing `.gz` files.
pub(crate) fn open_text<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(&path)?;
    let path_str = path.as_ref().to_string_lossy();

    let reader: Box<dyn Read> = if path_str.ends_with(".gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Cursor over the fields of one record line, after the type character
pub(crate) struct Fields<'a> {
    rest: &'a str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn token(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }

    pub(crate) fn int<T: std::str::FromStr>(&mut self) -> Result<T, String> {
        let token = self.token().ok_or_else(|| "missing integer field".to_string())?;
        token
            .parse::<T>()
            .map_err(|_| format!("invalid integer '{}'", token))
    }

    /// A length-prefixed string; the bytes follow the length after exactly
    /// one space and may themselves contain spaces.
    pub(crate) fn string(&mut self) -> Result<&'a str, String> {
        let len: usize = self.int()?;
        let body = self
            .rest
            .strip_prefix(' ')
            .ok_or_else(|| format!("missing string of length {}", len))?;
        if body.len() < len || !body.is_char_boundary(len) {
            return Err(format!("string shorter than declared length {}", len));
        }
        let (value, rest) = body.split_at(len);
        self.rest = rest;
        Ok(value)
    }
}
