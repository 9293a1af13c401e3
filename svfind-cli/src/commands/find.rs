//! Find command implementation - report insertions from a pairwise alignment file

use anyhow::{Result, Context};
use std::path::{Path, PathBuf};
use std::time::Instant;

use svfind_core::contig::{open_contigs, ContigReader, FastxSource};
use svfind_core::io::{AlnFile, AlnReader};
use svfind_core::{
    double_self_alignments, mirror_all, run_report, DetectParams, Overlap, SvHeader, SvWriter,
};

use crate::error::CliError;

const PROG_NAME: &str = "svfind";

/// Output requests for one run
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    /// Insertions in the first sequence set
    pub a: Option<PathBuf>,
    /// Insertions in the second sequence set
    pub b: Option<PathBuf>,
}

pub fn execute(
    params: &DetectParams,
    alignments: &Path,
    outputs: &Outputs,
    command_line: &str,
) -> Result<()> {
    let start = Instant::now();

    if outputs.a.is_none() && outputs.b.is_none() {
        log::warn!("no output requested; use -a and/or -b to write insertions");
    }

    if !alignments.exists() {
        return Err(CliError::file_not_found(alignments.to_path_buf()).into());
    }
    let mut aln = AlnReader::read_file(alignments)
        .with_context(|| format!("failed to open .1aln file {}", alignments.display()))?;
    log::info!("read {} overlaps", aln.overlaps.len());

    let first_db = aln
        .first_db
        .clone()
        .ok_or_else(|| CliError::validation(format!(
            "alignment file {} names no sequence file", alignments.display()
        )))?;
    let cpath = aln
        .cpath
        .clone()
        .or_else(|| alignments.parent().map(Path::to_path_buf));

    if outputs.b.is_some() && aln.second_db.is_none() {
        return Err(CliError::usage(format!(
            "-b not possible: input {} has no b source (it has self-a alignments only)",
            alignments.display()
        ))
        .into());
    }

    let header = SvHeader::new().with_provenance(PROG_NAME, env!("CARGO_PKG_VERSION"), command_line);

    if aln.is_self_alignment() {
        let n = double_self_alignments(&mut aln.overlaps);
        log::info!("self-alignment: doubled overlaps to {}", n);
    }
    log::info!("prepared overlaps in {:.2?}", start.elapsed());

    if let Some(path) = &outputs.a {
        let mut header = header.clone().with_reference(first_db.as_str(), 1);
        if let Some(second_db) = &aln.second_db {
            header = header.with_reference(second_db.as_str(), 2);
        }
        if let Some(dir) = &aln.cpath {
            header = header.with_reference(dir.to_string_lossy(), 3);
        }
        let contigs = open_sequences(&first_db, cpath.as_deref())?;
        write_report(&mut aln.overlaps, params, contigs, path, &header, &first_db)?;
    }

    if let Some(path) = &outputs.b {
        let second_db = second_db(&aln)?;
        let mut header = header
            .clone()
            .with_reference(second_db.as_str(), 1)
            .with_reference(first_db.as_str(), 2);
        if let Some(dir) = &aln.cpath {
            header = header.with_reference(dir.to_string_lossy(), 3);
        }
        let contigs = open_sequences(&second_db, cpath.as_deref())?;
        mirror_all(&mut aln.overlaps);
        write_report(&mut aln.overlaps, params, contigs, path, &header, &second_db)?;
    }

    log::info!("Total time: {:.2?}", start.elapsed());
    Ok(())
}

fn second_db(aln: &AlnFile) -> Result<String> {
    aln.second_db
        .clone()
        .ok_or_else(|| CliError::usage("alignment file names no second sequence file").into())
}

fn open_sequences(name: &str, cpath: Option<&Path>) -> Result<ContigReader<FastxSource>> {
    open_contigs(name, cpath).with_context(|| format!("failed to open {}", name))
}

fn write_report(
    overlaps: &mut [Overlap],
    params: &DetectParams,
    mut contigs: ContigReader<FastxSource>,
    path: &Path,
    header: &SvHeader,
    db_name: &str,
) -> Result<()> {
    let start = Instant::now();
    let mut out = SvWriter::create(path, header).map_err(|e| {
        CliError::io(format!("failed to open .1sv file {} to write: {}", path.display(), e))
    })?;

    let summary = run_report(overlaps, params, &mut contigs, &mut out)
        .with_context(|| format!("failed to report insertions in {}", db_name))?;
    let written = out.variant_count();
    out.finish()
        .with_context(|| format!("failed to write {}", path.display()))?;

    log::info!(
        "wrote {} insertions in {} to {}",
        written,
        db_name,
        path.display()
    );
    log::debug!(
        "{} candidate pairs, {} inserted bases",
        summary.candidates,
        summary.inserted_bases
    );
    log::info!("report took {:.2?}", start.elapsed());
    Ok(())
}
