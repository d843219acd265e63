//! All-pairs alignment over a directory tree.
//!
//! Every subdirectory of the input root is a group of single-sequence FASTA
//! files. Each unordered pair in a group is aligned and written to
//! `<output_root>/<group>/<group>_<stem1>__<stem2>.msf`. Pairs run in
//! parallel; a pair that fails is logged and skipped.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::fasta::base_name;
use crate::msf::write_report;
use crate::scoring::ScoringPolicy;
use crate::{Aligner, AlignerError, Sequence};

pub const FASTA_EXTENSIONS: [&str; 2] = ["fa", "fasta"];

/// One pair of input files and the report it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairJob {
    pub group: String,
    pub seq1: PathBuf,
    pub seq2: PathBuf,
    pub output: PathBuf,
}

pub fn is_fasta(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| FASTA_EXTENSIONS.contains(&ext.as_str()))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AlignerError> {
    let unavailable = |source: std::io::Error| AlignerError::InputUnavailable {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(unavailable)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(unavailable)?;
    entries.sort();
    Ok(entries)
}

/// Lists every unordered pair of FASTA files per subdirectory of `input_root`,
/// in sorted order. Files directly under `input_root` are ignored.
pub fn plan_pairs(input_root: &Path, output_root: &Path) -> Result<Vec<PairJob>, AlignerError> {
    let mut jobs = Vec::new();

    for group_dir in sorted_entries(input_root)? {
        if !group_dir.is_dir() {
            continue;
        }
        let group = group_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let fastas: Vec<PathBuf> = sorted_entries(&group_dir)?
            .into_iter()
            .filter(|path| path.is_file() && is_fasta(path))
            .collect();

        for (idx, seq1) in fastas.iter().enumerate() {
            for seq2 in &fastas[idx + 1..] {
                let file_name = format!("{}_{}__{}.msf", group, base_name(seq1), base_name(seq2));
                jobs.push(PairJob {
                    group: group.clone(),
                    seq1: seq1.clone(),
                    seq2: seq2.clone(),
                    output: output_root.join(&group).join(file_name),
                });
            }
        }
    }

    Ok(jobs)
}

/// Aligns one pair and writes its report.
pub fn run_pair<S: ScoringPolicy>(aligner: &Aligner<S>, job: &PairJob) -> Result<(), AlignerError> {
    let seq1 = Sequence::from_file(&job.seq1)?;
    let seq2 = Sequence::from_file(&job.seq2)?;
    let result = aligner.align(&seq1, &seq2)?;

    if let Some(dir) = job.output.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut writer = BufWriter::new(File::create(&job.output)?);
    write_report(&mut writer, seq1.name(), seq2.name(), &result)?;
    writer.flush()?;

    Ok(())
}

/// Runs all jobs in parallel and returns how many reports were written.
pub fn run_batch<S: ScoringPolicy>(aligner: &Aligner<S>, jobs: &[PairJob]) -> usize {
    jobs.par_iter()
        .filter(|job| match run_pair(aligner, job) {
            Ok(()) => {
                info!("Wrote {}", job.output.display());
                true
            }
            Err(err) => {
                warn!(
                    "Skipping {} vs {}: {}",
                    job.seq1.display(),
                    job.seq2.display(),
                    err
                );
                false
            }
        })
        .count()
}
