use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};
use thiserror::Error;

pub mod batch;
pub mod config;
pub mod fasta;
pub mod matrix;
pub mod msf;
pub mod scoring;
pub mod strategy;
pub mod traceback;
pub mod wavefront;

pub use crate::config::ParallelConfig;
pub use crate::matrix::{Direction, Matrix, ScoreCell, TIE_BREAK_ORDER};
pub use crate::msf::{checksum, pairwise_checksum, write_msf, write_report, SequenceType};
pub use crate::scoring::{AlignmentStats, LinearScoring, Position, ScoringPolicy};
pub use crate::strategy::FillStrategy;
pub use crate::traceback::{AlignmentResult, Traceback, TracebackOperation};
pub use crate::wavefront::WavefrontFiller;

// Scoring parameters of the reference runs
pub const DEFAULT_MATCH: i32 = 2;
pub const DEFAULT_MISMATCH: i32 = -1;
pub const DEFAULT_GAP: i32 = -1;

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Cannot read {path}: {source}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Sequence '{0}' is empty")]
    EmptySequence(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Matrix of {rows} x {cols} cells is too large")]
    MatrixTooLarge { rows: usize, cols: usize },
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named residue string. Residues are upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_ascii_uppercase(),
        }
    }

    /// Loads the first record of a FASTA file and names it after the header,
    /// or the file name when the header carries none.
    pub fn from_file(path: &Path) -> Result<Self, AlignerError> {
        let (header_name, residues) = fasta::read_sequence(path)?;
        let name = fasta::display_name(header_name.as_deref(), path);
        Ok(Self::new(&name, &residues))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residues(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignerParameters {
    strategy: FillStrategy,
    parallel: ParallelConfig,
}

impl AlignerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: FillStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Result<Self, AlignerError> {
        self.parallel = self.parallel.with_threads(threads)?;
        Ok(self)
    }

    pub fn with_min_parallel_cells(mut self, cells: usize) -> Self {
        self.parallel = self.parallel.with_min_parallel_cells(cells);
        self
    }

    pub fn strategy(&self) -> FillStrategy {
        self.strategy
    }

    pub fn parallel(&self) -> &ParallelConfig {
        &self.parallel
    }
}

/// Smith-Waterman local aligner.
///
/// The wavefront pool is built once per aligner and reused across calls.
pub struct Aligner<S: ScoringPolicy = LinearScoring> {
    params: AlignerParameters,
    scoring: S,
    wavefront: Option<WavefrontFiller>,
}

impl Aligner<LinearScoring> {
    pub fn new(params: AlignerParameters) -> Result<Self, AlignerError> {
        Self::with_scoring(params, LinearScoring::default())
    }
}

impl<S: ScoringPolicy> Aligner<S> {
    pub fn with_scoring(params: AlignerParameters, scoring: S) -> Result<Self, AlignerError> {
        let wavefront = match params.strategy() {
            FillStrategy::Wavefront => Some(WavefrontFiller::new(params.parallel())?),
            FillStrategy::Sequential => None,
        };

        Ok(Self {
            params,
            scoring,
            wavefront,
        })
    }

    pub fn strategy(&self) -> FillStrategy {
        self.params.strategy
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    /// Fills the score/direction matrix with the configured strategy.
    pub fn fill(&self, seq1: &[u8], seq2: &[u8]) -> Result<Matrix, AlignerError> {
        match &self.wavefront {
            Some(wavefront) => wavefront.fill(seq1, seq2, &self.scoring),
            None => strategy::fill_sequential(seq1, seq2, &self.scoring),
        }
    }

    pub fn align(&self, seq1: &Sequence, seq2: &Sequence) -> Result<AlignmentResult, AlignerError> {
        for seq in [seq1, seq2] {
            if seq.is_empty() {
                return Err(AlignerError::EmptySequence(seq.name().to_string()));
            }
        }

        let start_time = Instant::now();
        debug!(
            "Aligning {} ({} residues) against {} ({} residues), {} fill",
            seq1.name(),
            seq1.len(),
            seq2.name(),
            seq2.len(),
            self.params.strategy
        );

        let matrix = self.fill(seq1.residues(), seq2.residues())?;
        let result = match matrix.best_cell() {
            Some((score, end)) => {
                Traceback::new(&matrix, seq1.residues(), seq2.residues())
                    .reconstruct_alignment(score, end)
            }
            None => AlignmentResult::empty(),
        };

        let stats = AlignmentStats {
            execution_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
            ..result.stats()
        };
        info!(
            "Score {} over {} columns: {} matches, {} mismatches, {} gaps ({:.1}% identity) in {:.3} ms",
            result.score,
            result.len(),
            stats.matches,
            stats.mismatches,
            stats.gaps,
            stats.identity() * 100.0,
            stats.execution_time_ms
        );

        Ok(result)
    }
}
