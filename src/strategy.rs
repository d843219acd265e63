use std::fmt;
use std::str::FromStr;

use crate::matrix::{check_score_range, compute_cell, Matrix};
use crate::scoring::ScoringPolicy;
use crate::AlignerError;

/// Order in which matrix cells are filled. Both produce identical matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStrategy {
    /// Row-major loop on the calling thread.
    Sequential,
    /// Anti-diagonal sweep, cells of one diagonal computed in parallel.
    #[default]
    Wavefront,
}

impl FillStrategy {
    /// Label used in the execution-time line.
    pub fn label(&self) -> &'static str {
        match self {
            FillStrategy::Sequential => "CPU",
            FillStrategy::Wavefront => "Wavefront",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Sequential => write!(f, "sequential"),
            FillStrategy::Wavefront => write!(f, "wavefront"),
        }
    }
}

impl FromStr for FillStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "seq" | "cpu" => Ok(FillStrategy::Sequential),
            "wavefront" | "diagonal" | "parallel" => Ok(FillStrategy::Wavefront),
            other => Err(format!(
                "unknown fill strategy '{}', expected 'sequential' or 'wavefront'",
                other
            )),
        }
    }
}

/// Fills the matrix row by row, left to right.
pub fn fill_sequential<S: ScoringPolicy + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &S,
) -> Result<Matrix, AlignerError> {
    check_score_range(seq1.len(), seq2.len(), scoring)?;
    let mut matrix = Matrix::new(seq1.len(), seq2.len())?;

    for i in 1..=seq1.len() {
        for j in 1..=seq2.len() {
            let cell = compute_cell(&matrix, seq1, seq2, scoring, i, j);
            matrix.set(i, j, cell);
        }
    }

    Ok(matrix)
}
