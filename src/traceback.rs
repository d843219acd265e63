use crate::matrix::{Direction, Matrix};
use crate::scoring::{AlignmentStats, Position};

/// Gap byte used in aligned sequences. The MSF writer renders it as `.`.
pub const GAP: u8 = b'-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Residue only in sequence 2 (gap in sequence 1).
    Insertion,
    /// Residue only in sequence 1 (gap in sequence 2).
    Deletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub aligned_seq1: Vec<u8>,
    pub aligned_seq2: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
    /// Cell where the traceback stopped; residues before it are unaligned.
    pub start_position: Position,
    /// Best-scoring cell where the traceback began.
    pub end_position: Position,
}

impl AlignmentResult {
    pub fn empty() -> Self {
        Self {
            score: 0,
            aligned_seq1: Vec::new(),
            aligned_seq2: Vec::new(),
            operations: Vec::new(),
            start_position: Position::default(),
            end_position: Position::default(),
        }
    }

    /// Number of aligned columns.
    pub fn len(&self) -> usize {
        self.aligned_seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_seq1.is_empty()
    }

    pub fn stats(&self) -> AlignmentStats {
        self.operations
            .iter()
            .fold(AlignmentStats::default(), |mut acc, op| {
                match op {
                    TracebackOperation::Match => acc.matches += 1,
                    TracebackOperation::Mismatch => acc.mismatches += 1,
                    TracebackOperation::Insertion | TracebackOperation::Deletion => acc.gaps += 1,
                }
                acc
            })
    }
}

pub struct Traceback<'a> {
    matrix: &'a Matrix,
    seq1: &'a [u8],
    seq2: &'a [u8],
}

impl<'a> Traceback<'a> {
    pub fn new(matrix: &'a Matrix, seq1: &'a [u8], seq2: &'a [u8]) -> Self {
        Self { matrix, seq1, seq2 }
    }

    /// Walks stored directions back from `end` until a cell without a
    /// direction, or a zero-score cell, is reached.
    pub fn reconstruct_alignment(&self, score: i32, end: Position) -> AlignmentResult {
        let mut aligned_seq1 = Vec::new();
        let mut aligned_seq2 = Vec::new();
        let mut operations = Vec::new();

        let mut current = end;
        loop {
            let cell = self.matrix.get(current.i, current.j);
            match cell.direction {
                Direction::None => break,
                Direction::Diag => {
                    let a = self.seq1[current.i - 1];
                    let b = self.seq2[current.j - 1];
                    aligned_seq1.push(a);
                    aligned_seq2.push(b);
                    operations.push(if a.eq_ignore_ascii_case(&b) {
                        TracebackOperation::Match
                    } else {
                        TracebackOperation::Mismatch
                    });
                    current.i -= 1;
                    current.j -= 1;
                }
                Direction::Up => {
                    aligned_seq1.push(self.seq1[current.i - 1]);
                    aligned_seq2.push(GAP);
                    operations.push(TracebackOperation::Deletion);
                    current.i -= 1;
                }
                Direction::Left => {
                    aligned_seq1.push(GAP);
                    aligned_seq2.push(self.seq2[current.j - 1]);
                    operations.push(TracebackOperation::Insertion);
                    current.j -= 1;
                }
            }
            if self.matrix.get(current.i, current.j).score == 0 {
                break;
            }
        }

        // built end-to-first
        aligned_seq1.reverse();
        aligned_seq2.reverse();
        operations.reverse();

        AlignmentResult {
            score,
            aligned_seq1,
            aligned_seq2,
            operations,
            start_position: current,
            end_position: end,
        }
    }
}
