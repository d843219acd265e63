//! Dense Smith-Waterman score/direction matrix and the cell update rule.
//!
//! Both fill drivers in [`crate::strategy`] call [`compute_cell`]; it is the
//! only place where a cell value is derived, so the two schedules cannot
//! drift apart.

use crate::scoring::{Position, ScoringPolicy};
use crate::AlignerError;

/// Move that produced a cell's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Start of a local alignment (score 0) or a boundary cell.
    #[default]
    None,
    /// Residue of sequence 1 aligned to residue of sequence 2.
    Diag,
    /// Residue of sequence 1 aligned to a gap.
    Up,
    /// Gap aligned to a residue of sequence 2.
    Left,
}

/// Order in which equally-scoring predecessors are preferred.
///
/// When two or more candidates reach the cell maximum, the earliest entry
/// here wins. Changing it changes the traceback path of tied cells.
pub const TIE_BREAK_ORDER: [Direction; 3] = [Direction::Diag, Direction::Up, Direction::Left];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCell {
    pub score: i32,
    pub direction: Direction,
}

/// `(len1 + 1) x (len2 + 1)` grid stored row-major. Row 0 and column 0 stay
/// at `(0, None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    cells: Vec<ScoreCell>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    pub fn new(len1: usize, len2: usize) -> Result<Self, AlignerError> {
        let too_large = || AlignerError::MatrixTooLarge {
            rows: len1.saturating_add(1),
            cols: len2.saturating_add(1),
        };
        let rows = len1.checked_add(1).ok_or_else(too_large)?;
        let cols = len2.checked_add(1).ok_or_else(too_large)?;
        let size = rows.checked_mul(cols).ok_or_else(too_large)?;
        let bytes = size
            .checked_mul(std::mem::size_of::<ScoreCell>())
            .ok_or_else(too_large)?;
        if bytes > isize::MAX as usize {
            return Err(too_large());
        }

        let mut cells = Vec::new();
        cells.try_reserve_exact(size).map_err(|_| too_large())?;
        cells.resize(size, ScoreCell::default());

        Ok(Self { cells, rows, cols })
    }

    /// Length of sequence 1.
    pub fn len1(&self) -> usize {
        self.rows - 1
    }

    /// Length of sequence 2.
    pub fn len2(&self) -> usize {
        self.cols - 1
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> ScoreCell {
        self.cells[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, cell: ScoreCell) {
        self.cells[i * self.cols + j] = cell;
    }

    pub fn row(&self, i: usize) -> &[ScoreCell] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// Highest-scoring interior cell, first in row-major order on ties.
    ///
    /// Returns `None` when no cell scores above zero.
    pub fn best_cell(&self) -> Option<(i32, Position)> {
        let mut best: Option<(i32, Position)> = None;
        for i in 1..self.rows {
            for (j, cell) in self.row(i).iter().enumerate().skip(1) {
                let current = best.map_or(0, |(score, _)| score);
                if cell.score > current {
                    best = Some((cell.score, Position::new(i, j)));
                }
            }
        }
        best
    }
}

/// Rejects scores that could overflow `i32` somewhere in the matrix.
///
/// A cell score is bounded by `max_step` times the length of the path that
/// reaches it, which never exceeds `len1 + len2` columns. Negative steps
/// cannot underflow because every predecessor score is at least 0.
pub fn check_score_range<S: ScoringPolicy + ?Sized>(
    len1: usize,
    len2: usize,
    scoring: &S,
) -> Result<(), AlignerError> {
    let step = u128::from(scoring.max_step().max(0).unsigned_abs());
    let columns = len1 as u128 + len2 as u128;
    if step * columns > i32::MAX as u128 {
        return Err(AlignerError::InvalidParameter(format!(
            "column score {} over {} + {} residues overflows the score range",
            scoring.max_step(),
            len1,
            len2
        )));
    }
    Ok(())
}

/// Derives cell `(i, j)` from its three already-final predecessors.
///
/// Reads only `(i-1, j-1)`, `(i-1, j)` and `(i, j-1)`, and writes nothing, so
/// any set of cells whose predecessors are final may be evaluated concurrently.
#[inline]
pub fn compute_cell<S: ScoringPolicy + ?Sized>(
    matrix: &Matrix,
    seq1: &[u8],
    seq2: &[u8],
    scoring: &S,
    i: usize,
    j: usize,
) -> ScoreCell {
    let diag = matrix.get(i - 1, j - 1).score + scoring.score(seq1[i - 1], seq2[j - 1]);
    let up = matrix.get(i - 1, j).score + scoring.gap_penalty();
    let left = matrix.get(i, j - 1).score + scoring.gap_penalty();

    let mut best = ScoreCell::default();
    for direction in TIE_BREAK_ORDER {
        let candidate = match direction {
            Direction::Diag => diag,
            Direction::Up => up,
            Direction::Left => left,
            Direction::None => 0,
        };
        // strict comparison keeps the earlier direction on ties
        if candidate > best.score {
            best = ScoreCell {
                score: candidate,
                direction,
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::LinearScoring;

    #[test]
    fn new_matrix_is_all_boundary_cells() {
        let matrix = Matrix::new(3, 4).unwrap();
        assert_eq!(matrix.len1(), 3);
        assert_eq!(matrix.len2(), 4);
        for i in 0..=3 {
            for j in 0..=4 {
                assert_eq!(matrix.get(i, j), ScoreCell::default());
            }
        }
        assert_eq!(matrix.best_cell(), None);
    }

    #[test]
    fn oversized_matrix_is_rejected() {
        let err = Matrix::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, AlignerError::MatrixTooLarge { .. }));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn matrix_whose_byte_size_overflows_is_rejected() {
        // the cell count fits in usize, its size in bytes does not
        let err = Matrix::new(1 << 31, 1 << 31).unwrap_err();
        assert!(matches!(err, AlignerError::MatrixTooLarge { .. }));
    }

    #[test]
    fn score_range_check() {
        let big = LinearScoring::new(i32::MAX / 2 + 1, -1, -1).unwrap();
        let err = check_score_range(2, 2, &big).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidParameter(_)));

        let fits = LinearScoring::new(i32::MAX / 4, -1, -1).unwrap();
        assert!(check_score_range(2, 2, &fits).is_ok());
        assert!(check_score_range(10_000, 10_000, &LinearScoring::default()).is_ok());

        // very negative scores never overflow
        let harsh = LinearScoring::new(1, i32::MIN, i32::MIN).unwrap();
        assert!(check_score_range(100, 100, &harsh).is_ok());
    }

    #[test]
    fn compute_cell_prefers_diagonal_on_ties() {
        // diag: 0 + 2 = 2, up: 3 - 1 = 2, left: 3 - 1 = 2
        let mut matrix = Matrix::new(2, 2).unwrap();
        let three = ScoreCell {
            score: 3,
            direction: Direction::Diag,
        };
        matrix.set(1, 2, three);
        matrix.set(2, 1, three);
        let cell = compute_cell(&matrix, b"AA", b"AA", &LinearScoring::default(), 2, 2);
        assert_eq!(cell.score, 2);
        assert_eq!(cell.direction, Direction::Diag);
    }

    #[test]
    fn compute_cell_prefers_up_over_left() {
        let mut matrix = Matrix::new(2, 2).unwrap();
        matrix.set(
            1,
            2,
            ScoreCell {
                score: 4,
                direction: Direction::Diag,
            },
        );
        matrix.set(
            2,
            1,
            ScoreCell {
                score: 4,
                direction: Direction::Diag,
            },
        );
        // mismatch on the diagonal: 0 - 1
        let cell = compute_cell(&matrix, b"AC", b"AG", &LinearScoring::default(), 2, 2);
        assert_eq!(cell.score, 3);
        assert_eq!(cell.direction, Direction::Up);
    }

    #[test]
    fn zero_score_has_no_direction() {
        let matrix = Matrix::new(1, 1).unwrap();
        let cell = compute_cell(&matrix, b"A", b"T", &LinearScoring::default(), 1, 1);
        assert_eq!(cell, ScoreCell::default());
    }

    #[test]
    fn best_cell_takes_first_in_row_major_order() {
        let mut matrix = Matrix::new(3, 3).unwrap();
        let five = ScoreCell {
            score: 5,
            direction: Direction::Diag,
        };
        matrix.set(3, 1, five);
        matrix.set(2, 3, five);
        matrix.set(
            1,
            1,
            ScoreCell {
                score: 2,
                direction: Direction::Diag,
            },
        );
        assert_eq!(matrix.best_cell(), Some((5, Position::new(2, 3))));
    }
}
