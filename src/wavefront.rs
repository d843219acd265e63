//! Anti-diagonal ("wavefront") matrix fill.
//!
//! Cell `(i, j)` only depends on cells whose `i + j` is one or two smaller, so
//! every cell of diagonal `d = i + j` can be computed independently once
//! diagonals `d - 1` and `d - 2` are final. Each diagonal is fanned out over
//! a rayon pool and collected before the next one starts; the collect is the
//! barrier between diagonals.

use log::{debug, trace};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::ParallelConfig;
use crate::matrix::{check_score_range, compute_cell, Matrix, ScoreCell};
use crate::scoring::ScoringPolicy;
use crate::AlignerError;

/// Inclusive range of `i` on anti-diagonal `d` of a `len1 x len2` interior.
///
/// `d` must be in `2..=len1 + len2`.
pub fn diagonal_bounds(d: usize, len1: usize, len2: usize) -> (usize, usize) {
    let lo = d.saturating_sub(len2).max(1);
    let hi = len1.min(d - 1);
    (lo, hi)
}

/// Wavefront driver owning its worker pool.
pub struct WavefrontFiller {
    pool: ThreadPool,
    min_parallel_cells: usize,
}

impl WavefrontFiller {
    pub fn new(config: &ParallelConfig) -> Result<Self, AlignerError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|idx| format!("wavefront-{}", idx));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        debug!(
            "Wavefront pool ready: {} threads, diagonals below {} cells run inline",
            pool.current_num_threads(),
            config.min_parallel_cells
        );

        Ok(Self {
            pool,
            min_parallel_cells: config.min_parallel_cells,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn fill<S: ScoringPolicy + ?Sized>(
        &self,
        seq1: &[u8],
        seq2: &[u8],
        scoring: &S,
    ) -> Result<Matrix, AlignerError> {
        let (len1, len2) = (seq1.len(), seq2.len());
        check_score_range(len1, len2, scoring)?;
        let mut matrix = Matrix::new(len1, len2)?;
        if len1 == 0 || len2 == 0 {
            return Ok(matrix);
        }

        let min_parallel_cells = self.min_parallel_cells;
        let mut diagonal: Vec<ScoreCell> = Vec::with_capacity(len1.min(len2));
        let mut parallel_diagonals = 0usize;

        self.pool.install(|| {
            for d in 2..=len1 + len2 {
                let (lo, hi) = diagonal_bounds(d, len1, len2);
                let cells = hi + 1 - lo;

                if cells >= min_parallel_cells {
                    let snapshot = &matrix;
                    (lo..hi + 1)
                        .into_par_iter()
                        .map(|i| compute_cell(snapshot, seq1, seq2, scoring, i, d - i))
                        .collect_into_vec(&mut diagonal);
                    parallel_diagonals += 1;
                } else {
                    diagonal.clear();
                    diagonal.extend(
                        (lo..hi + 1).map(|i| compute_cell(&matrix, seq1, seq2, scoring, i, d - i)),
                    );
                }

                for (offset, cell) in diagonal.iter().enumerate() {
                    let i = lo + offset;
                    matrix.set(i, d - i, *cell);
                }
                trace!("diagonal {} done: i in [{}, {}]", d, lo, hi);
            }
        });

        debug!(
            "Filled {} diagonals, {} of them in parallel",
            len1 + len2 - 1,
            parallel_diagonals
        );

        Ok(matrix)
    }
}
