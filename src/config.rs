use crate::AlignerError;

/// Diagonals with fewer cells than this are computed on the calling thread.
pub const DEFAULT_MIN_PARALLEL_CELLS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Worker threads for the wavefront fill; `None` uses every logical CPU.
    pub threads: Option<usize>,
    pub min_parallel_cells: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threads: None,
            min_parallel_cells: DEFAULT_MIN_PARALLEL_CELLS,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(mut self, threads: usize) -> Result<Self, AlignerError> {
        if threads == 0 {
            return Err(AlignerError::InvalidParameter(
                "thread count must be at least 1".to_string(),
            ));
        }
        self.threads = Some(threads);
        Ok(self)
    }

    pub fn with_min_parallel_cells(mut self, cells: usize) -> Self {
        self.min_parallel_cells = cells.max(1);
        self
    }
}
