use crate::{AlignerError, DEFAULT_GAP, DEFAULT_MATCH, DEFAULT_MISMATCH};

/// Residue-pair scoring used by the matrix fill.
///
/// Implementations must be pure: the wavefront driver calls them from many
/// worker threads at once without synchronization.
pub trait ScoringPolicy: Sync {
    /// Score for aligning residue `a` against residue `b`.
    fn score(&self, a: u8, b: u8) -> i32;

    /// Score charged for every single gap column, regardless of run length.
    fn gap_penalty(&self) -> i32;

    /// Largest score any single column can add, gap columns included.
    fn max_step(&self) -> i32;
}

/// Match/mismatch scoring with a linear gap penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearScoring {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap: i32,
}

impl Default for LinearScoring {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH,
            mismatch_score: DEFAULT_MISMATCH,
            gap: DEFAULT_GAP,
        }
    }
}

impl LinearScoring {
    pub fn new(match_score: i32, mismatch_score: i32, gap: i32) -> Result<Self, AlignerError> {
        if match_score <= 0 {
            return Err(AlignerError::InvalidParameter(format!(
                "match score must be positive, got {}",
                match_score
            )));
        }
        if gap > 0 {
            return Err(AlignerError::InvalidParameter(format!(
                "gap score must not be positive, got {}",
                gap
            )));
        }
        Ok(Self {
            match_score,
            mismatch_score,
            gap,
        })
    }
}

impl ScoringPolicy for LinearScoring {
    #[inline]
    fn score(&self, a: u8, b: u8) -> i32 {
        if a.eq_ignore_ascii_case(&b) {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    #[inline]
    fn gap_penalty(&self) -> i32 {
        self.gap
    }

    fn max_step(&self) -> i32 {
        self.match_score.max(self.mismatch_score).max(self.gap)
    }
}

/// Matrix coordinate; `i` indexes the first sequence, `j` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
    pub execution_time_ms: f32,
}

impl AlignmentStats {
    /// Fraction of aligned columns that are identical residues.
    pub fn identity(&self) -> f64 {
        let columns = self.matches + self.mismatches + self.gaps;
        if columns == 0 {
            0.0
        } else {
            f64::from(self.matches) / f64::from(columns)
        }
    }
}
