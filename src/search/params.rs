use crate::motif::{check_pseudocount, Corpus, ScoreMetric};
use crate::utils::{MotifError, Result};

pub const DEFAULT_PSEUDOCOUNT: f64 = 1.0;

/// Parameters shared by every searcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub motif_width: usize,
    pub pseudocount: f64,
    pub metric: ScoreMetric,
}

impl SearchParams {
    pub fn new(motif_width: usize) -> Self {
        Self {
            motif_width,
            pseudocount: DEFAULT_PSEUDOCOUNT,
            metric: ScoreMetric::default(),
        }
    }

    pub fn validate(&self, corpus: &Corpus) -> Result<()> {
        corpus.validate_width(self.motif_width)?;
        check_pseudocount(self.pseudocount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyParams {
    /// Cap on full refinement passes.
    pub max_iterations: usize,
}

impl Default for GreedyParams {
    fn default() -> Self {
        Self { max_iterations: 50 }
    }
}

impl GreedyParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(MotifError::invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GibbsParams {
    /// Sweeps per chain; a sweep resamples every sequence once.
    pub num_iterations: usize,
    pub num_restarts: usize,
}

impl Default for GibbsParams {
    fn default() -> Self {
        Self {
            num_iterations: 1000,
            num_restarts: 20,
        }
    }
}

impl GibbsParams {
    /// Sweeps summed over restarts, saturating at `usize::MAX`.
    pub fn total_sweeps(&self) -> usize {
        self.num_iterations.saturating_mul(self.num_restarts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(MotifError::invalid("num_iterations must be at least 1"));
        }
        if self.num_restarts == 0 {
            return Err(MotifError::invalid("num_restarts must be at least 1"));
        }
        Ok(())
    }
}
