mod comparator;
mod success;
mod synthetic;

pub use comparator::{
    aggregate, compare, run_trial, search_seed, trial_seed, AlgorithmSummary, BenchmarkCase,
    Comparison, ScoreSummary, TrialConfig,
};
pub use success::SuccessCriterion;
pub use synthetic::{generate, PlantedMotif, SyntheticParams};
