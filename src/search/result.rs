use super::params::SearchParams;
use crate::motif::{CountMatrix, Corpus, Pssm, ScoreMetric};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Greedy,
    Gibbs,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Gibbs => "gibbs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = &'static str;
    fn from_str(algorithm: &str) -> Result<Self, Self::Err> {
        match algorithm {
            "greedy" => Ok(Algorithm::Greedy),
            "gibbs" => Ok(Algorithm::Gibbs),
            _ => Err("Invalid algorithm. Options are: greedy, gibbs"),
        }
    }
}

/// Final state of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub positions: Vec<usize>,
    pub instances: Vec<String>,
    pub pssm: Pssm,
    pub consensus: String,
    pub score: f64,
    pub metric: ScoreMetric,
    /// Greedy: refinement passes. Gibbs: sweeps summed over restarts.
    pub iterations: usize,
    /// Whether the greedy fixed point was reached; not applicable to Gibbs.
    pub converged: Option<bool>,
    /// Score after each pass (greedy) or sweep of the winning chain (Gibbs).
    pub trace: Vec<f64>,
}

impl SearchOutcome {
    pub fn new(
        corpus: &Corpus,
        positions: Vec<usize>,
        params: &SearchParams,
        iterations: usize,
        converged: Option<bool>,
        trace: Vec<f64>,
    ) -> Self {
        let width = params.motif_width;
        let counts = CountMatrix::from_instances(width, corpus.instances(&positions, width));
        let pssm = Pssm::from_counts(&counts, params.pseudocount);
        Self {
            instances: corpus.instance_strings(&positions, width),
            consensus: pssm.consensus(),
            score: pssm.score(params.metric),
            metric: params.metric,
            pssm,
            positions,
            iterations,
            converged,
            trace,
        }
    }
}

/// One (corpus, algorithm) trial as handed to aggregation and report writers.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub algorithm: Algorithm,
    pub corpus_id: String,
    pub outcome: SearchOutcome,
    /// Present only when the planted motif is known.
    pub success: Option<bool>,
    pub recovered_fraction: Option<f64>,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in [Algorithm::Greedy, Algorithm::Gibbs] {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
        }
        assert!("meme".parse::<Algorithm>().is_err());
    }

    #[test]
    fn outcome_derives_instances_pssm_and_score() {
        let corpus = Corpus::from_strings(["TTACGTT", "ACGTGGG", "CCCACGA"]).unwrap();
        let params = SearchParams::new(4);
        let outcome = SearchOutcome::new(&corpus, vec![2, 0, 3], &params, 1, Some(true), vec![]);
        assert_eq!(outcome.instances, vec!["ACGT", "ACGT", "ACGA"]);
        assert_eq!(outcome.consensus, "ACGT");
        assert_eq!(outcome.pssm.num_instances(), 3);
        assert_eq!(outcome.score, outcome.pssm.information_content());
    }
}
