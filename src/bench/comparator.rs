//! Runs searchers over benchmark cases and reduces the trial records to per-algorithm summaries.

use super::success::SuccessCriterion;
use super::synthetic::{generate, PlantedMotif, SyntheticParams};
use crate::motif::Corpus;
use crate::search::{self, Algorithm, GibbsParams, GreedyParams, SearchParams, TrialResult};
use crate::utils::{derive_seed, math, Result};
use itertools::Itertools;
use rayon::prelude::*;
use std::time::Instant;

const CORPUS_STREAM: u64 = 0;
const SEARCH_STREAM: u64 = 1;

/// A corpus to search, with its planted motif when it is synthetic.
#[derive(Debug, Clone)]
pub struct BenchmarkCase {
    pub id: String,
    pub corpus: Corpus,
    pub truth: Option<PlantedMotif>,
}

impl BenchmarkCase {
    /// Generates the synthetic case at `index` from the benchmark's base seed.
    pub fn synthetic(index: usize, params: &SyntheticParams, base_seed: u64) -> Result<Self> {
        let seed = derive_seed(trial_seed(base_seed, index), CORPUS_STREAM);
        let (corpus, truth) = generate(params, seed)?;
        Ok(Self {
            id: format!("trial_{}", index + 1),
            corpus,
            truth: Some(truth),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialConfig {
    pub search: SearchParams,
    pub greedy: GreedyParams,
    pub gibbs: GibbsParams,
    pub success: SuccessCriterion,
    pub seed: u64,
}

impl TrialConfig {
    pub fn new(search: SearchParams, seed: u64) -> Self {
        Self {
            search,
            greedy: GreedyParams::default(),
            gibbs: GibbsParams::default(),
            success: SuccessCriterion::default(),
            seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.greedy.validate()?;
        self.gibbs.validate()?;
        self.success.validate()
    }
}

pub fn trial_seed(base_seed: u64, case_index: usize) -> u64 {
    derive_seed(base_seed, case_index as u64)
}

/// Seed handed to the searcher for the case at `case_index`.
pub fn search_seed(base_seed: u64, case_index: usize) -> u64 {
    derive_seed(trial_seed(base_seed, case_index), SEARCH_STREAM)
}

pub fn run_trial(
    case: &BenchmarkCase,
    algorithm: Algorithm,
    config: &TrialConfig,
    seed: u64,
) -> Result<TrialResult> {
    let start = Instant::now();
    let outcome = search::run(
        algorithm,
        &case.corpus,
        &config.search,
        &config.greedy,
        &config.gibbs,
        seed,
    )?;
    let elapsed = start.elapsed();

    let recovered_fraction = case
        .truth
        .as_ref()
        .map(|truth| config.success.recovered_fraction(&outcome.positions, truth));
    let success = case
        .truth
        .as_ref()
        .map(|truth| config.success.is_success(&outcome.positions, truth));
    log::debug!(
        "{} {}: score={:.4} consensus={} success={:?} in {:.2?}",
        case.id,
        algorithm,
        outcome.score,
        outcome.consensus,
        success,
        elapsed
    );

    Ok(TrialResult {
        algorithm,
        corpus_id: case.id.clone(),
        outcome,
        success,
        recovered_fraction,
        elapsed,
    })
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub records: Vec<TrialResult>,
    pub summaries: Vec<AlgorithmSummary>,
}

/// Runs every algorithm on every case.
///
/// Records come back in case order, then algorithm order; repeated algorithms run once.
pub fn compare(
    cases: &[BenchmarkCase],
    algorithms: &[Algorithm],
    config: &TrialConfig,
) -> Result<Comparison> {
    config.validate()?;
    let algorithms: Vec<Algorithm> = algorithms.iter().copied().unique().collect();
    let trials: Vec<(usize, &BenchmarkCase, Algorithm)> = cases
        .iter()
        .enumerate()
        .cartesian_product(algorithms.iter().copied())
        .map(|((index, case), algorithm)| (index, case, algorithm))
        .collect();

    let records = trials
        .into_par_iter()
        .map(|(index, case, algorithm)| {
            run_trial(case, algorithm, config, search_seed(config.seed, index))
        })
        .collect::<Result<Vec<_>>>()?;
    let summaries = aggregate(&records);
    Ok(Comparison { records, summaries })
}

/// Distribution of final scores over a set of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl ScoreSummary {
    pub fn new(scores: &[f64]) -> Option<Self> {
        Some(Self {
            min: math::quantile(scores, 0.0)?,
            q1: math::quantile(scores, 0.25)?,
            median: math::median(scores)?,
            q3: math::quantile(scores, 0.75)?,
            max: math::quantile(scores, 1.0)?,
            mean: math::mean(scores)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    pub trials: usize,
    pub trials_with_truth: usize,
    pub successes: usize,
    /// Successes over trials with a known planted motif.
    pub success_rate: Option<f64>,
    pub score: ScoreSummary,
    /// Trials that reached a fixed point; `None` when no trial reports convergence.
    pub converged: Option<usize>,
    pub mean_iterations: f64,
    pub mean_seconds: f64,
}

/// Reduces trial records to one summary per algorithm, in order of first appearance.
pub fn aggregate(records: &[TrialResult]) -> Vec<AlgorithmSummary> {
    let algorithms: Vec<Algorithm> = records.iter().map(|r| r.algorithm).unique().collect();
    let mut summaries = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        let group = records
            .iter()
            .filter(|r| r.algorithm == algorithm)
            .collect_vec();
        let scores = group.iter().map(|r| r.outcome.score).collect_vec();
        let Some(score) = ScoreSummary::new(&scores) else {
            continue;
        };

        let trials_with_truth = group.iter().filter(|r| r.success.is_some()).count();
        let successes = group.iter().filter(|r| r.success == Some(true)).count();
        let success_rate =
            (trials_with_truth > 0).then(|| successes as f64 / trials_with_truth as f64);
        let flags = group.iter().filter_map(|r| r.outcome.converged).collect_vec();
        let converged = (!flags.is_empty()).then(|| flags.iter().filter(|&&c| c).count());
        let iterations = group
            .iter()
            .map(|r| r.outcome.iterations as f64)
            .collect_vec();
        let seconds = group
            .iter()
            .map(|r| r.elapsed.as_secs_f64())
            .collect_vec();

        summaries.push(AlgorithmSummary {
            algorithm,
            trials: group.len(),
            trials_with_truth,
            successes,
            success_rate,
            score,
            converged,
            mean_iterations: math::mean(&iterations).unwrap_or(0.0),
            mean_seconds: math::mean(&seconds).unwrap_or(0.0),
        });
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchOutcome;
    use approx::assert_abs_diff_eq;
    use std::time::Duration;

    fn hamming(a: &str, b: &str) -> usize {
        a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count()
    }

    fn record(algorithm: Algorithm, score: f64, success: Option<bool>) -> TrialResult {
        let corpus = Corpus::from_strings(["ACGTAC", "TTACGT"]).unwrap();
        let mut outcome = SearchOutcome::new(
            &corpus,
            vec![0, 2],
            &SearchParams::new(4),
            4,
            (algorithm == Algorithm::Greedy).then_some(true),
            vec![],
        );
        outcome.score = score;
        TrialResult {
            algorithm,
            corpus_id: "c".into(),
            outcome,
            success,
            recovered_fraction: success.map(|s| if s { 1.0 } else { 0.0 }),
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn gibbs_recovers_planted_motif_end_to_end() {
        let params = SyntheticParams {
            num_sequences: 20,
            sequence_length: 50,
            motif_width: 8,
            mutation_rate: 0.1,
        };
        let (corpus, truth) = generate(&params, 42).unwrap();
        let motif = truth.motif.clone();
        let case = BenchmarkCase {
            id: "e2e".into(),
            corpus,
            truth: Some(truth),
        };
        let config = TrialConfig {
            gibbs: GibbsParams {
                num_iterations: 200,
                num_restarts: 5,
            },
            greedy: GreedyParams { max_iterations: 50 },
            ..TrialConfig::new(SearchParams::new(8), 42)
        };

        let gibbs = run_trial(&case, Algorithm::Gibbs, &config, 42).unwrap();
        assert_eq!(gibbs.success, Some(true));
        assert!(hamming(&gibbs.outcome.consensus, &motif) <= 1);
        assert_eq!(gibbs.outcome.iterations, 1000);

        let greedy = run_trial(&case, Algorithm::Greedy, &config, 42).unwrap();
        assert!(greedy.outcome.converged.is_some());
        for outcome in [&gibbs.outcome, &greedy.outcome] {
            assert_eq!(outcome.pssm.width(), 8);
            for column in outcome.pssm.columns() {
                assert_abs_diff_eq!(column.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn records_follow_case_then_algorithm_order() {
        let params = SyntheticParams {
            num_sequences: 6,
            sequence_length: 30,
            motif_width: 6,
            mutation_rate: 0.0,
        };
        let cases = vec![
            BenchmarkCase::synthetic(0, &params, 5).unwrap(),
            BenchmarkCase::synthetic(1, &params, 5).unwrap(),
        ];
        let config = TrialConfig {
            gibbs: GibbsParams {
                num_iterations: 20,
                num_restarts: 2,
            },
            ..TrialConfig::new(SearchParams::new(6), 5)
        };
        let algorithms = [Algorithm::Gibbs, Algorithm::Greedy, Algorithm::Gibbs];
        let comparison = compare(&cases, &algorithms, &config).unwrap();

        let order = comparison
            .records
            .iter()
            .map(|r| (r.corpus_id.as_str(), r.algorithm))
            .collect_vec();
        assert_eq!(
            order,
            vec![
                ("trial_1", Algorithm::Gibbs),
                ("trial_1", Algorithm::Greedy),
                ("trial_2", Algorithm::Gibbs),
                ("trial_2", Algorithm::Greedy),
            ]
        );
        assert_eq!(comparison.summaries.len(), 2);
        assert_eq!(comparison.summaries[0].algorithm, Algorithm::Gibbs);
        assert_eq!(comparison.summaries[0].trials, 2);

        let again = compare(&cases, &algorithms, &config).unwrap();
        for (a, b) in comparison.records.iter().zip(&again.records) {
            assert_eq!(a.outcome, b.outcome);
        }
    }

    #[test]
    fn summary_median_is_exact() {
        let records = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0]
            .iter()
            .map(|&s| record(Algorithm::Gibbs, s, Some(s > 2.0)))
            .collect_vec();
        let summaries = aggregate(&records);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.score.median, 3.5);
        assert_eq!(summary.score.min, 1.0);
        assert_eq!(summary.score.max, 9.0);
        assert_abs_diff_eq!(summary.score.q1, 1.5);
        assert_abs_diff_eq!(summary.score.q3, 4.75);
        assert_abs_diff_eq!(summary.score.mean, 23.0 / 6.0);
        assert_eq!(summary.successes, 4);
        assert_eq!(summary.success_rate, Some(4.0 / 6.0));
        assert_eq!(summary.converged, None);
        assert_abs_diff_eq!(summary.mean_iterations, 4.0);
    }

    #[test]
    fn odd_count_median_and_missing_truth() {
        let records = vec![
            record(Algorithm::Greedy, 2.0, None),
            record(Algorithm::Greedy, 7.0, None),
            record(Algorithm::Greedy, 5.0, None),
        ];
        let summary = &aggregate(&records)[0];
        assert_eq!(summary.score.median, 5.0);
        assert_eq!(summary.trials_with_truth, 0);
        assert_eq!(summary.success_rate, None);
        assert_eq!(summary.converged, Some(3));
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn success_degrades_with_mutation_rate() {
        let rates = |mutation_rate: f64| {
            let params = SyntheticParams {
                num_sequences: 10,
                sequence_length: 100,
                motif_width: 8,
                mutation_rate,
            };
            let cases = (0..8)
                .map(|i| BenchmarkCase::synthetic(i, &params, 17).unwrap())
                .collect_vec();
            let config = TrialConfig {
                gibbs: GibbsParams {
                    num_iterations: 100,
                    num_restarts: 8,
                },
                ..TrialConfig::new(SearchParams::new(8), 17)
            };
            let comparison =
                compare(&cases, &[Algorithm::Greedy, Algorithm::Gibbs], &config).unwrap();
            comparison
                .summaries
                .iter()
                .map(|s| (s.algorithm, s.success_rate.unwrap()))
                .collect_vec()
        };
        let exact = rates(0.0);
        let scrambled = rates(1.0);
        assert_eq!(exact.len(), 2);
        for ((algorithm, exact), (_, scrambled)) in exact.into_iter().zip(scrambled) {
            assert!(exact >= 0.75, "{} recovered {}", algorithm, exact);
            assert!(scrambled <= 0.25, "{} recovered {}", algorithm, scrambled);
        }
    }

    #[test]
    fn trial_success_uses_inclusive_threshold() {
        let corpus = Corpus::from_strings([
            "TTGCAGGATCCAATG",
            "GGATCCATTACAGCA",
            "CATTAGTGGATCCAA",
            "ACAGGATCCATTGTC",
            "TAGCATACGGATCCA",
        ])
        .unwrap();
        // Greedy lands on [5, 0, 7, 3, 8]; the last two planted offsets are out of tolerance
        let case = BenchmarkCase {
            id: "partial".into(),
            corpus,
            truth: Some(PlantedMotif {
                motif: "GGATCC".into(),
                offsets: vec![5, 0, 7, 0, 0],
                instances: vec!["GGATCC".into(); 5],
            }),
        };
        for (min_recovered_fraction, expected) in [(0.6, true), (0.61, false)] {
            let config = TrialConfig {
                success: SuccessCriterion {
                    offset_tolerance: 2,
                    min_recovered_fraction,
                },
                ..TrialConfig::new(SearchParams::new(6), 0)
            };
            let result = run_trial(&case, Algorithm::Greedy, &config, 0).unwrap();
            assert_eq!(result.recovered_fraction, Some(0.6));
            assert_eq!(result.success, Some(expected));
        }
    }
}
