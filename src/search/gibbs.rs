//! Gibbs sampling over motif position assignments.
//!
//! One iteration is a sweep that resamples every sequence once, in corpus order. Each step
//! drops the sequence's current instance from the running counts, builds the leave-one-out
//! PSSM and draws a new offset with probability proportional to the window's likelihood ratio
//! against a uniform background. After every sweep the whole alignment may slide by a few bases
//! when that scores better, which pulls chains out of alignments offset from the motif. The chain
//! reports the best state it visited, and independent restarts from uniform random assignments
//! keep the overall best.

use super::params::{GibbsParams, SearchParams};
use super::result::SearchOutcome;
use crate::motif::{CountMatrix, Corpus, Pssm, Sequence};
use crate::utils::{derive_seed, MotifError, Result};
use indicatif::ProgressBar;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Shifts tried after each sweep, nearest first.
const PHASE_SHIFTS: [isize; 4] = [-1, 1, -2, 2];

#[derive(Debug)]
struct Chain {
    positions: Vec<usize>,
    score: f64,
    trace: Vec<f64>,
}

pub fn search(
    corpus: &Corpus,
    params: &SearchParams,
    gibbs: &GibbsParams,
    seed: u64,
) -> Result<SearchOutcome> {
    search_with_progress(corpus, params, gibbs, seed, &ProgressBar::hidden())
}

/// Same as [`search`], advancing `progress` by one per finished restart.
pub fn search_with_progress(
    corpus: &Corpus,
    params: &SearchParams,
    gibbs: &GibbsParams,
    seed: u64,
    progress: &ProgressBar,
) -> Result<SearchOutcome> {
    params.validate(corpus)?;
    gibbs.validate()?;

    // Restarts own independent streams, so the winner does not depend on the thread count
    let chains: Vec<Chain> = (0..gibbs.num_restarts)
        .into_par_iter()
        .map(|restart| {
            let mut rng = StdRng::seed_from_u64(derive_seed(seed, restart as u64));
            let chain = run_chain(corpus, params, gibbs.num_iterations, &mut rng);
            progress.inc(1);
            chain
        })
        .collect();

    let mut best: Option<Chain> = None;
    for (restart, chain) in chains.into_iter().enumerate() {
        let improves = best
            .as_ref()
            .map_or(true, |b| params.metric.is_better(chain.score, b.score));
        if improves {
            log::debug!("Restart {}: new best score {:.4}", restart, chain.score);
            best = Some(chain);
        }
    }
    let best = best.ok_or_else(|| MotifError::Runtime("Gibbs sampler ran no chains".into()))?;

    Ok(SearchOutcome::new(
        corpus,
        best.positions,
        params,
        gibbs.total_sweeps(),
        None,
        best.trace,
    ))
}

fn run_chain(corpus: &Corpus, params: &SearchParams, num_sweeps: usize, rng: &mut StdRng) -> Chain {
    let width = params.motif_width;
    let metric = params.metric;

    let mut positions: Vec<usize> = corpus
        .iter()
        .map(|seq| rng.random_range(0..seq.num_windows(width)))
        .collect();
    let mut counts = CountMatrix::from_instances(width, corpus.instances(&positions, width));
    let mut score = Pssm::from_counts(&counts, params.pseudocount).score(metric);
    let mut best_score = score;
    let mut best_positions = positions.clone();
    let mut trace = Vec::with_capacity(num_sweeps);
    let mut weights = Vec::new();

    for _ in 0..num_sweeps {
        for (index, seq) in corpus.iter().enumerate() {
            counts.remove(seq.window(positions[index], width));
            let profile = Pssm::from_counts(&counts, params.pseudocount);
            positions[index] = sample_offset(&profile, seq, &mut weights, rng);
            counts.add(seq.window(positions[index], width));

            score = Pssm::from_counts(&counts, params.pseudocount).score(metric);
            if metric.is_better(score, best_score) {
                best_score = score;
                best_positions.clone_from(&positions);
            }
        }
        if let Some((shifted, shifted_counts, shifted_score)) =
            phase_shift(corpus, params, &positions, score)
        {
            positions = shifted;
            counts = shifted_counts;
            score = shifted_score;
            if metric.is_better(score, best_score) {
                best_score = score;
                best_positions.clone_from(&positions);
            }
        }
        trace.push(score);
    }

    Chain {
        positions: best_positions,
        score: best_score,
        trace,
    }
}

/// Best alignment obtained by moving every offset by the same shift, if it beats `score`.
///
/// Shifts that would push any window out of its sequence are skipped.
fn phase_shift(
    corpus: &Corpus,
    params: &SearchParams,
    positions: &[usize],
    score: f64,
) -> Option<(Vec<usize>, CountMatrix, f64)> {
    let width = params.motif_width;
    let mut best: Option<(Vec<usize>, CountMatrix, f64)> = None;
    for shift in PHASE_SHIFTS {
        let Some(shifted) = positions
            .iter()
            .zip(corpus)
            .map(|(&offset, seq)| {
                offset
                    .checked_add_signed(shift)
                    .filter(|&o| o < seq.num_windows(width))
            })
            .collect::<Option<Vec<usize>>>()
        else {
            continue;
        };
        let counts = CountMatrix::from_instances(width, corpus.instances(&shifted, width));
        let shifted_score = Pssm::from_counts(&counts, params.pseudocount).score(params.metric);
        let incumbent = best.as_ref().map_or(score, |(_, _, s)| *s);
        if params.metric.is_better(shifted_score, incumbent) {
            best = Some((shifted, counts, shifted_score));
        }
    }
    best
}

/// Draws an offset with probability proportional to its likelihood ratio under `profile`.
///
/// Weights are computed in log space and shifted by their maximum before exponentiation, which
/// leaves the normalized distribution unchanged. Falls back to a uniform draw if the weights do
/// not form a distribution.
fn sample_offset(
    profile: &Pssm,
    seq: &Sequence,
    weights: &mut Vec<f64>,
    rng: &mut StdRng,
) -> usize {
    let width = profile.width();
    let num_windows = seq.num_windows(width);
    weights.clear();
    weights.extend((0..num_windows).map(|offset| profile.log_odds(seq.window(offset, width))));
    let max_log_odds = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for weight in weights.iter_mut() {
        *weight = (*weight - max_log_odds).exp2();
    }

    match WeightedIndex::<f64>::new(weights.iter()) {
        Ok(distribution) => distribution.sample(rng),
        Err(e) => {
            log::trace!("{}: uniform offset draw ({})", seq.id(), e);
            rng.random_range(0..num_windows)
        }
    }
}
