//! Deterministic consensus refinement.
//!
//! The search is seeded from the window of the first sequence that best agrees with the rest of
//! the corpus, then repeatedly moves each sequence to the offset that is most probable under the
//! PSSM of all other sequences, until a full pass changes nothing. It has no randomness and stops
//! at the first fixed point it reaches.

use super::params::{GreedyParams, SearchParams};
use super::result::SearchOutcome;
use crate::motif::{CountMatrix, Corpus, Pssm, Sequence};
use crate::utils::Result;

pub fn search(
    corpus: &Corpus,
    params: &SearchParams,
    greedy: &GreedyParams,
) -> Result<SearchOutcome> {
    params.validate(corpus)?;
    greedy.validate()?;
    let width = params.motif_width;
    let metric = params.metric;

    let mut positions = seed_positions(corpus, width);
    let mut counts = CountMatrix::from_instances(width, corpus.instances(&positions, width));
    let mut best_score = Pssm::from_counts(&counts, params.pseudocount).score(metric);
    let mut best_positions = positions.clone();
    let mut trace = vec![best_score];

    let mut converged = false;
    let mut passes = 0;
    while passes < greedy.max_iterations {
        passes += 1;
        let mut changed = false;
        for (index, seq) in corpus.iter().enumerate() {
            counts.remove(seq.window(positions[index], width));
            let profile = Pssm::from_counts(&counts, params.pseudocount);
            let offset = most_probable_offset(&profile, seq);
            if offset != positions[index] {
                positions[index] = offset;
                changed = true;
            }
            counts.add(seq.window(offset, width));
        }

        let score = Pssm::from_counts(&counts, params.pseudocount).score(metric);
        trace.push(score);
        if metric.is_better(score, best_score) {
            best_score = score;
            best_positions.clone_from(&positions);
        }
        if !changed {
            converged = true;
            break;
        }
    }

    if converged {
        log::debug!("Greedy search converged after {} passes", passes);
    } else {
        log::debug!(
            "Greedy search did not converge within {} passes",
            greedy.max_iterations
        );
    }

    Ok(SearchOutcome::new(
        corpus,
        best_positions,
        params,
        passes,
        Some(converged),
        trace,
    ))
}

/// Initial offsets from the consensus seed.
///
/// Every window of the first sequence is a candidate seed; its support is the summed best
/// Hamming agreement over all sequences. Each sequence then starts at its first window with the
/// best agreement to the winning seed.
fn seed_positions(corpus: &Corpus, width: usize) -> Vec<usize> {
    let first = corpus.get(0);
    let mut seed_offset = 0;
    let mut seed_support = 0;
    for candidate in 0..first.num_windows(width) {
        let seed = first.window(candidate, width);
        let support: usize = corpus.iter().map(|seq| best_match(seq, seed).1).sum();
        if support > seed_support {
            seed_support = support;
            seed_offset = candidate;
        }
    }

    let seed = first.window(seed_offset, width);
    corpus.iter().map(|seq| best_match(seq, seed).0).collect()
}

/// First offset with the most matching bases, and that number of matches.
fn best_match(seq: &Sequence, seed: &[u8]) -> (usize, usize) {
    let mut best = (0, 0);
    for offset in 0..seq.num_windows(seed.len()) {
        let matches = seq
            .window(offset, seed.len())
            .iter()
            .zip(seed)
            .filter(|(a, b)| a == b)
            .count();
        if matches > best.1 {
            best = (offset, matches);
        }
    }
    best
}

/// Offset whose window has the highest log-odds; the lowest offset wins ties.
fn most_probable_offset(profile: &Pssm, seq: &Sequence) -> usize {
    let width = profile.width();
    let mut best_offset = 0;
    let mut best_log_odds = f64::NEG_INFINITY;
    for offset in 0..seq.num_windows(width) {
        let log_odds = profile.log_odds(seq.window(offset, width));
        if log_odds > best_log_odds {
            best_log_odds = log_odds;
            best_offset = offset;
        }
    }
    best_offset
}
