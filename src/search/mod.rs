pub mod gibbs;
pub mod greedy;
mod params;
mod result;

pub use params::{GibbsParams, GreedyParams, SearchParams, DEFAULT_PSEUDOCOUNT};
pub use result::{Algorithm, SearchOutcome, TrialResult};

use crate::motif::Corpus;
use crate::utils::Result;

/// Runs `algorithm` on `corpus`. The seed only drives the Gibbs sampler.
pub fn run(
    algorithm: Algorithm,
    corpus: &Corpus,
    params: &SearchParams,
    greedy_params: &GreedyParams,
    gibbs_params: &GibbsParams,
    seed: u64,
) -> Result<SearchOutcome> {
    match algorithm {
        Algorithm::Greedy => greedy::search(corpus, params, greedy_params),
        Algorithm::Gibbs => gibbs::search(corpus, params, gibbs_params, seed),
    }
}
