use super::{initialize_thread_pool, progress_bar};
use crate::cli::DiscoverArgs;
use crate::search::{gibbs, greedy, Algorithm};
use crate::utils::{create_writer, read_corpus, resolve_seed, Result};
use crate::writers::{write_instances, write_pssm, write_summary, write_trace};

pub fn discover(args: DiscoverArgs) -> Result<()> {
    let corpus = read_corpus(&args.input_path)?;
    let params = args.search.search_params(args.motif_width);
    params.validate(&corpus)?;
    let greedy_params = args.search.greedy_params();
    let gibbs_params = args.search.gibbs_params(args.num_restarts);
    greedy_params.validate()?;
    gibbs_params.validate()?;

    let algorithms = args.algorithm.algorithms();
    let seed = if algorithms.contains(&Algorithm::Gibbs) {
        resolve_seed(args.search.seed)
    } else {
        args.search.seed.unwrap_or_default()
    };

    log::debug!(
        "Initializing thread pool with {} threads...",
        args.num_threads
    );
    let pool = initialize_thread_pool(args.num_threads)?;

    for algorithm in algorithms {
        log::info!(
            "Searching {} sequences for a motif of width {} with {} search",
            corpus.len(),
            params.motif_width,
            algorithm
        );
        let outcome = match algorithm {
            Algorithm::Greedy => greedy::search(&corpus, &params, &greedy_params)?,
            Algorithm::Gibbs => {
                let progress = progress_bar(gibbs_params.num_restarts, "restarts");
                let outcome = pool.install(|| {
                    gibbs::search_with_progress(&corpus, &params, &gibbs_params, seed, &progress)
                });
                progress.finish_and_clear();
                outcome?
            }
        };
        log::info!(
            "{}: consensus {} with {} {:.4}",
            algorithm,
            outcome.consensus,
            outcome.metric,
            outcome.score
        );
        if outcome.converged == Some(false) {
            log::warn!(
                "Greedy search stopped after {} passes without converging",
                outcome.iterations
            );
        }

        let prefix = &args.output_prefix;
        create_writer(prefix, &format!("{}.summary.txt", algorithm), |path| {
            write_summary(path, algorithm, &params, seed, &outcome)
        })?;
        create_writer(prefix, &format!("{}.instances.csv", algorithm), |path| {
            write_instances(path, &corpus, &outcome)
        })?;
        create_writer(prefix, &format!("{}.pssm.tsv", algorithm), |path| {
            write_pssm(path, &outcome)
        })?;
        create_writer(prefix, &format!("{}.trace.tsv", algorithm), |path| {
            write_trace(path, &outcome)
        })?;
    }
    Ok(())
}
