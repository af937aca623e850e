use super::{initialize_thread_pool, progress_bar};
use crate::bench::{aggregate, run_trial, search_seed, BenchmarkCase, TrialConfig};
use crate::cli::BenchmarkArgs;
use crate::search::{Algorithm, TrialResult};
use crate::utils::{create_writer, resolve_seed, MotifError, Result};
use crate::writers::{write_summaries, TrialWriter};
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::ProgressBar;
use itertools::Itertools;
use rayon::iter::{ParallelBridge, ParallelIterator};
use std::thread;

const CHANNEL_BUFFER_SIZE: usize = 256;

type IndexedResult = Result<(usize, TrialResult, Option<String>)>;

pub fn benchmark(args: BenchmarkArgs) -> Result<()> {
    let synthetic = args.synthetic_params();
    synthetic.validate()?;
    let seed = resolve_seed(args.search.seed);
    let config = TrialConfig {
        search: args.search.search_params(args.motif_width),
        greedy: args.search.greedy_params(),
        gibbs: args.search.gibbs_params(args.num_restarts),
        success: args.success_criterion(),
        seed,
    };
    config.validate()?;
    let algorithms = args.algorithm.algorithms();

    let trial_writer = create_writer(&args.output_prefix, "trials.csv", TrialWriter::new)?;

    let (sender_case, receiver_case) = bounded(CHANNEL_BUFFER_SIZE);
    let num_trials = args.num_trials;
    let case_stream_thread = thread::spawn(move || -> Result<()> {
        for index in 0..num_trials {
            let case = BenchmarkCase::synthetic(index, &synthetic, seed)?;
            if sender_case.send((index, case)).is_err() {
                break;
            }
        }
        Ok(())
    });

    let progress = progress_bar(num_trials * algorithms.len(), "trials");
    let (sender_result, receiver_result) = bounded::<IndexedResult>(CHANNEL_BUFFER_SIZE);
    let writer_progress = progress.clone();
    let writer_thread = thread::spawn(move || {
        write_results(&receiver_result, trial_writer, &writer_progress)
    });

    log::info!(
        "Running {} trials of {} with seed {}",
        num_trials,
        algorithms.iter().join(", "),
        seed
    );
    log::debug!(
        "Initializing thread pool with {} threads...",
        args.num_threads
    );
    let pool = initialize_thread_pool(args.num_threads)?;
    pool.install(|| {
        receiver_case
            .into_iter()
            .par_bridge()
            .for_each_with(&sender_result, |s, (index, case)| {
                process_case(index, &case, &algorithms, &config, s)
            });
    });

    // Clean-up
    drop(sender_result);
    let records = writer_thread
        .join()
        .map_err(|_| MotifError::Runtime("Writer thread panicked".into()))?;
    progress.finish_and_clear();
    let mut records = records?;
    log::trace!("Writer thread finished");
    case_stream_thread
        .join()
        .map_err(|_| MotifError::Runtime("Case stream thread panicked".into()))??;
    log::trace!("Case stream thread finished");

    records.sort_by_key(|(index, result)| {
        let rank = algorithms.iter().position(|&a| a == result.algorithm);
        (*index, rank)
    });
    let records: Vec<TrialResult> = records.into_iter().map(|(_, result)| result).collect();
    let summaries = aggregate(&records);
    for summary in &summaries {
        log::info!(
            "{}: {}/{} successful trials, median score {:.4}",
            summary.algorithm,
            summary.successes,
            summary.trials_with_truth,
            summary.score.median
        );
    }
    create_writer(&args.output_prefix, "summary.csv", |path| {
        write_summaries(path, &summaries)
    })?;
    Ok(())
}

/// Streams records to the trial CSV, stopping at the first failed trial.
fn write_results(
    receiver_result: &Receiver<IndexedResult>,
    mut trial_writer: TrialWriter,
    progress: &ProgressBar,
) -> Result<Vec<(usize, TrialResult)>> {
    let mut records = Vec::new();
    for item in receiver_result {
        let (index, result, planted) = item?;
        trial_writer.write(&result, planted.as_deref())?;
        records.push((index, result));
        progress.inc(1);
    }
    trial_writer.finish()?;
    Ok(records)
}

fn process_case(
    index: usize,
    case: &BenchmarkCase,
    algorithms: &[Algorithm],
    config: &TrialConfig,
    sender_result: &Sender<IndexedResult>,
) {
    let planted = case.truth.as_ref().map(|truth| truth.motif.clone());
    for &algorithm in algorithms {
        let item = run_trial(case, algorithm, config, search_seed(config.seed, index))
            .map(|result| (index, result, planted.clone()))
            .map_err(|err| MotifError::Runtime(format!("{} on {}: {}", algorithm, case.id, err)));
        if sender_result.send(item).is_err() {
            log::debug!("Writer thread stopped, dropping {} on {}", algorithm, case.id);
            return;
        }
    }
}
