//! Per-trial records and per-algorithm summaries of a benchmark.

use crate::bench::AlgorithmSummary;
use crate::search::TrialResult;
use crate::utils::Result;
use serde::Serialize;
use std::fs::File;

#[derive(Serialize)]
struct TrialRow<'a> {
    trial: &'a str,
    algorithm: &'static str,
    metric: &'static str,
    score: f64,
    consensus: &'a str,
    planted_motif: Option<&'a str>,
    iterations: usize,
    converged: Option<bool>,
    success: Option<bool>,
    recovered_fraction: Option<f64>,
    seconds: f64,
}

#[derive(Serialize)]
struct SummaryRow {
    algorithm: &'static str,
    trials: usize,
    trials_with_truth: usize,
    successes: usize,
    success_rate: Option<f64>,
    score_min: f64,
    score_q1: f64,
    score_median: f64,
    score_q3: f64,
    score_max: f64,
    score_mean: f64,
    converged: Option<usize>,
    mean_iterations: f64,
    mean_seconds: f64,
}

/// Streams trial records to CSV as they arrive.
pub struct TrialWriter {
    writer: csv::Writer<File>,
}

impl TrialWriter {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }

    pub fn write(&mut self, result: &TrialResult, planted_motif: Option<&str>) -> Result<()> {
        self.writer.serialize(TrialRow {
            trial: &result.corpus_id,
            algorithm: result.algorithm.name(),
            metric: result.outcome.metric.name(),
            score: result.outcome.score,
            consensus: &result.outcome.consensus,
            planted_motif,
            iterations: result.outcome.iterations,
            converged: result.outcome.converged,
            success: result.success,
            recovered_fraction: result.recovered_fraction,
            seconds: result.elapsed.as_secs_f64(),
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn write_summaries(path: &str, summaries: &[AlgorithmSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for summary in summaries {
        writer.serialize(SummaryRow {
            algorithm: summary.algorithm.name(),
            trials: summary.trials,
            trials_with_truth: summary.trials_with_truth,
            successes: summary.successes,
            success_rate: summary.success_rate,
            score_min: summary.score.min,
            score_q1: summary.score.q1,
            score_median: summary.score.median,
            score_q3: summary.score.q3,
            score_max: summary.score.max,
            score_mean: summary.score.mean,
            converged: summary.converged,
            mean_iterations: summary.mean_iterations,
            mean_seconds: summary.mean_seconds,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::aggregate;
    use crate::motif::Corpus;
    use crate::search::{Algorithm, SearchOutcome, SearchParams};
    use std::fs;
    use std::time::Duration;

    fn result(algorithm: Algorithm, success: Option<bool>) -> TrialResult {
        let corpus = Corpus::from_strings(["ACGTAC", "TTACGT"]).unwrap();
        let converged = (algorithm == Algorithm::Greedy).then_some(false);
        TrialResult {
            algorithm,
            corpus_id: "trial_1".into(),
            outcome: SearchOutcome::new(
                &corpus,
                vec![0, 2],
                &SearchParams::new(4),
                6,
                converged,
                vec![],
            ),
            success,
            recovered_fraction: success.map(|_| 1.0),
            elapsed: Duration::from_millis(250),
        }
    }

    #[test]
    fn trial_rows_leave_missing_values_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.trials.csv");
        let mut writer = TrialWriter::new(path.to_str().unwrap()).unwrap();
        writer
            .write(&result(Algorithm::Gibbs, Some(true)), Some("ACGT"))
            .unwrap();
        writer.write(&result(Algorithm::Greedy, None), None).unwrap();
        writer.finish().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("trial,algorithm,metric,score,consensus,planted_motif"));
        assert!(lines[1].starts_with("trial_1,gibbs,information,"));
        assert!(lines[1].ends_with(",ACGT,6,,true,1.0,0.25"));
        assert!(lines[2].ends_with(",ACGT,,6,false,,,0.25"));
    }

    #[test]
    fn summary_rows_per_algorithm() {
        let records = vec![
            result(Algorithm::Greedy, Some(false)),
            result(Algorithm::Gibbs, Some(true)),
            result(Algorithm::Greedy, Some(true)),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.summary.csv");
        write_summaries(path.to_str().unwrap(), &aggregate(&records)).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "greedy");
        assert_eq!(&rows[0][1], "2");
        assert_eq!(&rows[0][4], "0.5");
        assert_eq!(&rows[0][11], "0");
        assert_eq!(&rows[1][0], "gibbs");
        assert_eq!(&rows[1][11], "");
    }
}
