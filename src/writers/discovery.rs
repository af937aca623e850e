//! Output files of a single discovery run.

use crate::cli::FULL_VERSION;
use crate::motif::alphabet::ALPHABET;
use crate::motif::Corpus;
use crate::search::{Algorithm, SearchOutcome, SearchParams};
use crate::utils::Result;
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Serialize)]
struct InstanceRow<'a> {
    sequence_id: &'a str,
    offset: usize,
    instance: &'a str,
    log_odds: f64,
}

#[derive(Serialize)]
struct PssmRow {
    position: usize,
    consensus: char,
    #[serde(rename = "A")]
    a: f64,
    #[serde(rename = "C")]
    c: f64,
    #[serde(rename = "G")]
    g: f64,
    #[serde(rename = "T")]
    t: f64,
    count_a: u32,
    count_c: u32,
    count_g: u32,
    count_t: u32,
}

fn tsv_writer(path: &str) -> Result<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?)
}

/// One row per sequence: where the motif instance was found and how well it fits the PSSM.
pub fn write_instances(path: &str, corpus: &Corpus, outcome: &SearchOutcome) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let width = outcome.pssm.width();
    for ((seq, &offset), instance) in corpus
        .iter()
        .zip(&outcome.positions)
        .zip(&outcome.instances)
    {
        writer.serialize(InstanceRow {
            sequence_id: seq.id(),
            offset,
            instance,
            log_odds: outcome.pssm.log_odds(seq.window(offset, width)),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per motif column with probabilities and raw counts.
pub fn write_pssm(path: &str, outcome: &SearchOutcome) -> Result<()> {
    let mut writer = tsv_writer(path)?;
    let counts = outcome.pssm.counts().columns();
    for (index, (column, consensus)) in outcome
        .pssm
        .columns()
        .iter()
        .zip(outcome.consensus.chars())
        .enumerate()
    {
        let count = counts[index];
        writer.serialize(PssmRow {
            position: index + 1,
            consensus,
            a: column[0],
            c: column[1],
            g: column[2],
            t: column[3],
            count_a: count[0],
            count_c: count[1],
            count_g: count[2],
            count_t: count[3],
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_trace(path: &str, outcome: &SearchOutcome) -> Result<()> {
    let mut writer = tsv_writer(path)?;
    writer.write_record(["step", "score"])?;
    for (step, score) in outcome.trace.iter().enumerate() {
        writer.write_record([step.to_string(), score.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Human-readable run report.
pub fn write_summary(
    path: &str,
    algorithm: Algorithm,
    params: &SearchParams,
    seed: u64,
    outcome: &SearchOutcome,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{} {}", env!("CARGO_PKG_NAME"), *FULL_VERSION)?;
    writeln!(out, "algorithm\t{}", algorithm)?;
    writeln!(out, "motif_width\t{}", params.motif_width)?;
    writeln!(out, "pseudocount\t{}", params.pseudocount)?;
    if algorithm == Algorithm::Gibbs {
        writeln!(out, "seed\t{}", seed)?;
    }
    writeln!(out, "metric\t{}", outcome.metric)?;
    writeln!(out, "score\t{:.6}", outcome.score)?;
    writeln!(out, "consensus\t{}", outcome.consensus)?;
    writeln!(out, "iterations\t{}", outcome.iterations)?;
    match outcome.converged {
        Some(converged) => writeln!(out, "converged\t{}", converged)?,
        None => writeln!(out, "converged\tNA")?,
    }
    writeln!(out, "sequences\t{}", outcome.positions.len())?;
    writeln!(out)?;
    writeln!(out, "#pos\t{}", ALPHABET.iter().map(|&b| b as char).join("\t"))?;
    for (index, column) in outcome.pssm.columns().iter().enumerate() {
        writeln!(
            out,
            "{}\t{}",
            index + 1,
            column.iter().map(|p| format!("{:.3}", p)).join("\t")
        )?;
    }
    out.flush()?;
    Ok(())
}
