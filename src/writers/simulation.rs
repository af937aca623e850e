use crate::bench::PlantedMotif;
use crate::motif::Corpus;
use crate::utils::Result;
use bio::io::fasta;
use serde::Serialize;
use std::fs::File;

#[derive(Serialize)]
struct TruthRow<'a> {
    sequence_id: &'a str,
    offset: usize,
    instance: &'a str,
    motif: &'a str,
}

pub fn write_fasta(path: &str, corpus: &Corpus) -> Result<()> {
    let mut writer = fasta::Writer::new(File::create(path)?);
    for seq in corpus {
        writer.write(seq.id(), None, seq.to_string().as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Planted offset and mutated instance per sequence.
pub fn write_truth(path: &str, corpus: &Corpus, planted: &PlantedMotif) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for ((seq, &offset), instance) in corpus
        .iter()
        .zip(&planted.offsets)
        .zip(&planted.instances)
    {
        writer.serialize(TruthRow {
            sequence_id: seq.id(),
            offset,
            instance,
            motif: &planted.motif,
        })?;
    }
    writer.flush()?;
    Ok(())
}
