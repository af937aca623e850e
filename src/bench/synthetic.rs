//! Random background corpora with a mutated motif planted in every sequence.

use crate::motif::alphabet::{decode_seq, ALPHABET_SIZE};
use crate::motif::{Corpus, Sequence};
use crate::utils::{MotifError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticParams {
    pub num_sequences: usize,
    pub sequence_length: usize,
    pub motif_width: usize,
    /// Per-base probability of substituting one of the three other bases.
    pub mutation_rate: f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            num_sequences: 10,
            sequence_length: 100,
            motif_width: 8,
            mutation_rate: 0.1,
        }
    }
}

impl SyntheticParams {
    pub fn validate(&self) -> Result<()> {
        if self.num_sequences == 0 {
            return Err(MotifError::invalid("num_sequences must be at least 1"));
        }
        if self.motif_width == 0 {
            return Err(MotifError::invalid("Motif width must be at least 1"));
        }
        if self.motif_width > self.sequence_length {
            return Err(MotifError::invalid(format!(
                "Motif width {} exceeds the sequence length {}",
                self.motif_width, self.sequence_length
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(MotifError::invalid(format!(
                "Mutation rate must be between 0.0 and 1.0, got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

/// Ground truth of a generated corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantedMotif {
    pub motif: String,
    /// Insertion offset per sequence, in corpus order.
    pub offsets: Vec<usize>,
    /// The mutated copy actually written into each sequence.
    pub instances: Vec<String>,
}

/// Generates a corpus from `seed`; the same parameters and seed always give the same corpus.
pub fn generate(params: &SyntheticParams, seed: u64) -> Result<(Corpus, PlantedMotif)> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let width = params.motif_width;

    let motif = random_codes(&mut rng, width);
    let mut sequences = Vec::with_capacity(params.num_sequences);
    let mut offsets = Vec::with_capacity(params.num_sequences);
    let mut instances = Vec::with_capacity(params.num_sequences);

    for index in 0..params.num_sequences {
        let mut codes = random_codes(&mut rng, params.sequence_length);
        let offset = rng.random_range(0..=params.sequence_length - width);
        let instance = mutate(&motif, params.mutation_rate, &mut rng);
        codes[offset..offset + width].copy_from_slice(&instance);

        sequences.push(Sequence::new(
            format!("seq_{}", index + 1),
            &decode_seq(&codes),
        )?);
        offsets.push(offset);
        instances.push(decode_seq(&instance));
    }

    let planted = PlantedMotif {
        motif: decode_seq(&motif),
        offsets,
        instances,
    };
    log::debug!(
        "Generated {} sequences of length {} with planted motif {}",
        params.num_sequences,
        params.sequence_length,
        planted.motif
    );
    Ok((Corpus::new(sequences)?, planted))
}

fn random_codes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| rng.random_range(0..ALPHABET_SIZE as u8))
        .collect()
}

fn mutate(motif: &[u8], rate: f64, rng: &mut StdRng) -> Vec<u8> {
    motif
        .iter()
        .map(|&code| {
            if rng.random_bool(rate) {
                (code + rng.random_range(1..ALPHABET_SIZE as u8)) % ALPHABET_SIZE as u8
            } else {
                code
            }
        })
        .collect()
}
