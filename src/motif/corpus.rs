use super::alphabet::{decode_seq, encode_seq};
use crate::utils::{MotifError, Result};
use std::fmt;

/// A named DNA sequence stored as two-bit base codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    id: String,
    codes: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, bases: &str) -> Result<Self> {
        let id = id.into();
        if bases.is_empty() {
            return Err(MotifError::invalid(format!("Sequence {} is empty", id)));
        }
        let codes = encode_seq(bases)
            .map_err(|e| MotifError::invalid(format!("Sequence {}: {}", id, e)))?;
        Ok(Self { id, codes })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Number of start offsets for a window of `width`; zero if the sequence is shorter.
    #[inline]
    pub fn num_windows(&self, width: usize) -> usize {
        (self.codes.len() + 1).saturating_sub(width)
    }

    #[inline]
    pub fn window(&self, offset: usize, width: usize) -> &[u8] {
        &self.codes[offset..offset + width]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&decode_seq(&self.codes))
    }
}

/// Ordered, validated collection of sequences searched for a shared motif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    sequences: Vec<Sequence>,
}

impl Corpus {
    pub fn new(sequences: Vec<Sequence>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(MotifError::invalid("Corpus contains no sequences"));
        }
        if let Some(seq) = sequences.iter().find(|s| s.is_empty()) {
            return Err(MotifError::invalid(format!("Sequence {} is empty", seq.id)));
        }
        Ok(Self { sequences })
    }

    /// Builds a corpus from bare strings, naming them `seq_1`, `seq_2`, ...
    pub fn from_strings<I, S>(sequences: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sequences = sequences
            .into_iter()
            .enumerate()
            .map(|(i, s)| Sequence::new(format!("seq_{}", i + 1), s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(sequences)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, index: usize) -> &Sequence {
        &self.sequences[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }

    pub fn min_len(&self) -> usize {
        self.sequences.iter().map(Sequence::len).min().unwrap_or(0)
    }

    pub fn validate_width(&self, width: usize) -> Result<()> {
        if width == 0 {
            return Err(MotifError::invalid("Motif width must be at least 1"));
        }
        let min_len = self.min_len();
        if width > min_len {
            return Err(MotifError::invalid(format!(
                "Motif width {} exceeds the shortest sequence length {}",
                width, min_len
            )));
        }
        Ok(())
    }

    /// Checks that `positions` holds exactly one in-bounds offset per sequence.
    pub fn validate_positions(&self, positions: &[usize], width: usize) -> Result<()> {
        if positions.len() != self.len() {
            return Err(MotifError::invalid(format!(
                "Expected {} positions, got {}",
                self.len(),
                positions.len()
            )));
        }
        for (seq, &offset) in self.sequences.iter().zip(positions) {
            if offset >= seq.num_windows(width) {
                return Err(MotifError::invalid(format!(
                    "Offset {} out of bounds for sequence {} of length {}",
                    offset,
                    seq.id,
                    seq.len()
                )));
            }
        }
        Ok(())
    }

    pub fn instances<'a>(
        &'a self,
        positions: &'a [usize],
        width: usize,
    ) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.sequences
            .iter()
            .zip(positions)
            .map(move |(seq, &offset)| seq.window(offset, width))
    }

    pub fn instance_strings(&self, positions: &[usize], width: usize) -> Vec<String> {
        self.instances(positions, width).map(decode_seq).collect()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}
