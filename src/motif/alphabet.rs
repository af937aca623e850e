//! Two-bit nucleotide encoding shared by the corpus and the PSSM.

use std::fmt;

pub const ALPHABET: [u8; 4] = *b"ACGT";
pub const ALPHABET_SIZE: usize = ALPHABET.len();

/// Background probability of a base under the uniform model.
pub const UNIFORM_BACKGROUND: f64 = 1.0 / ALPHABET_SIZE as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBase {
    pub position: usize,
    pub base: u8,
}

impl fmt::Display for InvalidBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-nucleotide character '{}' at position {}",
            self.base.escape_ascii(),
            self.position + 1
        )
    }
}

#[inline]
pub fn encode_base(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

#[inline]
pub fn decode_base(code: u8) -> char {
    ALPHABET[code as usize] as char
}

pub fn encode_seq(bases: &str) -> Result<Vec<u8>, InvalidBase> {
    bases
        .bytes()
        .enumerate()
        .map(|(position, base)| encode_base(base).ok_or(InvalidBase { position, base }))
        .collect()
}

pub fn decode_seq(codes: &[u8]) -> String {
    codes.iter().map(|&c| decode_base(c)).collect()
}
