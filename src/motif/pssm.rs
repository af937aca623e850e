//! Count and probability matrices over aligned motif instances.

use super::alphabet::{decode_base, encode_seq, ALPHABET_SIZE, UNIFORM_BACKGROUND};
use super::metric::ScoreMetric;
use crate::utils::{MotifError, Result};

/// Per-column base counts of an instance set.
///
/// Counts are integers, so removing and re-adding instances reproduces a from-scratch count
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    counts: Vec<[u32; ALPHABET_SIZE]>,
    num_instances: usize,
}

impl CountMatrix {
    pub fn new(width: usize) -> Self {
        Self {
            counts: vec![[0; ALPHABET_SIZE]; width],
            num_instances: 0,
        }
    }

    pub fn from_instances<'a, I>(width: usize, instances: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut matrix = Self::new(width);
        for instance in instances {
            matrix.add(instance);
        }
        matrix
    }

    pub fn width(&self) -> usize {
        self.counts.len()
    }

    pub fn num_instances(&self) -> usize {
        self.num_instances
    }

    pub fn columns(&self) -> &[[u32; ALPHABET_SIZE]] {
        &self.counts
    }

    pub fn add(&mut self, instance: &[u8]) {
        debug_assert_eq!(instance.len(), self.width());
        for (column, &code) in self.counts.iter_mut().zip(instance) {
            column[code as usize] += 1;
        }
        self.num_instances += 1;
    }

    pub fn remove(&mut self, instance: &[u8]) {
        debug_assert_eq!(instance.len(), self.width());
        debug_assert!(self.num_instances > 0);
        for (column, &code) in self.counts.iter_mut().zip(instance) {
            column[code as usize] -= 1;
        }
        self.num_instances -= 1;
    }

    /// Instances disagreeing with the most frequent base, summed over columns.
    pub fn mismatches(&self) -> u32 {
        self.counts
            .iter()
            .map(|column| {
                let max = column.iter().max().copied().unwrap_or(0);
                self.num_instances as u32 - max
            })
            .sum()
    }
}

pub fn check_pseudocount(pseudocount: f64) -> Result<()> {
    if pseudocount.is_finite() && pseudocount > 0.0 {
        Ok(())
    } else {
        Err(MotifError::invalid(format!(
            "Pseudocount must be a positive number, got {}",
            pseudocount
        )))
    }
}

/// Position-specific scoring matrix: one probability distribution over A,C,G,T per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Pssm {
    columns: Vec<[f64; ALPHABET_SIZE]>,
    counts: CountMatrix,
    pseudocount: f64,
}

impl Pssm {
    /// Builds a PSSM from equal-length instance strings, adding `pseudocount` to every cell.
    pub fn build<S: AsRef<str>>(instances: &[S], pseudocount: f64) -> Result<Self> {
        check_pseudocount(pseudocount)?;
        let first = instances
            .first()
            .ok_or_else(|| MotifError::invalid("Cannot build a PSSM from zero instances"))?;
        let width = first.as_ref().len();
        if width == 0 {
            return Err(MotifError::invalid("Motif instances are empty"));
        }

        let mut counts = CountMatrix::new(width);
        for (index, instance) in instances.iter().enumerate() {
            let instance = instance.as_ref();
            if instance.len() != width {
                return Err(MotifError::invalid(format!(
                    "Instance {} has length {}, expected {}",
                    index + 1,
                    instance.len(),
                    width
                )));
            }
            let codes = encode_seq(instance)
                .map_err(|e| MotifError::invalid(format!("Instance {}: {}", index + 1, e)))?;
            counts.add(&codes);
        }
        Ok(Self::from_counts(&counts, pseudocount))
    }

    /// Smooths and normalizes a count matrix. An empty matrix yields uniform columns.
    pub fn from_counts(counts: &CountMatrix, pseudocount: f64) -> Self {
        let total = counts.num_instances() as f64 + ALPHABET_SIZE as f64 * pseudocount;
        let columns = counts
            .columns()
            .iter()
            .map(|column| column.map(|count| (count as f64 + pseudocount) / total))
            .collect();
        Self {
            columns,
            counts: counts.clone(),
            pseudocount,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[[f64; ALPHABET_SIZE]] {
        &self.columns
    }

    pub fn counts(&self) -> &CountMatrix {
        &self.counts
    }

    pub fn pseudocount(&self) -> f64 {
        self.pseudocount
    }

    pub fn num_instances(&self) -> usize {
        self.counts.num_instances()
    }

    /// Total information content in bits: the sum over columns of `2 - H(column)`.
    pub fn information_content(&self) -> f64 {
        let max_entropy = (ALPHABET_SIZE as f64).log2();
        self.columns
            .iter()
            .map(|column| {
                let entropy: f64 = column
                    .iter()
                    .filter(|&&p| p > 0.0)
                    .map(|&p| -p * p.log2())
                    .sum();
                max_entropy - entropy
            })
            .sum()
    }

    pub fn mismatch_score(&self) -> u32 {
        self.counts.mismatches()
    }

    pub fn score(&self, metric: ScoreMetric) -> f64 {
        match metric {
            ScoreMetric::InformationContent => self.information_content(),
            ScoreMetric::Mismatches => self.mismatch_score() as f64,
        }
    }

    /// Most probable base per column, ties resolved in A<C<G<T order.
    pub fn consensus(&self) -> String {
        self.columns
            .iter()
            .map(|column| {
                let mut best = 0;
                for code in 1..ALPHABET_SIZE {
                    if column[code] > column[best] {
                        best = code;
                    }
                }
                decode_base(best as u8)
            })
            .collect()
    }

    /// Log2 likelihood ratio of an encoded window against the uniform background.
    #[inline]
    pub fn log_odds(&self, window: &[u8]) -> f64 {
        debug_assert_eq!(window.len(), self.width());
        self.columns
            .iter()
            .zip(window)
            .map(|(column, &code)| (column[code as usize] / UNIFORM_BACKGROUND).log2())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const INSTANCES: [&str; 5] = ["ACGTAC", "ACGTTC", "ACCTAC", "TCGTAC", "ACGTAG"];

    #[test]
    fn columns_sum_to_one() {
        for pseudocount in [0.01, 0.5, 1.0, 4.0] {
            let pssm = Pssm::build(&INSTANCES, pseudocount).unwrap();
            assert_eq!(pssm.width(), 6);
            for column in pssm.columns() {
                assert_abs_diff_eq!(column.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn pseudocounts_keep_probabilities_positive() {
        let pssm = Pssm::build(&["AAAA"], 1.0).unwrap();
        assert_abs_diff_eq!(pssm.columns()[0][0], 2.0 / 5.0);
        assert_abs_diff_eq!(pssm.columns()[0][3], 1.0 / 5.0);
        assert!(pssm.columns().iter().flatten().all(|&p| p > 0.0));
    }

    #[test]
    fn build_rejects_invalid_instances() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Pssm::build(&empty, 1.0),
            Err(MotifError::InvalidInput(_))
        ));
        assert_eq!(
            Pssm::build(&["ACGT", "ACG"], 1.0).unwrap_err().to_string(),
            "Invalid input: Instance 2 has length 3, expected 4"
        );
        assert!(Pssm::build(&["ACGT", "ACNT"], 1.0).is_err());
        assert!(Pssm::build(&["ACGT"], 0.0).is_err());
        assert!(Pssm::build(&["ACGT"], f64::NAN).is_err());
    }

    #[test]
    fn score_is_order_invariant() {
        let forward = Pssm::build(&INSTANCES, 1.0).unwrap();
        let mut reversed = INSTANCES.to_vec();
        reversed.reverse();
        let reversed = Pssm::build(&reversed, 1.0).unwrap();
        let rotated = [INSTANCES[2], INSTANCES[4], INSTANCES[0], INSTANCES[3], INSTANCES[1]];
        let rotated = Pssm::build(&rotated, 1.0).unwrap();

        for metric in [ScoreMetric::InformationContent, ScoreMetric::Mismatches] {
            assert_eq!(forward.score(metric), reversed.score(metric));
            assert_eq!(forward.score(metric), rotated.score(metric));
        }
        assert_eq!(forward, rotated);
    }

    #[test]
    fn information_content_rewards_conservation() {
        let conserved = Pssm::build(&["ACGT"; 20], 0.01).unwrap();
        let mixed = Pssm::build(&["ACGT", "CGTA", "GTAC", "TACG"], 0.01).unwrap();
        assert!(conserved.information_content() > 7.5);
        assert_abs_diff_eq!(mixed.information_content(), 0.0, epsilon = 1e-12);
        assert!(conserved.information_content() <= 8.0);
    }

    #[test]
    fn mismatch_score_counts_disagreements() {
        let pssm = Pssm::build(&INSTANCES, 1.0).unwrap();
        // One disagreement in columns 0, 2, 4 and 5
        assert_eq!(pssm.mismatch_score(), 4);
        assert_eq!(pssm.score(ScoreMetric::Mismatches), 4.0);
    }

    #[test]
    fn consensus_breaks_ties_alphabetically() {
        let pssm = Pssm::build(&INSTANCES, 1.0).unwrap();
        assert_eq!(pssm.consensus(), "ACGTAC");

        let tied = Pssm::build(&["GA", "CT"], 1.0).unwrap();
        assert_eq!(tied.consensus(), "CA");
        let uniform = Pssm::from_counts(&CountMatrix::new(3), 1.0);
        assert_eq!(uniform.consensus(), "AAA");
    }

    #[test]
    fn log_odds_against_uniform_background() {
        let uniform = Pssm::from_counts(&CountMatrix::new(4), 0.5);
        assert_abs_diff_eq!(uniform.log_odds(&[0, 1, 2, 3]), 0.0, epsilon = 1e-12);

        let pssm = Pssm::build(&["AC", "AC", "AC"], 1.0).unwrap();
        // p(A) = p(C) = 4/7 in their columns
        let expected = 2.0 * ((4.0 / 7.0) / 0.25f64).log2();
        assert_abs_diff_eq!(pssm.log_odds(&[0, 1]), expected, epsilon = 1e-12);
        assert!(pssm.log_odds(&[0, 1]) > pssm.log_odds(&[3, 3]));
    }

    #[test]
    fn incremental_counts_match_from_scratch() {
        let encoded: Vec<Vec<u8>> = INSTANCES.iter().map(|s| encode_seq(s).unwrap()).collect();
        let mut running = CountMatrix::from_instances(6, encoded.iter().map(Vec::as_slice));

        running.remove(&encoded[1]);
        let leave_one_out = CountMatrix::from_instances(
            6,
            encoded
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != 1)
                .map(|(_, s)| s.as_slice()),
        );
        assert_eq!(running, leave_one_out);
        assert_eq!(
            Pssm::from_counts(&running, 1.0),
            Pssm::from_counts(&leave_one_out, 1.0)
        );

        running.add(&encoded[1]);
        assert_eq!(
            running,
            CountMatrix::from_instances(6, encoded.iter().map(Vec::as_slice))
        );
    }
}
