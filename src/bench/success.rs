use super::synthetic::PlantedMotif;
use crate::utils::{MotifError, Result};

/// Decides whether a search recovered a planted motif.
///
/// A sequence counts as recovered when the found offset lies within `offset_tolerance` of the
/// planted one; the trial succeeds when at least `min_recovered_fraction` of sequences are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessCriterion {
    pub offset_tolerance: usize,
    pub min_recovered_fraction: f64,
}

impl Default for SuccessCriterion {
    fn default() -> Self {
        Self {
            offset_tolerance: 2,
            min_recovered_fraction: 0.5,
        }
    }
}

impl SuccessCriterion {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_recovered_fraction) {
            return Err(MotifError::invalid(format!(
                "Minimum recovered fraction must be between 0.0 and 1.0, got {}",
                self.min_recovered_fraction
            )));
        }
        Ok(())
    }

    pub fn recovered_fraction(&self, positions: &[usize], truth: &PlantedMotif) -> f64 {
        if truth.offsets.is_empty() {
            return 0.0;
        }
        let recovered = positions
            .iter()
            .zip(&truth.offsets)
            .filter(|(&found, &planted)| found.abs_diff(planted) <= self.offset_tolerance)
            .count();
        recovered as f64 / truth.offsets.len() as f64
    }

    pub fn is_success(&self, positions: &[usize], truth: &PlantedMotif) -> bool {
        self.recovered_fraction(positions, truth) >= self.min_recovered_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth() -> PlantedMotif {
        PlantedMotif {
            motif: "ACGT".into(),
            offsets: vec![10, 20, 30, 40],
            instances: vec!["ACGT".into(); 4],
        }
    }

    #[test]
    fn tolerance_is_inclusive() {
        let criterion = SuccessCriterion::default();
        assert_eq!(criterion.recovered_fraction(&[12, 18, 33, 0], &truth()), 0.5);
        assert!(criterion.is_success(&[12, 18, 33, 0], &truth()));
        assert!(!criterion.is_success(&[13, 18, 33, 0], &truth()));
    }

    #[test]
    fn tolerance_is_configurable() {
        let strict = SuccessCriterion {
            offset_tolerance: 0,
            min_recovered_fraction: 1.0,
        };
        assert!(strict.is_success(&[10, 20, 30, 40], &truth()));
        assert!(!strict.is_success(&[10, 20, 30, 41], &truth()));
        assert_eq!(strict.recovered_fraction(&[10, 20, 30, 41], &truth()), 0.75);
    }

    #[test]
    fn fraction_must_be_a_proportion() {
        assert!(SuccessCriterion::default().validate().is_ok());
        let criterion = SuccessCriterion {
            min_recovered_fraction: 1.2,
            ..Default::default()
        };
        assert!(criterion.validate().is_err());
    }
}
