use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Scoring convention for a motif alignment.
///
/// `InformationContent` is the total information content of the PSSM in bits and is maximized.
/// `Mismatches` counts, over all columns, the instances that disagree with the column's most
/// frequent base and is minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMetric {
    #[default]
    InformationContent,
    Mismatches,
}

impl ScoreMetric {
    pub fn direction(&self) -> Direction {
        match self {
            ScoreMetric::InformationContent => Direction::Maximize,
            ScoreMetric::Mismatches => Direction::Minimize,
        }
    }

    /// Strict comparison: equal scores never replace the incumbent.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        match self.direction() {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }

    /// A score every real score improves on.
    pub fn worst(&self) -> f64 {
        match self.direction() {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoreMetric::InformationContent => "information",
            ScoreMetric::Mismatches => "mismatch",
        }
    }
}

impl fmt::Display for ScoreMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoreMetric {
    type Err = &'static str;
    fn from_str(metric: &str) -> Result<Self, Self::Err> {
        match metric {
            "information" => Ok(ScoreMetric::InformationContent),
            "mismatch" => Ok(ScoreMetric::Mismatches),
            _ => Err("Invalid metric. Options are: information, mismatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn information_content_is_maximized() {
        let metric = ScoreMetric::InformationContent;
        assert!(metric.is_better(10.0, 3.0));
        assert!(!metric.is_better(3.0, 10.0));
        assert!(!metric.is_better(3.0, 3.0));
        assert!(metric.is_better(0.0, metric.worst()));
    }

    #[test]
    fn mismatches_are_minimized() {
        let metric = ScoreMetric::Mismatches;
        assert!(metric.is_better(3.0, 26.0));
        assert!(!metric.is_better(26.0, 3.0));
        assert!(metric.is_better(1e9, metric.worst()));
    }

    #[test]
    fn parse_metric_names() {
        assert_eq!(
            "information".parse::<ScoreMetric>(),
            Ok(ScoreMetric::InformationContent)
        );
        assert_eq!("mismatch".parse::<ScoreMetric>(), Ok(ScoreMetric::Mismatches));
        assert!("entropy".parse::<ScoreMetric>().is_err());
        assert_eq!(ScoreMetric::Mismatches.to_string(), "mismatch");
    }
}
