pub mod alphabet;
mod corpus;
mod metric;
mod pssm;

pub use corpus::{Corpus, Sequence};
pub use metric::{Direction, ScoreMetric};
pub use pssm::{check_pseudocount, CountMatrix, Pssm};
