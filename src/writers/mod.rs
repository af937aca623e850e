mod benchmark;
mod discovery;
mod simulation;

pub use benchmark::{write_summaries, TrialWriter};
pub use discovery::{write_instances, write_pssm, write_summary, write_trace};
pub use simulation::{write_fasta, write_truth};
