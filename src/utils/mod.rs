mod io_utils;
pub mod math;
mod readers;
mod seeds;
mod util;

pub use io_utils::create_writer;
pub use readers::read_corpus;
pub use seeds::{derive_seed, resolve_seed};
pub use util::{handle_error_and_exit, MotifError, Result};
