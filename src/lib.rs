pub mod bench;
pub mod cli;
pub mod commands;
pub mod motif;
pub mod search;
pub mod utils;
pub mod writers;
