use clap::Parser;
use motifseek::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{benchmark, discover, simulate},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Discover(_) => "discover",
        Command::Benchmark(_) => "benchmark",
        Command::Simulate(_) => "simulate",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Discover(args) => discover::discover(args)?,
        Command::Benchmark(args) => benchmark::benchmark(args)?,
        Command::Simulate(args) => simulate::simulate(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
