use crate::bench::{SuccessCriterion, SyntheticParams};
use crate::motif::ScoreMetric;
use crate::search::{Algorithm, GibbsParams, GreedyParams, SearchParams};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="motifseek",
          version=&**FULL_VERSION,
          about="Motif discovery in DNA sequences with Gibbs sampling and greedy consensus search",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Discover a motif in a set of sequences")]
    Discover(DiscoverArgs),
    #[clap(about = "Compare searchers on synthetic corpora with planted motifs")]
    Benchmark(BenchmarkArgs),
    #[clap(about = "Generate a synthetic corpus with a planted motif")]
    Simulate(SimulateArgs),
}

/// Searcher selection; `both` runs greedy then Gibbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmChoice {
    Single(Algorithm),
    Both,
}

impl AlgorithmChoice {
    pub fn algorithms(&self) -> Vec<Algorithm> {
        match self {
            AlgorithmChoice::Single(algorithm) => vec![*algorithm],
            AlgorithmChoice::Both => vec![Algorithm::Greedy, Algorithm::Gibbs],
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[clap(help_heading("Search"))]
    #[clap(long = "metric")]
    #[clap(value_name = "METRIC")]
    #[clap(help = "Alignment score (information or mismatch)")]
    #[clap(default_value = "information")]
    pub metric: ScoreMetric,

    #[clap(help_heading("Search"))]
    #[clap(long = "pseudocount")]
    #[clap(value_name = "PSEUDOCOUNT")]
    #[clap(help = "Pseudocount added to every PSSM cell")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = positive_float)]
    pub pseudocount: f64,

    #[clap(help_heading("Search"))]
    #[clap(long = "iterations")]
    #[clap(value_name = "SWEEPS")]
    #[clap(help = "Gibbs sweeps per restart; a sweep resamples every sequence once")]
    #[clap(default_value = "1000")]
    #[arg(value_parser = positive_int)]
    pub num_iterations: usize,

    #[clap(help_heading("Search"))]
    #[clap(long = "max-iterations")]
    #[clap(value_name = "PASSES")]
    #[clap(help = "Maximum greedy refinement passes")]
    #[clap(default_value = "50")]
    #[arg(value_parser = positive_int)]
    pub max_iterations: usize,

    #[clap(help_heading("Search"))]
    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Random seed; drawn and logged when omitted")]
    pub seed: Option<u64>,
}

impl SearchArgs {
    pub fn search_params(&self, motif_width: usize) -> SearchParams {
        SearchParams {
            motif_width,
            pseudocount: self.pseudocount,
            metric: self.metric,
        }
    }

    pub fn greedy_params(&self) -> GreedyParams {
        GreedyParams {
            max_iterations: self.max_iterations,
        }
    }

    pub fn gibbs_params(&self, num_restarts: usize) -> GibbsParams {
        GibbsParams {
            num_iterations: self.num_iterations,
            num_restarts,
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("discover")))]
#[command(arg_required_else_help(true))]
pub struct DiscoverArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "FASTA, JASPAR .sites or tab-delimited sequence file (optionally gzipped)")]
    #[clap(value_name = "SEQUENCES")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(required = true)]
    #[clap(short = 'k')]
    #[clap(long = "motif-width")]
    #[clap(help = "Motif width")]
    #[clap(value_name = "K")]
    #[arg(value_parser = positive_int)]
    pub motif_width: usize,

    #[clap(short = 'a')]
    #[clap(long = "algorithm")]
    #[clap(value_name = "ALGORITHM")]
    #[clap(help = "Searcher to run (gibbs, greedy or both)")]
    #[clap(default_value = "both")]
    #[arg(value_parser = algorithm_choice)]
    pub algorithm: AlgorithmChoice,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Search"))]
    #[clap(long = "restarts")]
    #[clap(value_name = "RESTARTS")]
    #[clap(help = "Independent Gibbs chains")]
    #[clap(default_value = "20")]
    #[arg(value_parser = positive_int)]
    pub num_restarts: usize,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("benchmark")))]
#[command(arg_required_else_help(true))]
pub struct BenchmarkArgs {
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 'a')]
    #[clap(long = "algorithm")]
    #[clap(value_name = "ALGORITHM")]
    #[clap(help = "Searcher to run (gibbs, greedy or both)")]
    #[clap(default_value = "both")]
    #[arg(value_parser = algorithm_choice)]
    pub algorithm: AlgorithmChoice,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "trials")]
    #[clap(value_name = "TRIALS")]
    #[clap(help = "Number of synthetic corpora")]
    #[clap(default_value = "50")]
    #[arg(value_parser = positive_int)]
    pub num_trials: usize,

    #[clap(help_heading("Synthetic data"))]
    #[clap(short = 'k')]
    #[clap(long = "motif-width")]
    #[clap(value_name = "K")]
    #[clap(help = "Width of the planted motif")]
    #[clap(default_value = "8")]
    #[arg(value_parser = positive_int)]
    pub motif_width: usize,

    #[clap(help_heading("Synthetic data"))]
    #[clap(long = "num-sequences")]
    #[clap(value_name = "N")]
    #[clap(help = "Sequences per corpus")]
    #[clap(default_value = "10")]
    #[arg(value_parser = positive_int)]
    pub num_sequences: usize,

    #[clap(help_heading("Synthetic data"))]
    #[clap(long = "sequence-length")]
    #[clap(value_name = "LENGTH")]
    #[clap(help = "Length of every sequence")]
    #[clap(default_value = "100")]
    #[arg(value_parser = positive_int)]
    pub sequence_length: usize,

    #[clap(help_heading("Synthetic data"))]
    #[clap(long = "mutation-rate")]
    #[clap(value_name = "RATE")]
    #[clap(help = "Per-base substitution probability of planted instances")]
    #[clap(default_value = "0.1")]
    #[arg(value_parser = ensure_unit_float)]
    pub mutation_rate: f64,

    #[clap(help_heading("Success"))]
    #[clap(long = "tolerance")]
    #[clap(value_name = "OFFSET")]
    #[clap(help = "Maximum distance from the planted offset for a sequence to count as recovered")]
    #[clap(default_value = "2")]
    pub offset_tolerance: usize,

    #[clap(help_heading("Success"))]
    #[clap(long = "min-recovered")]
    #[clap(value_name = "FRAC")]
    #[clap(help = "Minimum fraction of recovered sequences for a successful trial")]
    #[clap(default_value = "0.5")]
    #[arg(value_parser = ensure_unit_float)]
    pub min_recovered_fraction: f64,

    #[clap(help_heading("Search"))]
    #[clap(long = "restarts")]
    #[clap(value_name = "RESTARTS")]
    #[clap(help = "Independent Gibbs chains")]
    #[clap(default_value = "5")]
    #[arg(value_parser = positive_int)]
    pub num_restarts: usize,

    #[command(flatten)]
    pub search: SearchArgs,
}

impl BenchmarkArgs {
    pub fn synthetic_params(&self) -> SyntheticParams {
        SyntheticParams {
            num_sequences: self.num_sequences,
            sequence_length: self.sequence_length,
            motif_width: self.motif_width,
            mutation_rate: self.mutation_rate,
        }
    }

    pub fn success_criterion(&self) -> SuccessCriterion {
        SuccessCriterion {
            offset_tolerance: self.offset_tolerance,
            min_recovered_fraction: self.min_recovered_fraction,
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("simulate")))]
#[command(arg_required_else_help(true))]
pub struct SimulateArgs {
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 'k')]
    #[clap(long = "motif-width")]
    #[clap(value_name = "K")]
    #[clap(help = "Width of the planted motif")]
    #[clap(default_value = "8")]
    #[arg(value_parser = positive_int)]
    pub motif_width: usize,

    #[clap(long = "num-sequences")]
    #[clap(value_name = "N")]
    #[clap(help = "Number of sequences")]
    #[clap(default_value = "10")]
    #[arg(value_parser = positive_int)]
    pub num_sequences: usize,

    #[clap(long = "sequence-length")]
    #[clap(value_name = "LENGTH")]
    #[clap(help = "Length of every sequence")]
    #[clap(default_value = "100")]
    #[arg(value_parser = positive_int)]
    pub sequence_length: usize,

    #[clap(long = "mutation-rate")]
    #[clap(value_name = "RATE")]
    #[clap(help = "Per-base substitution probability of planted instances")]
    #[clap(default_value = "0.1")]
    #[arg(value_parser = ensure_unit_float)]
    pub mutation_rate: f64,

    #[clap(long = "seed")]
    #[clap(value_name = "SEED")]
    #[clap(help = "Random seed; drawn and logged when omitted")]
    pub seed: Option<u64>,
}

impl SimulateArgs {
    pub fn synthetic_params(&self) -> SyntheticParams {
        SyntheticParams {
            num_sequences: self.num_sequences,
            sequence_length: self.sequence_length,
            motif_width: self.motif_width,
            mutation_rate: self.mutation_rate,
        }
    }
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String, String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn check_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn threads_in_range(s: &str) -> Result<usize, String> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn positive_int(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid positive integer", s))?;
    if value == 0 {
        Err("The value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

fn positive_float(s: &str) -> Result<f64, String> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("The value must be a positive number, got: {}", value))
    }
}

fn ensure_unit_float(s: &str) -> Result<f64, String> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn algorithm_choice(s: &str) -> Result<AlgorithmChoice, String> {
    match s {
        "both" => Ok(AlgorithmChoice::Both),
        _ => s
            .parse::<Algorithm>()
            .map(AlgorithmChoice::Single)
            .map_err(|_| "Invalid algorithm. Options are: gibbs, greedy, both".to_string()),
    }
}
