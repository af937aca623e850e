use crate::bench::generate;
use crate::cli::SimulateArgs;
use crate::utils::{create_writer, resolve_seed, Result};
use crate::writers::{write_fasta, write_truth};

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let params = args.synthetic_params();
    let seed = resolve_seed(args.seed);
    let (corpus, planted) = generate(&params, seed)?;
    log::info!(
        "Planted motif {} in {} sequences of length {}",
        planted.motif,
        corpus.len(),
        params.sequence_length
    );

    create_writer(&args.output_prefix, "fa", |path| write_fasta(path, &corpus))?;
    create_writer(&args.output_prefix, "truth.tsv", |path| {
        write_truth(path, &corpus, &planted)
    })?;
    Ok(())
}
