use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use seqrep::seqrep::{run_seqrep, Args, RunOutcome};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    let dir = args.sequencing_dir.clone();
    let outcome = run_seqrep(args)
        .with_context(|| format!("Could not generate reports for {}", dir.display()))?;
    match outcome {
        RunOutcome::SheetWritten(path) => log::info!("Pairing sheet written to {}", path.display()),
        RunOutcome::Reports(paths) => log::info!("Generated {} reports", paths.len()),
    }
    Ok(())
}
