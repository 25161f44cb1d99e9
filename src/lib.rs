pub mod error;
pub mod params;

pub mod align;
pub mod fasta;
pub mod find;
pub mod fusion;
pub mod prepare;
pub mod stats;
pub mod transcript;

use log::info;

use crate::params::{Parameters, RunMode};

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("fusebreak v{}", env!("CARGO_PKG_VERSION"));
    info!("runMode: {}", params.run_mode);

    match params.run_mode {
        RunMode::Prepare => prepare_components(params),
        RunMode::Find => locate_breakpoints(params),
    }
}

fn prepare_components(params: &Parameters) -> anyhow::Result<()> {
    let transcripts_file = params.transcripts_file()?;
    info!("transcriptsFile: {}", transcripts_file.display());

    info!("Splitting transcripts into exons and introns...");
    let summary = prepare::process_transcripts(
        transcripts_file,
        params.sequences_file()?,
        params.details_file()?,
    )?;

    info!(
        "Prepare complete: {} transcripts, {} skipped",
        summary.transcripts, summary.skipped
    );
    Ok(())
}

fn locate_breakpoints(params: &Parameters) -> anyhow::Result<()> {
    info!("translocationsFile: {}", params.translocations_file()?.display());
    info!("workDir: {}", params.work_dir.display());
    info!("runThreadN: {}", params.run_thread_n);

    let stats = find::find_breakpoints(params)?;
    stats.print_summary();

    info!("Breakpoint search complete!");
    Ok(())
}
