/// Locate translocation breakpoints (the `find` run mode)
///
/// Aligns each translocation's junction sequence against the exon/intron
/// database and reconciles the best hit for every partner gene into a
/// genomic breakpoint. Translocations whose partner genes were not prepared
/// are skipped; the rest are written out in input order, resolved or not.
use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;

use crate::align::{Aligner, BlastAligner};
use crate::error::Error;
use crate::fusion::{self, BreakpointTableWriter, Translocation};
use crate::params::Parameters;
use crate::prepare::read_details;
use crate::stats::BreakpointStats;
use crate::transcript::TranscriptCatalog;

/// What happened to one translocation.
#[derive(Debug)]
enum Outcome {
    Aligned,
    Failed,
}

/// Align and resolve `translocations` on a pool of `threads` workers.
///
/// Results keep the input order. An aligner failure only affects its own
/// translocation; a reconciliation error aborts the run.
pub fn locate_all<A: Aligner>(
    translocations: &mut [Translocation],
    catalog: &TranscriptCatalog,
    aligner: &A,
    threads: usize,
    stats: &mut BreakpointStats,
) -> Result<(), Error> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::Parameter(format!("failed to build thread pool: {e}")))?;

    let outcomes: Vec<Result<Outcome, Error>> = pool.install(|| {
        translocations
            .par_iter_mut()
            .map(|t| match aligner.align(&t.xref, &t.junction_sequence) {
                Ok(hits) => fusion::locate_breakpoints(t, catalog, &hits).map(|_| Outcome::Aligned),
                Err(e) if matches!(e, Error::Alignment(_)) || e.is_record_level() => {
                    warn!("{}: {}", t.xref, e);
                    Ok(Outcome::Failed)
                }
                Err(e) => Err(e),
            })
            .collect()
    });

    for (translocation, outcome) in translocations.iter().zip(outcomes) {
        match outcome? {
            Outcome::Aligned => stats.record_translocation(translocation),
            Outcome::Failed => stats.record_failure(translocation),
        }
        for line in fusion::report_lines(translocation) {
            info!("{}", line);
        }
    }
    Ok(())
}

/// Keep the translocations whose partner genes are all in `catalog`.
pub fn mappable(
    translocations: Vec<Translocation>,
    catalog: &TranscriptCatalog,
    stats: &mut BreakpointStats,
) -> Vec<Translocation> {
    let (kept, skipped): (Vec<_>, Vec<_>) = translocations
        .into_iter()
        .partition(|t| t.partners_in(catalog));
    stats.skipped += skipped.len() as u64;
    kept
}

/// Full `find` step, driven by the command-line parameters.
pub fn find_breakpoints(params: &Parameters) -> Result<BreakpointStats, Error> {
    let mut stats = BreakpointStats::new();

    let (translocations, malformed) = fusion::read_translocations(params.translocations_file()?)?;
    stats.translocations_read = translocations.len() as u64;
    stats.malformed = malformed as u64;

    let details_file = params.details_file()?;
    let catalog = read_details(details_file)?;
    info!(
        "Loaded {} transcripts ({} exons/introns) for {} genes from {}",
        catalog.n_transcripts(),
        catalog.n_components(),
        catalog.n_genes(),
        details_file.display()
    );

    let mut translocations = mappable(translocations, &catalog, &mut stats);
    info!(
        "{} translocations have transcripts for both partners",
        translocations.len()
    );

    let aligner = BlastAligner::prepare(
        params.blast_bin_dir()?,
        &params.work_dir,
        params.sequences_file()?,
    )?;

    locate_all(
        &mut translocations,
        &catalog,
        &aligner,
        params.run_thread_n,
        &mut stats,
    )?;

    let breakpoints_file = params.breakpoints_file()?;
    fusion::write_breakpoints(&translocations, breakpoints_file)?;
    info!(
        "Wrote {} mapped translocations to {}",
        translocations.len(),
        breakpoints_file.display()
    );

    if let Some(table) = &params.breakpoints_table {
        write_table(&translocations, table)?;
    }

    Ok(stats)
}

fn write_table(translocations: &[Translocation], path: &Path) -> Result<(), Error> {
    let mut writer = BreakpointTableWriter::create(path)?;
    let mut rows = 0;
    for t in translocations {
        rows += writer.write_translocation(t)?;
    }
    writer.flush()?;
    info!("Wrote {} breakpoints to {}", rows, path.display());
    Ok(())
}
