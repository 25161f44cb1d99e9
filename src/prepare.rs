/// Split transcripts into exon/intron sequences (the `prepare` run mode)
///
/// Reads a FASTA file of unspliced transcripts, decomposes each record and
/// writes:
/// - a component FASTA file (one record per exon/intron, keyed by uid)
/// - a JSON details file with the transcript structures keyed by gene symbol
///
/// A malformed record is reported and skipped; the remaining records are
/// still processed.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{info, warn};

use crate::error::Error;
use crate::fasta::{self, FastaReader};
use crate::transcript::{decompose, TranscriptCatalog, UidAllocator};

/// Counts reported at the end of a `prepare` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrepareSummary {
    pub transcripts: usize,
    pub skipped: usize,
    pub components: u64,
}

/// Decompose every transcript in `transcripts_file`.
///
/// Returns the catalog together with the run summary. Component sequences are
/// streamed to `sequences` as they are produced.
pub fn split_transcripts<W: Write>(
    transcripts_file: &Path,
    sequences: &mut W,
    uids: &mut UidAllocator,
) -> Result<(TranscriptCatalog, PrepareSummary), Error> {
    let mut catalog = TranscriptCatalog::new();
    let mut summary = PrepareSummary::default();

    for record in FastaReader::from_path(transcripts_file)? {
        let record = record?;

        let decomposition = match decompose(&record.header, &record.sequence, uids) {
            Ok(d) => d,
            Err(e) if e.is_record_level() => {
                warn!("Skipping transcript: {}", e);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for component in &decomposition.sequences {
            fasta::write_record(sequences, &component.fasta_header(), &component.sequence)
                .map_err(|e| Error::io(e, "<component sequences>"))?;
        }

        summary.transcripts += 1;
        catalog.insert(decomposition.gene_symbol, decomposition.transcript);
    }

    summary.components = uids.allocated();
    Ok((catalog, summary))
}

/// Full `prepare` step: read transcripts, write component FASTA and details JSON.
pub fn process_transcripts(
    transcripts_file: &Path,
    sequences_file: &Path,
    details_file: &Path,
) -> Result<PrepareSummary, Error> {
    let file = File::create(sequences_file).map_err(|e| Error::io(e, sequences_file))?;
    let mut writer = BufWriter::new(file);

    let mut uids = UidAllocator::new();
    let (catalog, summary) = split_transcripts(transcripts_file, &mut writer, &mut uids)?;
    writer.flush().map_err(|e| Error::io(e, sequences_file))?;

    info!(
        "Wrote {} exons/introns to {}",
        summary.components,
        sequences_file.display()
    );
    if summary.skipped > 0 {
        warn!("Skipped {} malformed transcript record(s)", summary.skipped);
    }

    write_details(&catalog, details_file)?;
    info!(
        "Wrote {} transcripts for {} genes to {}",
        catalog.n_transcripts(),
        catalog.n_genes(),
        details_file.display()
    );

    Ok(summary)
}

pub fn write_details(catalog: &TranscriptCatalog, path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, catalog).map_err(|e| Error::json(e, path))?;
    writer.flush().map_err(|e| Error::io(e, path))
}

pub fn read_details(path: &Path) -> Result<TranscriptCatalog, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| Error::json(e, path))
}
