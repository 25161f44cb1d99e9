use std::path::{Path, PathBuf};

use clap::Parser;

use crate::align::blast::{BLASTN, MAKEBLASTDB};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Run mode enum
// ---------------------------------------------------------------------------

/// `--runMode` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Prepare,
    Find,
}

impl std::str::FromStr for RunMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prepare" => Ok(Self::Prepare),
            "find" => Ok(Self::Find),
            _ => Err(format!(
                "unknown runMode '{s}'; expected 'prepare' or 'find'"
            )),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prepare => write!(f, "prepare"),
            Self::Find => write!(f, "find"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// fusebreak command-line parameters (`--camelCase` argument names).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fusebreak",
    about = "Locate gene-fusion breakpoints from junction sequences",
    version
)]
pub struct Parameters {
    // ── Run ─────────────────────────────────────────────────────────────
    /// Run mode: prepare or find
    #[arg(long = "runMode")]
    pub run_mode: RunMode,

    /// Number of threads (find)
    #[arg(long = "runThreadN", default_value_t = 1)]
    pub run_thread_n: usize,

    // ── Transcripts ─────────────────────────────────────────────────────
    /// FASTA file of unspliced transcripts with exon structure in the headers (prepare)
    #[arg(long = "transcriptsFile")]
    pub transcripts_file: Option<PathBuf>,

    /// FASTA file of exon/intron sequences (written by prepare, read by find)
    #[arg(long = "sequencesFile")]
    pub sequences_file: Option<PathBuf>,

    /// JSON file of transcript structures keyed by gene (written by prepare, read by find)
    #[arg(long = "detailsFile")]
    pub details_file: Option<PathBuf>,

    // ── Breakpoints ─────────────────────────────────────────────────────
    /// Tab-separated TICdb translocations file (find)
    #[arg(long = "translocationsFile")]
    pub translocations_file: Option<PathBuf>,

    /// Work area for the aligner database and temporary files (find)
    #[arg(long = "workDir", default_value = "./")]
    pub work_dir: PathBuf,

    /// Directory holding the makeblastdb and blastn executables (find)
    #[arg(long = "blastBinDir")]
    pub blast_bin_dir: Option<PathBuf>,

    /// Output JSON file of mapped translocations (find)
    #[arg(long = "breakpointsFile")]
    pub breakpoints_file: Option<PathBuf>,

    /// Optional tab-separated breakpoint table, one row per resolved partner (find)
    #[arg(long = "breakpointsTable")]
    pub breakpoints_table: Option<PathBuf>,
}

impl Parameters {
    pub fn transcripts_file(&self) -> Result<&Path, Error> {
        required(&self.transcripts_file, "transcriptsFile", &self.run_mode)
    }

    pub fn sequences_file(&self) -> Result<&Path, Error> {
        required(&self.sequences_file, "sequencesFile", &self.run_mode)
    }

    pub fn details_file(&self) -> Result<&Path, Error> {
        required(&self.details_file, "detailsFile", &self.run_mode)
    }

    pub fn translocations_file(&self) -> Result<&Path, Error> {
        required(&self.translocations_file, "translocationsFile", &self.run_mode)
    }

    pub fn blast_bin_dir(&self) -> Result<&Path, Error> {
        required(&self.blast_bin_dir, "blastBinDir", &self.run_mode)
    }

    pub fn breakpoints_file(&self) -> Result<&Path, Error> {
        required(&self.breakpoints_file, "breakpointsFile", &self.run_mode)
    }

    /// Validate parameter consistency after parsing.
    pub fn validate(&self) -> Result<(), Error> {
        match self.run_mode {
            RunMode::Prepare => {
                existing_file(self.transcripts_file()?, "transcriptsFile")?;
                self.sequences_file()?;
                self.details_file()?;
            }
            RunMode::Find => {
                existing_file(self.translocations_file()?, "translocationsFile")?;
                existing_file(self.sequences_file()?, "sequencesFile")?;
                existing_file(self.details_file()?, "detailsFile")?;
                existing_dir(&self.work_dir, "workDir")?;

                let bin_dir = self.blast_bin_dir()?;
                existing_dir(bin_dir, "blastBinDir")?;
                for exe in [MAKEBLASTDB, BLASTN] {
                    if !bin_dir.join(exe).is_file() {
                        return Err(Error::Parameter(format!(
                            "could not find {} in --blastBinDir {}",
                            exe,
                            bin_dir.display()
                        )));
                    }
                }

                self.breakpoints_file()?;
            }
        }

        // Thread count must be at least 1
        if self.run_thread_n == 0 {
            return Err(Error::Parameter("--runThreadN must be >= 1".into()));
        }

        Ok(())
    }
}

fn required<'a>(value: &'a Option<PathBuf>, name: &str, mode: &RunMode) -> Result<&'a Path, Error> {
    value
        .as_deref()
        .ok_or_else(|| Error::Parameter(format!("--{name} is required when --runMode {mode}")))
}

fn existing_file(path: &Path, name: &str) -> Result<(), Error> {
    if !path.is_file() {
        return Err(Error::Parameter(format!(
            "--{name} {} is not a file",
            path.display()
        )));
    }
    Ok(())
}

fn existing_dir(path: &Path, name: &str) -> Result<(), Error> {
    if !path.is_dir() {
        return Err(Error::Parameter(format!(
            "--{name} {} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
