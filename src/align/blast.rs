// BLAST+ backed aligner: makeblastdb once per run, blastn once per junction query

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::align::hit::{parse_tabular, AlignmentHit};
use crate::align::Aligner;
use crate::error::Error;
use crate::fasta;

pub const MAKEBLASTDB: &str = "makeblastdb";
pub const BLASTN: &str = "blastn";

/// Database file name inside the work directory.
const DATABASE_NAME: &str = "target.fa";
const MAKEBLASTDB_LOG: &str = "makeblastdb.log";

/// blastn options for exact, ungapped, strand-aware junction matching.
const BLASTN_ARGS: [&str; 11] = [
    "-dust",
    "no",
    "-word_size",
    "7",
    "-ungapped",
    "-perc_identity",
    "100",
    "-evalue",
    "0.001",
    "-outfmt",
    "7 std sstrand",
];

/// Aligner running the BLAST+ executables found in one directory.
#[derive(Debug, Clone)]
pub struct BlastAligner {
    blastn: PathBuf,
    database: PathBuf,
    work_dir: PathBuf,
}

impl BlastAligner {
    /// Copy the component FASTA into `work_dir` and format it with makeblastdb.
    pub fn prepare(
        blast_bin_dir: &Path,
        work_dir: &Path,
        sequences_file: &Path,
    ) -> Result<Self, Error> {
        let database = work_dir.join(DATABASE_NAME);
        fs::copy(sequences_file, &database).map_err(|e| Error::io(e, sequences_file))?;

        let makeblastdb = blast_bin_dir.join(MAKEBLASTDB);
        let log_file = work_dir.join(MAKEBLASTDB_LOG);
        info!("Building BLAST database {}", database.display());

        let mut cmd = Command::new(&makeblastdb);
        cmd.arg("-dbtype")
            .arg("nucl")
            .arg("-in")
            .arg(&database)
            .arg("-logfile")
            .arg(&log_file);
        run(cmd, &makeblastdb)?;

        Ok(Self {
            blastn: blast_bin_dir.join(BLASTN),
            database,
            work_dir: work_dir.to_path_buf(),
        })
    }
}

impl Aligner for BlastAligner {
    fn align(&self, query_name: &str, sequence: &str) -> Result<Vec<AlignmentHit>, Error> {
        let prefix = format!("{}.", file_stem(query_name));

        // Both files are removed when dropped
        let mut query = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".fa")
            .tempfile_in(&self.work_dir)
            .map_err(|e| Error::io(e, &self.work_dir))?;
        let query_path = query.path().to_path_buf();
        fasta::write_record(&mut query, query_name, sequence.as_bytes())
            .and_then(|_| query.flush())
            .map_err(|e| Error::io(e, &query_path))?;

        let results = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".alns")
            .tempfile_in(&self.work_dir)
            .map_err(|e| Error::io(e, &self.work_dir))?;

        let mut cmd = Command::new(&self.blastn);
        cmd.arg("-query")
            .arg(query.path())
            .arg("-db")
            .arg(&self.database)
            .args(BLASTN_ARGS)
            .arg("-out")
            .arg(results.path());
        run(cmd, &self.blastn)?;

        let report = fs::read_to_string(results.path()).map_err(|e| Error::io(e, results.path()))?;
        let hits = parse_tabular(&report)?;
        debug!("{}: {} hit(s) from blastn", query_name, hits.len());
        Ok(hits)
    }
}

fn run(mut cmd: Command, program: &Path) -> Result<(), Error> {
    let output = cmd.output().map_err(|e| {
        Error::Alignment(format!("failed to run {}: {}", program.display(), e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Alignment(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Query names come from free-text references; keep them file-name safe.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "query".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(file_stem("PMID 123/4"), "PMID_123_4");
        assert_eq!(file_stem(""), "query");
        assert_eq!(file_stem("ok-name_1"), "ok-name_1");
    }

    #[test]
    fn missing_makeblastdb_is_alignment_error() {
        let dir = tempdir().unwrap();
        let seqs = dir.path().join("seqs.fa");
        fs::write(&seqs, ">1 E1|G|1|1|4|1|exon\nACGT\n").unwrap();

        let err = BlastAligner::prepare(&dir.path().join("nobin"), dir.path(), &seqs).unwrap_err();
        assert!(matches!(err, Error::Alignment(_)));
        // The database copy is made before formatting
        assert!(dir.path().join(DATABASE_NAME).exists());
    }

    #[cfg(unix)]
    #[test]
    fn stub_blastn_results_are_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();

        let script = |name: &str, body: &str| {
            let path = bin.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        };
        script(MAKEBLASTDB, "exit 0");
        // Writes a canned report to the path following -out
        script(
            BLASTN,
            r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-out" ]; then out="$2"; fi
  shift
done
printf '# BLASTN\nquery\t2\t100.00\t4\t0\t0\t1\t4\t1\t4\t0.5\t8.1\tplus\n' > "$out""#,
        );

        let seqs = dir.path().join("seqs.fa");
        fs::write(&seqs, ">2 E1|G|1|1|4|1|exon\nACGT\n").unwrap();

        let aligner = BlastAligner::prepare(&bin, &work, &seqs).unwrap();
        let hits = aligner.align("X 1", "ACGT").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subject_uid(), Some(2));

        // Only the database copy is left behind
        let left: Vec<_> = fs::read_dir(&work)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(left, vec![DATABASE_NAME.to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_blastn_is_alignment_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        for name in [MAKEBLASTDB, BLASTN] {
            let path = dir.path().join(name);
            let body = if name == BLASTN { "echo boom >&2; exit 2" } else { "exit 0" };
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let seqs = dir.path().join("seqs.fa");
        fs::write(&seqs, ">1 E1|G|1|1|4|1|exon\nACGT\n").unwrap();
        let work = tempdir().unwrap();

        let aligner = BlastAligner::prepare(dir.path(), work.path(), &seqs).unwrap();
        let err = aligner.align("q", "ACGT").unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
