// Breakpoint output: JSON dump of mapped translocations and a flat TSV table

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::fusion::translocation::Translocation;

pub const TABLE_HEADER: &str =
    "xref\tgene\tdisp\tquery_start\tquery_end\tstrand\tbreakpoint\tchromosome\tstart\tend";

/// Write the mapped translocations as a pretty-printed JSON array.
pub fn write_breakpoints(translocations: &[Translocation], path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, translocations).map_err(|e| Error::json(e, path))?;
    writeln!(writer).map_err(|e| Error::io(e, path))?;
    writer.flush().map_err(|e| Error::io(e, path))
}

/// Writer for the breakpoint table
pub struct BreakpointTableWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl BreakpointTableWriter {
    /// Create the table file and write its header line
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path).map_err(|e| Error::io(e, path))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", TABLE_HEADER).map_err(|e| Error::io(e, path))?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    /// Write one row per resolved partner
    ///
    /// Format: 10 tab-separated columns
    /// 1. Translocation reference
    /// 2. Partner gene
    /// 3. Junction role (5prime/3prime)
    /// 4. Query start (1-based)
    /// 5. Query end (1-based)
    /// 6. Strand (1/-1)
    /// 7. Breakpoint (1-based)
    /// 8. Chromosome
    /// 9. Aligned region start (1-based)
    /// 10. Aligned region end (1-based)
    pub fn write_translocation(&mut self, translocation: &Translocation) -> Result<usize, Error> {
        let mut rows = 0;
        for partner in &translocation.partners {
            let Some(aln) = &partner.aln else {
                continue;
            };
            writeln!(
                self.writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                translocation.xref,
                partner.hgnc_symbol,
                partner.disp,
                aln.query_start,
                aln.query_end,
                aln.strand,
                aln.breakpoint,
                aln.chromosome_name,
                aln.start_position,
                aln.end_position,
            )
            .map_err(|e| Error::io(e, &self.path))?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Flush buffered data to disk
    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|e| Error::io(e, &self.path))
    }
}

/// Human-readable per-translocation report, one entry per log line.
pub fn report_lines(translocation: &Translocation) -> Vec<String> {
    let mut lines = vec![
        translocation.xref.clone(),
        "\tgene\tdisp\tquery\tstrand\tbreakpoint\tsubject".to_string(),
    ];
    for partner in &translocation.partners {
        if let Some(aln) = &partner.aln {
            lines.push(format!(
                "\t{}\t{}\t{}-{}\t{}\t{}\t{}:{}-{}",
                partner.hgnc_symbol,
                partner.disp,
                aln.query_start,
                aln.query_end,
                aln.strand,
                aln.breakpoint,
                aln.chromosome_name,
                aln.start_position,
                aln.end_position
            ));
        }
    }
    lines
}
