use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Line width used for every FASTA file we write.
pub const LINE_WIDTH: usize = 60;

/// A single FASTA record: header line (without '>') and concatenated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: Vec<u8>,
}

/// Streaming FASTA reader.
///
/// - Blank lines are skipped
/// - Trailing whitespace is stripped from every line
/// - Sequence lines are concatenated as-is (case preserved)
///
/// Only one record is held in memory at a time.
pub struct FastaReader<R: BufRead> {
    reader: R,
    path: PathBuf,
    line: String,
    line_num: usize,
    pending_header: Option<String>,
    done: bool,
}

impl FastaReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(e, path))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            line: String::new(),
            line_num: 0,
            pending_header: None,
            done: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<FastaRecord>, Error> {
        let mut sequence = Vec::new();

        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| Error::io(e, &self.path))?;
            if n == 0 {
                self.done = true;
                return Ok(self.pending_header.take().map(|header| FastaRecord {
                    header,
                    sequence,
                }));
            }
            self.line_num += 1;

            let stripped = self.line.trim_end();
            if stripped.is_empty() {
                continue;
            }

            if let Some(header) = stripped.strip_prefix('>') {
                let header = header.to_string();
                if let Some(prev) = self.pending_header.replace(header) {
                    return Ok(Some(FastaRecord {
                        header: prev,
                        sequence,
                    }));
                }
            } else {
                if self.pending_header.is_none() {
                    return Err(Error::Format(format!(
                        "sequence data before first header at {}:{}",
                        self.path.display(),
                        self.line_num
                    )));
                }
                sequence.extend_from_slice(stripped.as_bytes());
            }
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Write one FASTA record, wrapping the sequence at [`LINE_WIDTH`].
pub fn write_record<W: Write>(writer: &mut W, header: &str, sequence: &[u8]) -> std::io::Result<()> {
    writeln!(writer, ">{}", header)?;
    for chunk in sequence.chunks(LINE_WIDTH) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Reverse complement, preserving case. Non-ACGT bases are kept as-is.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            b'a' => b't',
            b'c' => b'g',
            b'g' => b'c',
            b't' => b'a',
            other => other,
        })
        .collect()
}
