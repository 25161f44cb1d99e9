/// Transcript FASTA header parsing
///
/// Header layout (pipe-delimited, 9 fields):
/// 1. transcript id
/// 2. gene symbol
/// 3. chromosome name
/// 4. transcript start (1-based inclusive)
/// 5. transcript end (1-based inclusive)
/// 6. strand (1 or -1)
/// 7. exon ids (semicolon-delimited)
/// 8. exon starts (semicolon-delimited)
/// 9. exon ends (semicolon-delimited)
///
/// e.g. `ENST00000393293|ABL1|9|130713980|130854122|1|ENSE01;ENSE02|130854067;130713980|130854122;130714455`
use crate::error::Error;
use crate::transcript::Strand;

const N_FIELDS: usize = 9;

/// Parsed transcript header with its three parallel exon arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptHeader {
    pub transcript_id: String,
    pub gene_symbol: String,
    pub chromosome_name: String,
    pub start_position: u64,
    pub end_position: u64,
    pub strand: Strand,
    pub exon_ids: Vec<String>,
    pub exon_starts: Vec<u64>,
    pub exon_ends: Vec<u64>,
}

impl TranscriptHeader {
    pub fn parse(header: &str) -> Result<Self, Error> {
        let header = header.strip_prefix('>').unwrap_or(header).trim_end();
        let fields: Vec<&str> = header.split('|').collect();

        if fields.len() != N_FIELDS {
            return Err(Error::Format(format!(
                "transcript header has {} fields, expected {} in {}",
                fields.len(),
                N_FIELDS,
                header
            )));
        }

        let start_position = parse_position(fields[3], "start", header)?;
        let end_position = parse_position(fields[4], "end", header)?;
        if start_position == 0 {
            return Err(Error::Format(format!(
                "transcript start must be 1-based, got 0 in {}",
                header
            )));
        }
        if start_position > end_position {
            return Err(Error::Format(format!(
                "transcript start {} is after end {} in {}",
                start_position, end_position, header
            )));
        }

        let strand = fields[5]
            .parse::<Strand>()
            .map_err(|e| Error::Format(format!("{e} in {header}")))?;

        let exon_ids = fields[6].split(';').map(str::to_string).collect();
        let exon_starts = parse_position_list(fields[7], "exon start", header)?;
        if exon_starts.contains(&0) {
            return Err(Error::Format(format!(
                "exon starts must be 1-based, got 0 in {}",
                header
            )));
        }
        let exon_ends = parse_position_list(fields[8], "exon end", header)?;

        Ok(Self {
            transcript_id: fields[0].to_string(),
            gene_symbol: fields[1].to_string(),
            chromosome_name: fields[2].to_string(),
            start_position,
            end_position,
            strand,
            exon_ids,
            exon_starts,
            exon_ends,
        })
    }

    /// Length of the transcript span in bases.
    pub fn span_len(&self) -> u64 {
        self.end_position - self.start_position + 1
    }
}

fn parse_position(field: &str, what: &str, header: &str) -> Result<u64, Error> {
    field
        .trim()
        .parse::<u64>()
        .map_err(|e| Error::Format(format!("invalid {what} '{field}' ({e}) in {header}")))
}

fn parse_position_list(field: &str, what: &str, header: &str) -> Result<Vec<u64>, Error> {
    field
        .split(';')
        .map(|f| parse_position(f, what, header))
        .collect()
}
