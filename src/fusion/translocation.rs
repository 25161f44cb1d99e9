/// Translocation records (TICdb format)
///
/// The TICdb export is tab-separated, one translocation per line, 4 columns:
/// 1. 5' partner gene (HGNC symbol)
/// 2. 3' partner gene (HGNC symbol)
/// 3. reference
/// 4. junction sequence
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fusion::resolve::ResolvedAlignment;
use crate::transcript::TranscriptCatalog;

const N_COLUMNS: usize = 4;

/// Which side of the fusion junction a partner gene sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JunctionRole {
    /// 5' partner: contributes the sequence before the junction.
    #[serde(rename = "5prime")]
    Upstream,
    /// 3' partner: contributes the sequence after the junction.
    #[serde(rename = "3prime")]
    Downstream,
}

impl fmt::Display for JunctionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => write!(f, "5prime"),
            Self::Downstream => write!(f, "3prime"),
        }
    }
}

/// One partner gene of a translocation, with its alignment once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub hgnc_symbol: String,
    pub disp: JunctionRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aln: Option<ResolvedAlignment>,
}

impl Partner {
    pub fn new(hgnc_symbol: impl Into<String>, disp: JunctionRole) -> Self {
        Self {
            hgnc_symbol: hgnc_symbol.into(),
            disp,
            aln: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.aln.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translocation {
    pub xref: String,
    pub junction_sequence: String,
    /// Always `[5' partner, 3' partner]`.
    pub partners: Vec<Partner>,
}

impl Translocation {
    pub fn new(
        gene5: impl Into<String>,
        gene3: impl Into<String>,
        xref: impl Into<String>,
        junction_sequence: impl Into<String>,
    ) -> Self {
        Self {
            xref: xref.into(),
            junction_sequence: junction_sequence.into(),
            partners: vec![
                Partner::new(gene5, JunctionRole::Upstream),
                Partner::new(gene3, JunctionRole::Downstream),
            ],
        }
    }

    /// Parse one TICdb data line.
    pub fn from_ticdb_line(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != N_COLUMNS {
            return Err(Error::Format(format!(
                "translocation line has {} columns, expected {}: {}",
                fields.len(),
                N_COLUMNS,
                line.trim_end()
            )));
        }
        Ok(Self::new(fields[0], fields[1], fields[2], fields[3]))
    }

    /// True when every partner gene has transcripts in `catalog`.
    pub fn partners_in(&self, catalog: &TranscriptCatalog) -> bool {
        self.partners
            .iter()
            .all(|p| catalog.contains_gene(&p.hgnc_symbol))
    }

    pub fn n_resolved(&self) -> usize {
        self.partners.iter().filter(|p| p.is_resolved()).count()
    }
}

/// Read a TICdb file. Malformed lines are logged and skipped.
///
/// Returns the translocations in file order and the number of skipped lines.
pub fn read_translocations(path: &Path) -> Result<(Vec<Translocation>, usize), Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let reader = BufReader::new(file);

    let mut translocations = Vec::new();
    let mut skipped = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(e, path))?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        match Translocation::from_ticdb_line(&line) {
            Ok(t) => translocations.push(t),
            Err(e) => {
                warn!("{}:{}: {}", path.display(), line_num + 1, e);
                skipped += 1;
            }
        }
    }

    info!(
        "Found {} translocations in {}",
        translocations.len(),
        path.display()
    );
    Ok((translocations, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_ticdb_line() {
        let t = Translocation::from_ticdb_line("BCR\tABL1\tPMID:123\tACGTACGT\n").unwrap();
        assert_eq!(t.xref, "PMID:123");
        assert_eq!(t.junction_sequence, "ACGTACGT");
        assert_eq!(t.partners[0], Partner::new("BCR", JunctionRole::Upstream));
        assert_eq!(t.partners[1], Partner::new("ABL1", JunctionRole::Downstream));
    }

    #[test]
    fn wrong_column_count() {
        let err = Translocation::from_ticdb_line("BCR\tABL1\tACGT").unwrap_err();
        assert!(err.is_record_level());
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn read_skips_comments_and_bad_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# TICdb export").unwrap();
        writeln!(file, "BCR\tABL1\tX1\tACGT").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "ETV6\tRUNX1\tTGCA").unwrap();
        writeln!(file, "TMPRSS2\tERG\tX3\tGGCC").unwrap();

        let (ts, skipped) = read_translocations(file.path()).unwrap();
        assert_eq!(skipped, 1);
        let xrefs: Vec<_> = ts.iter().map(|t| t.xref.as_str()).collect();
        assert_eq!(xrefs, vec!["X1", "X3"]);
    }

    #[test]
    fn unresolved_partner_has_no_aln_key() {
        let t = Translocation::new("BCR", "ABL1", "X1", "ACGT");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["partners"][0]["disp"], "5prime");
        assert_eq!(json["partners"][1]["disp"], "3prime");
        assert!(json["partners"][0].get("aln").is_none());

        let back: Translocation = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn role_display() {
        assert_eq!(JunctionRole::Upstream.to_string(), "5prime");
        assert_eq!(JunctionRole::Downstream.to_string(), "3prime");
    }
}
