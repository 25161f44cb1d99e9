/// Alignment hits as reported by the external aligner
///
/// BLAST tabular output (`-outfmt "7 std sstrand"`), 13 tab-separated columns:
/// 1. query id
/// 2. subject id (component uid)
/// 3. percent identity
/// 4. alignment length
/// 5. mismatches
/// 6. gap opens
/// 7. query start (1-based)
/// 8. query end (1-based)
/// 9. subject start (1-based, local component frame)
/// 10. subject end (inverted for minus-strand hits)
/// 11. e-value
/// 12. bit score
/// 13. subject strand (plus/minus)
use std::fmt;

use crate::error::Error;

const N_COLUMNS: usize = 13;

/// Orientation of the match on the subject sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectStrand {
    Plus,
    Minus,
}

impl std::str::FromStr for SubjectStrand {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plus" => Ok(Self::Plus),
            "minus" => Ok(Self::Minus),
            _ => Err(format!("unknown sstrand '{s}'; expected 'plus' or 'minus'")),
        }
    }
}

impl fmt::Display for SubjectStrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "plus"),
            Self::Minus => write!(f, "minus"),
        }
    }
}

/// One aligner hit, in the local frame of the subject component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentHit {
    pub subject_id: String,
    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,
    pub sstrand: SubjectStrand,
}

impl AlignmentHit {
    /// Component uid this hit refers to, if the subject id is one.
    pub fn subject_uid(&self) -> Option<u64> {
        self.subject_id.parse().ok()
    }

    /// Parse one data line of BLAST tabular output.
    pub fn from_tabular(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != N_COLUMNS {
            return Err(Error::Format(format!(
                "alignment line has {} columns, expected {}: {}",
                fields.len(),
                N_COLUMNS,
                line.trim_end()
            )));
        }

        let coord = |i: usize, what: &str| -> Result<u64, Error> {
            fields[i].parse::<u64>().map_err(|e| {
                Error::Format(format!("invalid {what} '{}' ({e}): {}", fields[i], line.trim_end()))
            })
        };

        let sstrand = fields[12]
            .parse::<SubjectStrand>()
            .map_err(Error::Format)?;

        Ok(Self {
            subject_id: fields[1].to_string(),
            query_start: coord(6, "query start")?,
            query_end: coord(7, "query end")?,
            subject_start: coord(8, "subject start")?,
            subject_end: coord(9, "subject end")?,
            sstrand,
        })
    }
}

/// Parse a whole BLAST tabular report, keeping the aligner's hit order.
///
/// Comment lines ('#') and blank lines are skipped.
pub fn parse_tabular(report: &str) -> Result<Vec<AlignmentHit>, Error> {
    report
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(AlignmentHit::from_tabular)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
# BLASTN 2.12.0+
# Query: query
# Database: target.fa
# Fields: query acc.ver, subject acc.ver, % identity, alignment length, mismatches, gap opens, q. start, q. end, s. start, s. end, evalue, bit score, subject strand
# 2 hits found
query\t17\t100.000\t36\t0\t0\t1\t36\t1201\t1236\t1.2e-12\t67.6\tplus
query\t942\t100.000\t35\t0\t0\t37\t71\t88\t54\t4.4e-12\t65.8\tminus

# BLAST processed 1 queries
";

    #[test]
    fn parse_report_keeps_order() {
        let hits = parse_tabular(REPORT).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0],
            AlignmentHit {
                subject_id: "17".to_string(),
                query_start: 1,
                query_end: 36,
                subject_start: 1201,
                subject_end: 1236,
                sstrand: SubjectStrand::Plus,
            }
        );
        assert_eq!(hits[1].subject_uid(), Some(942));
        assert_eq!(hits[1].subject_start, 88);
        assert_eq!(hits[1].subject_end, 54);
        assert_eq!(hits[1].sstrand, SubjectStrand::Minus);
    }

    #[test]
    fn empty_report() {
        assert!(parse_tabular("# 0 hits found\n").unwrap().is_empty());
    }

    #[test]
    fn wrong_column_count() {
        let err = parse_tabular("query\t17\t100.0\n").unwrap_err();
        assert!(err.to_string().contains("expected 13"));
    }

    #[test]
    fn bad_sstrand() {
        let line = "q\t1\t100\t10\t0\t0\t1\t10\t1\t10\t0.1\t20\tboth";
        let err = AlignmentHit::from_tabular(line).unwrap_err();
        assert!(err.to_string().contains("sstrand"));
    }

    #[test]
    fn non_numeric_subject_is_not_a_uid() {
        let line = "q\tchr1\t100\t10\t0\t0\t1\t10\t1\t10\t0.1\t20\tplus";
        let hit = AlignmentHit::from_tabular(line).unwrap();
        assert_eq!(hit.subject_uid(), None);
    }
}
