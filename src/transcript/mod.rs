// Transcript model: exon/intron components with absolute genomic coordinates

pub mod decompose;
pub mod header;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use decompose::{decompose, ComponentSequence, Decomposition, UidAllocator};
pub use header::TranscriptHeader;

/// Genomic strand, serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn flip(self) -> Self {
        match self {
            Self::Plus => Self::Minus,
            Self::Minus => Self::Plus,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Plus => 1,
            Self::Minus => -1,
        }
    }
}

impl From<Strand> for i8 {
    fn from(strand: Strand) -> Self {
        strand.as_i8()
    }
}

impl TryFrom<i8> for Strand {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Plus),
            -1 => Ok(Self::Minus),
            other => Err(format!("strand must be 1 or -1, got {other}")),
        }
    }
}

impl std::str::FromStr for Strand {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "+1" => Ok(Self::Plus),
            "-1" => Ok(Self::Minus),
            _ => Err(format!("strand must be 1 or -1, got '{s}'")),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Exon or intron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Exon,
    Intron,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exon => write!(f, "exon"),
            Self::Intron => write!(f, "intron"),
        }
    }
}

/// One exon or intron of a transcript (1-based, inclusive coordinates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub uid: u64,
    pub name: String,
    pub start_position: u64,
    pub end_position: u64,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
}

impl Component {
    pub fn len(&self) -> u64 {
        self.end_position - self.start_position + 1
    }
}

/// A decomposed transcript.
///
/// `components` is sorted by `start_position` and tiles the span from the
/// first exon start to the last exon end with no gaps or overlaps. Bases of
/// the transcript outside that hull belong to no component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub name: String,
    pub chromosome_name: String,
    pub start_position: u64,
    pub end_position: u64,
    pub strand: Strand,
    pub components: Vec<Component>,
}

impl Transcript {
    pub fn contains_component(&self, component: &Component) -> bool {
        self.components.iter().any(|c| c.uid == component.uid)
    }

    pub fn exons(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Exon)
    }

    pub fn introns(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Intron)
    }
}

/// Transcripts grouped by gene symbol, in insertion order within a gene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptCatalog {
    genes: BTreeMap<String, Vec<Transcript>>,
}

impl TranscriptCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transcript under `gene_symbol`. Existing transcripts are kept.
    pub fn insert(&mut self, gene_symbol: impl Into<String>, transcript: Transcript) {
        self.genes
            .entry(gene_symbol.into())
            .or_default()
            .push(transcript);
    }

    pub fn contains_gene(&self, gene_symbol: &str) -> bool {
        self.genes.contains_key(gene_symbol)
    }

    pub fn transcripts(&self, gene_symbol: &str) -> &[Transcript] {
        self.genes
            .get(gene_symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_transcripts(&self) -> usize {
        self.genes.values().map(Vec::len).sum()
    }

    pub fn n_components(&self) -> usize {
        self.genes
            .values()
            .flatten()
            .map(|t| t.components.len())
            .sum()
    }
}
