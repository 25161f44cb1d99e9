// Transcript decomposition into exon/intron components

use std::ops::Range;

use crate::error::Error;
use crate::transcript::header::TranscriptHeader;
use crate::transcript::{Component, ComponentKind, Strand, Transcript};

/// Hands out run-unique component uids.
///
/// One allocator is shared by every decomposition in a run. Each transcript
/// reserves a contiguous range once it has passed validation, so a rejected
/// record never consumes uids.
#[derive(Debug, Clone)]
pub struct UidAllocator {
    first: u64,
    next: u64,
}

impl Default for UidAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl UidAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { first, next: first }
    }

    /// Reserve `n` consecutive uids.
    pub fn reserve(&mut self, n: usize) -> Range<u64> {
        let start = self.next;
        self.next += n as u64;
        start..self.next
    }

    /// Number of uids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next - self.first
    }
}

/// Bases of one component, ready to be written as a FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSequence {
    pub uid: u64,
    pub name: String,
    pub gene_symbol: String,
    pub chromosome_name: String,
    pub start_position: u64,
    pub end_position: u64,
    pub strand: Strand,
    pub kind: ComponentKind,
    pub sequence: Vec<u8>,
}

impl ComponentSequence {
    /// FASTA header (without '>'): uid first so the aligner reports it as the subject id.
    pub fn fasta_header(&self) -> String {
        format!(
            "{} {}|{}|{}|{}|{}|{}|{}",
            self.uid,
            self.name,
            self.gene_symbol,
            self.chromosome_name,
            self.start_position,
            self.end_position,
            self.strand,
            self.kind
        )
    }
}

/// Result of decomposing one transcript record.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub gene_symbol: String,
    pub transcript: Transcript,
    /// One entry per component, in the same order as `transcript.components`.
    pub sequences: Vec<ComponentSequence>,
}

#[derive(Debug, Clone)]
struct Draft {
    name: String,
    start: u64,
    end: u64,
    kind: ComponentKind,
}

/// Decompose an unspliced transcript into ordered exon and intron components.
///
/// `sequence` is the transcript as supplied: already reverse complemented
/// when the header strand is -1.
///
/// One intron fills each gap between neighbouring exons. Exons that abut
/// (`next.start == prev.end + 1`) leave no gap, so they get no intron and the
/// transcript has fewer than `exon_count - 1` introns.
pub fn decompose(
    header: &str,
    sequence: &[u8],
    uids: &mut UidAllocator,
) -> Result<Decomposition, Error> {
    let h = TranscriptHeader::parse(header)?;
    let header = header.strip_prefix('>').unwrap_or(header).trim_end();

    let transcript_len = h.span_len();
    if sequence.len() as u64 != transcript_len {
        return Err(Error::Format(format!(
            "length mismatch in {}: sequence has {} bases, coordinates span {}",
            header,
            sequence.len(),
            transcript_len
        )));
    }

    let exon_count = h.exon_ids.len();
    if exon_count != h.exon_starts.len() || exon_count != h.exon_ends.len() {
        return Err(Error::Format(format!(
            "exon mismatches in {}: {} ids, {} starts, {} ends",
            header,
            exon_count,
            h.exon_starts.len(),
            h.exon_ends.len()
        )));
    }

    let mut exons = Vec::with_capacity(exon_count);
    for i in 0..exon_count {
        let (start, end) = (h.exon_starts[i], h.exon_ends[i]);
        if start >= end {
            return Err(Error::Format(format!(
                "exon coordinate inversion for {} ({}-{}) in {}",
                h.exon_ids[i], start, end, header
            )));
        }
        if start < h.start_position || end > h.end_position {
            return Err(Error::Format(format!(
                "exon {} ({}-{}) outside transcript coordinates {}-{} in {}",
                h.exon_ids[i], start, end, h.start_position, h.end_position, header
            )));
        }
        exons.push(Draft {
            name: h.exon_ids[i].clone(),
            start,
            end,
            kind: ComponentKind::Exon,
        });
    }

    // Overlap is only meaningful once sorted
    exons.sort_by_key(|e| e.start);
    for w in exons.windows(2) {
        if w[1].start <= w[0].end {
            return Err(Error::Format(format!(
                "exon overlap between {} and {} in {}",
                w[0].name, w[1].name, header
            )));
        }
    }

    let mut drafts = Vec::with_capacity(exons.len() * 2);
    for (i, w) in exons.windows(2).enumerate() {
        let (prev, next) = (&w[0], &w[1]);
        // Abutting exons leave no intron to synthesize
        if next.start == prev.end + 1 {
            continue;
        }
        drafts.push(Draft {
            name: format!("{}:{}", h.transcript_id, i + 1),
            start: prev.end + 1,
            end: next.start - 1,
            kind: ComponentKind::Intron,
        });
    }
    drafts.extend(exons);
    drafts.sort_by_key(|d| d.start);

    let mut slices = Vec::with_capacity(drafts.len());
    for d in &drafts {
        let length = d.end - d.start + 1;
        let offset = match h.strand {
            Strand::Plus => d.start - h.start_position,
            Strand::Minus => {
                let end_in_plus = d.end - h.start_position + 1;
                transcript_len - end_in_plus
            }
        };
        let slice = sequence
            .get(offset as usize..(offset + length) as usize)
            .filter(|s| s.len() as u64 == length)
            .ok_or_else(|| {
                Error::Format(format!(
                    "invalid length for component {} ({}-{}) in {}",
                    d.name, d.start, d.end, header
                ))
            })?;
        slices.push(slice);
    }

    let uid_range = uids.reserve(drafts.len());
    let mut components = Vec::with_capacity(drafts.len());
    let mut sequences = Vec::with_capacity(drafts.len());

    for ((d, slice), uid) in drafts.into_iter().zip(slices).zip(uid_range) {
        sequences.push(ComponentSequence {
            uid,
            name: d.name.clone(),
            gene_symbol: h.gene_symbol.clone(),
            chromosome_name: h.chromosome_name.clone(),
            start_position: d.start,
            end_position: d.end,
            strand: h.strand,
            kind: d.kind,
            sequence: slice.to_vec(),
        });
        components.push(Component {
            uid,
            name: d.name,
            start_position: d.start,
            end_position: d.end,
            kind: d.kind,
        });
    }

    let transcript = Transcript {
        name: h.transcript_id,
        chromosome_name: h.chromosome_name,
        start_position: h.start_position,
        end_position: h.end_position,
        strand: h.strand,
        components,
    };

    Ok(Decomposition {
        gene_symbol: h.gene_symbol,
        transcript,
        sequences,
    })
}

/// True when the components cover the transcript span with no gaps or overlaps.
pub fn tiles_span(transcript: &Transcript) -> bool {
    let mut expected = transcript.start_position;
    for c in &transcript.components {
        if c.start_position != expected || c.end_position < c.start_position {
            return false;
        }
        expected = c.end_position + 1;
    }
    expected == transcript.end_position + 1
}
