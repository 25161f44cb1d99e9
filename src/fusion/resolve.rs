// Reconcile component-local alignment hits into genomic breakpoints

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::align::{AlignmentHit, SubjectStrand};
use crate::error::Error;
use crate::fusion::translocation::{JunctionRole, Translocation};
use crate::transcript::{Component, Strand, Transcript, TranscriptCatalog};

/// Alignment of a junction query projected onto the genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAlignment {
    pub query_start: u64,
    pub query_end: u64,
    pub chromosome_name: String,
    pub start_position: u64,
    pub end_position: u64,
    pub strand: Strand,
    /// Either `start_position` or `end_position`.
    pub breakpoint: u64,
}

/// Whether the breakpoint is the genomic end of the aligned region.
///
/// | role       | strand | breakpoint |
/// |------------|--------|------------|
/// | upstream   | +1     | end        |
/// | upstream   | -1     | start      |
/// | downstream | +1     | start      |
/// | downstream | -1     | end        |
pub fn breakpoint_at_end(role: JunctionRole, strand: Strand) -> bool {
    matches!(
        (role, strand),
        (JunctionRole::Upstream, Strand::Plus) | (JunctionRole::Downstream, Strand::Minus)
    )
}

/// Project `hit` (local to `component`) into genomic coordinates of `transcript`.
///
/// Fails with `Reconciliation` if `component` is not part of `transcript`, and
/// with `Format` if the component's coordinates are inverted or the hit's
/// subject range does not fit inside the component.
pub fn resolve(
    hit: &AlignmentHit,
    component: &Component,
    transcript: &Transcript,
    role: JunctionRole,
) -> Result<ResolvedAlignment, Error> {
    if !transcript.contains_component(component) {
        return Err(Error::Reconciliation(format!(
            "component {} ({}) does not belong to transcript {}",
            component.uid, component.name, transcript.name
        )));
    }

    if component.start_position == 0 || component.end_position < component.start_position {
        return Err(Error::Format(format!(
            "component {} ({}) of transcript {} has invalid coordinates {}-{}",
            component.uid,
            component.name,
            transcript.name,
            component.start_position,
            component.end_position
        )));
    }

    let (mut start, mut end) = (hit.subject_start, hit.subject_end);
    let mut strand = match hit.sstrand {
        SubjectStrand::Plus => Strand::Plus,
        SubjectStrand::Minus => Strand::Minus,
    };

    // Minus-strand hits are reported end-first
    if hit.sstrand == SubjectStrand::Minus {
        std::mem::swap(&mut start, &mut end);
    }

    let length = component.len();
    if start == 0 || start > end || end > length {
        return Err(Error::Format(format!(
            "hit {}-{} on subject {} is outside component {} of length {}",
            hit.subject_start, hit.subject_end, hit.subject_id, component.name, length
        )));
    }

    // Component sequences of minus-strand transcripts are reverse complemented
    if transcript.strand == Strand::Minus {
        strand = strand.flip();
        (start, end) = (length - end + 1, length - start + 1);
    }

    let start_position = component.start_position + start - 1;
    let end_position = component.start_position + end - 1;
    let breakpoint = if breakpoint_at_end(role, strand) {
        end_position
    } else {
        start_position
    };

    Ok(ResolvedAlignment {
        query_start: hit.query_start,
        query_end: hit.query_end,
        chromosome_name: transcript.chromosome_name.clone(),
        start_position,
        end_position,
        strand,
        breakpoint,
    })
}

/// uid lookup over every component of one gene's transcripts.
pub struct ComponentIndex<'a> {
    by_uid: HashMap<u64, (&'a Transcript, &'a Component)>,
}

impl<'a> ComponentIndex<'a> {
    pub fn for_gene(catalog: &'a TranscriptCatalog, gene_symbol: &str) -> Self {
        let by_uid = catalog
            .transcripts(gene_symbol)
            .iter()
            .flat_map(|t| t.components.iter().map(move |c| (c.uid, (t, c))))
            .collect();
        Self { by_uid }
    }

    pub fn get(&self, uid: u64) -> Option<(&'a Transcript, &'a Component)> {
        self.by_uid.get(&uid).copied()
    }

    pub fn contains(&self, uid: u64) -> bool {
        self.by_uid.contains_key(&uid)
    }
}

/// First hit, in aligner order, on a component of the indexed gene.
pub fn select_hit<'h>(hits: &'h [AlignmentHit], index: &ComponentIndex) -> Option<&'h AlignmentHit> {
    hits.iter()
        .find(|h| h.subject_uid().is_some_and(|uid| index.contains(uid)))
}

/// Resolve every partner of `translocation` from the hits of its junction query.
///
/// Partners without a relevant hit are left without an alignment. A hit that
/// does not fit its component is logged and leaves that partner unresolved.
pub fn locate_breakpoints(
    translocation: &mut Translocation,
    catalog: &TranscriptCatalog,
    hits: &[AlignmentHit],
) -> Result<(), Error> {
    for partner in &mut translocation.partners {
        let index = ComponentIndex::for_gene(catalog, &partner.hgnc_symbol);
        let Some(hit) = select_hit(hits, &index) else {
            debug!("{}: no hit on {}", translocation.xref, partner.hgnc_symbol);
            continue;
        };
        let Some((transcript, component)) = hit.subject_uid().and_then(|uid| index.get(uid)) else {
            continue;
        };

        match resolve(hit, component, transcript, partner.disp) {
            Ok(aln) => {
                debug!(
                    "{}: {} {} on {} {}:{}-{}",
                    translocation.xref,
                    partner.hgnc_symbol,
                    partner.disp,
                    component.name,
                    aln.chromosome_name,
                    aln.start_position,
                    aln.end_position
                );
                partner.aln = Some(aln);
            }
            Err(e) if e.is_record_level() => {
                warn!("{}: {}: {}", translocation.xref, partner.hgnc_symbol, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
