/// Property tests for transcript decomposition and breakpoint reconciliation
use fusebreak::align::{AlignmentHit, SubjectStrand};
use fusebreak::fasta::reverse_complement;
use fusebreak::fusion::{breakpoint_at_end, resolve, JunctionRole};
use fusebreak::transcript::decompose::tiles_span;
use fusebreak::transcript::{decompose, ComponentKind, Strand, UidAllocator};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

/// A transcript whose span is exactly the exon hull.
#[derive(Debug, Clone)]
struct Case {
    start: u64,
    exons: Vec<(u64, u64)>,
    sequence: Vec<u8>,
    reversed_header: bool,
}

impl Case {
    fn end(&self) -> u64 {
        self.exons.last().map(|e| e.1).unwrap_or(self.start)
    }

    fn header(&self, id: &str, gene: &str, strand: &str) -> String {
        let mut order: Vec<usize> = (0..self.exons.len()).collect();
        if self.reversed_header {
            order.reverse();
        }
        let ids: Vec<String> = order.iter().map(|i| format!("{id}E{}", i + 1)).collect();
        let starts: Vec<String> = order.iter().map(|&i| self.exons[i].0.to_string()).collect();
        let ends: Vec<String> = order.iter().map(|&i| self.exons[i].1.to_string()).collect();
        format!(
            "{id}|{gene}|7|{}|{}|{strand}|{}|{}|{}",
            self.start,
            self.end(),
            ids.join(";"),
            starts.join(";"),
            ends.join(";"),
        )
    }

    fn n_gaps(&self) -> usize {
        self.exons.windows(2).filter(|w| w[1].0 > w[0].1 + 1).count()
    }
}

fn base() -> impl Strategy<Value = u8> {
    prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')]
}

fn case() -> impl Strategy<Value = Case> {
    (
        1u64..1_000_000,
        prop::collection::vec((2u64..20, 0u64..15), 1..6),
        any::<bool>(),
    )
        .prop_flat_map(|(start, shape, reversed_header)| {
            let mut exons = Vec::new();
            let mut pos = start;
            for (len, gap) in shape {
                exons.push((pos, pos + len - 1));
                pos += len + gap;
            }
            let span = (exons[exons.len() - 1].1 - start + 1) as usize;
            (
                Just(start),
                Just(exons),
                prop::collection::vec(base(), span),
                Just(reversed_header),
            )
        })
        .prop_map(|(start, exons, sequence, reversed_header)| Case {
            start,
            exons,
            sequence,
            reversed_header,
        })
}

fn role() -> impl Strategy<Value = JunctionRole> {
    prop_oneof![Just(JunctionRole::Upstream), Just(JunctionRole::Downstream)]
}

fn strand() -> impl Strategy<Value = Strand> {
    prop_oneof![Just(Strand::Plus), Just(Strand::Minus)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Components tile the exon hull and carry every base exactly once
    #[test]
    fn components_tile_span(case in case()) {
        let mut uids = UidAllocator::new();
        let d = decompose(&case.header("T1", "G1", "1"), &case.sequence, &mut uids).unwrap();

        prop_assert!(tiles_span(&d.transcript));
        prop_assert_eq!(d.transcript.exons().count(), case.exons.len());
        prop_assert_eq!(d.transcript.introns().count(), case.n_gaps());

        let joined: Vec<u8> = d.sequences.iter().flat_map(|s| s.sequence.clone()).collect();
        prop_assert_eq!(joined, case.sequence.clone());
    }

    /// uids are unique and consecutive across every transcript of a run
    #[test]
    fn uids_unique_across_run(cases in prop::collection::vec(case(), 1..5)) {
        let mut uids = UidAllocator::new();
        let mut seen = Vec::new();
        for (i, case) in cases.iter().enumerate() {
            let header = case.header(&format!("T{i}"), "G", "1");
            let d = decompose(&header, &case.sequence, &mut uids).unwrap();
            seen.extend(d.transcript.components.iter().map(|c| c.uid));
        }
        let expected: Vec<u64> = (1..=seen.len() as u64).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(uids.allocated() as usize, cases.iter().map(|c| c.exons.len() + c.n_gaps()).sum::<usize>());
    }

    /// A minus-strand run on revcomp(S) mirrors a plus-strand run on S
    #[test]
    fn strand_round_trip(case in case()) {
        let mut uids = UidAllocator::new();
        let plus = decompose(&case.header("T1", "G1", "1"), &case.sequence, &mut uids).unwrap();
        let minus = decompose(
            &case.header("T1", "G1", "-1"),
            &reverse_complement(&case.sequence),
            &mut uids,
        )
        .unwrap();

        prop_assert_eq!(plus.sequences.len(), minus.sequences.len());
        for (p, m) in plus.sequences.iter().zip(&minus.sequences) {
            prop_assert_eq!(p.start_position, m.start_position);
            prop_assert_eq!(p.end_position, m.end_position);
            prop_assert_eq!(&p.name, &m.name);
            prop_assert_eq!(reverse_complement(&p.sequence), m.sequence.clone());
        }
    }

    /// The same junction match resolves to the same genomic region on either strand
    #[test]
    fn resolve_strand_round_trip(
        case in case(),
        pick in any::<prop::sample::Index>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
        role in role(),
    ) {
        let mut uids = UidAllocator::new();
        let plus = decompose(&case.header("T1", "G1", "1"), &case.sequence, &mut uids).unwrap();
        let minus = decompose(
            &case.header("T2", "G1", "-1"),
            &reverse_complement(&case.sequence),
            &mut uids,
        )
        .unwrap();

        let i = pick.index(plus.transcript.components.len());
        let pc = &plus.transcript.components[i];
        let mc = &minus.transcript.components[i];
        let len = pc.len();
        let (x, y) = (a.index(len as usize) as u64 + 1, b.index(len as usize) as u64 + 1);
        let (lo, hi) = (x.min(y), x.max(y));

        let plus_hit = AlignmentHit {
            subject_id: pc.uid.to_string(),
            query_start: 1,
            query_end: hi - lo + 1,
            subject_start: lo,
            subject_end: hi,
            sstrand: SubjectStrand::Plus,
        };
        // Same bases seen on the reverse-complemented component
        let minus_hit = AlignmentHit {
            subject_id: mc.uid.to_string(),
            subject_start: len - lo + 1,
            subject_end: len - hi + 1,
            sstrand: SubjectStrand::Minus,
            ..plus_hit.clone()
        };

        let p = resolve(&plus_hit, pc, &plus.transcript, role).unwrap();
        let m = resolve(&minus_hit, mc, &minus.transcript, role).unwrap();
        prop_assert_eq!(&p, &m);
        prop_assert_eq!(p.strand, Strand::Plus);
        prop_assert_eq!(p.start_position, pc.start_position + lo - 1);
        prop_assert_eq!(p.end_position, pc.start_position + hi - 1);
        prop_assert!(p.start_position <= p.end_position);

        // Determinism
        prop_assert_eq!(resolve(&plus_hit, pc, &plus.transcript, role).unwrap(), p);
    }

    /// Breakpoint is the end exactly for (upstream, +1) and (downstream, -1)
    #[test]
    fn breakpoint_follows_role_and_strand(
        role in role(),
        hit_strand in strand(),
        transcript_minus in any::<bool>(),
    ) {
        let (header, seq): (&str, &[u8]) = if transcript_minus {
            ("T|G|1|1|10|-1|E1;E2|1;6|4;10", b"CAGCGGATAC")
        } else {
            ("T|G|1|1|10|1|E1;E2|1;6|4;10", b"GTATCCGCTG")
        };
        let t = decompose(header, seq, &mut UidAllocator::new()).unwrap().transcript;
        let exon = t.components.iter().find(|c| c.kind == ComponentKind::Exon).unwrap();

        let (s, e) = match hit_strand {
            Strand::Plus => (1, 3),
            Strand::Minus => (3, 1),
        };
        let hit = AlignmentHit {
            subject_id: exon.uid.to_string(),
            query_start: 1,
            query_end: 3,
            subject_start: s,
            subject_end: e,
            sstrand: if hit_strand == Strand::Plus { SubjectStrand::Plus } else { SubjectStrand::Minus },
        };
        let aln = resolve(&hit, exon, &t, role).unwrap();

        let expected_strand = if transcript_minus { hit_strand.flip() } else { hit_strand };
        prop_assert_eq!(aln.strand, expected_strand);

        let at_end = matches!(
            (role, aln.strand),
            (JunctionRole::Upstream, Strand::Plus) | (JunctionRole::Downstream, Strand::Minus)
        );
        prop_assert_eq!(breakpoint_at_end(role, aln.strand), at_end);
        let expected = if at_end { aln.end_position } else { aln.start_position };
        prop_assert_eq!(aln.breakpoint, expected);
    }
}
