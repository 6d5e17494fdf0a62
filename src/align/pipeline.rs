use log::{debug, trace};

use crate::index::fm::FMIndex;
use crate::util::dna;

use super::record::{assign_rank_mapq, mapq_from_score, sort_by_score_desc, AlignKind, AlignmentRecord};
use super::seed::{dedup_positions, extract_seeds, project_seed_hits};
use super::splice::spliced_alignment;
use super::sw::{smith_waterman_with_buf, SwBuffer};
use super::tolerant::seed_and_extend;
use super::{SeedExtendOpt, TieredOpt};

/// 单条 read 的比对接口；索引在外部构建一次，随后对每条 read 重复调用
pub trait ReadAligner {
    fn align(&self, read: &[u8]) -> Vec<AlignmentRecord>;
}

/// 整条 read 的精确匹配，位置升序
pub fn exact_alignments(fm: &FMIndex, read: &[u8]) -> Vec<AlignmentRecord> {
    if read.is_empty() {
        return Vec::new();
    }
    let score = read.len() as i32;
    fm.locate(read)
        .into_iter()
        .map(|position| AlignmentRecord {
            position,
            cigar: format!("{}M", read.len()),
            score,
            mapq: mapq_from_score(score),
            kind: AlignKind::Exact,
        })
        .collect()
}

// ── Variant A：精确 -> 容错 -> 剪接 ───────────────────

/// 分层比对的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Exact,
    Tolerant,
    Spliced,
    Done,
}

impl Tier {
    fn next(self) -> Self {
        match self {
            Tier::Exact => Tier::Tolerant,
            Tier::Tolerant => Tier::Spliced,
            Tier::Spliced | Tier::Done => Tier::Done,
        }
    }
}

/// 分层比对器：当前层没有结果时才进入下一层，最终按得分降序返回
#[derive(Debug, Clone)]
pub struct TieredAligner<'a> {
    fm: &'a FMIndex,
    opt: TieredOpt,
}

impl<'a> TieredAligner<'a> {
    pub fn new(fm: &'a FMIndex, opt: TieredOpt) -> anyhow::Result<Self> {
        opt.validate()?;
        Ok(Self { fm, opt })
    }

    fn run_tier(&self, tier: Tier, read: &[u8]) -> Vec<AlignmentRecord> {
        match tier {
            Tier::Exact => exact_alignments(self.fm, read),
            Tier::Tolerant => seed_and_extend(self.fm, read, self.opt.max_mismatches),
            Tier::Spliced => spliced_alignment(self.fm, read, &self.opt.splice),
            Tier::Done => Vec::new(),
        }
    }
}

impl ReadAligner for TieredAligner<'_> {
    fn align(&self, read: &[u8]) -> Vec<AlignmentRecord> {
        let read = dna::canonical_read(read);
        if read.is_empty() {
            return Vec::new();
        }

        let mut tier = Tier::Exact;
        let mut records = Vec::new();
        while tier != Tier::Done {
            records = self.run_tier(tier, &read);
            trace!("tier {:?}: {} record(s)", tier, records.len());
            tier = if records.is_empty() { tier.next() } else { Tier::Done };
        }

        sort_by_score_desc(&mut records);
        records
    }
}

// ── Variant B：种子 -> 去重 -> 局部延伸 -> MAPQ ────────

/// 种子-延伸比对的状态，每个状态携带上一步的产物
#[derive(Debug)]
enum Stage {
    SeedSearch,
    CandidateDedup(Vec<usize>),
    LocalExtend(Vec<usize>),
    MapqAssign(Vec<AlignmentRecord>),
    Done(Vec<AlignmentRecord>),
}

/// 种子-延伸比对器：候选起点上取 |read| + window_pad 的参考窗口做 Smith-Waterman
#[derive(Debug, Clone)]
pub struct SeedExtendAligner<'a> {
    fm: &'a FMIndex,
    opt: SeedExtendOpt,
}

impl<'a> SeedExtendAligner<'a> {
    pub fn new(fm: &'a FMIndex, opt: SeedExtendOpt) -> anyhow::Result<Self> {
        opt.validate()?;
        Ok(Self { fm, opt })
    }

    /// 与 [`ReadAligner::align`] 相同，但复用调用方提供的 DP 缓冲区
    pub fn align_with_buf(&self, read: &[u8], buf: &mut SwBuffer) -> Vec<AlignmentRecord> {
        let read = dna::canonical_read(read);
        if read.is_empty() {
            return Vec::new();
        }

        let mut stage = Stage::SeedSearch;
        loop {
            stage = match stage {
                Stage::SeedSearch => {
                    let seeds = extract_seeds(&read, self.opt.seed_len, self.opt.seed_interval);
                    Stage::CandidateDedup(project_seed_hits(self.fm, read.len(), seeds))
                }
                Stage::CandidateDedup(hits) => {
                    let starts = dedup_positions(hits);
                    trace!("{} candidate start(s)", starts.len());
                    Stage::LocalExtend(starts)
                }
                Stage::LocalExtend(starts) => {
                    let records = starts
                        .into_iter()
                        .filter_map(|start| self.extend(&read, start, buf))
                        .collect();
                    Stage::MapqAssign(records)
                }
                Stage::MapqAssign(mut records) => {
                    sort_by_score_desc(&mut records);
                    assign_rank_mapq(&mut records);
                    Stage::Done(records)
                }
                Stage::Done(records) => return records,
            };
        }
    }

    fn extend(&self, read: &[u8], start: usize, buf: &mut SwBuffer) -> Option<AlignmentRecord> {
        let reference = &self.fm.reference;
        let end = (start + read.len() + self.opt.window_pad).min(reference.len());
        let res = smith_waterman_with_buf(read, &reference[start..end], self.opt.sw, buf);
        if res.score <= 0 {
            return None;
        }
        Some(AlignmentRecord {
            position: start + res.target_start,
            cigar: res.cigar,
            score: res.score,
            mapq: 0,
            kind: AlignKind::Local { query_start: res.query_start, edit_distance: res.edit_distance },
        })
    }
}

impl ReadAligner for SeedExtendAligner<'_> {
    fn align(&self, read: &[u8]) -> Vec<AlignmentRecord> {
        self.align_with_buf(read, &mut SwBuffer::new())
    }
}

// ── 双链重试 ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// 某条 read 的最佳比对及其所在链
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandedHit {
    pub strand: Strand,
    pub best: AlignmentRecord,
}

/// 先比对正链；正链无结果且 try_reverse 为真时改用反向互补序列重试。
/// 两条链都没有结果时返回 None（未比对上）。
pub fn align_with_strand<A: ReadAligner + ?Sized>(
    aligner: &A,
    read: &[u8],
    try_reverse: bool,
) -> Option<StrandedHit> {
    let mut strand = Strand::Forward;
    let mut records = aligner.align(read);
    if records.is_empty() && try_reverse {
        debug!("forward strand unaligned, retrying reverse complement");
        strand = Strand::Reverse;
        records = aligner.align(&dna::revcomp(read));
    }
    let best = records.into_iter().next()?;
    Some(StrandedHit { strand, best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::splice::SpliceOpt;
    use crate::align::sw::SwParams;

    const REFERENCE: &[u8] = b"GATTACACCGTAGGCTTACGGATCCATGCAAGTTCGCAATGGCCTTAGACGTTAGC";

    fn tiered(fm: &FMIndex) -> TieredAligner<'_> {
        TieredAligner::new(fm, TieredOpt::default()).expect("valid options")
    }

    #[test]
    fn tier_order() {
        assert_eq!(Tier::Exact.next(), Tier::Tolerant);
        assert_eq!(Tier::Tolerant.next(), Tier::Spliced);
        assert_eq!(Tier::Spliced.next(), Tier::Done);
    }

    #[test]
    fn tiered_stops_at_exact_tier() {
        let fm = FMIndex::from_reference(b"ACGTACGTTTCGATCGA");
        let recs = tiered(&fm).align(b"ACGTTTC");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, AlignKind::Exact);
        assert_eq!(recs[0].position, 4);
        assert_eq!(recs[0].cigar, "7M");
        assert_eq!(recs[0].mapq, 7);
    }

    #[test]
    fn tiered_falls_back_to_tolerant() {
        let fm = FMIndex::from_reference(REFERENCE);
        let mut read = REFERENCE[12..42].to_vec();
        read[4] = b'A';
        read[27] = b'G';
        let recs = tiered(&fm).align(&read);
        assert!(!recs.is_empty());
        assert_eq!(recs[0].position, 12);
        assert_eq!(recs[0].mismatches(), Some(2));
        assert_eq!(recs[0].score, 28);
    }

    #[test]
    fn tiered_falls_back_to_spliced() {
        let mut reference = b"TTTTTTTTTTATGCATCCAGTCGT".to_vec();
        reference.extend(std::iter::repeat(b'T').take(60));
        reference.extend_from_slice(b"AGTCAGGATCCTACATTTTTTTTTT");
        let fm = FMIndex::from_reference(&reference);
        let recs = tiered(&fm).align(b"ATGCATCCAGTCTCAGGATCCTACA");
        assert!(!recs.is_empty());
        assert!(recs.iter().all(AlignmentRecord::is_spliced));
        assert_eq!(recs[0].position, 10);
        assert_eq!(recs[0].intron(), Some((22, 86)));
        assert_eq!(recs[0].cigar, "12M64N13M");
    }

    #[test]
    fn tiered_returns_empty_for_unalignable_reads() {
        let fm = FMIndex::from_reference(REFERENCE);
        let aligner = tiered(&fm);
        assert!(aligner.align(b"").is_empty());
        assert!(aligner.align(b"XXXXXXXXXXXXXXXXXXXX").is_empty());
        assert!(aligner.align(b"CCCCCCCCCCCCCCCCCCCC").is_empty());
    }

    #[test]
    fn seed_extend_ranks_and_scores() {
        let mut reference = REFERENCE.to_vec();
        reference.extend_from_slice(b"TTTTTTTTTT");
        reference.extend_from_slice(&REFERENCE[5..35]);
        let fm = FMIndex::from_reference(&reference);
        let opt = SeedExtendOpt { seed_len: 10, seed_interval: 10, ..SeedExtendOpt::default() };
        let aligner = SeedExtendAligner::new(&fm, opt).expect("valid options");
        let read = &REFERENCE[5..35];
        let recs = aligner.align(read);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.score == 60 && r.cigar == "30M"));
        let mut positions: Vec<usize> = recs.iter().map(|r| r.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![5, 66]);
        assert_eq!(recs[0].mapq, 60);
        assert_eq!(recs[1].mapq, 50);
    }

    #[test]
    fn seed_extend_reports_window_offset() {
        let fm = FMIndex::from_reference(REFERENCE);
        let opt = SeedExtendOpt { seed_len: 8, seed_interval: 4, ..SeedExtendOpt::default() };
        let aligner = SeedExtendAligner::new(&fm, opt).expect("valid options");
        // 前 4 个碱基与参考不符，局部对齐从 read 偏移 4 开始
        let mut read = b"TTTT".to_vec();
        read.extend_from_slice(&REFERENCE[20..40]);
        let recs = aligner.align(&read);
        let best = recs.first().expect("aligned");
        assert_eq!(best.position, 20);
        assert_eq!(best.cigar, "20M");
        assert_eq!(best.kind, AlignKind::Local { query_start: 4, edit_distance: 0 });
        assert_eq!(best.mapq, 40);
    }

    #[test]
    fn seed_extend_short_read_has_no_seeds() {
        let fm = FMIndex::from_reference(REFERENCE);
        let aligner = SeedExtendAligner::new(&fm, SeedExtendOpt::default()).expect("valid options");
        assert!(aligner.align(&REFERENCE[0..21]).is_empty());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let fm = FMIndex::from_reference(REFERENCE);
        let bad = SeedExtendOpt { seed_interval: 0, ..SeedExtendOpt::default() };
        assert!(SeedExtendAligner::new(&fm, bad).is_err());
        let bad_sw = SeedExtendOpt {
            sw: SwParams { mismatch_penalty: 4, ..SwParams::default() },
            ..SeedExtendOpt::default()
        };
        assert!(SeedExtendAligner::new(&fm, bad_sw).is_err());
        let bad_splice = TieredOpt {
            splice: SpliceOpt { min_anchor: 0, ..SpliceOpt::default() },
            ..TieredOpt::default()
        };
        assert!(TieredAligner::new(&fm, bad_splice).is_err());
    }

    #[test]
    fn reverse_strand_retry() {
        let fm = FMIndex::from_reference(REFERENCE);
        let aligner = tiered(&fm);
        let read = dna::revcomp(&REFERENCE[8..30]);
        assert!(align_with_strand(&aligner, &read, false).is_none());
        let hit = align_with_strand(&aligner, &read, true).expect("reverse hit");
        assert_eq!(hit.strand, Strand::Reverse);
        assert_eq!(hit.best.position, 8);
        let fwd = align_with_strand(&aligner, &REFERENCE[8..30], true).expect("forward hit");
        assert_eq!(fwd.strand, Strand::Forward);
    }
}
