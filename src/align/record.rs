use serde::{Deserialize, Serialize};

/// MAPQ 上限
pub const MAX_MAPQ: u8 = 60;

/// 对齐记录的类型，只携带各自相关的信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlignKind {
    /// 整条 read 精确匹配
    Exact,
    /// 无间隙、仅含替换的近似匹配
    Ungapped { mismatches: u32 },
    /// 跨越一个内含子的剪接对齐；[intron_start, intron_end) 为参考坐标
    Spliced { intron_start: usize, intron_end: usize },
    /// Smith-Waterman 局部延伸的结果
    Local { query_start: usize, edit_distance: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    /// 参考序列上的 0-based 起始位置
    pub position: usize,
    pub cigar: String,
    pub score: i32,
    pub mapq: u8,
    pub kind: AlignKind,
}

impl AlignmentRecord {
    pub fn mismatches(&self) -> Option<u32> {
        match self.kind {
            AlignKind::Exact | AlignKind::Spliced { .. } => Some(0),
            AlignKind::Ungapped { mismatches } => Some(mismatches),
            AlignKind::Local { .. } => None,
        }
    }

    pub fn is_spliced(&self) -> bool {
        matches!(self.kind, AlignKind::Spliced { .. })
    }

    pub fn intron(&self) -> Option<(usize, usize)> {
        match self.kind {
            AlignKind::Spliced { intron_start, intron_end } => Some((intron_start, intron_end)),
            _ => None,
        }
    }
}

/// 由得分直接得到的 MAPQ：min(60, score)，负分记为 0
#[inline]
pub fn mapq_from_score(score: i32) -> u8 {
    score.clamp(0, i32::from(MAX_MAPQ)) as u8
}

/// 按得分降序稳定排序；同分记录保持原有（发现）顺序
pub fn sort_by_score_desc(records: &mut [AlignmentRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}

/// 按排名分配 MAPQ：第 0 名为 min(60, score)，第 r 名为 max(0, 60 - 10r)。
/// 调用前记录应已按得分降序排列。
pub fn assign_rank_mapq(records: &mut [AlignmentRecord]) {
    for (rank, rec) in records.iter_mut().enumerate() {
        rec.mapq = if rank == 0 {
            mapq_from_score(rec.score)
        } else {
            let penalty = rank.saturating_mul(10).min(usize::from(MAX_MAPQ));
            MAX_MAPQ - penalty as u8
        };
    }
}
