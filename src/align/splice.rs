use serde::{Deserialize, Serialize};

use crate::index::fm::FMIndex;

use super::record::{mapq_from_score, AlignKind, AlignmentRecord};

/// 剪接对齐参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceOpt {
    /// 左右锚点的最短长度
    pub min_anchor: usize,
    pub min_intron: usize,
    pub max_intron: usize,
}

impl Default for SpliceOpt {
    fn default() -> Self {
        Self { min_anchor: 8, min_intron: 50, max_intron: 500_000 }
    }
}

impl SpliceOpt {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_anchor == 0 {
            anyhow::bail!("splice anchor length must be at least 1");
        }
        if self.min_intron > self.max_intron {
            anyhow::bail!(
                "minimum intron length {} exceeds maximum {}",
                self.min_intron,
                self.max_intron
            );
        }
        Ok(())
    }
}

/// 经典 GT-AG 剪接位点：donor 处为 GT，acceptor 之前两个碱基为 AG。
/// [donor, acceptor) 即内含子区间。
pub fn is_canonical_junction(reference: &[u8], donor: usize, acceptor: usize) -> bool {
    if donor + 2 > reference.len() || acceptor < 2 || acceptor > reference.len() {
        return false;
    }
    &reference[donor..donor + 2] == b"GT" && &reference[acceptor - 2..acceptor] == b"AG"
}

/// 剪接感知匹配：在每个切分点把 read 拆成左右两段分别精确搜索，
/// 左右命中两两组合，间隙长度落在内含子范围内且两端为 GT..AG 时输出一条剪接记录。
/// CIGAR 形如 `<l>M<gap>N<r>M`。
pub fn spliced_alignment(fm: &FMIndex, read: &[u8], opt: &SpliceOpt) -> Vec<AlignmentRecord> {
    let read_len = read.len();
    let mut out = Vec::new();
    if opt.min_anchor == 0 || read_len < 2 * opt.min_anchor {
        return out;
    }

    let score = read_len as i32;
    for split in opt.min_anchor..read_len - opt.min_anchor {
        let (left, right) = read.split_at(split);
        let left_hits = fm.locate(left);
        if left_hits.is_empty() {
            continue;
        }
        let right_hits = fm.locate(right);

        for &left_pos in &left_hits {
            let left_end = left_pos + left.len();
            for &right_pos in &right_hits {
                let Some(gap) = right_pos.checked_sub(left_end) else {
                    continue;
                };
                if gap < opt.min_intron || gap > opt.max_intron {
                    continue;
                }
                if !is_canonical_junction(&fm.reference, left_end, right_pos) {
                    continue;
                }
                out.push(AlignmentRecord {
                    position: left_pos,
                    cigar: format!("{}M{}N{}M", left.len(), gap, right.len()),
                    score,
                    mapq: mapq_from_score(score),
                    kind: AlignKind::Spliced { intron_start: left_end, intron_end: right_pos },
                });
            }
        }
    }
    out
}
