use crate::index::fm::FMIndex;
use crate::util::dna;

use super::record::{mapq_from_score, AlignKind, AlignmentRecord};
use super::seed::{candidate_starts, extract_seeds};

/// 种子最短长度
pub const MIN_SEED_LEN: usize = 8;

/// 容错种子长度：max(8, |read| / (K+1))，不超过 read 长度。
/// 鸽巢原理：K 个错配最多破坏 K 个互不重叠的种子。
pub fn tolerant_seed_len(read_len: usize, max_mismatches: u32) -> usize {
    let pigeonhole = read_len / (max_mismatches as usize + 1);
    pigeonhole.max(MIN_SEED_LEN).min(read_len)
}

/// 逐位比较统计错配数，比较长度取两者较短者
pub fn count_mismatches(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).filter(|(x, y)| x != y).count() as u32
}

/// 容错种子-延伸（无间隙）：不重叠种子精确搜索，投影出候选起点后
/// 在整条 read 上直接统计错配，错配数 <= K 的候选被接受。
/// 只能发现替换，不处理插入/删除。
pub fn seed_and_extend(fm: &FMIndex, read: &[u8], max_mismatches: u32) -> Vec<AlignmentRecord> {
    // 参考序列已规范化为大写，read 需同样处理后才能逐位比较
    let read = dna::canonical_read(read);
    let read = read.as_slice();
    let read_len = read.len();
    if read_len == 0 {
        return Vec::new();
    }
    let seed_len = tolerant_seed_len(read_len, max_mismatches);
    let starts = candidate_starts(fm, read_len, extract_seeds(read, seed_len, seed_len));

    let mut out = Vec::new();
    for start in starts {
        let window = &fm.reference[start..start + read_len];
        let mismatches = count_mismatches(read, window);
        if mismatches > max_mismatches {
            continue;
        }
        let score = read_len as i32 - mismatches as i32;
        out.push(AlignmentRecord {
            position: start,
            cigar: format!("{}M", read_len),
            score,
            mapq: mapq_from_score(score),
            kind: AlignKind::Ungapped { mismatches },
        });
    }
    out
}
