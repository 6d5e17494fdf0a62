use std::collections::HashSet;

use crate::index::fm::FMIndex;

/// read 上的定长种子：子串及其在 read 中的偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed<'a> {
    pub seq: &'a [u8],
    pub offset: usize,
}

/// 按固定长度、固定步长切分 read 的惰性迭代器。
/// 可 clone 重新遍历，不产生任何副作用。
#[derive(Debug, Clone)]
pub struct Seeds<'a> {
    read: &'a [u8],
    len: usize,
    stride: usize,
    next: usize,
}

impl<'a> Iterator for Seeds<'a> {
    type Item = Seed<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 || self.stride == 0 {
            return None;
        }
        let offset = self.next;
        let end = offset.checked_add(self.len)?;
        if end > self.read.len() {
            return None;
        }
        self.next = offset.saturating_add(self.stride);
        Some(Seed { seq: &self.read[offset..end], offset })
    }
}

/// 在偏移 0, S, 2S, … 处提取长度为 L 的种子，直到 offset + L > |read|。
/// L > |read|、L == 0 或 S == 0 时得到空序列。
pub fn extract_seeds(read: &[u8], seed_len: usize, stride: usize) -> Seeds<'_> {
    Seeds { read, len: seed_len, stride, next: 0 }
}

/// 对每个种子做精确搜索，把命中位置投影为 read 的起始位置（hit - offset）。
/// 超出 [0, |reference| - |read|] 的起点被丢弃；结果保留发现顺序，可能含重复。
/// 每个种子的命中按参考位置升序展开。
pub fn project_seed_hits<'a, I>(fm: &FMIndex, read_len: usize, seeds: I) -> Vec<usize>
where
    I: IntoIterator<Item = Seed<'a>>,
{
    let ref_len = fm.reference_len();
    let Some(max_start) = ref_len.checked_sub(read_len) else {
        return Vec::new();
    };

    let mut starts = Vec::new();
    for seed in seeds {
        for hit in fm.locate(seed.seq) {
            // hit < offset 时起点为负
            let Some(start) = hit.checked_sub(seed.offset) else {
                continue;
            };
            if start <= max_start {
                starts.push(start);
            }
        }
    }
    starts
}

/// 按起始位置去重，保留第一次出现的顺序。
pub fn dedup_positions(starts: Vec<usize>) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(starts.len());
    starts.into_iter().filter(|s| seen.insert(*s)).collect()
}

/// 种子搜索 + 投影 + 去重
pub fn candidate_starts<'a, I>(fm: &FMIndex, read_len: usize, seeds: I) -> Vec<usize>
where
    I: IntoIterator<Item = Seed<'a>>,
{
    dedup_positions(project_seed_hits(fm, read_len, seeds))
}
