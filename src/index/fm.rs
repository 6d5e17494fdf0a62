use log::debug;

use crate::util::dna::{self, SIGMA};

use super::{bwt, sa};

/// 后缀数组上的半开区间 [low, high)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub low: usize,
    pub high: usize,
}

impl SearchRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }
}

/// 单条参考序列上的 FM 索引：
/// - 字母表固定为 {$, A, C, G, T, N}，按编码下标直接寻址，无需动态查表。
/// - Occ 为完整前缀计数表（每个字母 n+1 项），rank 查询 O(1)。
/// - 保存完整 SA 以及规范化后的参考序列，供候选位置校验使用。
///
/// 索引构建后不可变；参考序列改变时需要重新构建。
#[derive(Debug, Clone)]
pub struct FMIndex {
    /// 规范化后的参考序列（ASCII，不含终止符）
    pub reference: Vec<u8>,
    /// 完整 SA，长度 n = |reference| + 1
    pub sa: Vec<u32>,
    /// BWT 序列（与 SA 同长度）
    pub bwt: Vec<u8>,
    /// C[c] = 文本中字母 < c 的累计数量
    pub c: [u32; SIGMA],
    /// occ[c][i] = BWT[0..i) 中 c 的出现次数
    pub occ: [Vec<u32>; SIGMA],
}

impl FMIndex {
    /// 从原始参考序列构建索引：规范化 -> 编码 -> 追加终止符 -> SA -> BWT -> C/Occ。
    /// 空参考序列合法，得到只含终止符的单元素索引。
    pub fn from_reference(seq: &[u8]) -> Self {
        let reference = dna::normalize_seq(seq);
        let mut text: Vec<u8> = reference.iter().map(|&b| dna::to_alphabet(b)).collect();
        text.push(dna::SENTINEL);

        debug!("Generate suffix array ({} symbols)", text.len());
        let sa_arr = sa::build_sa(&text);
        debug!("Generate BWT");
        let bwt_arr = bwt::build_bwt(&text, &sa_arr);
        Self::build(reference, sa_arr, bwt_arr)
    }

    /// 由已有的 SA / BWT 组装索引；字母表之外的编码不计入 C/Occ 表
    pub(crate) fn build(reference: Vec<u8>, sa: Vec<u32>, bwt: Vec<u8>) -> Self {
        let n = bwt.len();

        debug!("Generate \"C\" table");
        let mut freq = [0u32; SIGMA];
        for &ch in &bwt {
            let ci = ch as usize;
            if ci < SIGMA { freq[ci] += 1; }
        }
        let mut c = [0u32; SIGMA];
        let mut acc = 0u32;
        for a in 0..SIGMA {
            c[a] = acc;
            acc += freq[a];
        }

        debug!("Generate \"Occ\" table");
        let mut occ: [Vec<u32>; SIGMA] = std::array::from_fn(|_| Vec::with_capacity(n + 1));
        let mut running = [0u32; SIGMA];
        for col in occ.iter_mut() {
            col.push(0);
        }
        for &ch in &bwt {
            let ci = ch as usize;
            if ci < SIGMA { running[ci] += 1; }
            for (col, &cnt) in occ.iter_mut().zip(running.iter()) {
                col.push(cnt);
            }
        }

        Self { reference, sa, bwt, c, occ }
    }

    /// 索引文本长度（含终止符）
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// 参考序列长度（不含终止符）
    #[inline]
    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    /// 返回 BWT[0..pos) 中 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> u32 {
        self.occ[c as usize][pos]
    }

    #[inline]
    pub fn rank_range(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        // 返回在区间 [l, r) 上向左扩展字符 c 后的新区间
        let c0 = self.c[c as usize] as usize;
        (c0 + self.occ(c, l) as usize, c0 + self.occ(c, r) as usize)
    }

    /// 反向搜索精确匹配，pat 为编码后的字母表。
    /// 空模式返回整个区间 [0, n)；区间变空或遇到字母表外的编码时返回 None。
    pub fn backward_search(&self, pat: &[u8]) -> Option<SearchRange> {
        let mut l = 0usize;
        let mut r = self.len();
        for &a in pat.iter().rev() {
            if a as usize >= SIGMA {
                return None;
            }
            let (nl, nr) = self.rank_range(a, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        if l >= r {
            return None;
        }
        Some(SearchRange { low: l, high: r })
    }

    /// 以 ASCII 序列查询；含非法字符的模式直接视为无匹配。
    pub fn search(&self, seq: &[u8]) -> Option<SearchRange> {
        let pat = dna::encode_pattern(seq)?;
        self.backward_search(&pat)
    }

    /// 取出 SA 区间对应的文本位置（按 SA 顺序，而非位置顺序）。
    pub fn sa_interval_positions(&self, range: SearchRange) -> &[u32] {
        &self.sa[range.low..range.high]
    }

    /// 模式在参考序列中的全部出现位置，升序。
    pub fn locate(&self, seq: &[u8]) -> Vec<usize> {
        let Some(range) = self.search(seq) else {
            return Vec::new();
        };
        let mut positions: Vec<usize> = self
            .sa_interval_positions(range)
            .iter()
            .map(|&p| p as usize)
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn count(&self, seq: &[u8]) -> usize {
        self.search(seq).map_or(0, |r| r.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(text: &[u8], pat: &[u8]) -> Vec<usize> {
        if pat.len() > text.len() {
            return Vec::new();
        }
        (0..=text.len() - pat.len())
            .filter(|&i| &text[i..i + pat.len()] == pat)
            .collect()
    }

    #[test]
    fn tables_satisfy_invariants() {
        let fm = FMIndex::from_reference(b"ACGTACGTTTCGATCGANNA");
        let n = fm.len();
        assert_eq!(n, 21);
        let mut total = 0usize;
        for a in 0..SIGMA {
            let cnt = fm.occ[a][n] as usize;
            assert_eq!(cnt, fm.bwt.iter().filter(|&&b| b as usize == a).count());
            assert_eq!(fm.c[a] as usize, total);
            total += cnt;
        }
        assert_eq!(total, n);
        assert_eq!(fm.occ(0, n), 1);
    }

    #[test]
    fn exact_search_end_to_end_example() {
        let fm = FMIndex::from_reference(b"ACGTACGTTTCGATCGA");
        assert_eq!(fm.locate(b"ACGTTTC"), vec![4]);
        assert_eq!(fm.locate(b"ACGT"), vec![0, 4]);
        assert_eq!(fm.locate(b"CGA"), vec![10, 14]);
    }

    #[test]
    fn search_matches_brute_force() {
        let reference = b"TTAGGCATACGATTTAGGCANNACGTAGGCATTAGG";
        let fm = FMIndex::from_reference(reference);
        for len in 1..=5 {
            for start in 0..reference.len() - len {
                let pat = &reference[start..start + len];
                assert_eq!(fm.locate(pat), brute_force(reference, pat), "pattern {:?}", pat);
            }
        }
        assert!(fm.locate(b"CCCCC").is_empty());
    }

    #[test]
    fn malformed_or_absent_symbols_are_no_match() {
        let fm = FMIndex::from_reference(b"ACGTACGT");
        assert_eq!(fm.search(b"ACXT"), None);
        // N 在字母表内，但参考序列中不存在
        assert_eq!(fm.search(b"N"), None);
        assert_eq!(fm.backward_search(&[9]), None);
    }

    #[test]
    fn empty_reference_and_pattern() {
        let fm = FMIndex::from_reference(b"");
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.sa, vec![0]);
        assert!(fm.search(b"A").is_none());
        assert_eq!(fm.backward_search(&[]), Some(SearchRange { low: 0, high: 1 }));
    }

    #[test]
    fn build_ignores_codes_outside_alphabet() {
        // 编码 9 不属于字母表，不应导致越界，也不计入任何计数
        let fm = FMIndex::build(b"AC".to_vec(), vec![2, 0, 1], vec![2, 9, 1]);
        assert_eq!(fm.occ[1][3], 1);
        assert_eq!(fm.occ[2][3], 1);
        assert_eq!(fm.c[3], 2);
        assert_eq!(fm.backward_search(&[9]), None);
    }

    #[test]
    fn lowercase_reference_is_normalized() {
        let fm = FMIndex::from_reference(b"acgtacgt");
        assert_eq!(fm.reference, b"ACGTACGT".to_vec());
        assert_eq!(fm.count(b"cgt"), 2);
    }
}
