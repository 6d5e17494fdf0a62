use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// 线性间隙 Smith-Waterman 打分参数。
/// 罚分以负数给出，直接累加到得分上。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwParams {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    /// 插入与删除共用的单碱基间隙罚分
    pub gap_penalty: i32,
}

impl Default for SwParams {
    fn default() -> Self {
        Self { match_score: 2, mismatch_penalty: -4, gap_penalty: -1 }
    }
}

impl SwParams {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.match_score <= 0 {
            anyhow::bail!("match score must be positive, got {}", self.match_score);
        }
        if self.mismatch_penalty >= 0 {
            anyhow::bail!("mismatch penalty must be negative, got {}", self.mismatch_penalty);
        }
        if self.gap_penalty >= 0 {
            anyhow::bail!("gap penalty must be negative, got {}", self.gap_penalty);
        }
        Ok(())
    }

    #[inline]
    fn subst(&self, a: u8, b: u8) -> i32 {
        if a == b { self.match_score } else { self.mismatch_penalty }
    }
}

/// 回溯方向；判定顺序固定为 Diag > Up > Left > Reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trace {
    Reset,
    Diag,
    Up,
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwResult {
    pub score: i32,
    /// 局部对齐在 query 上的区间 [query_start, query_end)
    pub query_start: usize,
    pub query_end: usize,
    /// 局部对齐在 target 上的区间 [target_start, target_end)
    pub target_start: usize,
    pub target_end: usize,
    pub cigar: String,
    /// 错配 + 插入 + 删除的碱基数
    pub edit_distance: u32,
}

impl SwResult {
    fn empty() -> Self {
        Self {
            score: 0,
            query_start: 0,
            query_end: 0,
            target_start: 0,
            target_end: 0,
            cigar: String::new(),
            edit_distance: 0,
        }
    }
}

/// DP 工作缓冲区（得分矩阵 + 回溯矩阵），可跨调用复用。
/// 每次调用前都会整体重置，不会残留上一次的数据。
#[derive(Debug, Default)]
pub struct SwBuffer {
    score: Vec<i32>,
    trace: Vec<Trace>,
}

impl SwBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, size: usize) {
        self.score.clear();
        self.score.resize(size, 0);
        self.trace.clear();
        self.trace.resize(size, Trace::Reset);
    }
}

/// Smith-Waterman 局部对齐（线性间隙，完整矩阵）
pub fn smith_waterman(query: &[u8], target: &[u8], p: SwParams) -> SwResult {
    smith_waterman_with_buf(query, target, p, &mut SwBuffer::new())
}

pub fn smith_waterman_with_buf(query: &[u8], target: &[u8], p: SwParams, buf: &mut SwBuffer) -> SwResult {
    let m = query.len();
    let n = target.len();
    if m == 0 || n == 0 {
        return SwResult::empty();
    }

    let cols = n + 1;
    buf.reset((m + 1) * cols);
    let h = &mut buf.score;
    let tb = &mut buf.trace;

    let mut best_score = 0i32;
    let mut best_i = 0usize;
    let mut best_j = 0usize;

    for i in 1..=m {
        for j in 1..=n {
            let idx = i * cols + j;
            let diag = h[idx - cols - 1] + p.subst(query[i - 1], target[j - 1]);
            // up：消耗 query 一个碱基（I）；left：消耗 target 一个碱基（D）
            let up = h[idx - cols] + p.gap_penalty;
            let left = h[idx - 1] + p.gap_penalty;

            let val = diag.max(up).max(left).max(0);
            h[idx] = val;
            tb[idx] = if val == diag {
                Trace::Diag
            } else if val == up {
                Trace::Up
            } else if val == left {
                Trace::Left
            } else {
                Trace::Reset
            };

            if val > best_score {
                best_score = val;
                best_i = i;
                best_j = j;
            }
        }
    }

    if best_score <= 0 {
        return SwResult::empty();
    }

    // backtrack from best cell
    let mut ops: Vec<char> = Vec::new();
    let mut i = best_i;
    let mut j = best_j;
    while i > 0 && j > 0 && h[i * cols + j] > 0 {
        match tb[i * cols + j] {
            Trace::Diag => {
                ops.push('M');
                i -= 1;
                j -= 1;
            }
            Trace::Up => {
                ops.push('I');
                i -= 1;
            }
            Trace::Left => {
                ops.push('D');
                j -= 1;
            }
            Trace::Reset => break,
        }
    }
    ops.reverse();

    let (query_start, target_start) = (i, j);
    let mut edit_distance = 0u32;
    let (mut qi, mut tj) = (query_start, target_start);
    for &op in &ops {
        match op {
            'M' => {
                if query[qi] != target[tj] {
                    edit_distance += 1;
                }
                qi += 1;
                tj += 1;
            }
            'I' => {
                edit_distance += 1;
                qi += 1;
            }
            _ => {
                edit_distance += 1;
                tj += 1;
            }
        }
    }

    SwResult {
        score: best_score,
        query_start,
        query_end: best_i,
        target_start,
        target_end: best_j,
        cigar: compress_cigar(&ops),
        edit_distance,
    }
}

/// 游程压缩编辑操作序列：相邻相同操作合并为 `<count><op>`，空输入返回空串
pub fn compress_cigar(ops: &[char]) -> String {
    let mut cigar = String::new();
    let Some((&first, rest)) = ops.split_first() else {
        return cigar;
    };
    let mut cur = first;
    let mut len = 1usize;
    for &op in rest {
        if op == cur {
            len += 1;
        } else {
            let _ = write!(&mut cigar, "{}{}", len, cur);
            cur = op;
            len = 1;
        }
    }
    let _ = write!(&mut cigar, "{}{}", len, cur);
    cigar
}

pub fn parse_cigar(cigar: &str) -> Vec<(char, usize)> {
    let mut result = Vec::new();
    let mut num = 0usize;
    for ch in cigar.chars() {
        if let Some(d) = ch.to_digit(10) {
            num = num * 10 + d as usize;
        } else {
            if num > 0 {
                result.push((ch, num));
            }
            num = 0;
        }
    }
    result
}

/// 将 CIGAR 展开为逐列操作序列，是 [`compress_cigar`] 的逆运算
pub fn expand_cigar(cigar: &str) -> Vec<char> {
    parse_cigar(cigar)
        .into_iter()
        .flat_map(|(op, len)| std::iter::repeat(op).take(len))
        .collect()
}
