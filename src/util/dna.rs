/// 闭合字母表大小：{0:$, 1:A, 2:C, 3:G, 4:T, 5:N}
pub const SIGMA: usize = 6;

/// 终止符编码，字典序小于所有碱基
pub const SENTINEL: u8 = 0;

/// 将 ASCII 碱基编码为字母表下标。NUL 字节视为终止符，未知字符按 N 处理。
#[inline]
pub fn to_alphabet(b: u8) -> u8 {
    if b == 0 { return SENTINEL; }
    match b.to_ascii_uppercase() {
        b'A' => 1,
        b'C' => 2,
        b'G' => 3,
        b'T' | b'U' => 4,
        _ => 5,
    }
}

/// 严格版本：仅接受 A/C/G/T/U/N（大小写不敏感），其他字符返回 None。
#[inline]
pub fn try_to_alphabet(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        b'A' => Some(1),
        b'C' => Some(2),
        b'G' => Some(3),
        b'T' | b'U' => Some(4),
        b'N' => Some(5),
        _ => None,
    }
}

/// read 预处理：转大写、U 视为 T；其他字符保持原样，在搜索时按无匹配处理
pub fn canonical_read(read: &[u8]) -> Vec<u8> {
    read.iter()
        .map(|&b| match b.to_ascii_uppercase() {
            b'U' => b'T',
            up => up,
        })
        .collect()
}

/// 编码查询模式（read / seed）。
/// 含有字母表之外的字符时返回 None，调用方将其视为“无匹配”。
pub fn encode_pattern(seq: &[u8]) -> Option<Vec<u8>> {
    seq.iter().map(|&b| try_to_alphabet(b)).collect()
}

/// 参考序列规范化：转大写，U 视为 T，其余未知字符统一为 N。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        let up = b.to_ascii_uppercase();
        let nb = match up {
            b'A' | b'C' | b'G' | b'T' | b'N' => up,
            b'U' => b'T',
            _ => b'N',
        };
        out.push(nb);
    }
    out
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_order_puts_sentinel_first() {
        let codes: Vec<u8> = b"\0ACGTN".iter().map(|&b| to_alphabet(b)).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
        for w in codes.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn encode_pattern_rejects_foreign_symbols() {
        assert_eq!(encode_pattern(b"acgtn"), Some(vec![1, 2, 3, 4, 5]));
        assert_eq!(encode_pattern(b"ACXT"), None);
        assert_eq!(encode_pattern(b"AC$T"), None);
        assert_eq!(encode_pattern(b""), Some(Vec::new()));
    }

    #[test]
    fn normalize_maps_unknown_to_n() {
        assert_eq!(normalize_seq(b"acgu-R"), b"ACGTNN".to_vec());
    }

    #[test]
    fn revcomp_basic() {
        assert_eq!(revcomp(b"AACGTN"), b"NACGTT".to_vec());
        assert_eq!(to_alphabet(b'g'), 3);
    }

    #[test]
    fn canonical_read_uppercases_and_keeps_foreign_bytes() {
        assert_eq!(canonical_read(b"acguN"), b"ACGTN".to_vec());
        assert_eq!(canonical_read(b"ac-x"), b"AC-X".to_vec());
    }
}
