/// 根据后缀数组构建 BWT（变换串）：bwt[i] 为 sa[i] 前一个字符，sa[i] == 0 时循环取末尾字符。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    sa.iter()
        .map(|&p| {
            let i = p as usize;
            if i == 0 { text[n - 1] } else { text[i - 1] }
        })
        .collect()
}
