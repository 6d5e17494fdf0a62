/// 构建后缀数组（前缀倍增，每轮一次排序）。
/// 输入为数值化文本（0:$,1:A,2:C,3:G,4:T,5:N），末尾为唯一的终止符 0。
/// 终止符唯一，因此任意两个后缀都不相等，排序结果是全序。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
    let mut tmp: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    loop {
        // 越过文本末尾的部分排名记为 -1，保证短后缀排在前面
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by_key(|&i| key(i));

        tmp[sa[0]] = 0;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            tmp[b] = tmp[a] + i64::from(key(a) != key(b));
        }
        std::mem::swap(&mut rank, &mut tmp);

        // 所有排名互不相同即可结束
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}
