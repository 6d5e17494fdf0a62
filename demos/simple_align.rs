//! 演示如何在 library 模式下使用 fm-align 进行序列比对。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use fm_align::align::{
    self, align_with_strand, ReadAligner, SeedExtendAligner, SeedExtendOpt, TieredAligner, TieredOpt,
};
use fm_align::index::fm::FMIndex;
use fm_align::util::dna;

fn main() -> anyhow::Result<()> {
    // 1. 构建参考序列：两个外显子之间夹一个 GT..AG 内含子
    let mut reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGAT".to_vec();
    reference.extend_from_slice(b"GT");
    reference.extend(std::iter::repeat(b'C').take(80));
    reference.extend_from_slice(b"AGTTCAGGATCCTACAGGCATTAACG");
    println!("参考长度: {} bp", reference.len());

    // 2. 构建 FM 索引（每条参考序列只需一次）
    let fm = FMIndex::from_reference(&reference);
    println!("FM 索引构建完成：BWT 长度={}, SA 长度={}", fm.bwt.len(), fm.sa.len());

    // 3. 精确匹配搜索
    let pattern = b"GCTGATCGTAG";
    let positions = fm.locate(pattern);
    println!("\n精确匹配 '{}': 找到 {} 处 {:?}", String::from_utf8_lossy(pattern), positions.len(), positions);

    // 4. 种子
    let read = b"GCTAGCTGATCGTAGCTAGCTAGCTGAT";
    println!("\n种子（read='{}'，L=8，S=6）:", String::from_utf8_lossy(read));
    for s in align::extract_seeds(read, 8, 6) {
        println!("  read[{}..{}] {} -> {:?}", s.offset, s.offset + s.seq.len(), String::from_utf8_lossy(s.seq), fm.locate(s.seq));
    }

    // 5. 分层比对：精确 / 容错 / 剪接 / 反向互补
    let tiered = TieredAligner::new(&fm, TieredOpt::default())?;
    let mut mutated = read.to_vec();
    mutated[10] = b'A';
    let spliced = b"GCTAGCTGATTTCAGGATCCTACA";
    let reads: [(&str, Vec<u8>); 4] = [
        ("exact", read.to_vec()),
        ("one_mismatch", mutated),
        ("spliced", spliced.to_vec()),
        ("reverse", dna::revcomp(read)),
    ];
    println!("\n分层比对:");
    for (name, seq) in &reads {
        match align_with_strand(&tiered, seq, true) {
            Some(hit) => println!(
                "  {:<13} {:?} pos={} cigar={} score={} mapq={} kind={:?}",
                name, hit.strand, hit.best.position, hit.best.cigar, hit.best.score, hit.best.mapq, hit.best.kind
            ),
            None => println!("  {:<13} unmapped", name),
        }
    }

    // 6. 种子-延伸比对
    let seed_extend = SeedExtendAligner::new(&fm, SeedExtendOpt { seed_len: 10, seed_interval: 5, ..SeedExtendOpt::default() })?;
    println!("\n种子-延伸比对:");
    for rec in seed_extend.align(read) {
        println!("  pos={} cigar={} score={} mapq={}", rec.position, rec.cigar, rec.score, rec.mapq);
    }

    Ok(())
}
