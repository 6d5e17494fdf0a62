//! # fm-align
//!
//! 基于 FM 索引的 DNA 短序列比对引擎。
//!
//! 本 crate 提供：
//!
//! - **索引构建**：后缀数组 + BWT + C/Occ 表，字母表固定为 {$, A, C, G, T, N}
//! - **精确搜索**：反向搜索（backward search）得到 SA 半开区间
//! - **种子-延伸**：定长定步种子、候选起点投影与去重、线性间隙 Smith-Waterman
//! - **容错匹配**：按鸽巢原理切分种子，无间隙统计错配
//! - **剪接匹配**：左右锚点跨越 GT..AG 内含子
//! - **两种流程**：分层（精确 -> 容错 -> 剪接）与种子-延伸（带排名 MAPQ）
//!
//! 索引对每条参考序列只构建一次，之后可对任意多条 read 重复比对。
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_align::index::fm::FMIndex;
//! use fm_align::align::{ReadAligner, TieredAligner, TieredOpt};
//!
//! let fm = FMIndex::from_reference(b"ACGTACGTTTCGATCGA");
//! assert_eq!(fm.locate(b"ACGTTTC"), vec![4]);
//!
//! let aligner = TieredAligner::new(&fm, TieredOpt::default()).unwrap();
//! let records = aligner.align(b"ACGTTTC");
//! assert_eq!(records[0].position, 4);
//! assert_eq!(records[0].cigar, "7M");
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — FM 索引构建（后缀数组、BWT、FM 索引）与反向搜索
//! - [`align`] — 种子、Smith-Waterman、容错/剪接匹配与比对流程
//! - [`util`] — DNA 编码 / 规范化 / 反向互补

pub mod index;
pub mod util;
pub mod align;
