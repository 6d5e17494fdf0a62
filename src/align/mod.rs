use serde::{Deserialize, Serialize};

pub mod pipeline;
pub mod record;
pub mod seed;
pub mod splice;
pub mod sw;
pub mod tolerant;

pub use pipeline::{align_with_strand, ReadAligner, SeedExtendAligner, Strand, StrandedHit, TieredAligner};
pub use record::{AlignKind, AlignmentRecord};
pub use seed::{extract_seeds, Seed};
pub use splice::SpliceOpt;
pub use sw::{compress_cigar, smith_waterman, SwBuffer, SwParams, SwResult};

/// Options for the tiered (exact -> tolerant -> spliced) aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredOpt {
    /// Maximum substitutions accepted by the tolerant tier
    pub max_mismatches: u32,
    pub splice: SpliceOpt,
}

impl Default for TieredOpt {
    fn default() -> Self {
        Self { max_mismatches: 2, splice: SpliceOpt::default() }
    }
}

impl TieredOpt {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.splice.validate()
    }
}

/// Options for the seed-then-extend aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedExtendOpt {
    pub seed_len: usize,
    pub seed_interval: usize,
    /// extra reference bases appended to the extension window (|read| + pad)
    pub window_pad: usize,
    pub sw: SwParams,
}

impl Default for SeedExtendOpt {
    fn default() -> Self {
        Self { seed_len: 22, seed_interval: 15, window_pad: 20, sw: SwParams::default() }
    }
}

impl SeedExtendOpt {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.seed_len == 0 {
            anyhow::bail!("seed length must be at least 1");
        }
        if self.seed_interval == 0 {
            anyhow::bail!("seed interval must be at least 1");
        }
        self.sw.validate()
    }
}
