pub mod sa;
pub mod bwt;
pub mod fm;
