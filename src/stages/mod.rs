pub mod stage0_preprocess;
pub mod stage1_split;

pub use stage0_preprocess::*;
pub use stage1_split::*;
