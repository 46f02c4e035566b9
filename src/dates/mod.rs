pub mod normalizer;
pub mod parser;

pub use normalizer::*;
pub use parser::*;
