pub mod period;
pub mod record;

pub use period::*;
pub use record::*;
