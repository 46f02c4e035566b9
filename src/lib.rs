pub mod dates;
pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use dates::{normalize_date, normalize_date_with_year, parse_review_date};
pub use error::ReviewError;
pub use io::{read_reviews, read_reviews_file, write_partition_file, write_records_file};
pub use models::{DatedRecord, Period, PeriodWindow, RawRecord, Record};
pub use stages::{
    execute_preprocess, execute_split, preprocess_records, split_records, PartitionSet,
    PreprocessConfig, PreprocessResult, SplitConfig, SplitResult,
};
