use thiserror::Error;

/// Failures specific to review data, as opposed to I/O or CSV syntax
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("required column `{column}` not found in header")]
    MissingColumn { column: String },

    #[error("row {row}: cannot parse date {value:?}")]
    UnparseableDate { row: usize, value: String },
}
