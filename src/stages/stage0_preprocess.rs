use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dates::{has_trailing_year, normalize_date_with_year, DEFAULT_FALLBACK_YEAR};
use crate::io::{read_reviews_file, write_records_file};
use crate::models::{RawRecord, Record};

/// Configuration for Stage 0
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Year given to dates that do not end in one
    pub fallback_year: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            fallback_year: DEFAULT_FALLBACK_YEAR,
        }
    }
}

/// Result of Stage 0 preprocessing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessResult {
    /// Rows in the source table
    pub rows_read: usize,
    /// Rows dropped for a missing field
    pub rows_dropped: usize,
    /// Dates rewritten with the fallback year
    pub dates_rewritten: usize,
    /// Rows in the cleaned table
    pub rows_written: usize,
}

/// Clean records in memory: drop incomplete rows, then normalize dates
pub fn preprocess_records(
    rows: Vec<RawRecord>,
    config: &PreprocessConfig,
) -> (Vec<Record>, PreprocessResult) {
    let mut result = PreprocessResult {
        rows_read: rows.len(),
        ..Default::default()
    };

    let mut cleaned = Vec::with_capacity(rows.len());
    for (row, raw) in rows.into_iter().enumerate() {
        let Some(mut record) = raw.into_complete() else {
            debug!("Dropping row {}: missing field", row);
            result.rows_dropped += 1;
            continue;
        };

        if !has_trailing_year(&record.date) {
            let normalized = normalize_date_with_year(&record.date, config.fallback_year);
            debug!("Row {}: date {:?} -> {:?}", row, record.date, normalized);
            record.date = normalized;
            result.dates_rewritten += 1;
        }

        cleaned.push(record);
    }

    result.rows_written = cleaned.len();
    (cleaned, result)
}

/// Execute Stage 0: Preprocessing
///
/// Reads the `date`, `review_text` and `rating` columns of `input`, drops
/// rows with any missing field, gives year-less dates the fallback year and
/// writes the cleaned table to `output`.
pub fn execute_preprocess(
    input: &Path,
    output: &Path,
    config: &PreprocessConfig,
) -> Result<PreprocessResult> {
    info!("Loading reviews from {:?}", input);
    let raw = read_reviews_file(input)?;

    let (cleaned, result) = preprocess_records(raw, config);
    info!(
        "Preprocess: {} rows read, {} dropped, {} dates rewritten",
        result.rows_read, result.rows_dropped, result.dates_rewritten
    );

    write_records_file(output, &cleaned).context("Failed to write cleaned reviews")?;
    info!("Wrote {} rows to {:?}", result.rows_written, output);

    Ok(result)
}
