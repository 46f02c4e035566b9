use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::ReviewError;
use crate::models::{RawRecord, DATE_COLUMN, RATING_COLUMN, REVIEW_TEXT_COLUMN};

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    date: usize,
    review_text: usize,
    rating: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self, ReviewError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ReviewError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            review_text: find(REVIEW_TEXT_COLUMN)?,
            rating: find(RATING_COLUMN)?,
        })
    }

    fn select(&self, row: &StringRecord) -> RawRecord {
        RawRecord::from_cells(row.get(self.date), row.get(self.review_text), row.get(self.rating))
    }
}

/// Read the review columns of a CSV file
pub fn read_reviews_file(path: &Path) -> Result<Vec<RawRecord>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    read_reviews(file).with_context(|| format!("Failed to read reviews from {:?}", path))
}

/// Read the review columns from any CSV source with a header row.
///
/// Extra columns are ignored and rows may be ragged; a cell past the end of
/// a short row counts as missing.
pub fn read_reviews<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnIndices::from_headers(&headers)?;
    debug!("Column positions: {:?}", columns);

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        records.push(columns.select(&row));
    }

    Ok(records)
}
