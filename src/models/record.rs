use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Column names every input table must carry
pub const DATE_COLUMN: &str = "date";
pub const REVIEW_TEXT_COLUMN: &str = "review_text";
pub const RATING_COLUMN: &str = "rating";

pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, REVIEW_TEXT_COLUMN, RATING_COLUMN];

/// Cell values read as missing, matched after trimming
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Check whether a raw cell should be treated as a missing value
pub fn is_missing(value: &str) -> bool {
    NA_MARKERS.contains(&value.trim())
}

/// A row as read from the source table, restricted to the required columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub date: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<String>,
}

impl RawRecord {
    /// Build from cell values, mapping NA markers to `None`
    pub fn from_cells(date: Option<&str>, review_text: Option<&str>, rating: Option<&str>) -> Self {
        let cell = |v: Option<&str>| v.filter(|s| !is_missing(s)).map(str::to_string);
        Self {
            date: cell(date),
            review_text: cell(review_text),
            rating: cell(rating),
        }
    }

    /// Whether any of the three fields is missing
    pub fn has_missing_field(&self) -> bool {
        self.date.is_none() || self.review_text.is_none() || self.rating.is_none()
    }

    /// Convert into a complete record, or `None` if a field is missing
    pub fn into_complete(self) -> Option<Record> {
        Some(Record {
            date: self.date?,
            review_text: self.review_text?,
            rating: self.rating?,
        })
    }
}

/// A complete review row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Date as written in the source, normalized after preprocessing
    pub date: String,
    /// Review body, passed through untouched
    pub review_text: String,
    /// Numeric rating, carried verbatim
    pub rating: String,
}

impl Record {
    pub fn new(date: impl Into<String>, review_text: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            review_text: review_text.into(),
            rating: rating.into(),
        }
    }
}

/// A cleaned record with its parsed date and its position in the cleaned table
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRecord {
    /// Zero-based row position in the cleaned table
    pub position: usize,
    pub timestamp: NaiveDateTime,
    pub record: Record,
}
