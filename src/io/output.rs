use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime};

use crate::models::{DatedRecord, Record, REQUIRED_COLUMNS};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write cleaned records as `date,review_text,rating`
pub fn write_records_file(path: &Path, records: &[Record]) -> Result<()> {
    let file = create_file(path)?;
    write_records(file, records).with_context(|| format!("Failed to write CSV: {:?}", path))
}

pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // An empty table still gets its header
    if records.is_empty() {
        wtr.write_record(REQUIRED_COLUMNS)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one partition, led by an unnamed column holding each row's
/// position in the cleaned table
pub fn write_partition_file(path: &Path, records: &[&DatedRecord]) -> Result<()> {
    let file = create_file(path)?;
    write_partition(file, records).with_context(|| format!("Failed to write CSV: {:?}", path))
}

pub fn write_partition<W: Write>(writer: W, records: &[&DatedRecord]) -> Result<()> {
    let date_format = partition_date_format(records.iter().map(|r| &r.timestamp));

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once("").chain(REQUIRED_COLUMNS))?;
    for dated in records {
        wtr.write_record([
            dated.position.to_string(),
            dated.timestamp.format(date_format).to_string(),
            dated.record.review_text.clone(),
            dated.record.rating.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Date-only output unless some timestamp in the file carries a time of day
fn partition_date_format<'a>(mut timestamps: impl Iterator<Item = &'a NaiveDateTime>) -> &'static str {
    if timestamps.any(|ts| ts.time() != NaiveTime::MIN) {
        DATETIME_FORMAT
    } else {
        DATE_FORMAT
    }
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    std::fs::File::create(path).with_context(|| format!("Failed to create file: {:?}", path))
}
