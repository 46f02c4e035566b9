use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::dates::parse_review_date;
use crate::error::ReviewError;
use crate::io::{read_reviews_file, write_partition_file};
use crate::models::{DatedRecord, Period, PeriodWindow, RawRecord, Record};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Windows to partition into, written in this order
    pub windows: Vec<PeriodWindow>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            windows: PeriodWindow::defaults(),
        }
    }
}

/// Rows that landed in one period
#[derive(Debug, Clone)]
pub struct Partition {
    pub period: Period,
    /// Indices into the dated record list
    pub record_indices: Vec<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.record_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_indices.is_empty()
    }
}

/// Outcome of partitioning a cleaned table
#[derive(Debug, Clone)]
pub struct PartitionSet {
    /// Every row with a date, in table order
    pub records: Vec<DatedRecord>,
    /// One partition per configured window
    pub partitions: Vec<Partition>,
    /// Rows with no date at all
    pub undated: usize,
}

impl PartitionSet {
    /// Records in a partition, in table order
    pub fn records_in<'a>(&'a self, partition: &'a Partition) -> impl Iterator<Item = &'a DatedRecord> {
        partition
            .record_indices
            .iter()
            .filter_map(|&i| self.records.get(i))
    }

    /// Row count for a period, summed over windows assigned to it
    pub fn count(&self, period: Period) -> usize {
        self.partitions
            .iter()
            .filter(|p| p.period == period)
            .map(Partition::len)
            .sum()
    }

    /// Dated rows that fall in no window (before the first, or on a boundary)
    pub fn outside_windows(&self) -> usize {
        let mut assigned = vec![false; self.records.len()];
        for &i in self.partitions.iter().flat_map(|p| &p.record_indices) {
            assigned[i] = true;
        }
        assigned.iter().filter(|&&hit| !hit).count()
    }
}

/// Result of Stage 1 splitting
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Rows in the cleaned table
    pub rows_read: usize,
    /// Row count per period
    pub counts: HashMap<Period, usize>,
    /// Written partition files, in window order
    pub outputs: Vec<(Period, PathBuf)>,
    /// Rows written to no partition
    pub rows_unassigned: usize,
}

/// Parse every row's date. A row without a date is skipped; a date that
/// cannot be parsed aborts the run.
pub fn date_records(raw: Vec<RawRecord>) -> Result<(Vec<DatedRecord>, usize), ReviewError> {
    let mut dated = Vec::with_capacity(raw.len());
    let mut undated = 0;

    for (position, raw) in raw.into_iter().enumerate() {
        let Some(date) = raw.date else {
            debug!("Row {}: no date", position);
            undated += 1;
            continue;
        };

        let timestamp =
            parse_review_date(&date).ok_or_else(|| ReviewError::UnparseableDate {
                row: position,
                value: date.clone(),
            })?;

        dated.push(DatedRecord {
            position,
            timestamp,
            record: Record {
                date,
                review_text: raw.review_text.unwrap_or_default(),
                rating: raw.rating.unwrap_or_default(),
            },
        });
    }

    Ok((dated, undated))
}

/// Parse and partition a cleaned table in memory
pub fn split_records(raw: Vec<RawRecord>, config: &SplitConfig) -> Result<PartitionSet, ReviewError> {
    let (records, undated) = date_records(raw)?;
    let partitions = partition_records(&records, &config.windows);
    Ok(PartitionSet {
        records,
        partitions,
        undated,
    })
}

/// Assign dated records to every window that strictly contains them
pub fn partition_records(records: &[DatedRecord], windows: &[PeriodWindow]) -> Vec<Partition> {
    windows
        .iter()
        .map(|window| Partition {
            period: window.period,
            record_indices: records
                .iter()
                .enumerate()
                .filter(|(_, r)| window.contains(&r.timestamp))
                .map(|(i, _)| i)
                .collect(),
        })
        .collect()
}

/// Execute Stage 1: Splitting
///
/// Parses the dates of the cleaned table at `input`, writes one CSV per
/// configured window into `output_dir` and prints each partition's row count
/// to stdout.
pub fn execute_split(input: &Path, output_dir: &Path, config: &SplitConfig) -> Result<SplitResult> {
    info!("Loading cleaned reviews from {:?}", input);
    let raw = read_reviews_file(input)?;
    let rows_read = raw.len();

    let set = split_records(raw, config)?;

    let mut counts = HashMap::new();
    let mut outputs = Vec::with_capacity(set.partitions.len());
    for partition in &set.partitions {
        let path = output_dir.join(partition.period.file_name());
        let rows: Vec<&DatedRecord> = set.records_in(partition).collect();
        write_partition_file(&path, &rows)?;

        println!("{} rows of {} reviews", partition.len(), partition.period);
        info!("Wrote {} {} rows to {:?}", partition.len(), partition.period, path);

        *counts.entry(partition.period).or_insert(0) += partition.len();
        outputs.push((partition.period, path));
    }

    let rows_unassigned = set.outside_windows() + set.undated;
    if rows_unassigned > 0 {
        warn!("{} rows fall outside every period", rows_unassigned);
    }

    Ok(SplitResult {
        rows_read,
        counts,
        outputs,
        rows_unassigned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_reviews;

    fn raw(date: &str, text: &str) -> RawRecord {
        RawRecord::from_cells(Some(date), Some(text), Some("4"))
    }

    #[test]
    fn test_split_assigns_periods() {
        let rows = vec![
            raw("June 5, 2018", "pre"),
            raw("2020-03-01", "boundary"),
            raw("Apr 2020", "pandemic"),
            raw("May 2023", "post"),
            raw("2013-06-01", "too early"),
            raw("2022-01-01", "boundary"),
        ];

        let set = split_records(rows, &SplitConfig::default()).unwrap();

        assert_eq!(set.count(Period::PrePandemic), 1);
        assert_eq!(set.count(Period::Pandemic), 1);
        assert_eq!(set.count(Period::PostPandemic), 1);
        assert_eq!(set.outside_windows(), 3);

        let pandemic = &set.partitions[1];
        let texts: Vec<&str> = set
            .records_in(pandemic)
            .map(|r| r.record.review_text.as_str())
            .collect();
        assert_eq!(texts, vec!["pandemic"]);
    }

    #[test]
    fn test_partition_counts_never_exceed_input() {
        let rows: Vec<RawRecord> = [
            "2014-01-01",
            "2014-01-02",
            "2019-12-31",
            "2020-03-01",
            "2020-03-02",
            "2021-12-31",
            "2022-01-01",
            "2022-01-02",
        ]
        .iter()
        .map(|d| raw(d, "x"))
        .collect();
        let total = rows.len();

        let set = split_records(rows, &SplitConfig::default()).unwrap();
        let assigned: usize = set.partitions.iter().map(Partition::len).sum();

        assert!(assigned <= total);
        assert_eq!(assigned, 5);
        assert_eq!(assigned + set.outside_windows(), total);
    }

    #[test]
    fn test_outside_windows_counts_each_row_once() {
        let mut rows = Vec::new();
        for day in 1..=28 {
            rows.push(raw(&format!("2019-02-{:02}", day), "pre"));
            rows.push(raw(&format!("2010-02-{:02}", day), "early"));
        }
        rows.push(raw("2020-03-01", "boundary"));
        rows.push(raw("2021-06-15", "pandemic"));

        let set = split_records(rows, &SplitConfig::default()).unwrap();

        assert_eq!(set.count(Period::PrePandemic), 28);
        assert_eq!(set.count(Period::Pandemic), 1);
        assert_eq!(set.outside_windows(), 29);
    }

    #[test]
    fn test_overlapping_windows_count_row_as_assigned() {
        let mut windows = PeriodWindow::defaults();
        windows.push(PeriodWindow::new(Period::PostPandemic, None, None));
        let config = SplitConfig { windows };

        let rows = vec![raw("2019-05-01", "a"), raw("2010-05-01", "b")];
        let set = split_records(rows, &config).unwrap();

        // The catch-all window takes every row, so nothing is left over
        assert_eq!(set.outside_windows(), 0);
        assert_eq!(set.count(Period::PostPandemic), 2);
    }

    #[test]
    fn test_unparseable_date_aborts() {
        let rows = vec![raw("2019-01-01", "ok"), raw("3 d 2023", "bad")];
        let err = split_records(rows, &SplitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ReviewError::UnparseableDate {
                row: 1,
                value: "3 d 2023".to_string()
            }
        );
    }

    #[test]
    fn test_missing_date_is_unassigned() {
        let rows = vec![RawRecord::from_cells(None, Some("x"), Some("1")), raw("2019-01-01", "ok")];
        let set = split_records(rows, &SplitConfig::default()).unwrap();
        assert_eq!(set.undated, 1);
        assert_eq!(set.records.len(), 1);
        // Positions refer to the cleaned table, including the skipped row
        assert_eq!(set.records[0].position, 1);
    }

    #[test]
    fn test_execute_split_writes_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("final.csv");
        let out_dir = dir.path().join("periods");
        std::fs::write(
            &input,
            "date,review_text,rating\n\
             \"June 5, 2018\",Early,5.0\n\
             \"March 2, 2021\",\"Masked, distanced\",3.0\n\
             May 2023,Recent,4.0\n\
             2020-03-01,On the line,2.0\n",
        )
        .unwrap();

        let result = execute_split(&input, &out_dir, &SplitConfig::default()).unwrap();

        assert_eq!(result.rows_read, 4);
        assert_eq!(result.counts[&Period::PrePandemic], 1);
        assert_eq!(result.counts[&Period::Pandemic], 1);
        assert_eq!(result.counts[&Period::PostPandemic], 1);
        assert_eq!(result.rows_unassigned, 1);

        let covid = std::fs::read_to_string(out_dir.join("covid.csv")).unwrap();
        assert_eq!(
            covid,
            ",date,review_text,rating\n1,2021-03-02,\"Masked, distanced\",3.0\n"
        );

        let post = std::fs::read_to_string(out_dir.join("postcovid.csv")).unwrap();
        assert_eq!(post, ",date,review_text,rating\n2,2023-05-01,Recent,4.0\n");

        // Files hold nothing but rows from the input
        for (_, path) in &result.outputs {
            let text = std::fs::read_to_string(path).unwrap();
            assert!(!text.contains("On the line"));
        }
    }

    #[test]
    fn test_partition_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("final.csv");
        std::fs::write(&input, "date,review_text,rating\n2019-07-04,Fireworks,5\n").unwrap();

        execute_split(&input, dir.path(), &SplitConfig::default()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("precovid.csv")).unwrap();
        let reread = read_reviews(text.as_bytes()).unwrap();
        assert_eq!(reread[0].date.as_deref(), Some("2019-07-04"));
    }
}
