use chrono::{NaiveDate, NaiveDateTime};

/// Calendar periods the cleaned dataset is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Between 2014-01-01 and 2020-03-01
    PrePandemic,
    /// Between 2020-03-01 and 2022-01-01
    Pandemic,
    /// After 2022-01-01
    PostPandemic,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::PrePandemic, Period::Pandemic, Period::PostPandemic];

    /// Label used when reporting counts
    pub fn label(&self) -> &'static str {
        match self {
            Period::PrePandemic => "pre-pandemic",
            Period::Pandemic => "pandemic",
            Period::PostPandemic => "post-pandemic",
        }
    }

    /// Output file name for this period's partition
    pub fn file_name(&self) -> &'static str {
        match self {
            Period::PrePandemic => "precovid.csv",
            Period::Pandemic => "covid.csv",
            Period::PostPandemic => "postcovid.csv",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An open interval of time assigned to a period. Both bounds are exclusive;
/// a missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub period: Period,
    /// Exclusive lower bound
    pub after: Option<NaiveDateTime>,
    /// Exclusive upper bound
    pub before: Option<NaiveDateTime>,
}

impl PeriodWindow {
    pub fn new(period: Period, after: Option<NaiveDateTime>, before: Option<NaiveDateTime>) -> Self {
        Self {
            period,
            after,
            before,
        }
    }

    /// Check whether a timestamp lies strictly inside this window
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.after.is_none_or(|after| *timestamp > after)
            && self.before.is_none_or(|before| *timestamp < before)
    }

    /// The three default windows, bounded at midnight of their boundary days
    pub fn defaults() -> Vec<PeriodWindow> {
        let start = midnight(2014, 1, 1);
        let outbreak = midnight(2020, 3, 1);
        let reopening = midnight(2022, 1, 1);
        vec![
            PeriodWindow::new(Period::PrePandemic, start, outbreak),
            PeriodWindow::new(Period::Pandemic, outbreak, reopening),
            PeriodWindow::new(Period::PostPandemic, reopening, None),
        ]
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}
