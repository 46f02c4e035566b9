use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Formats carrying a time of day
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Formats carrying a full calendar date
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Formats carrying only a month and year, read as the first of the month
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y"];

/// Parse a review date into a timestamp. Date-only values land on midnight.
pub fn parse_review_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    parse_calendar_date(value).map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    // Before the full-date formats: "%b %d %Y" would read "Apr 2023" as
    // day 20 of year 23
    let first_of_month = format!("1 {}", value);
    for format in MONTH_YEAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&first_of_month, format) {
            return Some(date);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_iso_dates() {
        assert_eq!(parse_review_date("2021-05-03"), Some(ymd(2021, 5, 3)));
        assert_eq!(parse_review_date("2021/05/03"), Some(ymd(2021, 5, 3)));
        assert_eq!(
            parse_review_date("2020-03-01 12:30:00"),
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap().and_hms_opt(12, 30, 0)
        );
    }

    #[test]
    fn test_parse_month_name_dates() {
        assert_eq!(parse_review_date("May 3, 2021"), Some(ymd(2021, 5, 3)));
        assert_eq!(parse_review_date("September 14, 2019"), Some(ymd(2019, 9, 14)));
        assert_eq!(parse_review_date("14 Sep 2019"), Some(ymd(2019, 9, 14)));
        assert_eq!(parse_review_date("05/03/2021"), Some(ymd(2021, 5, 3)));
        assert_eq!(parse_review_date("May 3 2021"), Some(ymd(2021, 5, 3)));
    }

    #[test]
    fn test_parse_month_and_year() {
        assert_eq!(parse_review_date("Apr 2023"), Some(ymd(2023, 4, 1)));
        assert_eq!(parse_review_date("April 2023"), Some(ymd(2023, 4, 1)));
        assert_eq!(parse_review_date(" May 2023 "), Some(ymd(2023, 5, 1)));
    }

    #[test]
    fn test_parse_year_only() {
        assert_eq!(parse_review_date("2019"), Some(ymd(2019, 1, 1)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_review_date(""), None);
        assert_eq!(parse_review_date("3 d 2023"), None);
        assert_eq!(parse_review_date("Feb 30, 2021"), None);
        assert_eq!(parse_review_date("yesterday"), None);
    }
}
