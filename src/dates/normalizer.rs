use once_cell::sync::Lazy;
use regex::Regex;

/// Year appended to dates that lost theirs
pub const DEFAULT_FALLBACK_YEAR: i32 = 2023;

/// Number of leading characters kept from a date without a year
const PREFIX_CHARS: usize = 3;

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\n?$").unwrap());

/// Whether the string already ends in a four-digit year, allowing one
/// trailing newline after it
pub fn has_trailing_year(raw: &str) -> bool {
    TRAILING_YEAR.is_match(raw)
}

/// Normalize a raw date string, assuming 2023 for dates without a year
pub fn normalize_date(raw: &str) -> String {
    normalize_date_with_year(raw, DEFAULT_FALLBACK_YEAR)
}

/// Normalize a raw date string.
///
/// Strings ending in four digits are returned unchanged. Anything else is
/// cut to its first three characters (a truncated month such as `"May"`)
/// and `fallback_year` is appended. The result is not checked against the
/// calendar; bad dates fail later when parsed.
pub fn normalize_date_with_year(raw: &str, fallback_year: i32) -> String {
    if has_trailing_year(raw) {
        return raw.to_string();
    }

    let prefix: String = raw.chars().take(PREFIX_CHARS).collect();
    format!("{} {}", prefix, fallback_year)
}
