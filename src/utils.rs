//! Text and date helpers used while turning search results into records.
//!
//! - Recency window checks (30 days per month, inclusive)
//! - Search phrase counting and money-mention detection
//! - Text sanitization for spreadsheet cells
//! - Parsing of the `datetime` attribute on result timestamps
//! - Output directory validation

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Months are approximated as a fixed number of days, not calendar months.
pub const DAYS_PER_MONTH: i64 = 30;

static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$[\d,]+(\.\d+)?|\b\d+\s+(dollars|usd)\b").expect("money pattern is valid")
});

static NOT_ALNUM_OR_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("sanitize pattern is valid"));

/// Check whether `article_date` falls in `[now - 30 * months days, now]`.
///
/// Both bounds are inclusive. A window too large to represent has no lower
/// bound.
///
/// # Examples
///
/// ```ignore
/// let now = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert!(is_within_months(now - TimeDelta::days(30), now, 1));
/// assert!(!is_within_months(now - TimeDelta::days(31), now, 1));
/// ```
pub fn is_within_months(article_date: NaiveDateTime, now: NaiveDateTime, months: u32) -> bool {
    if article_date > now {
        return false;
    }
    let earliest = TimeDelta::try_days(DAYS_PER_MONTH * i64::from(months))
        .and_then(|window| now.checked_sub_signed(window));
    match earliest {
        Some(earliest) => earliest <= article_date,
        None => true,
    }
}

/// Count non-overlapping, case-insensitive occurrences of `phrase`.
///
/// Title and description are counted separately and summed, so a match
/// never spans the two.
pub fn count_search_phrases(title: &str, description: &str, phrase: &str) -> usize {
    let phrase = phrase.to_lowercase();
    title.to_lowercase().matches(phrase.as_str()).count()
        + description.to_lowercase().matches(phrase.as_str()).count()
}

/// Detect a dollar amount (`$1,200.50`) or a number followed by
/// `dollars`/`USD` in either field.
pub fn contains_money(title: &str, description: &str) -> bool {
    MONEY_PATTERN.is_match(title) || MONEY_PATTERN.is_match(description)
}

/// Remove every character that is not an ASCII letter, a digit or whitespace.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("Apple's $100 deal!"), "Apples 100 deal");
/// ```
pub fn clean_text(text: &str) -> String {
    NOT_ALNUM_OR_SPACE.replace_all(text, "").into_owned()
}

/// Parse the `datetime` attribute of a result timestamp.
///
/// A single trailing `Z` is dropped and the rest is read as a naive UTC
/// date-time. Missing or blank values fall back to `now`.
pub fn parse_article_date(
    raw: Option<&str>,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(now),
    };
    let raw = raw.strip_suffix('Z').unwrap_or(raw);

    let mut last_err = None;
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => last_err = Some(e),
        }
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
        Err(e) => Err(last_err.unwrap_or(e)),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters and get an ellipsis plus the
/// number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and removes a
/// marker file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let marker_path = path.join("..__write_check__");
    match stdfs::File::create(&marker_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&marker_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
