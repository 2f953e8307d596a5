//! Utility functions for dates, text cleanup and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Publication date parsing and normalization across provider formats
//! - HTML-to-text and byline cleanup for adapter output
//! - String truncation for logging
//! - File system validation for the persistence directory

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static BYLINE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*by\s+").unwrap());

/// A publication date as found in a provider payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    /// A full timestamp, kept in the offset the provider wrote it in.
    Timestamp(DateTime<FixedOffset>),
    /// A date without a time.
    Day(NaiveDate),
}

impl Published {
    /// Parse the date formats the providers emit.
    ///
    /// Accepted inputs:
    /// - RFC 3339 (`2024-05-01T12:00:00Z`, `2024-05-01T05:00:00-04:00`)
    /// - Offsets without a colon (`2024-05-01T12:00:00+0000`)
    /// - Timestamps without an offset, read as UTC (`2024-05-01T12:00:00`)
    /// - Date-only values (`2024-05-01`)
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Published::Timestamp(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(Published::Timestamp(dt));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Published::Timestamp(naive.and_utc().fixed_offset()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Published::Day)
    }

    /// The calendar day in the timestamp's own offset.
    pub fn day(&self) -> NaiveDate {
        match self {
            Published::Timestamp(dt) => dt.date_naive(),
            Published::Day(day) => *day,
        }
    }

    /// Render as RFC 3339 for timestamps and `YYYY-MM-DD` for days.
    pub fn to_iso(&self) -> String {
        match self {
            Published::Timestamp(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
            Published::Day(day) => day.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Normalize a provider date string, or `None` if it cannot be parsed.
pub fn normalize_published_at(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match Published::parse(raw) {
        Some(published) => Some(published.to_iso()),
        None => {
            tracing::warn!(raw, "Unparseable publication date; dropping it");
            None
        }
    }
}

/// Calendar day of a normalized `published_at` value.
pub fn calendar_day(published_at: &str) -> Option<NaiveDate> {
    Published::parse(published_at).map(|p| p.day())
}

/// Treat empty and whitespace-only strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Reduce an HTML fragment to its text with whitespace collapsed.
///
/// Guardian trail text and some NewsAPI descriptions carry inline markup
/// (`<strong>`, `<a>`) and entities. Input without a `<` or `&` is
/// returned trimmed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(html_to_text("<strong>Hi</strong> &amp; bye"), "Hi & bye");
/// ```
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.trim().to_string();
    }
    let html = Html::parse_fragment(fragment);
    let text: String = html.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a leading `By ` from a byline.
pub fn strip_byline_prefix(byline: &str) -> String {
    BYLINE_PREFIX.replace(byline, "").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
