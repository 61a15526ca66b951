//! Internal helpers for input validation and normalization.
//!
//! These utilities centralize the rules shared by the HTTP layer and the
//! store operations so both reject the same inputs with the same messages.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

const MIN_PASSWORD_LEN: usize = 6;

#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp (the date
/// part is kept, no time-of-day semantics).
pub fn parse_date(value: &str, label: &str) -> ResultEngine<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| EngineError::Validation(format!("invalid {label}: {trimmed}")))
}

/// Parse an optional date, treating blank strings as absent.
pub fn parse_optional_date(value: Option<&str>, label: &str) -> ResultEngine<Option<NaiveDate>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(raw, label).map(Some),
        None => Ok(None),
    }
}

/// Parse a UUID from storage or a path segment.
///
/// Malformed ids cannot match any record, so they are reported as not found.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::NotFound(format!("{label} not found")))
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns `true` for strings shaped like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub(crate) fn validate_email(value: &str) -> ResultEngine<()> {
    if !is_valid_email(value) {
        return Err(EngineError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Escape `%`, `_` and the escape character itself for a `LIKE … ESCAPE '\'`
/// pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
