//! Last-access time windows.
//!
//! Bounds accept:
//! - RFC 3339 timestamps: `2024-01-15T10:30:00Z` (their own offset wins)
//! - Local timestamps: `2024-01-15T10:30:00` or `2024-01-15 10:30:00`
//! - Dates: `2024-01-15`
//! - Relative offsets from the evaluation time: `-12h`, `-30d`, `-2w`
//!
//! Local timestamps and dates are read in the selector's `timezone`
//! (`UTC`, `Z` or `±HH:MM`, UTC when absent). A date used as `to` covers
//! the whole day.

use bucketsweep_core::{Error, Result, StorageObject};
use bucketsweep_policy::{LastAccess, Policy};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::compiler::field_path;
use crate::filter::Predicate;

/// Half-open window `[from, to)` over an object's last access time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Build a window; at least one bound is required and `from < to`
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> std::result::Result<Self, String> {
        match (from, to) {
            (None, None) => Err("a window needs at least one of 'from' or 'to'".to_string()),
            (Some(f), Some(t)) if f >= t => Err(format!(
                "'from' ({}) must be before 'to' ({})",
                f.to_rfc3339(),
                t.to_rfc3339()
            )),
            _ => Ok(Self { from, to }),
        }
    }

    /// Inclusive lower bound
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    /// Exclusive upper bound
    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.to
    }

    /// Whether `time` falls inside the window
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| time >= from) && self.to.map_or(true, |to| time < to)
    }
}

impl Predicate for TimeWindow {
    fn matches(&self, object: &StorageObject) -> bool {
        // Unknown access time never qualifies for deletion
        object.last_modified.is_some_and(|t| self.contains(t))
    }
}

/// Compile the `lastAccess` field of every selector that sets one.
///
/// Relative bounds are resolved against `now`.
pub fn compile_time_windows(policy: &Policy, now: DateTime<Utc>) -> Result<Vec<TimeWindow>> {
    let mut windows = Vec::new();
    for (index, selector) in policy.selectors.iter().enumerate() {
        let Some(last_access) = &selector.last_access else {
            continue;
        };
        windows.push(compile_window(index, last_access, now)?);
    }
    Ok(windows)
}

fn compile_window(index: usize, window: &LastAccess, now: DateTime<Utc>) -> Result<TimeWindow> {
    let offset = parse_timezone(window.timezone.as_deref())
        .map_err(|e| Error::invalid_selector(field_path(index, "lastAccess.timezone"), e))?;

    let from = non_empty(window.from.as_deref())
        .map(|text| parse_bound(text, offset, Bound::Lower, now))
        .transpose()
        .map_err(|e| Error::invalid_selector(field_path(index, "lastAccess.from"), e))?;

    let to = non_empty(window.to.as_deref())
        .map(|text| parse_bound(text, offset, Bound::Upper, now))
        .transpose()
        .map_err(|e| Error::invalid_selector(field_path(index, "lastAccess.to"), e))?;

    TimeWindow::new(from, to)
        .map_err(|e| Error::invalid_selector(field_path(index, "lastAccess"), e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Parse `UTC`, `Z`, `GMT` or a fixed offset like `+02:00` / `-0530`
fn parse_timezone(timezone: Option<&str>) -> std::result::Result<FixedOffset, String> {
    let utc = FixedOffset::east_opt(0).ok_or_else(|| "invalid UTC offset".to_string())?;

    let Some(tz) = non_empty(timezone) else {
        return Ok(utc);
    };

    if ["utc", "z", "gmt"].iter().any(|name| tz.eq_ignore_ascii_case(name)) {
        return Ok(utc);
    }

    let unsupported = || {
        format!("unsupported timezone '{tz}': use UTC or a fixed offset such as +02:00")
    };

    let (sign, rest) = match tz.as_bytes().first() {
        Some(b'+') => (1, &tz[1..]),
        Some(b'-') => (-1, &tz[1..]),
        _ => return Err(unsupported()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| unsupported())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| unsupported())?;
    if minutes >= 60 {
        return Err(unsupported());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(unsupported)
}

fn parse_bound(
    text: &str,
    offset: FixedOffset,
    bound: Bound,
    now: DateTime<Utc>,
) -> std::result::Result<DateTime<Utc>, String> {
    if text.starts_with('-') {
        return parse_relative(text, now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return to_utc(naive, offset, text);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let day = match bound {
            Bound::Lower => date,
            Bound::Upper => date
                .succ_opt()
                .ok_or_else(|| format!("date out of range: {text}"))?,
        };
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("invalid date: {text}"))?;
        return to_utc(midnight, offset, text);
    }

    Err(format!(
        "invalid date '{text}': expected RFC 3339 (2024-01-15T10:30:00Z), \
         date (2024-01-15) or relative (-24h, -30d, -2w)"
    ))
}

fn to_utc(
    naive: NaiveDateTime,
    offset: FixedOffset,
    text: &str,
) -> std::result::Result<DateTime<Utc>, String> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("ambiguous local time: {text}"))
}

/// Parse `-24h`, `-30d` or `-2w` relative to `now`
fn parse_relative(text: &str, now: DateTime<Utc>) -> std::result::Result<DateTime<Utc>, String> {
    let body = text.trim_start_matches('-');
    let Some(unit) = body.chars().last() else {
        return Err("empty relative date".to_string());
    };

    let number = &body[..body.len() - unit.len_utf8()];
    let amount: i64 = number
        .parse()
        .map_err(|_| format!("invalid number in relative date: {text}"))?;

    let duration = match unit.to_ascii_lowercase() {
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => {
            return Err(format!(
                "invalid relative date unit in '{text}': use 'h', 'd' or 'w'"
            ))
        }
    }
    .ok_or_else(|| format!("relative date out of range: {text}"))?;

    now.checked_sub_signed(duration)
        .ok_or_else(|| format!("relative date out of range: {text}"))
}
