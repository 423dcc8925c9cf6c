//! Civil-time deadline resolution.
//!
//! A deadline is a calendar date plus a fixed wall-clock time, interpreted in a
//! named IANA zone, then shifted by a grace period. The shift is applied to the
//! absolute instant after the zone has been resolved, never to wall-clock
//! fields, so a daylight-saving change near the deadline cannot move it.

use crate::error::{Result, RewindError};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone,
};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";
pub const DEFAULT_DEADLINE_TIME: &str = "23:59";
pub const DEFAULT_GRACE_MINUTES: i64 = 5;

/// Layout accepted by `git rev-list --before`.
const QUERY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DISPLAY_FORMAT: &str = "%a, %b %d, %Y %I:%M %p %Z";

fn mdy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"))
}

fn ymd_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid regex"))
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// An absolute deadline instant, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    date: NaiveDate,
    grace_minutes: i64,
    instant: DateTime<Tz>,
}

impl Deadline {
    /// The calendar date the deadline was requested for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn grace_minutes(&self) -> i64 {
        self.grace_minutes
    }

    /// The adjusted instant, grace included, expressed in the civil zone.
    pub fn instant(&self) -> DateTime<Tz> {
        self.instant
    }

    pub fn fixed_offset(&self) -> DateTime<FixedOffset> {
        self.instant.fixed_offset()
    }
}

// ---------------------------------------------------------------------------
// DeadlineResolver
// ---------------------------------------------------------------------------

/// Turns date text into [`Deadline`]s and formats instants back into the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineResolver {
    timezone: Tz,
    time: NaiveTime,
}

impl Default for DeadlineResolver {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Chicago,
            time: NaiveTime::from_hms_opt(23, 59, 0).expect("23:59 is a valid time"),
        }
    }
}

impl DeadlineResolver {
    pub fn new(timezone: Tz, time: NaiveTime) -> Self {
        Self { timezone, time }
    }

    /// Build a resolver from an IANA zone name and an `HH:MM` wall-clock time.
    pub fn from_names(timezone: &str, time: &str) -> Result<Self> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| RewindError::UnknownTimezone(timezone.to_string()))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| RewindError::InvalidDeadlineTime(time.to_string()))?;
        Ok(Self::new(tz, time))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Resolve `date` (`MM/DD/YYYY` or `YYYY-MM-DD`) to the deadline instant.
    ///
    /// The wall-clock time is placed in the zone first; an ambiguous local time
    /// takes the earlier instant and a skipped one is an error. Only then is the
    /// grace added, as a duration on the instant.
    pub fn resolve(&self, date: &str, grace_minutes: i64) -> Result<Deadline> {
        let date = parse_date(date)?;
        let local = date.and_time(self.time);

        let base = match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                return Err(RewindError::NonexistentLocalTime {
                    date: date.to_string(),
                    time: self.time.format("%H:%M").to_string(),
                    timezone: self.timezone.name().to_string(),
                })
            }
        };

        let instant = TimeDelta::try_minutes(grace_minutes)
            .and_then(|grace| base.checked_add_signed(grace))
            .ok_or(RewindError::GraceOutOfRange(grace_minutes))?;

        Ok(Deadline {
            date,
            grace_minutes,
            instant,
        })
    }

    /// Render an instant in the civil zone, e.g.
    /// `Wed, Sep 10, 2025 11:59 PM CDT (UTC-05:00)`.
    pub fn format_for_display<T: TimeZone>(&self, instant: &DateTime<T>) -> String {
        let local = instant.with_timezone(&self.timezone);
        format!(
            "{} ({})",
            local.format(DISPLAY_FORMAT),
            format_utc_offset(local.offset().fix())
        )
    }

    /// Render an instant as `YYYY-MM-DD HH:MM:SS ±HHMM` in the civil zone.
    pub fn format_for_query<T: TimeZone>(&self, instant: &DateTime<T>) -> String {
        instant
            .with_timezone(&self.timezone)
            .format(QUERY_FORMAT)
            .to_string()
    }
}

/// Parse date text in either accepted layout.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let malformed = || RewindError::MalformedDate(text.to_string());

    let (year, month, day) = if let Some(caps) = mdy_regex().captures(text) {
        (caps[3].to_string(), caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = ymd_regex().captures(text) {
        (caps[1].to_string(), caps[2].to_string(), caps[3].to_string())
    } else {
        return Err(malformed());
    };

    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| RewindError::InvalidCalendarDate(text.to_string()))
}

/// Parse a strict ISO-8601 timestamp as printed by `git show --format=%cI`.
pub fn parse_commit_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map_err(|_| RewindError::MalformedTimestamp(text.to_string()))
}

fn format_utc_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds >= 0 { '+' } else { '-' };
    let total = seconds.unsigned_abs();
    format!("UTC{sign}{:02}:{:02}", total / 3600, (total % 3600) / 60)
}
