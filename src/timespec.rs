//! Parsing of TIME arguments into absolute UTC targets.
//!
//! A TIME is either a duration (`90`, `1h 5m 30s`) counted from now, or a point
//! in time (`12:00`, `3pm`, `2027-01-01`, `Jan 5 2027 14:00`,
//! `2027-01-01 14:00 UTC`). Naive times are interpreted in the local timezone.
//! Everything is normalized to UTC so that pause compensation and remaining-time
//! arithmetic stay correct across DST changes; conversion back to local time only
//! happens in [`format_target`].

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, Duration as ChronoDuration, FixedOffset, Local, NaiveDate, NaiveDateTime,
    NaiveTime, TimeZone, Utc,
};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ParseError;

const HOURS_PER_YEAR: u64 = 8766;
const HOURS_PER_DAY: u64 = 24;

/// Date formats that carry a year, tried before the yearless ones.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d.%m.%Y",
];

/// Yearless date formats; the current local year is prepended before parsing.
const YEARLESS_DATE_FORMATS: [&str; 3] = ["%Y %m/%d", "%Y %B %d", "%Y %d %B"];

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<years>\d+)y ?)?(?:(?P<days>\d+)d ?)?(?:(?P<hours>\d+)h ?)?(?:(?P<minutes>\d+)m ?)?(?:(?P<seconds>\d+)s ?)?",
        )
        .expect("duration regex is valid")
    })
}

fn date_component_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\d{4}|jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|\d{1,2}[/\-]\d{1,2}")
            .expect("date component regex is valid")
    })
}

fn clock_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?(?::(?P<second>\d{2})(?:\.(?P<fraction>\d{1,9}))?)?\s*(?P<meridiem>[ap])?(?:\.?m\.?)?$",
        )
        .expect("clock time regex is valid")
    })
}

fn zone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?P<body>.*?\d)\s*(?P<zone>utc|gmt|z|[+-]\d{2}:?\d{2})$")
            .expect("zone regex is valid")
    })
}

/// Parse a duration such as `1y 2d 3h 4m 5s` into seconds.
///
/// Components must appear in that order and are each optional. Text after the
/// last recognized component is ignored. Returns `None` when no component at all
/// is present at the start of `text`.
pub fn parse_duration(text: &str) -> Option<u64> {
    let captures = duration_regex().captures(text)?;
    let component = |name: &str| -> Option<Option<u64>> {
        match captures.name(name) {
            Some(m) => m.as_str().parse::<u64>().ok().map(Some),
            None => Some(None),
        }
    };

    let years = component("years")?;
    let days = component("days")?;
    let hours = component("hours")?;
    let minutes = component("minutes")?;
    let seconds = component("seconds")?;

    if [years, days, hours, minutes, seconds]
        .iter()
        .all(Option::is_none)
    {
        return None;
    }

    let total_hours = hours
        .unwrap_or(0)
        .checked_add(days.unwrap_or(0).checked_mul(HOURS_PER_DAY)?)?
        .checked_add(years.unwrap_or(0).checked_mul(HOURS_PER_YEAR)?)?;
    total_hours
        .checked_mul(3600)?
        .checked_add(minutes.unwrap_or(0).checked_mul(60)?)?
        .checked_add(seconds.unwrap_or(0))
}

/// Resolve a TIME argument to an absolute instant relative to `now`.
///
/// Precedence: a non-zero duration, then a plain number of seconds, then a
/// date/time expression. A date/time that is already past and names no date
/// (`09:00` at noon) is taken to mean the same time tomorrow.
pub fn parse_target(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ParseError> {
    if let Some(seconds) = parse_duration(text).filter(|s| *s > 0) {
        return add_seconds(now, seconds).ok_or_else(|| ParseError::new(text));
    }

    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse::<u64>()
            .ok()
            .and_then(|seconds| add_seconds(now, seconds))
            .ok_or_else(|| ParseError::new(text));
    }

    let target = parse_datetime(text, now).ok_or_else(|| ParseError::new(text))?;
    if target <= now && !has_date_component(text) {
        return Ok(target + ChronoDuration::days(1));
    }
    Ok(target)
}

/// Whether `text` mentions a year, a month name or a day/month pair.
pub fn has_date_component(text: &str) -> bool {
    date_component_regex().is_match(text)
}

fn add_seconds(now: DateTime<Utc>, seconds: u64) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(seconds).ok()?;
    now.checked_add_signed(ChronoDuration::try_seconds(seconds)?)
}

fn parse_datetime(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let cleaned = text.replace(',', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let (body, zone) = split_zone(&cleaned);

    let today = now.with_timezone(&Local).date_naive();
    let naive = parse_naive(body, today)?;
    match zone {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => localize(naive),
    }
}

/// Split a trailing timezone designator off `text`.
fn split_zone(text: &str) -> (&str, Option<FixedOffset>) {
    let Some(captures) = zone_regex().captures(text) else {
        return (text, None);
    };
    let (Some(body), Some(zone)) = (captures.name("body"), captures.name("zone")) else {
        return (text, None);
    };
    let zone = zone.as_str();

    let offset = match zone.to_ascii_lowercase().as_str() {
        "utc" | "gmt" | "z" => FixedOffset::east_opt(0),
        _ => {
            // Numeric offsets only count after a time of day, not inside a date.
            if !body.as_str().contains(':') {
                return (text, None);
            }
            parse_numeric_offset(zone)
        }
    };
    match offset {
        Some(offset) => (body.as_str(), Some(offset)),
        None => (text, None),
    }
}

fn parse_numeric_offset(zone: &str) -> Option<FixedOffset> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_naive(body: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    if let Some(time) = parse_clock_time(body) {
        return Some(today.and_time(time));
    }

    for format in DATE_FORMATS {
        if let Some(datetime) = parse_date_then_time(body, format) {
            return Some(datetime);
        }
    }

    let with_year = format!("{} {}", today.year(), body);
    for format in YEARLESS_DATE_FORMATS {
        if let Some(datetime) = parse_date_then_time(&with_year, format) {
            return Some(datetime);
        }
    }
    None
}

fn parse_date_then_time(text: &str, format: &str) -> Option<NaiveDateTime> {
    let (date, rest) = NaiveDate::parse_and_remainder(text, format).ok()?;
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix('T')
        .or_else(|| rest.strip_prefix('t'))
        .unwrap_or(rest)
        .trim_start();
    if rest.is_empty() {
        return date.and_hms_opt(0, 0, 0);
    }
    parse_clock_time(rest).map(|time| date.and_time(time))
}

/// Parse `14:30`, `14:30:15`, `2:30pm`, `3 pm` and `11:00:00.250`.
///
/// A bare hour is only accepted together with am/pm, so that plain numbers stay
/// second counts.
fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let captures = clock_time_regex().captures(text.trim())?;
    let mut hour: u32 = captures.name("hour")?.as_str().parse().ok()?;
    let minute = captures.name("minute");
    let meridiem = captures.name("meridiem");
    if minute.is_none() && meridiem.is_none() {
        return None;
    }
    let minute: u32 = minute.map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = captures
        .name("second")
        .map_or(Some(0), |m| m.as_str().parse().ok())?;
    let nanos: u32 = match captures.name("fraction") {
        Some(m) => format!("{:0<9}", m.as_str()).parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = meridiem {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

/// Interpret a naive datetime in the local timezone.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant; times
/// skipped by a DST jump move forward by an hour.
fn localize(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + ChronoDuration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether `format` is a usable strftime string.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a countdown target in local time.
///
/// The date is only included when the target falls on a different local day
/// than `now`.
pub fn format_target(
    target: DateTime<Utc>,
    now: DateTime<Utc>,
    time_format: &str,
    date_format: &str,
) -> String {
    let local = target.with_timezone(&Local);
    let today = now.with_timezone(&Local).date_naive();
    if local.date_naive() != today {
        local
            .format(&format!("{} {}", date_format, time_format))
            .to_string()
    } else {
        local.format(time_format).to_string()
    }
}

/// A validated TIME argument that can be resolved again on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSpec {
    text: String,
}

impl TimeSpec {
    /// Validate `text` by resolving it once against `now`.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Result<Self, ParseError> {
        let text = text.into();
        parse_target(&text, now)?;
        Ok(TimeSpec { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compute the target instant relative to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ParseError> {
        parse_target(&self.text, now)
    }
}
