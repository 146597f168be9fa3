//! Human-readable formatting of second counts and end-of-countdown text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Length of a year in seconds (365.25 days).
pub const YEAR_SECONDS: i64 = 31_557_600;
pub const DAY_SECONDS: i64 = 86_400;
pub const HOUR_SECONDS: i64 = 3_600;
pub const MINUTE_SECONDS: i64 = 60;

const PERIODS: [(char, i64); 5] = [
    ('y', YEAR_SECONDS),
    ('d', DAY_SECONDS),
    ('h', HOUR_SECONDS),
    ('m', MINUTE_SECONDS),
    ('s', 1),
];

/// Letters that have a conventional two-letter ASCII spelling.
const TRANSLITERATIONS: [(char, &str); 7] = [
    ('ä', "ae"),
    ('Ä', "Ae"),
    ('ö', "oe"),
    ('Ö', "Oe"),
    ('ü', "ue"),
    ('Ü', "Ue"),
    ('ß', "ss"),
];

/// Format a number of seconds as `1h 5m 30s`.
///
/// Fractional seconds are rounded up so a countdown shows `1` until it is done.
/// Values up to a minute are printed as a bare number. Leading zero units are
/// omitted; with `hide_seconds` the trailing seconds unit is dropped.
pub fn format_seconds(seconds: f64, hide_seconds: bool) -> String {
    let seconds = seconds.ceil() as i64;
    if seconds <= 60 {
        return seconds.to_string();
    }

    let mut remaining = seconds;
    let mut parts = Vec::new();
    for (suffix, period) in PERIODS {
        if remaining >= period && !(hide_seconds && suffix == 's') {
            parts.push(format!("{}{}", remaining / period, suffix));
            remaining %= period;
        }
    }
    parts.join(" ")
}

/// Format a number of seconds as colon-separated fields (`00:01:30`).
///
/// At least hours, minutes and seconds are always shown. With `hide_seconds`
/// the seconds field is dropped once more than a minute is displayed.
pub fn format_seconds_alt(seconds: f64, hide_seconds: bool) -> String {
    let mut remaining = (seconds.ceil() as i64).max(0);
    let total = remaining;
    let mut output = String::new();

    for (_, period) in PERIODS {
        if hide_seconds && period == 1 && total > 60 {
            break;
        }
        let value = remaining / period;
        if value > 0 {
            output.push_str(&format!("{:02}:", value));
        } else if DAY_SECONDS > period || total > period {
            output.push_str("00:");
        }
        remaining %= period;
    }
    output.trim_end_matches(':').to_string()
}

/// Replace non-ASCII letters with close ASCII equivalents.
///
/// German umlauts and sharp s are transliterated, all other letters lose their
/// diacritics (`é` becomes `e`).
pub fn normalize_text(input: &str) -> String {
    let mut replaced = String::with_capacity(input.len());
    for c in input.chars() {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => replaced.push_str(to),
            None => replaced.push(c),
        }
    }
    replaced.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
