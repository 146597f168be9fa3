//! Lap summary printed after a stopwatch run.

use crate::format::format_seconds;
use crate::modes::StopwatchReport;

fn line(seconds: f64, label: &str) -> String {
    format!(
        "{:.3}\t{}\t{}\n",
        seconds,
        format_seconds(seconds.trunc(), false),
        label
    )
}

/// One line per lap (including the final running one) followed by min, max,
/// average and total. Without laps only the total is reported.
pub fn format_report(report: &StopwatchReport) -> String {
    if report.laps.is_empty() {
        return line(report.elapsed, "total");
    }

    let mut out = String::new();
    let mut all = report.laps.clone();
    all.push(report.elapsed);
    for (index, lap) in all.iter().enumerate() {
        out.push_str(&line(*lap, &format!("lap {}", index + 1)));
    }

    let total: f64 = all.iter().sum();
    let min = all.iter().copied().fold(f64::INFINITY, f64::min);
    let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    out.push_str(&line(min, "lap min"));
    out.push_str(&line(max, "lap max"));
    out.push_str(&line(total / all.len() as f64, "lap avg"));
    out.push_str(&line(total, "total"));
    out
}
