//! Formatting utilities for sizes, durations, and the build summary.

use owo_colors::OwoColorize;
use satchel_bundler::BuildStats;
use std::path::Path;
use std::time::Duration;

use super::colors_enabled;

/// Format a byte count with the largest fitting unit (B, KB, MB, GB).
///
/// # Examples
///
/// ```
/// use satchel_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, `s` or `m s`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use satchel_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One-line summary of a finished build, e.g.
/// `dist/bundle.js  3 modules, 1.20 KB in 12ms`.
fn summary_line(output: &Path, stats: &BuildStats) -> String {
    let modules = if stats.module_count == 1 {
        "1 module".to_string()
    } else {
        format!("{} modules", stats.module_count)
    };
    format!(
        "{}  {}, {} in {}",
        output.display(),
        modules,
        format_size(stats.bundle_size as u64),
        format_duration(stats.duration)
    )
}

/// Print the build summary to stderr.
pub fn print_build_summary(output: &Path, stats: &BuildStats) {
    let line = summary_line(output, stats);
    if colors_enabled() {
        eprintln!("  {} {}", "▸".blue(), line.bright_white());
    } else {
        eprintln!("  ▸ {line}");
    }
}
