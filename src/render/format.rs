//! Formatting helpers shared by the table renderers.

use crossterm::style::Color;

/// CPU share at or above which a row is shown in red.
pub const CPU_THRESHOLD_CRITICAL: f64 = 80.0;
/// CPU share at or above which a row is shown in yellow.
pub const CPU_THRESHOLD_WARNING: f64 = 50.0;
/// CPU share at or above which a row is shown in cyan.
pub const CPU_THRESHOLD_MODERATE: f64 = 20.0;

/// Truncates a string to at most `max_len` characters.
///
/// Longer strings are cut and end in "..." when there is room for it.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Formats an uptime as `1d 02:03:04`, or `02:03:04` below one day.
#[must_use]
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if days > 0 {
        format!("{days}d {hours:02}:{mins:02}:{secs:02}")
    } else {
        format!("{hours:02}:{mins:02}:{secs:02}")
    }
}

/// Formats accumulated CPU ticks as `M:SS.hh`, like the TIME+ column of top.
#[must_use]
pub fn format_cpu_time(ticks: u64, clk_tck: u64) -> String {
    let clk_tck = clk_tck.max(1);
    let hundredths = ticks * 100 / clk_tck;
    let total_secs = hundredths / 100;
    format!(
        "{}:{:02}.{:02}",
        total_secs / 60,
        total_secs % 60,
        hundredths % 100
    )
}

/// KiB to whole MiB.
#[must_use]
pub fn kb_to_mb(kb: u64) -> u64 {
    kb / 1024
}

/// Returns a color based on CPU usage percentage.
///
/// * Red - Critical usage (>=80%)
/// * Yellow - Warning level (>=50%)
/// * Cyan - Moderate usage (>=20%)
/// * Green - Low usage (<20%)
#[must_use]
pub fn cpu_color(percent: f64) -> Color {
    if percent >= CPU_THRESHOLD_CRITICAL {
        Color::Red
    } else if percent >= CPU_THRESHOLD_WARNING {
        Color::Yellow
    } else if percent >= CPU_THRESHOLD_MODERATE {
        Color::Cyan
    } else {
        Color::Green
    }
}
