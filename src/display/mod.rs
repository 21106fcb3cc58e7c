use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use owo_colors::OwoColorize;

use crate::types::{Priority, TicketStatus};

pub mod dashboard;
pub mod tickets;

pub use dashboard::*;
pub use tickets::*;

/// Shown when a ticket has no timestamp
pub const UNKNOWN_DATE: &str = "Unknown";

/// Shown when a timestamp cannot be parsed
pub const INVALID_DATE: &str = "Invalid date";

pub fn format_status_colored(status: &TicketStatus) -> String {
    format_status_colored_with_format(status, |s| format!("[{}]", s))
}

pub fn format_status_colored_with_format<F>(status: &TicketStatus, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(&status.to_string());
    match status {
        TicketStatus::New => badge.yellow().to_string(),
        TicketStatus::Open => badge.cyan().to_string(),
        TicketStatus::Closed => badge.green().to_string(),
        TicketStatus::Unknown(_) => badge.magenta().to_string(),
    }
}

pub fn format_priority_colored(priority: &Priority) -> String {
    let label = priority.to_string();
    match priority {
        Priority::Critical => label.red().bold().to_string(),
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.green().to_string(),
        Priority::Unknown(_) => label.dimmed().to_string(),
    }
}

/// Render a backend timestamp for display.
///
/// Accepts RFC 3339 instants (shown in UTC), civil datetimes and bare dates.
pub fn format_instant(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return ts.strftime("%Y-%m-%d %H:%M UTC").to_string();
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return dt.strftime("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = raw.parse::<Date>() {
        return date.strftime("%Y-%m-%d").to_string();
    }

    INVALID_DATE.to_string()
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`
pub fn format_bar(value: usize, max: usize, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        (value * width).div_ceil(max).min(width)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
