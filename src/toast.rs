//! Toast notifications
//!
//! Short, non-fatal messages raised by panel operations (a transition that
//! succeeded or failed) and printed once by the terminal front end.

use std::fmt;
use std::time::Instant;

use owo_colors::OwoColorize;

/// A toast notification message
#[derive(Debug, Clone)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
    /// When the toast was created
    pub timestamp: Instant,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl ToastLevel {
    fn label(&self) -> &'static str {
        match self {
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
            ToastLevel::Success => "ok",
        }
    }
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }

    /// The toast as one colored terminal line
    pub fn render(&self) -> String {
        let tag = format!("[{}]", self.level.label());
        let tag = match self.level {
            ToastLevel::Info => tag.cyan().to_string(),
            ToastLevel::Warning => tag.yellow().to_string(),
            ToastLevel::Error => tag.red().to_string(),
            ToastLevel::Success => tag.green().to_string(),
        };
        format!("{} {}", tag, self.message)
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}
