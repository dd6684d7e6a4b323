//! User-visible notifications.
//!
//! Every screen reports the outcome of an action through a single
//! `Notification`: a severity, a short title and a message.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Default title shown for this severity.
    pub fn title(self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Where a failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A form field or file was rejected before any I/O.
    Validation,
    /// The camera could not be acquired or stopped delivering frames.
    Device,
    /// The request failed or the backend refused it.
    Submission,
}

/// A user-visible alert.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: severity.title().to_string(),
            message: message.into(),
            raised_at: Local::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.raised_at.format("%H:%M:%S"),
            self.title,
            self.message
        )
    }
}
