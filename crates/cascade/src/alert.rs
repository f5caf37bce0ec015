//! Notification sinks for lookup failures.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::render::html_escape;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
        }
    }
}

pub trait AlertSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
    pub raised_at: Instant,
}

impl Alert {
    pub fn to_html(&self) -> String {
        let class = match self.severity {
            Severity::Error => "alert-danger",
            Severity::Info => "alert-info",
        };
        format!(
            "<div class=\"alert {class} alert-dismissible fade show\" role=\"alert\">{}\
<button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\"></button></div>",
            html_escape(&self.message)
        )
    }
}

/// Logs every alert and holds the latest one only. A new alert replaces the shown one; an alert
/// disappears once `dismiss_after` has elapsed.
pub struct AlertContainer {
    current: Mutex<Option<Alert>>,
    dismiss_after: Duration,
}

impl Default for AlertContainer {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl AlertContainer {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            dismiss_after,
        }
    }

    pub fn raise(&self, message: &str, severity: Severity, now: Instant) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Alert {
            message: message.to_string(),
            severity,
            raised_at: now,
        });
    }

    pub fn current(&self, now: Instant) -> Option<Alert> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = current
            .as_ref()
            .is_some_and(|alert| now.duration_since(alert.raised_at) >= self.dismiss_after);
        if expired {
            *current = None;
        }
        current.clone()
    }
}

impl AlertSink for AlertContainer {
    fn notify(&self, message: &str, severity: Severity) {
        let tag = severity.to_string().to_ascii_uppercase();
        match severity {
            Severity::Info => tracing::info!("{tag}: {message}"),
            Severity::Error => tracing::error!("{tag}: {message}"),
        }
        self.raise(message, severity, Instant::now());
    }
}
