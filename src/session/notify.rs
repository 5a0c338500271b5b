//! Collaborator interfaces for the presentation layer.
//!
//! The core never renders anything. It hands [`Notification`]s to a
//! [`Notifier`] and asks a [`Confirmer`] before destructive actions.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A user-visible, transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// How long the message should stay visible.
    pub duration_ms: u64,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            duration_ms,
        }
    }

    pub fn success(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new("Success", message, Severity::Success, duration_ms)
    }

    pub fn error(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new("Error", message, Severity::Error, duration_ms)
    }

    pub fn info(message: impl Into<String>, duration_ms: u64) -> Self {
        Self::new("Info", message, Severity::Info, duration_ms)
    }
}

/// Default display time for messages that do not specify one.
pub const DEFAULT_DURATION_MS: u64 = 5_000;

/// Fire-and-forget sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Yes/no prompt. The caller does not continue until it is answered.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}
