//! User-facing notifications.
//!
//! Cart mutators and the checkout flow report what happened to a
//! [`NotificationSink`]. Delivery is fire-and-forget: a sink never fails and
//! never blocks the caller.

use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A human-readable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Destination for user-facing notifications.
pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Sink that writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::warn!(target: "campus::notify", kind = %notification.level, "{}", notification.message)
            }
            _ => {
                tracing::info!(target: "campus::notify", kind = %notification.level, "{}", notification.message)
            }
        }
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Sink that keeps every notification in memory.
///
/// Clones share the same buffer, so a view can hold one handle while the cart
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn entries(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.entries().pop()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        match self.entries.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
