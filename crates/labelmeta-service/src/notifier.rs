//! Notification capability
//!
//! Services never talk to a UI directly. Anything the operator should see is
//! handed to an injected [`Notifier`], which is fire-and-forget.

use std::sync::Mutex;
use tracing::{error, info, warn};

/// User-facing notification sink
pub trait Notifier: Send + Sync {
    /// Informational message
    fn info(&self, message: &str);

    /// Error message; `persistent` asks the sink to keep it until dismissed
    fn error(&self, message: &str, persistent: bool);

    /// Dismiss whatever is currently shown
    fn dismiss(&self);
}

/// Notifier that routes every notice to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!(target: "labelmeta::notice", "{}", message);
    }

    fn error(&self, message: &str, persistent: bool) {
        if persistent {
            error!(target: "labelmeta::notice", persistent, "{}", message);
        } else {
            warn!(target: "labelmeta::notice", "{}", message);
        }
    }

    fn dismiss(&self) {}
}

/// A notice captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error { message: String, persistent: bool },
    Dismiss,
}

/// Notifier that keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// Recorded informational messages
    pub fn infos(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Info(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded error messages
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notice::Error { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        // a panic while holding the lock cannot leave the list half-written
        self.notices.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, notice: Notice) {
        self.lock().push(notice);
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.push(Notice::Info(message.to_string()));
    }

    fn error(&self, message: &str, persistent: bool) {
        self.push(Notice::Error {
            message: message.to_string(),
            persistent,
        });
    }

    fn dismiss(&self) {
        self.push(Notice::Dismiss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.info("loaded");
        notifier.error("broken", true);
        notifier.dismiss();

        assert_eq!(notifier.infos(), vec!["loaded".to_string()]);
        assert_eq!(notifier.errors(), vec!["broken".to_string()]);
        assert_eq!(notifier.notices().last(), Some(&Notice::Dismiss));
    }

    #[test]
    fn test_tracing_notifier_does_not_panic() {
        let notifier = TracingNotifier;
        notifier.info("info");
        notifier.error("transient", false);
        notifier.error("sticky", true);
        notifier.dismiss();
    }
}
