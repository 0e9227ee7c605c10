//! Notification channel between the pipeline and whatever renders it.
//!
//! The core never prints. Progress, retry warnings and failures are handed
//! to a [`Notifier`] supplied by the caller.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A single message emitted during processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Sink for human-readable progress and failure messages.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Notifier that sends events over a channel for a renderer to consume.
///
/// Send failures are ignored: a dropped receiver means nobody is watching.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Create a notifier together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, severity: Severity, message: &str) {
        let _ = self.tx.send(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

impl Notifier for ChannelNotifier {
    fn info(&self, message: &str) {
        self.send(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.send(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.send(Severity::Error, message);
    }
}
