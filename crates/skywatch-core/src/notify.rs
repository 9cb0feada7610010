//! Severe-weather notification delivery.
//!
//! Mirrors the browser notification flow: permission starts out undecided,
//! may be requested once, and deliveries only happen while it is granted.

use parking_lot::Mutex;
use thiserror::Error;

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPermission {
    /// User allowed notifications.
    Granted,
    /// User refused notifications; never ask again.
    Denied,
    /// User has not been asked yet.
    Undecided,
}

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Trait for notification sinks.
///
/// `LogNotifier` is the default sink; `MemoryNotifier` records deliveries
/// for tests. Desktop integrations can provide their own implementation.
pub trait Notifier: Send + Sync {
    /// Current permission state.
    fn permission(&self) -> NotifyPermission;

    /// Ask the user for permission.
    ///
    /// Returns the resulting state. Implementations must not prompt again
    /// once the state is `Denied`.
    fn request_permission(&self) -> NotifyPermission;

    /// Deliver a notification unconditionally.
    ///
    /// # Errors
    /// Returns `NotifyError::Delivery` if the sink rejected the message.
    fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError>;

    /// Deliver a notification if permission allows it, requesting permission
    /// first when the user has not decided yet.
    ///
    /// Returns `true` if the notification was delivered.
    fn notify_if_permitted(&self, summary: &str, body: &str) -> Result<bool, NotifyError> {
        match self.permission() {
            NotifyPermission::Granted => {
                self.notify(summary, body)?;
                Ok(true)
            }
            NotifyPermission::Undecided => {
                if self.request_permission() == NotifyPermission::Granted {
                    self.notify(summary, body)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            NotifyPermission::Denied => Ok(false),
        }
    }
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn permission(&self) -> NotifyPermission {
        NotifyPermission::Granted
    }

    fn request_permission(&self) -> NotifyPermission {
        NotifyPermission::Granted
    }

    fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!("Notification: {} - {}", summary, body);
        Ok(())
    }
}

/// A notification recorded by `MemoryNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub summary: String,
    pub body: String,
}

/// Notifier that records deliveries in memory.
#[derive(Debug)]
pub struct MemoryNotifier {
    permission: Mutex<NotifyPermission>,
    grant_on_request: bool,
    sent: Mutex<Vec<SentNotification>>,
}

impl MemoryNotifier {
    /// A notifier with permission already granted.
    pub fn new() -> Self {
        Self::with_permission(NotifyPermission::Granted, true)
    }

    /// A notifier starting in the given permission state.
    ///
    /// `grant_on_request` controls how `request_permission` resolves an
    /// `Undecided` state.
    pub fn with_permission(permission: NotifyPermission, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            grant_on_request,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Notifications delivered so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().clone()
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MemoryNotifier {
    fn permission(&self) -> NotifyPermission {
        *self.permission.lock()
    }

    fn request_permission(&self) -> NotifyPermission {
        let mut permission = self.permission.lock();
        if *permission == NotifyPermission::Undecided {
            *permission = if self.grant_on_request {
                NotifyPermission::Granted
            } else {
                NotifyPermission::Denied
            };
        }
        *permission
    }

    fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().push(SentNotification {
            summary: summary.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_granted_delivers() {
        let notifier = MemoryNotifier::new();
        let delivered = notifier.notify_if_permitted("Storm", "Thunderstorm ahead").unwrap();
        assert!(delivered);
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(notifier.sent()[0].summary, "Storm");
    }

    #[test]
    fn test_denied_swallows() {
        let notifier = MemoryNotifier::with_permission(NotifyPermission::Denied, true);
        let delivered = notifier.notify_if_permitted("Storm", "ignored").unwrap();
        assert!(!delivered);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_undecided_requests_then_delivers() {
        let notifier = MemoryNotifier::with_permission(NotifyPermission::Undecided, true);
        let delivered = notifier.notify_if_permitted("Storm", "body").unwrap();
        assert!(delivered);
        assert_eq!(notifier.permission(), NotifyPermission::Granted);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn test_undecided_request_refused() {
        let notifier = MemoryNotifier::with_permission(NotifyPermission::Undecided, false);
        let delivered = notifier.notify_if_permitted("Storm", "body").unwrap();
        assert!(!delivered);
        assert_eq!(notifier.permission(), NotifyPermission::Denied);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_denied_state_sticks_across_requests() {
        let notifier = MemoryNotifier::with_permission(NotifyPermission::Undecided, false);
        assert_eq!(notifier.request_permission(), NotifyPermission::Denied);
        assert_eq!(notifier.request_permission(), NotifyPermission::Denied);
    }

    #[test]
    fn test_log_notifier_always_granted() {
        let notifier = LogNotifier::new();
        assert_eq!(notifier.permission(), NotifyPermission::Granted);
        assert!(notifier.notify("Storm", "body").is_ok());
    }
}
