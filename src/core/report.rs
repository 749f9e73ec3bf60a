//! Delivery policy and per-round notification reports.

use crate::core::SubscriberId;
use crate::error::HubError;
use serde::Deserialize;

/// How a notification round reacts when an observer fails.
///
/// An observer fails when its `update` returns an error or panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Log the failure, record it in the [`NotifyReport`] and keep notifying
    /// the remaining observers.
    #[default]
    Isolate,
    /// Stop the round at the first failure and return
    /// [`HubError::SubscriberNotification`].
    FailFast,
}

/// A single observer failure recorded during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFailure {
    /// Id of the failing subscription
    pub id: SubscriberId,
    /// Diagnostic name of the observer
    pub observer: String,
    /// Error message or panic payload
    pub reason: String,
}

impl From<NotificationFailure> for HubError {
    fn from(failure: NotificationFailure) -> Self {
        HubError::SubscriberNotification {
            observer: failure.observer,
            id: failure.id,
            reason: failure.reason,
        }
    }
}

/// Outcome of one notification round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Number of observers whose `update` completed successfully
    pub delivered: usize,
    /// Failures isolated under [`DeliveryPolicy::Isolate`], in delivery order
    pub failures: Vec<NotificationFailure>,
}

impl NotifyReport {
    /// Number of observers that were called, successfully or not.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    /// True when every called observer succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
