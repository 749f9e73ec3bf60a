//! The notification hub: observable state plus an ordered subscriber list.

use crate::core::subscription::Detach;
use crate::core::{
    DeliveryPolicy, FnObserver, NotificationFailure, NotifyReport, Observer, SubscriberId,
    Subscription,
};
use crate::error::{HubError, Result, ValidationError};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

#[cfg(feature = "metrics")]
use crate::metrics::HubMetrics;

/// Type alias for validator functions.
pub(crate) type Validator<T> =
    Arc<dyn Fn(&T) -> std::result::Result<(), ValidationError> + Send + Sync>;

type Entry<T> = (SubscriberId, Arc<dyn Observer<T>>);

struct SubscriberList<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

pub(crate) struct HubInner<T> {
    pub(crate) name: String,
    pub(crate) state: ArcSwap<T>,
    subscribers: RwLock<SubscriberList<T>>,
    pub(crate) policy: DeliveryPolicy,
    pub(crate) trace_deliveries: bool,
    pub(crate) validator: Option<Validator<T>>,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<HubMetrics>,
}

impl<T> HubInner<T> {
    pub(crate) fn new(name: String, initial: T) -> Self {
        Self {
            name,
            state: ArcSwap::new(Arc::new(initial)),
            subscribers: RwLock::new(SubscriberList {
                entries: Vec::new(),
                next_id: 0,
            }),
            policy: DeliveryPolicy::default(),
            trace_deliveries: false,
            validator: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    fn remove(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(sub_id, _)| *sub_id != id);
        let removed = subscribers.entries.len() != before;

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.update_subscriber_count(subscribers.entries.len());
        }

        removed
    }
}

impl<T: Send + Sync> Detach for HubInner<T> {
    fn detach(&self, id: SubscriberId) -> bool {
        self.remove(id)
    }
}

/// Observable state with synchronous, ordered change notification.
///
/// Every [`set_state`](Self::set_state) stores the new value and then calls
/// `update` on each attached observer, in attachment order, on the calling
/// thread. There is no equality check: storing an unchanged value still runs a
/// full round.
///
/// Clones share the same state and subscriber list.
///
/// # Examples
///
/// ```rust
/// use observer_hub::prelude::*;
/// use std::sync::Arc;
///
/// let hub = NotificationHub::new(0);
///
/// for name in ["observer1", "observer2", "observer3"] {
///     hub.attach_fn(name, move |hub: &NotificationHub<i32>| {
///         println!("{name} update, state: {}", hub.get_state());
///     });
/// }
///
/// let report = hub.set_state(1).unwrap();
/// assert_eq!(report.delivered, 3);
/// assert_eq!(*hub.get_state(), 1);
/// ```
pub struct NotificationHub<T> {
    pub(crate) inner: Arc<HubInner<T>>,
}

impl<T> NotificationHub<T> {
    /// Create a hub holding `initial`, with default settings and no observers.
    ///
    /// For a custom delivery policy, validation or metrics use
    /// [`NotificationHub::builder`].
    pub fn new(initial: T) -> Self {
        Self::from_inner(HubInner::new("hub".to_string(), initial))
    }

    pub(crate) fn from_inner(inner: HubInner<T>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The diagnostic name of this hub.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The failure policy applied to notification rounds.
    pub fn policy(&self) -> DeliveryPolicy {
        self.inner.policy
    }

    /// Get a reference-counted snapshot of the current state.
    ///
    /// Lock-free; never blocks writers or other readers.
    pub fn get_state(&self) -> Arc<T> {
        self.inner.state.load_full()
    }

    /// Store a new state and notify every observer.
    ///
    /// # Errors
    ///
    /// Only under [`DeliveryPolicy::FailFast`]: returns
    /// [`HubError::SubscriberNotification`] for the first failing observer.
    /// The new state stays stored.
    pub fn set_state(&self, new_value: T) -> Result<NotifyReport> {
        let value = Arc::new(new_value);
        self.inner.state.store(Arc::clone(&value));

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.inner.metrics {
            metrics.record_update();
        }

        self.run_round(&value)
    }

    /// Validate, then store a new state and notify every observer.
    ///
    /// Without a configured validator this behaves like
    /// [`set_state`](Self::set_state).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the validator rejects the value; the
    /// previous state is kept and nobody is notified. Otherwise errors as
    /// `set_state` does.
    pub fn try_set_state(&self, new_value: T) -> Result<NotifyReport> {
        if let Some(validator) = &self.inner.validator {
            if let Err(err) = validator(&new_value) {
                #[cfg(feature = "metrics")]
                if let Some(metrics) = &self.inner.metrics {
                    metrics.record_validation_failure();
                }

                #[cfg(feature = "tracing")]
                tracing::debug!(hub = %self.inner.name, error = %err, "state rejected by validator");

                return Err(err.into());
            }
        }

        self.set_state(new_value)
    }

    /// Append an observer to the subscriber list.
    ///
    /// No deduplication: attaching the same observer twice delivers twice per
    /// round.
    pub fn attach(&self, observer: Arc<dyn Observer<T>>) -> SubscriberId {
        let mut subscribers = self.inner.subscribers.write();
        let id = SubscriberId::from_raw(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.entries.push((id, observer));

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.inner.metrics {
            metrics.update_subscriber_count(subscribers.entries.len());
        }

        id
    }

    /// Attach a closure as an observer.
    pub fn attach_fn<F>(&self, name: impl Into<String>, callback: F) -> SubscriberId
    where
        F: Fn(&NotificationHub<T>) + Send + Sync + 'static,
    {
        self.attach(Arc::new(FnObserver::new(name, callback)))
    }

    /// Remove the observer attached under `id`.
    ///
    /// Returns false if no such observer is attached. The relative order of
    /// the remaining observers is unchanged. A round already in progress still
    /// reaches the removed observer.
    pub fn detach(&self, id: SubscriberId) -> bool {
        self.inner.remove(id)
    }

    /// Number of attached observers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().entries.len()
    }

    /// True when no observer is attached.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }

    /// Call `update` on every attached observer, in attachment order.
    ///
    /// The subscriber list is snapshotted before the first call, so observers
    /// may attach, detach or read state from inside `update`. Observers
    /// attached during the round are first notified on the next round.
    ///
    /// # Errors
    ///
    /// Only under [`DeliveryPolicy::FailFast`]; see [`set_state`](Self::set_state).
    pub fn notify_all(&self) -> Result<NotifyReport> {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.inner.metrics {
            metrics.update_state_age();
        }

        self.run_round(&self.get_state())
    }

    /// One notification round; every observer receives `value` through
    /// [`Observer::update_with`], whatever the state is by the time it runs.
    fn run_round(&self, value: &Arc<T>) -> Result<NotifyReport> {
        let snapshot: Vec<Entry<T>> = self.inner.subscribers.read().entries.clone();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            hub = %self.inner.name,
            subscribers = snapshot.len(),
            "notifying subscribers"
        );

        #[cfg(feature = "metrics")]
        let timer = self.inner.metrics.as_ref().map(|m| m.start_round());

        let mut report = NotifyReport::default();
        for (id, observer) in &snapshot {
            match self.deliver(observer.as_ref(), value) {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    if self.inner.trace_deliveries {
                        tracing::debug!(hub = %self.inner.name, observer = observer.name(), %id, "delivered");
                    }
                    report.delivered += 1;
                }
                Err(reason) => {
                    let failure = NotificationFailure {
                        id: *id,
                        observer: observer.name().to_string(),
                        reason,
                    };

                    if self.inner.policy == DeliveryPolicy::FailFast {
                        #[cfg(feature = "metrics")]
                        if let (Some(metrics), Some(timer)) = (&self.inner.metrics, timer) {
                            metrics.record_round(timer, report.delivered, 1);
                        }
                        return Err(HubError::from(failure));
                    }

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        hub = %self.inner.name,
                        observer = %failure.observer,
                        id = %failure.id,
                        reason = %failure.reason,
                        "subscriber failed, continuing"
                    );
                    report.failures.push(failure);
                }
            }
        }

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.inner.metrics, timer) {
            metrics.record_round(timer, report.delivered, report.failures.len());
        }

        Ok(report)
    }

    fn deliver(
        &self,
        observer: &dyn Observer<T>,
        value: &Arc<T>,
    ) -> std::result::Result<(), String> {
        match panic::catch_unwind(AssertUnwindSafe(|| observer.update_with(self, value))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(panic_message(payload)),
        }
    }
}

impl<T: Send + Sync + 'static> NotificationHub<T> {
    /// Attach an observer and return a guard that detaches it when dropped.
    pub fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> Subscription {
        let id = self.attach(observer);
        let hub: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription::new(id, hub)
    }

    /// Attach a closure and return a guard that detaches it when dropped.
    pub fn subscribe_fn<F>(&self, name: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&NotificationHub<T>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver::new(name, callback)))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

impl<T> Clone for NotificationHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for NotificationHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("name", &self.inner.name)
            .field("state", &self.get_state())
            .field("subscribers", &self.subscriber_count())
            .field("policy", &self.inner.policy)
            .finish()
    }
}
