//! Subscriber ids and drop-to-detach subscription guards.

use std::fmt;
use std::sync::Weak;

/// Identifier assigned to each attached observer.
///
/// Ids are unique per hub and increase monotonically in attachment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything a subscription can be removed from.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: SubscriberId) -> bool;
}

/// Guard for an attached observer.
///
/// When the guard is dropped the observer is detached immediately, on the
/// dropping thread. The guard does not keep the hub alive.
///
/// # Examples
///
/// ```rust
/// use observer_hub::prelude::*;
/// use std::sync::Arc;
///
/// let hub = NotificationHub::new(0u8);
/// let subscription = hub.subscribe(Arc::new(FnObserver::new("log", |_: &NotificationHub<u8>| {})));
/// assert_eq!(hub.subscriber_count(), 1);
///
/// drop(subscription);
/// assert_eq!(hub.subscriber_count(), 0);
/// ```
#[must_use = "dropping a Subscription detaches the observer immediately"]
pub struct Subscription {
    id: SubscriberId,
    hub: Weak<dyn Detach>,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, hub: Weak<dyn Detach>) -> Self {
        Self {
            id,
            hub,
            released: false,
        }
    }

    /// The id of the attached observer.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Detach now and report whether the observer was still attached.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Keep the observer attached for the lifetime of the hub.
    ///
    /// Returns the id, which can still be passed to `detach` later.
    pub fn forget(mut self) -> SubscriberId {
        self.released = true;
        self.id
    }

    fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        match self.hub.upgrade() {
            Some(hub) => hub.detach(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        detached: Mutex<Vec<SubscriberId>>,
    }

    impl Detach for Recorder {
        fn detach(&self, id: SubscriberId) -> bool {
            self.detached.lock().push(id);
            true
        }
    }

    #[test]
    fn test_drop_detaches_once() {
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn Detach> = Arc::downgrade(&recorder) as Weak<dyn Detach>;

        let subscription = Subscription::new(SubscriberId::from_raw(4), weak);
        drop(subscription);

        assert_eq!(*recorder.detached.lock(), vec![SubscriberId::from_raw(4)]);
    }

    #[test]
    fn test_unsubscribe_then_drop_does_not_repeat() {
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn Detach> = Arc::downgrade(&recorder) as Weak<dyn Detach>;

        let subscription = Subscription::new(SubscriberId::from_raw(1), weak);
        assert!(subscription.unsubscribe());
        assert_eq!(recorder.detached.lock().len(), 1);
    }

    #[test]
    fn test_forget_keeps_subscription() {
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn Detach> = Arc::downgrade(&recorder) as Weak<dyn Detach>;

        let id = Subscription::new(SubscriberId::from_raw(9), weak).forget();
        assert_eq!(id.as_u64(), 9);
        assert!(recorder.detached.lock().is_empty());
    }

    #[test]
    fn test_dropped_hub_is_ignored() {
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn Detach> = Arc::downgrade(&recorder) as Weak<dyn Detach>;
        drop(recorder);

        let subscription = Subscription::new(SubscriberId::from_raw(2), weak);
        assert!(!subscription.unsubscribe());
    }
}
