//! The typed observer capability.

use crate::core::NotificationHub;
use crate::error::ObserverError;
use std::fmt;
use std::sync::Arc;

/// A subscriber to a [`NotificationHub`].
///
/// The hub passes itself to `update` for the duration of the call, so an
/// observer reads the current state with [`NotificationHub::get_state`]
/// without holding a reference back to the hub.
///
/// # Examples
///
/// ```rust
/// use observer_hub::core::{NotificationHub, Observer};
/// use observer_hub::error::ObserverError;
/// use std::sync::Arc;
///
/// struct Printer;
///
/// impl Observer<u32> for Printer {
///     fn name(&self) -> &str {
///         "printer"
///     }
///
///     fn update(&self, hub: &NotificationHub<u32>) -> Result<(), ObserverError> {
///         println!("{} update, state: {}", self.name(), hub.get_state());
///         Ok(())
///     }
/// }
///
/// let hub = NotificationHub::new(0u32);
/// hub.attach(Arc::new(Printer));
/// hub.set_state(1).unwrap();
/// ```
pub trait Observer<T>: Send + Sync {
    /// Diagnostic label used in logs and failure reports.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Called once per notification round.
    ///
    /// # Errors
    ///
    /// A returned error is handled according to the hub's
    /// [`DeliveryPolicy`](crate::core::DeliveryPolicy).
    fn update(&self, hub: &NotificationHub<T>) -> Result<(), ObserverError>;

    /// Called by the hub with the value that started this round.
    ///
    /// `state` is the value stored by the `set_state` call that triggered the
    /// round (or the current value for [`NotificationHub::notify_all`]). It
    /// stays the same even when another `set_state` runs, nested or on another
    /// thread, before this observer is reached. Override it when the observer
    /// must see each round's own value; the default forwards to
    /// [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// As for [`update`](Self::update).
    fn update_with(&self, hub: &NotificationHub<T>, state: &Arc<T>) -> Result<(), ObserverError> {
        let _ = state;
        self.update(hub)
    }
}

/// Adapter that turns a closure into an [`Observer`].
pub struct FnObserver<F> {
    name: String,
    callback: F,
}

impl<F> FnObserver<F> {
    /// Wrap `callback` under the given diagnostic name.
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<T, F> Observer<T> for FnObserver<F>
where
    F: Fn(&NotificationHub<T>) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, hub: &NotificationHub<T>) -> Result<(), ObserverError> {
        (self.callback)(hub);
        Ok(())
    }
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Silent;

    impl Observer<u8> for Silent {
        fn update(&self, _hub: &NotificationHub<u8>) -> Result<(), ObserverError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Observer::<u8>::name(&Silent), "anonymous");
    }

    #[test]
    fn test_fn_observer_reads_state() {
        let hub = NotificationHub::new(7u32);
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let observer = FnObserver::new("reader", move |hub: &NotificationHub<u32>| {
            seen_clone.store(*hub.get_state(), Ordering::SeqCst);
        });

        assert_eq!(Observer::<u32>::name(&observer), "reader");
        observer.update(&hub).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_update_with_defaults_to_update() {
        let hub = NotificationHub::new(7u32);
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let observer = FnObserver::new("reader", move |hub: &NotificationHub<u32>| {
            seen_clone.store(*hub.get_state(), Ordering::SeqCst);
        });

        observer.update_with(&hub, &Arc::new(99)).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }
}
