//! Explicit registry of shared hubs.
//!
//! There is no global instance. An application creates one `HubRegistry`,
//! usually wraps it in an `Arc`, and hands it to the components that need
//! shared hubs. Each key is initialized at most once.

use crate::core::NotificationHub;
use crate::error::{HubError, Result};
use parking_lot::RwLock;
use std::any::{Any, type_name};
use std::collections::HashMap;

type AnyHub = Box<dyn Any + Send + Sync>;

/// Keyed store of hubs with initialize-once semantics.
///
/// # Examples
///
/// ```rust
/// use observer_hub::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(HubRegistry::new());
///
/// let login = registry
///     .get_or_init("login-form", || NotificationHub::new(false))
///     .unwrap();
/// let same = registry
///     .get_or_init("login-form", || NotificationHub::new(true))
///     .unwrap();
///
/// login.set_state(true).unwrap();
/// assert!(*same.get_state());
/// ```
#[derive(Default)]
pub struct HubRegistry {
    hubs: RwLock<HashMap<String, AnyHub>>,
}

impl HubRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hub` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AlreadyRegistered`] if the key is taken; the
    /// existing hub is left in place.
    pub fn register<T>(&self, key: impl Into<String>, hub: NotificationHub<T>) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        let mut hubs = self.hubs.write();
        if hubs.contains_key(&key) {
            return Err(HubError::AlreadyRegistered(key));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, state = type_name::<T>(), "hub registered");

        hubs.insert(key, Box::new(hub));
        Ok(())
    }

    /// Return the hub under `key`, creating it with `init` on first use.
    ///
    /// `init` runs at most once per key, while the registry's write lock is
    /// held; it must not call back into this registry.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TypeMismatch`] if the key holds a hub of another
    /// state type.
    pub fn get_or_init<T, F>(&self, key: &str, init: F) -> Result<NotificationHub<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> NotificationHub<T>,
    {
        if let Some(hub) = self.lookup(key) {
            return hub;
        }

        let mut hubs = self.hubs.write();
        let entry = hubs.entry(key.to_string()).or_insert_with(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(key, state = type_name::<T>(), "hub initialized");
            Box::new(init()) as AnyHub
        });
        downcast(key, &**entry)
    }

    /// Return the hub under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotRegistered`] for an unknown key and
    /// [`HubError::TypeMismatch`] for a hub of another state type.
    pub fn get<T>(&self, key: &str) -> Result<NotificationHub<T>>
    where
        T: Send + Sync + 'static,
    {
        self.lookup(key)
            .unwrap_or_else(|| Err(HubError::NotRegistered(key.to_string())))
    }

    /// Remove the hub under `key`. Existing clones of it keep working.
    pub fn remove(&self, key: &str) -> bool {
        self.hubs.write().remove(key).is_some()
    }

    /// True if a hub is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.hubs.read().contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.hubs.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered hubs.
    pub fn len(&self) -> usize {
        self.hubs.read().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<T>(&self, key: &str) -> Option<Result<NotificationHub<T>>>
    where
        T: Send + Sync + 'static,
    {
        let hubs = self.hubs.read();
        hubs.get(key).map(|entry| downcast(key, &**entry))
    }
}

fn downcast<T>(key: &str, entry: &(dyn Any + Send + Sync)) -> Result<NotificationHub<T>>
where
    T: Send + Sync + 'static,
{
    entry
        .downcast_ref::<NotificationHub<T>>()
        .cloned()
        .ok_or_else(|| HubError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
}

impl std::fmt::Debug for HubRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_get_or_init_runs_once() {
        let registry = HubRegistry::new();
        let calls = AtomicUsize::new(0);

        let first = registry
            .get_or_init("cart", || {
                calls.fetch_add(1, Ordering::SeqCst);
                NotificationHub::new(0u32)
            })
            .unwrap();
        let second = registry
            .get_or_init("cart", || {
                calls.fetch_add(1, Ordering::SeqCst);
                NotificationHub::new(100u32)
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        first.set_state(3).unwrap();
        assert_eq!(*second.get_state(), 3);
    }

    #[test]
    fn test_register_twice_fails() {
        let registry = HubRegistry::new();
        registry.register("store", NotificationHub::new(1i64)).unwrap();

        let err = registry
            .register("store", NotificationHub::new(2i64))
            .unwrap_err();
        assert!(matches!(err, HubError::AlreadyRegistered(ref key) if key == "store"));
        assert_eq!(*registry.get::<i64>("store").unwrap().get_state(), 1);
    }

    #[test]
    fn test_get_unknown_and_mismatched() {
        let registry = HubRegistry::new();
        assert!(matches!(
            registry.get::<u8>("missing"),
            Err(HubError::NotRegistered(_))
        ));

        registry.register("flag", NotificationHub::new(true)).unwrap();
        assert!(matches!(
            registry.get::<String>("flag"),
            Err(HubError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.get_or_init("flag", || NotificationHub::new(0u8)),
            Err(HubError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_keys_and_remove() {
        let registry = HubRegistry::new();
        assert!(registry.is_empty());

        registry.register("b", NotificationHub::new(())).unwrap();
        registry.register("a", NotificationHub::new(())).unwrap();
        assert_eq!(registry.keys(), vec!["a", "b"]);
        assert!(registry.contains("a"));

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_get_or_init_shares_one_hub() {
        let registry = Arc::new(HubRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    let hub = registry
                        .get_or_init("shared", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            NotificationHub::new(0usize)
                        })
                        .unwrap();
                    hub.attach_fn("worker", |_: &NotificationHub<usize>| {});
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.get::<usize>("shared").unwrap().subscriber_count(), 8);
    }
}
