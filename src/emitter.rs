//! Named-event emitter built on [`NotificationHub`].
//!
//! Each event name with listeners gets its own hub whose state is the last
//! emitted payload. Listeners receive the payload of the emit that started
//! their round, so nested or concurrent emits never swap payloads under them.
//! Types that need event capability hold an `EventEmitter` as a field and
//! forward `on`/`emit` to it.

use crate::core::{DeliveryPolicy, NotificationHub, NotifyReport, Observer, SubscriberId};
use crate::error::{ObserverError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Channel<P> = NotificationHub<Option<Arc<P>>>;

/// A listener callback bound to one event channel.
struct Listener<F> {
    name: String,
    callback: F,
}

impl<P, F> Observer<Option<Arc<P>>> for Listener<F>
where
    F: Fn(&P) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, hub: &Channel<P>) -> std::result::Result<(), ObserverError> {
        self.update_with(hub, &hub.get_state())
    }

    fn update_with(
        &self,
        _hub: &Channel<P>,
        state: &Arc<Option<Arc<P>>>,
    ) -> std::result::Result<(), ObserverError> {
        if let Some(payload) = &**state {
            (self.callback)(&**payload);
        }
        Ok(())
    }
}

/// Dispatches payloads to listeners registered per event name.
///
/// Listeners of one event run synchronously in registration order.
///
/// # Examples
///
/// ```rust
/// use observer_hub::emitter::EventEmitter;
///
/// struct Greeter {
///     name: String,
///     events: EventEmitter<String>,
/// }
///
/// let greeter = Greeter {
///     name: "Mars".to_string(),
///     events: EventEmitter::new(),
/// };
///
/// let name = greeter.name.clone();
/// greeter.events.on("say_hello", move |greeting: &String| {
///     println!("{greeting}, I'm {name}");
/// });
///
/// let report = greeter.events.emit("say_hello", "Hello".to_string()).unwrap();
/// assert_eq!(report.delivered, 1);
/// ```
pub struct EventEmitter<P> {
    channels: RwLock<HashMap<String, Channel<P>>>,
    policy: DeliveryPolicy,
}

impl<P: Send + Sync + 'static> EventEmitter<P> {
    /// Create an emitter whose events isolate listener failures.
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    /// Create an emitter whose events use `policy`.
    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Register a listener for `event`.
    pub fn on<F>(&self, event: &str, listener: F) -> SubscriberId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.on_named(event, event, listener)
    }

    /// Register a listener under a diagnostic name.
    pub fn on_named<F>(&self, event: &str, name: impl Into<String>, listener: F) -> SubscriberId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let listener = Arc::new(Listener {
            name: name.into(),
            callback: listener,
        });

        // Held across the attach so a concurrent `off` cannot drop the
        // channel between lookup and attach.
        let mut channels = self.channels.write();
        channels
            .entry(event.to_string())
            .or_insert_with(|| {
                NotificationHub::builder(None)
                    .name(event)
                    .delivery_policy(self.policy)
                    .build()
            })
            .attach(listener)
    }

    /// Remove a listener. Returns false if it was not registered for `event`.
    ///
    /// Removing the last listener of an event drops its channel, including
    /// the stored [`last_payload`](Self::last_payload).
    pub fn off(&self, event: &str, id: SubscriberId) -> bool {
        let mut channels = self.channels.write();
        let Some(channel) = channels.get(event) else {
            return false;
        };

        let removed = channel.detach(id);
        if removed && channel.is_empty() {
            channels.remove(event);

            #[cfg(feature = "tracing")]
            tracing::trace!(event, "last listener removed, channel dropped");
        }
        removed
    }

    /// Deliver `payload` to every listener of `event`.
    ///
    /// Emitting an event nobody listens to is a no-op.
    ///
    /// # Errors
    ///
    /// Only under [`DeliveryPolicy::FailFast`], for the first failing
    /// listener.
    pub fn emit(&self, event: &str, payload: P) -> Result<NotifyReport> {
        let channel = self.channels.read().get(event).cloned();
        match channel {
            Some(channel) => channel.set_state(Some(Arc::new(payload))),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(event, "emit without listeners");
                Ok(NotifyReport::default())
            }
        }
    }

    /// The payload most recently emitted for `event`.
    ///
    /// `None` if nothing was emitted since the event last gained a listener.
    pub fn last_payload(&self, event: &str) -> Option<Arc<P>> {
        let channel = self.channels.read().get(event).cloned()?;
        let state = channel.get_state();
        (*state).clone()
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.channels
            .read()
            .get(event)
            .map_or(0, |channel| channel.subscriber_count())
    }

    /// Event names that currently have at least one listener, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<P: Send + Sync + 'static> Default for EventEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}
