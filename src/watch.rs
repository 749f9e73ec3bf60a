//! Bridge from a hub to a `tokio::sync::watch` channel.
//!
//! Async tasks that cannot run inside a synchronous `update` can await
//! state changes on the receiver instead.

use crate::core::{NotificationHub, Subscription};
use std::sync::Arc;
use tokio::sync::watch;

impl<T: Send + Sync + 'static> NotificationHub<T> {
    /// Forward every new state into a watch channel.
    ///
    /// The receiver starts with the current state. Forwarding stops when the
    /// returned [`Subscription`] is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use observer_hub::prelude::*;
    ///
    /// # async fn example() {
    /// let hub = NotificationHub::new(0u32);
    /// let (_subscription, mut rx) = hub.watch();
    ///
    /// hub.set_state(5).unwrap();
    /// rx.changed().await.unwrap();
    /// assert_eq!(**rx.borrow(), 5);
    /// # }
    /// ```
    pub fn watch(&self) -> (Subscription, watch::Receiver<Arc<T>>) {
        let (tx, rx) = watch::channel(self.get_state());
        let subscription = self.subscribe_fn("watch-bridge", move |hub: &NotificationHub<T>| {
            tx.send_replace(hub.get_state());
        });
        (subscription, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receiver_sees_updates() {
        let hub = NotificationHub::new(String::from("idle"));
        let (_subscription, mut rx) = hub.watch();
        assert_eq!(rx.borrow().as_str(), "idle");

        let task = tokio::spawn(async move {
            rx.changed().await.unwrap();
            rx.borrow_and_update().as_str().to_string()
        });

        hub.set_state("busy".to_string()).unwrap();
        assert_eq!(task.await.unwrap(), "busy");
    }

    #[tokio::test]
    async fn test_dropping_subscription_stops_forwarding() {
        let hub = NotificationHub::new(1u8);
        let (subscription, mut rx) = hub.watch();
        assert_eq!(hub.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);

        hub.set_state(2).unwrap();
        // Sender was dropped with the observer.
        assert!(rx.changed().await.is_err());
        assert_eq!(**rx.borrow(), 1);
    }
}
