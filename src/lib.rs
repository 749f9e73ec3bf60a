//! # observer-hub
//!
//! Typed observer / publish-subscribe notification with ordered, synchronous
//! delivery.
//!
//! ## Overview
//!
//! `observer-hub` is built around [`NotificationHub`](core::NotificationHub):
//! a piece of observable state plus an ordered list of observers. Setting the
//! state notifies every observer, in attachment order, before `set_state`
//! returns.
//!
//! - Lock-free state reads using `arc-swap`
//! - Typed single-method [`Observer`](core::Observer) trait, plus closures
//! - Explicit failure policy: isolate a failing observer or fail fast
//! - Drop-to-detach [`Subscription`](core::Subscription) guards
//! - Composition-friendly [`EventEmitter`](emitter::EventEmitter)
//! - Injectable [`HubRegistry`](registry::HubRegistry) instead of global singletons
//!
//! ## Quick Start
//!
//! ```rust
//! use observer_hub::prelude::*;
//!
//! let hub = NotificationHub::new(0);
//!
//! hub.attach_fn("observer1", |hub: &NotificationHub<i32>| {
//!     println!("observer1 update, state: {}", hub.get_state());
//! });
//! hub.attach_fn("observer2", |hub: &NotificationHub<i32>| {
//!     println!("observer2 update, state: {}", hub.get_state());
//! });
//!
//! hub.set_state(1)?;
//! hub.set_state(2)?;
//! # Ok::<(), HubError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing` (default): debug/warn logs for rounds and isolated failures
//! - `validation` (default): the [`Validate`](core::Validate) trait
//! - `metrics`: OpenTelemetry instruments via `with_metrics`
//! - `tokio-runtime`: `NotificationHub::watch` bridge to `tokio::sync::watch`

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod emitter;
pub mod error;
pub mod registry;
pub mod settings;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "tokio-runtime")]
mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        DeliveryPolicy, FnObserver, NotificationHub, NotificationHubBuilder, NotifyReport,
        Observer, SubscriberId, Subscription,
    };
    pub use crate::emitter::EventEmitter;
    pub use crate::error::{HubError, ObserverError, Result, ValidationError};
    pub use crate::registry::HubRegistry;
    pub use crate::settings::HubSettings;

    #[cfg(feature = "validation")]
    pub use crate::core::Validate;
}
