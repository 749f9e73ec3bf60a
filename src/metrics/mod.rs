//! Built-in metrics for notification rounds.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Rounds, successful deliveries and failed deliveries
//! - Round duration
//! - Validation rejections
//! - Attached observers
//! - State age
//!
//! # Examples
//!
//! ```rust,no_run
//! use observer_hub::prelude::*;
//! use opentelemetry::global;
//!
//! let hub = NotificationHub::builder(0u64)
//!     .name("ticks")
//!     .with_metrics(global::meter("my-app"))
//!     .build();
//! ```

mod hub_metrics;

pub use hub_metrics::HubMetrics;
