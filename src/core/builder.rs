//! Builder for constructing NotificationHub instances.

use crate::core::hub::{HubInner, Validator};
use crate::core::{DeliveryPolicy, NotificationHub};
use crate::error::ValidationError;
use crate::settings::HubSettings;
use std::sync::Arc;

#[cfg(feature = "validation")]
use crate::core::Validate;

#[cfg(feature = "metrics")]
use crate::metrics::HubMetrics;

/// Builder for a [`NotificationHub`].
///
/// # Examples
///
/// ```rust
/// use observer_hub::prelude::*;
///
/// let hub = NotificationHub::builder(0u32)
///     .name("orders")
///     .delivery_policy(DeliveryPolicy::FailFast)
///     .with_validation(|count: &u32| {
///         if *count > 1_000 {
///             return Err(ValidationError::custom("too many orders"));
///         }
///         Ok(())
///     })
///     .build();
///
/// assert_eq!(hub.name(), "orders");
/// assert_eq!(hub.policy(), DeliveryPolicy::FailFast);
/// ```
pub struct NotificationHubBuilder<T> {
    initial: T,
    name: String,
    policy: DeliveryPolicy,
    trace_deliveries: bool,
    validator: Option<Validator<T>>,
    #[cfg(feature = "metrics")]
    metrics: Option<HubMetrics>,
}

impl<T> NotificationHubBuilder<T> {
    /// Create a builder for a hub that starts at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            name: "hub".to_string(),
            policy: DeliveryPolicy::default(),
            trace_deliveries: false,
            validator: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Set the diagnostic name used in logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the failure policy for notification rounds.
    pub fn delivery_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log every successful delivery at debug level.
    pub fn trace_deliveries(mut self, enabled: bool) -> Self {
        self.trace_deliveries = enabled;
        self
    }

    /// Apply name, policy and delivery tracing from loaded settings.
    pub fn with_settings(self, settings: &HubSettings) -> Self {
        self.name(settings.name.clone())
            .delivery_policy(settings.delivery)
            .trace_deliveries(settings.trace_deliveries)
    }

    /// Add a validation function checked by
    /// [`try_set_state`](NotificationHub::try_set_state).
    ///
    /// Replaces any previously configured validator.
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Validate states with their [`Validate`] implementation.
    #[cfg(feature = "validation")]
    pub fn with_validate(self) -> Self
    where
        T: Validate,
    {
        self.with_validation(|state: &T| state.validate())
    }

    /// Record notification metrics with the given meter.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.metrics = Some(HubMetrics::new(meter));
        self
    }

    /// Build the hub. It starts with no observers.
    pub fn build(self) -> NotificationHub<T> {
        let mut inner = HubInner::new(self.name, self.initial);
        inner.policy = self.policy;
        inner.trace_deliveries = self.trace_deliveries;
        inner.validator = self.validator;
        #[cfg(feature = "metrics")]
        {
            inner.metrics = self.metrics;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(hub = %inner.name, policy = ?inner.policy, "hub created");

        NotificationHub::from_inner(inner)
    }
}

impl<T> NotificationHub<T> {
    /// Create a builder for a hub that starts at `initial`.
    pub fn builder(initial: T) -> NotificationHubBuilder<T> {
        NotificationHubBuilder::new(initial)
    }
}
