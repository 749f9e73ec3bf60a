//! State validation support.

use crate::error::ValidationError;

/// Trait for state validation.
///
/// Implement this on a hub's state type and enable it with
/// [`NotificationHubBuilder::with_validate`](crate::core::NotificationHubBuilder::with_validate)
/// so that [`try_set_state`](crate::core::NotificationHub::try_set_state) rejects
/// invalid values before any observer sees them.
///
/// # Examples
///
/// ```rust
/// use observer_hub::core::{NotificationHub, Validate};
/// use observer_hub::error::ValidationError;
///
/// #[derive(Debug, Clone)]
/// struct Temperature {
///     celsius: f64,
/// }
///
/// impl Validate for Temperature {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.celsius < -273.15 {
///             return Err(ValidationError::invalid_field(
///                 "celsius",
///                 "below absolute zero",
///             ));
///         }
///         Ok(())
///     }
/// }
///
/// let hub = NotificationHub::builder(Temperature { celsius: 20.0 })
///     .with_validate()
///     .build();
///
/// assert!(hub.try_set_state(Temperature { celsius: -300.0 }).is_err());
/// assert_eq!(hub.get_state().celsius, 20.0);
/// ```
pub trait Validate {
    /// Validate the value.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
