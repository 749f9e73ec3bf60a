//! Error types for observer-hub.

use crate::core::SubscriberId;
use std::fmt;

/// Result type alias for observer-hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Errors that can occur when working with a hub, emitter or registry.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A subscriber's `update` failed and the hub runs with
    /// [`DeliveryPolicy::FailFast`](crate::core::DeliveryPolicy::FailFast).
    #[error("Subscriber '{observer}' ({id}) failed: {reason}")]
    SubscriberNotification {
        /// Diagnostic name of the failing observer
        observer: String,
        /// Id assigned when the observer was attached
        id: SubscriberId,
        /// Error message or panic payload
        reason: String,
    },

    /// The new state was rejected by the hub's validator.
    #[error("State validation failed: {0}")]
    Validation(String),

    /// A registry key is already taken.
    #[error("Hub already registered under key '{0}'")]
    AlreadyRegistered(String),

    /// No hub is registered under the requested key.
    #[error("No hub registered under key '{0}'")]
    NotRegistered(String),

    /// The hub under a registry key holds a different state type.
    #[error("Hub under key '{key}' does not hold state of type {expected}")]
    TypeMismatch {
        /// Registry key
        key: String,
        /// Type name requested by the caller
        expected: &'static str,
    },

    /// Failed to load or deserialize hub settings.
    #[error("Failed to load settings: {0}")]
    Settings(String),

    /// Generic error for other cases.
    #[error("Hub error: {0}")]
    Other(String),
}

/// Error returned by an observer's `update`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    /// Create an observer error with a message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl From<String> for ObserverError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ObserverError {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

/// Validation error for state values.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for HubError {
    fn from(err: ValidationError) -> Self {
        HubError::Validation(err.to_string())
    }
}
