//! Core notification types.

mod builder;
mod hub;
mod observer;
mod report;
mod subscription;

#[cfg(feature = "validation")]
mod validation;

pub use builder::NotificationHubBuilder;
pub use hub::NotificationHub;
pub use observer::{FnObserver, Observer};
pub use report::{DeliveryPolicy, NotificationFailure, NotifyReport};
pub use subscription::{SubscriberId, Subscription};

#[cfg(feature = "validation")]
pub use validation::Validate;
