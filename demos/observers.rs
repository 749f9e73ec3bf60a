//! Example demonstrating observers attached to a hub.
//!
//! This example shows how to:
//! - Implement the `Observer` trait and attach closures
//! - Receive every state change in attachment order
//! - Detach by dropping a subscription guard
//!
//! Run with: cargo run --example observers

use observer_hub::prelude::*;
use std::sync::Arc;

struct Named {
    name: String,
}

impl Observer<u32> for Named {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, hub: &NotificationHub<u32>) -> std::result::Result<(), ObserverError> {
        println!("{} update, state: {}", self.name, hub.get_state());
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Observer Example ===\n");

    let hub = NotificationHub::builder(0u32).name("demo").build();

    // Three observers subscribe to the same hub
    for name in ["observer1", "observer2", "observer3"] {
        hub.attach(Arc::new(Named {
            name: name.to_string(),
        }));
    }

    let audit = hub.subscribe_fn("audit", |hub: &NotificationHub<u32>| {
        println!("[audit] state is now {}", hub.get_state());
    });

    println!("--- set_state(1) ---");
    hub.set_state(1)?;

    println!("\n--- set_state(2) ---");
    hub.set_state(2)?;

    println!("\n--- Dropping audit subscription ---");
    drop(audit);

    println!("\n--- set_state(2) again (no equality check) ---");
    let report = hub.set_state(2)?;
    println!("\nDelivered to {} observers", report.delivered);

    Ok(())
}
