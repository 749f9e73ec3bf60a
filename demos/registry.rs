//! Example demonstrating a shared hub handed out by an injected registry.
//!
//! Run with: cargo run --example registry

use observer_hub::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Hidden,
    Shown,
}

struct LoginForm {
    state: NotificationHub<Visibility>,
}

impl LoginForm {
    fn open(registry: &HubRegistry) -> Result<Self> {
        let state = registry.get_or_init("login-form", || {
            NotificationHub::builder(Visibility::Hidden)
                .name("login-form")
                .build()
        })?;
        Ok(Self { state })
    }

    fn show(&self) -> Result<()> {
        if *self.state.get_state() == Visibility::Shown {
            println!("already shown");
            return Ok(());
        }
        self.state.set_state(Visibility::Shown)?;
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        if *self.state.get_state() == Visibility::Hidden {
            println!("already hidden");
            return Ok(());
        }
        self.state.set_state(Visibility::Hidden)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Registry Example ===\n");

    let registry = Arc::new(HubRegistry::new());

    let login1 = LoginForm::open(&registry)?;
    login1.state.attach_fn("renderer", |hub: &NotificationHub<Visibility>| {
        println!("login form is now {:?}", hub.get_state());
    });

    let login2 = LoginForm::open(&registry)?;
    login1.show()?;
    login2.hide()?;
    login2.hide()?;

    println!("\nRegistered hubs: {:?}", registry.keys());
    Ok(())
}
