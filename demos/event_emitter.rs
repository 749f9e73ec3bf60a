//! Example demonstrating named events through composition.
//!
//! Run with: cargo run --example event_emitter

use observer_hub::prelude::*;

/// A type that gains `on`/`emit` by holding an emitter.
struct Person {
    name: String,
    events: EventEmitter<String>,
}

impl Person {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: EventEmitter::new(),
        }
    }

    fn on(&self, event: &str, listener: impl Fn(&String) + Send + Sync + 'static) -> SubscriberId {
        self.events.on(event, listener)
    }

    fn emit(&self, event: &str, payload: impl Into<String>) -> Result<NotifyReport> {
        self.events.emit(event, payload.into())
    }
}

fn main() -> Result<()> {
    println!("=== Event Emitter Example ===\n");

    let emitter: EventEmitter<String> = EventEmitter::new();
    emitter.on("some", |_| println!("some event is occured 1"));
    emitter.on("some", |_| println!("some event is occured 2"));
    emitter.emit("some", String::new())?;

    emitter.on("some2", |name| println!("some2 event is occured {name}"));
    emitter.emit("some2", "Mars".to_string())?;

    println!("\n--- Callbacks list ---");
    let callbacks: EventEmitter<&'static str> = EventEmitter::new();
    for tag in ["fn1", "fn2", "fn3"] {
        callbacks.on("fire", move |info| println!("{tag} {info}"));
    }
    callbacks.emit("fire", "hello")?;
    callbacks.emit("fire", "fire")?;

    println!("\n--- Composition ---");
    let mars = Person::new("Mars");
    let name = mars.name.clone();
    let id = mars.on("say_hello", move |greeting| println!("{greeting}, I'm {name}"));
    mars.emit("say_hello", "Hello")?;

    mars.events.off("say_hello", id);
    let report = mars.emit("say_hello", "Hello again")?;
    println!("Listeners after off: {}", report.attempted());

    Ok(())
}
