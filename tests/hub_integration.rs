//! Integration tests exercising hubs, emitters and the registry together.

use observer_hub::prelude::*;
use parking_lot::Mutex;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Observer that appends `name=state` to a shared log.
struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Observer<u32> for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn update(&self, hub: &NotificationHub<u32>) -> std::result::Result<(), ObserverError> {
        self.log
            .lock()
            .push(format!("{}={}", self.name, hub.get_state()));
        Ok(())
    }
}

fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Recorder> {
    Arc::new(Recorder {
        name,
        log: Arc::clone(log),
    })
}

#[test]
fn test_three_observers_see_each_state_in_order() {
    let hub = NotificationHub::new(0u32);
    let log = Arc::new(Mutex::new(Vec::new()));

    hub.attach(recorder("A", &log));
    hub.attach(recorder("B", &log));
    hub.attach(recorder("C", &log));

    hub.set_state(1).unwrap();
    hub.set_state(2).unwrap();

    assert_eq!(
        *log.lock(),
        vec!["A=1", "B=1", "C=1", "A=2", "B=2", "C=2"]
    );
}

#[test]
fn test_hub_built_from_settings_file_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.yaml");
    fs::write(
        &path,
        r#"
name: payments
delivery: fail_fast
trace_deliveries: true
"#,
    )
    .unwrap();

    let settings = HubSettings::from_file(&path).unwrap();
    let hub = NotificationHub::builder(0u32)
        .with_settings(&settings)
        .build();
    assert_eq!(hub.name(), "payments");

    let log = Arc::new(Mutex::new(Vec::new()));
    hub.attach(recorder("first", &log));
    hub.attach_fn("broken", |_: &NotificationHub<u32>| panic!("ledger offline"));
    hub.attach(recorder("never", &log));

    match hub.set_state(10) {
        Err(HubError::SubscriberNotification {
            observer, reason, ..
        }) => {
            assert_eq!(observer, "broken");
            assert!(reason.contains("ledger offline"));
        }
        other => panic!("expected subscriber failure, got {other:?}"),
    }
    assert_eq!(*log.lock(), vec!["first=10"]);
}

#[test]
fn test_subscription_detaches_only_its_observer() {
    let hub = NotificationHub::new(0u32);
    let log = Arc::new(Mutex::new(Vec::new()));

    let keep = hub.subscribe(recorder("keep", &log));
    let temporary = hub.subscribe(recorder("temporary", &log));

    hub.set_state(1).unwrap();
    drop(temporary);
    hub.set_state(2).unwrap();

    assert_eq!(*log.lock(), vec!["keep=1", "temporary=1", "keep=2"]);
    assert!(keep.unsubscribe());
    assert!(hub.is_empty());
}

#[test]
fn test_registry_injected_into_components() {
    struct LoginForm {
        visible: NotificationHub<bool>,
    }

    impl LoginForm {
        fn from_registry(registry: &HubRegistry) -> Result<Self> {
            let visible =
                registry.get_or_init("login-form", || NotificationHub::new(false))?;
            Ok(Self { visible })
        }

        fn show(&self) -> Result<NotifyReport> {
            self.visible.set_state(true)
        }
    }

    let registry = Arc::new(HubRegistry::new());
    let first = LoginForm::from_registry(&registry).unwrap();
    let second = LoginForm::from_registry(&registry).unwrap();

    let shown = Arc::new(Mutex::new(0));
    let shown_clone = Arc::clone(&shown);
    second
        .visible
        .attach_fn("counter", move |_: &NotificationHub<bool>| {
            *shown_clone.lock() += 1;
        });

    first.show().unwrap();
    assert!(*second.visible.get_state());
    assert_eq!(*shown.lock(), 1);
}

#[test]
fn test_emitter_held_by_composition() {
    struct Person {
        name: String,
        events: EventEmitter<String>,
    }

    impl Person {
        fn on(&self, event: &str, listener: impl Fn(&String) + Send + Sync + 'static) {
            self.events.on(event, listener);
        }

        fn emit(&self, event: &str, payload: String) -> Result<NotifyReport> {
            self.events.emit(event, payload)
        }
    }

    let mars = Person {
        name: "Mars".to_string(),
        events: EventEmitter::new(),
    };

    let heard = Arc::new(Mutex::new(Vec::new()));
    let heard_clone = Arc::clone(&heard);
    let name = mars.name.clone();
    mars.on("say_hello", move |greeting: &String| {
        heard_clone.lock().push(format!("{greeting}, I'm {name}"));
    });

    mars.emit("say_hello", "Hello".to_string()).unwrap();
    assert_eq!(*heard.lock(), vec!["Hello, I'm Mars"]);
}

#[test]
fn test_concurrent_attach_and_notify() {
    let hub = NotificationHub::new(0u32);
    let counter = Arc::new(Mutex::new(0usize));

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let hub = hub.clone();
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..25 {
                    let counter = Arc::clone(&counter);
                    hub.attach_fn("counter", move |_: &NotificationHub<u32>| {
                        *counter.lock() += 1;
                    });
                    hub.set_state(1).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(hub.subscriber_count(), 100);

    let before = *counter.lock();
    let report = hub.set_state(2).unwrap();
    assert_eq!(report.delivered, 100);
    assert_eq!(*counter.lock(), before + 100);
}
