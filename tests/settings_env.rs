//! Environment overrides for hub settings.

#![allow(unsafe_code)] // For env var manipulation in tests

use observer_hub::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.toml");
    fs::write(&path, "name = \"from-file\"\ndelivery = \"isolate\"\n").unwrap();

    unsafe {
        std::env::set_var("OBSHUBTEST_DELIVERY", "fail_fast");
        std::env::set_var("OBSHUBTEST_TRACE_DELIVERIES", "true");
    }

    let settings = HubSettings::loader()
        .with_file(&path)
        .with_env_overrides("OBSHUBTEST", "__")
        .load()
        .unwrap();

    unsafe {
        std::env::remove_var("OBSHUBTEST_DELIVERY");
        std::env::remove_var("OBSHUBTEST_TRACE_DELIVERIES");
    }

    assert_eq!(settings.name, "from-file");
    assert_eq!(settings.delivery, DeliveryPolicy::FailFast);
    assert!(settings.trace_deliveries);
}
