//! Notification metrics using OpenTelemetry.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector for a hub.
///
/// Tracks notification rounds, per-observer outcomes, round latency,
/// validation rejections, subscriber count and state age.
///
/// # Examples
///
/// ```rust,no_run
/// use observer_hub::metrics::HubMetrics;
/// use opentelemetry::global;
///
/// let metrics = HubMetrics::new(global::meter("observer-hub"));
///
/// let timer = metrics.start_round();
/// // ... call observers ...
/// metrics.record_round(timer, 3, 0);
/// ```
#[derive(Clone)]
pub struct HubMetrics {
    rounds: Counter<u64>,
    deliveries: Counter<u64>,
    failures: Counter<u64>,
    round_duration: Histogram<f64>,
    validation_failures: Counter<u64>,
    active_subscribers: Gauge<i64>,
    state_age_seconds: Gauge<i64>,
    last_update: Arc<Mutex<Instant>>,
}

impl HubMetrics {
    /// Create a collector that registers its instruments on `meter`.
    pub fn new(meter: Meter) -> Self {
        let rounds = meter
            .u64_counter("observer_hub.notify.rounds")
            .with_description("Total number of notification rounds")
            .build();

        let deliveries = meter
            .u64_counter("observer_hub.notify.deliveries")
            .with_description("Observer updates that completed successfully")
            .build();

        let failures = meter
            .u64_counter("observer_hub.notify.failures")
            .with_description("Observer updates that returned an error or panicked")
            .build();

        let round_duration = meter
            .f64_histogram("observer_hub.notify.duration")
            .with_description("Duration of notification rounds in seconds")
            .with_unit("s")
            .build();

        let validation_failures = meter
            .u64_counter("observer_hub.validation.failures")
            .with_description("States rejected by the validator")
            .build();

        let active_subscribers = meter
            .i64_gauge("observer_hub.subscribers.active")
            .with_description("Number of attached observers")
            .build();

        let state_age_seconds = meter
            .i64_gauge("observer_hub.state.age")
            .with_description("Time since the state was last set in seconds")
            .with_unit("s")
            .build();

        Self {
            rounds,
            deliveries,
            failures,
            round_duration,
            validation_failures,
            active_subscribers,
            state_age_seconds,
            last_update: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Count a new round and start its timer.
    pub fn start_round(&self) -> Instant {
        self.rounds.add(1, &[]);
        Instant::now()
    }

    /// Record the outcome of a round started with [`start_round`](Self::start_round).
    pub fn record_round(&self, start: Instant, delivered: usize, failed: usize) {
        self.deliveries.add(delivered as u64, &[]);
        self.failures.add(failed as u64, &[]);
        self.round_duration.record(start.elapsed().as_secs_f64(), &[]);
    }

    /// Record a state rejected by the validator.
    pub fn record_validation_failure(&self) {
        self.validation_failures.add(1, &[]);
    }

    /// Record the current number of attached observers.
    pub fn update_subscriber_count(&self, count: usize) {
        self.active_subscribers.record(count as i64, &[]);
    }

    /// Mark the state as just updated.
    pub fn record_update(&self) {
        *self.last_update.lock() = Instant::now();
    }

    /// Publish the time since the last update.
    ///
    /// The hub calls this on every [`notify_all`](crate::core::NotificationHub::notify_all),
    /// since those rounds re-broadcast an existing state.
    pub fn update_state_age(&self) {
        let age_secs = self.last_update.lock().elapsed().as_secs() as i64;
        self.state_age_seconds.record(age_secs, &[]);
    }
}
