//! In-process metric primitives
//!
//! Counters are lock-free; histograms keep a running summary (count, sum,
//! min, max, last) rather than every observation, so a long-lived handler
//! holds constant memory per series.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Monotonic counter
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Summary {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

/// Summary of observed values
#[derive(Debug)]
pub struct Histogram {
    name: String,
    summary: Mutex<Summary>,
}

impl Histogram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: Mutex::new(Summary::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observe(&self, value: f64) {
        let mut s = self.summary.lock().unwrap_or_else(PoisonError::into_inner);
        if s.count == 0 {
            s.min = value;
            s.max = value;
        } else {
            s.min = s.min.min(value);
            s.max = s.max.max(value);
        }
        s.count += 1;
        s.sum += value;
        s.last = value;
    }

    /// Observe a duration in seconds
    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    fn read(&self) -> Summary {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self) -> u64 {
        self.read().count
    }

    pub fn sum(&self) -> f64 {
        self.read().sum
    }

    pub fn mean(&self) -> Option<f64> {
        let s = self.read();
        (s.count > 0).then(|| s.sum / s.count as f64)
    }

    pub fn min(&self) -> Option<f64> {
        let s = self.read();
        (s.count > 0).then_some(s.min)
    }

    pub fn max(&self) -> Option<f64> {
        let s = self.read();
        (s.count > 0).then_some(s.max)
    }

    /// Most recent observation
    pub fn last(&self) -> Option<f64> {
        let s = self.read();
        (s.count > 0).then_some(s.last)
    }

    pub fn reset(&self) {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner) = Summary::default();
    }
}

/// Operational metrics recorded by the request handler
pub trait Metrics: Send + Sync {
    /// Counter registered under `name`, created on first use
    fn counter(&self, name: &str) -> Arc<Counter>;

    /// Histogram registered under `name`, created on first use
    fn histogram(&self, name: &str) -> Arc<Histogram>;

    /// Observe `duration` on `<operation>_duration`
    fn record_execution_time(&self, operation: &str, duration: Duration) {
        self.histogram(&format!("{}_duration", operation))
            .observe_duration(duration);
    }

    /// Increment `errors_<kind>`
    fn record_error(&self, kind: &str) {
        self.counter(&format!("errors_{}", kind)).inc();
    }
}

/// Registry of named counters and histograms
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: RwLock<BTreeMap<String, Arc<Counter>>>,
    histograms: RwLock<BTreeMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered counter names, sorted
    pub fn counter_names(&self) -> Vec<String> {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Registered histogram names, sorted
    pub fn histogram_names(&self) -> Vec<String> {
        self.histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Current value of every counter
    pub fn counter_values(&self) -> Vec<(String, u64)> {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, counter)| (name.clone(), counter.get()))
            .collect()
    }

    pub fn reset_all(&self) {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.values().for_each(|c| c.reset());
        let histograms = self.histograms.read().unwrap_or_else(PoisonError::into_inner);
        histograms.values().for_each(|h| h.reset());
    }
}

fn get_or_create<T>(
    map: &RwLock<BTreeMap<String, Arc<T>>>,
    name: &str,
    create: impl FnOnce() -> T,
) -> Arc<T> {
    if let Some(existing) = map.read().unwrap_or_else(PoisonError::into_inner).get(name) {
        return existing.clone();
    }
    map.write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(create()))
        .clone()
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        get_or_create(&self.counters, name, || Counter::new(name))
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        get_or_create(&self.histograms, name, || Histogram::new(name))
    }
}
