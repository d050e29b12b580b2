//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Running totals for one session, pushed to the registry every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Classifier ticks completed.
    pub ticks: u64,
    /// Ticks where no face was scored, failures included.
    pub no_face_ticks: u64,
    /// Ticks where the classifier call failed.
    pub oracle_failures: u64,
    /// Current smile credit.
    pub credit: u32,
    /// Latest happiness score.
    pub happiness: f64,
    /// Photos delivered to the presenter.
    pub captures: u64,
    /// Capture attempts that failed.
    pub capture_failures: u64,
}

/// Prometheus metrics registry for smile sessions.
pub struct MetricsRegistry {
    registry: Registry,

    // Polling metrics
    ticks_total: IntCounter,
    no_face_ticks_total: IntCounter,
    oracle_failures_total: IntCounter,

    // Gate metrics
    gate_credit: IntGauge,
    happiness: Gauge,

    // Capture metrics
    captures_total: IntCounter,
    capture_failures_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new registry with all session metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ticks_total = IntCounter::new(
            "smile_press_ticks_total",
            "Total classifier ticks completed",
        )?;
        let no_face_ticks_total = IntCounter::new(
            "smile_press_no_face_ticks_total",
            "Ticks where no face was scored",
        )?;
        let oracle_failures_total = IntCounter::new(
            "smile_press_oracle_failures_total",
            "Classifier calls that failed",
        )?;
        let gate_credit = IntGauge::new(
            "smile_press_gate_credit",
            "Current smile gate credit",
        )?;
        let happiness = Gauge::new(
            "smile_press_happiness",
            "Latest happiness score (0 with no face)",
        )?;
        let captures_total = IntCounter::new(
            "smile_press_captures_total",
            "Photos delivered to the presenter",
        )?;
        let capture_failures_total = IntCounter::new(
            "smile_press_capture_failures_total",
            "Capture attempts that failed",
        )?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(no_face_ticks_total.clone()))?;
        registry.register(Box::new(oracle_failures_total.clone()))?;
        registry.register(Box::new(gate_credit.clone()))?;
        registry.register(Box::new(happiness.clone()))?;
        registry.register(Box::new(captures_total.clone()))?;
        registry.register(Box::new(capture_failures_total.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            no_face_ticks_total,
            oracle_failures_total,
            gate_credit,
            happiness,
            captures_total,
            capture_failures_total,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        advance(&self.ticks_total, snapshot.ticks);
        advance(&self.no_face_ticks_total, snapshot.no_face_ticks);
        advance(&self.oracle_failures_total, snapshot.oracle_failures);
        advance(&self.captures_total, snapshot.captures);
        advance(&self.capture_failures_total, snapshot.capture_failures);

        self.gate_credit.set(snapshot.credit as i64);
        self.happiness.set(snapshot.happiness);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Counters only move forward, so increment by the difference.
fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        assert!(MetricsRegistry::new().is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            ticks: 12,
            no_face_ticks: 3,
            oracle_failures: 1,
            credit: 4,
            happiness: 0.5,
            captures: 1,
            capture_failures: 0,
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("smile_press_ticks_total 12"));
        assert!(output.contains("smile_press_gate_credit 4"));
        assert!(output.contains("smile_press_happiness 0.5"));
        assert!(output.contains("smile_press_captures_total 1"));
    }

    #[test]
    fn test_counters_never_go_back() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            ticks: 10,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            ticks: 4,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("smile_press_ticks_total 10"));
    }
}
