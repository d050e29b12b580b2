//! Prometheus metrics for smile sessions.
//!
//! # Metrics Exposed
//!
//! - `smile_press_ticks_total` - Classifier ticks completed
//! - `smile_press_no_face_ticks_total` - Ticks scored as no face
//! - `smile_press_oracle_failures_total` - Classifier calls that failed
//! - `smile_press_gate_credit` - Current smile gate credit
//! - `smile_press_happiness` - Latest happiness score
//! - `smile_press_captures_total` - Photos delivered
//! - `smile_press_capture_failures_total` - Capture attempts that failed
//!
//! With the `metrics` feature the registry can be served over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use smile_press::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     ticks: 40,
//!     no_face_ticks: 6,
//!     oracle_failures: 1,
//!     credit: 3,
//!     happiness: 0.91,
//!     captures: 0,
//!     capture_failures: 0,
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
