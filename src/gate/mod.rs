//! Smile gating.
//!
//! Debounces the classifier's per-frame happiness scores into a
//! single capture trigger. Pure state, no I/O.

mod score;
mod smile;
mod threshold;

pub use score::FrameScore;
pub use smile::{GateAction, GatePhase, GateState, SmileGate};
pub use threshold::GateConfig;
