//! Smile session orchestration.
//!
//! Ties the camera, classifier, gate, effect and presenter together
//! for a single capture.

mod error;
mod guard;
mod pipeline;
mod runner;

pub use error::{ErrorKind, SessionError};
pub use guard::CameraGuard;
pub use pipeline::CapturePipeline;
pub use runner::{Session, SessionOutcome};
