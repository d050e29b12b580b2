//! Smile Press Library
//!
//! Watches a live camera feed, waits for a sustained smile, then takes a
//! single photo and prints it in a grainy two-tone "newspaper" style.
//!
//! # Architecture
//!
//! ```text
//! camera → classifier → smile gate ──(capture)──→ pipeline → presenter
//!                                                    ↓
//!                                          newspaper effect
//! ```
//!
//! # Design Principles
//!
//! - **One shot**: the gate fires at most once; a failed capture ends the session
//! - **Forgiving gate**: one bad frame costs one unit of credit, not the whole streak
//! - **No overlap**: each classification is awaited before the next tick
//! - **Injected randomness**: the effect draws every random value from a caller-supplied source
//!
//! # Example
//!
//! ```no_run
//! use smile_press::{
//!     capture::{FileConfig, MockCamera},
//!     classifier::ScriptedClassifier,
//!     effect::RngSource,
//!     presentation::FilePresenter,
//!     session::{Session, SessionOutcome},
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FileConfig::default();
//! let classifier = ScriptedClassifier::from_scores(&[0.4, 0.9, 0.92, 0.95, 0.97, 0.99]);
//! let presenter = FilePresenter::new("front-page.png");
//!
//! let mut session = Session::new(MockCamera::new(), classifier, presenter, &config)?;
//! if let SessionOutcome::Captured(photo) = session.run(&mut RngSource::seeded(7)).await? {
//!     println!("printed {}", photo.dateline());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod classifier;
pub mod effect;
pub mod gate;
pub mod metrics;
pub mod presentation;
pub mod session;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, FileConfig, MockCamera, PixelBuffer};
pub use classifier::{FaceDetection, FrameClassifier, ScriptedClassifier};
pub use effect::{NewspaperEffect, NewspaperParams, RandomSource, RngSource};
pub use gate::{FrameScore, GateAction, GateConfig, SmileGate};
pub use presentation::{CapturedPhoto, FilePresenter, Presenter};
pub use session::{ErrorKind, Session, SessionError, SessionOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
