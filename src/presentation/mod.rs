//! Presentation of session progress and results.
//!
//! The session reports to a [`Presenter`]: a progress fraction on every
//! tick, the stylized photo once, or a fatal error once.

mod file;

pub use file::{progress_meter, write_photo, FilePresenter, PresentationError};

use crate::capture::PixelBuffer;
use crate::session::ErrorKind;
use chrono::{DateTime, Local, Utc};

/// The stylized photo and when it was taken.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// The stylized print.
    pub image: PixelBuffer,
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    /// Pairs a print with its capture time.
    pub fn new(image: PixelBuffer, captured_at: DateTime<Utc>) -> Self {
        Self { image, captured_at }
    }

    /// Dateline for the printed photo, e.g. `15 October 2026`.
    pub fn dateline(&self) -> String {
        self.captured_at
            .with_timezone(&Local)
            .format("%-d %B %Y")
            .to_string()
    }
}

/// Receives session events.
pub trait Presenter {
    /// Called on every tick with the latest smile fraction in `[0, 1]`.
    fn on_progress(&mut self, fraction: f64);

    /// Called exactly once when the photo is ready.
    fn on_capture(&mut self, photo: &CapturedPhoto);

    /// Called once when the session ends on an error.
    fn on_fatal_error(&mut self, kind: ErrorKind, message: &str);
}
