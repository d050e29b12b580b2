//! One-shot capture pipeline.
//!
//! Runs once, after the gate fires: snapshot the current frame at its
//! native resolution, stylize it, stop the feed, hand the result to the
//! presenter. The feed is stopped on every path, failures included.

use super::{CameraGuard, SessionError};
use crate::capture::{Camera, CameraError, PixelBuffer};
use crate::effect::{NewspaperEffect, RandomSource};
use crate::presentation::{CapturedPhoto, Presenter};
use chrono::Utc;

/// Snapshot, stylize, release, present.
#[derive(Debug, Clone, Default)]
pub struct CapturePipeline {
    effect: NewspaperEffect,
}

impl CapturePipeline {
    /// Pipeline that applies `effect` to the snapshot.
    pub fn new(effect: NewspaperEffect) -> Self {
        Self { effect }
    }

    /// The print effect.
    pub fn effect(&self) -> &NewspaperEffect {
        &self.effect
    }

    /// Runs the pipeline. No retry on failure.
    pub fn run<C, R, P>(
        &self,
        camera: &mut CameraGuard<'_, C>,
        rng: &mut R,
        presenter: &mut P,
    ) -> Result<CapturedPhoto, SessionError>
    where
        C: Camera + ?Sized,
        R: RandomSource + ?Sized,
        P: Presenter + ?Sized,
    {
        let stylized = self.snapshot_and_stylize(camera, rng);
        camera.release();
        let image = stylized?;

        let photo = CapturedPhoto::new(image, Utc::now());
        tracing::info!(
            width = photo.image.width(),
            height = photo.image.height(),
            digest = %photo.image.digest(),
            "Photo captured"
        );
        presenter.on_capture(&photo);
        Ok(photo)
    }

    fn snapshot_and_stylize<C, R>(
        &self,
        camera: &mut CameraGuard<'_, C>,
        rng: &mut R,
    ) -> Result<PixelBuffer, SessionError>
    where
        C: Camera + ?Sized,
        R: RandomSource + ?Sized,
    {
        let frame = camera.capture().map_err(SessionError::CaptureFailed)?;
        if frame.is_empty() {
            return Err(SessionError::CaptureFailed(CameraError::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            }));
        }

        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            sequence = frame.sequence(),
            "Snapshot taken"
        );

        Ok(self.effect.apply(&frame, rng)?)
    }
}
