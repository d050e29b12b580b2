//! Smile session polling loop.
//!
//! Loads the classifier, opens the camera, then on every tick grabs a
//! frame, awaits its classification and feeds the score to the gate.
//! Classifications never overlap: a slow call delays the next tick.
//! When the gate fires the capture pipeline runs once and the session
//! ends, successful or not.

use super::{CameraGuard, CapturePipeline, SessionError};
use crate::capture::{Camera, CaptureConfig, ConfigError, FileConfig};
use crate::classifier::{score_detections, FrameClassifier};
use crate::effect::{NewspaperEffect, RandomSource};
use crate::gate::{FrameScore, GateAction, SmileGate};
use crate::metrics::{MetricsRegistry, MetricsSnapshot};
use crate::presentation::{CapturedPhoto, Presenter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// How a session ended without error.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The photo was taken and presented.
    Captured(CapturedPhoto),
    /// Shutdown was requested before a smile was seen.
    Cancelled,
}

/// One camera, one gate, one capture.
pub struct Session<C, O, P> {
    camera: C,
    classifier: O,
    presenter: P,
    capture_config: CaptureConfig,
    gate: SmileGate,
    pipeline: CapturePipeline,
    shutdown: Arc<AtomicBool>,
    metrics: Option<Arc<MetricsRegistry>>,
    stats: MetricsSnapshot,
}

impl<C, O, P> Session<C, O, P>
where
    C: Camera,
    O: FrameClassifier,
    P: Presenter,
{
    /// Builds a session. Fails if any section of `config` is invalid.
    pub fn new(
        camera: C,
        classifier: O,
        presenter: P,
        config: &FileConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera,
            classifier,
            presenter,
            capture_config: config.capture.clone(),
            gate: SmileGate::new(config.gate.clone())?,
            pipeline: CapturePipeline::new(NewspaperEffect::new(config.effect.clone())),
            shutdown: Arc::new(AtomicBool::new(false)),
            metrics: None,
            stats: MetricsSnapshot::default(),
        })
    }

    /// Shares a flag that cancels the loop when set.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Publishes per-tick statistics to `registry`.
    pub fn with_metrics(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(registry);
        self
    }

    /// The camera, for inspection after a run.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// The classifier, for inspection after a run.
    pub fn classifier(&self) -> &O {
        &self.classifier
    }

    /// The presenter, for inspection after a run.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Totals gathered so far.
    pub fn stats(&self) -> &MetricsSnapshot {
        &self.stats
    }

    /// Runs the session to completion.
    ///
    /// Any error is reported to the presenter once before it is returned.
    /// The camera is closed on every exit path.
    pub async fn run<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<SessionOutcome, SessionError> {
        let result = self.run_inner(rng).await;

        match &result {
            Ok(SessionOutcome::Captured(_)) => self.stats.captures += 1,
            Ok(SessionOutcome::Cancelled) => tracing::info!("Session cancelled"),
            Err(e) => {
                if e.is_capture_error() {
                    self.stats.capture_failures += 1;
                }
                tracing::error!(kind = %e.kind(), error = %e, "Session failed");
                self.presenter.on_fatal_error(e.kind(), &e.to_string());
            }
        }
        self.publish();

        result
    }

    async fn run_inner<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<SessionOutcome, SessionError> {
        self.classifier
            .load()
            .await
            .map_err(SessionError::OracleUnavailable)?;
        tracing::info!("Classifier ready");

        self.camera
            .open(&self.capture_config)
            .map_err(SessionError::DeviceUnavailable)?;
        let mut camera = CameraGuard::new(&mut self.camera);

        let mut gate = self.gate.clone();
        let gate_config = gate.config().clone();
        let started = Instant::now();
        let mut ticker = interval(gate_config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            threshold = gate_config.smile_probability_threshold,
            required = gate_config.required_consecutive_frames,
            poll_interval_ms = gate_config.poll_interval_ms,
            "Watching for a smile"
        );

        loop {
            ticker.tick().await;

            if self.shutdown.load(Ordering::SeqCst) {
                return Ok(SessionOutcome::Cancelled);
            }

            let timestamp_ms = started.elapsed().as_millis() as u64;
            let score = match camera.capture() {
                Ok(frame) => match self.classifier.classify(&frame).await {
                    Ok(detections) => score_detections(&detections, timestamp_ms),
                    Err(e) => {
                        tracing::warn!(error = %e, "Classification failed, scoring as no face");
                        self.stats.oracle_failures += 1;
                        FrameScore::no_face(timestamp_ms)
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Frame grab failed, scoring as no face");
                    FrameScore::no_face(timestamp_ms)
                }
            };

            let action = gate.observe(&score);
            let progress = gate.progress_fraction();
            self.presenter.on_progress(progress);

            self.stats.ticks += 1;
            if !score.has_face {
                self.stats.no_face_ticks += 1;
            }
            self.stats.credit = gate.credit();
            self.stats.happiness = progress;
            if let Some(metrics) = &self.metrics {
                metrics.update(&self.stats);
            }

            tracing::debug!(
                timestamp_ms,
                happiness = score.happiness,
                has_face = score.has_face,
                credit = gate.credit(),
                "Tick"
            );

            if action == GateAction::Capture {
                break;
            }
        }

        let photo = self.pipeline.run(&mut camera, rng, &mut self.presenter)?;
        Ok(SessionOutcome::Captured(photo))
    }

    fn publish(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.update(&self.stats);
        }
    }
}
