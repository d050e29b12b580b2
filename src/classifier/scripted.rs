//! Scripted classifier for demos and tests.
//!
//! Replays a fixed list of outcomes, one per call. Once the script runs
//! out every frame reports no face.

use super::{BoundingBox, Expressions, FaceDetection, FrameClassifier, OracleError};
use crate::capture::PixelBuffer;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors from parsing a classifier script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// The step is not `-`, `x` or a number.
    #[error("invalid script step '{0}'")]
    InvalidStep(String),
    /// The happiness value is outside `[0, 1]`.
    #[error("happiness {0} outside [0, 1]")]
    HappinessOutOfRange(f64),
}

/// One scripted classification outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    /// A centred face with this happiness.
    Face(f64),
    /// No face in the frame.
    NoFace,
    /// The call fails.
    Failure,
}

impl FromStr for ScriptStep {
    type Err = ScriptError;

    /// `0.9` is a face, `-` is no face, `x` is a failed call.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" => Ok(ScriptStep::NoFace),
            "x" | "X" => Ok(ScriptStep::Failure),
            other => {
                let happy: f64 = other
                    .parse()
                    .map_err(|_| ScriptError::InvalidStep(other.to_string()))?;
                if !(0.0..=1.0).contains(&happy) {
                    return Err(ScriptError::HappinessOutOfRange(happy));
                }
                Ok(ScriptStep::Face(happy))
            }
        }
    }
}

/// Parses a comma-separated script such as `0.2,-,x,0.9,0.95`.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(ScriptStep::from_str)
        .collect()
}

/// Classifier that replays a script.
#[derive(Debug, Default)]
pub struct ScriptedClassifier {
    steps: VecDeque<ScriptStep>,
    latency: Option<Duration>,
    fail_load: bool,
    loaded: bool,
    calls: u64,
}

impl ScriptedClassifier {
    /// Replays `steps` in order.
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Script of faces with the given happiness values.
    pub fn from_scores(scores: &[f64]) -> Self {
        Self::new(scores.iter().map(|&h| ScriptStep::Face(h)))
    }

    /// Delays every classification, as a slow model would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes `load` fail.
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Number of `classify` calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn detection(frame: &PixelBuffer, happy: f64) -> FaceDetection {
        let (w, h) = (frame.width() as f32, frame.height() as f32);
        FaceDetection {
            bounding_box: BoundingBox {
                x: w * 0.25,
                y: h * 0.2,
                width: w * 0.5,
                height: h * 0.6,
            },
            landmarks: Vec::new(),
            expressions: Expressions::happy(happy),
        }
    }
}

#[async_trait]
impl FrameClassifier for ScriptedClassifier {
    async fn load(&mut self) -> Result<(), OracleError> {
        if self.fail_load {
            return Err(OracleError::LoadFailed("scripted load failure".into()));
        }
        self.loaded = true;
        tracing::info!(steps = self.steps.len(), "Scripted classifier ready");
        Ok(())
    }

    async fn classify(&mut self, frame: &PixelBuffer) -> Result<Vec<FaceDetection>, OracleError> {
        if !self.loaded {
            return Err(OracleError::NotReady);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.calls += 1;

        match self.steps.pop_front().unwrap_or(ScriptStep::NoFace) {
            ScriptStep::Face(happy) => Ok(vec![Self::detection(frame, happy)]),
            ScriptStep::NoFace => Ok(Vec::new()),
            ScriptStep::Failure => Err(OracleError::ClassifyFailed(format!(
                "scripted failure on call {}",
                self.calls
            ))),
        }
    }
}
