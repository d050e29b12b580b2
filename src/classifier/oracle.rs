//! Face expression classifier interface.

use crate::capture::PixelBuffer;
use crate::gate::FrameScore;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a classifier.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The model could not be loaded.
    #[error("classifier model failed to load: {0}")]
    LoadFailed(String),
    /// `classify` was called before `load`.
    #[error("classifier not ready")]
    NotReady,
    /// A single classification failed.
    #[error("classification failed: {0}")]
    ClassifyFailed(String),
}

/// Axis-aligned face box in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

/// Per-expression probabilities for one face, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expressions {
    /// Neutral expression.
    pub neutral: f64,
    /// Smile probability, the score the gate uses.
    pub happy: f64,
    /// Sad expression.
    pub sad: f64,
    /// Angry expression.
    pub angry: f64,
    /// Fearful expression.
    pub fearful: f64,
    /// Disgusted expression.
    pub disgusted: f64,
    /// Surprised expression.
    pub surprised: f64,
}

impl Expressions {
    /// Expressions for a face that is `happy` and otherwise neutral.
    pub fn happy(happy: f64) -> Self {
        Self {
            happy,
            neutral: (1.0 - happy).max(0.0),
            ..Default::default()
        }
    }
}

/// One detected face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceDetection {
    /// Where the face is.
    pub bounding_box: BoundingBox,
    /// Facial landmark points in frame pixels.
    pub landmarks: Vec<(f32, f32)>,
    /// Expression probabilities for the face.
    pub expressions: Expressions,
}

/// An external model that finds faces and scores their expressions.
///
/// Calls are issued one at a time; the session awaits each
/// classification before starting the next.
#[async_trait]
pub trait FrameClassifier: Send {
    /// Prepares the model. Failure here ends the session.
    async fn load(&mut self) -> Result<(), OracleError>;

    /// Detects faces in `frame`. An empty result means no face.
    async fn classify(&mut self, frame: &PixelBuffer) -> Result<Vec<FaceDetection>, OracleError>;
}

/// Reduces a classification to a gate score.
///
/// Only the first detection's happiness is read.
pub fn score_detections(detections: &[FaceDetection], timestamp_ms: u64) -> FrameScore {
    match detections.first() {
        Some(face) => FrameScore::face(face.expressions.happy, timestamp_ms),
        None => FrameScore::no_face(timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_detection_wins() {
        let faces = vec![
            FaceDetection {
                expressions: Expressions::happy(0.3),
                ..Default::default()
            },
            FaceDetection {
                expressions: Expressions::happy(0.99),
                ..Default::default()
            },
        ];

        let score = score_detections(&faces, 500);
        assert!(score.has_face);
        assert_eq!(score.happiness, 0.3);
        assert_eq!(score.timestamp_ms, 500);
    }

    #[test]
    fn test_empty_is_no_face() {
        let score = score_detections(&[], 0);
        assert!(!score.has_face);
        assert_eq!(score.happiness, 0.0);
    }
}
