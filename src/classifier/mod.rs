//! Face expression classification.
//!
//! The model itself lives outside this crate. This module defines the
//! seam it plugs into and a scripted stand-in.

mod oracle;
mod scripted;

pub use oracle::{
    score_detections, BoundingBox, Expressions, FaceDetection, FrameClassifier, OracleError,
};
pub use scripted::{parse_script, ScriptError, ScriptStep, ScriptedClassifier};
