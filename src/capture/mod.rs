//! Camera input and frame handling.
//!
//! This module provides abstractions for grabbing RGBA frames from a
//! camera and for the session configuration file. The live feed is
//! opened once per session and stopped exactly once.

mod camera;
mod config;
mod frame;

#[cfg(feature = "camera")]
pub use camera::NokhwaCamera;
pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig};
pub use frame::{PixelBuffer, CHANNELS};
