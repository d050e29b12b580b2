//! Session-ending errors.

use crate::capture::CameraError;
use crate::classifier::OracleError;
use crate::effect::TransformError;
use std::fmt;
use thiserror::Error;

/// Category of a session-ending error, as shown to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No camera permission or no compatible device.
    DeviceUnavailable,
    /// The classifier model never became ready.
    OracleUnavailable,
    /// The snapshot could not be taken.
    CaptureFailed,
    /// The snapshot could not be stylized.
    TransformFailed,
}

impl ErrorKind {
    /// Stable snake_case name, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceUnavailable => "device_unavailable",
            Self::OracleUnavailable => "oracle_unavailable",
            Self::CaptureFailed => "capture_failed",
            Self::TransformFailed => "transform_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end a session. None of them are retried.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The camera could not be opened.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(#[source] CameraError),

    /// The classifier failed to load.
    #[error("classifier unavailable: {0}")]
    OracleUnavailable(#[source] OracleError),

    /// The snapshot after the trigger failed.
    #[error("capture failed: {0}")]
    CaptureFailed(#[source] CameraError),

    /// The effect rejected the snapshot.
    #[error("transform failed: {0}")]
    TransformFailed(#[from] TransformError),
}

impl SessionError {
    /// The kind reported to the presenter.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DeviceUnavailable(_) => ErrorKind::DeviceUnavailable,
            Self::OracleUnavailable(_) => ErrorKind::OracleUnavailable,
            Self::CaptureFailed(_) => ErrorKind::CaptureFailed,
            Self::TransformFailed(_) => ErrorKind::TransformFailed,
        }
    }

    /// True for errors raised after the gate fired.
    pub fn is_capture_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CaptureFailed | ErrorKind::TransformFailed
        )
    }
}
