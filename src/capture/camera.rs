//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, PixelBuffer};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// No camera with the requested index.
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    /// The device refused to open.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    /// The requested format was not accepted.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// A frame grab failed.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The device produced a zero-area frame.
    #[error("camera returned an empty {width}x{height} frame")]
    EmptyFrame {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },
    /// The camera is not open.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Grabs the current frame at the camera's native resolution.
    fn capture(&mut self) -> Result<PixelBuffer, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Stops the feed and releases the device. Calling it twice is a no-op.
    fn close(&mut self);
}

/// Mock camera for testing that generates synthetic RGBA frames.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
    fail_open: bool,
}

impl MockCamera {
    /// Mock camera producing a gradient test pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// A camera whose `open` always fails, as if permission were denied.
    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        if self.fail_open {
            return Err(CameraError::DeviceNotFound(format!(
                "mock device {} unavailable",
                config.device_id
            )));
        }
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(
            width = config.width,
            height = config.height,
            "MockCamera opened"
        );
        Ok(())
    }

    fn capture(&mut self) -> Result<PixelBuffer, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let (width, height) = (config.width, config.height);

        // Diagonal gradient that drifts with the sequence number
        let shift = self.sequence as usize;
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for y in 0..height as usize {
            for x in 0..width as usize {
                pixels.push(((x + shift) % 256) as u8);
                pixels.push(((y + shift) % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
                pixels.push(255);
            }
        }

        self.sequence += 1;
        Ok(PixelBuffer::new(pixels, width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        if self.config.take().is_some() {
            tracing::info!("MockCamera closed");
        }
    }
}

/// Webcam backed by `nokhwa`, decoding every frame to RGBA.
#[cfg(feature = "camera")]
pub struct NokhwaCamera {
    device: Option<nokhwa::Camera>,
    sequence: u64,
}

#[cfg(feature = "camera")]
impl NokhwaCamera {
    /// Real camera, opened lazily by `open`.
    pub fn new() -> Self {
        Self {
            device: None,
            sequence: 0,
        }
    }
}

#[cfg(feature = "camera")]
impl Default for NokhwaCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "camera")]
impl Camera for NokhwaCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        use nokhwa::pixel_format::RgbAFormat;
        use nokhwa::utils::{
            CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
            Resolution,
        };

        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let wanted = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::MJPEG,
            config.fps,
        );
        let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(wanted));
        let mut device = nokhwa::Camera::new(CameraIndex::Index(config.device_id), format)
            .map_err(|e| CameraError::DeviceNotFound(e.to_string()))?;
        device
            .open_stream()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        let resolution = device.resolution();
        tracing::info!(
            device_id = config.device_id,
            width = resolution.width(),
            height = resolution.height(),
            "Camera stream opened"
        );

        self.device = Some(device);
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<PixelBuffer, CameraError> {
        use nokhwa::pixel_format::RgbAFormat;

        let device = self.device.as_mut().ok_or(CameraError::NotInitialized)?;
        let raw = device
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = raw
            .decode_image::<RgbAFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        self.sequence += 1;
        Ok(PixelBuffer::new(
            decoded.into_raw(),
            width,
            height,
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.stop_stream() {
                tracing::warn!(error = %e, "Failed to stop camera stream cleanly");
            }
            tracing::info!("Camera stream closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.width(), config.width);
        assert_eq!(frame.sequence(), 1);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());

        // Second close is a no-op
        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(
            camera.capture(),
            Err(CameraError::NotInitialized)
        ));
    }

    #[test]
    fn test_capture_after_close() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::default()).unwrap();
        camera.close();

        assert!(matches!(
            camera.capture(),
            Err(CameraError::NotInitialized)
        ));
    }

    #[test]
    fn test_unavailable_camera() {
        let mut camera = MockCamera::unavailable();
        assert!(matches!(
            camera.open(&CaptureConfig::default()),
            Err(CameraError::DeviceNotFound(_))
        ));
        assert!(!camera.is_open());
    }

    #[test]
    fn test_frames_are_opaque() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::with_dimensions(8, 4)).unwrap();

        let frame = camera.capture().unwrap();
        assert!(frame.pixels().chunks_exact(4).all(|p| p[3] == 255));
    }
}
