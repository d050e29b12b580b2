//! Scoped ownership of the live camera feed.

use crate::capture::{Camera, CameraError, PixelBuffer};

/// Holds an open camera and closes it exactly once: on
/// [`CameraGuard::release`] or on drop, whichever comes first.
pub struct CameraGuard<'a, C: Camera + ?Sized> {
    camera: &'a mut C,
    released: bool,
}

impl<'a, C: Camera + ?Sized> CameraGuard<'a, C> {
    /// Wraps an already opened camera.
    pub fn new(camera: &'a mut C) -> Self {
        Self {
            camera,
            released: false,
        }
    }

    /// Grabs the current frame. Fails once the feed has been released.
    pub fn capture(&mut self) -> Result<PixelBuffer, CameraError> {
        if self.released {
            return Err(CameraError::NotInitialized);
        }
        self.camera.capture()
    }

    /// Stops the feed. Later calls do nothing.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.camera.close();
            tracing::debug!("Camera feed released");
        }
    }

    /// True once the camera has been closed.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<C: Camera + ?Sized> Drop for CameraGuard<'_, C> {
    fn drop(&mut self) {
        self.release();
    }
}
