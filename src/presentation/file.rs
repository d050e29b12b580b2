//! Presenter that writes the photo to disk.

use super::{CapturedPhoto, Presenter};
use crate::session::ErrorKind;
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Width of the text progress meter, in cells.
const METER_CELLS: usize = 20;

/// Errors writing the photo.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// The image encoder rejected the photo.
    #[error("failed to encode photo: {0}")]
    Encode(#[from] ImageError),
}

/// Renders `fraction` as `[#####...............]  25%`.
pub fn progress_meter(fraction: f64) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * METER_CELLS as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(METER_CELLS - filled),
        (fraction * 100.0).round() as u32
    )
}

/// Writes the photo; the format follows the file extension.
///
/// JPEG has no alpha channel, so it is dropped for `.jpg`/`.jpeg`.
pub fn write_photo(photo: &CapturedPhoto, path: &Path) -> Result<(), PresentationError> {
    let buffer = &photo.image;
    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.pixels().to_vec())
        .ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        })?;

    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    let image = DynamicImage::ImageRgba8(rgba);
    if is_jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)?;
    } else {
        image.save(path)?;
    }
    Ok(())
}

/// Logs progress and writes the captured photo to a file.
#[derive(Debug)]
pub struct FilePresenter {
    path: PathBuf,
    written: Option<PathBuf>,
    failure: Option<(ErrorKind, String)>,
}

impl FilePresenter {
    /// Presenter that writes the photo to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: None,
            failure: None,
        }
    }

    /// Path of the written photo, once there is one.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    /// The fatal error reported by the session, if any.
    pub fn failure(&self) -> Option<&(ErrorKind, String)> {
        self.failure.as_ref()
    }
}

impl Presenter for FilePresenter {
    fn on_progress(&mut self, fraction: f64) {
        tracing::debug!(meter = %progress_meter(fraction), "Smile");
    }

    fn on_capture(&mut self, photo: &CapturedPhoto) {
        match write_photo(photo, &self.path) {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    dateline = %photo.dateline(),
                    width = photo.image.width(),
                    height = photo.image.height(),
                    "Front page printed"
                );
                self.written = Some(self.path.clone());
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to write photo");
            }
        }
    }

    fn on_fatal_error(&mut self, kind: ErrorKind, message: &str) {
        tracing::error!(kind = %kind, "{}", message);
        self.failure = Some((kind, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelBuffer;
    use chrono::Utc;
    use image::GenericImageView;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("smile-press-{}-{}", std::process::id(), name))
    }

    fn photo() -> CapturedPhoto {
        CapturedPhoto::new(PixelBuffer::filled(6, 4, [50, 50, 50, 255]), Utc::now())
    }

    #[test]
    fn test_progress_meter() {
        assert_eq!(progress_meter(0.0), format!("[{}]   0%", ".".repeat(20)));
        assert_eq!(progress_meter(1.0), format!("[{}] 100%", "#".repeat(20)));
        assert_eq!(
            progress_meter(0.25),
            format!("[{}{}]  25%", "#".repeat(5), ".".repeat(15))
        );
        assert_eq!(progress_meter(f64::NAN), progress_meter(0.0));
    }

    #[test]
    fn test_writes_png() {
        let path = temp_path("png-roundtrip.png");
        let mut presenter = FilePresenter::new(&path);

        presenter.on_capture(&photo());
        assert_eq!(presenter.written(), Some(path.as_path()));

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 6);
        assert_eq!(decoded.height(), 4);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_writes_jpeg_without_alpha() {
        let path = temp_path("front.jpg");
        write_photo(&photo(), &path).unwrap();

        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_buffer_not_written() {
        let path = temp_path("broken.png");
        let broken = CapturedPhoto::new(PixelBuffer::new(vec![0u8; 3], 2, 2, 0), Utc::now());

        assert!(write_photo(&broken, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_records_fatal_error() {
        let mut presenter = FilePresenter::new(temp_path("unused.png"));
        presenter.on_fatal_error(ErrorKind::DeviceUnavailable, "no camera");

        assert_eq!(
            presenter.failure(),
            Some(&(ErrorKind::DeviceUnavailable, "no camera".to_string()))
        );
        assert!(presenter.written().is_none());
    }
}
