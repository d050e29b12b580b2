//! RGBA pixel buffer representing a captured video frame.

use std::time::Instant;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A row-major RGBA image, `width * height` pixels.
///
/// Used both for frames grabbed from the camera and for the
/// stylized output of the newspaper effect.
#[derive(Clone)]
pub struct PixelBuffer {
    /// Interleaved RGBA bytes.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Instant the frame was grabbed.
    timestamp: Instant,
    /// Monotonic sequence number assigned by the camera.
    sequence: u64,
}

impl PixelBuffer {
    /// Creates a new buffer with the given parameters.
    ///
    /// The byte length is not checked here; see [`PixelBuffer::is_valid`].
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a buffer filled with a single RGBA colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        let pixels = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(pixels, width, height, 0)
    }

    /// Returns the raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the buffer, returning the raw RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Capture sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the byte length the dimensions call for.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * CHANNELS
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Validates that the byte length matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }

    /// Returns the RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        self.pixels
            .get(offset..offset + CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// BLAKE3 digest of the pixel bytes and dimensions, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&self.pixels);
        hasher.finalize().to_hex().to_string()
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
