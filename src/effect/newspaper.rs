//! Newspaper print effect.
//!
//! Each pixel is reduced to BT.601 luma, jittered with uniform noise and
//! pushed into one of two bands: near-white or near-black. Pixels are
//! independent of each other, which gives a grainy halftone look rather
//! than an error-diffusion dither pattern.

use super::RandomSource;
use crate::capture::{ConfigError, PixelBuffer, CHANNELS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// BT.601 luma weights for red, green and blue.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Errors raised by the effect.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The buffer length does not match its dimensions.
    #[error("pixel buffer holds {actual} bytes but {width}x{height} RGBA needs {expected}")]
    DimensionMismatch {
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Bytes the dimensions need.
        expected: usize,
        /// Bytes in the buffer.
        actual: usize,
    },
}

/// Tunables for the effect. The defaults reproduce the classic look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewspaperParams {
    /// Noisy luma strictly above this lands in the bright band.
    pub luma_threshold: f64,
    /// Luma noise is drawn from `[-noise_amplitude, noise_amplitude)`.
    pub noise_amplitude: f64,
    /// Lower edge of the bright band.
    pub bright_base: f64,
    /// Upper edge of the dark band.
    pub dark_base: f64,
    /// Width of each band.
    pub band_jitter: f64,
}

impl Default for NewspaperParams {
    fn default() -> Self {
        Self {
            luma_threshold: 128.0,
            noise_amplitude: 20.0,
            bright_base: 220.0,
            dark_base: 50.0,
            band_jitter: 20.0,
        }
    }
}

impl NewspaperParams {
    /// Validates that both bands fit in a byte and do not overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            self.luma_threshold,
            self.noise_amplitude,
            self.bright_base,
            self.dark_base,
            self.band_jitter,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidEffect("values must be finite".into()));
        }
        if self.noise_amplitude < 0.0 || self.band_jitter < 0.0 {
            return Err(ConfigError::InvalidEffect(
                "noise and jitter must be non-negative".into(),
            ));
        }
        let (dark_low, _) = self.dark_band();
        let (_, bright_high) = self.bright_band();
        if dark_low < 0.0 || bright_high > 255.0 {
            return Err(ConfigError::InvalidEffect(format!(
                "bands [{dark_low}, {bright_high}] exceed [0, 255]"
            )));
        }
        if self.dark_base >= self.bright_base {
            return Err(ConfigError::InvalidEffect(
                "dark band must sit below bright band".into(),
            ));
        }
        Ok(())
    }

    /// Inclusive luma range of the dark band.
    pub fn dark_band(&self) -> (f64, f64) {
        (self.dark_base - self.band_jitter, self.dark_base)
    }

    /// Inclusive luma range of the bright band.
    pub fn bright_band(&self) -> (f64, f64) {
        (self.bright_base, self.bright_base + self.band_jitter)
    }
}

/// BT.601 luma of an RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_WEIGHTS[0] * r as f64 + LUMA_WEIGHTS[1] * g as f64 + LUMA_WEIGHTS[2] * b as f64
}

/// Applies the newspaper effect to RGBA frames.
#[derive(Debug, Clone, Default)]
pub struct NewspaperEffect {
    params: NewspaperParams,
}

impl NewspaperEffect {
    /// Effect with the given parameters.
    pub fn new(params: NewspaperParams) -> Self {
        Self { params }
    }

    /// The parameters in use.
    pub fn params(&self) -> &NewspaperParams {
        &self.params
    }

    /// Returns a stylized copy of `input`; the input is left untouched.
    ///
    /// Output has the same dimensions, equal R, G and B per pixel, and
    /// the input's alpha. Fails only when the byte length does not match
    /// the dimensions.
    pub fn apply<R: RandomSource + ?Sized>(
        &self,
        input: &PixelBuffer,
        rng: &mut R,
    ) -> Result<PixelBuffer, TransformError> {
        if !input.is_valid() {
            return Err(TransformError::DimensionMismatch {
                width: input.width(),
                height: input.height(),
                expected: input.expected_len(),
                actual: input.pixels().len(),
            });
        }

        let mut output = Vec::with_capacity(input.pixels().len());
        for px in input.pixels().chunks_exact(CHANNELS) {
            let value = self.quantize(luma(px[0], px[1], px[2]), rng);
            output.extend_from_slice(&[value, value, value, px[3]]);
        }

        tracing::debug!(
            width = input.width(),
            height = input.height(),
            sequence = input.sequence(),
            "Applied newspaper effect"
        );

        Ok(PixelBuffer::new(
            output,
            input.width(),
            input.height(),
            input.sequence(),
        ))
    }

    /// Maps one luma value to a band value.
    fn quantize<R: RandomSource + ?Sized>(&self, luma: f64, rng: &mut R) -> u8 {
        let p = &self.params;
        let noisy = luma + rng.uniform(-p.noise_amplitude, p.noise_amplitude);

        let value = if noisy > p.luma_threshold {
            p.bright_base + rng.uniform(0.0, p.band_jitter)
        } else {
            p.dark_base - rng.uniform(0.0, p.band_jitter)
        };

        value.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{FixedSource, RngSource};
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v.wrapping_mul(3), v.wrapping_add(40), (i % 7) as u8 * 30]
            })
            .collect();
        PixelBuffer::new(pixels, width, height, 9)
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(0, 0, 0), 0.0);
        assert!((luma(255, 255, 255) - 255.0).abs() < 1e-9);
        assert!((luma(100, 0, 0) - 29.9).abs() < 1e-9);
        assert!((luma(0, 100, 0) - 58.7).abs() < 1e-9);
        assert!((luma(0, 0, 100) - 11.4).abs() < 1e-9);
    }

    #[test]
    fn test_mid_gray_lands_in_dark_band() {
        let input = PixelBuffer::filled(16, 9, [127, 127, 127, 255]);
        let output = NewspaperEffect::default()
            .apply(&input, &mut FixedSource(0.0))
            .unwrap();

        assert!(output.pixels().chunks_exact(4).all(|p| p == [50, 50, 50, 255]));
    }

    #[test]
    fn test_light_gray_lands_in_bright_band() {
        let input = PixelBuffer::filled(4, 4, [129, 129, 129, 200]);
        let output = NewspaperEffect::default()
            .apply(&input, &mut FixedSource(0.0))
            .unwrap();

        assert!(output.pixels().chunks_exact(4).all(|p| p == [220, 220, 220, 200]));
    }

    #[test]
    fn test_threshold_is_strict() {
        // Black has an exact luma of zero
        let effect = NewspaperEffect::new(NewspaperParams {
            luma_threshold: 0.0,
            ..Default::default()
        });
        let input = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let output = effect.apply(&input, &mut FixedSource(0.0)).unwrap();

        assert_eq!(output.pixel(0, 0), Some([50, 50, 50, 255]));
    }

    #[test]
    fn test_preserves_shape_and_alpha() {
        let input = gradient(37, 11);
        let output = NewspaperEffect::default()
            .apply(&input, &mut RngSource::seeded(1))
            .unwrap();

        assert_eq!(output.width(), input.width());
        assert_eq!(output.height(), input.height());
        assert!(output.is_valid());

        for (src, dst) in input
            .pixels()
            .chunks_exact(4)
            .zip(output.pixels().chunks_exact(4))
        {
            assert_eq!(dst[0], dst[1]);
            assert_eq!(dst[1], dst[2]);
            assert_eq!(dst[3], src[3]);
        }
    }

    #[test]
    fn test_seeded_runs_match() {
        let input = gradient(64, 48);
        let effect = NewspaperEffect::default();

        let a = effect.apply(&input, &mut RngSource::seeded(2024)).unwrap();
        let b = effect.apply(&input, &mut RngSource::seeded(2024)).unwrap();
        let c = effect.apply(&input, &mut RngSource::seeded(2025)).unwrap();

        assert_eq!(a.pixels(), b.pixels());
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.pixels(), c.pixels());
    }

    #[test]
    fn test_input_untouched() {
        let input = gradient(8, 8);
        let before = input.pixels().to_vec();
        NewspaperEffect::default()
            .apply(&input, &mut RngSource::seeded(3))
            .unwrap();

        assert_eq!(input.pixels(), before.as_slice());
    }

    #[test]
    fn test_dimension_mismatch() {
        let input = PixelBuffer::new(vec![0u8; 10], 2, 2, 1);
        let result = NewspaperEffect::default().apply(&input, &mut FixedSource(0.0));

        assert!(matches!(
            result,
            Err(TransformError::DimensionMismatch {
                expected: 16,
                actual: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_frame_is_valid() {
        let input = PixelBuffer::new(Vec::new(), 0, 0, 1);
        let output = NewspaperEffect::default()
            .apply(&input, &mut FixedSource(0.0))
            .unwrap();
        assert!(output.pixels().is_empty());
    }

    #[test]
    fn test_params_validation() {
        assert!(NewspaperParams::default().validate().is_ok());

        let params = NewspaperParams {
            bright_base: 240.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = NewspaperParams {
            dark_base: 230.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_output_within_bands(
            seed in any::<u64>(),
            pixels in proptest::collection::vec(any::<[u8; 4]>(), 1..256),
        ) {
            let width = pixels.len() as u32;
            let input = PixelBuffer::new(pixels.concat(), width, 1, 0);
            let output = NewspaperEffect::default()
                .apply(&input, &mut RngSource::seeded(seed))
                .unwrap();

            for (src, dst) in input.pixels().chunks_exact(4).zip(output.pixels().chunks_exact(4)) {
                prop_assert!((30..=240).contains(&dst[0]));
                prop_assert!(dst[0] == dst[1] && dst[1] == dst[2]);
                prop_assert_eq!(dst[3], src[3]);
            }
        }

        #[test]
        fn prop_extremes_pick_their_band(seed in any::<u64>()) {
            let effect = NewspaperEffect::default();
            let mut rng = RngSource::seeded(seed);

            // Noise is at most 20, so black and white can never flip
            let black = effect.apply(&PixelBuffer::filled(8, 8, [0, 0, 0, 255]), &mut rng).unwrap();
            let white = effect.apply(&PixelBuffer::filled(8, 8, [255, 255, 255, 255]), &mut rng).unwrap();

            prop_assert!(black.pixels().chunks_exact(4).all(|p| (30..=50).contains(&p[0])));
            prop_assert!(white.pixels().chunks_exact(4).all(|p| (220..=240).contains(&p[0])));
        }
    }
}
