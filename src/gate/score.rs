//! Per-tick happiness score.

/// One classifier reading, consumed by the gate and then discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScore {
    /// Happiness in `[0, 1]`; zero when no face was found.
    pub happiness: f64,
    /// Whether the classifier found a face at all.
    pub has_face: bool,
    /// Milliseconds since the session started.
    pub timestamp_ms: u64,
}

impl FrameScore {
    /// A frame with a detected face.
    ///
    /// Non-finite scores are treated as zero; the rest are clamped to `[0, 1]`.
    pub fn face(happiness: f64, timestamp_ms: u64) -> Self {
        let happiness = if happiness.is_finite() {
            happiness.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            happiness,
            has_face: true,
            timestamp_ms,
        }
    }

    /// A frame without a face, or one the classifier failed on.
    pub fn no_face(timestamp_ms: u64) -> Self {
        Self {
            happiness: 0.0,
            has_face: false,
            timestamp_ms,
        }
    }
}
