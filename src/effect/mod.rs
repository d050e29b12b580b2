//! Image effects applied to the captured photo.
//!
//! Currently a single effect: the two-band "newspaper" print. Every
//! random draw goes through an injected [`RandomSource`].

mod newspaper;
mod random;

pub use newspaper::{luma, NewspaperEffect, NewspaperParams, TransformError, LUMA_WEIGHTS};
pub use random::{FixedSource, RandomSource, RngSource};
