//! Single-triple detection physics.
//!
//! - [`TargetStrength`]: piecewise-linear range bonus as a function of the
//!   bistatic aspect
//! - [`DetectionPredicate`]: cookie-cutter or probabilistic test of one
//!   (target, heading, source, receiver) combination

mod detection;
mod target_strength;

pub use detection::{DetectionPredicate, Rejection, Verdict};
pub use target_strength::TargetStrength;
