//! Core types shared by every stage of the pipeline.
//!
//! - [`Cell`]: integer grid coordinate, optionally on a depth layer
//! - [`Heading`]: discretized target aspect, or the isotropic sentinel
//! - [`CancelToken`]: cooperative cancellation flag

mod cancel;
mod cell;

pub use cancel::CancelToken;
pub use cell::{Cell, Heading};
