//! Ocean grid and visibility.
//!
//! - [`OceanGrid`]: sub-sampled elevation samples with the ocean mask,
//!   optionally extended to uniform depth layers
//! - [`BresenhamLine`]: integer traversal between two cells (2-D or 3-D)
//! - [`line_of_sight`]: clear/blocked test built on the traversal

mod line_of_sight;
mod ocean;

pub use line_of_sight::{BresenhamLine, line_of_sight};
pub use ocean::OceanGrid;
