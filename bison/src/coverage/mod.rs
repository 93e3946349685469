//! Coverage geometry: which (source, receiver) pairs detect which targets.
//!
//! - [`CoverageEnumerator`]: evaluates every admissible triple in parallel
//!   and collects the sparse [`DetectionMap`]
//! - [`RowSums`]: per-row aggregates of the map and the bound policy used by
//!   the linearization

mod detection_map;
mod enumerator;
mod row_sums;

pub use detection_map::{DetectionKey, DetectionMap, PairEntry};
pub use enumerator::{CoverageEnumerator, EnumerationStats};
pub use row_sums::{RowKey, RowSums};
