//! File formats.
//!
//! - **ESRI ASCII grids**: elevation input, sub-sampled into an [`OceanGrid`](crate::grid::OceanGrid)
//! - **CPLEX LP**: assembled placement model for an external solver
//!
//! ```rust,ignore
//! use bison::io::{load_esri_ascii, save_lp};
//! use std::path::Path;
//!
//! let grid = load_esri_ascii(Path::new("topo.asc"))?.subsample(15, 14)?;
//! save_lp(&model.program, Path::new("model.lp"))?;
//! ```

pub mod esri_ascii;
pub mod lp_format;

pub use esri_ascii::{EsriGrid, load_esri_ascii, parse_esri_ascii, read_esri_ascii};
pub use lp_format::{save_lp, to_lp_string, write_lp};
