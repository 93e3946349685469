//! # Bison
//!
//! Bistatic sonar placement: choose where to put sources and receivers on a
//! gridded ocean so that every target location is detected.
//!
//! ## Overview
//!
//! A placement run moves through these stages:
//!
//! - **Grid**: an ESRI ASCII elevation raster, sub-sampled into ocean and
//!   land cells, optionally extended with uniform depth layers
//! - **Coverage**: every admissible (target, heading, source, receiver)
//!   triple is evaluated under the cookie-cutter or probabilistic detection
//!   model, including line-of-sight through ocean cells
//! - **Model**: a mixed-integer program minimizing equipment cost or
//!   maximizing the share of covered targets, either linearized or cut-only
//! - **Search**: an alternating warm-start heuristic and submodular lazy /
//!   user cuts, driven through a [`solver::SolverSession`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bison::{BisonConfig, Planner};
//!
//! let config = BisonConfig::load_default()?;
//! let planner = Planner::new(config);
//! let grid = planner.load_grid(None)?;
//! let prepared = planner.prepare(&grid)?;
//! bison::io::save_lp(&prepared.model.program, "bison.lp".as_ref())?;
//! ```
//!
//! ## Coordinate System
//!
//! - X: column index, west to east
//! - Y: row index, south to north (row 0 is the southernmost block)
//! - Z: depth layer, 0 directly below the surface

// Core types
pub mod core;

// Elevation grid and line of sight
pub mod grid;

// Unified configuration
pub mod config;

// Detection models
pub mod acoustics;

// Coverage enumeration and row aggregates
pub mod coverage;

// Optimization model
pub mod model;

// Solver session interface
pub mod solver;

// Heuristic, cuts and reports
pub mod placement;

// Grid input and LP output
pub mod io;

pub mod error;
pub mod planner;

// Re-export commonly used types
pub use core::{CancelToken, Cell, Heading};

pub use config::{BisonConfig, ConfigLoadError, DetectionModel, ObjectiveRegime};

pub use coverage::{CoverageEnumerator, DetectionKey, DetectionMap, RowSums};

pub use error::{BisonError, CoverageError, GridError, Result, SolverError};

pub use grid::OceanGrid;

pub use model::{LinearProgram, ModelBuilder, PlacementModel};

pub use placement::{AlternatingHeuristic, PlacementReport, SubmodularSeparator};

pub use planner::{Planner, PreparedModel};

pub use solver::{CutCallback, SolveOutcome, SolveStatus, SolverSession};
