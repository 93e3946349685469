//! Unified configuration loading for a placement run.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//! The resulting [`BisonConfig`] is immutable and handed to each stage.
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`GridSection`] | Elevation input, sub-sampling, depth layers |
//! | [`EquipmentSection`] | Objective regime, costs or counts |
//! | [`DetectionSection`] | Detection model, ranges, target strength |
//! | [`OptimizationSection`] | Formulation, bound policy, cuts, solve mode |
//! | [`HeuristicSection`] | Warm-start rounds, seed, time budget |
//! | [`LimitsSection`] | Overall time limit |
//!
//! ## Example YAML
//!
//! ```yaml
//! grid:
//!   input: Instances/WonsanBay/topo.asc
//!   cells_x: 15
//!   cells_y: 14
//!
//! equipment:
//!   objective: maximize_coverage
//!   source_count: 2
//!   receiver_count: 2
//!
//! detection:
//!   model: cookie_cutter
//!   rho_0: 4.0
//!   pulse_length: 0.4
//!   target_strength: [[0.0, 0.1], [30.0, 0.4], [75.0, 0.3], [90.0, 1.0]]
//!   heading_step: 30
//!
//! heuristic:
//!   rounds: 50
//!   seed: 7
//! ```

mod bison;
mod defaults;
mod detection;
mod equipment;
mod error;
mod grid;
mod optimization;

// Re-export main types
pub use bison::BisonConfig;
pub use error::ConfigLoadError;

// Re-export section types
pub use detection::{DetectionModel, DetectionSection};
pub use equipment::{EquipmentSection, ObjectiveRegime};
pub use grid::{DepthLayerSettings, GridSection};
pub use optimization::{
    BoundPolicy, Formulation, HeuristicSection, LimitsSection, OptimizationSection, SolveMode,
};
