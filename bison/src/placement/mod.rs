//! Placement search on top of a solver session.
//!
//! - [`AlternatingHeuristic`]: warm-start incumbent by alternating
//!   source/receiver sub-solves
//! - [`SubmodularSeparator`]: lazy and user cuts from the ranked
//!   submodular bound
//! - [`PlacementReport`]: selected locations, coverage and gap of a solve

mod cuts;
mod heuristic;
mod solution;

pub use cuts::{RankedItem, Role, SeparatorStats, SubmodularSeparator};
pub use heuristic::{
    AlternatingHeuristic, HeuristicOutcome, Placement, SELECTION_THRESHOLD, SweepStep,
};
pub use solution::{CutReport, PlacementReport, TargetCoverage, optimality_gap};
