//! Mixed-integer placement model.
//!
//! - [`linear`]: solver-agnostic program representation
//! - [`ModelBuilder`]: turns the detection map and row sums into a
//!   [`PlacementModel`] for either formulation

mod builder;
pub mod linear;

pub use builder::{ModelBuilder, PlacementModel, VariableLayout, cell_tag};
pub use linear::{
    Constraint, Domain, LinearExpr, LinearProgram, Objective, ObjectiveSense, Sense, VarId,
    Variable,
};
