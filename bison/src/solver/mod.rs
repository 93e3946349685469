//! Solver session interface.
//!
//! The MILP solver itself is an external collaborator. Everything in the
//! crate that needs one talks to it through [`SolverSession`], and supplies
//! separation routines through [`CutCallback`].

mod callbacks;
mod session;

pub use callbacks::{Candidate, Cut, CutCallback, CutKind};
pub use session::{SolveLimits, SolveOutcome, SolveStatus, SolverSession, time_limit};
