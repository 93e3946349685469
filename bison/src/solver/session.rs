//! Trait for a live MILP solver session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SolveMode;
use crate::error::SolverError;
use crate::model::{Constraint, LinearProgram, VarId};

use super::CutCallback;

/// Termination status of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal
    Optimal,
    /// Time limit reached with an incumbent
    TimeLimitFeasible,
    /// Time limit reached without an incumbent
    TimeLimitNoSolution,
    /// Proven infeasible
    Infeasible,
}

impl SolveStatus {
    /// Does the outcome carry a usable solution?
    #[inline]
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::TimeLimitFeasible)
    }
}

/// Result of one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    /// Termination status
    pub status: SolveStatus,
    /// Incumbent objective (when a solution exists)
    pub objective: Option<f64>,
    /// Best proven bound
    pub best_bound: Option<f64>,
    /// Variable values indexed by [`VarId`] (empty without a solution)
    pub values: Vec<f64>,
}

impl SolveOutcome {
    /// Value of a variable, 0 when absent.
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }
}

/// Limits applied to subsequent solves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveLimits {
    /// Wall-clock limit, `None` for unlimited
    pub time_limit: Option<Duration>,
    /// How far the solver should go
    pub mode: SolveMode,
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            time_limit: None,
            mode: SolveMode::Complete,
        }
    }
}

/// Convert a time limit in seconds, rejecting negative, NaN and overflowing values.
pub fn time_limit(secs: f64) -> Result<Duration, SolverError> {
    Duration::try_from_secs_f64(secs).map_err(|_| SolverError::InvalidTimeLimit(secs))
}

/// A live optimization session.
///
/// Bounds are the only model state the heuristic mutates; it fixes and
/// frees binaries between solves. Implementations must invoke lazy
/// callbacks on every candidate incumbent and may invoke user callbacks on
/// fractional relaxation points.
///
/// # Example
///
/// ```ignore
/// use bison::solver::SolverSession;
///
/// fn solve_once<S: SolverSession>(session: &mut S, program: &LinearProgram) -> Option<f64> {
///     session.load(program).ok()?;
///     let outcome = session.solve(&mut []).ok()?;
///     outcome.objective
/// }
/// ```
pub trait SolverSession {
    /// Replace the session's model.
    fn load(&mut self, program: &LinearProgram) -> Result<(), SolverError>;

    /// Append a constraint to the loaded model.
    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SolverError>;

    /// Change the bounds of a variable.
    fn set_bounds(&mut self, var: VarId, lower: f64, upper: f64) -> Result<(), SolverError>;

    /// Set limits for subsequent solves.
    fn set_limits(&mut self, limits: SolveLimits) -> Result<(), SolverError>;

    /// Solve the loaded model, consulting the callbacks.
    fn solve(
        &mut self,
        callbacks: &mut [&mut dyn CutCallback],
    ) -> Result<SolveOutcome, SolverError>;

    /// Name of the backend for logging
    fn name(&self) -> &str;
}
