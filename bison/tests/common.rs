//! Test utilities for placement runs.
//!
//! [`EnumerativeSession`] is a test-only [`SolverSession`] that enumerates
//! every binary assignment of tiny models. It exists to check models, cuts
//! and the heuristic against exhaustive answers; it is not a MILP solver.

#![allow(dead_code)]

use bison::config::{BisonConfig, DetectionModel, ObjectiveRegime};
use bison::error::SolverError;
use bison::model::{Constraint, Domain, LinearProgram, Sense, VarId};
use bison::solver::{
    Candidate, CutCallback, CutKind, SolveLimits, SolveOutcome, SolveStatus, SolverSession,
};
use bison::OceanGrid;

const FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Brute-force session over all binary assignments within bounds.
#[derive(Default)]
pub struct EnumerativeSession {
    program: Option<LinearProgram>,
    bounds: Vec<(f64, f64)>,
    /// Limits received through `set_limits`, in order
    pub limits: Vec<SolveLimits>,
    /// Number of `solve` calls
    pub solves: usize,
    /// Lazy cuts accepted into the model
    pub lazy_cuts: usize,
    /// User cuts accepted into the model
    pub user_cuts: usize,
    /// Fail every `solve` call with this index (0-based) with a backend error
    pub fail_on: Vec<usize>,
}

impl EnumerativeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self, var: VarId) -> (f64, f64) {
        self.bounds[var.0]
    }

    pub fn constraint_count(&self) -> usize {
        self.program.as_ref().map_or(0, |p| p.constraints.len())
    }
}

/// Continuous variable with its own constraints and preferred direction.
struct ContinuousPlan {
    var: usize,
    own: Vec<usize>,
    prefers_upper: bool,
}

fn plan_continuous(program: &LinearProgram) -> Vec<ContinuousPlan> {
    let continuous: Vec<bool> = program
        .variables
        .iter()
        .map(|v| v.domain == Domain::Continuous)
        .collect();
    let mut plans = Vec::new();
    for (var, is_continuous) in continuous.iter().enumerate() {
        if !is_continuous {
            continue;
        }
        let mut own = Vec::new();
        let mut score = 0.0;
        for (index, constraint) in program.constraints.iter().enumerate() {
            let Some(&coef) = constraint.expr.terms.get(&VarId(var)) else {
                continue;
            };
            let others = constraint
                .expr
                .terms
                .keys()
                .filter(|id| id.0 != var && continuous[id.0])
                .count();
            if others == 0 {
                own.push(index);
            } else {
                match constraint.sense {
                    Sense::Ge => score += coef,
                    Sense::Le => score -= coef,
                    Sense::Eq => {}
                }
            }
        }
        plans.push(ContinuousPlan {
            var,
            own,
            prefers_upper: score > 0.0,
        });
    }
    plans
}

/// Set continuous values for fixed binaries; false if some interval is empty.
fn resolve_continuous(
    program: &LinearProgram,
    bounds: &[(f64, f64)],
    plans: &[ContinuousPlan],
    values: &mut [f64],
) -> bool {
    for plan in plans {
        let (mut lo, mut hi) = bounds[plan.var];
        values[plan.var] = 0.0;
        for &index in &plan.own {
            let constraint = &program.constraints[index];
            let coef = constraint.expr.terms[&VarId(plan.var)];
            let limit = (constraint.rhs - constraint.expr.evaluate(values)) / coef;
            match (constraint.sense, coef > 0.0) {
                (Sense::Ge, true) | (Sense::Le, false) => lo = lo.max(limit),
                (Sense::Ge, false) | (Sense::Le, true) => hi = hi.min(limit),
                (Sense::Eq, _) => {
                    lo = lo.max(limit);
                    hi = hi.min(limit);
                }
            }
        }
        if lo > hi + FEASIBILITY_TOLERANCE {
            return false;
        }
        values[plan.var] = if plan.prefers_upper { hi } else { lo.min(hi) };
    }
    true
}

impl SolverSession for EnumerativeSession {
    fn load(&mut self, program: &LinearProgram) -> Result<(), SolverError> {
        self.bounds = program.variables.iter().map(|v| (v.lower, v.upper)).collect();
        self.program = Some(program.clone());
        Ok(())
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        let program = self.program.as_mut().ok_or(SolverError::NotLoaded)?;
        program.add_constraint(constraint);
        Ok(())
    }

    fn set_bounds(&mut self, var: VarId, lower: f64, upper: f64) -> Result<(), SolverError> {
        let slot = self
            .bounds
            .get_mut(var.0)
            .ok_or(SolverError::UnknownVariable(var.0))?;
        *slot = (lower, upper);
        Ok(())
    }

    fn set_limits(&mut self, limits: SolveLimits) -> Result<(), SolverError> {
        self.limits.push(limits);
        Ok(())
    }

    fn solve(
        &mut self,
        callbacks: &mut [&mut dyn CutCallback],
    ) -> Result<SolveOutcome, SolverError> {
        let call = self.solves;
        self.solves += 1;
        if self.fail_on.contains(&call) {
            return Err(SolverError::Backend(format!("injected failure on solve {}", call)));
        }
        let program = self.program.as_mut().ok_or(SolverError::NotLoaded)?;
        let bounds = &self.bounds;

        // User cuts see one fractional point: every free binary at one half
        let half: Vec<f64> = program
            .variables
            .iter()
            .zip(bounds)
            .map(|(v, &(lo, hi))| match v.domain {
                Domain::Binary if lo < hi => 0.5,
                _ => lo,
            })
            .collect();
        for callback in callbacks.iter_mut().filter(|c| c.kind() == CutKind::User) {
            let cuts = callback.separate(&Candidate {
                values: &half,
                integral: false,
            });
            for cut in cuts {
                self.user_cuts += 1;
                program.add_constraint(cut.constraint);
            }
        }

        let free: Vec<usize> = program
            .variables
            .iter()
            .enumerate()
            .filter(|(i, v)| v.domain == Domain::Binary && bounds[*i].0 < bounds[*i].1)
            .map(|(i, _)| i)
            .collect();
        assert!(free.len() <= 20, "model too large for enumeration");
        let plans = plan_continuous(program);

        let mut best: Option<(f64, Vec<f64>)> = None;
        for mask in 0u64..(1u64 << free.len()) {
            let mut values: Vec<f64> = bounds.iter().map(|&(lo, _)| lo).collect();
            for (bit, &var) in free.iter().enumerate() {
                values[var] = if mask & (1 << bit) != 0 { 1.0 } else { 0.0 };
            }
            if !resolve_continuous(program, bounds, &plans, &mut values) {
                continue;
            }
            if !program
                .constraints
                .iter()
                .all(|c| c.is_satisfied(&values, FEASIBILITY_TOLERANCE))
            {
                continue;
            }
            let objective = program.objective_value(&values);
            if best
                .as_ref()
                .is_some_and(|(incumbent, _)| !program.objective.improves(objective, *incumbent))
            {
                continue;
            }

            let mut rejected = false;
            for callback in callbacks.iter_mut().filter(|c| c.kind() == CutKind::Lazy) {
                let cuts = callback.separate(&Candidate {
                    values: &values,
                    integral: true,
                });
                for cut in cuts {
                    if !cut.constraint.is_satisfied(&values, FEASIBILITY_TOLERANCE) {
                        rejected = true;
                    }
                    self.lazy_cuts += 1;
                    program.add_constraint(cut.constraint);
                }
            }
            if !rejected {
                best = Some((objective, values));
            }
        }

        Ok(match best {
            Some((objective, values)) => SolveOutcome {
                status: SolveStatus::Optimal,
                objective: Some(objective),
                best_bound: Some(objective),
                values,
            },
            None => SolveOutcome {
                status: SolveStatus::Infeasible,
                objective: None,
                best_bound: None,
                values: Vec::new(),
            },
        })
    }

    fn name(&self) -> &str {
        "enumerative"
    }
}

/// Uniform ocean of `width` x `height` cells at -10 m.
pub fn open_ocean(width: usize, height: usize) -> OceanGrid {
    OceanGrid::new(width, height, vec![-10.0; width * height]).unwrap()
}

/// Ocean with land cells at the given (x, y) positions.
pub fn ocean_with_land(width: usize, height: usize, land: &[(usize, usize)]) -> OceanGrid {
    let mut elevation = vec![-10.0; width * height];
    for &(x, y) in land {
        elevation[y * width + x] = 5.0;
    }
    OceanGrid::new(width, height, elevation).unwrap()
}

/// Cookie-cutter configuration with isotropic targets.
pub fn cookie_config(regime: ObjectiveRegime, rho_0: f64) -> BisonConfig {
    let mut config = BisonConfig::default();
    config.equipment.objective = regime;
    config.detection.model = DetectionModel::CookieCutter;
    config.detection.rho_0 = rho_0;
    config.detection.pulse_length = 0.0;
    config.detection.target_strength = Vec::new();
    config
}

/// Probabilistic configuration with isotropic targets.
pub fn probabilistic_config(regime: ObjectiveRegime, rho_0: f64) -> BisonConfig {
    let mut config = cookie_config(regime, rho_0);
    config.detection.model = DetectionModel::Probabilistic;
    config
}
