//! Alternating block-coordinate placement heuristic.
//!
//! Works against a live solver session holding the placement model. One
//! sweep alternates two sub-solves:
//!
//! ```text
//! fix receivers, free sources  -> solve -> selected sources
//! fix sources, free receivers  -> solve -> selected receivers
//! ```
//!
//! and repeats while the objective strictly improves. Since each sub-solve
//! keeps the previous solution feasible, the recorded objectives are
//! monotone within a sweep.
//!
//! Rounds:
//! - cost minimization: a deterministic prequel starting from "every
//!   location is a receiver" fixes the number of sources; every later round
//!   starts from a random source subset of that size
//! - coverage maximization: every round starts from a random subset of the
//!   source budget
//!
//! Subsets are never tried twice. A round whose sub-solve is infeasible or
//! fails is discarded; a discarded prequel is retried once in the next
//! round. Afterwards the best placement is fixed, confirmed
//! with one resolve and all placement bounds are freed again.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{HeuristicSection, ObjectiveRegime};
use crate::core::CancelToken;
use crate::error::SolverError;
use crate::model::{PlacementModel, VarId};
use crate::solver::{CutCallback, SolveLimits, SolveOutcome, SolverSession, time_limit};

/// Cost-regime prequel attempts before the heuristic gives up.
const PREQUEL_ATTEMPTS: u32 = 2;

/// Values above this count as selected.
pub const SELECTION_THRESHOLD: f64 = 0.999;

/// Sources, receivers (candidate indices) and the objective they reach.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Selected source locations, ascending
    pub sources: Vec<usize>,
    /// Selected receiver locations, ascending
    pub receivers: Vec<usize>,
    /// Objective value
    pub objective: f64,
}

/// One recorded sub-solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepStep {
    /// Round index (0 = first round / prequel)
    pub round: u32,
    /// Objective of the sub-solve
    pub objective: f64,
}

/// Result of a heuristic run.
#[derive(Clone, Debug, Default)]
pub struct HeuristicOutcome {
    /// Best placement found
    pub best: Option<Placement>,
    /// Every successful sub-solve in order
    pub trace: Vec<SweepStep>,
    /// Rounds started
    pub rounds: u32,
    /// Rounds discarded after an infeasible or failed sub-solve
    pub discarded: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Sources,
    Receivers,
}

/// Warm-start heuristic bound to one placement model.
pub struct AlternatingHeuristic<'a> {
    model: &'a PlacementModel,
    settings: &'a HeuristicSection,
    rng: StdRng,
    cancel: Option<CancelToken>,
    tried: HashSet<Vec<usize>>,
}

impl<'a> AlternatingHeuristic<'a> {
    /// Create a heuristic; the RNG is seeded from the settings when given.
    pub fn new(model: &'a PlacementModel, settings: &'a HeuristicSection) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            model,
            settings,
            rng,
            cancel: None,
            tried: HashSet::new(),
        }
    }

    /// Stop between rounds when the token is set.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run all rounds, apply the best placement and free the bounds again.
    ///
    /// Only errors from fixing or freeing bounds are returned; sub-solve
    /// errors discard the round.
    pub fn run<S: SolverSession + ?Sized>(
        &mut self,
        session: &mut S,
        callbacks: &mut [&mut dyn CutCallback],
        source_budget: usize,
    ) -> Result<HeuristicOutcome, SolverError> {
        let start = Instant::now();
        let budget = time_limit(self.settings.time_limit_secs)?;
        let mut outcome = HeuristicOutcome::default();

        session.set_limits(SolveLimits {
            time_limit: self.settings.round_time_limit_secs.map(time_limit).transpose()?,
            ..SolveLimits::default()
        })?;

        let candidates = self.model.candidate_count();
        let mut prequel_failures = 0;
        let mut subset_size = match self.model.regime {
            ObjectiveRegime::MaximizeCoverage => Some(source_budget),
            ObjectiveRegime::MinimizeCost => None,
        };

        log::info!(
            "Running {} heuristic rounds on {} candidates",
            self.settings.rounds,
            candidates
        );

        for round in 0..self.settings.rounds {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                log::info!("Heuristic cancelled after {} rounds", round);
                break;
            }
            if start.elapsed() >= budget {
                log::info!("Heuristic time budget exhausted after {} rounds", round);
                break;
            }

            let (side, start_set) = match subset_size {
                None => (Side::Receivers, (0..candidates).collect()),
                Some(size) => match self.sample_subset(candidates, size) {
                    Some(subset) => (Side::Sources, subset),
                    None => {
                        log::info!("No untried source subset of size {} left", size);
                        break;
                    }
                },
            };

            outcome.rounds += 1;
            let result = self.sweep(session, callbacks, round, side, start_set, &mut outcome.trace)?;
            let Some(placement) = result else {
                outcome.discarded += 1;
                log::warn!("Heuristic round {} discarded", round);
                if subset_size.is_none() {
                    prequel_failures += 1;
                    // Without a prequel there is no source count to sample with
                    if prequel_failures >= PREQUEL_ATTEMPTS {
                        log::warn!(
                            "Prequel failed {} times, skipping the remaining {} heuristic rounds",
                            prequel_failures,
                            self.settings.rounds - round - 1
                        );
                        break;
                    }
                }
                continue;
            };

            if subset_size.is_none() {
                subset_size = Some(placement.sources.len());
                self.tried.insert(placement.sources.clone());
            }

            let improves = outcome.best.as_ref().is_none_or(|best| {
                self.model
                    .program
                    .objective
                    .improves(placement.objective, best.objective)
            });
            if improves {
                log::info!(
                    "Heuristic round {}: new incumbent {:.4} ({} sources, {} receivers)",
                    round,
                    placement.objective,
                    placement.sources.len(),
                    placement.receivers.len()
                );
                outcome.best = Some(placement);
            } else {
                log::debug!("Heuristic round {}: objective {:.4}", round, placement.objective);
            }
        }

        if let Some(best) = &outcome.best {
            self.fix(session, Side::Sources, &best.sources)?;
            self.fix(session, Side::Receivers, &best.receivers)?;
            match session.solve(callbacks) {
                Ok(confirm) if confirm.status.has_solution() => {
                    log::debug!("Heuristic incumbent confirmed at {:?}", confirm.objective);
                }
                Ok(confirm) => log::warn!("Heuristic incumbent not confirmed: {:?}", confirm.status),
                Err(e) => log::warn!("Heuristic confirmation solve failed: {}", e),
            }
        }
        self.free(session, Side::Sources)?;
        self.free(session, Side::Receivers)?;

        log::info!(
            "Heuristic finished: {} rounds, {} discarded, best {:?} in {:.2}s",
            outcome.rounds,
            outcome.discarded,
            outcome.best.as_ref().map(|b| b.objective),
            start.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }

    /// Alternate sub-solves from a fixed side until the objective stalls.
    fn sweep<S: SolverSession + ?Sized>(
        &self,
        session: &mut S,
        callbacks: &mut [&mut dyn CutCallback],
        round: u32,
        mut fixed_side: Side,
        mut fixed: Vec<usize>,
        trace: &mut Vec<SweepStep>,
    ) -> Result<Option<Placement>, SolverError> {
        let model: &'a PlacementModel = self.model;
        let objective = &model.program.objective;
        let mut previous = objective.worst();
        let mut last = None;

        loop {
            for _ in 0..2 {
                let free_side = other(fixed_side);
                self.fix(session, fixed_side, &fixed)?;
                self.free(session, free_side)?;

                let Some(solved) = solve_quietly(session, callbacks) else {
                    return Ok(None);
                };
                let Some(value) = solved.objective else {
                    return Ok(None);
                };
                trace.push(SweepStep {
                    round,
                    objective: value,
                });

                let selected = self.selected(&solved, free_side);
                let (sources, receivers) = match fixed_side {
                    Side::Sources => (fixed.clone(), selected.clone()),
                    Side::Receivers => (selected.clone(), fixed.clone()),
                };
                last = Some(Placement {
                    sources,
                    receivers,
                    objective: value,
                });

                fixed_side = free_side;
                fixed = selected;
            }

            let current = last.as_ref().map_or(previous, |p| p.objective);
            if objective.improves(current, previous) {
                previous = current;
            } else {
                break;
            }
        }
        Ok(last)
    }

    /// Draw an untried subset of `size` distinct candidates.
    fn sample_subset(&mut self, candidates: usize, size: usize) -> Option<Vec<usize>> {
        if size > candidates {
            return None;
        }
        for _ in 0..self.settings.max_sampling_attempts.max(1) {
            let mut subset = BTreeSet::new();
            while subset.len() < size {
                subset.insert(self.rng.random_range(0..candidates));
            }
            let subset: Vec<usize> = subset.into_iter().collect();
            if self.tried.insert(subset.clone()) {
                return Some(subset);
            }
        }
        None
    }

    fn vars(&self, side: Side) -> &'a [VarId] {
        match side {
            Side::Sources => &self.model.layout.sources,
            Side::Receivers => &self.model.layout.receivers,
        }
    }

    fn selected(&self, outcome: &SolveOutcome, side: Side) -> Vec<usize> {
        self.vars(side)
            .iter()
            .enumerate()
            .filter(|(_, var)| outcome.value(**var) > SELECTION_THRESHOLD)
            .map(|(i, _)| i)
            .collect()
    }

    fn fix<S: SolverSession + ?Sized>(
        &self,
        session: &mut S,
        side: Side,
        selected: &[usize],
    ) -> Result<(), SolverError> {
        let chosen: HashSet<usize> = selected.iter().copied().collect();
        for (i, &var) in self.vars(side).iter().enumerate() {
            let v = if chosen.contains(&i) { 1.0 } else { 0.0 };
            session.set_bounds(var, v, v)?;
        }
        Ok(())
    }

    fn free<S: SolverSession + ?Sized>(&self, session: &mut S, side: Side) -> Result<(), SolverError> {
        for &var in self.vars(side) {
            session.set_bounds(var, 0.0, 1.0)?;
        }
        Ok(())
    }
}

fn other(side: Side) -> Side {
    match side {
        Side::Sources => Side::Receivers,
        Side::Receivers => Side::Sources,
    }
}

/// Solve, mapping failures and solution-less statuses to `None`.
fn solve_quietly<S: SolverSession + ?Sized>(
    session: &mut S,
    callbacks: &mut [&mut dyn CutCallback],
) -> Option<SolveOutcome> {
    match session.solve(callbacks) {
        Ok(outcome) if outcome.status.has_solution() => Some(outcome),
        Ok(outcome) => {
            log::debug!("Heuristic sub-solve ended with {:?}", outcome.status);
            None
        }
        Err(e) => {
            log::warn!("Heuristic sub-solve failed: {}", e);
            None
        }
    }
}
