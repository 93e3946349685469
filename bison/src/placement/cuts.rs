//! Submodular cut separation.
//!
//! Let `f(X) = Σ D[t,θ,s,r]` over selected sources `s` and receivers `r` in
//! the equipment set `X`. Rank all (location, role) items by their current
//! value, descending, and give each item the marginal contribution it adds
//! to the items ranked before it:
//!
//! ```text
//! coef(i) = Σ D over complementary items j ranked before i
//! lhs     = Σ coef(i)·x_i
//! ```
//!
//! With non-negative `D` (cookie-cutter) `f` is supermodular and
//! `Σ_{i∈X} coef(i) >= f(X)` for every `X`, so `lhs >= 1` (or `>= c[t]`) is
//! valid. With `D = ln(1-p) <= 0` `f` is submodular and
//! `Σ_{i∈X} coef(i) <= f(X)`, so `lhs <= ln(1-dp)` (or `<= c[t]·ln(1-dp)`) is
//! valid. At an integral point the selected items rank first and `lhs`
//! equals `f(X)` exactly, so lazy cuts reject every uncovered incumbent.

use crate::config::{DetectionModel, ObjectiveRegime};
use crate::coverage::DetectionMap;
use crate::model::{Constraint, LinearExpr, PlacementModel, Sense};
use crate::solver::{Candidate, Cut, CutCallback, CutKind};

/// Slack tolerated on lazy checks before a cut is emitted.
const LAZY_TOLERANCE: f64 = 1e-9;

/// Role of a ranked item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Source at a location
    Source,
    /// Receiver at a location
    Receiver,
}

/// One (role, location) item of the ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedItem {
    /// Role
    pub role: Role,
    /// Candidate index
    pub location: usize,
}

/// Separation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeparatorStats {
    /// Times the separator was invoked
    pub calls: u64,
    /// Cuts returned to the solver
    pub cuts_added: u64,
}

/// Caller-owned separation routine for one cut kind.
pub struct SubmodularSeparator<'a> {
    map: &'a DetectionMap,
    model: &'a PlacementModel,
    kind: CutKind,
    tolerance: f64,
    stats: SeparatorStats,
}

impl<'a> SubmodularSeparator<'a> {
    /// Lazy separator: exact violation test on candidate incumbents.
    pub fn lazy(map: &'a DetectionMap, model: &'a PlacementModel) -> Self {
        Self {
            map,
            model,
            kind: CutKind::Lazy,
            tolerance: LAZY_TOLERANCE,
            stats: SeparatorStats::default(),
        }
    }

    /// User-cut separator: fires only when violated by more than `tolerance`.
    pub fn user(map: &'a DetectionMap, model: &'a PlacementModel, tolerance: f64) -> Self {
        Self {
            map,
            model,
            kind: CutKind::User,
            tolerance,
            stats: SeparatorStats::default(),
        }
    }

    /// Counters so far
    pub fn stats(&self) -> SeparatorStats {
        self.stats
    }

    /// Times invoked
    pub fn calls(&self) -> u64 {
        self.stats.calls
    }

    /// Cuts emitted
    pub fn cuts_added(&self) -> u64 {
        self.stats.cuts_added
    }

    /// Rank every (role, location) item by value, descending.
    ///
    /// Ties go to sources before receivers, then lower location index.
    pub fn ranking(&self, values: &[f64]) -> Vec<RankedItem> {
        let layout = &self.model.layout;
        let mut items: Vec<(f64, RankedItem)> = Vec::with_capacity(2 * layout.sources.len());
        for (location, var) in layout.sources.iter().enumerate() {
            items.push((values[var.0], RankedItem { role: Role::Source, location }));
        }
        for (location, var) in layout.receivers.iter().enumerate() {
            items.push((values[var.0], RankedItem { role: Role::Receiver, location }));
        }
        items.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(a.1.role.cmp(&b.1.role))
                .then(a.1.location.cmp(&b.1.location))
        });
        items.into_iter().map(|(_, item)| item).collect()
    }

    /// Separate all (target, heading) rows at `values`.
    pub fn separate_point(&mut self, values: &[f64]) -> Vec<Cut> {
        self.stats.calls += 1;

        let ranking = self.ranking(values);
        let n = self.model.layout.sources.len();
        let mut source_rank = vec![0usize; n];
        let mut receiver_rank = vec![0usize; n];
        for (rank, item) in ranking.iter().enumerate() {
            match item.role {
                Role::Source => source_rank[item.location] = rank,
                Role::Receiver => receiver_rank[item.location] = rank,
            }
        }

        let mut cuts = Vec::new();
        for (t_index, &target) in self.map.targets().iter().enumerate() {
            for &heading in self.map.headings() {
                let pairs = self.map.pairs(target, heading);
                let mut expr = LinearExpr::zero();
                for e in pairs {
                    // The later-ranked item of the pair collects the value
                    if source_rank[e.source] > receiver_rank[e.receiver] {
                        expr.add_term(self.model.layout.sources[e.source], e.value);
                    } else {
                        expr.add_term(self.model.layout.receivers[e.receiver], e.value);
                    }
                }
                let serial = self.stats.cuts_added + cuts.len() as u64;
                if let Some(cut) = self.check_row(expr, values, t_index, serial) {
                    log::trace!(
                        "{:?} cut for target {} heading {} violated by {:.4}",
                        self.kind,
                        target,
                        heading,
                        cut.violation
                    );
                    cuts.push(cut);
                }
            }
        }

        self.stats.cuts_added += cuts.len() as u64;
        cuts
    }

    fn check_row(
        &self,
        mut expr: LinearExpr,
        values: &[f64],
        t_index: usize,
        serial: u64,
    ) -> Option<Cut> {
        let lhs = expr.evaluate(values);
        let threshold = self.model.threshold;
        let covered = match self.model.regime {
            ObjectiveRegime::MinimizeCost => None,
            ObjectiveRegime::MaximizeCoverage => self.model.covered_var(t_index),
        };
        let covered_value = covered.map(|c| values[c.0]);
        let name = format!(
            "{}_{}_{}",
            match self.kind {
                CutKind::Lazy => "lazy",
                CutKind::User => "user",
            },
            t_index,
            serial
        );

        match self.model.model {
            DetectionModel::CookieCutter => {
                let required = covered_value.unwrap_or(threshold);
                let violation = required - lhs;
                if violation <= self.tolerance {
                    return None;
                }
                let constraint = match covered {
                    Some(c) => Constraint::new(name, expr.with_term(c, -1.0), Sense::Ge, 0.0),
                    None => Constraint::new(name, expr, Sense::Ge, threshold),
                };
                Some(Cut {
                    constraint,
                    violation,
                })
            }
            DetectionModel::Probabilistic => {
                let allowed = covered_value.map_or(threshold, |c| c * threshold);
                let violation = lhs - allowed;
                if violation <= self.tolerance {
                    return None;
                }
                let constraint = match covered {
                    Some(c) => {
                        expr.add_term(c, -threshold);
                        Constraint::new(name, expr, Sense::Le, 0.0)
                    }
                    None => Constraint::new(name, expr, Sense::Le, threshold),
                };
                Some(Cut {
                    constraint,
                    violation,
                })
            }
        }
    }
}

impl CutCallback for SubmodularSeparator<'_> {
    fn kind(&self) -> CutKind {
        self.kind
    }

    fn separate(&mut self, candidate: &Candidate<'_>) -> Vec<Cut> {
        self.separate_point(candidate.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::{BisonConfig, Formulation};
    use crate::core::{Cell, Heading};
    use crate::coverage::{DetectionKey, RowSums};
    use crate::model::ModelBuilder;

    /// Two candidates; target `a` is seen only by (b, b).
    fn setup(config: &BisonConfig) -> (DetectionMap, PlacementModel) {
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        let h = Heading::Isotropic;
        let value = match config.detection.model {
            DetectionModel::CookieCutter => 1.0,
            DetectionModel::Probabilistic => -1.0,
        };
        let mut entries = HashMap::new();
        entries.insert(DetectionKey::new(a, h, b, b), value);
        entries.insert(DetectionKey::new(b, h, a, a), value);
        let map = DetectionMap::new(
            config.detection.model,
            vec![a, b],
            vec![h],
            vec![a, b],
            entries,
        );
        let sums = RowSums::from_map(&map, config.optimization.bound_policy);
        let model = ModelBuilder::new(config, &map, &sums).build();
        (map, model)
    }

    fn cut_config() -> BisonConfig {
        let mut config = BisonConfig::default();
        config.optimization.formulation = Formulation::SubmodularCuts;
        config
    }

    #[test]
    fn test_ranking_ties() {
        let config = cut_config();
        let (map, model) = setup(&config);
        let separator = SubmodularSeparator::lazy(&map, &model);
        // s_a, s_b, r_a, r_b
        let ranking = separator.ranking(&[0.5, 1.0, 0.5, 0.0]);
        assert_eq!(ranking[0], RankedItem { role: Role::Source, location: 1 });
        assert_eq!(ranking[1], RankedItem { role: Role::Source, location: 0 });
        assert_eq!(ranking[2], RankedItem { role: Role::Receiver, location: 0 });
        assert_eq!(ranking[3], RankedItem { role: Role::Receiver, location: 1 });
    }

    #[test]
    fn test_integral_uncovered_point_is_cut() {
        let config = cut_config();
        let (map, model) = setup(&config);
        let mut separator = SubmodularSeparator::lazy(&map, &model);
        // Source and receiver both at a: target a uncovered, b covered
        let cuts = separator.separate_point(&[1.0, 0.0, 1.0, 0.0]);
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].constraint.sense, Sense::Ge);
        assert_eq!(cuts[0].constraint.rhs, 1.0);
        assert!((cuts[0].violation - 1.0).abs() < 1e-12);
        assert_eq!(separator.calls(), 1);
        assert_eq!(separator.cuts_added(), 1);
    }

    #[test]
    fn test_covering_point_has_no_cut() {
        let config = cut_config();
        let (map, model) = setup(&config);
        let mut separator = SubmodularSeparator::lazy(&map, &model);
        let cuts = separator.separate_point(&[1.0, 1.0, 1.0, 1.0]);
        assert!(cuts.is_empty());
        assert_eq!(separator.calls(), 1);
        assert_eq!(separator.cuts_added(), 0);
    }

    #[test]
    fn test_user_tolerance_suppresses_small_violations() {
        let config = cut_config();
        let (map, model) = setup(&config);
        // Fractional point with lhs = 0.8 for both targets
        let point = [0.8, 0.8, 0.8, 0.8];
        let mut lazy = SubmodularSeparator::lazy(&map, &model);
        assert_eq!(lazy.separate_point(&point).len(), 2);
        let mut user = SubmodularSeparator::user(&map, &model, 0.5);
        assert!(user.separate_point(&point).is_empty());
        assert_eq!(user.kind(), CutKind::User);
    }

    #[test]
    fn test_probabilistic_coverage_cut_shape() {
        let mut config = cut_config();
        config.detection.model = DetectionModel::Probabilistic;
        config.detection.required_probability = 0.5;
        config.equipment.objective = ObjectiveRegime::MaximizeCoverage;
        let (map, model) = setup(&config);
        let mut separator = SubmodularSeparator::lazy(&map, &model);
        // s_a, s_b, r_a, r_b, c_a, c_b: claims both covered with only a equipped
        let cuts = separator.separate_point(&[1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(cuts.len(), 1);
        let c = &cuts[0].constraint;
        assert_eq!(c.sense, Sense::Le);
        assert_eq!(c.rhs, 0.0);
        let covered = model.covered_var(0).unwrap();
        assert!((c.expr.terms[&covered] + 0.5f64.ln()).abs() < 1e-12);
    }
}
