//! Placement model assembly.
//!
//! ## Linearized formulation
//!
//! Binary `s[l]`, `r[l]` per candidate location, binary `c[t]` per target
//! under coverage maximization, and continuous `y[t,θ,s]` per non-empty
//! source row with bound `R = R[t,θ,s]` from the row-sum policy:
//!
//! ```text
//! cookie-cutter:  0 <= y <= R     y - R·s + Σ_r D·r >= 0
//! probabilistic:  R <= y <= 0     y - R·s + Σ_r D·r <= 0
//! ```
//!
//! At integral points `R·s - y` equals `Σ_r D·r` when `s = 1` and 0 otherwise,
//! so for every (target, heading)
//!
//! ```text
//! cookie-cutter:  Σ_s (R·s - y) >= 1              (cost)
//!                 Σ_s (R·s - y) - c[t] >= 0       (coverage)
//! probabilistic:  Σ_s (R·s - y) <= ln(1-dp)        (cost)
//!                 Σ_s (R·s - y) - ln(1-dp)·c[t] <= 0 (coverage)
//! ```
//!
//! Source rows without any detecting pair contribute at most 0 and are left
//! out of the model.
//!
//! ## Submodular-cut formulation
//!
//! Only `s`, `r`, `c` and the equipment constraints; coverage is enforced
//! by lazy cuts at run time.

use std::collections::HashMap;

use crate::config::{BisonConfig, DetectionModel, Formulation, ObjectiveRegime};
use crate::core::{Cell, Heading};
use crate::coverage::{DetectionMap, RowKey, RowSums};

use super::linear::{Constraint, LinearExpr, LinearProgram, ObjectiveSense, Sense, VarId, Variable};

/// Where each decision lives in the program.
#[derive(Clone, Debug, Default)]
pub struct VariableLayout {
    /// `s[l]` by candidate index
    pub sources: Vec<VarId>,
    /// `r[l]` by candidate index
    pub receivers: Vec<VarId>,
    /// `c[t]` by target index (coverage maximization only)
    pub covered: Option<Vec<VarId>>,
    /// `y[t,θ,s]` (linearized formulation only)
    pub linearization: HashMap<RowKey, VarId>,
}

/// Assembled program plus the metadata the heuristic and cuts need.
#[derive(Clone, Debug)]
pub struct PlacementModel {
    /// The program
    pub program: LinearProgram,
    /// Variable positions
    pub layout: VariableLayout,
    /// Objective regime
    pub regime: ObjectiveRegime,
    /// Formulation
    pub formulation: Formulation,
    /// Detection model of the coefficients
    pub model: DetectionModel,
    /// Coverage threshold (1 or ln(1 - dp))
    pub threshold: f64,
    /// (target, heading) rows with no detecting pair
    pub undetectable: Vec<(Cell, Heading)>,
}

impl PlacementModel {
    /// Number of candidate locations
    pub fn candidate_count(&self) -> usize {
        self.layout.sources.len()
    }

    /// Variable of `c[t]` for a target index.
    pub fn covered_var(&self, target_index: usize) -> Option<VarId> {
        self.layout
            .covered
            .as_ref()
            .and_then(|c| c.get(target_index).copied())
    }
}

/// Builds a [`PlacementModel`] from the coverage data.
pub struct ModelBuilder<'a> {
    config: &'a BisonConfig,
    map: &'a DetectionMap,
    sums: &'a RowSums,
}

impl<'a> ModelBuilder<'a> {
    /// Create a builder.
    pub fn new(config: &'a BisonConfig, map: &'a DetectionMap, sums: &'a RowSums) -> Self {
        Self { config, map, sums }
    }

    /// Assemble the program for the configured regime and formulation.
    pub fn build(&self) -> PlacementModel {
        let regime = self.config.equipment.objective;
        let formulation = self.config.optimization.formulation;
        let model = self.map.model();
        let threshold = self.config.detection.coverage_threshold();

        let sense = match regime {
            ObjectiveRegime::MinimizeCost => ObjectiveSense::Minimize,
            ObjectiveRegime::MaximizeCoverage => ObjectiveSense::Maximize,
        };
        let mut program = LinearProgram::new("bison", sense);
        let mut layout = VariableLayout::default();

        for &cell in self.map.candidates() {
            layout
                .sources
                .push(program.add_variable(Variable::binary(format!("s_{}", cell_tag(cell)))));
        }
        for &cell in self.map.candidates() {
            layout
                .receivers
                .push(program.add_variable(Variable::binary(format!("r_{}", cell_tag(cell)))));
        }
        if regime == ObjectiveRegime::MaximizeCoverage {
            let covered = self
                .map
                .targets()
                .iter()
                .map(|&t| program.add_variable(Variable::binary(format!("c_{}", cell_tag(t)))))
                .collect();
            layout.covered = Some(covered);
        }

        self.add_objective(&mut program, &layout);
        self.add_equipment_constraints(&mut program, &layout);
        if formulation == Formulation::Linearized {
            self.add_linearization(&mut program, &mut layout, threshold);
        }

        let undetectable = self.map.undetectable();
        if !undetectable.is_empty() {
            let level = match regime {
                ObjectiveRegime::MinimizeCost => log::Level::Warn,
                ObjectiveRegime::MaximizeCoverage => log::Level::Info,
            };
            log::log!(
                level,
                "{} target/heading rows cannot be detected by any pair",
                undetectable.len()
            );
        }

        log::info!(
            "Model: {} variables ({} binary), {} constraints, {:?} formulation",
            program.variables.len(),
            program.binary_count(),
            program.constraints.len(),
            formulation
        );

        PlacementModel {
            program,
            layout,
            regime,
            formulation,
            model,
            threshold,
            undetectable,
        }
    }

    fn add_objective(&self, program: &mut LinearProgram, layout: &VariableLayout) {
        let eq = &self.config.equipment;
        let expr = &mut program.objective.expr;
        match &layout.covered {
            None => {
                for &s in &layout.sources {
                    expr.add_term(s, eq.source_cost);
                }
                for &r in &layout.receivers {
                    expr.add_term(r, eq.receiver_cost);
                }
            }
            Some(covered) => {
                let weight = 100.0 / covered.len().max(1) as f64;
                for &c in covered {
                    expr.add_term(c, weight);
                }
            }
        }
    }

    fn add_equipment_constraints(&self, program: &mut LinearProgram, layout: &VariableLayout) {
        let sources = LinearExpr::sum(layout.sources.iter().copied());
        let receivers = LinearExpr::sum(layout.receivers.iter().copied());
        match self.config.equipment.objective {
            ObjectiveRegime::MinimizeCost => {
                program.add_constraint(Constraint::new("min_sources", sources, Sense::Ge, 1.0));
                program.add_constraint(Constraint::new("min_receivers", receivers, Sense::Ge, 1.0));
            }
            ObjectiveRegime::MaximizeCoverage => {
                let eq = &self.config.equipment;
                program.add_constraint(Constraint::new(
                    "source_budget",
                    sources,
                    Sense::Eq,
                    eq.source_count as f64,
                ));
                program.add_constraint(Constraint::new(
                    "receiver_budget",
                    receivers,
                    Sense::Eq,
                    eq.receiver_count as f64,
                ));
            }
        }
    }

    fn add_linearization(
        &self,
        program: &mut LinearProgram,
        layout: &mut VariableLayout,
        threshold: f64,
    ) {
        let candidates = self.map.candidates();
        let cookie = self.map.model() == DetectionModel::CookieCutter;

        for (t_index, &target) in self.map.targets().iter().enumerate() {
            for &heading in self.map.headings() {
                let tag = format!("{}_{}", cell_tag(target), heading.label());

                // Group the row by source
                let mut by_source: Vec<(usize, Vec<(usize, f64)>)> = Vec::new();
                for e in self.map.pairs(target, heading) {
                    match by_source.last_mut() {
                        Some((s, list)) if *s == e.source => list.push((e.receiver, e.value)),
                        _ => by_source.push((e.source, vec![(e.receiver, e.value)])),
                    }
                }

                let mut coverage = LinearExpr::zero();
                for (s_index, receivers) in by_source {
                    let source = candidates[s_index];
                    let key = RowKey::new(target, heading, source);
                    let bound = self.sums.source_bound(&key);
                    let s_var = layout.sources[s_index];
                    let y_name = format!("y_{}_{}", tag, cell_tag(source));
                    let y = if cookie {
                        program.add_variable(Variable::continuous(y_name, 0.0, bound))
                    } else {
                        program.add_variable(Variable::continuous(y_name, bound, 0.0))
                    };
                    layout.linearization.insert(key, y);

                    let mut link = LinearExpr::from_var(y, 1.0).with_term(s_var, -bound);
                    for (r_index, value) in receivers {
                        link.add_term(layout.receivers[r_index], value);
                    }
                    let sense = if cookie { Sense::Ge } else { Sense::Le };
                    program.add_constraint(Constraint::new(
                        format!("link_{}_{}", tag, cell_tag(source)),
                        link,
                        sense,
                        0.0,
                    ));

                    coverage.add_term(s_var, bound);
                    coverage.add_term(y, -1.0);
                }

                let name = format!("cover_{}", tag);
                let constraint = match (layout.covered.as_ref(), cookie) {
                    (None, true) => Constraint::new(name, coverage, Sense::Ge, threshold),
                    (None, false) => Constraint::new(name, coverage, Sense::Le, threshold),
                    (Some(covered), true) => Constraint::new(
                        name,
                        coverage.with_term(covered[t_index], -1.0),
                        Sense::Ge,
                        0.0,
                    ),
                    (Some(covered), false) => Constraint::new(
                        name,
                        coverage.with_term(covered[t_index], -threshold),
                        Sense::Le,
                        0.0,
                    ),
                };
                program.add_constraint(constraint);
            }
        }
    }
}

/// LP-safe tag of a cell (`3_4`, or `3_4_1` on layered grids).
pub fn cell_tag(cell: Cell) -> String {
    let coord = |v: i32| {
        if v < 0 {
            format!("m{}", -v)
        } else {
            v.to_string()
        }
    };
    if cell.z == 0 {
        format!("{}_{}", coord(cell.x), coord(cell.y))
    } else {
        format!("{}_{}_{}", coord(cell.x), coord(cell.y), coord(cell.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundPolicy;
    use crate::coverage::DetectionKey;

    /// Two targets in a row of three cells; only `b` can see `a`.
    fn setup(model: DetectionModel) -> (DetectionMap, Vec<Cell>) {
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        let c = Cell::new(2, 0);
        let h = Heading::Isotropic;
        let v = match model {
            DetectionModel::CookieCutter => 1.0,
            DetectionModel::Probabilistic => -0.7,
        };
        let mut entries = HashMap::new();
        entries.insert(DetectionKey::new(a, h, b, b), v);
        entries.insert(DetectionKey::new(a, h, b, c), v);
        entries.insert(DetectionKey::new(c, h, b, b), v);
        let cells = vec![a, b, c];
        (
            DetectionMap::new(model, cells.clone(), vec![h], cells.clone(), entries),
            cells,
        )
    }

    fn build(config: &BisonConfig, map: &DetectionMap) -> PlacementModel {
        let sums = RowSums::from_map(map, config.optimization.bound_policy);
        ModelBuilder::new(config, map, &sums).build()
    }

    #[test]
    fn test_cost_cookie_layout() {
        let (map, _) = setup(DetectionModel::CookieCutter);
        let config = BisonConfig::default();
        let model = build(&config, &map);
        assert_eq!(model.layout.sources.len(), 3);
        assert_eq!(model.layout.receivers.len(), 3);
        assert!(model.layout.covered.is_none());
        // Two non-empty source rows: (a, b) and (c, b)
        assert_eq!(model.layout.linearization.len(), 2);
        // 2 equipment + 3 coverage + 2 links
        assert_eq!(model.program.constraints.len(), 7);
        assert_eq!(model.undetectable, vec![(Cell::new(1, 0), Heading::Isotropic)]);
        assert_eq!(model.program.objective.sense, ObjectiveSense::Minimize);
        assert_eq!(model.program.objective.expr.terms[&model.layout.sources[0]], 12.0);
        assert_eq!(model.program.objective.expr.terms[&model.layout.receivers[0]], 4.0);
    }

    #[test]
    fn test_uniform_bound_on_y() {
        let (map, _) = setup(DetectionModel::CookieCutter);
        let config = BisonConfig::default();
        let model = build(&config, &map);
        for &y in model.layout.linearization.values() {
            let var = model.program.variable(y).unwrap();
            assert_eq!((var.lower, var.upper), (0.0, 2.0));
        }
    }

    #[test]
    fn test_individual_bound_on_y() {
        let (map, cells) = setup(DetectionModel::CookieCutter);
        let mut config = BisonConfig::default();
        config.optimization.bound_policy = BoundPolicy::Individual;
        let model = build(&config, &map);
        let key = RowKey::new(cells[2], Heading::Isotropic, cells[1]);
        let var = model.program.variable(model.layout.linearization[&key]).unwrap();
        assert_eq!(var.upper, 1.0);
    }

    #[test]
    fn test_linearization_exact_at_integral_points() {
        let (map, cells) = setup(DetectionModel::CookieCutter);
        let config = BisonConfig::default();
        let model = build(&config, &map);
        let n = model.program.variables.len();
        // s = {b}, r = {c}: target a covered once
        let mut values = vec![0.0; n];
        values[model.layout.sources[1].0] = 1.0;
        values[model.layout.receivers[2].0] = 1.0;
        let key = RowKey::new(cells[0], Heading::Isotropic, cells[1]);
        let y = model.layout.linearization[&key];
        // Tightest y satisfying the link: R·s - Σ D·r = 2 - 1
        values[y.0] = 1.0;
        let link = model
            .program
            .constraints
            .iter()
            .find(|c| c.name == "link_0_0_iso_1_0")
            .unwrap();
        assert!(link.is_satisfied(&values, 1e-9));
        let cover = model
            .program
            .constraints
            .iter()
            .find(|c| c.name == "cover_0_0_iso")
            .unwrap();
        assert_eq!(cover.expr.evaluate(&values), 1.0);
    }

    #[test]
    fn test_coverage_probabilistic() {
        let (map, _) = setup(DetectionModel::Probabilistic);
        let mut config = BisonConfig::default();
        config.equipment.objective = ObjectiveRegime::MaximizeCoverage;
        config.detection.model = DetectionModel::Probabilistic;
        config.detection.required_probability = 0.5;
        let model = build(&config, &map);
        let covered = model.layout.covered.as_ref().unwrap();
        assert_eq!(covered.len(), 3);
        let weight = model.program.objective.expr.terms[&covered[0]];
        assert!((weight - 100.0 / 3.0).abs() < 1e-12);
        let cover = model
            .program
            .constraints
            .iter()
            .find(|c| c.name == "cover_0_0_iso")
            .unwrap();
        assert_eq!(cover.sense, Sense::Le);
        assert!((cover.expr.terms[&covered[0]] - -(0.5f64.ln())).abs() < 1e-12);
        for &y in model.layout.linearization.values() {
            let var = model.program.variable(y).unwrap();
            assert_eq!(var.upper, 0.0);
            assert!(var.lower < 0.0);
        }
        let budget = model
            .program
            .constraints
            .iter()
            .find(|c| c.name == "source_budget")
            .unwrap();
        assert_eq!((budget.sense, budget.rhs), (Sense::Eq, 2.0));
    }

    #[test]
    fn test_submodular_formulation_has_no_linearization() {
        let (map, _) = setup(DetectionModel::CookieCutter);
        let mut config = BisonConfig::default();
        config.optimization.formulation = Formulation::SubmodularCuts;
        let model = build(&config, &map);
        assert!(model.layout.linearization.is_empty());
        assert_eq!(model.program.constraints.len(), 2);
        assert_eq!(model.program.variables.len(), 6);
    }

    #[test]
    fn test_cell_tag() {
        assert_eq!(cell_tag(Cell::new(3, 4)), "3_4");
        assert_eq!(cell_tag(Cell::layered(3, 4, 1)), "3_4_1");
        assert_eq!(cell_tag(Cell::new(-1, 0)), "m1_0");
    }
}
