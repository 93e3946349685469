//! Placement report extracted from a solve outcome.

use serde::{Deserialize, Serialize};

use crate::config::ObjectiveRegime;
use crate::core::Cell;
use crate::coverage::DetectionMap;
use crate::model::PlacementModel;
use crate::solver::{SolveOutcome, SolveStatus};

use super::SeparatorStats;
use super::heuristic::SELECTION_THRESHOLD;

/// Total detection value of one target under the selected placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetCoverage {
    /// Target cell
    pub target: Cell,
    /// Σ D over selected (source, receiver) pairs and all headings
    pub total: f64,
}

/// Cut counters of one separator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutReport {
    /// Callback invocations
    pub calls: u64,
    /// Cuts added
    pub cuts_added: u64,
}

impl From<SeparatorStats> for CutReport {
    fn from(stats: SeparatorStats) -> Self {
        Self {
            calls: stats.calls,
            cuts_added: stats.cuts_added,
        }
    }
}

/// Outcome of a placement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Solver status
    pub status: SolveStatus,
    /// Objective of the final placement
    pub objective: Option<f64>,
    /// Best proven bound
    pub best_bound: Option<f64>,
    /// Optimality gap in percent
    pub gap_percent: f64,
    /// Selected source locations
    pub sources: Vec<Cell>,
    /// Selected receiver locations
    pub receivers: Vec<Cell>,
    /// Covered targets (coverage maximization)
    pub covered: Option<Vec<Cell>>,
    /// Uncovered targets (coverage maximization)
    pub uncovered: Option<Vec<Cell>>,
    /// Per-target coverage totals
    pub coverage: Vec<TargetCoverage>,
    /// Objective of the heuristic incumbent, if the heuristic ran
    #[serde(default)]
    pub heuristic_objective: Option<f64>,
    /// Lazy cut counters
    #[serde(default)]
    pub lazy_cuts: Option<CutReport>,
    /// User cut counters
    #[serde(default)]
    pub user_cuts: Option<CutReport>,
}

/// Optimality gap in percent.
///
/// Cost: `(obj - bound) / obj · 100`; coverage: `(bound - obj) / bound · 100`.
/// 100 when either value is missing or the denominator is zero.
pub fn optimality_gap(regime: ObjectiveRegime, objective: Option<f64>, bound: Option<f64>) -> f64 {
    let (Some(obj), Some(bound)) = (objective, bound) else {
        return 100.0;
    };
    let (numerator, denominator) = match regime {
        ObjectiveRegime::MinimizeCost => (obj - bound, obj),
        ObjectiveRegime::MaximizeCoverage => (bound - obj, bound),
    };
    if denominator == 0.0 {
        if numerator == 0.0 { 0.0 } else { 100.0 }
    } else {
        numerator / denominator * 100.0
    }
}

impl PlacementReport {
    /// Extract the selected placement and its coverage from an outcome.
    pub fn from_outcome(model: &PlacementModel, map: &DetectionMap, outcome: &SolveOutcome) -> Self {
        let candidates = map.candidates();
        let sources: Vec<bool> = model
            .layout
            .sources
            .iter()
            .map(|&v| outcome.value(v) > SELECTION_THRESHOLD)
            .collect();
        let receivers: Vec<bool> = model
            .layout
            .receivers
            .iter()
            .map(|&v| outcome.value(v) > SELECTION_THRESHOLD)
            .collect();

        let pick = |flags: &[bool]| -> Vec<Cell> {
            flags
                .iter()
                .zip(candidates)
                .filter(|(f, _)| **f)
                .map(|(_, &c)| c)
                .collect()
        };

        let (covered, uncovered) = match &model.layout.covered {
            Some(vars) => {
                let mut covered = Vec::new();
                let mut uncovered = Vec::new();
                for (&target, &var) in map.targets().iter().zip(vars) {
                    if outcome.value(var) > SELECTION_THRESHOLD {
                        covered.push(target);
                    } else {
                        uncovered.push(target);
                    }
                }
                (Some(covered), Some(uncovered))
            }
            None => (None, None),
        };

        let coverage = map
            .targets()
            .iter()
            .map(|&target| TargetCoverage {
                target,
                total: map.coverage_of(target, &sources, &receivers),
            })
            .collect();

        Self {
            status: outcome.status,
            objective: outcome.objective,
            best_bound: outcome.best_bound,
            gap_percent: optimality_gap(model.regime, outcome.objective, outcome.best_bound),
            sources: pick(&sources),
            receivers: pick(&receivers),
            covered,
            uncovered,
            coverage,
            heuristic_objective: None,
            lazy_cuts: None,
            user_cuts: None,
        }
    }

    /// Serialize the report as YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
