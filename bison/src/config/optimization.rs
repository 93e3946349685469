//! Optimization, heuristic and time-limit configuration sections.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Model formulation handed to the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// Oral-Kettani linearization of the source·receiver product
    #[default]
    Linearized,
    /// Placement variables only; coverage enforced by lazy submodular cuts
    SubmodularCuts,
}

/// How row sums bound the linearization variables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundPolicy {
    /// Exact per-row sums
    Individual,
    /// One global extreme shared by every row
    #[default]
    Uniform,
}

/// How far the main solve proceeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMode {
    /// LP relaxation of the root node only
    RootRelaxation,
    /// Root node with cutting planes, no branching
    RootWithCuts,
    /// Until optimality or the time limit
    #[default]
    Complete,
}

/// Optimization settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationSection {
    /// Formulation
    #[serde(default)]
    pub formulation: Formulation,

    /// Row-sum bound policy
    #[serde(default)]
    pub bound_policy: BoundPolicy,

    /// Register the lazy submodular cut callback
    ///
    /// Always active for the `submodular_cuts` formulation.
    #[serde(default)]
    pub lazy_cuts: bool,

    /// Register the fractional user-cut callback
    #[serde(default)]
    pub user_cuts: bool,

    /// How much deeper than the lazy threshold a user cut must be violated
    #[serde(default = "defaults::user_cut_tolerance")]
    pub user_cut_tolerance: f64,

    /// Solve mode
    #[serde(default)]
    pub solve_mode: SolveMode,
}

impl Default for OptimizationSection {
    fn default() -> Self {
        Self {
            formulation: Formulation::Linearized,
            bound_policy: BoundPolicy::Uniform,
            lazy_cuts: false,
            user_cuts: false,
            user_cut_tolerance: 1.0,
            solve_mode: SolveMode::Complete,
        }
    }
}

/// Alternating heuristic settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeuristicSection {
    /// Number of restarts (0 disables the heuristic)
    #[serde(default = "defaults::heuristic_rounds")]
    pub rounds: u32,

    /// RNG seed for subset sampling (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Wall-clock budget for the whole heuristic phase (seconds)
    #[serde(default = "defaults::heuristic_time_limit")]
    pub time_limit_secs: f64,

    /// Time limit handed to each sub-solve (seconds)
    #[serde(default)]
    pub round_time_limit_secs: Option<f64>,

    /// Resampling attempts before giving up on finding an unseen subset
    #[serde(default = "defaults::max_sampling_attempts")]
    pub max_sampling_attempts: u32,
}

impl Default for HeuristicSection {
    fn default() -> Self {
        Self {
            rounds: 0,
            seed: None,
            time_limit_secs: 600.0,
            round_time_limit_secs: None,
            max_sampling_attempts: 1000,
        }
    }
}

impl HeuristicSection {
    /// Is the heuristic enabled?
    pub fn enabled(&self) -> bool {
        self.rounds > 0
    }
}

/// Overall limits section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitsSection {
    /// Wall-clock limit for the main solve (seconds)
    #[serde(default = "defaults::time_limit")]
    pub time_limit_secs: f64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            time_limit_secs: 3600.0,
        }
    }
}
