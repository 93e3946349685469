//! Equipment and objective configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Optimization goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveRegime {
    /// Cover every target, minimize deployment cost
    #[default]
    MinimizeCost,
    /// Deploy a fixed number of sources/receivers, maximize covered targets
    MaximizeCoverage,
}

/// Equipment settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EquipmentSection {
    /// Objective regime
    #[serde(default)]
    pub objective: ObjectiveRegime,

    /// Cost per deployed source (cost minimization)
    #[serde(default = "defaults::source_cost")]
    pub source_cost: f64,

    /// Cost per deployed receiver (cost minimization)
    #[serde(default = "defaults::receiver_cost")]
    pub receiver_cost: f64,

    /// Number of sources to deploy (coverage maximization)
    #[serde(default = "defaults::source_count")]
    pub source_count: usize,

    /// Number of receivers to deploy (coverage maximization)
    #[serde(default = "defaults::receiver_count")]
    pub receiver_count: usize,
}

impl Default for EquipmentSection {
    fn default() -> Self {
        Self {
            objective: ObjectiveRegime::MinimizeCost,
            source_cost: 12.0,
            receiver_cost: 4.0,
            source_count: 2,
            receiver_count: 2,
        }
    }
}
