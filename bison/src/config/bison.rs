//! Main BisonConfig and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::detection::{DetectionModel, DetectionSection};
use super::equipment::{EquipmentSection, ObjectiveRegime};
use super::error::ConfigLoadError;
use super::grid::GridSection;
use super::optimization::{HeuristicSection, LimitsSection, OptimizationSection};

/// Full run configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct BisonConfig {
    /// Grid settings
    #[serde(default)]
    pub grid: GridSection,

    /// Equipment and objective
    #[serde(default)]
    pub equipment: EquipmentSection,

    /// Detection physics
    #[serde(default)]
    pub detection: DetectionSection,

    /// Formulation and cuts
    #[serde(default)]
    pub optimization: OptimizationSection,

    /// Warm-start heuristic
    #[serde(default)]
    pub heuristic: HeuristicSection,

    /// Time limits
    #[serde(default)]
    pub limits: LimitsSection,
}

impl BisonConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/bison.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/bison.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Objective regime shortcut
    pub fn objective(&self) -> ObjectiveRegime {
        self.equipment.objective
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let invalid = |msg: String| Err(ConfigLoadError::Invalid(msg));
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if self.grid.cells_x == 0 || self.grid.cells_y == 0 {
            return invalid("grid.cells_x and grid.cells_y must be positive".into());
        }
        if let Some(layers) = &self.grid.depth_layers
            && (layers.count == 0 || !positive(layers.spacing_m) || !positive(layers.cells_per_layer))
        {
            return invalid("grid.depth_layers needs a positive count and spacing".into());
        }

        let det = &self.detection;
        if !positive(det.rho_0) {
            return invalid(format!("detection.rho_0 must be positive, got {}", det.rho_0));
        }
        if !non_negative(det.pulse_length) {
            return invalid("detection.pulse_length must be finite and not negative".into());
        }
        if !positive(det.overflow_guard) {
            return invalid("detection.overflow_guard must be positive".into());
        }
        if det.model == DetectionModel::Probabilistic {
            if !(0.0 < det.p_max && det.p_max < 1.0) {
                return invalid(format!("detection.p_max must be in (0, 1), got {}", det.p_max));
            }
            if !(0.0 <= det.p_min && det.p_min < det.p_max) {
                return invalid("detection.p_min must be in [0, p_max)".into());
            }
            if !(0.0 < det.required_probability && det.required_probability < 1.0) {
                return invalid("detection.required_probability must be in (0, 1)".into());
            }
            if !positive(det.b1) || !positive(det.b2) {
                return invalid("detection.b1 and detection.b2 must be positive".into());
            }
        }
        if det.models_headings() {
            if det.heading_step == 0 || det.heading_step > 180 {
                return invalid("detection.heading_step must be in 1..=180".into());
            }
            let mut previous = f64::NEG_INFINITY;
            for [angle, strength] in &det.target_strength {
                if !strength.is_finite() {
                    return invalid(format!("target strength at {} must be finite", angle));
                }
                if !(0.0..=180.0).contains(angle) {
                    return invalid(format!("target strength angle {} outside [0, 180]", angle));
                }
                if *angle <= previous {
                    return invalid("target strength angles must be strictly increasing".into());
                }
                previous = *angle;
            }
        }

        let eq = &self.equipment;
        match eq.objective {
            ObjectiveRegime::MinimizeCost => {
                if !non_negative(eq.source_cost) || !non_negative(eq.receiver_cost) {
                    return invalid("equipment costs must not be negative".into());
                }
            }
            ObjectiveRegime::MaximizeCoverage => {
                if eq.source_count == 0 || eq.receiver_count == 0 {
                    return invalid("coverage maximization needs at least one source and receiver".into());
                }
            }
        }

        if !non_negative(self.optimization.user_cut_tolerance) {
            return invalid("optimization.user_cut_tolerance must not be negative".into());
        }
        if !positive(self.limits.time_limit_secs) || !positive(self.heuristic.time_limit_secs) {
            return invalid("time limits must be positive and finite".into());
        }
        if let Some(limit) = self.heuristic.round_time_limit_secs
            && !positive(limit)
        {
            return invalid("heuristic.round_time_limit_secs must be positive".into());
        }
        Ok(())
    }
}
