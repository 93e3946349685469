//! Detection physics configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which single-triple detection model is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionModel {
    /// Binary detection inside the Cassini-oval range envelope
    #[default]
    CookieCutter,
    /// Two-sided logistic decay, stored in the log domain
    Probabilistic,
}

/// Detection settings section
///
/// All ranges are expressed in horizontal grid cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionSection {
    /// Detection model
    #[serde(default)]
    pub model: DetectionModel,

    /// Range of the day (ρ₀)
    #[serde(default = "defaults::rho_0")]
    pub rho_0: f64,

    /// Pulse length rb (direct-blast zone half-width)
    #[serde(default = "defaults::pulse_length")]
    pub pulse_length: f64,

    /// Required detection probability per target (probabilistic model)
    #[serde(default = "defaults::required_probability")]
    pub required_probability: f64,

    /// Maximum single-pair detection probability (must stay below 1)
    #[serde(default = "defaults::p_max")]
    pub p_max: f64,

    /// Floor below which a single-pair probability is not materialized
    #[serde(default = "defaults::p_min")]
    pub p_min: f64,

    /// Decay rate at the outer (range) boundary
    #[serde(default = "defaults::b1")]
    pub b1: f64,

    /// Decay rate at the inner (direct-blast) boundary
    #[serde(default = "defaults::b2")]
    pub b2: f64,

    /// Largest base-10 exponent evaluated before a triple is skipped
    #[serde(default = "defaults::overflow_guard")]
    pub overflow_guard: f64,

    /// Target strength control points `[angle_deg, range_bonus]`, 0° = bow/stern
    #[serde(default)]
    pub target_strength: Vec<[f64; 2]>,

    /// Heading discretization step in degrees
    #[serde(default = "defaults::heading_step")]
    pub heading_step: u16,
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            model: DetectionModel::CookieCutter,
            rho_0: 4.0,
            pulse_length: 0.4,
            required_probability: 0.95,
            p_max: 0.95,
            p_min: 0.1,
            b1: 0.2,
            b2: 0.1,
            overflow_guard: 300.0,
            target_strength: Vec::new(),
            heading_step: 30,
        }
    }
}

impl DetectionSection {
    /// Are target headings modeled (at least two target-strength points)?
    pub fn models_headings(&self) -> bool {
        self.target_strength.len() >= 2
    }

    /// Coverage threshold in the units of the detection map.
    ///
    /// 1 for the cookie-cutter model, ln(1 - dp) for the probabilistic model.
    pub fn coverage_threshold(&self) -> f64 {
        match self.model {
            DetectionModel::CookieCutter => 1.0,
            DetectionModel::Probabilistic => (1.0 - self.required_probability).ln(),
        }
    }
}
