//! Detection predicate for one (target, heading, source, receiver) triple.
//!
//! Distances: `d1 = |s - t|`, `d2 = |r - t|`, `d3 = |s - r|`.
//! Effective range `ρ = ρ₀ + g(α)` where `g` is the target strength and
//!
//! ```text
//! α = ½·((s - t)·h)/|s - t| + ½·((r - t)·h)/|r - t|,   h = (cos θ, sin θ, 0)
//! ```
//!
//! **Cookie-cutter**: detected iff `d1·d2 ≤ ρ²` (inside the Cassini oval) and
//! `d1 + d2 ≥ d3 + 2·rb` (outside the direct-blast zone), with both legs clear.
//!
//! **Probabilistic**:
//!
//! ```text
//! x₁ = (d1·d2/ρ² - 1) / b1
//! x₂ = (1 - (d1 + d2)/(d3 + 2·rb)) / b2
//! p  = pmax / (1 + 10^x₁) / (1 + 10^x₂)
//! ```
//!
//! A triple is kept iff `p > pmin` and both legs are clear; its value is
//! `ln(1 - p)`. Exponents at or above the overflow guard skip the triple.

use crate::config::{DetectionModel, DetectionSection};
use crate::core::{Cell, Heading};
use crate::grid::{OceanGrid, line_of_sight};

use super::TargetStrength;

/// Why a triple produced no detection entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Source or receiver sits on the target
    Coincident,
    /// Inside the direct-blast zone
    DirectBlast,
    /// Outside the range envelope (or non-positive effective range)
    OutOfRange,
    /// Exponent reached the overflow guard
    Overflow,
    /// Probability not above pmin
    BelowFloor,
    /// A leg crosses land
    Blocked,
}

/// Result of evaluating one triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// Detection value (1 or ln(1 - p))
    Detected(f64),
    /// No entry
    Rejected(Rejection),
}

/// Detection test bound to a grid and detection settings.
pub struct DetectionPredicate<'a> {
    grid: &'a OceanGrid,
    settings: &'a DetectionSection,
    strength: TargetStrength,
}

impl<'a> DetectionPredicate<'a> {
    /// Create a predicate for the given grid and settings.
    pub fn new(grid: &'a OceanGrid, settings: &'a DetectionSection) -> Self {
        Self {
            grid,
            settings,
            strength: TargetStrength::new(&settings.target_strength),
        }
    }

    /// Target strength table in use
    pub fn target_strength(&self) -> &TargetStrength {
        &self.strength
    }

    /// Bistatic aspect of the target for the given heading.
    pub fn aspect(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> f64 {
        let (hx, hy) = heading.direction();
        let t = self.grid.position(target);
        let half_projection = |p: Cell| {
            let q = self.grid.position(p);
            let (dx, dy, dz) = (q[0] - t[0], q[1] - t[1], q[2] - t[2]);
            let norm = (dx * dx + dy * dy + dz * dz).sqrt();
            0.5 * (dx * hx + dy * hy) / norm
        };
        half_projection(source) + half_projection(receiver)
    }

    /// Effective range of the day for this geometry.
    fn effective_range(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> f64 {
        match heading {
            Heading::Isotropic => self.settings.rho_0,
            Heading::Degrees(_) if self.strength.is_isotropic() => self.settings.rho_0,
            Heading::Degrees(_) => {
                let alpha = self.aspect(target, heading, source, receiver);
                self.settings.rho_0 + self.strength.gain(alpha)
            }
        }
    }

    fn legs_clear(&self, target: Cell, source: Cell, receiver: Cell) -> bool {
        line_of_sight(self.grid, source, target) && line_of_sight(self.grid, target, receiver)
    }

    /// Evaluate one triple with the configured model.
    pub fn evaluate(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> Verdict {
        if source == target || receiver == target {
            return Verdict::Rejected(Rejection::Coincident);
        }
        match self.settings.model {
            DetectionModel::CookieCutter => self.cookie_cutter(target, heading, source, receiver),
            DetectionModel::Probabilistic => self.probabilistic(target, heading, source, receiver),
        }
    }

    fn cookie_cutter(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> Verdict {
        let d1 = self.grid.distance(source, target);
        let d2 = self.grid.distance(receiver, target);
        let d3 = self.grid.distance(source, receiver);

        if d1 + d2 < d3 + 2.0 * self.settings.pulse_length {
            return Verdict::Rejected(Rejection::DirectBlast);
        }

        let rho = self.effective_range(target, heading, source, receiver);
        if rho <= 0.0 || d1 * d2 > rho * rho {
            return Verdict::Rejected(Rejection::OutOfRange);
        }

        if !self.legs_clear(target, source, receiver) {
            return Verdict::Rejected(Rejection::Blocked);
        }
        Verdict::Detected(1.0)
    }

    fn probabilistic(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> Verdict {
        let s = self.settings;
        let d1 = self.grid.distance(source, target);
        let d2 = self.grid.distance(receiver, target);
        let d3 = self.grid.distance(source, receiver);

        let rho = self.effective_range(target, heading, source, receiver);
        if rho <= 0.0 {
            return Verdict::Rejected(Rejection::OutOfRange);
        }

        let x1 = (d1 * d2 / (rho * rho) - 1.0) / s.b1;
        let x2 = (1.0 - (d1 + d2) / (d3 + 2.0 * s.pulse_length)) / s.b2;
        if x1 >= s.overflow_guard || x2 >= s.overflow_guard {
            return Verdict::Rejected(Rejection::Overflow);
        }

        let p = s.p_max / (1.0 + 10f64.powf(x1)) / (1.0 + 10f64.powf(x2));
        if !(p > s.p_min) {
            return Verdict::Rejected(Rejection::BelowFloor);
        }

        if !self.legs_clear(target, source, receiver) {
            return Verdict::Rejected(Rejection::Blocked);
        }
        Verdict::Detected((1.0 - p).ln())
    }
}
