//! Aspect-dependent target strength.
//!
//! The table holds `(angle°, strength)` control points over 0..=180°, where 0°
//! is end-on (bow or stern) and 90° is beam-on. Strength is expressed as an
//! additive bonus to the range of the day, in grid cells.
//!
//! The function is evaluated on the aspect `α`, the cosine of the incidence
//! angle, and interpolates linearly in the cosine domain:
//!
//! ```text
//!  strength
//!     │            ●              α = cos(a):  1 ──── 0 ──── -1
//!     │       ●         ●
//!     │  ●                   ●
//!     └──────────────────────── angle
//!     0°         90°        180°
//! ```

/// Piecewise-linear target strength in the cosine domain.
#[derive(Clone, Debug, Default)]
pub struct TargetStrength {
    /// `(cos(angle), strength)` pairs, cosines non-increasing
    points: Vec<(f64, f64)>,
}

impl TargetStrength {
    /// Build from `[angle_deg, strength]` control points sorted by angle.
    pub fn new(table: &[[f64; 2]]) -> Self {
        let points = table
            .iter()
            .map(|[angle, strength]| (angle.to_radians().cos(), *strength))
            .collect();
        Self { points }
    }

    /// True when the table cannot describe an aspect dependence.
    #[inline]
    pub fn is_isotropic(&self) -> bool {
        self.points.len() < 2
    }

    /// Range bonus for aspect `alpha` (cosine of the incidence angle).
    ///
    /// Uses the first segment `i` with `cos(a_i) ≥ α ≥ cos(a_{i+1})`, or its
    /// mirror `-cos(a_i) ≤ α ≤ -cos(a_{i+1})`. Returns 0 when no segment
    /// matches or the table is isotropic.
    pub fn gain(&self, alpha: f64) -> f64 {
        for pair in self.points.windows(2) {
            let (w_i, s_i) = pair[0];
            let (w_next, s_next) = pair[1];

            if w_i >= alpha && alpha >= w_next {
                return s_i + (s_next - s_i) * (alpha - w_i) / (w_next - w_i);
            }
            if -w_i <= alpha && alpha <= -w_next {
                return s_i + (s_next - s_i) * (alpha + w_i) / (w_i - w_next);
            }
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> TargetStrength {
        TargetStrength::new(&[[0.0, 0.1], [30.0, 0.4], [75.0, 0.3], [90.0, 1.0]])
    }

    #[test]
    fn test_exact_at_control_points() {
        let ts = table();
        assert_relative_eq!(ts.gain(1.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(ts.gain(30f64.to_radians().cos()), 0.4, epsilon = 1e-12);
        assert_relative_eq!(ts.gain(75f64.to_radians().cos()), 0.3, epsilon = 1e-12);
        assert_relative_eq!(ts.gain(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_in_cosine_domain() {
        let ts = table();
        let w0 = 1.0;
        let w1 = 30f64.to_radians().cos();
        let mid = 0.5 * (w0 + w1);
        assert_relative_eq!(ts.gain(mid), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_mirrored_branch() {
        let ts = table();
        // Negative aspect uses the mirrored segment
        assert_relative_eq!(ts.gain(-1.0), 0.1, epsilon = 1e-12);
        let w1 = 30f64.to_radians().cos();
        assert_relative_eq!(ts.gain(-w1), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_at_breakpoints() {
        let ts = table();
        let w = 75f64.to_radians().cos();
        let eps = 1e-9;
        assert_relative_eq!(ts.gain(w + eps), ts.gain(w - eps), epsilon = 1e-6);
    }

    #[test]
    fn test_isotropic_tables() {
        assert!(TargetStrength::new(&[]).is_isotropic());
        let single = TargetStrength::new(&[[0.0, 3.0]]);
        assert!(single.is_isotropic());
        assert_eq!(single.gain(0.5), 0.0);
    }

    #[test]
    fn test_no_matching_segment() {
        // Table only covers 0..30 degrees
        let ts = TargetStrength::new(&[[0.0, 1.0], [30.0, 2.0]]);
        assert_eq!(ts.gain(0.0), 0.0);
    }
}
