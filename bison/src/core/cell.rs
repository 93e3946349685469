//! Grid cell coordinates and target headings.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Integer cell coordinate on the (optionally layered) ocean grid.
///
/// `x` is the column, `y` the row counted from the southern edge, and `z`
/// the depth-layer index (always 0 on a 2-D grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column index
    pub x: i32,
    /// Row index (0 = southern-most row)
    pub y: i32,
    /// Depth-layer index (0 on 2-D grids)
    pub z: i32,
}

impl Cell {
    /// Create a 2-D cell (layer 0).
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Create a cell on a specific depth layer.
    #[inline]
    pub const fn layered(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance in index space (number of traversal steps).
    #[inline]
    pub fn chebyshev_distance(&self, other: &Cell) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }
}

impl Sub for Cell {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Cell::layered(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.z == 0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        }
    }
}

/// Target heading (aspect) used when evaluating target strength.
///
/// When no target-strength table is configured every target is treated as
/// isotropic and the single `Isotropic` heading is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heading {
    /// Aspect ignored
    Isotropic,
    /// Heading in whole degrees, 0 <= θ < 180
    Degrees(u16),
}

impl Heading {
    /// Heading angle in radians (0 for the isotropic sentinel).
    #[inline]
    pub fn radians(self) -> f64 {
        match self {
            Heading::Isotropic => 0.0,
            Heading::Degrees(deg) => f64::from(deg).to_radians(),
        }
    }

    /// Unit direction vector of the heading in the horizontal plane.
    #[inline]
    pub fn direction(self) -> (f64, f64) {
        let theta = self.radians();
        (theta.cos(), theta.sin())
    }

    /// Short label used in variable names (`iso`, `30`, ...).
    pub fn label(self) -> String {
        match self {
            Heading::Isotropic => "iso".to_string(),
            Heading::Degrees(deg) => deg.to_string(),
        }
    }

    /// Discretize the half circle with the given step.
    ///
    /// Returns `[Isotropic]` when `modeled` is false or the step is zero.
    pub fn discretize(step_degrees: u16, modeled: bool) -> Vec<Heading> {
        if !modeled || step_degrees == 0 {
            return vec![Heading::Isotropic];
        }
        (0..180u16)
            .step_by(usize::from(step_degrees))
            .map(Heading::Degrees)
            .collect()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heading::Isotropic => write!(f, "isotropic"),
            Heading::Degrees(deg) => write!(f, "{}°", deg),
        }
    }
}
