//! Bresenham traversal and the line-of-sight oracle.
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●
//!     2 │     ●●
//!     1 │  ●●
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```
//!
//! The 3-D form drives along the axis with the largest delta and keeps one
//! error accumulator for each of the other two axes. With `Δz = 0` it visits
//! exactly the cells of the 2-D form.

use crate::core::Cell;

use super::OceanGrid;

/// Bresenham line iterator over grid cells, start and end inclusive.
pub struct BresenhamLine {
    current: [i32; 3],
    end: [i32; 3],
    step: [i32; 3],
    delta: [i32; 3],
    error: [i32; 3],
    driving: usize,
    done: bool,
}

impl BresenhamLine {
    /// Create a new line iterator from start to end.
    pub fn new(start: Cell, end: Cell) -> Self {
        let current = [start.x, start.y, start.z];
        let end = [end.x, end.y, end.z];

        let mut delta = [0; 3];
        let mut step = [0; 3];
        for axis in 0..3 {
            delta[axis] = (end[axis] - current[axis]).abs();
            step[axis] = if end[axis] > current[axis] { 1 } else { -1 };
        }

        // First axis wins ties so 2-D lines keep x as the driving axis
        let mut driving = 0;
        for axis in 1..3 {
            if delta[axis] > delta[driving] {
                driving = axis;
            }
        }

        let half = delta[driving] / 2;
        Self {
            current,
            end,
            step,
            delta,
            error: [half; 3],
            driving,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = Cell::layered(self.current[0], self.current[1], self.current[2]);

        if self.current == self.end {
            self.done = true;
            return Some(result);
        }

        let major = self.delta[self.driving];
        for axis in 0..3 {
            if axis == self.driving {
                continue;
            }
            self.error[axis] -= self.delta[axis];
            if self.error[axis] < 0 {
                self.current[axis] += self.step[axis];
                self.error[axis] += major;
            }
        }
        self.current[self.driving] += self.step[self.driving];

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (self.end[self.driving] - self.current[self.driving]).unsigned_abs() as usize + 1;
        (remaining, Some(remaining))
    }
}

/// Is every cell on the traversal from `from` to `to` ocean?
///
/// Both endpoints are tested. Coincident endpoints are clear exactly when
/// that cell is ocean.
pub fn line_of_sight(grid: &OceanGrid, from: Cell, to: Cell) -> bool {
    BresenhamLine::new(from, to).all(|cell| grid.is_ocean(cell))
}
