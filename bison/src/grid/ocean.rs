//! Elevation samples and the derived ocean mask.

use crate::config::DepthLayerSettings;
use crate::core::Cell;
use crate::error::GridError;

/// Elevation grid in row-major order with `y = 0` at the southern edge.
///
/// A 2-D cell is ocean when its elevation is negative. With depth layers a
/// voxel `(x, y, k)` is ocean when the column is deeper than `(k + 1)` layer
/// spacings, so every layer of a column is contiguous from the surface down.
#[derive(Clone, Debug)]
pub struct OceanGrid {
    width: usize,
    height: usize,
    elevation: Vec<f64>,
    layers: Option<DepthLayerSettings>,
}

impl OceanGrid {
    /// Build a 2-D grid from elevations (`elevation[y * width + x]`).
    pub fn new(width: usize, height: usize, elevation: Vec<f64>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Header(format!(
                "grid must have positive dimensions, got {}x{}",
                width, height
            )));
        }
        if elevation.len() != width * height {
            return Err(GridError::Truncated {
                expected: width * height,
                found: elevation.len(),
            });
        }
        Ok(Self {
            width,
            height,
            elevation,
            layers: None,
        })
    }

    /// Extend the grid with uniform depth layers.
    pub fn with_depth_layers(mut self, layers: Option<DepthLayerSettings>) -> Self {
        self.layers = layers;
        self
    }

    /// Grid width (cells in x)
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (cells in y)
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of depth layers (1 for a 2-D grid).
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.as_ref().map_or(1, |l| l.count as usize)
    }

    /// Is this a layered (3-D) grid?
    #[inline]
    pub fn is_layered(&self) -> bool {
        self.layers.is_some()
    }

    /// Elevation of a surface cell, `None` outside the grid.
    pub fn elevation(&self, x: i32, y: i32) -> Option<f64> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.elevation[y * self.width + x])
    }

    /// Ocean test. Cells outside the grid are never ocean.
    pub fn is_ocean(&self, cell: Cell) -> bool {
        let Some(elevation) = self.elevation(cell.x, cell.y) else {
            return false;
        };
        match &self.layers {
            None => cell.z == 0 && elevation < 0.0,
            Some(layers) => {
                cell.z >= 0
                    && (cell.z as u32) < layers.count
                    && elevation < -(f64::from(cell.z) + 1.0) * layers.spacing_m
            }
        }
    }

    /// All ocean cells (voxels when layered), ordered by layer, row, column.
    pub fn ocean_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for z in 0..self.layer_count() as i32 {
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    let cell = Cell::layered(x, y, z);
                    if self.is_ocean(cell) {
                        cells.push(cell);
                    }
                }
            }
        }
        cells
    }

    /// Euclidean position of a cell in horizontal cell units.
    ///
    /// Depth layers are scaled by `cells_per_layer`.
    #[inline]
    pub fn position(&self, cell: Cell) -> [f64; 3] {
        let z_scale = self.layers.as_ref().map_or(1.0, |l| l.cells_per_layer);
        [
            f64::from(cell.x),
            f64::from(cell.y),
            f64::from(cell.z) * z_scale,
        ]
    }

    /// Euclidean distance between two cells.
    #[inline]
    pub fn distance(&self, a: Cell, b: Cell) -> f64 {
        let pa = self.position(a);
        let pb = self.position(b);
        let dx = pa[0] - pb[0];
        let dy = pa[1] - pb[1];
        let dz = pa[2] - pb[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island() -> OceanGrid {
        // 3x3, land in the middle
        let mut elevation = vec![-50.0; 9];
        elevation[4] = 10.0;
        OceanGrid::new(3, 3, elevation).unwrap()
    }

    #[test]
    fn test_ocean_mask_2d() {
        let grid = island();
        assert!(grid.is_ocean(Cell::new(0, 0)));
        assert!(!grid.is_ocean(Cell::new(1, 1)));
        assert!(!grid.is_ocean(Cell::new(3, 0)));
        assert!(!grid.is_ocean(Cell::new(-1, 0)));
        assert_eq!(grid.ocean_cells().len(), 8);
    }

    #[test]
    fn test_zero_elevation_is_land() {
        let grid = OceanGrid::new(2, 1, vec![0.0, -0.1]).unwrap();
        assert!(!grid.is_ocean(Cell::new(0, 0)));
        assert!(grid.is_ocean(Cell::new(1, 0)));
    }

    #[test]
    fn test_nan_is_land() {
        let grid = OceanGrid::new(1, 1, vec![f64::NAN]).unwrap();
        assert!(grid.ocean_cells().is_empty());
    }

    #[test]
    fn test_layered_mask() {
        let layers = DepthLayerSettings {
            count: 3,
            spacing_m: 10.0,
            cells_per_layer: 0.5,
        };
        let grid = OceanGrid::new(2, 1, vec![-25.0, -5.0])
            .unwrap()
            .with_depth_layers(Some(layers));
        assert!(grid.is_ocean(Cell::layered(0, 0, 0)));
        assert!(grid.is_ocean(Cell::layered(0, 0, 1)));
        assert!(!grid.is_ocean(Cell::layered(0, 0, 2)));
        assert!(!grid.is_ocean(Cell::layered(1, 0, 0)));
        assert_eq!(grid.ocean_cells().len(), 2);
        assert!((grid.distance(Cell::layered(0, 0, 0), Cell::layered(0, 0, 2)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_size_mismatch() {
        assert!(OceanGrid::new(2, 2, vec![-1.0; 3]).is_err());
        assert!(OceanGrid::new(0, 2, vec![]).is_err());
    }
}
