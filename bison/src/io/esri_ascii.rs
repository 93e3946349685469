//! ESRI ASCII elevation grids.
//!
//! Format:
//! - Header lines `key value`, keys case-insensitive and in any order:
//!   `ncols`, `nrows` (required), `xllcorner`, `yllcorner`, `cellsize`,
//!   `nodata_value` (optional)
//! - `nrows` rows of `ncols` whitespace-separated samples, northern-most
//!   row first
//!
//! Samples equal to `nodata_value` are stored as NaN and count as land.

use std::io::Read;
use std::path::Path;

use crate::error::GridError;
use crate::grid::OceanGrid;

/// Full-resolution elevation grid as read from disk.
#[derive(Clone, Debug)]
pub struct EsriGrid {
    /// Number of columns
    pub ncols: usize,
    /// Number of rows
    pub nrows: usize,
    /// Lower-left corner x
    pub xllcorner: f64,
    /// Lower-left corner y
    pub yllcorner: f64,
    /// Cell size
    pub cellsize: f64,
    /// Samples in file order (row 0 = north), `samples[row * ncols + col]`
    pub samples: Vec<f64>,
}

impl EsriGrid {
    /// Sample at file row/column.
    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.ncols + col]
    }

    /// Block-average the grid down to `cells_x × cells_y` cells.
    ///
    /// Each output cell averages a `⌊ncols/cells_x⌋ × ⌊nrows/cells_y⌋` block
    /// taken from the top-left of the file. Output row 0 is the southern-most
    /// block row.
    pub fn subsample(&self, cells_x: usize, cells_y: usize) -> Result<OceanGrid, GridError> {
        if cells_x == 0 || cells_y == 0 || cells_x > self.ncols || cells_y > self.nrows {
            return Err(GridError::Undersized {
                ncols: self.ncols,
                nrows: self.nrows,
                cells_x,
                cells_y,
            });
        }

        let block_x = self.ncols / cells_x;
        let block_y = self.nrows / cells_y;
        let block_area = (block_x * block_y) as f64;

        let mut elevation = vec![0.0; cells_x * cells_y];
        for y in 0..cells_y {
            let top = (cells_y - 1 - y) * block_y;
            for x in 0..cells_x {
                let left = x * block_x;
                let mut sum = 0.0;
                for row in top..top + block_y {
                    for col in left..left + block_x {
                        sum += self.sample(row, col);
                    }
                }
                elevation[y * cells_x + x] = sum / block_area;
            }
        }

        log::info!(
            "Sub-sampled {}x{} elevation grid to {}x{} ({}x{} blocks)",
            self.ncols,
            self.nrows,
            cells_x,
            cells_y,
            block_x,
            block_y
        );

        OceanGrid::new(cells_x, cells_y, elevation)
    }
}

/// Load an ESRI ASCII grid from a file.
pub fn load_esri_ascii(path: &Path) -> Result<EsriGrid, GridError> {
    let mut file = std::fs::File::open(path)?;
    read_esri_ascii(&mut file)
}

/// Read an ESRI ASCII grid from a reader.
pub fn read_esri_ascii<R: Read>(reader: &mut R) -> Result<EsriGrid, GridError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_esri_ascii(&text)
}

/// Parse an ESRI ASCII grid from text.
pub fn parse_esri_ascii(text: &str) -> Result<EsriGrid, GridError> {
    let mut ncols = None;
    let mut nrows = None;
    let mut xllcorner = 0.0;
    let mut yllcorner = 0.0;
    let mut cellsize = 1.0;
    let mut nodata = None;

    let mut lines = text.lines().peekable();
    while let Some(line) = lines.peek() {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else {
            lines.next();
            continue;
        };
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        let value = parts
            .next()
            .ok_or_else(|| GridError::Header(format!("missing value for '{}'", key)))?;
        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| GridError::Header(format!("invalid value '{}' for '{}'", v, key)))
        };
        match key.to_ascii_lowercase().as_str() {
            "ncols" => ncols = Some(parse_count(key, value)?),
            "nrows" => nrows = Some(parse_count(key, value)?),
            "xllcorner" | "xllcenter" => xllcorner = parse(value)?,
            "yllcorner" | "yllcenter" => yllcorner = parse(value)?,
            "cellsize" => cellsize = parse(value)?,
            "nodata_value" => nodata = Some(parse(value)?),
            other => log::debug!("Ignoring grid header key '{}'", other),
        }
        lines.next();
    }

    let ncols = ncols.ok_or_else(|| GridError::Header("missing ncols".into()))?;
    let nrows = nrows.ok_or_else(|| GridError::Header("missing nrows".into()))?;
    if ncols == 0 || nrows == 0 {
        return Err(GridError::Header(format!(
            "grid must have positive dimensions, got {}x{}",
            ncols, nrows
        )));
    }

    let expected = ncols.checked_mul(nrows).ok_or_else(|| {
        GridError::Header(format!("grid size {}x{} overflows", ncols, nrows))
    })?;
    let mut samples = Vec::new();
    for token in lines.flat_map(str::split_whitespace) {
        if samples.len() == expected {
            break;
        }
        let value: f64 = token.parse().map_err(|_| GridError::Data {
            index: samples.len(),
            message: format!("'{}' is not a number", token),
        })?;
        samples.push(match nodata {
            Some(nd) if value == nd => f64::NAN,
            _ => value,
        });
    }
    if samples.len() < expected {
        return Err(GridError::Truncated {
            expected,
            found: samples.len(),
        });
    }

    Ok(EsriGrid {
        ncols,
        nrows,
        xllcorner,
        yllcorner,
        cellsize,
        samples,
    })
}

fn parse_count(key: &str, value: &str) -> Result<usize, GridError> {
    // Some exporters write counts as floats ("ncols 120.0")
    value
        .parse::<usize>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as usize)
        })
        .ok_or_else(|| GridError::Header(format!("invalid value '{}' for '{}'", value, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    const SMALL: &str = "ncols 4
nrows 4
xllcorner 127.0
yllcorner 39.0
cellsize 0.01
NODATA_value -9999
-1 -1 5 5
-1 -1 5 5
-3 -3 -9999 -2
-3 -3 -2 -2
";

    #[test]
    fn test_parse_header_and_samples() {
        let grid = parse_esri_ascii(SMALL).unwrap();
        assert_eq!(grid.ncols, 4);
        assert_eq!(grid.nrows, 4);
        assert_eq!(grid.xllcorner, 127.0);
        assert_eq!(grid.sample(0, 2), 5.0);
        assert!(grid.sample(2, 2).is_nan());
    }

    #[test]
    fn test_subsample_flips_rows() {
        let grid = parse_esri_ascii(SMALL).unwrap();
        let ocean = grid.subsample(2, 2).unwrap();
        // Northern blocks land in row 1
        assert_eq!(ocean.elevation(0, 1), Some(-1.0));
        assert_eq!(ocean.elevation(1, 1), Some(5.0));
        assert_eq!(ocean.elevation(0, 0), Some(-3.0));
        // Block containing nodata is land
        assert!(!ocean.is_ocean(Cell::new(1, 0)));
        assert!(ocean.is_ocean(Cell::new(0, 0)));
        assert!(!ocean.is_ocean(Cell::new(1, 1)));
    }

    #[test]
    fn test_subsample_identity() {
        let grid = parse_esri_ascii(SMALL).unwrap();
        let ocean = grid.subsample(4, 4).unwrap();
        assert_eq!(ocean.elevation(0, 3), Some(-1.0));
        assert_eq!(ocean.elevation(3, 0), Some(-2.0));
    }

    #[test]
    fn test_subsample_too_large() {
        let grid = parse_esri_ascii(SMALL).unwrap();
        assert!(matches!(
            grid.subsample(5, 2),
            Err(GridError::Undersized { .. })
        ));
    }

    #[test]
    fn test_missing_dimensions() {
        assert!(matches!(
            parse_esri_ascii("nrows 2\n1 2\n3 4\n"),
            Err(GridError::Header(_))
        ));
        assert!(matches!(
            parse_esri_ascii("ncols 0\nnrows 2\n"),
            Err(GridError::Header(_))
        ));
    }

    #[test]
    fn test_truncated_data() {
        assert!(matches!(
            parse_esri_ascii("ncols 2\nnrows 2\n1 2\n3\n"),
            Err(GridError::Truncated {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_huge_declared_size_is_truncated() {
        assert!(matches!(
            parse_esri_ascii("ncols 4000000000\nnrows 4000000000\n-1 -1\n"),
            Err(GridError::Truncated { found: 2, .. })
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let text = format!("ncols {}\nnrows 2\n-1 -1\n", usize::MAX);
        assert!(matches!(parse_esri_ascii(&text), Err(GridError::Header(_))));
    }

    #[test]
    fn test_non_numeric_sample() {
        assert!(matches!(
            parse_esri_ascii("ncols 2\nnrows 1\n1 abc\n"),
            Err(GridError::Data { index: 1, .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topo.asc");
        std::fs::write(&path, SMALL).unwrap();
        let grid = load_esri_ascii(&path).unwrap();
        assert_eq!(grid.samples.len(), 16);
    }
}
