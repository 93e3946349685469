//! Grid configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Uniform depth layers that turn the surface grid into voxels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthLayerSettings {
    /// Number of layers below the surface
    pub count: u32,
    /// Vertical spacing between layers in meters (layer k sits at (k+1)*spacing_m)
    pub spacing_m: f64,
    /// Vertical spacing expressed in horizontal cell widths (for distances)
    pub cells_per_layer: f64,
}

/// Grid settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSection {
    /// ESRI ASCII elevation file
    #[serde(default)]
    pub input: Option<String>,

    /// Number of sub-sampled cells in x-direction
    #[serde(default = "defaults::subsample")]
    pub cells_x: usize,

    /// Number of sub-sampled cells in y-direction
    #[serde(default = "defaults::subsample")]
    pub cells_y: usize,

    /// Optional depth layers (3-D placement)
    #[serde(default)]
    pub depth_layers: Option<DepthLayerSettings>,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            input: None,
            cells_x: 10,
            cells_y: 10,
            depth_layers: None,
        }
    }
}
