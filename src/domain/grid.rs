// Grid coordinate space shared with the external layout renderer
use serde::{Deserialize, Serialize};

/// Geometry rules of the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridSettings {
    pub columns: u32,
    pub min_w: u32,
    pub min_h: u32,
    pub duplicate_offset_x: u32,
    pub duplicate_offset_y: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 12,
            min_w: 2,
            min_h: 2,
            duplicate_offset_x: 2,
            duplicate_offset_y: 1,
        }
    }
}

impl GridSettings {
    pub fn clamp_w(&self, w: u32) -> u32 {
        w.max(self.min_w)
    }

    pub fn clamp_h(&self, h: u32) -> u32 {
        h.max(self.min_h)
    }

    /// Column of a copy placed next to a widget at `x`, wrapping on the grid width.
    pub fn duplicate_x(&self, x: u32) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        // Reduce both terms first; their sum then stays below 2 * columns.
        (x % self.columns + self.duplicate_offset_x % self.columns) % self.columns
    }

    /// Row of a copy, saturating at the bottom of the coordinate space.
    pub fn duplicate_y(&self, y: u32) -> u32 {
        y.saturating_add(self.duplicate_offset_y)
    }
}

/// Positional record reported by the grid renderer after a drag or resize.
/// It knows nothing about widget types or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LayoutItem {
    #[serde(rename = "i")]
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Where a freshly created widget should land. Missing coordinates default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Placement {
    #[serde(default)]
    pub x: Option<u32>,
    #[serde(default)]
    pub y: Option<u32>,
}

impl Placement {
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}
