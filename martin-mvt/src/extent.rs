use serde::{Deserialize, Serialize};

/// Side length of the tile-local grid every coordinate is normalized into.
pub const TILE_EXTENT: u32 = 4096;

/// Geographic bounding box covered by a tile.
///
/// The box only scales coordinates into the fixed [`TILE_EXTENT`] grid,
/// it never changes the grid resolution. A zero-width or zero-height box
/// produces non-finite coordinates, so callers must pass a non-degenerate one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Maps a geographic coordinate into tile-local space.
    #[must_use]
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = f64::from(TILE_EXTENT);
        (
            (x - self.min_x) * scale / (self.max_x - self.min_x),
            (y - self.min_y) * scale / (self.max_y - self.min_y),
        )
    }
}

impl Default for Extent {
    /// The identity box, where geographic and tile-local coordinates coincide.
    fn default() -> Self {
        let max = f64::from(TILE_EXTENT);
        Self::new(0.0, 0.0, max, max)
    }
}
