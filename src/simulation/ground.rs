//! Endlessly scrolling floor made of two leapfrogging tiles.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// The floor. Only its line matters to physics; the tile offsets are cosmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollingGround {
    /// Vertical position of the ground line.
    pub y: f32,
    /// Left edge of the first tile.
    pub x1: f32,
    /// Left edge of the second tile.
    pub x2: f32,
}

impl ScrollingGround {
    /// Places both tiles side by side starting at the left edge.
    pub fn new(params: &Params) -> Self {
        Self {
            y: params.ground_y,
            x1: 0.0,
            x2: params.ground_tile_width,
        }
    }

    /// Scrolls both tiles and moves whichever left the screen behind the other.
    pub fn advance(&mut self, params: &Params) {
        let width = params.ground_tile_width;
        self.x1 -= params.ground_speed;
        self.x2 -= params.ground_speed;

        if self.x1 + width < 0.0 {
            self.x1 = self.x2 + width;
        }
        if self.x2 + width < 0.0 {
            self.x2 = self.x1 + width;
        }
    }
}
