//! Agent-versus-barrier overlap tests.
//!
//! Two fidelities are available behind the [`CollisionShape`] trait: a plain
//! axis-aligned bounding box and a per-pixel mask test. The shape is chosen
//! once from [`Params::collision`](super::params::Params::collision).

use geo::{Intersects, Rect, coord};
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::params::Params;

/// Which barrier of an obstacle a footprint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierSide {
    /// Barrier hanging from the top of the playfield.
    Top,
    /// Barrier standing on the ground.
    Bottom,
}

/// Axis-aligned footprint of one barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    /// Which half of the obstacle this is.
    pub side: BarrierSide,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Barrier {
    fn rect(&self) -> Rect<f32> {
        Rect::new(
            coord! { x: self.x, y: self.y },
            coord! { x: self.x + self.width, y: self.y + self.height },
        )
    }
}

/// Overlap test between an agent's footprint and a barrier.
pub trait CollisionShape: Send + Sync + std::fmt::Debug {
    /// Returns `true` when the agent touches the barrier.
    fn overlaps(&self, agent: &Agent, barrier: &Barrier, params: &Params) -> bool;

    /// Human readable name of this fidelity.
    fn name(&self) -> &'static str;
}

/// Selects a [`CollisionShape`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Per-pixel mask overlap.
    PixelMask,
    /// Axis-aligned rectangle overlap.
    BoundingBox,
}

impl CollisionKind {
    /// Builds the configured collision shape.
    pub fn build(self, params: &Params) -> Box<dyn CollisionShape> {
        match self {
            CollisionKind::PixelMask => Box::new(PixelMask::from_params(params)),
            CollisionKind::BoundingBox => Box::new(BoundingBox),
        }
    }
}

/// Rectangle-vs-rectangle test. Touching edges count as a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox;

impl CollisionShape for BoundingBox {
    fn overlaps(&self, agent: &Agent, barrier: &Barrier, params: &Params) -> bool {
        let footprint = Rect::new(
            coord! { x: agent.x, y: agent.y },
            coord! { x: agent.x + params.agent_width, y: agent.y + params.agent_height },
        );
        footprint.intersects(&barrier.rect())
    }

    fn name(&self) -> &'static str {
        "bounding box"
    }
}

/// A binary occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// A fully opaque rectangle.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    /// An ellipse inscribed in a `width` × `height` box, roughly the opaque
    /// area of a bird sprite.
    pub fn ellipse(width: usize, height: usize) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let nx = (x as f32 + 0.5 - rx) / rx;
                let ny = (y as f32 + 0.5 - ry) / ry;
                bits.push(nx * nx + ny * ny <= 1.0);
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Builds a mask from row-major alpha values. Pixels with alpha above
    /// `threshold` are solid.
    ///
    /// Returns `None` when `alpha` does not hold `width * height` values.
    pub fn from_alpha(width: usize, height: usize, alpha: &[u8], threshold: u8) -> Option<Self> {
        if alpha.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > threshold).collect(),
        })
    }

    /// Mirror image along the horizontal axis.
    pub fn flipped_vertical(&self) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len());
        for y in (0..self.height).rev() {
            bits.extend_from_slice(&self.bits[y * self.width..(y + 1) * self.width]);
        }
        Self {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at `(x, y)` is solid. Out of range reads as empty.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Whether `other`, placed at `offset` relative to this mask's origin,
    /// shares at least one solid pixel with it.
    pub fn overlap(&self, other: &Mask, offset: (i64, i64)) -> bool {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i64).min(dx + other.width as i64);
        let y1 = (self.height as i64).min(dy + other.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Per-pixel test between an agent mask and the barrier masks.
#[derive(Debug, Clone)]
pub struct PixelMask {
    agent: Mask,
    top: Mask,
    bottom: Mask,
}

impl PixelMask {
    /// Uses an elliptical agent mask and solid barriers sized from `params`.
    pub fn from_params(params: &Params) -> Self {
        let bottom = Mask::filled(
            params.obstacle_width.round() as usize,
            params.barrier_height.round() as usize,
        );
        Self::new(
            Mask::ellipse(
                params.agent_width.round() as usize,
                params.agent_height.round() as usize,
            ),
            bottom,
        )
    }

    /// Uses custom masks, e.g. taken from sprite alpha. The top barrier is
    /// the bottom one flipped upside down.
    pub fn new(agent: Mask, bottom_barrier: Mask) -> Self {
        Self {
            agent,
            top: bottom_barrier.flipped_vertical(),
            bottom: bottom_barrier,
        }
    }
}

impl CollisionShape for PixelMask {
    fn overlaps(&self, agent: &Agent, barrier: &Barrier, _params: &Params) -> bool {
        let mask = match barrier.side {
            BarrierSide::Top => &self.top,
            BarrierSide::Bottom => &self.bottom,
        };
        let offset = (
            (barrier.x - agent.x).round() as i64,
            (barrier.y - agent.y.round()).round() as i64,
        );
        self.agent.overlap(mask, offset)
    }

    fn name(&self) -> &'static str {
        "pixel mask"
    }
}
