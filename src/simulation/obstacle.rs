//! Paired top/bottom barriers scrolling towards the agents.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::collision::{Barrier, BarrierSide, CollisionShape};
use super::params::Params;

/// An obstacle: two barriers separated by a fixed vertical gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Spawn sequence number, unique within a stream.
    pub id: u64,
    /// Left edge. Decreases every tick.
    pub x: f32,
    gap_top: f32,
    gap: f32,
    passed: bool,
}

impl Obstacle {
    /// Creates an obstacle with a fixed gap position.
    pub fn new(id: u64, x: f32, gap_top: f32, params: &Params) -> Self {
        Self {
            id,
            x,
            gap_top,
            gap: params.obstacle_gap,
            passed: false,
        }
    }

    /// Creates an obstacle with a gap top drawn uniformly from
    /// `[gap_top_min, gap_top_max)`.
    pub fn new_random(id: u64, x: f32, params: &Params, rng: &mut impl Rng) -> Self {
        let gap_top = rng.random_range(params.gap_top_min..params.gap_top_max);
        Self::new(id, x, gap_top, params)
    }

    /// Upper edge of the gap (bottom of the top barrier).
    pub fn gap_top(&self) -> f32 {
        self.gap_top
    }

    /// Lower edge of the gap (top of the bottom barrier).
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap
    }

    /// Whether an agent has already moved beyond this obstacle.
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Scrolls the obstacle left by one tick.
    pub fn advance(&mut self, params: &Params) {
        self.x -= params.obstacle_speed;
    }

    /// Marks the obstacle passed the first time `agent_x` is beyond its left
    /// edge. Returns `true` only for that transition.
    pub fn has_passed(&mut self, agent_x: f32) -> bool {
        if !self.passed && self.x < agent_x {
            self.passed = true;
            return true;
        }
        false
    }

    /// Whether the obstacle has fully left the playfield.
    pub fn is_offscreen(&self, params: &Params) -> bool {
        self.x + params.obstacle_width < 0.0
    }

    /// Footprints of both barriers, top first.
    pub fn barriers(&self, params: &Params) -> [Barrier; 2] {
        [
            Barrier {
                side: BarrierSide::Top,
                x: self.x,
                y: self.gap_top - params.barrier_height,
                width: params.obstacle_width,
                height: params.barrier_height,
            },
            Barrier {
                side: BarrierSide::Bottom,
                x: self.x,
                y: self.gap_bottom(),
                width: params.obstacle_width,
                height: params.barrier_height,
            },
        ]
    }

    /// Whether the agent overlaps either barrier.
    pub fn collides_with(&self, agent: &Agent, shape: &dyn CollisionShape, params: &Params) -> bool {
        self.barriers(params)
            .iter()
            .any(|barrier| shape.overlaps(agent, barrier, params))
    }
}
