//! The controllable entity.
//!
//! Agents only move vertically. Their motion follows a clamped quadratic law
//! evaluated from the number of ticks since the last impulse, so the position
//! after any input sequence is reproducible bit for bit.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// A simulated bird.
///
/// Liveness is owned by the simulation step: the agent never kills itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Horizontal position, fixed for the whole run.
    pub x: f32,
    /// Vertical position of the footprint's top edge.
    pub y: f32,
    /// Launch velocity of the current arc. Zero until the first impulse.
    pub launch_velocity: f32,
    /// Ticks since the last impulse.
    pub tick_count: u32,
    /// Height recorded by the last impulse, used for tilt only.
    pub reference_height: f32,
    /// Visual rotation in degrees. Has no effect on physics.
    pub tilt: f32,
    /// Whether the agent still takes part in the run.
    pub alive: bool,
}

impl Agent {
    /// Creates a live agent at rest.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            launch_velocity: 0.0,
            tick_count: 0,
            reference_height: y,
            tilt: 0.0,
            alive: true,
        }
    }

    /// Creates an agent at the configured start position.
    pub fn at_start(params: &Params) -> Self {
        Self::new(params.agent_start_x, params.agent_start_y)
    }

    /// Starts a new upward arc from the current height.
    pub fn apply_impulse(&mut self, params: &Params) {
        self.launch_velocity = params.impulse_velocity;
        self.tick_count = 0;
        self.reference_height = self.y;
    }

    /// Moves the agent by one tick and returns the displacement applied.
    pub fn advance(&mut self, params: &Params) -> f32 {
        self.tick_count += 1;
        let d = displacement(self.tick_count, self.launch_velocity, params);
        self.y += d;

        if d < 0.0 || self.y < self.reference_height + params.tilt_hold_band {
            if self.tilt < params.max_tilt {
                self.tilt = params.max_tilt;
            }
        } else if self.tilt > params.min_tilt {
            self.tilt = (self.tilt - params.tilt_step).max(params.min_tilt);
        }

        d
    }

    /// Vertical velocity implied by the current arc.
    pub fn vertical_velocity(&self, params: &Params) -> f32 {
        self.launch_velocity + params.gravity * self.tick_count as f32
    }

    /// Bottom edge of the footprint.
    pub fn bottom(&self, params: &Params) -> f32 {
        self.y + params.agent_height
    }

    /// Whether the footprint has left the legal vertical band.
    pub fn out_of_bounds(&self, params: &Params) -> bool {
        self.bottom(params) >= params.ground_y || self.y < 0.0
    }
}

/// Displacement applied on tick `ticks` of an arc launched at `launch_velocity`.
///
/// Never exceeds `params.terminal_displacement`.
pub fn displacement(ticks: u32, launch_velocity: f32, params: &Params) -> f32 {
    let t = ticks as f32;
    let mut d = launch_velocity * t + 0.5 * params.gravity * t * t;

    if d >= params.terminal_displacement {
        d = params.terminal_displacement;
    }
    if d < 0.0 {
        d -= params.rise_bias;
    }
    d
}
