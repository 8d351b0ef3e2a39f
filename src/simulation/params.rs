//! Simulation parameters.
//!
//! Every physics, scoring and training constant lives here so a run is fully
//! described by a `Params` value plus a seed. The defaults reproduce the
//! classic game: a 500×750 playfield, ground line at 680 and 30 ticks/second.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::CollisionKind;

/// Errors raised when a parameter set is loaded or validated.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The config file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        /// Path that was accessed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for [`Params`].
    #[error("config file {path} is malformed: {source}")]
    Json {
        /// Path that was parsed.
        path: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A value is outside its legal range.
    #[error("invalid parameter `{name}`: {reason}")]
    Invalid {
        /// Field name.
        name: &'static str,
        /// Human readable constraint.
        reason: String,
    },
}

/// Simulation parameters that control physics, scoring and training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Playfield width.
    pub window_width: f32,
    /// Playfield height.
    pub window_height: f32,
    /// Vertical position of the ground line. Touching it is fatal.
    pub ground_y: f32,
    /// Fixed horizontal position of every agent.
    pub agent_start_x: f32,
    /// Vertical position agents start from.
    pub agent_start_y: f32,
    /// Agent footprint width.
    pub agent_width: f32,
    /// Agent footprint height.
    pub agent_height: f32,
    /// Launch velocity set by an impulse (negative is upward).
    pub impulse_velocity: f32,
    /// Downward acceleration `a` in `d = v0*t + 0.5*a*t^2`.
    pub gravity: f32,
    /// Upper clamp on per-tick displacement (terminal fall speed).
    pub terminal_displacement: f32,
    /// Extra upward displacement added while rising.
    pub rise_bias: f32,
    /// Tilt (degrees) shown while climbing.
    pub max_tilt: f32,
    /// Tilt decrease per tick while diving.
    pub tilt_step: f32,
    /// Lowest tilt reachable while diving.
    pub min_tilt: f32,
    /// Distance below the impulse height within which the agent keeps its climb tilt.
    pub tilt_hold_band: f32,
    /// Vertical size of the opening between the two barriers.
    pub obstacle_gap: f32,
    /// Leftward obstacle displacement per tick.
    pub obstacle_speed: f32,
    /// Obstacle width.
    pub obstacle_width: f32,
    /// Height of each barrier sprite.
    pub barrier_height: f32,
    /// Lowest possible gap top (inclusive).
    pub gap_top_min: f32,
    /// Highest possible gap top (exclusive).
    pub gap_top_max: f32,
    /// Horizontal position new obstacles spawn at.
    pub obstacle_spawn_x: f32,
    /// Horizontal position of the obstacle present at the start of a run.
    pub initial_obstacle_x: f32,
    /// Leftward ground scroll per tick.
    pub ground_speed: f32,
    /// Width of one ground tile.
    pub ground_tile_width: f32,
    /// Presentation pacing in ticks per second.
    pub tick_rate: u32,
    /// Shape used for agent-vs-barrier tests.
    pub collision: CollisionKind,
    /// Single-player only: pin a grounded agent to the ground line.
    pub clamp_to_ground: bool,
    /// Controller output above this value triggers an impulse.
    pub jump_threshold: f32,
    /// Fitness gained per tick an agent starts alive.
    pub alive_reward: f32,
    /// Fitness gained by every live agent when an obstacle is passed.
    pub pass_reward: f32,
    /// Fitness lost on collision death.
    pub collision_penalty: f32,
    /// Fitness lost on bounds death. Zero keeps parity with existing trained controllers.
    pub bounds_penalty: f32,
    /// A generation stops once the score exceeds this value.
    pub score_ceiling: u32,
    /// Number of controllers per generation.
    pub population_size: usize,
    /// Number of generations a training run evaluates.
    pub generations: usize,
    /// Controller layer dimensions, input first.
    pub layer_sizes: Vec<usize>,
    /// Range of initial controller weights.
    pub weight_scale: f32,
    /// Best controllers copied unchanged into the next generation.
    pub elite_count: usize,
    /// Fraction of the ranked population eligible as parents.
    pub parent_fraction: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub mutation_min: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub mutation_max: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_width: 500.0,
            window_height: 750.0,
            ground_y: 680.0,
            agent_start_x: 200.0,
            agent_start_y: 280.0,
            agent_width: 68.0,
            agent_height: 48.0,
            impulse_velocity: -10.5,
            gravity: 3.0,
            terminal_displacement: 16.0,
            rise_bias: 2.0,
            max_tilt: 25.0,
            tilt_step: 20.0,
            min_tilt: -90.0,
            tilt_hold_band: 50.0,
            obstacle_gap: 200.0,
            obstacle_speed: 5.0,
            obstacle_width: 104.0,
            barrier_height: 640.0,
            gap_top_min: 50.0,
            gap_top_max: 450.0,
            obstacle_spawn_x: 600.0,
            initial_obstacle_x: 600.0,
            ground_speed: 5.0,
            ground_tile_width: 672.0,
            tick_rate: 30,
            collision: CollisionKind::PixelMask,
            clamp_to_ground: true,
            jump_threshold: 0.5,
            alive_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
            bounds_penalty: 0.0,
            score_ceiling: 30,
            population_size: 50,
            generations: 10,
            layer_sizes: vec![3, 6, 1],
            weight_scale: 1.0,
            elite_count: 2,
            parent_fraction: 0.2,
            mutation_min: 0.002,
            mutation_max: 0.2,
        }
    }
}

impl Params {
    /// Checks every constraint the simulation relies on.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let finite = [
            ("agent_start_x", self.agent_start_x),
            ("agent_start_y", self.agent_start_y),
            ("impulse_velocity", self.impulse_velocity),
            ("gravity", self.gravity),
            ("rise_bias", self.rise_bias),
            ("max_tilt", self.max_tilt),
            ("tilt_step", self.tilt_step),
            ("min_tilt", self.min_tilt),
            ("tilt_hold_band", self.tilt_hold_band),
            ("gap_top_min", self.gap_top_min),
            ("gap_top_max", self.gap_top_max),
            ("obstacle_spawn_x", self.obstacle_spawn_x),
            ("initial_obstacle_x", self.initial_obstacle_x),
            ("ground_speed", self.ground_speed),
            ("jump_threshold", self.jump_threshold),
            ("alive_reward", self.alive_reward),
            ("pass_reward", self.pass_reward),
            ("collision_penalty", self.collision_penalty),
            ("bounds_penalty", self.bounds_penalty),
            ("parent_fraction", self.parent_fraction),
            ("mutation_max", self.mutation_max),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, format!("must be finite, got {value}")));
            }
        }

        let positive = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("ground_y", self.ground_y),
            ("agent_width", self.agent_width),
            ("agent_height", self.agent_height),
            ("terminal_displacement", self.terminal_displacement),
            ("obstacle_gap", self.obstacle_gap),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("barrier_height", self.barrier_height),
            ("ground_tile_width", self.ground_tile_width),
            ("weight_scale", self.weight_scale),
            ("mutation_min", self.mutation_min),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("must be positive, got {value}")));
            }
        }

        if self.gap_top_min >= self.gap_top_max {
            return Err(invalid(
                "gap_top_min",
                format!(
                    "must be below gap_top_max ({} >= {})",
                    self.gap_top_min, self.gap_top_max
                ),
            ));
        }
        if !(self.gap_top_max - self.gap_top_min).is_finite() {
            return Err(invalid(
                "gap_top_max",
                "gap range is too wide to sample".to_string(),
            ));
        }
        if self.agent_height >= self.obstacle_gap {
            return Err(invalid(
                "obstacle_gap",
                "must leave room for the agent footprint".to_string(),
            ));
        }
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be at least 1".to_string()));
        }
        if self.population_size == 0 {
            return Err(invalid("population_size", "must be at least 1".to_string()));
        }
        if self.elite_count > self.population_size {
            return Err(invalid(
                "elite_count",
                format!("cannot exceed population_size ({})", self.population_size),
            ));
        }
        if !(self.parent_fraction > 0.0 && self.parent_fraction <= 1.0) {
            return Err(invalid("parent_fraction", "must be in (0, 1]".to_string()));
        }
        if self.mutation_max < self.mutation_min {
            return Err(invalid(
                "mutation_max",
                "must not be below mutation_min".to_string(),
            ));
        }
        if self.layer_sizes.len() < 2
            || self.layer_sizes[0] != super::world::SENSOR_COUNT
            || self.layer_sizes.contains(&0)
        {
            return Err(invalid(
                "layer_sizes",
                format!(
                    "need at least an input and output layer with {} inputs, got {:?}",
                    super::world::SENSOR_COUNT,
                    self.layer_sizes
                ),
            ));
        }
        Ok(())
    }

    /// Duration of one tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ParamsError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let params: Self = serde_json::from_str(&json).map_err(|source| ParamsError::Json {
            path: path.display().to_string(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }
}

fn invalid(name: &'static str, reason: String) -> ParamsError {
    ParamsError::Invalid { name, reason }
}
