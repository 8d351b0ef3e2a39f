//! Read-only view of a world handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::params::Params;
use super::world::World;

/// Sprite frame shown on each tick of the flap cycle, indexed by
/// `tick % FLAP_CYCLE.len()`. Steps of 0.7 frames bouncing between 0 and 3.
const FLAP_CYCLE: [usize; 8] = [0, 0, 1, 2, 2, 2, 1, 0];
/// Frame held while diving.
const DIVE_FRAME: usize = 2;
/// Tilt at or below which the dive frame is shown.
const DIVE_TILT: f32 = -80.0;

/// Drawing data for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Index in the world.
    pub index: usize,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Rotation in degrees.
    pub tilt: f32,
    /// Whether the agent is still alive.
    pub alive: bool,
    /// Sprite frame to show.
    pub flap_frame: usize,
    /// Gap bounds of the obstacle the agent is currently sensing.
    pub target_gap: Option<(f32, f32)>,
    /// Left edge of that obstacle.
    pub target_x: Option<f32>,
}

/// Drawing data for one obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    /// Spawn sequence number.
    pub id: u64,
    /// Left edge.
    pub x: f32,
    /// Upper edge of the gap.
    pub gap_top: f32,
    /// Lower edge of the gap.
    pub gap_bottom: f32,
    /// Whether the obstacle has been passed.
    pub passed: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks run so far.
    pub tick: u64,
    /// Obstacles passed so far.
    pub score: u32,
    /// Generation being evaluated, if any.
    pub generation: Option<usize>,
    /// Number of live agents.
    pub live_agents: usize,
    /// Agents in creation order.
    pub agents: Vec<AgentView>,
    /// Obstacles in spawn order.
    pub obstacles: Vec<ObstacleView>,
    /// Ground line.
    pub ground_y: f32,
    /// Left edges of the two ground tiles.
    pub ground_tiles: (f32, f32),
}

impl Snapshot {
    /// Captures the current state of `world`.
    pub fn capture(world: &World, params: &Params) -> Self {
        let agents = world
            .agents()
            .iter()
            .enumerate()
            .map(|(index, agent)| {
                let target = world.stream().current_for(agent.x, params);
                AgentView {
                    index,
                    x: agent.x,
                    y: agent.y,
                    tilt: agent.tilt,
                    alive: agent.alive,
                    flap_frame: flap_frame(world.tick_count(), agent.tilt),
                    target_gap: target.map(|o| (o.gap_top(), o.gap_bottom())),
                    target_x: target.map(|o| o.x),
                }
            })
            .collect();

        let obstacles = world
            .stream()
            .obstacles()
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                x: o.x,
                gap_top: o.gap_top(),
                gap_bottom: o.gap_bottom(),
                passed: o.is_passed(),
            })
            .collect();

        let ground = world.ground();
        Self {
            tick: world.tick_count(),
            score: world.score(),
            generation: None,
            live_agents: world.live_count(),
            agents,
            obstacles,
            ground_y: ground.y,
            ground_tiles: (ground.x1, ground.x2),
        }
    }

    /// Tags the snapshot with a generation number.
    pub fn with_generation(mut self, generation: usize) -> Self {
        self.generation = Some(generation);
        self
    }
}

/// Flap frame for a given tick, held on the last frame while diving.
pub fn flap_frame(tick: u64, tilt: f32) -> usize {
    if tilt <= DIVE_TILT {
        return DIVE_FRAME;
    }
    FLAP_CYCLE[(tick % FLAP_CYCLE.len() as u64) as usize]
}
