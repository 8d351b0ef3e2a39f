//! One discrete simulation tick over every agent and obstacle.
//!
//! A tick runs these phases in order:
//! 1. advance every live agent, then let the [`Pilot`] decide on an impulse
//! 2. collision tests, marking hit agents dead
//! 3. passage tests and obstacle motion
//! 4. score and spawn, at most once per tick
//! 5. retirement of off-screen obstacles
//! 6. vertical bounds check
//! 7. ground scroll
//!
//! The world never knows about controllers or fitness. Everything a consumer
//! needs is reported through the returned [`TickReport`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::agent::Agent;
use super::collision::CollisionShape;
use super::events::{EventQueue, SimulationEvent, TickReport};
use super::ground::ScrollingGround;
use super::obstacle::Obstacle;
use super::params::Params;
use super::stream::ObstacleStream;

/// Number of values in a [`Sensors`] reading.
pub const SENSOR_COUNT: usize = 3;

/// What an agent perceives about the obstacle ahead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    /// Agent height.
    pub y: f32,
    /// Absolute vertical distance to the top of the gap.
    pub to_gap_top: f32,
    /// Absolute vertical distance to the bottom of the gap.
    pub to_gap_bottom: f32,
}

impl Sensors {
    /// Reads the sensors of `agent` against `obstacle`.
    pub fn read(agent: &Agent, obstacle: &Obstacle) -> Self {
        Self {
            y: agent.y,
            to_gap_top: (agent.y - obstacle.gap_top()).abs(),
            to_gap_bottom: (agent.y - obstacle.gap_bottom()).abs(),
        }
    }

    /// Values in controller input order.
    pub fn to_array(&self) -> [f32; SENSOR_COUNT] {
        [self.y, self.to_gap_top, self.to_gap_bottom]
    }
}

/// Decides whether a live agent jumps this tick.
pub trait Pilot {
    /// Called once per tick for each live agent, after it moved.
    fn wants_impulse(&mut self, agent: usize, sensors: &Sensors) -> bool;
}

/// Pilot that never jumps. Used when impulses come from player input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Pilot for Idle {
    fn wants_impulse(&mut self, _agent: usize, _sensors: &Sensors) -> bool {
        false
    }
}

impl<F> Pilot for F
where
    F: FnMut(usize, &Sensors) -> bool,
{
    fn wants_impulse(&mut self, agent: usize, sensors: &Sensors) -> bool {
        self(agent, sensors)
    }
}

/// How the world treats an agent that reaches the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// One player-driven agent. May be pinned to the ground on death.
    Solo,
    /// Many controller-driven agents. Dead agents stay where they died.
    Population,
}

/// The simulation state advanced by [`World::step`].
#[derive(Debug)]
pub struct World {
    agents: Vec<Agent>,
    stream: ObstacleStream,
    ground: ScrollingGround,
    shape: Box<dyn CollisionShape>,
    mode: Mode,
    score: u32,
    tick: u64,
}

impl World {
    /// Creates a world with `agent_count` agents at the start position.
    pub fn new(params: &Params, agent_count: usize, mode: Mode, seed: u64) -> Self {
        Self {
            agents: (0..agent_count).map(|_| Agent::at_start(params)).collect(),
            stream: ObstacleStream::new(params, seed),
            ground: ScrollingGround::new(params),
            shape: params.collision.build(params),
            mode,
            score: 0,
            tick: 0,
        }
    }

    /// A single-agent world.
    pub fn solo(params: &Params, seed: u64) -> Self {
        Self::new(params, 1, Mode::Solo, seed)
    }

    /// A world with one agent per population member.
    pub fn population(params: &Params, size: usize, seed: u64) -> Self {
        Self::new(params, size, Mode::Population, seed)
    }

    /// Replaces the collision shape, e.g. with one built from sprite masks.
    pub fn with_shape(mut self, shape: Box<dyn CollisionShape>) -> Self {
        self.shape = shape;
        self
    }

    /// All agents, dead or alive, in creation order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access to the agents.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// The obstacle stream.
    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }

    /// The ground.
    pub fn ground(&self) -> &ScrollingGround {
        &self.ground
    }

    /// The active collision shape.
    pub fn shape(&self) -> &dyn CollisionShape {
        self.shape.as_ref()
    }

    /// Agent treatment mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Obstacles passed so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Number of live agents.
    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    /// Whether every agent is dead.
    pub fn all_dead(&self) -> bool {
        self.agents.iter().all(|a| !a.alive)
    }

    /// Sensor reading for an agent against its current obstacle.
    pub fn sensors(&self, agent: usize, params: &Params) -> Option<Sensors> {
        let agent = self.agents.get(agent)?;
        let obstacle = self.stream.current_for(agent.x, params)?;
        Some(Sensors::read(agent, obstacle))
    }

    /// Advances the world by one tick.
    pub fn step(&mut self, params: &Params, pilot: &mut impl Pilot) -> TickReport {
        let mut queue = EventQueue::new();
        self.tick += 1;

        // 1. motion and decisions
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if !agent.alive {
                continue;
            }
            agent.advance(params);
            if let Some(obstacle) = self.stream.current_for(agent.x, params) {
                let sensors = Sensors::read(agent, obstacle);
                if pilot.wants_impulse(i, &sensors) {
                    agent.apply_impulse(params);
                }
            }
        }

        // 2. collisions
        for obstacle in self.stream.obstacles() {
            for (i, agent) in self.agents.iter_mut().enumerate() {
                if agent.alive && obstacle.collides_with(agent, self.shape.as_ref(), params) {
                    agent.alive = false;
                    debug!(agent = i, obstacle = obstacle.id, "agent collided");
                    queue.push(SimulationEvent::AgentCollided {
                        agent: i,
                        obstacle: obstacle.id,
                    });
                }
            }
        }

        // 3. passage and obstacle motion
        let lead_x = self
            .agents
            .iter()
            .filter(|a| a.alive)
            .map(|a| a.x)
            .reduce(f32::max);
        let mut spawn_pending = false;
        for obstacle in self.stream.obstacles_mut() {
            if let Some(x) = lead_x {
                if obstacle.has_passed(x) {
                    spawn_pending = true;
                    queue.push(SimulationEvent::ObstaclePassed {
                        obstacle: obstacle.id,
                    });
                }
            }
            obstacle.advance(params);
        }

        // 4. score and spawn
        if spawn_pending {
            self.score += 1;
            self.stream.spawn(params);
            queue.push(SimulationEvent::ObstacleSpawned { score: self.score });
        }

        // 5. retirement
        let retired = self.stream.retire_offscreen(params);
        if retired > 0 {
            queue.push(SimulationEvent::ObstaclesRetired { count: retired });
        }

        // 6. vertical bounds
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if agent.alive && agent.out_of_bounds(params) {
                agent.alive = false;
                if self.mode == Mode::Solo
                    && params.clamp_to_ground
                    && agent.bottom(params) >= params.ground_y
                {
                    agent.y = params.ground_y - params.agent_height;
                }
                debug!(agent = i, y = agent.y, "agent left the playfield");
                queue.push(SimulationEvent::AgentOutOfBounds { agent: i });
            }
        }

        // 7. cosmetics
        self.ground.advance(params);

        TickReport {
            tick: self.tick,
            score: self.score,
            events: queue.into_events(),
        }
    }
}
