//! Ordered collection of live obstacles.
//!
//! Obstacles are kept in spawn order, which is also descending-age and
//! ascending-x order. Gap positions come from a seeded PCG generator so a run
//! is reproducible from its seed.

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, warn};

use super::obstacle::Obstacle;
use super::params::Params;

/// Owns obstacle identity and lifetime.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    rng: Pcg64,
    next_id: u64,
    spawned: u64,
    retired: u64,
}

impl ObstacleStream {
    /// Starts a stream with a single obstacle at the initial spawn position.
    pub fn new(params: &Params, seed: u64) -> Self {
        let mut stream = Self {
            obstacles: Vec::new(),
            rng: Pcg64::seed_from_u64(seed),
            next_id: 0,
            spawned: 0,
            retired: 0,
        };
        stream.push_at(params.initial_obstacle_x, params);
        stream
    }

    fn push_at(&mut self, x: f32, params: &Params) {
        let obstacle = Obstacle::new_random(self.next_id, x, params, &mut self.rng);
        debug!(
            id = obstacle.id,
            x,
            gap_top = obstacle.gap_top(),
            "obstacle spawned"
        );
        self.next_id += 1;
        self.spawned += 1;
        self.obstacles.push(obstacle);
    }

    /// Appends a new obstacle at the spawn position.
    pub fn spawn(&mut self, params: &Params) {
        self.push_at(params.obstacle_spawn_x, params);
    }

    /// Active obstacles in spawn order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Mutable access to the active obstacles.
    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    /// Number of active obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether no obstacle is active.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Total obstacles created by this stream.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Total obstacles retired by this stream.
    pub fn retired(&self) -> u64 {
        self.retired
    }

    /// Most recently spawned obstacle.
    pub fn foremost(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    /// Index of the first obstacle that `agent_x` is not yet beyond by more
    /// than an obstacle width. Falls back to the last obstacle.
    pub fn current_index_for(&self, agent_x: f32, params: &Params) -> usize {
        self.obstacles
            .iter()
            .position(|o| agent_x <= o.x + params.obstacle_width)
            .unwrap_or_else(|| self.obstacles.len().saturating_sub(1))
    }

    /// The obstacle an agent at `agent_x` has to deal with next.
    ///
    /// Used for both sensor input and the reference lines drawn on screen.
    pub fn current_for(&self, agent_x: f32, params: &Params) -> Option<&Obstacle> {
        self.obstacles.get(self.current_index_for(agent_x, params))
    }

    /// Advances every obstacle, then retires those that left the screen.
    ///
    /// Returns the number of retired obstacles.
    pub fn advance_all(&mut self, params: &Params) -> usize {
        for obstacle in &mut self.obstacles {
            obstacle.advance(params);
        }
        self.retire_offscreen(params)
    }

    /// Removes every off-screen obstacle, keeping the order of the rest.
    ///
    /// Returns the number of retired obstacles.
    pub fn retire_offscreen(&mut self, params: &Params) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| {
            let gone = o.is_offscreen(params);
            if gone {
                debug!(id = o.id, "obstacle retired");
            }
            !gone
        });
        let removed = before - self.obstacles.len();
        self.retired += removed as u64;

        if self.obstacles.is_empty() {
            warn!("obstacle stream ran dry, spawning a replacement");
            self.spawn(params);
        }
        removed
    }
}
