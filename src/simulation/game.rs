//! Single-agent sessions: the playable game and winner playback.
//!
//! A session alternates between an active phase and a game-over phase. Any
//! jump input during game over starts a fresh run with score zero.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::brain::Controller;
use super::events::TickReport;
use super::params::Params;
use super::snapshot::Snapshot;
use super::world::{Idle, Pilot, Sensors, World};

/// Phase of a single-agent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The agent is flying.
    Active,
    /// The agent died. Waiting for a restart.
    GameOver,
}

/// Pilot that asks a controller whether to jump.
#[derive(Debug, Clone, Copy)]
pub struct ControllerPilot<'a, C: ?Sized> {
    controller: &'a C,
    threshold: f32,
}

impl<'a, C: Controller + ?Sized> ControllerPilot<'a, C> {
    /// Jumps whenever the controller's signal exceeds `threshold`.
    pub fn new(controller: &'a C, threshold: f32) -> Self {
        Self {
            controller,
            threshold,
        }
    }
}

impl<C: Controller + ?Sized> Pilot for ControllerPilot<'_, C> {
    fn wants_impulse(&mut self, _agent: usize, sensors: &Sensors) -> bool {
        self.controller.jumps(sensors, self.threshold)
    }
}

/// A single-agent session.
#[derive(Debug)]
pub struct Game {
    world: World,
    phase: Phase,
    seed: u64,
    runs: u64,
    last_score: u32,
    best_score: u32,
}

impl Game {
    /// Starts the first run.
    pub fn new(params: &Params, seed: u64) -> Self {
        Self {
            world: World::solo(params, seed),
            phase: Phase::Active,
            seed,
            runs: 1,
            last_score: 0,
            best_score: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The world of the current run.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Score of the current run, or of the run that just ended.
    pub fn score(&self) -> u32 {
        match self.phase {
            Phase::Active => self.world.score(),
            Phase::GameOver => self.last_score,
        }
    }

    /// Best score across all runs of this session.
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Number of runs started, including the current one.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Player jump input: an impulse while flying, a restart after game over.
    pub fn press_jump(&mut self, params: &Params) {
        match self.phase {
            Phase::Active => {
                if let Some(agent) = self.world.agents_mut().first_mut() {
                    if agent.alive {
                        agent.apply_impulse(params);
                    }
                }
            }
            Phase::GameOver => self.restart(params),
        }
    }

    /// Starts a new run with a fresh world and score zero.
    pub fn restart(&mut self, params: &Params) {
        self.runs += 1;
        self.world = World::solo(params, self.seed.wrapping_add(self.runs));
        self.phase = Phase::Active;
    }

    /// Advances a player-driven run by one tick.
    pub fn tick(&mut self, params: &Params) -> Option<TickReport> {
        self.tick_with(params, &mut Idle)
    }

    /// Advances a run by one tick with the given pilot. Does nothing during
    /// game over.
    pub fn tick_with(&mut self, params: &Params, pilot: &mut impl Pilot) -> Option<TickReport> {
        if self.phase == Phase::GameOver {
            return None;
        }
        let report = self.world.step(params, pilot);
        if self.world.all_dead() {
            self.phase = Phase::GameOver;
            self.last_score = self.world.score();
            self.best_score = self.best_score.max(self.last_score);
            info!(
                run = self.runs,
                score = self.last_score,
                best = self.best_score,
                "game over"
            );
        }
        Some(report)
    }

    /// Advances a controller-driven run by one tick.
    pub fn tick_controlled<C: Controller + ?Sized>(
        &mut self,
        params: &Params,
        controller: &C,
    ) -> Option<TickReport> {
        let mut pilot = ControllerPilot::new(controller, params.jump_threshold);
        self.tick_with(params, &mut pilot)
    }

    /// Presentation snapshot of the current run.
    pub fn snapshot(&self, params: &Params) -> Snapshot {
        Snapshot::capture(&self.world, params)
    }
}
