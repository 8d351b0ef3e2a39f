//! Generational fitness evaluation.
//!
//! An [`Evaluation`] binds one controller to each agent of a population
//! world and runs ticks until every agent is dead, the score exceeds the
//! configured ceiling, or the caller cancels. Fitness per controller:
//!
//! - `+alive_reward` for every tick the agent starts alive
//! - `+pass_reward` for every obstacle passed while the agent is alive
//! - `-collision_penalty` on the tick it hits a barrier
//! - `-bounds_penalty` on the tick it leaves the playfield
//!
//! Events from each tick are applied in the order they happened, so an agent
//! that collides on a scoring tick does not get the pass reward, while one that
//! leaves the playfield on that tick does.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::brain::Controller;
use super::events::{SimulationEvent, TickReport};
use super::params::Params;
use super::snapshot::Snapshot;
use super::world::{Sensors, World};

/// Identifier the optimizer assigns to a controller.
pub type GenomeId = usize;

/// How a population entry left the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fate {
    /// Still flying.
    Active,
    /// Hit a barrier.
    Collided,
    /// Left the playfield.
    OutOfBounds,
    /// Alive when the generation ended.
    Survived,
}

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// No agent left alive.
    Extinct,
    /// The score exceeded `Params::score_ceiling`.
    ScoreCeiling,
    /// Stopped from outside between ticks.
    Cancelled,
}

/// A controller together with its final fitness.
#[derive(Debug, Clone)]
pub struct Scored<C> {
    /// Optimizer-side identifier.
    pub id: GenomeId,
    /// The evaluated controller.
    pub controller: C,
    /// Accumulated fitness.
    pub fitness: f32,
    /// How the entry ended.
    pub fate: Fate,
    /// Ticks the agent started alive.
    pub ticks_alive: u64,
}

/// Everything the optimizer reads back after a generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome<C> {
    /// Generation number.
    pub generation: usize,
    /// Controllers in the order they were supplied.
    pub scored: Vec<Scored<C>>,
    /// Final score of the shared run.
    pub score: u32,
    /// Ticks run.
    pub ticks: u64,
    /// Why the generation ended.
    pub stop: StopReason,
}

impl<C> GenerationOutcome<C> {
    /// Highest fitness of the generation.
    pub fn best_fitness(&self) -> Option<f32> {
        self.scored.iter().map(|s| s.fitness).reduce(f32::max)
    }

    /// Mean fitness of the generation.
    pub fn mean_fitness(&self) -> Option<f32> {
        if self.scored.is_empty() {
            return None;
        }
        Some(self.scored.iter().map(|s| s.fitness).sum::<f32>() / self.scored.len() as f32)
    }
}

#[derive(Debug)]
struct Entry<C> {
    id: GenomeId,
    controller: C,
    fitness: f32,
    fate: Fate,
    ticks_alive: u64,
}

/// One generation in progress.
#[derive(Debug)]
pub struct Evaluation<C> {
    generation: usize,
    world: World,
    entries: Vec<Entry<C>>,
    active: Vec<usize>,
    stop: Option<StopReason>,
}

impl<C: Controller> Evaluation<C> {
    /// Binds every candidate to a fresh agent. Fitness starts at zero.
    pub fn new(params: &Params, generation: usize, candidates: Vec<(GenomeId, C)>, seed: u64) -> Self {
        let world = World::population(params, candidates.len(), seed);
        let entries: Vec<Entry<C>> = candidates
            .into_iter()
            .map(|(id, controller)| Entry {
                id,
                controller,
                fitness: 0.0,
                fate: Fate::Active,
                ticks_alive: 0,
            })
            .collect();
        let active = (0..entries.len()).collect();

        Self {
            generation,
            world,
            entries,
            active,
            stop: None,
        }
    }

    /// Generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The shared world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of entries still active.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Why the generation ended, if it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Whether no further tick will run.
    pub fn is_finished(&self) -> bool {
        self.stop.is_some()
    }

    /// Current fitness per controller, in supply order.
    pub fn fitness(&self) -> Vec<(GenomeId, f32)> {
        self.entries.iter().map(|e| (e.id, e.fitness)).collect()
    }

    /// Current fate per controller, in supply order.
    pub fn fates(&self) -> Vec<Fate> {
        self.entries.iter().map(|e| e.fate).collect()
    }

    /// Presentation snapshot tagged with the generation number.
    pub fn snapshot(&self, params: &Params) -> Snapshot {
        Snapshot::capture(&self.world, params).with_generation(self.generation)
    }

    /// Stops the generation before the next tick.
    pub fn cancel(&mut self) {
        if self.stop.is_none() {
            self.stop = Some(StopReason::Cancelled);
        }
    }

    /// Runs one tick. Returns `None` once the generation is over.
    pub fn tick(&mut self, params: &Params) -> Option<TickReport> {
        if self.stop.is_some() {
            return None;
        }
        if self.active.is_empty() {
            self.stop = Some(StopReason::Extinct);
            return None;
        }

        for &i in &self.active {
            let entry = &mut self.entries[i];
            entry.fitness += params.alive_reward;
            entry.ticks_alive += 1;
        }

        let entries = &self.entries;
        let threshold = params.jump_threshold;
        let mut pilot =
            |agent: usize, sensors: &Sensors| entries[agent].controller.jumps(sensors, threshold);
        let report = self.world.step(params, &mut pilot);

        self.apply(&report, params);

        if report.score > params.score_ceiling {
            self.stop = Some(StopReason::ScoreCeiling);
        } else if self.active.is_empty() {
            self.stop = Some(StopReason::Extinct);
        }

        Some(report)
    }

    fn apply(&mut self, report: &TickReport, params: &Params) {
        for event in &report.events {
            match *event {
                SimulationEvent::AgentCollided { agent, .. } => {
                    let entry = &mut self.entries[agent];
                    entry.fitness -= params.collision_penalty;
                    entry.fate = Fate::Collided;
                }
                SimulationEvent::AgentOutOfBounds { agent } => {
                    let entry = &mut self.entries[agent];
                    entry.fitness -= params.bounds_penalty;
                    entry.fate = Fate::OutOfBounds;
                }
                SimulationEvent::ObstacleSpawned { score } => {
                    let mut rewarded = 0;
                    for &i in &self.active {
                        let entry = &mut self.entries[i];
                        if entry.fate == Fate::Active {
                            entry.fitness += params.pass_reward;
                            rewarded += 1;
                        }
                    }
                    debug!(score, rewarded, "pass reward granted");
                }
                SimulationEvent::ObstaclePassed { .. }
                | SimulationEvent::ObstaclesRetired { .. } => {}
            }
        }

        let entries = &self.entries;
        self.active.retain(|&i| entries[i].fate == Fate::Active);
    }

    /// Runs ticks until the generation ends.
    pub fn run(self, params: &Params) -> GenerationOutcome<C> {
        self.run_with(params, |_| {})
    }

    /// Runs ticks until the generation ends, calling `observer` after each.
    pub fn run_with(
        mut self,
        params: &Params,
        mut observer: impl FnMut(&Snapshot),
    ) -> GenerationOutcome<C> {
        while self.tick(params).is_some() {
            observer(&self.snapshot(params));
        }
        self.finish()
    }

    /// Ends the generation and hands every controller back with its fitness.
    pub fn finish(mut self) -> GenerationOutcome<C> {
        let stop = *self.stop.get_or_insert(StopReason::Cancelled);

        let score = self.world.score();
        let ticks = self.world.tick_count();
        let scored: Vec<Scored<C>> = self
            .entries
            .into_iter()
            .map(|e| Scored {
                id: e.id,
                controller: e.controller,
                fitness: e.fitness,
                fate: if e.fate == Fate::Active {
                    Fate::Survived
                } else {
                    e.fate
                },
                ticks_alive: e.ticks_alive,
            })
            .collect();

        let outcome = GenerationOutcome {
            generation: self.generation,
            scored,
            score,
            ticks,
            stop,
        };
        info!(
            generation = outcome.generation,
            score,
            ticks,
            best = outcome.best_fitness().unwrap_or_default(),
            mean = outcome.mean_fitness().unwrap_or_default(),
            ?stop,
            "generation evaluated"
        );
        outcome
    }
}

/// Evaluates one generation to completion.
pub fn evaluate_generation<C: Controller>(
    params: &Params,
    generation: usize,
    candidates: Vec<(GenomeId, C)>,
    seed: u64,
) -> GenerationOutcome<C> {
    Evaluation::new(params, generation, candidates, seed).run(params)
}
