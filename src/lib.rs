//! # Flappy Evo - side-scroller simulation with evolving controllers
//!
//! A deterministic flappy-bird engine that can be played by hand or used as
//! the fitness function of a genetic algorithm training small neural networks.
//!
//! ## Features
//!
//! - Tick-based physics with a clamped quadratic fall law
//! - Seeded obstacle generation, reproducible runs
//! - Pixel-mask or bounding-box collision, chosen by configuration
//! - Population evaluation with the classic fitness protocol
//!   (+0.1 per tick alive, +5 per obstacle passed, -1 on collision)
//! - Neural network controllers (MLP with tanh activation)
//! - Genetic optimizer (elitism, crossover and mutation)
//! - Versioned save/load of the winning controller
//! - Real-time visualization with egui/macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - Tick pipeline
//! - [`simulation::evaluation`] - Fitness evaluation of a population
//! - [`simulation::evolution`] - Genetic optimizer
//! - [`simulation::brain`] - Neural network controllers
//! - [`simulation::storage`] - Controller persistence

/// Core simulation logic and data structures.
pub mod simulation {
    /// The controllable agent and its motion law.
    pub mod agent;
    /// Neural network controllers.
    pub mod brain;
    /// Collision shapes for agent-versus-barrier tests.
    pub mod collision;
    /// Fitness evaluation of a controller population.
    pub mod evaluation;
    /// Events emitted by a simulation tick.
    pub mod events;
    /// Genetic optimizer driving the evaluation.
    pub mod evolution;
    /// Single-agent sessions (player game and playback).
    pub mod game;
    /// The scrolling ground.
    pub mod ground;
    /// Obstacles with a vertical gap.
    pub mod obstacle;
    /// Simulation parameters.
    pub mod params;
    /// Presentation snapshots.
    pub mod snapshot;
    /// Controller persistence.
    pub mod storage;
    /// Ordered obstacle collection.
    ///
    /// The [`stream::ObstacleStream`] owns obstacle identity: it spawns,
    /// retires, and picks the obstacle each agent is currently facing.
    pub mod stream;
    /// The per-tick simulation step.
    pub mod world;
}
