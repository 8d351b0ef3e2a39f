//! Events produced by a simulation tick.
//!
//! The tick records what happened in an [`EventQueue`] instead of touching
//! fitness or controller state directly. Consumers replay the events in
//! order after the tick, which keeps removal out of the iteration passes.

use serde::{Deserialize, Serialize};

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// An agent hit a barrier and died.
    AgentCollided {
        /// Index of the agent in the world.
        agent: usize,
        /// Obstacle that was hit.
        obstacle: u64,
    },
    /// An obstacle was passed for the first time.
    ObstaclePassed {
        /// Obstacle that was passed.
        obstacle: u64,
    },
    /// The score went up and a new obstacle was appended.
    ObstacleSpawned {
        /// Score after the increment.
        score: u32,
    },
    /// Off-screen obstacles were removed.
    ObstaclesRetired {
        /// How many were removed.
        count: usize,
    },
    /// An agent left the legal vertical band and died.
    AgentOutOfBounds {
        /// Index of the agent in the world.
        agent: usize,
    },
}

/// Queue collecting events in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }

    /// Queued events, oldest first.
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Consumes the queue.
    pub fn into_events(self) -> Vec<SimulationEvent> {
        self.events
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1 for the first tick.
    pub tick: u64,
    /// Score after the tick.
    pub score: u32,
    /// Events in the order they happened.
    pub events: Vec<SimulationEvent>,
}

impl TickReport {
    /// Whether an obstacle was passed (and the score incremented) this tick.
    pub fn scored(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, SimulationEvent::ObstacleSpawned { .. }))
    }

    /// Indices of agents that died this tick, for any reason.
    pub fn deaths(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|e| match e {
            SimulationEvent::AgentCollided { agent, .. }
            | SimulationEvent::AgentOutOfBounds { agent } => Some(*agent),
            _ => None,
        })
    }
}
