//! Saving and loading a trained controller.
//!
//! The file is versioned JSON. Loading never substitutes a fresh controller
//! for a missing or broken file; the caller gets a [`StorageError`] instead.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::brain::Brain;
use super::evolution::Champion;
use super::world::SENSOR_COUNT;

/// Version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Conventional file name for the winning controller.
pub const DEFAULT_WINNER_PATH: &str = "winner.json";

/// Errors raised while persisting a controller.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No file at the given path.
    #[error("no saved controller at {0}")]
    NotFound(String),
    /// The file could not be read or written.
    #[error("controller file {path}: {source}")]
    Io {
        /// Path that was accessed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for a saved controller.
    #[error("controller file {path} is malformed: {source}")]
    Json {
        /// Path that was parsed.
        path: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The file was written by an incompatible version.
    #[error("controller file version {found} is not supported (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// The stored network cannot be driven by the sensors.
    #[error("stored network is unusable: {0}")]
    InvalidNetwork(String),
}

/// A controller together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedController {
    /// File format version.
    pub format_version: u32,
    /// When the file was written.
    pub saved_at: DateTime<Utc>,
    /// Generation the controller was evaluated in.
    pub generation: usize,
    /// Fitness it reached.
    pub fitness: f32,
    /// Network layer dimensions, input first.
    pub layer_sizes: Vec<usize>,
    /// The network itself.
    pub brain: Brain,
}

impl SavedController {
    /// Wraps a brain for saving.
    pub fn new(brain: Brain, generation: usize, fitness: f32) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            generation,
            fitness,
            layer_sizes: brain.layer_sizes(),
            brain,
        }
    }

    /// Wraps a training champion for saving.
    pub fn from_champion(champion: &Champion) -> Self {
        Self::new(
            champion.brain.clone(),
            champion.generation,
            champion.fitness,
        )
    }

    /// Writes the controller as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| StorageError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(
            path = %path.display(),
            generation = self.generation,
            fitness = self.fitness,
            "controller saved"
        );
        Ok(())
    }

    /// Reads and validates a controller.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&json).map_err(|source| StorageError::Json {
                path: path.display().to_string(),
                source,
            })?;

        // Check the version before the layout, which may differ between versions.
        if let Some(found) = value.get("format_version").and_then(serde_json::Value::as_u64) {
            if found != u64::from(FORMAT_VERSION) {
                return Err(StorageError::UnsupportedVersion {
                    found: u32::try_from(found).unwrap_or(u32::MAX),
                    expected: FORMAT_VERSION,
                });
            }
        }

        let saved: Self = serde_json::from_value(value).map_err(|source| StorageError::Json {
            path: path.display().to_string(),
            source,
        })?;
        saved.validate()?;
        info!(
            path = %path.display(),
            generation = saved.generation,
            fitness = saved.fitness,
            "controller loaded"
        );
        Ok(saved)
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        if !self.brain.is_consistent() {
            return Err(StorageError::InvalidNetwork(
                "layer dimensions do not chain".to_string(),
            ));
        }
        if self.brain.input_size() != Some(SENSOR_COUNT) {
            return Err(StorageError::InvalidNetwork(format!(
                "expected {SENSOR_COUNT} inputs, found {:?}",
                self.brain.input_size()
            )));
        }
        if self.brain.layer_sizes() != self.layer_sizes {
            return Err(StorageError::InvalidNetwork(format!(
                "header says {:?}, network is {:?}",
                self.layer_sizes,
                self.brain.layer_sizes()
            )));
        }
        Ok(())
    }
}
