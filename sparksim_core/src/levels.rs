//! Challenge levels.
//!
//! A level ships a starting configuration and the goal parameters used by
//! [`crate::scoring::score`]. The built-in set is static JSON compiled into
//! the library; custom sets use the same schema.

use crate::config::Configuration;
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_LEVELS: &str = include_str!("../data/levels.json");

/// A challenge level descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_config: Configuration,
    #[serde(default)]
    pub max_points: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
}

impl Level {
    /// Returns `(maxPoints, difficulty)` when both are usable.
    ///
    /// Zero and non-finite values count as missing.
    pub fn goal(&self) -> Option<(f64, f64)> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        match (self.max_points, self.difficulty) {
            (Some(max_points), Some(difficulty)) if usable(max_points) && usable(difficulty) => {
                Some((max_points, difficulty))
            }
            _ => None,
        }
    }
}

/// An ordered set of levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    /// Creates a level set from levels in display order.
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Loads the levels bundled with the library.
    pub fn builtin() -> Result<Self, SimError> {
        Self::from_json_str(BUILTIN_LEVELS)
    }

    /// Parses a JSON array of levels.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Ok(Self::new(levels))
    }

    /// Reads a JSON array of levels from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Looks up a level by id.
    pub fn get(&self, id: u32) -> Result<&Level, SimError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or_else(|| SimError::unknown_level(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
