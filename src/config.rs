//! Navigation configuration
//!
//! Scene setup supplies these parameters at initialization; they can also
//! be loaded from RON or JSON files.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::Bounds;

/// Parameters for the navigation subsystem of one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// World-space bounds of the walkability grid
    pub bounds: Bounds,
    /// Size of each grid cell in world units
    pub cell_size: f32,
    /// Radius of the circular probe used to test cells for obstacles
    pub probe_radius: f32,
    /// Interval between follower path refreshes, in seconds
    pub refresh_period: f32,
    /// Distance below which a waypoint counts as reached
    pub arrive_threshold: f32,
    /// Number of background path workers
    pub worker_threads: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(Vec2::ZERO, Vec2::splat(32.0)),
            cell_size: 0.2,
            probe_radius: 0.1,
            refresh_period: 0.5,
            arrive_threshold: 0.1,
            worker_threads: 2,
        }
    }
}

impl NavConfig {
    /// Set the grid bounds
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the grid cell size
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the obstacle probe radius
    #[must_use]
    pub fn with_probe_radius(mut self, probe_radius: f32) -> Self {
        self.probe_radius = probe_radius;
        self
    }

    /// Set the path refresh interval
    #[must_use]
    pub fn with_refresh_period(mut self, seconds: f32) -> Self {
        self.refresh_period = seconds;
        self
    }

    /// Set the number of path workers
    #[must_use]
    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate bounds or non-positive parameters;
    /// a scene with an invalid navigation config should fail to load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bounds.is_degenerate() {
            return Err(ConfigError::Invalid(
                "bounds have zero or negative area".to_string(),
            ));
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid("cell size must be positive".to_string()));
        }
        if self.probe_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "probe radius must be positive".to_string(),
            ));
        }
        if self.refresh_period <= 0.0 {
            return Err(ConfigError::Invalid(
                "refresh period must be positive".to_string(),
            ));
        }
        if self.arrive_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "arrive threshold must be positive".to_string(),
            ));
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "at least one worker thread is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, fails to parse, or
    /// fails validation
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, fails to parse, or
    /// fails validation
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur while loading a navigation config
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Parse error
    Parse(String),
    /// Semantically invalid value
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
