//! Game settings and tuning
//!
//! Every rule constant lives here so a session can be reconfigured from a
//! JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Largest spawn offset whose full range `2 * range` still fits in an `f32`
const MAX_SPAWN_RANGE: f32 = f32::MAX / 4.0;
/// Spawn tilt is at most half a turn either way
const MAX_SPAWN_ROTATION_DEG: f32 = 180.0;

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Rules ===
    /// Number of distinct ball categories
    pub category_count: u32,
    /// Balls dropped in when a session starts
    pub initial_ball_count: u32,
    /// Score per removed ball
    pub points_per_ball: u64,
    /// Session length in whole seconds
    pub initial_time_secs: u32,
    /// Shortest chain that counts as a match
    pub min_chain_length: usize,

    // === Geometry ===
    /// Max distance between the chain tail and the next linked ball
    pub link_distance: f32,
    /// Hit region radius of a ball
    pub ball_radius: f32,

    // === Spawner ===
    /// Horizontal spawn offset is uniform in [-range, range]
    pub spawn_max_range: f32,
    /// Field-entry height
    pub spawn_height: f32,
    /// Spawn rotation is uniform in [-deg, deg]
    pub spawn_max_rotation_deg: f32,
    /// Delay between two staggered spawns
    pub spawn_interval_secs: f32,
    /// Run seed for reproducibility
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category_count: CATEGORY_COUNT as u32,
            initial_ball_count: INITIAL_BALL_COUNT,
            points_per_ball: POINTS_PER_BALL,
            initial_time_secs: INITIAL_TIME_SECS,
            min_chain_length: MIN_CHAIN_LENGTH,

            link_distance: LINK_DISTANCE,
            ball_radius: BALL_RADIUS,

            spawn_max_range: SPAWN_MAX_RANGE,
            spawn_height: SPAWN_HEIGHT,
            spawn_max_rotation_deg: SPAWN_MAX_ROTATION_DEG,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            seed: 0,
        }
    }
}

impl Settings {
    /// Default settings with a specific run seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.category_count == 0 {
            return Err(ConfigError::NonPositiveCategoryCount);
        }
        if self.category_count > u8::MAX as u32 {
            return Err(ConfigError::TooManyCategories(self.category_count));
        }
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            return Err(ConfigError::InvalidLinkDistance(self.link_distance));
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(ConfigError::InvalidBallRadius(self.ball_radius));
        }
        if self.min_chain_length == 0 {
            return Err(ConfigError::InvalidMinChainLength);
        }
        if !(self.spawn_interval_secs.is_finite() && self.spawn_interval_secs >= 0.0) {
            return Err(ConfigError::InvalidSpawnInterval(self.spawn_interval_secs));
        }
        if !(self.spawn_max_range.is_finite()
            && (0.0..=MAX_SPAWN_RANGE).contains(&self.spawn_max_range))
        {
            return Err(ConfigError::InvalidSpawnRange(self.spawn_max_range));
        }
        if !(0.0..=MAX_SPAWN_ROTATION_DEG).contains(&self.spawn_max_rotation_deg) {
            return Err(ConfigError::InvalidSpawnRotation(self.spawn_max_rotation_deg));
        }
        if !self.spawn_height.is_finite() {
            return Err(ConfigError::InvalidSpawnHeight(self.spawn_height));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults only when the
    /// file cannot be read. A file that exists but is malformed or invalid is
    /// still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { path, source }) => {
                log::warn!(
                    "failed to read settings from {}: {source}; using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.min_chain_length, 3);
        assert_eq!(settings.category_count, 5);
        assert_eq!(settings.points_per_ball, 100);
        assert_eq!(settings.initial_time_secs, 60);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "link_distance": 80.0, "seed": 7 }"#).unwrap();
        assert_eq!(settings.link_distance, 80.0);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.initial_ball_count, INITIAL_BALL_COUNT);
    }

    #[test]
    fn test_rejects_zero_categories() {
        let result = Settings::from_json(r#"{ "category_count": 0 }"#);
        assert!(matches!(result, Err(ConfigError::NonPositiveCategoryCount)));
    }

    #[test]
    fn test_rejects_non_positive_link_distance() {
        let mut settings = Settings::default();
        settings.link_distance = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidLinkDistance(_))
        ));
        settings.link_distance = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidLinkDistance(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load("/definitely/not/a/settings.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_rejects_bad_spawn_tuning() {
        let with = |tweak: fn(&mut Settings)| {
            let mut settings = Settings::default();
            tweak(&mut settings);
            settings.validate()
        };

        assert!(matches!(
            with(|s| s.spawn_interval_secs = -0.1),
            Err(ConfigError::InvalidSpawnInterval(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_interval_secs = f32::INFINITY),
            Err(ConfigError::InvalidSpawnInterval(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_max_range = f32::NAN),
            Err(ConfigError::InvalidSpawnRange(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_max_range = -1.0),
            Err(ConfigError::InvalidSpawnRange(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_max_rotation_deg = -5.0),
            Err(ConfigError::InvalidSpawnRotation(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_max_rotation_deg = 720.0),
            Err(ConfigError::InvalidSpawnRotation(_))
        ));
        assert!(matches!(
            with(|s| s.spawn_height = f32::NEG_INFINITY),
            Err(ConfigError::InvalidSpawnHeight(_))
        ));

        // Edges are accepted
        assert!(with(|s| s.spawn_max_range = 0.0).is_ok());
        assert!(with(|s| s.spawn_max_rotation_deg = 180.0).is_ok());
        assert!(with(|s| s.spawn_height = -50.0).is_ok());
    }

    #[test]
    fn test_rejects_spawn_values_that_overflow() {
        // Finite, but twice the value is not
        assert!(matches!(
            Settings::from_json(r#"{ "spawn_max_range": 3e38 }"#),
            Err(ConfigError::InvalidSpawnRange(_))
        ));
        // Out of f32 range, parses to infinity
        assert!(matches!(
            Settings::from_json(r#"{ "spawn_max_rotation_deg": 1e39 }"#),
            Err(ConfigError::InvalidSpawnRotation(_))
        ));
    }

    #[test]
    fn test_load_or_default_only_forgives_missing_files() {
        let settings = Settings::load_or_default("/definitely/not/a/settings.json").unwrap();
        assert_eq!(settings, Settings::default());

        let dir = std::env::temp_dir();
        let bad_json = dir.join(format!("ball-chain-bad-{}.json", std::process::id()));
        std::fs::write(&bad_json, "{ not json").unwrap();
        let parse = Settings::load_or_default(&bad_json);
        let invalid = dir.join(format!("ball-chain-invalid-{}.json", std::process::id()));
        std::fs::write(&invalid, r#"{ "category_count": 0 }"#).unwrap();
        let validation = Settings::load_or_default(&invalid);
        let _ = std::fs::remove_file(&bad_json);
        let _ = std::fs::remove_file(&invalid);

        assert!(matches!(parse, Err(ConfigError::Parse(_))));
        assert!(matches!(validation, Err(ConfigError::NonPositiveCategoryCount)));
    }

    #[test]
    fn test_json_roundtrip_keeps_tuning() {
        let settings = Settings {
            spawn_interval_secs: 0.0,
            ..Settings::with_seed(42)
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
