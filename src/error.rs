//! Error types
//!
//! `SimError` marks a broken registry/chain invariant and is never swallowed.
//! `ConfigError` is raised once, when a session is created.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::BallId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("ball {0} is not live in the registry")]
    UnknownEntity(BallId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("category_count must be at least 1")]
    NonPositiveCategoryCount,
    #[error("category_count {0} exceeds the supported maximum of 255")]
    TooManyCategories(u32),
    #[error("link_distance must be a positive finite number, got {0}")]
    InvalidLinkDistance(f32),
    #[error("ball_radius must be a positive finite number, got {0}")]
    InvalidBallRadius(f32),
    #[error("min_chain_length must be at least 1")]
    InvalidMinChainLength,
    #[error("spawn_interval_secs must be a non-negative finite number, got {0}")]
    InvalidSpawnInterval(f32),
    #[error("spawn_max_range must be a non-negative finite number no larger than 8.5e37, got {0}")]
    InvalidSpawnRange(f32),
    #[error("spawn_max_rotation_deg must be between 0 and 180, got {0}")]
    InvalidSpawnRotation(f32),
    #[error("spawn_height must be a finite number, got {0}")]
    InvalidSpawnHeight(f32),
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
