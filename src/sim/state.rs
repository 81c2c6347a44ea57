//! Core simulation types
//!
//! Plain data shared by the registry, the chain tracker and the host.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable ball identifier, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ball category (0-based index into the configured category count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(pub u8);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running, input accepted
    Playing,
    /// Clock reached zero
    GameOver,
}

/// A matchable ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub category: Category,
    pub pos: Vec2,
    /// Cosmetic spin (radians), set at spawn
    #[serde(default)]
    pub rotation: f32,
    /// Part of the in-progress chain
    pub selected: bool,
    /// Position in the chain while selected
    pub chain_index: Option<u32>,
    /// Feedback opacity, mirrors `selected`
    pub alpha: f32,
}

impl Ball {
    pub fn new(id: BallId, category: Category, pos: Vec2) -> Self {
        Self {
            id,
            category,
            pos,
            rotation: 0.0,
            selected: false,
            chain_index: None,
            alpha: UNSELECTED_ALPHA,
        }
    }

    /// Mark as chain member at `index`
    pub fn select(&mut self, index: u32) {
        self.selected = true;
        self.chain_index = Some(index);
        self.alpha = SELECTED_ALPHA;
    }

    /// Back to the idle look
    pub fn deselect(&mut self) {
        self.selected = false;
        self.chain_index = None;
        self.alpha = UNSELECTED_ALPHA;
    }
}

/// Request for replacement balls after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishRequest {
    pub count: u32,
}

/// Events emitted for the presentation layer (drained each frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ChainStarted { id: BallId, category: Category },
    BallLinked { id: BallId, chain_len: usize },
    Backtracked { removed: BallId, chain_len: usize },
    ChainResolved { count: u32, category: Category, points: u64 },
    ChainDiscarded { len: usize },
    ReplenishRequested(ReplenishRequest),
    BallSpawned { id: BallId, category: Category },
    SessionEnded { score: u64, erased: u64 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Same seed and stream always give the same sequence
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Move to a fresh stream (used on restart)
    pub fn advance_stream(&mut self) {
        self.stream = self.stream.wrapping_add(1);
    }
}

impl Default for RngState {
    fn default() -> Self {
        Self::new(0)
    }
}
