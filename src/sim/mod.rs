//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod chain;
pub mod collision;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autoplay::plan_chain;
pub use chain::{Chain, ChainState, ChainTracker, ChainUpdate, IgnoreReason};
pub use collision::{can_link, point_in_ball};
pub use registry::BallRegistry;
pub use resolver::{Resolution, resolve};
pub use session::SessionCounters;
pub use spawner::Spawner;
pub use state::{Ball, BallId, Category, GameEvent, GamePhase, ReplenishRequest, RngState};
pub use tick::{GameState, PointerInput, TickInput, tick};
