//! Match resolution
//!
//! Turns a released chain into removals, score and a replenish request.
//! Order is fixed: remove, then score, then request.

use super::chain::Chain;
use super::registry::BallRegistry;
use super::session::SessionCounters;
use super::state::{Category, ReplenishRequest};
use crate::error::SimError;
use crate::settings::Settings;

/// Outcome of releasing a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Chain was long enough: balls removed and scored
    Resolved {
        count: u32,
        category: Category,
        points: u64,
        replenish: ReplenishRequest,
    },
    /// Chain too short, nothing changed
    Discarded { len: usize },
}

impl Resolution {
    pub fn replenish(&self) -> Option<ReplenishRequest> {
        match self {
            Resolution::Resolved { replenish, .. } => Some(*replenish),
            Resolution::Discarded { .. } => None,
        }
    }
}

/// Resolve a released chain against the registry and session counters
pub fn resolve(
    chain: &Chain,
    registry: &mut BallRegistry,
    session: &mut SessionCounters,
    settings: &Settings,
) -> Result<Resolution, SimError> {
    let len = chain.len();
    if len < settings.min_chain_length {
        return Ok(Resolution::Discarded { len });
    }

    // Fails before anything is mutated if the chain holds a stale id
    registry.remove(chain.balls())?;

    let count = len as u32;
    let points = settings.points_per_ball.saturating_mul(count as u64);
    session.add_score(points);
    session.add_erased(count as u64);

    log::info!(
        "Matched {} balls of category {} (+{} points)",
        count,
        chain.category().0,
        points
    );

    Ok(Resolution::Resolved {
        count,
        category: chain.category(),
        points,
        replenish: ReplenishRequest { count },
    })
}
