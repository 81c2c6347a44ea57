//! Drag chain state machine
//!
//! Tracks the path the player is dragging across same-category balls.
//! Rules on every pointer move, evaluated against the current tail:
//! 1. Hovering the tail does nothing.
//! 2. A ball of the locked category, not yet in the chain and within link
//!    distance of the tail, is appended.
//! 3. Hovering the ball just before the tail peels the tail off (one step per event).
//! 4. Anything else does nothing.

use super::collision::can_link;
use super::registry::BallRegistry;
use super::resolver::{Resolution, resolve};
use super::session::SessionCounters;
use super::state::{BallId, Category};
use crate::error::SimError;
use crate::settings::Settings;

/// The in-progress selection path. Holds ids only; the registry owns the balls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    balls: Vec<BallId>,
    category: Category,
}

impl Chain {
    fn start(id: BallId, category: Category) -> Self {
        Self {
            balls: vec![id],
            category,
        }
    }

    /// Ids in drag order
    pub fn balls(&self) -> &[BallId] {
        &self.balls
    }

    /// Category of the first ball; every member shares it
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn tail(&self) -> Option<BallId> {
        self.balls.last().copied()
    }

    /// The ball one step before the tail
    pub fn previous(&self) -> Option<BallId> {
        self.balls.len().checked_sub(2).map(|i| self.balls[i])
    }

    pub fn contains(&self, id: BallId) -> bool {
        self.balls.contains(&id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChainState {
    #[default]
    Idle,
    Building(Chain),
}

/// Out-of-order input that is dropped instead of failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    DownWhileBuilding,
    MoveWhileIdle,
    /// Input after the clock ran out
    SessionOver,
}

/// What a single pointer event did to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainUpdate {
    Started { id: BallId, category: Category },
    Linked { id: BallId, chain_len: usize },
    Backtracked { removed: BallId, chain_len: usize },
    /// Valid event that leaves the chain as it was
    Unchanged,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Default)]
pub struct ChainTracker {
    state: ChainState,
}

impl ChainTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Current chain, if a drag is in progress
    pub fn chain(&self) -> Option<&Chain> {
        match &self.state {
            ChainState::Building(chain) => Some(chain),
            ChainState::Idle => None,
        }
    }

    pub fn is_building(&self) -> bool {
        matches!(self.state, ChainState::Building(_))
    }

    /// Pointer pressed over `target` (if any)
    pub fn pointer_down(
        &mut self,
        registry: &mut BallRegistry,
        target: Option<BallId>,
    ) -> Result<ChainUpdate, SimError> {
        if self.is_building() {
            log::debug!("pointer down ignored: chain already in progress");
            return Ok(ChainUpdate::Ignored(IgnoreReason::DownWhileBuilding));
        }
        let Some(id) = target else {
            return Ok(ChainUpdate::Unchanged);
        };

        let ball = registry.get_mut(id)?;
        ball.select(0);
        let category = ball.category;
        self.state = ChainState::Building(Chain::start(id, category));
        log::debug!("chain started at {id} (category {})", category.0);
        Ok(ChainUpdate::Started { id, category })
    }

    /// Pointer dragged over `target` (if any)
    pub fn pointer_move(
        &mut self,
        registry: &mut BallRegistry,
        target: Option<BallId>,
        link_distance: f32,
    ) -> Result<ChainUpdate, SimError> {
        let ChainState::Building(chain) = &mut self.state else {
            log::debug!("pointer move ignored: no chain in progress");
            return Ok(ChainUpdate::Ignored(IgnoreReason::MoveWhileIdle));
        };
        let Some(id) = target else {
            return Ok(ChainUpdate::Unchanged);
        };
        let Some(tail) = chain.tail() else {
            return Ok(ChainUpdate::Unchanged);
        };
        if id == tail {
            return Ok(ChainUpdate::Unchanged);
        }

        let tail_ball = registry.get(tail).ok_or(SimError::UnknownEntity(tail))?;
        let tail_pos = tail_ball.pos;
        let tail_selected = tail_ball.selected;
        let hovered = registry.get(id).ok_or(SimError::UnknownEntity(id))?;

        if hovered.category == chain.category
            && !chain.contains(id)
            && can_link(tail_pos, hovered.pos, link_distance)
        {
            let index = chain.len() as u32;
            registry.get_mut(id)?.select(index);
            chain.balls.push(id);
            log::debug!("linked {id} at index {index}");
            return Ok(ChainUpdate::Linked {
                id,
                chain_len: chain.len(),
            });
        }

        if chain.previous() == Some(id) && tail_selected {
            registry.get_mut(tail)?.deselect();
            chain.balls.pop();
            log::debug!("backtracked from {tail} to {id}");
            return Ok(ChainUpdate::Backtracked {
                removed: tail,
                chain_len: chain.len(),
            });
        }

        Ok(ChainUpdate::Unchanged)
    }

    /// Pointer released: resolve the chain, revert whatever survived, go idle.
    ///
    /// Returns `None` when no chain was in progress.
    pub fn pointer_up(
        &mut self,
        registry: &mut BallRegistry,
        session: &mut SessionCounters,
        settings: &Settings,
    ) -> Result<Option<Resolution>, SimError> {
        let ChainState::Building(chain) = std::mem::take(&mut self.state) else {
            log::debug!("pointer up ignored: no chain in progress");
            return Ok(None);
        };

        let resolution = match resolve(&chain, registry, session, settings) {
            Ok(resolution) => resolution,
            Err(e) => {
                // Nothing was removed, so no survivor may stay highlighted
                let _ = deselect_live(registry, chain.balls());
                return Err(e);
            }
        };
        if let Resolution::Discarded { .. } = resolution {
            deselect_live(registry, chain.balls())?;
        }
        Ok(Some(resolution))
    }

    /// Drop the chain without resolving it. Returns how many balls were reverted.
    pub fn cancel(&mut self, registry: &mut BallRegistry) -> Result<usize, SimError> {
        let ChainState::Building(chain) = std::mem::take(&mut self.state) else {
            return Ok(0);
        };
        deselect_live(registry, chain.balls())?;
        Ok(chain.len())
    }
}

/// Revert every live ball in `ids`, then report the first one that was missing
fn deselect_live(registry: &mut BallRegistry, ids: &[BallId]) -> Result<(), SimError> {
    let mut missing = None;
    for &id in ids {
        match registry.get_mut(id) {
            Ok(ball) => ball.deselect(),
            Err(e) => {
                missing.get_or_insert(e);
            }
        }
    }
    missing.map_or(Ok(()), Err)
}
