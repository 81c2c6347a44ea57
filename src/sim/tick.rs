//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Each tick
//! handles at most one pointer event, then the session clock, then the spawner.

use std::collections::VecDeque;

use glam::Vec2;

use super::autoplay::plan_chain;
use super::chain::{ChainTracker, ChainUpdate, IgnoreReason};
use super::registry::BallRegistry;
use super::resolver::Resolution;
use super::session::SessionCounters;
use super::spawner::Spawner;
use super::state::{BallId, GameEvent, GamePhase, ReplenishRequest, RngState};
use crate::error::{ConfigError, SimError};
use crate::settings::Settings;

/// A pointer event already mapped to play-field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// At most one pointer event per tick
    pub pointer: Option<PointerInput>,
    /// Idle/demo mode - the planner drags chains when no pointer input arrives
    pub idle_mode: bool,
}

/// One queued autoplay gesture step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoStep {
    Down(BallId),
    Move(BallId),
    Up,
}

/// Session context: owns the field, the chain and the counters
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub registry: BallRegistry,
    pub chain: ChainTracker,
    pub session: SessionCounters,
    pub spawner: Spawner,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    autoplay: VecDeque<AutoStep>,
}

impl GameState {
    /// Start a session. The opening fill is queued on the spawner.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut spawner = Spawner::new(RngState::new(settings.seed));
        spawner.request(
            ReplenishRequest {
                count: settings.initial_ball_count,
            },
            &settings,
        );
        log::info!(
            "Session started: seed={}, categories={}, time={}s",
            settings.seed,
            settings.category_count,
            settings.initial_time_secs
        );

        Ok(Self {
            registry: BallRegistry::new(settings.ball_radius),
            chain: ChainTracker::new(),
            session: SessionCounters::new(settings.initial_time_secs),
            spawner,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            autoplay: VecDeque::new(),
            settings,
        })
    }

    /// Tear the session down and start over with the same settings
    pub fn restart(&mut self) {
        self.registry.clear();
        self.chain = ChainTracker::new();
        self.session = SessionCounters::new(self.settings.initial_time_secs);
        self.spawner.reset();
        self.spawner.request(
            ReplenishRequest {
                count: self.settings.initial_ball_count,
            },
            &self.settings,
        );
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.events.clear();
        self.autoplay.clear();
        log::info!("Session restarted (stream {})", self.spawner.rng_state().stream);
    }

    /// Events since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch a coordinate-level pointer event through hit-testing
    pub fn handle_pointer(&mut self, pointer: PointerInput) -> Result<(), SimError> {
        match pointer {
            PointerInput::Down(point) => {
                let target = self.registry.hit_test(point);
                self.pointer_down_on(target)?;
            }
            PointerInput::Move(point) => {
                let target = self.registry.hit_test(point);
                self.pointer_move_on(target)?;
            }
            PointerInput::Up => {
                self.pointer_up()?;
            }
        }
        Ok(())
    }

    /// Pointer pressed over an already resolved target
    pub fn pointer_down_on(&mut self, target: Option<BallId>) -> Result<ChainUpdate, SimError> {
        if self.phase == GamePhase::GameOver {
            return Ok(ChainUpdate::Ignored(IgnoreReason::SessionOver));
        }
        let update = self.chain.pointer_down(&mut self.registry, target)?;
        self.record(update);
        Ok(update)
    }

    /// Pointer dragged over an already resolved target
    pub fn pointer_move_on(&mut self, target: Option<BallId>) -> Result<ChainUpdate, SimError> {
        if self.phase == GamePhase::GameOver {
            return Ok(ChainUpdate::Ignored(IgnoreReason::SessionOver));
        }
        let update =
            self.chain
                .pointer_move(&mut self.registry, target, self.settings.link_distance)?;
        self.record(update);
        Ok(update)
    }

    /// Pointer released: resolve, then hand any replenish request to the spawner
    pub fn pointer_up(&mut self) -> Result<Option<Resolution>, SimError> {
        if self.phase == GamePhase::GameOver {
            return Ok(None);
        }
        let resolution =
            self.chain
                .pointer_up(&mut self.registry, &mut self.session, &self.settings)?;

        match resolution {
            Some(Resolution::Resolved {
                count,
                category,
                points,
                replenish,
            }) => {
                self.events.push(GameEvent::ChainResolved {
                    count,
                    category,
                    points,
                });
                self.events.push(GameEvent::ReplenishRequested(replenish));
                self.spawner.request(replenish, &self.settings);
            }
            Some(Resolution::Discarded { len }) => {
                self.events.push(GameEvent::ChainDiscarded { len });
            }
            None => {}
        }
        Ok(resolution)
    }

    fn record(&mut self, update: ChainUpdate) {
        match update {
            ChainUpdate::Started { id, category } => {
                self.events.push(GameEvent::ChainStarted { id, category });
            }
            ChainUpdate::Linked { id, chain_len } => {
                self.events.push(GameEvent::BallLinked { id, chain_len });
            }
            ChainUpdate::Backtracked { removed, chain_len } => {
                self.events.push(GameEvent::Backtracked { removed, chain_len });
            }
            ChainUpdate::Unchanged | ChainUpdate::Ignored(_) => {}
        }
    }

    /// Feed the next planned gesture step, planning a new chain when idle
    fn autoplay_step(&mut self) -> Result<(), SimError> {
        if self.autoplay.is_empty() {
            if self.chain.is_building() {
                self.autoplay.push_back(AutoStep::Up);
            } else if let Some(plan) = plan_chain(&self.registry, &self.settings) {
                log::debug!("autoplay planned a chain of {}", plan.len());
                self.autoplay.push_back(AutoStep::Down(plan[0]));
                self.autoplay
                    .extend(plan[1..].iter().map(|&id| AutoStep::Move(id)));
                self.autoplay.push_back(AutoStep::Up);
            }
        }

        // Balls may vanish between planning and playback; treat them as empty space
        match self.autoplay.pop_front() {
            Some(AutoStep::Down(id)) => {
                let target = self.registry.contains(id).then_some(id);
                self.pointer_down_on(target)?;
            }
            Some(AutoStep::Move(id)) => {
                let target = self.registry.contains(id).then_some(id);
                self.pointer_move_on(target)?;
            }
            Some(AutoStep::Up) => {
                self.pointer_up()?;
            }
            None => {}
        }
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), SimError> {
        let reverted = self.chain.cancel(&mut self.registry)?;
        if reverted > 0 {
            self.events.push(GameEvent::ChainDiscarded { len: reverted });
        }
        self.autoplay.clear();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::SessionEnded {
            score: self.session.score(),
            erased: self.session.erased(),
        });
        log::info!(
            "Session ended: score={}, erased={}",
            self.session.score(),
            self.session.erased()
        );
        Ok(())
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    // Nothing moves once the clock has run out
    if state.phase == GamePhase::GameOver {
        return Ok(());
    }

    state.time_ticks += 1;

    match input.pointer {
        Some(pointer) => {
            // Real input takes over from any half-played demo gesture
            state.autoplay.clear();
            state.handle_pointer(pointer)?;
        }
        None if input.idle_mode => state.autoplay_step()?,
        None => {}
    }

    if state.session.tick(dt) {
        return state.end_session();
    }

    let spawned = state
        .spawner
        .update(dt, &mut state.registry, &state.settings);
    state.events.extend(
        spawned
            .into_iter()
            .map(|(id, category)| GameEvent::BallSpawned { id, category }),
    );

    Ok(())
}
