//! Ball Chain headless runner
//!
//! Plays one idle-mode session at a fixed frame rate and prints the result.
//!
//! Usage: `ball-chain [settings.json] [--ticks N]`

use std::process::ExitCode;

use serde::Serialize;

use ball_chain::consts::*;
use ball_chain::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use ball_chain::{SimError, Settings};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 30.0;
/// Tick cap when none is given (a bit over one default session)
const DEFAULT_MAX_TICKS: u64 = 4000;

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    score: u64,
    erased: u64,
    remaining_time: u32,
    game_over: bool,
}

/// Frame driver holding the accumulator between frames
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks owed for one frame
    fn update(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::ChainResolved { count, points, .. } => {
                    log::debug!("match x{} (+{})", count, points);
                }
                GameEvent::SessionEnded { score, erased } => {
                    log::info!("Time up! score={} erased={}", score, erased);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_args() -> (Option<String>, u64) {
    let mut path = None;
    let mut max_ticks = DEFAULT_MAX_TICKS;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--ticks" {
            match args.next().map(|v| v.parse::<u64>()) {
                Some(Ok(n)) => max_ticks = n,
                _ => log::warn!("--ticks expects a number, keeping {}", max_ticks),
            }
        } else {
            path = Some(arg);
        }
    }
    (path, max_ticks)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ball Chain (headless) starting...");

    let (path, max_ticks) = parse_args();
    let settings = match path.map(Settings::load_or_default) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => {
            log::error!("Invalid settings file: {e}");
            return ExitCode::FAILURE;
        }
        None => Settings::default(),
    };

    let state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut game = Game::new(state);
    while game.state.phase != GamePhase::GameOver && game.state.time_ticks < max_ticks {
        if let Err(e) = game.update(FRAME_DT) {
            log::error!("Simulation error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let state = &game.state;
    let summary = Summary {
        seed: state.settings.seed,
        ticks: state.time_ticks,
        score: state.session.score(),
        erased: state.session.erased(),
        remaining_time: state.session.remaining_time(),
        game_over: state.phase == GamePhase::GameOver,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to encode summary: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
