//! Staggered ball spawner
//!
//! Fulfils replenish requests one ball at a time, spaced by a fixed interval,
//! dropping each ball in at a random horizontal offset above the field.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::registry::BallRegistry;
use super::state::{BallId, Category, ReplenishRequest, RngState};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng_state: RngState,
    rng: Pcg32,
    /// Balls still owed to the field
    pending: u32,
    /// Time banked toward the next spawn
    timer: f32,
}

impl Spawner {
    pub fn new(rng_state: RngState) -> Self {
        let rng = rng_state.to_rng();
        Self {
            rng_state,
            rng,
            pending: 0,
            timer: 0.0,
        }
    }

    pub fn rng_state(&self) -> &RngState {
        &self.rng_state
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Queue replacement balls. The first one drops on the next update.
    pub fn request(&mut self, request: ReplenishRequest, settings: &Settings) {
        if request.count == 0 {
            return;
        }
        if self.pending == 0 {
            self.timer = settings.spawn_interval_secs;
        }
        self.pending = self.pending.saturating_add(request.count);
    }

    /// Drop any pending work and reseed on a new stream
    pub fn reset(&mut self) {
        self.rng_state.advance_stream();
        self.rng = self.rng_state.to_rng();
        self.pending = 0;
        self.timer = 0.0;
    }

    /// Release due balls into the registry
    pub fn update(
        &mut self,
        dt: f32,
        registry: &mut BallRegistry,
        settings: &Settings,
    ) -> Vec<(BallId, Category)> {
        let mut spawned = Vec::new();
        if self.pending == 0 {
            return spawned;
        }

        let interval = settings.spawn_interval_secs;
        if interval <= 0.0 {
            while self.pending > 0 {
                spawned.push(self.spawn_one(registry, settings));
            }
            return spawned;
        }

        if dt.is_finite() && dt > 0.0 {
            self.timer += dt;
        }
        while self.pending > 0 && self.timer >= interval {
            self.timer -= interval;
            spawned.push(self.spawn_one(registry, settings));
        }
        if self.pending == 0 {
            self.timer = 0.0;
        }
        spawned
    }

    fn spawn_one(&mut self, registry: &mut BallRegistry, settings: &Settings) -> (BallId, Category) {
        self.pending -= 1;

        let category = Category(self.rng.random_range(0..settings.category_count) as u8);
        // Both bounds are validated as non-negative and small enough to span
        let range = settings.spawn_max_range;
        let x = self.rng.random_range(-range..=range);
        let max_rot = settings.spawn_max_rotation_deg;
        let rotation = self.rng.random_range(-max_rot..=max_rot).to_radians();

        let id = registry.spawn(category, Vec2::new(x, settings.spawn_height));
        if let Ok(ball) = registry.get_mut(id) {
            ball.rotation = rotation;
        }
        (id, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(interval: f32) -> Settings {
        Settings {
            spawn_interval_secs: interval,
            ..Settings::with_seed(7)
        }
    }

    #[test]
    fn test_zero_interval_spawns_everything() {
        let settings = settings(0.0);
        let mut registry = BallRegistry::new(settings.ball_radius);
        let mut spawner = Spawner::new(RngState::new(settings.seed));
        spawner.request(ReplenishRequest { count: 5 }, &settings);
        let spawned = spawner.update(0.0, &mut registry, &settings);
        assert_eq!(spawned.len(), 5);
        assert_eq!(registry.len(), 5);
        assert_eq!(spawner.pending(), 0);
    }

    #[test]
    fn test_staggered_spawning() {
        let settings = settings(0.1);
        let mut registry = BallRegistry::new(settings.ball_radius);
        let mut spawner = Spawner::new(RngState::new(settings.seed));
        spawner.request(ReplenishRequest { count: 3 }, &settings);

        // First ball drops immediately
        assert_eq!(spawner.update(0.0, &mut registry, &settings).len(), 1);
        assert_eq!(spawner.update(0.05, &mut registry, &settings).len(), 0);
        assert_eq!(spawner.update(0.06, &mut registry, &settings).len(), 1);
        assert_eq!(spawner.update(0.25, &mut registry, &settings).len(), 1);
        assert_eq!(spawner.pending(), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_spawn_fields_stay_in_bounds() {
        let settings = settings(0.0);
        let mut registry = BallRegistry::new(settings.ball_radius);
        let mut spawner = Spawner::new(RngState::new(settings.seed));
        spawner.request(ReplenishRequest { count: 200 }, &settings);
        spawner.update(0.0, &mut registry, &settings);

        let max_rot = settings.spawn_max_rotation_deg.to_radians() + 1e-4;
        for ball in registry.iter() {
            assert!((ball.category.0 as u32) < settings.category_count);
            assert!(ball.pos.x.abs() <= settings.spawn_max_range);
            assert_eq!(ball.pos.y, settings.spawn_height);
            assert!(ball.rotation.abs() <= max_rot);
            assert!(!ball.selected);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let settings = settings(0.0);
        let run = || {
            let mut registry = BallRegistry::new(settings.ball_radius);
            let mut spawner = Spawner::new(RngState::new(settings.seed));
            spawner.request(ReplenishRequest { count: 20 }, &settings);
            spawner.update(0.0, &mut registry, &settings);
            registry
                .iter()
                .map(|b| (b.category, b.pos.x))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_moves_to_new_stream() {
        let settings = settings(0.0);
        let mut spawner = Spawner::new(RngState::new(settings.seed));
        spawner.request(ReplenishRequest { count: 4 }, &settings);
        spawner.reset();
        assert_eq!(spawner.pending(), 0);
        assert_eq!(spawner.rng_state().stream, 1);
    }
}
