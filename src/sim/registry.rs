//! Ball registry
//!
//! Owns every live ball. Everything else (chain, host) refers to balls by
//! [`BallId`] only.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::point_in_ball;
use super::state::{Ball, BallId, Category};
use crate::error::SimError;

/// Owning container of live balls, iterated in id order for determinism
#[derive(Debug, Clone)]
pub struct BallRegistry {
    balls: BTreeMap<BallId, Ball>,
    /// Hit region radius shared by all balls
    ball_radius: f32,
    next_id: u32,
}

impl BallRegistry {
    pub fn new(ball_radius: f32) -> Self {
        Self {
            balls: BTreeMap::new(),
            ball_radius,
            next_id: 1,
        }
    }

    /// Insert a new unselected ball at full opacity
    pub fn spawn(&mut self, category: Category, pos: Vec2) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        self.balls.insert(id, Ball::new(id, category, pos));
        id
    }

    /// Topmost ball whose hit region contains `point`.
    ///
    /// Later spawns draw on top of earlier ones, so the highest id wins.
    pub fn hit_test(&self, point: Vec2) -> Option<BallId> {
        self.balls
            .values()
            .rev()
            .find(|ball| point_in_ball(point, ball.pos, self.ball_radius))
            .map(|ball| ball.id)
    }

    /// Remove a set of balls. Fails without touching anything if any id is not live.
    pub fn remove(&mut self, ids: &[BallId]) -> Result<Vec<Ball>, SimError> {
        if let Some(&missing) = ids.iter().find(|id| !self.balls.contains_key(*id)) {
            return Err(SimError::UnknownEntity(missing));
        }
        Ok(ids.iter().filter_map(|id| self.balls.remove(id)).collect())
    }

    pub fn set_selected(&mut self, id: BallId, selected: bool) -> Result<(), SimError> {
        self.get_mut(id)?.selected = selected;
        Ok(())
    }

    pub fn set_alpha(&mut self, id: BallId, alpha: f32) -> Result<(), SimError> {
        self.get_mut(id)?.alpha = alpha;
        Ok(())
    }

    /// Update a ball position (physics is driven by the host)
    pub fn set_position(&mut self, id: BallId, pos: Vec2) -> Result<(), SimError> {
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Result<&mut Ball, SimError> {
        self.balls.get_mut(&id).ok_or(SimError::UnknownEntity(id))
    }

    pub fn contains(&self, id: BallId) -> bool {
        self.balls.contains_key(&id)
    }

    /// Live balls in id order
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    /// Drop every ball (ids keep counting up)
    pub fn clear(&mut self) {
        self.balls.clear();
    }
}
