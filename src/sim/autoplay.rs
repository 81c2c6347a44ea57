//! Idle/demo mode chain planner
//!
//! Finds a linkable path of same-category balls for the attract loop.
//! Search is depth-first in ascending id order, so plans are deterministic.

use super::collision::can_link;
use super::registry::BallRegistry;
use super::state::{Ball, BallId};
use crate::settings::Settings;

/// Upper bound on search work per plan
const MAX_VISITS: usize = 4096;

/// Plan a chain of at least `min_chain_length` balls.
///
/// Returns the longest path found within the search budget.
pub fn plan_chain(registry: &BallRegistry, settings: &Settings) -> Option<Vec<BallId>> {
    let balls: Vec<&Ball> = registry.iter().collect();
    let mut visits = 0;
    let mut best: Option<Vec<usize>> = None;

    for start in 0..balls.len() {
        let mut path = vec![start];
        extend(&balls, &mut path, settings.link_distance, &mut visits, &mut best);
        if let Some(found) = &best
            && found.len() >= settings.min_chain_length
        {
            break;
        }
        if visits >= MAX_VISITS {
            break;
        }
    }

    best.filter(|path| path.len() >= settings.min_chain_length)
        .map(|path| path.into_iter().map(|i| balls[i].id).collect())
}

fn extend(
    balls: &[&Ball],
    path: &mut Vec<usize>,
    link_distance: f32,
    visits: &mut usize,
    best: &mut Option<Vec<usize>>,
) {
    *visits += 1;
    if best.as_ref().is_none_or(|b| path.len() > b.len()) {
        *best = Some(path.clone());
    }
    if *visits >= MAX_VISITS {
        return;
    }

    let tail = balls[path[path.len() - 1]];
    for next in 0..balls.len() {
        let candidate = balls[next];
        if candidate.category != tail.category
            || path.contains(&next)
            || !can_link(tail.pos, candidate.pos, link_distance)
        {
            continue;
        }
        path.push(next);
        extend(balls, path, link_distance, visits, best);
        path.pop();
        if *visits >= MAX_VISITS {
            return;
        }
    }
}
