//! # Sensing & Turning
//!
//! Each agent samples trail+food concentration at three candidate headings ahead of it and turns
//! toward whichever one smelled strongest, then adds angular noise. Runs as a rayon `for_each` over
//! the agent array; every agent reads its own worker-local RNG slot, so no two agents ever share
//! generator state (SS4.3).

use crate::agent::Agent;
use crate::behavior::BehaviorParams;
use crate::grid::{FoodGrid, TrailGrid};
use crate::rng::{current_worker_index, WorkerRngPool};
use rayon::prelude::*;

/// The three candidate offsets, in the canonical order; a per-agent random permutation of this is
/// what actually gets iterated so ties don't systematically favor one side.
const OFFSETS: [f64; 3] = [-1.0, 0.0, 1.0];

/// All 6 orderings of index `{0, 1, 2}` into `OFFSETS`.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Attraction sampled at `(x, y)`: trail concentration plus whatever the food field contributes
/// there (zero when no food field is in play).
#[inline]
fn attraction_at(trail: &TrailGrid, food: Option<&FoodGrid>, x: f64, y: f64) -> f64 {
    let row = y.floor() as usize;
    let col = x.floor() as usize;
    let base = trail.get(row, col);
    match food {
        Some(food) => base + food.get(row, col),
        None => base,
    }
}

/// Senses and turns every agent in `agents` in parallel, then adds uniform angular noise. Mutates
/// `agents` in place; does not touch position (that's the movement phase).
pub fn sense_and_turn(
    agents: &mut [Agent],
    trail: &TrailGrid,
    food: Option<&FoodGrid>,
    behavior: &BehaviorParams,
    seeds: &WorkerRngPool,
) {
    let sensor_half_angle = behavior.turn_rate * behavior.sensor_angle_factor;

    agents.par_iter_mut().for_each(|agent| {
        let worker = current_worker_index();
        seeds.with_rng(worker, |rng| {
            let permutation = &PERMUTATIONS[rng.below(PERMUTATIONS.len())];

            let mut best_attraction = f64::NEG_INFINITY;
            let mut best_offset = None;

            for &idx in permutation {
                let offset = OFFSETS[idx];
                let theta = agent.direction + offset * sensor_half_angle;
                let sx = agent.x + behavior.sensor_length * theta.cos();
                let sy = agent.y + behavior.sensor_length * theta.sin();

                if !crate::agent::in_bounds(sx, sy, trail) {
                    continue;
                }

                let attraction = attraction_at(trail, food, sx, sy);
                if attraction > best_attraction {
                    best_attraction = attraction;
                    best_offset = Some(offset);
                }
            }

            if let Some(offset) = best_offset {
                agent.direction += offset * behavior.turn_rate;
            }

            let noise_half_width = behavior.movement_noise * 3f64.sqrt();
            agent.direction += rng.range_f64(-noise_half_width, noise_half_width);
        });
    });
}
