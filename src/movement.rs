//! # Movement, Collision & Deposit
//!
//! Each agent attempts to step forward along its (already turned) heading. A blocked move scatters
//! the agent's heading instead of moving it; a successful move atomically transfers occupancy and
//! deposits trail. Agents are shuffled immediately before this phase (SS4.4/SS4.6) so races for a
//! cell have no systematic winner.

use crate::agent::{Agent, EPSILON};
use crate::behavior::BehaviorParams;
use crate::grid::TrailGrid;
use crate::occupancy::OccupancyGrid;
use crate::rng::{current_worker_index, shuffle, WorkerRngPool};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Which wall a blocked move exited through, if any; `None` means the target cell was in-bounds
/// but at capacity (a crowding block), which scatters the full circle rather than a half-plane.
#[derive(Debug, Clone, Copy, PartialEq)]
enum WallExit {
    Left,
    Right,
    Top,
    Bottom,
}

impl WallExit {
    /// Inward half-plane for the wall just bounced off of: an agent exiting left gets a new
    /// heading in `(-pi/2, pi/2)` (pointing back toward +x), and so on.
    fn inward_range(self) -> (f64, f64) {
        match self {
            WallExit::Left => (-PI / 2.0, PI / 2.0),
            WallExit::Right => (PI / 2.0, 3.0 * PI / 2.0),
            WallExit::Top => (0.0, PI),
            WallExit::Bottom => (-PI, 0.0),
        }
    }
}

fn classify_block(nx: f64, ny: f64, width: f64, height: f64) -> Option<WallExit> {
    if nx < EPSILON {
        Some(WallExit::Left)
    } else if nx > width - EPSILON {
        Some(WallExit::Right)
    } else if ny < EPSILON {
        Some(WallExit::Top)
    } else if ny > height - EPSILON {
        Some(WallExit::Bottom)
    } else {
        None
    }
}

/// Moves, collision-checks and deposits for every agent in `agents`. `agents` must already be
/// shuffled (see [`crate::rng::shuffle`]) before calling this.
pub fn move_and_deposit(
    agents: &mut [Agent],
    trail: &TrailGrid,
    occupancy: &OccupancyGrid,
    behavior: &BehaviorParams,
    seeds: &WorkerRngPool,
) {
    let width = trail.width() as f64;
    let height = trail.height() as f64;

    agents.par_iter_mut().for_each(|agent| {
        let worker = current_worker_index();
        seeds.with_rng(worker, |rng| {
            let nx = agent.x + behavior.movement_speed * agent.direction.cos();
            let ny = agent.y + behavior.movement_speed * agent.direction.sin();

            let wall_exit = classify_block(nx, ny, width, height);
            let (old_row, old_col) = agent.cell();

            let crowd_blocked = wall_exit.is_none() && {
                let new_row = ny.floor() as usize;
                let new_col = nx.floor() as usize;
                (new_row, new_col) != (old_row, old_col)
                    && occupancy.get(new_row, new_col) >= occupancy.cap()
            };

            if wall_exit.is_some() || crowd_blocked {
                agent.direction = match wall_exit {
                    Some(wall) => {
                        let (lo, hi) = wall.inward_range();
                        rng.range_f64(lo, hi)
                    }
                    None => rng.range_f64(0.0, 2.0 * PI),
                };
                return;
            }

            let new_row = ny.floor() as usize;
            let new_col = nx.floor() as usize;

            if (new_row, new_col) != (old_row, old_col) {
                if !occupancy.try_enter(new_row, new_col) {
                    // Lost the race to a concurrent mover: scatter full circle (crowding block).
                    agent.direction = rng.range_f64(0.0, 2.0 * PI);
                    return;
                }
                occupancy.leave(old_row, old_col);
            }

            agent.x = nx;
            agent.y = ny;
            trail.deposit_clamped(new_row, new_col, behavior.trail_deposit_rate, behavior.trail_max);
        });
    });
}

/// Shuffles `agents` in place using a single-thread generator, matching the reference ordering
/// discipline: called once, serially, immediately before [`move_and_deposit`].
pub fn shuffle_agents(agents: &mut [Agent], rng: &mut crate::rng::Xorshift64) {
    shuffle(agents, rng);
}
