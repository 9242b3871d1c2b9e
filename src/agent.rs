//! # Agent Population
//!
//! An agent is a point-like particle: a position strictly inside the grid's interior and an
//! unnormalized heading, operated on only via `cos`/`sin`. Agents are created once at startup,
//! mutated in place every micro-step, and dropped at shutdown - there is no per-agent identity
//! beyond array position.

use crate::errors::SimError;
use crate::grid::TrailGrid;
use crate::occupancy::MAX_PER_CELL;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f64::consts::PI;

/// How many times a single agent resamples a ring point before falling back to a deterministic
/// scan for the nearest under-capacity interior cell.
const RING_RESAMPLE_ATTEMPTS: u32 = 64;

/// Keeps floor-indexed grid lookups safe: positions are clamped to `[EPSILON, dim - EPSILON]`,
/// never touching the boundary row/column the diffusion kernel zeroes out.
pub const EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    pub x: f64,
    pub y: f64,
    pub direction: f64,
}

impl Agent {
    pub fn new(x: f64, y: f64, direction: f64) -> Self {
        Agent { x, y, direction }
    }

    #[inline]
    pub fn cell(&self) -> (usize, usize) {
        (self.y.floor() as usize, self.x.floor() as usize)
    }
}

/// Seeds `n` agents on a ring centered on the grid, at roughly `0.4 * min(width, height)` from
/// center with +/-5% radius jitter and a uniform random heading - the reference simulation's
/// default initial condition (SS4.7). Uses an ordinary thread RNG since this runs once at startup,
/// outside the per-step worker-seeded concurrency model.
///
/// Every interior cell holds at most `MAX_PER_CELL` agents once this returns, so the occupancy
/// grid's sum invariant holds from frame zero: a candidate point that would land in an already-full
/// cell is resampled, and if resampling keeps losing the draw the first under-capacity interior
/// cell (in row-major order) is used instead. Errors if `n` exceeds the interior's total capacity.
pub fn initialize_ring(n: usize, width: usize, height: usize) -> Result<Vec<Agent>, SimError> {
    let capacity = width.saturating_sub(2) * height.saturating_sub(2) * MAX_PER_CELL as usize;
    if n > capacity {
        return Err(SimError::Capacity {
            nagents: n,
            capacity,
        });
    }

    let mut rng = rand::rng();
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let base_radius = 0.4 * width.min(height) as f64;

    let jitter = Uniform::new(0.95, 1.05).expect("valid jitter range");
    let angle_dist = Uniform::new(0.0, 2.0 * PI).expect("valid angle range");

    let mut cell_counts = vec![0u32; width * height];
    let mut agents = Vec::with_capacity(n);

    for _ in 0..n {
        let mut sampled = None;
        for _ in 0..RING_RESAMPLE_ATTEMPTS {
            let angle: f64 = angle_dist.sample(&mut rng);
            let radius = base_radius * jitter.sample(&mut rng);
            let x = (center_x + radius * angle.cos()).clamp(EPSILON, width as f64 - EPSILON);
            let y = (center_y + radius * angle.sin()).clamp(EPSILON, height as f64 - EPSILON);
            let row = y.floor() as usize;
            let col = x.floor() as usize;
            if cell_counts[row * width + col] < MAX_PER_CELL {
                sampled = Some((x, y, row, col));
                break;
            }
        }

        let (x, y, row, col) = sampled.unwrap_or_else(|| {
            let (row, col) = first_open_interior_cell(&cell_counts, width, height)
                .expect("capacity check above guarantees an open cell exists");
            (col as f64 + 0.5, row as f64 + 0.5, row, col)
        });

        cell_counts[row * width + col] += 1;
        let direction = rng.random_range(0.0..2.0 * PI);
        agents.push(Agent::new(x, y, direction));
    }

    Ok(agents)
}

/// Row-major scan of the interior for the first cell under `MAX_PER_CELL`, used as the
/// deterministic fallback once resampling a ring point keeps losing the draw.
fn first_open_interior_cell(cell_counts: &[u32], width: usize, height: usize) -> Option<(usize, usize)> {
    (1..height.saturating_sub(1)).find_map(|row| {
        (1..width.saturating_sub(1)).find(|&col| cell_counts[row * width + col] < MAX_PER_CELL)
            .map(|col| (row, col))
    })
}

/// Checks the coordinate invariant from SS3: strictly within the open interior of `grid`.
pub fn in_bounds(x: f64, y: f64, grid: &TrailGrid) -> bool {
    x > EPSILON
        && x < grid.width() as f64 - EPSILON
        && y > EPSILON
        && y < grid.height() as f64 - EPSILON
}
