//! # Grid (Trail Map) and Food Map
//!
//! The trail map is a double-buffered, row-major, 2-D scalar field. "Double-buffered" here means
//! the diffusion kernel always allocates a fresh buffer, fills it, and the grid adopts it via a
//! cheap [`std::mem::swap`] that drops the prior buffer - never a read-modify-write against the
//! buffer currently being read by other cells' stencils.
//!
//! Cells are stored as [`AtomicU64`] holding a bit-reinterpreted `f64` so the same storage backs
//! both the diffusion/evaporation passes (plain loads/stores - each cell touched by exactly one
//! worker per phase) and the deposit path (compare-and-swap against concurrent depositors).

use std::sync::atomic::{AtomicU64, Ordering};

/// Double-buffered trail map. See module docs.
pub struct TrailGrid {
    width: usize,
    height: usize,
    cells: Vec<AtomicU64>,
}

impl TrailGrid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width >= 3 && height >= 3, "grid must have an interior");
        let cells = (0..width * height).map(|_| AtomicU64::new(0)).collect();
        TrailGrid {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[self.index(row, col)].load(Ordering::Relaxed))
    }

    /// Plain (non-atomic-contention) store, used by phases where each cell is touched by exactly
    /// one worker: diffusion's fresh-buffer fill and in-place evaporation.
    #[inline]
    pub fn set(&self, row: usize, col: usize, value: f64) {
        self.cells[self.index(row, col)].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Atomically applies `deposit`, clamped to `cap`, via a compare-and-swap retry loop. Used by
    /// concurrent depositors during the movement phase.
    pub fn deposit_clamped(&self, row: usize, col: usize, amount: f64, cap: f64) {
        let cell = &self.cells[self.index(row, col)];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            let current_value = f64::from_bits(current);
            let next_value = (current_value + amount).min(cap);
            match cell.compare_exchange_weak(
                current,
                next_value.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Runs the FTCS diffusion stencil with Dirichlet-zero boundaries, producing a freshly
    /// allocated buffer, filling it in parallel over rows, and adopting it in place of the
    /// current buffer (the prior buffer is dropped). See SS4.2.
    pub fn disperse(&mut self, dispersion_rate: f64) {
        use rayon::prelude::*;

        let width = self.width;
        let height = self.height;
        let mut next: Vec<AtomicU64> = (0..width * height).map(|_| AtomicU64::new(0)).collect();

        next.par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, next_row)| {
                if row == 0 || row == height - 1 {
                    // Dirichlet boundary: entire row is zero (already initialized to 0).
                    return;
                }
                for (col, cell) in next_row.iter_mut().enumerate() {
                    if col == 0 || col == width - 1 {
                        continue; // boundary column, already zero
                    }
                    let center = self.get(row, col);
                    let left = self.get(row, col - 1);
                    let right = self.get(row, col + 1);
                    let up = self.get(row - 1, col);
                    let down = self.get(row + 1, col);
                    let value = dispersion_rate * (left + right + up + down)
                        + (1.0 - 4.0 * dispersion_rate) * center;
                    cell.store(value.to_bits(), Ordering::Relaxed);
                }
            });

        self.cells = next;
    }

    /// `grid[i] <- max(0, grid[i] * (1 - rate_exp) - rate_lin)` in parallel over all cells.
    pub fn evaporate(&self, rate_exp: f64, rate_lin: f64) {
        use rayon::prelude::*;

        self.cells.par_iter().for_each(|cell| {
            let value = f64::from_bits(cell.load(Ordering::Relaxed));
            let decayed = (value * (1.0 - rate_exp) - rate_lin).max(0.0);
            cell.store(decayed.to_bits(), Ordering::Relaxed);
        });
    }

    /// Total trail mass, used by tests asserting conservation/decay properties.
    pub fn total_mass(&self) -> f64 {
        self.cells
            .iter()
            .map(|c| f64::from_bits(c.load(Ordering::Relaxed)))
            .sum()
    }

    pub fn is_boundary(&self, row: usize, col: usize) -> bool {
        row == 0 || row == self.height - 1 || col == 0 || col == self.width - 1
    }
}

/// Static, read-only second scalar field contributing additively to attraction. A missing food
/// map is treated as a constant-zero field so sensing has a single code path (SS9).
pub struct FoodGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl FoodGrid {
    pub fn new(width: usize, height: usize) -> Self {
        FoodGrid {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<f64>) -> Self {
        assert_eq!(cells.len(), width * height);
        FoodGrid {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.width + col]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
