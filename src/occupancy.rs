//! # Occupancy Counter
//!
//! A width x height integer field counting how many agents currently occupy each cell. Maintained
//! incrementally through the movement phase's compare-and-swap updates (SS9 open question 4: the
//! incremental form is authoritative here, since it is what supports the `MAX_PER_CELL` admission
//! test inside the move phase itself, rather than a post-hoc scan).

use std::sync::atomic::{AtomicU32, Ordering};

/// Default admission cap used by the movement phase to throttle crowding.
pub const MAX_PER_CELL: u32 = 2;

pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<AtomicU32>,
    cap: u32,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_cap(width, height, MAX_PER_CELL)
    }

    pub fn with_cap(width: usize, height: usize, cap: u32) -> Self {
        let cells = (0..width * height).map(|_| AtomicU32::new(0)).collect();
        OccupancyGrid {
            width,
            height,
            cells,
            cap,
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[self.index(row, col)].load(Ordering::Relaxed)
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Attempts to admit one more agent into `(row, col)`. Returns `true` and increments on
    /// success, `false` (no mutation) if the cell is already at capacity. Implemented as a CAS
    /// retry loop so the admission check and the increment are atomic with respect to racing
    /// movers targeting the same cell.
    pub fn try_enter(&self, row: usize, col: usize) -> bool {
        let cell = &self.cells[self.index(row, col)];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            if current >= self.cap {
                return false;
            }
            match cell.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Removes one agent from `(row, col)`. Saturates at zero rather than underflowing, which
    /// would only happen if a caller double-counted a departure.
    pub fn leave(&self, row: usize, col: usize) {
        let cell = &self.cells[self.index(row, col)];
        let mut current = cell.load(Ordering::Relaxed);
        while current > 0 {
            match cell.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Sum over all cells, used by tests asserting the occupancy invariant (sum == nagents).
    pub fn total(&self) -> u64 {
        self.cells
            .iter()
            .map(|c| c.load(Ordering::Relaxed) as u64)
            .sum()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
