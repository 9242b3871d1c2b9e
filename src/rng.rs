//! # RNG & Shuffle Utility
//!
//! Per-worker seeded pseudo-random draws and an in-place Fisher-Yates shuffle.
//!
//! The simulation's hot loops (sensing, movement) run on a rayon fork-join pool. Sharing a single
//! RNG across threads would serialize them behind a lock and, worse, make the sequence of draws
//! depend on scheduling order. Instead every worker gets its own seed, stored in a flat
//! `Vec<AtomicU64>` indexed by rayon's thread index: a worker reads its seed into a stack-local
//! generator, advances it as many times as it needs during the phase, then writes the advanced
//! seed back. No two workers ever touch the same slot, so the reads/writes need no synchronization
//! beyond `Ordering::Relaxed`.
//!
//! The generator itself is a small xorshift64* - intentionally not `rand::rngs::SmallRng`, because
//! the spec's "copy seed to local, use it, write it back" contract needs a generator whose entire
//! state is a single `u64` that can be round-tripped through the seed array.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// xorshift64* generator. Not cryptographically secure; fast, well-mixed, and its whole state is
/// one `u64`, which is exactly what the per-worker seed array needs to store.
#[derive(Debug, Clone, Copy)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub fn from_seed(seed: u64) -> Self {
        // xorshift64* is undefined at state 0; perturb away from it.
        Xorshift64 {
            state: if seed == 0 { 0x9E3779B97F4A7C15 } else { seed },
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform double in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // Top 53 bits give a uniform mantissa.
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform double in `[min, max)`.
    #[inline]
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform integer in `[0, bound)`.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    pub fn seed(&self) -> u64 {
        self.state
    }
}

/// A pool of per-worker RNG seeds, one slot per rayon worker thread.
///
/// Seeded at startup from wall-clock time XOR `(thread index + 1)`, matching the reference
/// simulation's thread-seeding convention. A worker calls [`WorkerRngPool::with_rng`] at phase
/// entry; the closure receives a `&mut Xorshift64` restored from that worker's slot, and the
/// advanced state is written back when the closure returns.
pub struct WorkerRngPool {
    seeds: Vec<AtomicU64>,
}

impl WorkerRngPool {
    pub fn new(num_workers: usize) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let seeds = (0..num_workers.max(1))
            .map(|idx| AtomicU64::new(now ^ (idx as u64 + 1)))
            .collect();
        WorkerRngPool { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Runs `f` with a worker-local generator restored from slot `worker_idx % len()`, writing the
    /// advanced seed back afterward. `worker_idx` is typically `rayon::current_thread_index()`.
    pub fn with_rng<R>(&self, worker_idx: usize, f: impl FnOnce(&mut Xorshift64) -> R) -> R {
        let slot = &self.seeds[worker_idx % self.seeds.len()];
        let mut rng = Xorshift64::from_seed(slot.load(Ordering::Relaxed));
        let result = f(&mut rng);
        slot.store(rng.seed(), Ordering::Relaxed);
        result
    }
}

/// Resolves a rayon index for the *current* thread, falling back to 0 outside a pool.
#[inline]
pub fn current_worker_index() -> usize {
    rayon::current_thread_index().unwrap_or(0)
}

/// Fisher-Yates shuffle driven by a single-thread generator. Run once, serially, before the
/// parallel movement phase so tied contenders for a cell have no systematic priority order.
pub fn shuffle<T>(items: &mut [T], rng: &mut Xorshift64) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_is_deterministic_given_a_seed() {
        let mut a = Xorshift64::from_seed(42);
        let mut b = Xorshift64::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn xorshift_handles_zero_seed() {
        let mut rng = Xorshift64::from_seed(0);
        // Should not get stuck at zero.
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn range_f64_stays_within_bounds() {
        let mut rng = Xorshift64::from_seed(12345);
        for _ in 0..1000 {
            let v = rng.range_f64(-2.0, 5.0);
            assert!(v >= -2.0 && v < 5.0);
        }
    }

    #[test]
    fn worker_pool_round_trips_state_across_calls() {
        let pool = WorkerRngPool::new(4);
        let first = pool.with_rng(0, |rng| rng.next_u64());
        // Calling again on the same slot must not repeat: the seed was advanced and written back.
        let second = pool.with_rng(0, |rng| rng.next_u64());
        assert_ne!(first, second);
    }

    #[test]
    fn worker_pool_slots_are_independent() {
        let pool = WorkerRngPool::new(2);
        let a = pool.with_rng(0, |rng| rng.next_u64());
        let b = pool.with_rng(1, |rng| rng.next_u64());
        // Extremely unlikely to collide with independent seeds; guards against aliasing bugs.
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut rng = Xorshift64::from_seed(7);
        let mut items: Vec<i32> = (0..50).collect();
        let original = items.clone();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }
}
