//! # Engine
//!
//! Owns grid, agent population, occupancy, normalized behavior and worker RNG pool across many
//! frames; `run()` drives `resolution_factor` micro-steps per frame and streams a [`FrameSnapshot`]
//! through an `mpsc::Sender` every `frame_interval` frames, matching the reference driver's
//! producer-consumer shape (SS4.6/SS9).

use crate::agent::{initialize_ring, Agent};
use crate::behavior::BehaviorParams;
use crate::errors::SimError;
use crate::grid::{FoodGrid, TrailGrid};
use crate::occupancy::OccupancyGrid;
use crate::orchestrator::simulate_step;
use crate::rng::{Xorshift64, WorkerRngPool};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Immutable run configuration for the engine: grid shape, timing and sub-step resolution.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
    pub resolution_factor: u32,
    pub frames: u64,
    pub nagents: usize,
}

/// One rendered frame's worth of state, sent to the render/encode side.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub timestamp: f64,
    pub grid_snapshot: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

pub struct Engine {
    grid: TrailGrid,
    food: Option<FoodGrid>,
    agents: Vec<Agent>,
    occupancy: OccupancyGrid,
    behavior: BehaviorParams,
    seeds: WorkerRngPool,
    shuffle_rng: Xorshift64,
    params: EngineParams,
    frame_count: u64,
    frame_sender: Option<mpsc::Sender<FrameSnapshot>>,
    frame_interval: u64,
    should_stop: Arc<AtomicBool>,
}

impl Engine {
    /// Builds a fresh engine: allocates the grid/occupancy, seeds agents on the default ring,
    /// validates and normalizes `raw_behavior` by `(resolution_factor, fps)`.
    pub fn new(
        params: EngineParams,
        raw_behavior: BehaviorParams,
        food: Option<FoodGrid>,
        tx: mpsc::Sender<FrameSnapshot>,
        frame_interval: u64,
    ) -> Result<Self, SimError> {
        if params.width < 3 || params.height < 3 {
            return Err(SimError::Allocation {
                what: "trail grid",
                width: params.width,
                height: params.height,
            });
        }
        raw_behavior.validate()?;
        let behavior = crate::behavior::normalize_behavior(
            &raw_behavior,
            params.resolution_factor as f64,
            params.fps,
        );

        let grid = TrailGrid::new(params.width, params.height);
        let occupancy = OccupancyGrid::new(params.width, params.height);
        let agents = initialize_ring(params.nagents, params.width, params.height)?;
        for agent in &agents {
            let (row, col) = agent.cell();
            occupancy.try_enter(row, col);
        }

        let num_workers = rayon::current_num_threads();
        let seeds = WorkerRngPool::new(num_workers);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1);

        info!(
            "engine initialized: {}x{} grid, {} agents, {} workers",
            params.width, params.height, params.nagents, num_workers
        );

        Ok(Engine {
            grid,
            food,
            agents,
            occupancy,
            behavior,
            seeds,
            shuffle_rng: Xorshift64::from_seed(seed),
            params,
            frame_count: 0,
            frame_sender: Some(tx),
            frame_interval,
            should_stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The behavior actually driving the simulation, normalized by `(resolution_factor, fps)`.
    /// Callers that need `trail_max` to scale a render (colorize range, etc.) must read it from
    /// here rather than from the raw config - the grid's deposits are clamped against this value,
    /// not the pre-normalization one.
    pub fn behavior(&self) -> &BehaviorParams {
        &self.behavior
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.should_stop)
    }

    pub fn stop(&self) {
        self.should_stop.store(true, Ordering::Relaxed);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Runs until `params.frames` frames have been rendered or [`Engine::stop`] has been called.
    /// Each frame advances `resolution_factor` micro-steps, then (every `frame_interval` frames)
    /// sends a snapshot.
    pub fn run(&mut self) {
        for _ in 0..self.params.frames {
            if self.should_stop.load(Ordering::Relaxed) {
                break;
            }
            self.render_frame();
        }
    }

    fn render_frame(&mut self) {
        for _ in 0..self.params.resolution_factor {
            simulate_step(
                &mut self.grid,
                &mut self.agents,
                &self.occupancy,
                self.food.as_ref(),
                &self.behavior,
                &self.seeds,
                &mut self.shuffle_rng,
            );
        }
        self.frame_count += 1;

        if self.frame_count % self.frame_interval.max(1) == 0 {
            self.send_frame();
        }
        debug!("frame {} complete", self.frame_count);
    }

    fn send_frame(&self) {
        if let Some(ref sender) = self.frame_sender {
            let grid_snapshot = (0..self.params.height)
                .flat_map(|row| (0..self.params.width).map(move |col| (row, col)))
                .map(|(row, col)| self.grid.get(row, col))
                .collect();

            let frame = FrameSnapshot {
                frame: self.frame_count,
                timestamp: self.frame_count as f64 / self.params.fps,
                grid_snapshot,
                width: self.params.width,
                height: self.params.height,
            };

            if sender.send(frame).is_err() {
                debug!("frame receiver dropped; continuing without streaming");
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behavior() -> BehaviorParams {
        BehaviorParams {
            movement_speed: 0.5,
            trail_deposit_rate: 2.0,
            movement_noise: 0.05,
            turn_rate: 0.1,
            sensor_length: 2.0,
            sensor_angle_factor: 1.0,
            dispersion_rate: 0.1,
            evaporation_rate_exp: 0.02,
            evaporation_rate_lin: 0.0,
            trail_max: 200.0,
        }
    }

    #[test]
    fn run_streams_a_snapshot_per_frame_interval() {
        let params = EngineParams {
            width: 30,
            height: 30,
            fps: 30.0,
            resolution_factor: 2,
            frames: 6,
            nagents: 50,
        };
        let (tx, rx) = mpsc::channel();
        let mut engine = Engine::new(params, behavior(), None, tx, 2).unwrap();
        engine.run();
        drop(engine);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received.len(), 3); // frames 2, 4, 6
    }

    #[test]
    fn stop_flag_halts_the_run_loop_early() {
        let params = EngineParams {
            width: 20,
            height: 20,
            fps: 30.0,
            resolution_factor: 1,
            frames: 1000,
            nagents: 20,
        };
        let (tx, _rx) = mpsc::channel();
        let mut engine = Engine::new(params, behavior(), None, tx, 1).unwrap();
        let stop = engine.stop_flag();
        stop.store(true, Ordering::Relaxed);
        engine.run();
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn rejects_degenerate_grid_dimensions() {
        let params = EngineParams {
            width: 1,
            height: 1,
            fps: 30.0,
            resolution_factor: 1,
            frames: 1,
            nagents: 1,
        };
        let (tx, _rx) = mpsc::channel();
        assert!(Engine::new(params, behavior(), None, tx, 1).is_err());
    }
}
