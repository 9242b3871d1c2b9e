//! # Step Orchestrator
//!
//! `simulate_step` runs one micro-step in the fixed phase order the rest of this crate depends on:
//! diffuse, evaporate, sense+turn, shuffle, move+deposit (SS4.6). Each phase is a rayon fork-join
//! region; phase boundaries are the only synchronization points.

use crate::agent::Agent;
use crate::behavior::BehaviorParams;
use crate::grid::{FoodGrid, TrailGrid};
use crate::movement::{move_and_deposit, shuffle_agents};
use crate::occupancy::OccupancyGrid;
use crate::rng::{Xorshift64, WorkerRngPool};
use crate::sensing::sense_and_turn;

/// Advances `agents`/`grid`/`occupancy` by one micro-step under `behavior`. `food` is optional
/// (None is treated as an all-zero field). `shuffle_rng` drives the single-thread shuffle that
/// precedes the movement phase; `seeds` drives every worker-parallel phase.
pub fn simulate_step(
    grid: &mut TrailGrid,
    agents: &mut [Agent],
    occupancy: &OccupancyGrid,
    food: Option<&FoodGrid>,
    behavior: &BehaviorParams,
    seeds: &WorkerRngPool,
    shuffle_rng: &mut Xorshift64,
) {
    grid.disperse(behavior.dispersion_rate);
    grid.evaporate(behavior.evaporation_rate_exp, behavior.evaporation_rate_lin);
    sense_and_turn(agents, grid, food, behavior, seeds);
    shuffle_agents(agents, shuffle_rng);
    move_and_deposit(agents, grid, occupancy, behavior, seeds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::initialize_ring;

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
    fn a_step_keeps_agents_in_the_interior_and_occupancy_consistent() {
        let width = 40;
        let height = 40;
        let mut grid = TrailGrid::new(width, height);
        let occupancy = OccupancyGrid::new(width, height);
        let mut agents = initialize_ring(100, width, height).unwrap();
        for agent in &agents {
            let (row, col) = agent.cell();
            occupancy.try_enter(row, col);
        }
        let seeds = WorkerRngPool::new(4);
        let mut shuffle_rng = Xorshift64::from_seed(123);

        for _ in 0..5 {
            simulate_step(
                &mut grid,
                &mut agents,
                &occupancy,
                None,
                &behavior(),
                &seeds,
                &mut shuffle_rng,
            );
        }

        for agent in &agents {
            assert!(crate::agent::in_bounds(agent.x, agent.y, &grid));
        }
        assert_eq!(occupancy.total(), agents.len() as u64);
    }

    #[test]
    fn zero_behavior_step_leaves_agents_stationary() {
        let width = 20;
        let height = 20;
        let mut grid = TrailGrid::new(width, height);
        let occupancy = OccupancyGrid::new(width, height);
        let mut agents = vec![Agent::new(10.0, 10.0, 0.3)];
        occupancy.try_enter(10, 10);
        let mut zero = behavior();
        zero.movement_speed = 0.0;
        zero.movement_noise = 0.0;
        zero.turn_rate = 0.0;
        zero.dispersion_rate = 0.0;
        zero.evaporation_rate_exp = 0.0;
        zero.evaporation_rate_lin = 0.0;
        zero.trail_deposit_rate = 0.0;
        let seeds = WorkerRngPool::new(1);
        let mut shuffle_rng = Xorshift64::from_seed(1);

        simulate_step(
            &mut grid,
            &mut agents,
            &occupancy,
            None,
            &zero,
            &seeds,
            &mut shuffle_rng,
        );

        assert_eq!(agents[0].x, 10.0);
        assert_eq!(agents[0].y, 10.0);
    }
}
