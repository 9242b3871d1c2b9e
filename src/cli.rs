//! # CLI
//!
//! Command-line surface: one positional run of grid/timing/behavior parameters plus an optional
//! `--config` pointing at a TOML file supplying defaults. Every positional argument is optional so
//! a config file can supply it instead; whatever the CLI *does* specify always wins over the config
//! file (SS6). `trail_max` has no positional flag (it isn't part of the documented surface); it can
//! only be set via `--config`.

use crate::config::{PartialBehaviorParams, PartialRunConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Physarum-style slime-mold colony simulator", long_about = None)]
pub struct Cli {
    /// Grid width in cells
    pub width: Option<usize>,
    /// Grid height in cells
    pub height: Option<usize>,
    /// Rendered frames per second
    pub fps: Option<f64>,
    /// Micro-steps simulated per rendered frame
    pub resolution_factor: Option<u32>,
    /// Length of the run, in seconds
    pub seconds: Option<f64>,
    /// Number of agents
    pub nagents: Option<usize>,
    /// Cells advanced per micro-step
    pub movement_speed: Option<f64>,
    /// Trail added to the landing cell per deposit
    pub trail_deposit_rate: Option<f64>,
    /// Angular jitter half-width
    pub movement_noise: Option<f64>,
    /// Maximum per-step heading change
    pub turn_rate: Option<f64>,
    /// Sensor distance ahead of the agent, in cells
    pub sensor_length: Option<f64>,
    /// Multiplier of turn_rate giving the sensor half-angle
    pub sensor_angle_factor: Option<f64>,
    /// Diffusion coefficient; must be <= 0.25 for FTCS stability
    pub dispersion_rate: Option<f64>,
    /// Per-step exponential trail decay, in [0, 1]
    pub evaporation_rate_exp: Option<f64>,
    /// Per-step linear trail decay
    pub evaporation_rate_lin: Option<f64>,
    /// Output video file path
    pub output_file: Option<String>,

    /// Optional TOML config file supplying defaults for any of the above, plus trail_max
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Packs whichever positional fields were actually given into an overlay, ready to be merged
    /// on top of a config-file overlay so the CLI always wins per-field.
    pub fn to_overlay(&self) -> PartialRunConfig {
        PartialRunConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            resolution_factor: self.resolution_factor,
            seconds: self.seconds,
            nagents: self.nagents,
            behavior: PartialBehaviorParams {
                movement_speed: self.movement_speed,
                trail_deposit_rate: self.trail_deposit_rate,
                movement_noise: self.movement_noise,
                turn_rate: self.turn_rate,
                sensor_length: self.sensor_length,
                sensor_angle_factor: self.sensor_angle_factor,
                dispersion_rate: self.dispersion_rate,
                evaporation_rate_exp: self.evaporation_rate_exp,
                evaporation_rate_lin: self.evaporation_rate_lin,
                trail_max: None,
            },
            output_file: self.output_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_well_formed() {
        Cli::command().debug_assert();
    }
}
