//! # Run Configuration
//!
//! `RunConfig` aggregates everything a run needs: grid shape, timing, the behavior parameters, and
//! the output path. It can be loaded from an optional TOML file and is always overridable
//! field-by-field by explicit CLI flags, with the CLI winning (SS3/SS6).

use crate::behavior::BehaviorParams;
use crate::errors::RunError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
    pub resolution_factor: u32,
    pub seconds: f64,
    pub nagents: usize,
    pub behavior: BehaviorParams,
    pub output_file: String,
}

impl RunConfig {
    /// Reads and parses a TOML file at `path` into a partial overlay (see [`PartialRunConfig`]).
    pub fn load_overlay(path: &Path) -> Result<PartialRunConfig, RunError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| RunError::Config(format!("{}: {e}", path.display())))
    }

    /// Applies `overlay` on top of `self`, field by field, wherever the overlay provided a value.
    /// Used to layer a TOML config file *under* CLI defaults: call this first with the file
    /// overlay, then apply explicit CLI flags on top of the result.
    pub fn merge(mut self, overlay: PartialRunConfig) -> Self {
        if let Some(v) = overlay.width {
            self.width = v;
        }
        if let Some(v) = overlay.height {
            self.height = v;
        }
        if let Some(v) = overlay.fps {
            self.fps = v;
        }
        if let Some(v) = overlay.resolution_factor {
            self.resolution_factor = v;
        }
        if let Some(v) = overlay.seconds {
            self.seconds = v;
        }
        if let Some(v) = overlay.nagents {
            self.nagents = v;
        }
        if let Some(v) = overlay.output_file {
            self.output_file = v;
        }
        self.behavior = overlay.behavior.apply_to(self.behavior);
        self
    }

    pub fn frames(&self) -> u64 {
        (self.seconds * self.fps).round() as u64
    }
}

impl Default for RunConfig {
    /// Baseline a run starts from before a `--config` overlay and then the CLI's own overlay are
    /// merged on top, in that order.
    fn default() -> Self {
        RunConfig {
            width: 200,
            height: 200,
            fps: 30.0,
            resolution_factor: 4,
            seconds: 10.0,
            nagents: 2000,
            behavior: BehaviorParams {
                movement_speed: 1.0,
                trail_deposit_rate: 5.0,
                movement_noise: 0.1,
                turn_rate: 0.2,
                sensor_length: 3.0,
                sensor_angle_factor: 1.0,
                dispersion_rate: 0.1,
                evaporation_rate_exp: 0.05,
                evaporation_rate_lin: 0.01,
                trail_max: DEFAULT_TRAIL_MAX,
            },
            output_file: "slime.hevc".to_string(),
        }
    }
}

/// Every field optional: exactly what a TOML config file is allowed to supply, so a config file
/// only needs to mention the fields it wants to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRunConfig {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub fps: Option<f64>,
    pub resolution_factor: Option<u32>,
    pub seconds: Option<f64>,
    pub nagents: Option<usize>,
    #[serde(default)]
    pub behavior: PartialBehaviorParams,
    pub output_file: Option<String>,
}

/// Field-by-field optional overlay for [`BehaviorParams`], so a CLI invocation that only supplies
/// `movement_speed` doesn't clobber the other nine behavior fields a config file provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialBehaviorParams {
    pub movement_speed: Option<f64>,
    pub trail_deposit_rate: Option<f64>,
    pub movement_noise: Option<f64>,
    pub turn_rate: Option<f64>,
    pub sensor_length: Option<f64>,
    pub sensor_angle_factor: Option<f64>,
    pub dispersion_rate: Option<f64>,
    pub evaporation_rate_exp: Option<f64>,
    pub evaporation_rate_lin: Option<f64>,
    pub trail_max: Option<f64>,
}

impl PartialBehaviorParams {
    fn apply_to(self, mut base: BehaviorParams) -> BehaviorParams {
        if let Some(v) = self.movement_speed {
            base.movement_speed = v;
        }
        if let Some(v) = self.trail_deposit_rate {
            base.trail_deposit_rate = v;
        }
        if let Some(v) = self.movement_noise {
            base.movement_noise = v;
        }
        if let Some(v) = self.turn_rate {
            base.turn_rate = v;
        }
        if let Some(v) = self.sensor_length {
            base.sensor_length = v;
        }
        if let Some(v) = self.sensor_angle_factor {
            base.sensor_angle_factor = v;
        }
        if let Some(v) = self.dispersion_rate {
            base.dispersion_rate = v;
        }
        if let Some(v) = self.evaporation_rate_exp {
            base.evaporation_rate_exp = v;
        }
        if let Some(v) = self.evaporation_rate_lin {
            base.evaporation_rate_lin = v;
        }
        if let Some(v) = self.trail_max {
            base.trail_max = v;
        }
        base
    }
}

/// Default value for `trail_max` when neither a config file nor (there is no CLI flag for it)
/// supplies one.
pub const DEFAULT_TRAIL_MAX: f64 = 1.0e6;
