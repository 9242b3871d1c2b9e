//! # Behavior Parameters & Normalization
//!
//! `BehaviorParams` is the user-facing configuration; `normalize_behavior` rescales it by a
//! spatial `factor` (the sub-cell resolution multiplier, i.e. micro-steps per rendered frame) and
//! `fps` so the physics is invariant to those choices under the convention dx = 1, dt = 1 (SS4.1).

use crate::errors::SimError;
use log::warn;
use serde::{Deserialize, Serialize};

/// FTCS stability bound: `dispersion_rate <= 1/4` is required for the explicit heat-equation
/// stencil to not blow up.
pub const CFL_LIMIT: f64 = 0.25;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorParams {
    pub movement_speed: f64,
    pub trail_deposit_rate: f64,
    pub movement_noise: f64,
    pub turn_rate: f64,
    pub sensor_length: f64,
    pub sensor_angle_factor: f64,
    pub dispersion_rate: f64,
    pub evaporation_rate_exp: f64,
    pub evaporation_rate_lin: f64,
    pub trail_max: f64,
}

impl BehaviorParams {
    /// Rejects parameters that are structurally invalid (negative where only non-negative values
    /// are meaningful, or `evaporation_rate_exp` outside `[0, 1]`). This is a precondition check,
    /// separate from the non-fatal CFL warning `normalize_behavior` logs.
    pub fn validate(&self) -> Result<(), SimError> {
        let checks: &[(&'static str, f64, bool)] = &[
            ("movement_speed", self.movement_speed, self.movement_speed >= 0.0),
            (
                "trail_deposit_rate",
                self.trail_deposit_rate,
                self.trail_deposit_rate >= 0.0,
            ),
            ("movement_noise", self.movement_noise, self.movement_noise >= 0.0),
            ("turn_rate", self.turn_rate, self.turn_rate >= 0.0),
            ("sensor_length", self.sensor_length, self.sensor_length >= 0.0),
            (
                "sensor_angle_factor",
                self.sensor_angle_factor,
                self.sensor_angle_factor >= 0.0,
            ),
            (
                "dispersion_rate",
                self.dispersion_rate,
                self.dispersion_rate >= 0.0,
            ),
            (
                "evaporation_rate_exp",
                self.evaporation_rate_exp,
                (0.0..=1.0).contains(&self.evaporation_rate_exp),
            ),
            (
                "evaporation_rate_lin",
                self.evaporation_rate_lin,
                self.evaporation_rate_lin >= 0.0,
            ),
            ("trail_max", self.trail_max, self.trail_max >= 0.0),
        ];

        for (field, value, ok) in checks {
            if !ok {
                return Err(SimError::Validation {
                    field,
                    reason: format!("got {value}, which is out of the accepted range"),
                });
            }
        }
        Ok(())
    }
}

/// Rescales `behavior` by spatial `factor` and `fps` so physical behavior is invariant under
/// changes of grid resolution and frame rate (SS4.1). Pure function: `normalize_behavior(b, 1, 1)
/// == b` (S5/S6 identity).
pub fn normalize_behavior(behavior: &BehaviorParams, factor: f64, fps: f64) -> BehaviorParams {
    let normalized = BehaviorParams {
        movement_speed: behavior.movement_speed / fps,
        trail_deposit_rate: behavior.trail_deposit_rate * factor / fps,
        movement_noise: behavior.movement_noise / (factor * fps).sqrt(),
        turn_rate: behavior.turn_rate / (factor * fps),
        sensor_length: behavior.sensor_length,
        sensor_angle_factor: behavior.sensor_angle_factor,
        dispersion_rate: behavior.dispersion_rate * factor / fps,
        evaporation_rate_exp: behavior.evaporation_rate_exp / (factor * fps),
        evaporation_rate_lin: behavior.evaporation_rate_lin / (factor * fps),
        trail_max: behavior.trail_max * factor * factor,
    };

    if normalized.dispersion_rate > CFL_LIMIT {
        warn!(
            "normalized dispersion_rate {:.4} exceeds the FTCS stability limit of {CFL_LIMIT}; \
             the diffusion kernel may become unstable",
            normalized.dispersion_rate
        );
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BehaviorParams {
        BehaviorParams {
            movement_speed: 1.5,
            trail_deposit_rate: 2.0,
            movement_noise: 0.1,
            turn_rate: 0.2,
            sensor_length: 3.0,
            sensor_angle_factor: 1.5,
            dispersion_rate: 0.1,
            evaporation_rate_exp: 0.05,
            evaporation_rate_lin: 0.01,
            trail_max: 500.0,
        }
    }

    #[test]
    fn normalize_is_identity_at_unit_scale() {
        let b = sample();
        let normalized = normalize_behavior(&b, 1.0, 1.0);
        assert_eq!(normalized, b);
    }

    #[test]
    fn normalize_scales_trail_max_quadratically() {
        let b = sample();
        let normalized = normalize_behavior(&b, 2.0, 1.0);
        assert!((normalized.trail_max - b.trail_max * 4.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_divides_movement_speed_by_fps() {
        let b = sample();
        let normalized = normalize_behavior(&b, 1.0, 30.0);
        assert!((normalized.movement_speed - b.movement_speed / 30.0).abs() < 1e-9);
    }

    #[test]
    fn cfl_warning_does_not_prevent_normalization() {
        let mut b = sample();
        b.dispersion_rate = 0.5;
        let normalized = normalize_behavior(&b, 1.0, 1.0);
        assert_eq!(normalized.dispersion_rate, 0.5);
    }

    #[test]
    fn validate_rejects_negative_speed() {
        let mut b = sample();
        b.movement_speed = -1.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn validate_rejects_evaporation_exp_above_one() {
        let mut b = sample();
        b.evaporation_rate_exp = 1.5;
        assert!(b.validate().is_err());
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }
}
