//! First-order thermal plant.
//!
//! ```text
//!  heat_gain       = (ambient − T) · ambient_coupling
//!  actuator_effect = u · max_actuator_rate          u ∈ [−1, 1]
//!  T'              = T + (heat_gain + actuator_effect) · thermal_mass · dt
//! ```
//!
//! The result is clamped to the configured range.  A non-finite result
//! (pathological constants or inputs) holds the previous temperature.
//!
//! With [`ActuatorScaling::NearTarget`] the actuator term is scaled down
//! as the error shrinks, and neutral ticks do not actuate at all.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PlantConfig;
use crate::error::ConfigError;

/// When passive drift toward ambient is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftPolicy {
    /// Every tick, alongside the actuator.
    #[default]
    AlwaysOn,
    /// Only once the room is stable (`|error| < stable_band`) and the
    /// controller has been neutral for at least `neutral_ticks` ticks.
    Gated { stable_band: f64, neutral_ticks: u32 },
}

/// One damping band: `|error| < within` scales the actuator by `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBand {
    pub within: f64,
    pub scale: f64,
}

/// How the actuator term responds to the distance from the target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorScaling {
    /// Full `u · max_actuator_rate` on every tick.
    #[default]
    Linear,
    /// The first band (in declaration order) containing `|error|` scales
    /// the actuator; outside every band it runs at full rate.  Neutral
    /// ticks skip actuation.
    NearTarget { bands: Vec<ScaleBand> },
}

impl ActuatorScaling {
    /// Damping used by the lab thermostat: ×0.6 within 2 °C, ×0.8 within 5 °C.
    pub fn near_target_default() -> Self {
        Self::NearTarget {
            bands: vec![
                ScaleBand {
                    within: 2.0,
                    scale: 0.6,
                },
                ScaleBand {
                    within: 5.0,
                    scale: 0.8,
                },
            ],
        }
    }

    fn factor(&self, error: f64, neutral: bool) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::NearTarget { .. } if neutral => 0.0,
            Self::NearTarget { bands } => bands
                .iter()
                .find(|b| error.abs() < b.within)
                .map_or(1.0, |b| b.scale),
        }
    }
}

/// Inputs for one plant step.
#[derive(Debug, Clone, Copy)]
pub struct PlantInput {
    pub temperature: f64,
    pub control_output: f64,
    pub ambient_temperature: f64,
    pub dt: f64,
    /// Current control error, consulted by the gated policy.
    pub error: f64,
    /// Consecutive neutral ticks including this one.
    pub neutral_ticks: u32,
}

/// Result of one plant step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantStep {
    pub temperature: f64,
    pub drift_applied: bool,
}

/// Stateless plant model.
#[derive(Debug, Clone)]
pub struct PlantModel {
    thermal_mass: f64,
    ambient_coupling: f64,
    max_actuator_rate: f64,
    min_temperature: f64,
    max_temperature: f64,
    drift: DriftPolicy,
    actuator: ActuatorScaling,
}

impl PlantModel {
    pub fn from_config(config: &PlantConfig) -> Result<Self, ConfigError> {
        if !(config.thermal_mass.is_finite() && config.thermal_mass > 0.0) {
            return Err(ConfigError::InvalidParameter("thermal_mass must be > 0"));
        }
        if !(config.ambient_coupling.is_finite() && config.ambient_coupling >= 0.0) {
            return Err(ConfigError::InvalidParameter("ambient_coupling must be >= 0"));
        }
        if !(config.max_actuator_rate.is_finite() && config.max_actuator_rate >= 0.0) {
            return Err(ConfigError::InvalidParameter("max_actuator_rate must be >= 0"));
        }
        if !(config.min_temperature.is_finite()
            && config.max_temperature.is_finite()
            && config.min_temperature < config.max_temperature)
        {
            return Err(ConfigError::InvalidParameter(
                "temperature clamp range must be non-empty",
            ));
        }
        if let DriftPolicy::Gated { stable_band, .. } = config.drift {
            if !(stable_band.is_finite() && stable_band > 0.0) {
                return Err(ConfigError::InvalidParameter("drift stable_band must be > 0"));
            }
        }
        if let ActuatorScaling::NearTarget { bands } = &config.actuator {
            let valid = bands.iter().all(|b| {
                b.within.is_finite() && b.within > 0.0 && b.scale.is_finite() && b.scale >= 0.0
            });
            if !valid {
                return Err(ConfigError::InvalidParameter(
                    "actuator bands need within > 0 and scale >= 0",
                ));
            }
        }

        Ok(Self {
            thermal_mass: config.thermal_mass,
            ambient_coupling: config.ambient_coupling,
            max_actuator_rate: config.max_actuator_rate,
            min_temperature: config.min_temperature,
            max_temperature: config.max_temperature,
            drift: config.drift,
            actuator: config.actuator.clone(),
        })
    }

    /// Advance the temperature by one time step.
    pub fn advance(&self, input: &PlantInput) -> PlantStep {
        let drift_applied = self.drift_applies(input);

        let heat_gain = if drift_applied {
            (input.ambient_temperature - input.temperature) * self.ambient_coupling
        } else {
            0.0
        };
        let scale = self.actuator.factor(input.error, input.neutral_ticks > 0);
        let actuator_effect =
            input.control_output.clamp(-1.0, 1.0) * self.max_actuator_rate * scale;
        let next = input.temperature + (heat_gain + actuator_effect) * self.thermal_mass * input.dt;

        let temperature = if next.is_finite() {
            self.clamp(next)
        } else {
            debug!(
                "plant: non-finite step from {:.3}, holding temperature",
                input.temperature
            );
            self.clamp(input.temperature)
        };

        PlantStep {
            temperature,
            drift_applied,
        }
    }

    /// Whether `t` lies inside the clamp range.
    pub fn in_range(&self, t: f64) -> bool {
        t.is_finite() && (self.min_temperature..=self.max_temperature).contains(&t)
    }

    /// Clamp into range; NaN maps to the lower bound.
    pub fn clamp(&self, t: f64) -> f64 {
        if t.is_nan() {
            self.min_temperature
        } else {
            t.clamp(self.min_temperature, self.max_temperature)
        }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min_temperature, self.max_temperature)
    }

    pub fn drift_policy(&self) -> DriftPolicy {
        self.drift
    }

    pub fn actuator_scaling(&self) -> &ActuatorScaling {
        &self.actuator
    }

    fn drift_applies(&self, input: &PlantInput) -> bool {
        match self.drift {
            DriftPolicy::AlwaysOn => true,
            DriftPolicy::Gated {
                stable_band,
                neutral_ticks,
            } => input.error.abs() < stable_band && input.neutral_ticks >= neutral_ticks,
        }
    }
}
