//! Controller configuration parameters
//!
//! Everything tunable about the controller: fuzzy variables and rules,
//! plant constants, ambient presets, and loop timing.  Fixed once the
//! controller is configured, apart from the target and ambient mode.
//! The defaults reproduce the reference room thermostat.

use serde::{Deserialize, Serialize};

use crate::control::inference::{Defuzzification, InferenceEngine};
use crate::control::membership::MembershipFunction;
use crate::error::ConfigError;
use crate::history::MAX_HISTORY_CAPACITY;
use crate::plant::{ActuatorScaling, DriftPolicy, PlantModel};

// ---------------------------------------------------------------------------
// Fuzzy rule base
// ---------------------------------------------------------------------------

/// One labelled term of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub label: String,
    pub shape: MembershipFunction,
}

/// A fuzzy variable over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub terms: Vec<TermConfig>,
}

/// `variable is term`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

/// `IF <when...> THEN action (strength)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub when: Vec<Clause>,
    pub action: String,
    /// Signed strength in `[-1, 1]`: negative cools, positive heats.
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Input variables, in order: error, then error rate.
    pub inputs: Vec<VariableConfig>,
    /// Output variable; only consulted by centroid defuzzification.
    pub output: Option<VariableConfig>,
    pub rules: Vec<RuleConfig>,
    /// Action reported when no rule fires.
    pub neutral_action: String,
    pub defuzzification: Defuzzification,
}

// ---------------------------------------------------------------------------
// Plant and ambient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Responsiveness coefficient applied to the net heat flow.
    pub thermal_mass: f64,
    /// Passive coupling to the ambient temperature (per second).
    pub ambient_coupling: f64,
    /// Temperature rate produced by a full-scale (±1) control output.
    pub max_actuator_rate: f64,
    /// Lower clamp for the simulated temperature.
    pub min_temperature: f64,
    /// Upper clamp for the simulated temperature.
    pub max_temperature: f64,
    pub drift: DriftPolicy,
    /// Near-target damping of the actuator; linear unless configured.
    #[serde(default)]
    pub actuator: ActuatorScaling,
}

/// Season preset selecting the ambient temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbientMode {
    Summer,
    Winter,
}

impl AmbientMode {
    /// The other season.
    pub fn toggled(self) -> Self {
        match self {
            Self::Summer => Self::Winter,
            Self::Winter => Self::Summer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub summer_temperature: f64,
    pub winter_temperature: f64,
    /// Mode in effect when the controller is configured.
    pub mode: AmbientMode,
}

impl AmbientConfig {
    pub fn temperature(&self, mode: AmbientMode) -> f64 {
        match mode {
            AmbientMode::Summer => self.summer_temperature,
            AmbientMode::Winter => self.winter_temperature,
        }
    }
}

/// Where the room temperature starts after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialTemperature {
    Fixed(f64),
    /// Uniform draw from `[min, max)`; `seed` makes the sequence reproducible.
    Random {
        min: f64,
        max: f64,
        seed: Option<u64>,
    },
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub fuzzy: FuzzyConfig,
    pub plant: PlantConfig,
    pub ambient: AmbientConfig,
    pub initial_temperature: InitialTemperature,
    /// Target temperature at configure time.
    pub target_temperature: f64,

    // --- Timing ---
    /// Simulated seconds per control tick.
    pub dt_secs: f64,
    /// Wall-clock period between ticks in paced mode (milliseconds).
    pub control_period_ms: u32,
    /// Render/poll period in paced mode (milliseconds).
    pub poll_period_ms: u32,
    /// Step ceiling; reaching it completes the run.
    pub max_steps: Option<u64>,

    // --- History ---
    /// Samples retained before the oldest is evicted.
    pub history_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fuzzy: default_fuzzy(),
            plant: PlantConfig {
                thermal_mass: 0.25,
                ambient_coupling: 0.05,
                max_actuator_rate: 2.0,
                min_temperature: 0.0,
                max_temperature: 100.0,
                drift: DriftPolicy::AlwaysOn,
                actuator: ActuatorScaling::Linear,
            },
            ambient: AmbientConfig {
                summer_temperature: 30.0,
                winter_temperature: 10.0,
                mode: AmbientMode::Summer,
            },
            initial_temperature: InitialTemperature::Random {
                min: 10.0,
                max: 40.0,
                seed: None,
            },
            target_temperature: 25.0,

            dt_secs: 0.5,
            control_period_ms: 500, // 2 Hz
            poll_period_ms: 16,     // ~60 Hz
            max_steps: None,

            history_capacity: 120, // 60 s at 2 Hz
        }
    }
}

impl ControllerConfig {
    /// Run every configure-time check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuzzy.inputs.len() != 2 {
            return Err(ConfigError::InputCount {
                expected: 2,
                found: self.fuzzy.inputs.len(),
            });
        }
        InferenceEngine::from_config(&self.fuzzy)?;
        let plant = PlantModel::from_config(&self.plant)?;

        if !(self.dt_secs.is_finite() && self.dt_secs > 0.0) {
            return Err(ConfigError::InvalidParameter("dt_secs must be > 0"));
        }
        if self.control_period_ms == 0 {
            return Err(ConfigError::InvalidParameter("control_period_ms must be > 0"));
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::InvalidParameter(
                "history_capacity must be within 1..=MAX_HISTORY_CAPACITY",
            ));
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::InvalidParameter("max_steps must be > 0"));
        }
        if !(self.ambient.summer_temperature.is_finite()
            && self.ambient.winter_temperature.is_finite())
        {
            return Err(ConfigError::InvalidParameter("ambient presets must be finite"));
        }
        if !plant.in_range(self.target_temperature) {
            return Err(ConfigError::InvalidParameter(
                "target_temperature outside plant range",
            ));
        }
        match self.initial_temperature {
            InitialTemperature::Fixed(t) if !plant.in_range(t) => Err(
                ConfigError::InvalidParameter("initial temperature outside plant range"),
            ),
            InitialTemperature::Random { min, max, .. }
                if !(plant.in_range(min) && plant.in_range(max) && min < max) =>
            {
                Err(ConfigError::InvalidParameter(
                    "random initial range must be non-empty and inside plant range",
                ))
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Reference rule base
// ---------------------------------------------------------------------------

fn term(label: &str, shape: MembershipFunction) -> TermConfig {
    TermConfig {
        label: label.to_owned(),
        shape,
    }
}

fn rule(error: &str, rate: &str, action: &str, strength: f64) -> RuleConfig {
    RuleConfig {
        when: vec![
            Clause {
                variable: "error".to_owned(),
                term: error.to_owned(),
            },
            Clause {
                variable: "error_rate".to_owned(),
                term: rate.to_owned(),
            },
        ],
        action: action.to_owned(),
        strength,
    }
}

/// Three terms per input and a full 3×3 rule grid.
fn default_fuzzy() -> FuzzyConfig {
    use MembershipFunction::{Trapezoidal, Triangular};

    FuzzyConfig {
        inputs: vec![
            VariableConfig {
                name: "error".to_owned(),
                min: -20.0,
                max: 20.0,
                terms: vec![
                    term("negative", Trapezoidal(-20.0, -20.0, -2.0, 0.0)),
                    term("zero", Triangular(-2.0, 0.0, 2.0)),
                    term("positive", Trapezoidal(0.0, 2.0, 20.0, 20.0)),
                ],
            },
            VariableConfig {
                name: "error_rate".to_owned(),
                min: -2.0,
                max: 2.0,
                terms: vec![
                    term("negative", Trapezoidal(-2.0, -2.0, -0.2, 0.0)),
                    term("zero", Triangular(-0.2, 0.0, 0.2)),
                    term("positive", Trapezoidal(0.0, 0.2, 2.0, 2.0)),
                ],
            },
        ],
        output: Some(VariableConfig {
            name: "action".to_owned(),
            min: -1.0,
            max: 1.0,
            terms: vec![
                term("COOL", Trapezoidal(-1.0, -1.0, -0.6, 0.0)),
                term("NEUTRAL", Triangular(-0.4, 0.0, 0.4)),
                term("HEAT", Trapezoidal(0.0, 0.6, 1.0, 1.0)),
            ],
        }),
        rules: vec![
            // Too hot
            rule("negative", "negative", "COOL", -1.0),
            rule("negative", "zero", "COOL", -0.8),
            rule("negative", "positive", "COOL", -0.6),
            // On target
            rule("zero", "negative", "HEAT", 0.8),
            rule("zero", "zero", "NEUTRAL", 0.0),
            rule("zero", "positive", "COOL", -0.8),
            // Too cold
            rule("positive", "negative", "HEAT", 0.6),
            rule("positive", "zero", "HEAT", 0.8),
            rule("positive", "positive", "HEAT", 1.0),
        ],
        neutral_action: "NEUTRAL".to_owned(),
        defuzzification: Defuzzification::WeightedAverage,
    }
}
