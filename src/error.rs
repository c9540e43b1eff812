//! Unified error types for the controller.
//!
//! Two families, matching the two moments an operation can go wrong:
//!
//! - [`ConfigError`] is raised only by `configure` / [`ControllerConfig::validate`]
//!   and is fatal for that configuration.
//! - [`StateError`] is raised by runtime commands (stepping while stopped,
//!   out-of-range targets).  It is recoverable and never leaves the
//!   simulation state half-modified.
//!
//! Numeric corner cases inside the control loop (zero-run slopes, a rule
//! base where nothing fires) are *not* errors; they have defined fallback
//! values so the loop never halts on extreme inputs.
//!
//! [`ControllerConfig::validate`]: crate::config::ControllerConfig::validate

use core::fmt;

use crate::fsm::RunState;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The configuration was rejected at configure time.
    Config(ConfigError),
    /// A runtime command was not valid in the current state.
    State(StateError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A variable's universe is empty (`min >= max`) or not finite.
    EmptyUniverse { variable: String },
    /// A membership function's control points are decreasing or not finite.
    NonMonotonicPoints { variable: String, term: String },
    /// Two terms of the same variable share a label.
    DuplicateTerm { variable: String, term: String },
    /// Two variables share a name.
    DuplicateVariable { variable: String },
    /// The thermostat driver needs exactly two inputs (error, error rate).
    InputCount { expected: usize, found: usize },
    /// The rule base has no rules.
    EmptyRuleBase,
    /// A rule has no antecedent clauses.
    EmptyAntecedent { rule: usize },
    /// A rule references a variable that is not configured.
    UnknownVariable { rule: usize, variable: String },
    /// A rule references a term its variable does not define.
    UnknownTerm { rule: usize, variable: String, term: String },
    /// A rule strength lies outside `[-1, 1]` or is not finite.
    StrengthOutOfRange { rule: usize },
    /// A label does not fit the fixed-capacity label type.
    LabelTooLong { label: String },
    /// Centroid defuzzification was selected without an output variable.
    MissingOutputVariable,
    /// A rule action does not name a term of the output variable.
    UnknownOutputTerm { rule: usize, term: String },
    /// A scalar parameter is out of its allowed range.
    InvalidParameter(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUniverse { variable } => {
                write!(f, "variable '{variable}' has an empty universe")
            }
            Self::NonMonotonicPoints { variable, term } => {
                write!(f, "term '{variable}.{term}' has non-monotonic control points")
            }
            Self::DuplicateTerm { variable, term } => {
                write!(f, "term '{term}' defined twice on variable '{variable}'")
            }
            Self::DuplicateVariable { variable } => {
                write!(f, "variable '{variable}' defined twice")
            }
            Self::InputCount { expected, found } => {
                write!(f, "expected {expected} input variables, found {found}")
            }
            Self::EmptyRuleBase => write!(f, "rule base is empty"),
            Self::EmptyAntecedent { rule } => write!(f, "rule #{rule} has no antecedent"),
            Self::UnknownVariable { rule, variable } => {
                write!(f, "rule #{rule} references unknown variable '{variable}'")
            }
            Self::UnknownTerm { rule, variable, term } => {
                write!(f, "rule #{rule} references unknown term '{variable}.{term}'")
            }
            Self::StrengthOutOfRange { rule } => {
                write!(f, "rule #{rule} strength must be finite and within [-1, 1]")
            }
            Self::LabelTooLong { label } => write!(f, "label '{label}' is too long"),
            Self::MissingOutputVariable => {
                write!(f, "centroid defuzzification requires an output variable")
            }
            Self::UnknownOutputTerm { rule, term } => {
                write!(f, "rule #{rule} action '{term}' is not an output term")
            }
            Self::InvalidParameter(param) => write!(f, "invalid parameter: {param}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Runtime state errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateError {
    /// `step()` was called while the simulation was not running.
    NotRunning(RunState),
    /// `resume()` was called after the step ceiling was reached.
    Completed,
    /// A requested target temperature lies outside the plant's range.
    TargetOutOfRange { target: f64, min: f64, max: f64 },
    /// A requested initial temperature lies outside the plant's range.
    TemperatureOutOfRange { temperature: f64, min: f64, max: f64 },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning(state) => write!(f, "simulation is not running ({state:?})"),
            Self::Completed => write!(f, "simulation completed; reset or start a new run"),
            Self::TargetOutOfRange { target, min, max } => {
                write!(f, "target {target} outside [{min}, {max}]")
            }
            Self::TemperatureOutOfRange { temperature, min, max } => {
                write!(f, "temperature {temperature} outside [{min}, {max}]")
            }
        }
    }
}

impl From<StateError> for Error {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
