//! Mamdani inference engine.
//!
//! ```text
//!  crisp inputs ──▶ fuzzify (every term) ──▶ rule conditions (min-AND)
//!                                                   │
//!                      dominant action ◀── max ─────┤
//!                                                   ▼
//!                                    defuzzify ──▶ control output
//! ```
//!
//! Two defuzzification laws are supported; the weighted average over rule
//! strengths is the default.  The centroid law aggregates clipped output
//! terms over a sampled output universe.  They do not produce identical
//! outputs for the same rule base.

use serde::{Deserialize, Serialize};

use crate::config::FuzzyConfig;
use crate::error::ConfigError;

use super::rules::RuleBase;
use super::variable::{ActionLabel, FuzzyVariable, action_label};

/// How fired rules collapse to one crisp output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defuzzification {
    /// `Σ(condition · strength) / Σ(condition)` over fired rules.
    #[default]
    WeightedAverage,
    /// Centre of gravity of the aggregated output set, sampled at
    /// `resolution` evenly spaced points.
    Centroid { resolution: usize },
}

/// Result of one inference pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutput {
    /// Signed crisp control output.
    pub output: f64,
    /// Action of the rule with the highest condition, or the neutral label.
    pub action: ActionLabel,
    /// Number of rules with a condition above zero.
    pub fired: usize,
    /// Highest rule condition.
    pub max_condition: f64,
}

impl InferenceOutput {
    /// On/off reading for unsigned-output rule bases.
    pub fn is_on(&self, threshold: f64) -> bool {
        self.output > threshold
    }
}

/// Immutable engine built once from configuration.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inputs: Vec<FuzzyVariable>,
    output: Option<FuzzyVariable>,
    rules: RuleBase,
    neutral: ActionLabel,
    law: Defuzzification,
}

impl InferenceEngine {
    pub fn from_config(config: &FuzzyConfig) -> Result<Self, ConfigError> {
        let mut inputs: Vec<FuzzyVariable> = Vec::with_capacity(config.inputs.len());
        for var_cfg in &config.inputs {
            if inputs.iter().any(|v| v.name() == var_cfg.name) {
                return Err(ConfigError::DuplicateVariable {
                    variable: var_cfg.name.clone(),
                });
            }
            inputs.push(FuzzyVariable::from_config(var_cfg)?);
        }

        let output = config
            .output
            .as_ref()
            .map(FuzzyVariable::from_config)
            .transpose()?;

        let rules = RuleBase::from_config(&config.rules, &inputs, output.as_ref())?;

        if let Defuzzification::Centroid { resolution } = config.defuzzification {
            if resolution < 2 {
                return Err(ConfigError::InvalidParameter("centroid resolution must be >= 2"));
            }
            let out = output.as_ref().ok_or(ConfigError::MissingOutputVariable)?;
            for (idx, rule) in rules.rules().iter().enumerate() {
                if out.term_index(rule.action()).is_none() {
                    return Err(ConfigError::UnknownOutputTerm {
                        rule: idx,
                        term: rule.action().to_string(),
                    });
                }
            }
        }

        Ok(Self {
            inputs,
            output,
            rules,
            neutral: action_label(&config.neutral_action)?,
            law: config.defuzzification,
        })
    }

    /// Run one inference pass.  `values[i]` feeds input variable `i`;
    /// missing values fuzzify to nothing.
    pub fn infer(&self, values: &[f64]) -> InferenceOutput {
        let degrees: Vec<Vec<f64>> = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, var)| var.fuzzify(values.get(i).copied().unwrap_or(f64::NAN)))
            .collect();

        let conditions: Vec<f64> = self
            .rules
            .rules()
            .iter()
            .map(|r| r.condition(&degrees))
            .collect();

        let mut fired = 0;
        let mut max_condition = 0.0;
        let mut action = self.neutral.clone();
        for (rule, &cond) in self.rules.rules().iter().zip(&conditions) {
            if cond > 0.0 {
                fired += 1;
                // Strict comparison: earlier rules keep ties.
                if cond > max_condition {
                    max_condition = cond;
                    action = rule.action().clone();
                }
            }
        }

        if fired == 0 {
            return self.idle(0, 0.0);
        }

        let output = match self.law {
            Defuzzification::WeightedAverage => self.weighted_average(&conditions),
            Defuzzification::Centroid { resolution } => {
                // Fired rules whose clipped terms never show up on the grid.
                match self.centroid(&conditions, resolution) {
                    Some(y) => y,
                    None => return self.idle(fired, max_condition),
                }
            }
        };

        InferenceOutput {
            output,
            action,
            fired,
            max_condition,
        }
    }

    fn idle(&self, fired: usize, max_condition: f64) -> InferenceOutput {
        InferenceOutput {
            output: 0.0,
            action: self.neutral.clone(),
            fired,
            max_condition,
        }
    }

    /// Every `(term label, degree)` pair for input `index` at `x`.
    pub fn fuzzify(&self, index: usize, x: f64) -> Vec<(&str, f64)> {
        self.inputs.get(index).map_or_else(Vec::new, |var| {
            var.terms()
                .iter()
                .zip(var.fuzzify(x))
                .map(|(t, d)| (t.label.as_str(), d))
                .collect()
        })
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub fn output_variable(&self) -> Option<&FuzzyVariable> {
        self.output.as_ref()
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn neutral_action(&self) -> &ActionLabel {
        &self.neutral
    }

    pub fn defuzzification(&self) -> Defuzzification {
        self.law
    }

    // -----------------------------------------------------------------------
    // Defuzzification
    // -----------------------------------------------------------------------

    fn weighted_average(&self, conditions: &[f64]) -> f64 {
        let (num, den) = self
            .rules
            .rules()
            .iter()
            .zip(conditions)
            .filter(|(_, c)| **c > 0.0)
            .fold((0.0, 0.0), |(n, d), (rule, &c)| (n + c * rule.strength(), d + c));
        if den > 0.0 { num / den } else { 0.0 }
    }

    /// `None` when the aggregated set has no mass on the sampled grid.
    fn centroid(&self, conditions: &[f64], resolution: usize) -> Option<f64> {
        let out = self.output.as_ref()?;
        let (min, max) = out.bounds();
        let step = (max - min) / (resolution - 1) as f64;

        let mut num = 0.0;
        let mut den = 0.0;
        for i in 0..resolution {
            let y = min + step * i as f64;
            let mu = self
                .rules
                .rules()
                .iter()
                .zip(conditions)
                .filter_map(|(rule, &c)| rule.consequent().map(|t| c.min(out.degree(t, y))))
                .fold(0.0, f64::max);
            num += y * mu;
            den += mu;
        }
        (den > 0.0).then(|| num / den)
    }
}
