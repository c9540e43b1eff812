//! Rule base: ordered Mamdani rules resolved against the configured variables.
//!
//! Rules are declared by name in configuration and resolved to
//! `(variable, term)` indices once, so evaluation never touches strings.

use crate::config::RuleConfig;
use crate::error::ConfigError;

use super::variable::{ActionLabel, FuzzyVariable, action_label};

/// A resolved rule: `IF v1 is t1 AND v2 is t2 ... THEN action (strength)`.
#[derive(Debug, Clone)]
pub struct Rule {
    /// `(input index, term index)` clauses.
    antecedent: Vec<(usize, usize)>,
    action: ActionLabel,
    strength: f64,
    /// Output term for centroid defuzzification, when an output variable exists.
    consequent: Option<usize>,
}

impl Rule {
    /// Fuzzy AND (min) of the clause degrees.
    ///
    /// `degrees[v][t]` is the degree of input `v` in term `t`.
    pub fn condition(&self, degrees: &[Vec<f64>]) -> f64 {
        self.antecedent
            .iter()
            .map(|&(v, t)| degrees[v][t])
            .fold(1.0, f64::min)
    }

    pub fn action(&self) -> &ActionLabel {
        &self.action
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn consequent(&self) -> Option<usize> {
        self.consequent
    }
}

/// Ordered, non-empty set of rules.  Declaration order breaks ties.
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Resolve rule declarations against the input (and optional output) variables.
    pub fn from_config(
        configs: &[RuleConfig],
        inputs: &[FuzzyVariable],
        output: Option<&FuzzyVariable>,
    ) -> Result<Self, ConfigError> {
        if configs.is_empty() {
            return Err(ConfigError::EmptyRuleBase);
        }

        let mut rules = Vec::with_capacity(configs.len());
        for (idx, cfg) in configs.iter().enumerate() {
            if cfg.when.is_empty() {
                return Err(ConfigError::EmptyAntecedent { rule: idx });
            }
            if !cfg.strength.is_finite() || !(-1.0..=1.0).contains(&cfg.strength) {
                return Err(ConfigError::StrengthOutOfRange { rule: idx });
            }

            let mut antecedent = Vec::with_capacity(cfg.when.len());
            for clause in &cfg.when {
                let v = inputs
                    .iter()
                    .position(|var| var.name() == clause.variable)
                    .ok_or_else(|| ConfigError::UnknownVariable {
                        rule: idx,
                        variable: clause.variable.clone(),
                    })?;
                let t = inputs[v].term_index(&clause.term).ok_or_else(|| {
                    ConfigError::UnknownTerm {
                        rule: idx,
                        variable: clause.variable.clone(),
                        term: clause.term.clone(),
                    }
                })?;
                antecedent.push((v, t));
            }

            let consequent = output.and_then(|out| out.term_index(&cfg.action));

            rules.push(Rule {
                antecedent,
                action: action_label(&cfg.action)?,
                strength: cfg.strength,
                consequent,
            });
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
