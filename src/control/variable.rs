//! Fuzzy variables: a named universe plus its labelled terms.

use crate::config::VariableConfig;
use crate::error::ConfigError;

use super::membership::MembershipFunction;

/// Fixed capacity of an action label, in bytes.
pub const LABEL_CAPACITY: usize = 16;

/// Action label carried by rules and history samples.
pub type ActionLabel = heapless::String<LABEL_CAPACITY>;

/// Build an [`ActionLabel`], rejecting labels that do not fit.
pub fn action_label(s: &str) -> Result<ActionLabel, ConfigError> {
    let mut label = ActionLabel::new();
    label
        .push_str(s)
        .map_err(|()| ConfigError::LabelTooLong { label: s.to_owned() })?;
    Ok(label)
}

/// One linguistic term of a variable.
#[derive(Debug, Clone)]
pub struct Term {
    pub label: String,
    pub shape: MembershipFunction,
}

/// A named input or output dimension over `[min, max]`.
#[derive(Debug, Clone)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<Term>,
}

impl FuzzyVariable {
    /// Create a variable with no terms.  The universe must be non-empty.
    pub fn new(name: &str, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::EmptyUniverse {
                variable: name.to_owned(),
            });
        }
        Ok(Self {
            name: name.to_owned(),
            min,
            max,
            terms: Vec::new(),
        })
    }

    /// Add a labelled term.  Labels are unique per variable.
    pub fn add_term(&mut self, label: &str, shape: MembershipFunction) -> Result<(), ConfigError> {
        if self.term_index(label).is_some() {
            return Err(ConfigError::DuplicateTerm {
                variable: self.name.clone(),
                term: label.to_owned(),
            });
        }
        if !shape.is_well_formed() {
            return Err(ConfigError::NonMonotonicPoints {
                variable: self.name.clone(),
                term: label.to_owned(),
            });
        }
        self.terms.push(Term {
            label: label.to_owned(),
            shape,
        });
        Ok(())
    }

    pub fn from_config(config: &VariableConfig) -> Result<Self, ConfigError> {
        let mut var = Self::new(&config.name, config.min, config.max)?;
        for term in &config.terms {
            var.add_term(&term.label, term.shape)?;
        }
        Ok(var)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }

    /// Clamp a crisp value into the universe.  NaN passes through.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() { x } else { x.clamp(self.min, self.max) }
    }

    /// Degree of `x` (clamped) in term `index`.  NaN belongs to nothing.
    pub fn degree(&self, index: usize, x: f64) -> f64 {
        let x = self.clamp(x);
        if x.is_nan() {
            return 0.0;
        }
        self.terms.get(index).map_or(0.0, |t| t.shape.degree(x))
    }

    /// Degrees of `x` against every term, in declaration order.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        (0..self.terms.len()).map(|i| self.degree(i, x)).collect()
    }
}
