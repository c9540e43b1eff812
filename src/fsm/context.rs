//! Shared mutable context threaded through every FSM handler.
//!
//! `SimulationContext` is the single struct the state handlers read from
//! and write to.  It owns the mutable [`SimulationState`], the bounded
//! history, and the immutable services built at configure time (inference
//! engine, plant model).  One control tick is [`SimulationContext::advance`]:
//!
//! ```text
//!  error      = target − current
//!  error_rate = (error − previous_error) / dt
//!  (output, action) = engine.infer(error, error_rate)
//!  current    = plant.advance(current, output, ambient)
//!  history   ← sample;  step += 1;  previous_error = error
//! ```

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AmbientConfig, AmbientMode, ControllerConfig, InitialTemperature};
use crate::control::inference::InferenceEngine;
use crate::control::variable::ActionLabel;
use crate::error::ConfigError;
use crate::history::{HistoryRing, HistorySample};
use crate::plant::{PlantInput, PlantModel};

/// Outputs within this distance of zero count as neutral for drift gating.
pub const NEUTRAL_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Simulation state (mutated exactly once per tick)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub current_temperature: f64,
    pub target_temperature: f64,
    /// Error from the previous tick; feeds the error-rate estimate.
    pub previous_error: f64,
    pub last_error: f64,
    pub last_error_rate: f64,
    pub last_output: f64,
    pub last_action: ActionLabel,
    /// Completed ticks since the last start or reset.
    pub step: u64,
    pub ambient_mode: AmbientMode,
    /// Consecutive ticks with a neutral controller decision.
    pub neutral_ticks: u32,
    /// Whether ambient drift was applied on the last tick.
    pub drift_applied: bool,
}

impl SimulationState {
    fn seeded(initial: f64, target: f64, ambient_mode: AmbientMode, neutral: ActionLabel) -> Self {
        Self {
            current_temperature: initial,
            target_temperature: target,
            // First error rate is zero, not a jump from nothing.
            previous_error: target - initial,
            last_error: target - initial,
            last_error_rate: 0.0,
            last_output: 0.0,
            last_action: neutral,
            step: 0,
            ambient_mode,
            neutral_ticks: 0,
            drift_applied: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationContext
// ---------------------------------------------------------------------------

pub struct SimulationContext {
    // -- Timing --
    /// Simulated seconds per tick.
    pub dt: f64,
    /// Step ceiling; reaching it completes the run.
    pub max_steps: Option<u64>,

    // -- State --
    pub state: SimulationState,
    pub history: HistoryRing,
    /// Sample produced by the most recent running tick, taken by the caller.
    pub last_sample: Option<HistorySample>,

    // -- Services --
    pub engine: InferenceEngine,
    pub plant: PlantModel,
    pub ambient: AmbientConfig,
    initial: InitialTemperature,
    rng: StdRng,
}

impl SimulationContext {
    /// Build the context and seed the first run from the initial policy.
    pub fn new(config: &ControllerConfig) -> Result<Self, ConfigError> {
        let engine = InferenceEngine::from_config(&config.fuzzy)?;
        let plant = PlantModel::from_config(&config.plant)?;

        let rng = match config.initial_temperature {
            InitialTemperature::Random {
                seed: Some(seed), ..
            } => StdRng::seed_from_u64(seed),
            _ => StdRng::from_os_rng(),
        };

        let neutral = engine.neutral_action().clone();
        let mut ctx = Self {
            dt: config.dt_secs,
            max_steps: config.max_steps,
            state: SimulationState::seeded(
                0.0,
                config.target_temperature,
                config.ambient.mode,
                neutral,
            ),
            history: HistoryRing::new(config.history_capacity),
            last_sample: None,
            engine,
            plant,
            ambient: config.ambient.clone(),
            initial: config.initial_temperature,
            rng,
        };
        let initial = ctx.draw_initial();
        ctx.restart(initial, config.target_temperature);
        Ok(ctx)
    }

    /// Sample a starting temperature from the configured policy.
    pub fn draw_initial(&mut self) -> f64 {
        match self.initial {
            InitialTemperature::Fixed(t) => self.plant.clamp(t),
            InitialTemperature::Random { min, max, .. }
                if min < max && (max - min).is_finite() =>
            {
                self.plant.clamp(self.rng.random_range(min..max))
            }
            InitialTemperature::Random { min, .. } if min.is_finite() => self.plant.clamp(min),
            InitialTemperature::Random { .. } => self.plant.range().0,
        }
    }

    /// Reinitialize the run: clear history and reseed the state.
    /// The ambient mode carries over.
    pub fn restart(&mut self, initial: f64, target: f64) {
        let neutral = self.engine.neutral_action().clone();
        self.state = SimulationState::seeded(
            self.plant.clamp(initial),
            target,
            self.state.ambient_mode,
            neutral,
        );
        self.history.clear();
        self.last_sample = None;
    }

    /// Ambient temperature for the active mode.
    pub fn ambient_temperature(&self) -> f64 {
        self.ambient.temperature(self.state.ambient_mode)
    }

    /// Whether the step ceiling has been reached.
    pub fn at_ceiling(&self) -> bool {
        self.max_steps.is_some_and(|max| self.state.step >= max)
    }

    /// Run one control tick and record it.
    pub fn advance(&mut self) -> HistorySample {
        let ambient_temperature = self.ambient_temperature();
        let s = &mut self.state;

        let error = s.target_temperature - s.current_temperature;
        let error_rate = (error - s.previous_error) / self.dt;

        let decision = self.engine.infer(&[error, error_rate]);
        let neutral = decision.action == *self.engine.neutral_action()
            || decision.output.abs() <= NEUTRAL_EPSILON;
        s.neutral_ticks = if neutral {
            s.neutral_ticks.saturating_add(1)
        } else {
            0
        };

        let next = self.plant.advance(&PlantInput {
            temperature: s.current_temperature,
            control_output: decision.output,
            ambient_temperature,
            dt: self.dt,
            error,
            neutral_ticks: s.neutral_ticks,
        });

        s.current_temperature = next.temperature;
        s.drift_applied = next.drift_applied;
        s.step += 1;
        s.previous_error = error;
        s.last_error = error;
        s.last_error_rate = error_rate;
        s.last_output = decision.output;
        s.last_action = decision.action;

        let sample = HistorySample {
            time: s.step as f64 * self.dt,
            temperature: s.current_temperature,
            target: s.target_temperature,
            error,
            error_rate,
            control_output: s.last_output,
            control_action: s.last_action.clone(),
            drift_applied: s.drift_applied,
        };

        debug!(
            "tick {}: T={:.2} err={:+.2} rate={:+.3} out={:+.3} ({}) fired={}",
            s.step,
            sample.temperature,
            error,
            error_rate,
            sample.control_output,
            sample.control_action,
            decision.fired,
        );

        self.history.push(sample.clone());
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(initial: InitialTemperature) -> ControllerConfig {
        ControllerConfig {
            initial_temperature: initial,
            ..ControllerConfig::default()
        }
    }

    #[test]
    fn first_error_rate_is_zero() {
        let mut ctx = SimulationContext::new(&config(InitialTemperature::Fixed(20.0))).unwrap();
        let sample = ctx.advance();
        assert_eq!(sample.error, 5.0);
        assert_eq!(sample.error_rate, 0.0);
        assert_eq!(ctx.state.step, 1);
        assert_eq!(ctx.state.previous_error, 5.0);
    }

    #[test]
    fn cold_room_heats() {
        let mut ctx = SimulationContext::new(&config(InitialTemperature::Fixed(15.0))).unwrap();
        let sample = ctx.advance();
        assert_eq!(sample.control_action.as_str(), "HEAT");
        assert!(sample.temperature > 15.0);
    }

    #[test]
    fn sample_time_tracks_steps() {
        let mut ctx = SimulationContext::new(&config(InitialTemperature::Fixed(25.0))).unwrap();
        ctx.advance();
        let second = ctx.advance();
        assert!((second.time - 2.0 * ctx.dt).abs() < 1e-12);
    }

    #[test]
    fn restart_clears_history_and_keeps_mode() {
        let mut ctx = SimulationContext::new(&config(InitialTemperature::Fixed(25.0))).unwrap();
        ctx.state.ambient_mode = AmbientMode::Winter;
        ctx.advance();
        ctx.restart(30.0, 22.0);
        assert!(ctx.history.is_empty());
        assert_eq!(ctx.state.step, 0);
        assert_eq!(ctx.state.current_temperature, 30.0);
        assert_eq!(ctx.state.ambient_mode, AmbientMode::Winter);
        assert_eq!(ctx.state.previous_error, -8.0);
    }

    #[test]
    fn seeded_random_initial_is_reproducible() {
        let policy = InitialTemperature::Random {
            min: 10.0,
            max: 40.0,
            seed: Some(7),
        };
        let mut a = SimulationContext::new(&config(policy)).unwrap();
        let mut b = SimulationContext::new(&config(policy)).unwrap();
        assert_eq!(
            a.state.current_temperature,
            b.state.current_temperature
        );
        assert!((10.0..40.0).contains(&a.state.current_temperature));
        assert_eq!(a.draw_initial(), b.draw_initial());
    }

    #[test]
    fn unbounded_random_range_does_not_panic() {
        let policy = InitialTemperature::Random {
            min: 0.0,
            max: f64::INFINITY,
            seed: Some(3),
        };
        let ctx = SimulationContext::new(&config(policy)).unwrap();
        assert_eq!(ctx.state.current_temperature, 0.0);

        let policy = InitialTemperature::Random {
            min: -f64::MAX,
            max: f64::MAX,
            seed: Some(3),
        };
        let ctx = SimulationContext::new(&config(policy)).unwrap();
        assert_eq!(ctx.state.current_temperature, 0.0);

        let policy = InitialTemperature::Random {
            min: f64::NAN,
            max: 40.0,
            seed: Some(3),
        };
        let ctx = SimulationContext::new(&config(policy)).unwrap();
        assert_eq!(ctx.state.current_temperature, 0.0);
    }

    #[test]
    fn neutral_ticks_count_and_reset() {
        let mut ctx = SimulationContext::new(&config(InitialTemperature::Fixed(25.0))).unwrap();
        ctx.advance();
        assert_eq!(ctx.state.neutral_ticks, 1);
        ctx.state.target_temperature = 35.0;
        ctx.advance();
        assert_eq!(ctx.state.neutral_ticks, 0);
    }

    #[test]
    fn near_target_scaling_skips_neutral_actuation() {
        // error = 1: NEUTRAL wins the tie at 0.5 while the weighted output is 0.4.
        let linear = config(InitialTemperature::Fixed(24.0));
        let mut damped = linear.clone();
        damped.plant.actuator = crate::plant::ActuatorScaling::near_target_default();

        let a = SimulationContext::new(&linear).unwrap().advance();
        let b = SimulationContext::new(&damped).unwrap().advance();
        assert_eq!(a.control_action.as_str(), "NEUTRAL");
        assert!((a.temperature - 24.1375).abs() < 1e-9);
        // Drift only: (30 - 24) * 0.05 * 0.25 * 0.5.
        assert!((b.temperature - 24.0375).abs() < 1e-9);
    }

    #[test]
    fn ceiling_detection() {
        let mut cfg = config(InitialTemperature::Fixed(25.0));
        cfg.max_steps = Some(2);
        let mut ctx = SimulationContext::new(&cfg).unwrap();
        ctx.advance();
        assert!(!ctx.at_ceiling());
        ctx.advance();
        assert!(ctx.at_ceiling());
    }
}
