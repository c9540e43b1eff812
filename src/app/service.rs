//! Controller service: the hexagonal core.
//!
//! [`ThermalController`] owns the FSM and the simulation context.  It
//! exposes a presentation-agnostic API; every outbound notification flows
//! through an [`EventSink`] injected at the call site, which makes the
//! whole service testable with a recording mock.
//!
//! ```text
//!  AppCommand ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │      ThermalController      │
//!   snapshot() ◀──│  FSM · Inference · Plant    │
//!                 └─────────────────────────────┘
//! ```
//!
//! Every command validates before it mutates: a rejected command leaves
//! the state exactly as it was.

use log::{info, warn};

use crate::config::{AmbientMode, ControllerConfig};
use crate::control::inference::InferenceEngine;
use crate::error::{Result, StateError};
use crate::fsm::context::SimulationContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, RunState};
use crate::history::HistorySample;

use super::commands::AppCommand;
use super::events::{AppEvent, Snapshot};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// ThermalController
// ───────────────────────────────────────────────────────────────

pub struct ThermalController {
    fsm: Fsm,
    ctx: SimulationContext,
    config: ControllerConfig,
}

impl ThermalController {
    /// Validate `config` and build a stopped controller seeded from the
    /// initial temperature policy.
    pub fn configure(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        let mut ctx = SimulationContext::new(&config)?;
        let mut fsm = Fsm::new(build_state_table(), RunState::Stopped);
        fsm.start(&mut ctx);

        info!(
            "Controller configured: {} rules, {:?}, dt={}s, history={}",
            ctx.engine.rules().len(),
            ctx.engine.defuzzification(),
            config.dt_secs,
            config.history_capacity,
        );

        Ok(Self { fsm, ctx, config })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Begin a fresh run: clear history, seed the temperature, and enter
    /// `Running`.  Starting while already running restarts the run.
    pub fn start(
        &mut self,
        initial: Option<f64>,
        target: Option<f64>,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if let Some(t) = target {
            self.check_target(t)?;
        }
        if let Some(t) = initial {
            self.check_temperature(t)?;
        }

        let initial = initial.unwrap_or_else(|| self.ctx.draw_initial());
        let target = target.unwrap_or(self.ctx.state.target_temperature);
        self.ctx.restart(initial, target);
        sink.emit(&AppEvent::Started {
            initial: self.ctx.state.current_temperature,
            target,
        });
        self.transition(RunState::Running, sink);
        Ok(())
    }

    /// Continue a stopped run where it left off.
    pub fn resume(&mut self, sink: &mut impl EventSink) -> Result<()> {
        match self.fsm.current_state() {
            RunState::Completed => Err(StateError::Completed.into()),
            RunState::Running => Ok(()),
            RunState::Stopped => {
                self.transition(RunState::Running, sink);
                Ok(())
            }
        }
    }

    /// Running → Stopped.  Idempotent; a completed run stays completed.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        if self.fsm.current_state() == RunState::Running {
            self.transition(RunState::Stopped, sink);
        }
    }

    /// Same transition as [`stop`](Self::stop); history and temperature
    /// are kept for [`resume`](Self::resume).
    pub fn pause(&mut self, sink: &mut impl EventSink) {
        self.stop(sink);
    }

    /// Clear history and reseed, ending in `Stopped`.  `None` draws the
    /// starting temperature from the configured policy.
    pub fn reset(&mut self, initial: Option<f64>, sink: &mut impl EventSink) -> Result<()> {
        if let Some(t) = initial {
            self.check_temperature(t)?;
        }
        let initial = initial.unwrap_or_else(|| self.ctx.draw_initial());
        let target = self.ctx.state.target_temperature;
        self.ctx.restart(initial, target);
        sink.emit(&AppEvent::Reset {
            initial: self.ctx.state.current_temperature,
        });
        self.transition(RunState::Stopped, sink);
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance exactly one control tick.
    pub fn step(&mut self, sink: &mut impl EventSink) -> Result<HistorySample> {
        let prev = self.fsm.current_state();
        if prev != RunState::Running {
            return Err(StateError::NotRunning(prev).into());
        }

        self.fsm.tick(&mut self.ctx);
        let Some(sample) = self.ctx.last_sample.take() else {
            // Resumed at the ceiling; the handler completed without a tick.
            self.emit_state_change(prev, sink);
            return Err(StateError::Completed.into());
        };

        sink.emit(&AppEvent::Tick(sample.clone()));
        self.emit_state_change(prev, sink);
        Ok(sample)
    }

    // ── Runtime parameters ────────────────────────────────────

    /// Change the target without resetting the run.
    pub fn set_target(&mut self, target: f64, sink: &mut impl EventSink) -> Result<()> {
        self.check_target(target)?;
        self.ctx.state.target_temperature = target;
        info!("Target set to {target:.1}");
        sink.emit(&AppEvent::TargetChanged { target });
        Ok(())
    }

    /// Shift the target by `delta`, rounded to 0.1 and clamped to the
    /// plant range.  Returns the new target.
    pub fn nudge_target(&mut self, delta: f64, sink: &mut impl EventSink) -> Result<f64> {
        let raw = self.ctx.state.target_temperature + delta;
        if !raw.is_finite() {
            return Err(self.target_error(raw).into());
        }
        let target = self.ctx.plant.clamp((raw * 10.0).round() / 10.0);
        self.set_target(target, sink)?;
        Ok(target)
    }

    pub fn set_ambient_mode(&mut self, mode: AmbientMode, sink: &mut impl EventSink) {
        self.ctx.state.ambient_mode = mode;
        let temperature = self.ctx.ambient_temperature();
        info!("Ambient mode {mode:?} ({temperature:.1})");
        sink.emit(&AppEvent::AmbientChanged { mode, temperature });
    }

    /// Flip Summer ↔ Winter.  Returns the new mode.
    pub fn toggle_ambient_mode(&mut self, sink: &mut impl EventSink) -> AmbientMode {
        let mode = self.ctx.state.ambient_mode.toggled();
        self.set_ambient_mode(mode, sink);
        mode
    }

    // ── Command handling ──────────────────────────────────────

    /// Dispatch an external command.  Rejections are logged and returned.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        let result = match cmd {
            AppCommand::Start { initial, target } => self.start(initial, target, sink),
            AppCommand::Resume => self.resume(sink),
            AppCommand::Stop => {
                self.stop(sink);
                Ok(())
            }
            AppCommand::Pause => {
                self.pause(sink);
                Ok(())
            }
            AppCommand::Reset { initial } => self.reset(initial, sink),
            AppCommand::SetTarget(t) => self.set_target(t, sink),
            AppCommand::NudgeTarget(delta) => self.nudge_target(delta, sink).map(|_| ()),
            AppCommand::SetAmbientMode(mode) => {
                self.set_ambient_mode(mode, sink);
                Ok(())
            }
            AppCommand::ToggleAmbientMode => {
                self.toggle_ambient_mode(sink);
                Ok(())
            }
        };
        if let Err(e) = &result {
            warn!("Command {cmd:?} rejected: {e}");
        }
        result
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-only copy of the controller state and history.
    pub fn snapshot(&self) -> Snapshot {
        let s = &self.ctx.state;
        let state = self.fsm.current_state();
        Snapshot {
            state,
            stopped: state.is_stopped(),
            current_temperature: s.current_temperature,
            target_temperature: s.target_temperature,
            ambient_mode: s.ambient_mode,
            ambient_temperature: self.ctx.ambient_temperature(),
            last_error: s.last_error,
            last_error_rate: s.last_error_rate,
            last_output: s.last_output,
            last_action: s.last_action.clone(),
            step: s.step,
            drift_applied: s.drift_applied,
            history: self.ctx.history.to_vec(),
        }
    }

    pub fn state(&self) -> RunState {
        self.fsm.current_state()
    }

    pub fn is_running(&self) -> bool {
        self.fsm.current_state() == RunState::Running
    }

    /// Completed ticks since the last start or reset.
    pub fn step_count(&self) -> u64 {
        self.ctx.state.step
    }

    /// The inference engine, for membership inspection.
    pub fn engine(&self) -> &InferenceEngine {
        &self.ctx.engine
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, next: RunState, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        self.fsm.force_transition(next, &mut self.ctx);
        self.emit_state_change(prev, sink);
    }

    fn emit_state_change(&self, prev: RunState, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now == prev {
            return;
        }
        sink.emit(&AppEvent::StateChanged { from: prev, to: now });
        if now == RunState::Completed {
            sink.emit(&AppEvent::Completed {
                steps: self.ctx.state.step,
            });
        }
    }

    fn check_target(&self, target: f64) -> core::result::Result<(), StateError> {
        if self.ctx.plant.in_range(target) {
            Ok(())
        } else {
            Err(self.target_error(target))
        }
    }

    fn target_error(&self, target: f64) -> StateError {
        let (min, max) = self.ctx.plant.range();
        StateError::TargetOutOfRange { target, min, max }
    }

    fn check_temperature(&self, temperature: f64) -> core::result::Result<(), StateError> {
        if self.ctx.plant.in_range(temperature) {
            Ok(())
        } else {
            let (min, max) = self.ctx.plant.range();
            Err(StateError::TemperatureOutOfRange {
                temperature,
                min,
                max,
            })
        }
    }
}
