//! Outbound controller events and the read-only snapshot.
//!
//! The [`ThermalController`](super::service::ThermalController) emits
//! events through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them: log them,
//! redraw a chart, stream them as JSON.

use serde::Serialize;

use crate::config::AmbientMode;
use crate::control::variable::ActionLabel;
use crate::fsm::RunState;
use crate::history::HistorySample;

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A fresh run began.
    Started { initial: f64, target: f64 },

    /// The FSM transitioned between states.
    StateChanged { from: RunState, to: RunState },

    /// One control tick completed.
    Tick(HistorySample),

    /// The step ceiling was reached.
    Completed { steps: u64 },

    TargetChanged { target: f64 },

    AmbientChanged { mode: AmbientMode, temperature: f64 },

    /// History cleared and state reseeded.
    Reset { initial: f64 },
}

/// A point-in-time copy of the controller state.
///
/// Taking a snapshot never mutates the controller; two snapshots with no
/// step in between compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: RunState,
    /// `true` for both `Stopped` and `Completed`.
    pub stopped: bool,
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub ambient_mode: AmbientMode,
    pub ambient_temperature: f64,
    pub last_error: f64,
    pub last_error_rate: f64,
    pub last_output: f64,
    pub last_action: ActionLabel,
    pub step: u64,
    pub drift_applied: bool,
    /// Oldest to newest.
    pub history: Vec<HistorySample>,
}
