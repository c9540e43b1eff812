//! Inbound commands to the controller.
//!
//! These represent actions requested by the outside world (buttons,
//! keyboard, a remote client) that the
//! [`ThermalController`](super::service::ThermalController) interprets
//! through [`handle_command`](super::service::ThermalController::handle_command).

use crate::config::AmbientMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Begin a fresh run.  `None` fields fall back to the initial
    /// temperature policy and the current target.
    Start {
        initial: Option<f64>,
        target: Option<f64>,
    },
    /// Continue a stopped run without resetting it.
    Resume,
    Stop,
    Pause,
    /// Clear history and reseed; `None` draws from the initial policy.
    Reset { initial: Option<f64> },
    SetTarget(f64),
    /// Shift the target by a signed amount (e.g. ±0.5 buttons).
    NudgeTarget(f64),
    SetAmbientMode(AmbientMode),
    ToggleAmbientMode,
}
