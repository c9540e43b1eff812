//! Concrete state handler functions and table builder.
//!
//! ```text
//!            start / resume
//!  STOPPED ─────────────────▶ RUNNING ──[step ceiling]──▶ COMPLETED
//!     ▲                          │                            │
//!     └──────── stop / pause ────┘                            │
//!     ▲                                                       │
//!     └─────────────────────────── reset ─────────────────────┘
//! ```
//!
//! Only `Running` does work on a tick.  The other handlers never
//! request a transition; commands move the machine out of them.

use super::context::SimulationContext;
use super::{RunState, StateDescriptor};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.
pub fn build_state_table() -> [StateDescriptor; RunState::COUNT] {
    [
        // Index 0: Stopped
        StateDescriptor {
            id: RunState::Stopped,
            name: "Stopped",
            on_enter: Some(stopped_enter),
            on_exit: None,
            on_update: stopped_update,
        },
        // Index 1: Running
        StateDescriptor {
            id: RunState::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
        // Index 2: Completed
        StateDescriptor {
            id: RunState::Completed,
            name: "Completed",
            on_enter: Some(completed_enter),
            on_exit: None,
            on_update: completed_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPED
// ═══════════════════════════════════════════════════════════════════════════

fn stopped_enter(ctx: &mut SimulationContext) {
    info!(
        "STOPPED: T={:.2} target={:.2} step={}",
        ctx.state.current_temperature, ctx.state.target_temperature, ctx.state.step
    );
}

fn stopped_update(_ctx: &mut SimulationContext) -> Option<RunState> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING: one control tick per update
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut SimulationContext) {
    info!(
        "RUNNING: T={:.2} target={:.2} ambient={:?} ({:.1})",
        ctx.state.current_temperature,
        ctx.state.target_temperature,
        ctx.state.ambient_mode,
        ctx.ambient_temperature(),
    );
}

fn running_exit(ctx: &mut SimulationContext) {
    info!("RUNNING: halted after {} steps", ctx.state.step);
}

fn running_update(ctx: &mut SimulationContext) -> Option<RunState> {
    // Resumed at the ceiling: nothing left to simulate.
    if ctx.at_ceiling() {
        warn!("RUNNING: step ceiling already reached");
        return Some(RunState::Completed);
    }

    let sample = ctx.advance();
    ctx.last_sample = Some(sample);

    if ctx.at_ceiling() {
        return Some(RunState::Completed);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COMPLETED
// ═══════════════════════════════════════════════════════════════════════════

fn completed_enter(ctx: &mut SimulationContext) {
    info!(
        "COMPLETED: {} steps, final T={:.2} (error {:+.2})",
        ctx.state.step,
        ctx.state.current_temperature,
        ctx.state.target_temperature - ctx.state.current_temperature,
    );
}

fn completed_update(_ctx: &mut SimulationContext) -> Option<RunState> {
    None
}
