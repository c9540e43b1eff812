//! Function-pointer finite state machine driving the simulation.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌───────────┬───────────┬──────────┬───────────────────┐    │
//! │  │ RunState  │ on_enter  │ on_exit  │ on_update         │    │
//! │  ├───────────┼───────────┼──────────┼───────────────────┤    │
//! │  │ Stopped   │ fn(ctx)   │ -        │ fn(ctx)->Option<> │    │
//! │  │ Running   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │    │
//! │  │ Completed │ fn(ctx)   │ -        │ fn(ctx)->Option<> │    │
//! │  └───────────┴───────────┴──────────┴───────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut SimulationContext`,
//! which owns the simulation state, history, and the immutable
//! inference engine and plant model.
//!
//! Command-driven transitions (start, stop, reset) go through
//! [`Fsm::force_transition`]; only the step ceiling is detected from
//! inside a handler.

pub mod context;
pub mod states;

use context::SimulationContext;
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Lifecycle state of the simulation driver.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    Stopped = 0,
    Running = 1,
    /// The step ceiling was reached.  Reported as stopped.
    Completed = 2,
}

impl RunState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `RunState`.  Panics on out-of-range in
    /// debug builds; returns `Stopped` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Stopped,
            1 => Self::Running,
            2 => Self::Completed,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Stopped
            }
        }
    }

    /// `Completed` counts as stopped for reporting.
    pub fn is_stopped(self) -> bool {
        !matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SimulationContext);

/// Per-tick handler.  Returns `Some(next)` to trigger a transition.
pub type StateUpdateFn = fn(&mut SimulationContext) -> Option<RunState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: RunState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `RunState as usize`.
    table: [StateDescriptor; RunState::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; RunState::COUNT], initial: RunState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SimulationContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut SimulationContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Immediate transition requested by a command.  A no-op when
    /// already in `next`.
    pub fn force_transition(&mut self, next: RunState, ctx: &mut SimulationContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> RunState {
        RunState::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: RunState, ctx: &mut SimulationContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
