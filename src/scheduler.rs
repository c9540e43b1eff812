//! Runners: how control ticks get triggered.
//!
//! The controller itself never looks at a clock.  Two deployment shapes
//! drive it from outside:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Tick-driven                       Rerun-driven              │
//! │                                                              │
//! │  loop {                            run_batch(n)              │
//! │    now = clock.now_us()              ├─ step()               │
//! │    if pacer.poll(now) ──┐            ├─ step()               │
//! │    render / sleep       │            └─ ... until stopped    │
//! │  }                      ▼                 or n spent         │
//! │                  ThermalController.step()                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both are single-threaded and cooperative; nothing here spawns.

use log::{info, warn};

use crate::app::ports::{Clock, EventSink};
use crate::app::service::ThermalController;

// ═══════════════════════════════════════════════════════════════
//  Tick-driven pacing
// ═══════════════════════════════════════════════════════════════

/// Fires once per control period on a polled monotonic clock.
///
/// The outer loop may poll far more often than the period (e.g. at the
/// render rate); a tick is due only when at least one full period has
/// elapsed since the last one.  Missed periods are not replayed.
#[derive(Debug, Clone)]
pub struct ControlPacer {
    period_us: u64,
    last_fire_us: Option<u64>,
}

impl ControlPacer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_us: u64::from(period_ms.max(1)) * 1_000,
            last_fire_us: None,
        }
    }

    /// Check the clock; `true` when a control tick is due.
    pub fn poll(&mut self, clock: &impl Clock) -> bool {
        self.poll_at(clock.now_us())
    }

    /// [`poll`](Self::poll) with an explicit timestamp.
    pub fn poll_at(&mut self, now_us: u64) -> bool {
        match self.last_fire_us {
            // The first poll only arms the pacer.
            None => {
                self.last_fire_us = Some(now_us);
                false
            }
            Some(last) if now_us.saturating_sub(last) >= self.period_us => {
                self.last_fire_us = Some(now_us);
                true
            }
            Some(_) => false,
        }
    }

    /// Re-arm on the next poll (after a pause, for example).
    pub fn reset(&mut self) {
        self.last_fire_us = None;
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }
}

// ═══════════════════════════════════════════════════════════════
//  Rerun-driven batch
// ═══════════════════════════════════════════════════════════════

/// Step until the controller stops, completes, or `max_ticks` are spent.
/// Returns the number of ticks executed.
pub fn run_batch(
    controller: &mut ThermalController,
    max_ticks: u64,
    sink: &mut impl EventSink,
) -> u64 {
    let mut ticks = 0;
    while ticks < max_ticks && controller.is_running() {
        if let Err(e) = controller.step(sink) {
            warn!("Batch halted after {} ticks: {}", ticks, e);
            break;
        }
        ticks += 1;
    }
    info!(
        "Batch finished: {} ticks, state {:?}",
        ticks,
        controller.state()
    );
    ticks
}
