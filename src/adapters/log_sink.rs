//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every controller event as one line
//! through the `log` facade.  A chart or dashboard would implement the
//! same trait.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
///
/// Ticks go to `info` every `tick_every` samples and to `debug` otherwise,
/// so a long run does not flood the console.
pub struct LogEventSink {
    tick_every: u64,
    ticks: u64,
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::with_tick_every(1)
    }

    pub fn with_tick_every(tick_every: u64) -> Self {
        Self {
            tick_every: tick_every.max(1),
            ticks: 0,
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Tick(s) => {
                self.ticks += 1;
                if self.ticks % self.tick_every == 0 {
                    info!(
                        "TICK  | t={:>7.1}s | T={:6.2} target={:5.1} | err={:+6.2} \
                         rate={:+6.3} | out={:+.3} {:<8} | drift={}",
                        s.time,
                        s.temperature,
                        s.target,
                        s.error,
                        s.error_rate,
                        s.control_output,
                        s.control_action,
                        if s.drift_applied { "on" } else { "off" },
                    );
                } else {
                    debug!("TICK  | t={:.1}s T={:.2}", s.time, s.temperature);
                }
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {from:?} -> {to:?}");
            }
            AppEvent::Started { initial, target } => {
                info!("START | initial={initial:.2} target={target:.1}");
            }
            AppEvent::Completed { steps } => {
                info!("DONE  | step ceiling reached after {steps} ticks");
            }
            AppEvent::TargetChanged { target } => {
                info!("TARGET| {target:.1}");
            }
            AppEvent::AmbientChanged { mode, temperature } => {
                info!("AMBIENT| {mode:?} ({temperature:.1})");
            }
            AppEvent::Reset { initial } => {
                self.ticks = 0;
                info!("RESET | initial={initial:.2}");
            }
        }
    }
}
