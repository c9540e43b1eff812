//! Recording event sink and fixtures for integration tests.
//!
//! Keeps every emitted event so tests can assert on the full sequence.

use fuzzytherm::app::events::AppEvent;
use fuzzytherm::app::ports::{Clock, EventSink};
use fuzzytherm::config::{ControllerConfig, InitialTemperature};
use fuzzytherm::fsm::RunState;
use fuzzytherm::history::HistorySample;
use fuzzytherm::ThermalController;

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn ticks(&self) -> Vec<&HistorySample> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Tick(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn transitions(&self) -> Vec<(RunState, RunState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock advanced by hand.
#[allow(dead_code)]
pub struct ManualClock {
    pub now_us: u64,
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us
    }
}

// ── Fixtures ──────────────────────────────────────────────────

#[allow(dead_code)]
pub fn fixed_config(initial: f64) -> ControllerConfig {
    ControllerConfig {
        initial_temperature: InitialTemperature::Fixed(initial),
        ..ControllerConfig::default()
    }
}

#[allow(dead_code)]
pub fn make_controller(config: ControllerConfig) -> (ThermalController, RecordingSink) {
    let controller = ThermalController::configure(config).expect("valid config");
    (controller, RecordingSink::new())
}
