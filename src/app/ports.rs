//! Port traits: the hexagonal boundary between the controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermalController (domain)
//! ```
//!
//! Driven adapters (event sinks, clocks) implement these traits.  The
//! [`ThermalController`](super::service::ThermalController) and the
//! runners consume them via generics, so the domain core never touches
//! a terminal, a window, or the system clock directly.

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / presentation)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, chart, JSON).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Sink that drops every event.
impl EventSink for () {
    fn emit(&mut self, _event: &super::events::AppEvent) {}
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for tick-driven pacing.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin.  Never decreases.
    fn now_us(&self) -> u64;
}
