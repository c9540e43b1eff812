//! Application core: the controller service and its boundary types.
//!
//! [`service::ThermalController`] owns the FSM and simulation context.
//! Presentation layers talk to it through [`commands::AppCommand`] and
//! read it through snapshots and [`events::AppEvent`]s delivered to a
//! [`ports::EventSink`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
