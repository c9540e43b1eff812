//! Fuzzy-logic closed-loop temperature controller.
//!
//! A Mamdani inference engine turns the temperature error and its rate
//! of change into a signed control output, and a first-order plant model
//! turns that output into the next temperature.  A small function-pointer
//! FSM owns the run lifecycle and a bounded history of samples.
//!
//! Presentation is not part of this crate: it reads the controller
//! through [`app::events::Snapshot`]s and outbound
//! [`app::events::AppEvent`]s.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod history;
pub mod plant;
pub mod scheduler;

pub use app::service::ThermalController;
pub use config::ControllerConfig;
pub use error::{ConfigError, Error, Result, StateError};
