//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to              |
//! |------------|------------|--------------------------|
//! | `log_sink` | EventSink  | `log` facade             |
//! | `time`     | Clock      | `std::time::Instant`     |

pub mod log_sink;
pub mod time;
