//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the controller end to
//! end against mock adapters.

mod commands_tests;
mod controller_tests;
mod mock_sink;
mod scenario_tests;
