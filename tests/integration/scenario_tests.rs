//! Reference scenarios for the controller and inference engine.

use super::mock_sink::{fixed_config, make_controller};

use fuzzytherm::config::AmbientMode;
use fuzzytherm::fsm::RunState;
use fuzzytherm::scheduler::run_batch;

// ── Converges on a warm day ──────────────────────────────────

#[test]
fn too_warm_room_settles_within_one_degree() {
    let mut config = fixed_config(75.0);
    config.target_temperature = 72.0;
    config.plant.thermal_mass = 0.1;
    config.ambient.summer_temperature = 80.0;
    config.ambient.mode = AmbientMode::Summer;
    config.dt_secs = 0.1;

    let (mut c, mut sink) = make_controller(config);
    c.start(None, None, &mut sink).unwrap();
    assert_eq!(run_batch(&mut c, 500, &mut sink), 500);

    let snap = c.snapshot();
    assert_eq!(snap.step, 500);
    let error = snap.target_temperature - snap.current_temperature;
    assert!(error.abs() <= 1.0, "final error {error}");
}

// ── Inference reference points ───────────────────────────────

#[test]
fn on_target_and_steady_is_neutral() {
    let (c, _) = make_controller(fixed_config(25.0));
    let out = c.engine().infer(&[0.0, 0.0]);
    assert_eq!(out.action.as_str(), "NEUTRAL");
    assert!(out.output.abs() <= 1e-9);
}

#[test]
fn ten_degrees_too_hot_cools_near_full_strength() {
    let (c, _) = make_controller(fixed_config(25.0));
    let out = c.engine().infer(&[-10.0, 0.0]);
    assert_eq!(out.action.as_str(), "COOL");
    assert!(out.output <= -0.8 + 1e-9, "output {}", out.output);
}

// ── Reset ────────────────────────────────────────────────────

#[test]
fn reset_returns_to_step_zero_with_empty_history() {
    let (mut c, mut sink) = make_controller(fixed_config(18.0));
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 25, &mut sink);
    assert_eq!(c.snapshot().history.len(), 25);

    c.reset(None, &mut sink).unwrap();
    let snap = c.snapshot();
    assert_eq!(snap.step, 0);
    assert!(snap.history.is_empty());
    assert_eq!(snap.state, RunState::Stopped);
    assert_eq!(snap.current_temperature, 18.0);
}
