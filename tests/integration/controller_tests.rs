//! Controller lifecycle, history and event stream.

use super::mock_sink::{fixed_config, make_controller};

use fuzzytherm::app::events::AppEvent;
use fuzzytherm::config::InitialTemperature;
use fuzzytherm::error::{Error, StateError};
use fuzzytherm::fsm::RunState;
use fuzzytherm::plant::DriftPolicy;
use fuzzytherm::scheduler::run_batch;

#[test]
fn start_emits_started_then_transition() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.start(None, Some(22.0), &mut sink).unwrap();

    assert_eq!(
        sink.events,
        vec![
            AppEvent::Started {
                initial: 20.0,
                target: 22.0
            },
            AppEvent::StateChanged {
                from: RunState::Stopped,
                to: RunState::Running
            },
        ]
    );
}

#[test]
fn every_step_emits_its_sample() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.start(None, None, &mut sink).unwrap();
    sink.clear();

    let a = c.step(&mut sink).unwrap();
    let b = c.step(&mut sink).unwrap();
    let ticks = sink.ticks();
    assert_eq!(ticks, vec![&a, &b]);
    assert_eq!(c.snapshot().history, vec![a, b]);
}

#[test]
fn step_when_stopped_is_rejected_without_side_effects() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    let before = c.snapshot();
    assert_eq!(
        c.step(&mut sink).unwrap_err(),
        Error::State(StateError::NotRunning(RunState::Stopped))
    );
    assert_eq!(c.snapshot(), before);
    assert!(sink.events.is_empty());
}

#[test]
fn snapshot_is_idempotent() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 5, &mut sink);
    assert_eq!(c.snapshot(), c.snapshot());
}

#[test]
fn history_evicts_oldest_at_capacity() {
    let mut config = fixed_config(20.0);
    config.history_capacity = 10;
    let dt = config.dt_secs;
    let (mut c, mut sink) = make_controller(config);
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 25, &mut sink);

    let history = c.snapshot().history;
    assert_eq!(history.len(), 10);
    assert!((history[0].time - 16.0 * dt).abs() < 1e-9);
    assert!((history[9].time - 25.0 * dt).abs() < 1e-9);
    assert!(history.windows(2).all(|w| w[0].time < w[1].time));
}

#[test]
fn same_seed_same_history() {
    let policy = InitialTemperature::Random {
        min: 10.0,
        max: 40.0,
        seed: Some(42),
    };
    let run = || {
        let mut config = fixed_config(0.0);
        config.initial_temperature = policy;
        let (mut c, mut sink) = make_controller(config);
        c.start(None, None, &mut sink).unwrap();
        run_batch(&mut c, 60, &mut sink);
        c.snapshot().history
    };
    assert_eq!(run(), run());
}

#[test]
fn set_target_mid_run_keeps_history() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 4, &mut sink);
    c.set_target(21.0, &mut sink).unwrap();
    let sample = c.step(&mut sink).unwrap();
    assert_eq!(sample.target, 21.0);
    assert_eq!(c.snapshot().history.len(), 5);
}

#[test]
fn out_of_range_target_rejected() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    let err = c.set_target(-5.0, &mut sink).unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::TargetOutOfRange { target, .. }) if target == -5.0
    ));
    assert_eq!(c.snapshot().target_temperature, 25.0);
}

#[test]
fn ceiling_completes_and_reports_stopped() {
    let mut config = fixed_config(20.0);
    config.max_steps = Some(3);
    let (mut c, mut sink) = make_controller(config);
    c.start(None, None, &mut sink).unwrap();
    for _ in 0..3 {
        c.step(&mut sink).unwrap();
    }
    let snap = c.snapshot();
    assert_eq!(snap.state, RunState::Completed);
    assert!(snap.stopped);
    assert_eq!(sink.last(), Some(&AppEvent::Completed { steps: 3 }));
    assert_eq!(
        c.step(&mut sink).unwrap_err(),
        Error::State(StateError::NotRunning(RunState::Completed))
    );
}

#[test]
fn reset_from_completed_goes_to_stopped() {
    let mut config = fixed_config(20.0);
    config.max_steps = Some(2);
    let (mut c, mut sink) = make_controller(config);
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 10, &mut sink);
    c.reset(Some(30.0), &mut sink).unwrap();
    assert_eq!(c.state(), RunState::Stopped);
    assert_eq!(c.snapshot().current_temperature, 30.0);
    assert_eq!(
        sink.transitions().last(),
        Some(&(RunState::Completed, RunState::Stopped))
    );
}

#[test]
fn gated_drift_waits_for_neutral_streak() {
    let mut config = fixed_config(25.0);
    config.plant.drift = DriftPolicy::Gated {
        stable_band: 1.5,
        neutral_ticks: 6,
    };
    let (mut c, mut sink) = make_controller(config);
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 6, &mut sink);

    let history = c.snapshot().history;
    assert!(history[..5].iter().all(|s| !s.drift_applied));
    assert!(history[..5].iter().all(|s| s.temperature == 25.0));
    assert!(history[5].drift_applied);
    assert!(history[5].temperature > 25.0);
}

#[test]
fn always_on_drift_reported_every_tick() {
    let (mut c, mut sink) = make_controller(fixed_config(25.0));
    c.start(None, None, &mut sink).unwrap();
    run_batch(&mut c, 3, &mut sink);
    assert!(c.snapshot().history.iter().all(|s| s.drift_applied));
}
