//! Command dispatch and pacing.

use super::mock_sink::{ManualClock, fixed_config, make_controller};

use fuzzytherm::app::commands::AppCommand;
use fuzzytherm::app::events::AppEvent;
use fuzzytherm::config::AmbientMode;
use fuzzytherm::fsm::RunState;
use fuzzytherm::scheduler::ControlPacer;

#[test]
fn start_pause_resume_via_commands() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.handle_command(
        AppCommand::Start {
            initial: None,
            target: None,
        },
        &mut sink,
    )
    .unwrap();
    c.step(&mut sink).unwrap();
    c.handle_command(AppCommand::Pause, &mut sink).unwrap();
    assert_eq!(c.state(), RunState::Stopped);
    c.handle_command(AppCommand::Resume, &mut sink).unwrap();
    c.step(&mut sink).unwrap();
    assert_eq!(c.snapshot().step, 2);
}

#[test]
fn nudge_and_toggle_emit_events() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.handle_command(AppCommand::NudgeTarget(-0.5), &mut sink)
        .unwrap();
    c.handle_command(AppCommand::ToggleAmbientMode, &mut sink)
        .unwrap();
    assert_eq!(
        sink.events,
        vec![
            AppEvent::TargetChanged { target: 24.5 },
            AppEvent::AmbientChanged {
                mode: AmbientMode::Winter,
                temperature: 10.0
            },
        ]
    );
}

#[test]
fn rejected_command_returns_error() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    assert!(
        c.handle_command(AppCommand::SetTarget(1_000.0), &mut sink)
            .is_err()
    );
    assert!(
        c.handle_command(AppCommand::Reset { initial: Some(-1.0) }, &mut sink)
            .is_err()
    );
    assert!(sink.events.is_empty());
}

#[test]
fn set_ambient_mode_is_applied_on_next_tick() {
    let (mut c, mut sink) = make_controller(fixed_config(25.0));
    c.handle_command(AppCommand::SetAmbientMode(AmbientMode::Winter), &mut sink)
        .unwrap();
    c.start(None, None, &mut sink).unwrap();
    let sample = c.step(&mut sink).unwrap();
    // Winter pulls the room below target on the first tick.
    assert!(sample.temperature < 25.0);
    assert_eq!(c.snapshot().ambient_mode, AmbientMode::Winter);
}

#[test]
fn pacer_drives_ticks_from_a_clock() {
    let (mut c, mut sink) = make_controller(fixed_config(20.0));
    c.start(None, None, &mut sink).unwrap();
    let mut pacer = ControlPacer::new(500);
    let mut clock = ManualClock { now_us: 0 };

    // 2 simulated seconds polled every 16 ms.
    while clock.now_us <= 2_000_000 {
        if pacer.poll(&clock) {
            c.step(&mut sink).unwrap();
        }
        clock.now_us += 16_000;
    }
    assert_eq!(c.snapshot().step, 3);
}
