//! Property tests for the inference engine and the controller.

use fuzzytherm::ThermalController;
use fuzzytherm::config::{ControllerConfig, InitialTemperature};
use fuzzytherm::control::inference::InferenceEngine;
use fuzzytherm::control::membership::MembershipFunction;
use fuzzytherm::scheduler::run_batch;
use proptest::prelude::*;

fn default_engine() -> InferenceEngine {
    InferenceEngine::from_config(&ControllerConfig::default().fuzzy).unwrap()
}

fn arb_shape() -> impl Strategy<Value = MembershipFunction> {
    let tri = proptest::collection::vec(-50.0f64..50.0, 3).prop_map(|mut p| {
        p.sort_by(f64::total_cmp);
        MembershipFunction::Triangular(p[0], p[1], p[2])
    });
    let trap = proptest::collection::vec(-50.0f64..50.0, 4).prop_map(|mut p| {
        p.sort_by(f64::total_cmp);
        MembershipFunction::Trapezoidal(p[0], p[1], p[2], p[3])
    });
    prop_oneof![tri, trap]
}

// ── Membership ───────────────────────────────────────────────

proptest! {
    #[test]
    fn degree_is_bounded_and_zero_outside_support(
        shape in arb_shape(),
        x in -100.0f64..100.0,
    ) {
        let d = shape.degree(x);
        prop_assert!((0.0..=1.0).contains(&d));
        let (lo, hi) = shape.support();
        if x < lo || x > hi {
            prop_assert_eq!(d, 0.0);
        }
    }
}

// ── Weighted average stays in the convex hull ────────────────

proptest! {
    #[test]
    fn output_within_fired_strengths(
        error in -30.0f64..30.0,
        rate in -3.0f64..3.0,
    ) {
        let engine = default_engine();
        let out = engine.infer(&[error, rate]);

        let degrees: Vec<Vec<f64>> = engine
            .inputs()
            .iter()
            .zip([error, rate])
            .map(|(v, x)| v.fuzzify(x))
            .collect();
        let fired: Vec<f64> = engine
            .rules()
            .rules()
            .iter()
            .filter(|r| r.condition(&degrees) > 0.0)
            .map(|r| r.strength())
            .collect();

        if fired.is_empty() {
            prop_assert_eq!(out.output, 0.0);
        } else {
            let lo = fired.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = fired.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(out.output >= lo - 1e-9 && out.output <= hi + 1e-9,
                "output {} outside [{}, {}]", out.output, lo, hi);
        }
        prop_assert_eq!(out.fired, fired.len());
    }
}

// ── Controller ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn history_is_bounded_and_ordered(
        capacity in 1usize..50,
        ticks in 0u64..120,
        initial in 5.0f64..45.0,
    ) {
        let config = ControllerConfig {
            initial_temperature: InitialTemperature::Fixed(initial),
            history_capacity: capacity,
            ..ControllerConfig::default()
        };
        let mut c = ThermalController::configure(config).unwrap();
        c.start(None, None, &mut ()).unwrap();
        run_batch(&mut c, ticks, &mut ());

        let snap = c.snapshot();
        prop_assert_eq!(snap.step, ticks);
        prop_assert_eq!(snap.history.len() as u64, ticks.min(capacity as u64));
        prop_assert!(snap.history.windows(2).all(|w| w[0].time < w[1].time));
        prop_assert!(snap.history.iter().all(|s| (0.0..=100.0).contains(&s.temperature)));
        prop_assert!(snap.history.iter().all(|s| (-1.0..=1.0).contains(&s.control_output)));
    }

    #[test]
    fn snapshot_never_mutates(ticks in 0u64..30) {
        let config = ControllerConfig {
            initial_temperature: InitialTemperature::Fixed(30.0),
            ..ControllerConfig::default()
        };
        let mut c = ThermalController::configure(config).unwrap();
        c.start(None, None, &mut ()).unwrap();
        run_batch(&mut c, ticks, &mut ());
        let a = c.snapshot();
        let b = c.snapshot();
        prop_assert_eq!(a, b);
    }
}
