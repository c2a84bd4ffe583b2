use vitals::core::telemetry::fallback::{self, Provenance};
use vitals::core::telemetry::{TemperatureEstimator, UNAVAILABLE};

#[test]
fn estimation_is_deterministic_under_an_injected_clock() {
    let estimator = TemperatureEstimator::new(true);
    let a = estimator.estimate_at(62.0, 37.25);
    let b = estimator.estimate_at(62.0, 37.25);
    assert_eq!(a, b);
}

#[test]
fn estimation_without_jitter_matches_the_base_plus_scaling_formula() {
    let estimator = TemperatureEstimator::new(false);
    for (load, expected) in [(0.0, 34.0), (50.0, 56.5), (100.0, 79.0)] {
        assert_eq!(estimator.estimate_at(load, 0.0), expected);
    }
}

#[test]
fn estimation_never_leaves_the_plausible_band() {
    let estimator = TemperatureEstimator::new(true);
    for load in [-10.0, 0.0, 25.0, 50.0, 75.0, 100.0, 250.0] {
        for secs in 0..200 {
            let value = estimator.estimate_at(load, secs as f64);
            assert!((30.0..=95.0).contains(&value));
        }
    }
}

#[test]
fn measured_beats_derived_beats_estimated() {
    assert_eq!(
        fallback::resolve(Some(63.0), Some(50.0), Some(40.0)),
        (63.0, Provenance::Sensor)
    );
    assert_eq!(
        fallback::resolve(None, Some(50.0), Some(40.0)),
        (50.0, Provenance::Derived)
    );
    assert_eq!(
        fallback::resolve(None, None, Some(40.0)),
        (40.0, Provenance::Estimated)
    );
    assert_eq!(
        fallback::resolve(None, None, None),
        (UNAVAILABLE, Provenance::None)
    );
}

#[test]
fn known_distinguishes_sentinels_from_measured_zero() {
    assert!(fallback::known(0.0));
    assert!(fallback::known(42.0));
    assert!(!fallback::known(UNAVAILABLE));
}
