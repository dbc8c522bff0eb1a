use super::*;

#[test]
fn empty_document_is_all_defaults() {
    let opts = SessionOpts::from_json("{}").unwrap();
    assert_eq!(opts, SessionOpts::default());
    assert_eq!(opts.snap_tolerance, 0.005);
    assert_eq!(opts.settle_delay(), Duration::from_millis(500));
    assert_eq!(opts.resize_debounce(), Duration::from_millis(120));
    assert_eq!(opts.nav_scrolled_threshold_px, 100.0);
}

#[test]
fn partial_override_keeps_other_defaults() {
    let opts = SessionOpts::from_json(r#"{"snap_tolerance": 0.02, "settle_delay_ms": 0}"#).unwrap();
    assert_eq!(opts.snap_tolerance, 0.02);
    assert_eq!(opts.settle_delay(), Duration::ZERO);
    assert_eq!(opts.resize_debounce_ms, 120);
}

#[test]
fn snap_timing_uses_duration_bounds() {
    let timing = SessionOpts::default().snap_timing();
    assert!((timing.min.as_secs_f64() - 0.15).abs() < 1e-9);
    assert!((timing.max.as_secs_f64() - 0.35).abs() < 1e-9);
    assert_eq!(timing.ease, Ease::OutCubic);
}

#[test]
fn rejects_bad_values() {
    assert!(SessionOpts::from_json(r#"{"snap_tolerance": -0.1}"#).is_err());
    assert!(
        SessionOpts::from_json(r#"{"snap_duration_min_secs": 1.0, "snap_duration_max_secs": 0.5}"#)
            .is_err()
    );
    assert!(SessionOpts::from_json(r#"{"snap_tolrance": 0.1}"#).is_err());
    assert!(SessionOpts::from_json(r#"{"settle_delay_ms": -5}"#).is_err());
}

#[test]
fn rejects_durations_too_long_for_a_tween() {
    let err = SessionOpts::from_json(r#"{"snap_duration_max_secs": 1e30}"#).unwrap_err();
    assert!(err.to_string().contains("snap_duration_max_secs"), "{err}");
    assert!(SessionOpts::from_json(r#"{"snap_duration_max_secs": 60.0}"#).is_ok());
}

#[test]
fn snap_timing_never_panics_on_unchecked_values() {
    let opts = SessionOpts {
        snap_duration_min_secs: f64::NAN,
        snap_duration_max_secs: 1e30,
        ..SessionOpts::default()
    };
    let timing = opts.snap_timing();
    assert!((timing.min.as_secs_f64() - 0.15).abs() < 1e-9);
    assert_eq!(timing.max, Duration::from_secs(60));
}
