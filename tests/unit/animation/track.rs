use super::*;

fn seg(target: &str, property: Property, from: f64, to: f64, span: (f64, f64), ease: Ease) -> Segment {
    Segment {
        target: PropertyTarget::new(target, property),
        from,
        to,
        span: Span::new(span.0, span.1).unwrap(),
        ease,
    }
}

fn entrance_exit() -> TimelineTrack {
    TimelineTrack::new(
        vec![
            seg("card", Property::Opacity, 0.0, 1.0, (0.0, 0.3), Ease::Linear),
            seg("card", Property::Opacity, 1.0, 0.0, (0.7, 1.0), Ease::Linear),
        ],
        false,
    )
    .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn holds_last_value_between_segments() {
    let track = entrance_exit();
    assert_eq!(track.evaluate(0.5).get("card", Property::Opacity), Some(1.0));
}

#[test]
fn interpolates_inside_exit_segment() {
    let track = entrance_exit();
    let v = track.evaluate(0.85).get("card", Property::Opacity).unwrap();
    assert!(close(v, 0.5), "got {v}");
}

#[test]
fn boundaries_resolve_to_segment_endpoints() {
    let track = entrance_exit();
    let at = |p: f64| track.evaluate(p).get("card", Property::Opacity).unwrap();
    assert_eq!(at(0.0), 0.0);
    assert_eq!(at(0.3), 1.0);
    assert_eq!(at(0.7), 1.0);
    assert_eq!(at(1.0), 0.0);
    // Out-of-range progress is clamped.
    assert_eq!(at(-4.0), 0.0);
    assert_eq!(at(9.0), 0.0);
}

#[test]
fn mirrored_progress_reproduces_mirrored_values() {
    let track = entrance_exit();
    for i in 0..=20 {
        let p = i as f64 / 20.0;
        let a = track.evaluate(p).get("card", Property::Opacity).unwrap();
        let b = track.evaluate(1.0 - p).get("card", Property::Opacity).unwrap();
        assert!(close(a, b), "p={p}: {a} vs {b}");
    }
}

#[test]
fn scrubbing_backward_matches_forward() {
    let track = TimelineTrack::new(
        vec![
            seg("img", Property::Scale, 1.1, 1.0, (0.0, 0.3), Ease::OutCubic),
            seg("img", Property::Scale, 1.0, 1.08, (0.7, 1.0), Ease::InCubic),
            seg("img", Property::X, -80.0, 0.0, (0.05, 0.3), Ease::Linear),
        ],
        false,
    )
    .unwrap();

    let steps: Vec<f64> = (0..=50).map(|i| i as f64 / 50.0).collect();
    let forward: Vec<PropertyValues> = steps.iter().map(|&p| track.evaluate(p)).collect();
    let backward: Vec<PropertyValues> = steps.iter().rev().map(|&p| track.evaluate(p)).collect();
    for (f, b) in forward.iter().zip(backward.iter().rev()) {
        assert_eq!(f, b);
    }
}

#[test]
fn before_first_segment_holds_from_value() {
    let track = TimelineTrack::new(
        vec![seg("headline", Property::X, 144.0, 0.0, (0.05, 0.3), Ease::Linear)],
        false,
    )
    .unwrap();
    assert_eq!(track.evaluate(0.0).get("headline", Property::X), Some(144.0));
}

#[test]
fn overlapping_segments_require_layered_flag() {
    let segs = vec![
        seg("a", Property::Opacity, 0.0, 1.0, (0.0, 0.6), Ease::Linear),
        seg("a", Property::Opacity, 1.0, 0.0, (0.4, 1.0), Ease::Linear),
    ];
    let err = TimelineTrack::new(segs.clone(), false).unwrap_err();
    assert!(err.to_string().contains("a.opacity"));

    let track = TimelineTrack::new(segs, true).unwrap();
    // Later-starting segment wins inside the overlap.
    let v = track.evaluate(0.5).get("a", Property::Opacity).unwrap();
    assert!(close(v, 1.0 - (0.1 / 0.6)), "got {v}");
}

#[test]
fn different_properties_may_share_spans() {
    let track = TimelineTrack::new(
        vec![
            seg("a", Property::Opacity, 0.0, 1.0, (0.0, 0.5), Ease::Linear),
            seg("a", Property::Y, 24.0, 0.0, (0.0, 0.5), Ease::Linear),
            seg("b", Property::Opacity, 0.0, 1.0, (0.0, 0.5), Ease::Linear),
        ],
        false,
    )
    .unwrap();
    assert_eq!(track.evaluate(0.25).len(), 3);
    assert_eq!(track.targets().count(), 3);
}

#[test]
fn rejects_non_finite_values_and_bad_spans() {
    assert!(Span::new(0.5, 0.5).is_err());
    assert!(Span::new(-0.1, 0.5).is_err());
    assert!(Span::new(0.2, 1.2).is_err());

    let bad = Segment {
        target: PropertyTarget::new("a", Property::Y),
        from: f64::NAN,
        to: 0.0,
        span: Span::FULL,
        ease: Ease::Linear,
    };
    assert!(TimelineTrack::new(vec![bad], false).is_err());
}

#[test]
fn stagger_fits_inside_span() {
    let spans = Span::new(0.12, 0.3).unwrap().stagger(4, 0.03).unwrap();
    assert_eq!(spans.len(), 4);
    assert!(close(spans[0].start, 0.12));
    assert!(close(spans[3].start, 0.21));
    assert_eq!(spans[3].end, 0.3);
    for s in &spans {
        assert!(close(s.len(), 0.09));
    }

    assert!(Span::new(0.0, 0.2).unwrap().stagger(5, 0.1).is_err());
    assert!(Span::FULL.stagger(0, 0.1).unwrap().is_empty());
}

#[test]
fn property_target_round_trips_through_text() {
    let t: PropertyTarget = "scroll-line.scaleX".parse().unwrap();
    assert_eq!(t, PropertyTarget::new("scroll-line", Property::ScaleX));
    assert_eq!(t.to_string(), "scroll-line.scaleX");
    assert!("opacity".parse::<PropertyTarget>().is_err());
    assert!("a.blur".parse::<PropertyTarget>().is_err());
}

#[test]
fn values_serialize_with_dotted_keys_and_compose_transforms() {
    let mut values = PropertyValues::default();
    values.insert(PropertyTarget::new("img", Property::X), 10.0);
    values.insert(PropertyTarget::new("img", Property::Scale), 2.0);
    values.insert(PropertyTarget::new("img", Property::Opacity), 0.5);

    let json = serde_json::to_value(&values).unwrap();
    assert_eq!(json["img.x"], 10.0);
    assert_eq!(json["img.opacity"], 0.5);

    let expected = Affine::translate(Vec2::new(10.0, 0.0)) * Affine::scale(2.0);
    assert_eq!(values.transform("img"), expected);
    assert_eq!(values.transform("missing"), Affine::IDENTITY);
}
