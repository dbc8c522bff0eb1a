use super::*;
use crate::foundation::core::Viewport;

fn span(start: f64, end: f64) -> Span {
    Span::new(start, end).unwrap()
}

#[test]
fn builds_pinned_section_with_enter_and_exit() {
    let track = TrackBuilder::new()
        .tween(
            "color-copy",
            &[prop(Property::Opacity, 0.0, 1.0), prop(Property::Y, Length::vh(6.0), 0.0)],
            span(0.0, 0.3),
            Ease::OutCubic,
        )
        .tween(
            "color-copy",
            &[prop(Property::Opacity, 1.0, 0.0), prop(Property::Y, 0.0, Length::vh(-4.0))],
            span(0.7, 1.0),
            Ease::InCubic,
        )
        .build()
        .unwrap();
    assert_eq!(track.segments.len(), 4);

    let binding = BindingBuilder::scroll("color", "top top", "+=130%")
        .unwrap()
        .pin(true)
        .scrub_lag(0.6)
        .track(track)
        .build()
        .unwrap();
    let section = SectionBuilder::new("color").binding(binding).build().unwrap();
    let page = PageBuilder::new().section(section).unwrap().build().unwrap();

    assert_eq!(page.sections.len(), 1);
    let b = page.sections[0].pinned_binding().unwrap();
    assert_eq!(b.scrub, Scrub::Smooth { lag_secs: 0.6 });
}

#[test]
fn stagger_offsets_each_target() {
    let track = TrackBuilder::new()
        .stagger(
            ["card-0", "card-1", "card-2"],
            0.1,
            &[prop(Property::Opacity, 0.0, 1.0)],
            span(0.0, 0.6),
            Ease::Linear,
        )
        .unwrap()
        .build()
        .unwrap();

    let starts: Vec<f64> = track.segments.iter().map(|s| s.span.start).collect();
    assert_eq!(starts, vec![0.0, 0.1, 0.2]);
    assert_eq!(track.segments[2].span.end, 0.6);

    let resolved = track.resolve(Viewport::new(800.0, 600.0).unwrap()).unwrap();
    let values = resolved.evaluate(0.1);
    assert_eq!(values.get("card-1", Property::Opacity), Some(0.0));
    assert!(values.get("card-0", Property::Opacity).unwrap() > 0.0);
}

#[test]
fn stagger_that_does_not_fit_is_rejected() {
    let err = TrackBuilder::new()
        .stagger(
            ["a", "b", "c"],
            0.5,
            &[prop(Property::Opacity, 0.0, 1.0)],
            span(0.0, 1.0),
            Ease::Linear,
        )
        .err()
        .unwrap();
    assert!(err.to_string().contains("does not fit"));
}

#[test]
fn overlapping_tweens_need_a_layered_track() {
    let build = |layered| {
        TrackBuilder::new()
            .layered(layered)
            .from_to("t", Property::Scale, 0.9, 1.0, span(0.0, 0.6), Ease::OutQuad)
            .from_to("t", Property::Scale, 1.0, 1.1, span(0.4, 1.0), Ease::OutQuad)
            .build()
    };
    assert!(build(false).is_err());
    assert!(build(true).is_ok());
}

#[test]
fn duplicate_section_is_rejected_early() {
    let a = SectionBuilder::new("a").build().unwrap();
    let err = PageBuilder::new()
        .section(a.clone())
        .unwrap()
        .section(a)
        .err()
        .unwrap();
    assert!(err.to_string().contains("duplicate section id"));
}

#[test]
fn second_pin_in_a_section_is_rejected() {
    let pinned = || {
        BindingBuilder::scroll("hero", "top top", "+=100%")
            .unwrap()
            .pin(true)
            .build()
            .unwrap()
    };
    let err = SectionBuilder::new("hero")
        .binding(pinned())
        .binding(pinned())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("at most one"));
}

#[test]
fn invalid_marks_fail_to_parse() {
    assert!(BindingBuilder::scroll("hero", "top", "bottom top").is_ok());
    assert!(BindingBuilder::scroll("hero", "top top top", "+=100%").is_err());
    assert!(BindingBuilder::scroll("hero", "top top", "+=wide").is_err());
}

#[test]
fn binding_with_non_positive_lag_is_rejected() {
    for lag_secs in [0.0, -1.0] {
        let err = BindingBuilder::scroll("hero", "top top", "+=100%")
            .unwrap()
            .scrub(Scrub::Smooth { lag_secs })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("scrub lag"), "{err}");
    }
    assert!(
        BindingBuilder::scroll("hero", "top top", "+=100%")
            .unwrap()
            .scrub_lag(0.0)
            .build()
            .is_ok()
    );
}
