use super::*;
use crate::animation::ease::Ease;
use crate::animation::track::{Property, Span};
use crate::composition::dsl::{BindingBuilder, SectionBuilder, TrackBuilder};
use crate::foundation::core::Viewport;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fade_in_out(target: &str) -> crate::composition::model::TrackSpec {
    TrackBuilder::new()
        .from_to(target, Property::Opacity, 0.0, 1.0, Span::new(0.0, 0.3).unwrap(), Ease::Linear)
        .from_to(target, Property::Opacity, 1.0, 0.0, Span::new(0.7, 1.0).unwrap(), Ease::Linear)
        .build()
        .unwrap()
}

fn sections() -> Vec<SectionSpec> {
    let hero = SectionBuilder::new("hero")
        .binding(
            BindingBuilder::scroll("hero", "top top", "+=130%")
                .unwrap()
                .pin(true)
                .track(fade_in_out("hero-title"))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let experience = SectionBuilder::new("experience")
        .binding(
            BindingBuilder::scroll("experience", "top bottom", "bottom top")
                .unwrap()
                .track(
                    TrackBuilder::new()
                        .from_to("exp-image", Property::Y, 80.0, -80.0, Span::FULL, Ease::Linear)
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    vec![hero, experience]
}

fn snapshot() -> LayoutSnapshot {
    LayoutSnapshot::new(Viewport::new(1000.0, 800.0).unwrap(), 2400.0)
        .with_element("hero", 0.0, 800.0)
        .with_element("experience", 800.0, 800.0)
        .with_element("footer", 1600.0, 800.0)
}

fn page() -> ResolvedPage {
    ResolvedPage::resolve(&sections(), snapshot()).unwrap()
}

#[test]
fn resolves_pins_before_other_triggers() {
    let page = page();
    let hero = &page.sections()[0].bindings[0];
    assert_eq!(hero.range, Some(ResolvedRange { start: 0.0, end: 1040.0 }));

    // Experience sits below the hero spacer: natural 800 + 1040.
    let exp = &page.sections()[1].bindings[0];
    assert_eq!(exp.range, Some(ResolvedRange { start: 1040.0, end: 2640.0 }));

    assert_eq!(page.max_scroll(), 2400.0 + 1040.0 - 800.0);
}

#[test]
fn pinned_section_holds_and_animates() {
    let page = page();
    let frame = Evaluator::eval_at(&page, 520.0, 100.0);
    let hero = frame.section("hero").unwrap();
    let pin = hero.pin().unwrap();
    assert_eq!(pin.state, PinState::Pinned);
    assert_eq!(pin.offset_px, 520.0);
    assert_eq!(hero.bindings[0].progress, 0.5);
    assert_eq!(hero.values.get("hero-title", Property::Opacity), Some(1.0));

    let frame = Evaluator::eval_at(&page, 0.85 * 1040.0, 100.0);
    let opacity = frame
        .section("hero")
        .unwrap()
        .values
        .get("hero-title", Property::Opacity)
        .unwrap();
    assert!(approx(opacity, 0.5), "opacity={opacity}");
}

#[test]
fn past_the_pin_section_is_released() {
    let page = page();
    let frame = Evaluator::eval_at(&page, 1500.0, 100.0);
    let hero = frame.section("hero").unwrap();
    let pin = hero.pin().unwrap();
    assert_eq!(pin.state, PinState::Unpinned);
    assert_eq!(pin.offset_px, 1040.0);
    assert_eq!(hero.values.get("hero-title", Property::Opacity), Some(0.0));
}

#[test]
fn scrub_only_binding_tracks_scroll() {
    let page = page();
    let mid = Evaluator::eval_at(&page, 1840.0, 100.0);
    let exp = mid.section("experience").unwrap();
    assert_eq!(exp.pin(), None);
    assert_eq!(exp.bindings[0].progress, 0.5);
    assert_eq!(exp.values.get("exp-image", Property::Y), Some(0.0));
}

#[test]
fn frame_reports_scroll_fraction_and_nav_flag() {
    let page = page();
    let top = Evaluator::eval_at(&page, 50.0, 100.0);
    assert!(!top.scrolled);
    let below = Evaluator::eval_at(&page, 150.0, 100.0);
    assert!(below.scrolled);

    let end = Evaluator::eval_at(&page, page.max_scroll(), 100.0);
    assert_eq!(end.progress_fraction, 1.0);
    let nan = Evaluator::eval_at(&page, f64::NAN, 100.0);
    assert_eq!(nan.scroll_y, 0.0);
    assert_eq!(nan.progress_fraction, 0.0);
}

#[test]
fn unmeasured_trigger_is_inactive() {
    let snap = LayoutSnapshot::new(Viewport::new(1000.0, 800.0).unwrap(), 2400.0)
        .with_element("hero", 0.0, 800.0);
    let page = ResolvedPage::resolve(&sections(), snap).unwrap();
    let frame = Evaluator::eval_at(&page, 1200.0, 100.0);
    let exp = frame.section("experience").unwrap();
    assert_eq!(exp.bindings[0].range, None);
    assert_eq!(exp.bindings[0].progress, 0.0);
    assert_eq!(exp.values.get("exp-image", Property::Y), Some(80.0));
}

#[test]
fn overlapping_pins_fix_the_later_one() {
    let mut all = sections();
    all.push(
        SectionBuilder::new("inner")
            .binding(
                BindingBuilder::scroll("inner", "top top", "+=50%")
                    .unwrap()
                    .pin(true)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
    );
    let snap = snapshot().with_element("inner", 400.0, 200.0);
    let page = ResolvedPage::resolve(&all, snap).unwrap();
    assert_eq!(page.fixed_pin_at(500.0), Some((2, 0)));
    assert_eq!(page.fixed_pin_at(900.0), Some((0, 0)));
    assert_eq!(page.fixed_pin_at(5000.0), None);

    let frame = Evaluator::eval_at(&page, 500.0, 100.0);
    assert_eq!(frame.section("hero").unwrap().pin().unwrap().state, PinState::Unpinned);
    assert_eq!(frame.section("inner").unwrap().pin().unwrap().state, PinState::Pinned);
}

#[test]
fn pinned_regions_and_scroll_targets() {
    let page = page();
    let regions = page.pinned_regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].section, SectionId::new("hero"));
    assert_eq!((regions[0].start, regions[0].end), (0.0, 1040.0));

    assert_eq!(page.scroll_target(&SectionId::new("hero")), Some(0.0));
    assert_eq!(page.scroll_target(&SectionId::new("experience")), Some(1840.0));
    // Clamped to the reachable range.
    assert_eq!(page.scroll_target(&SectionId::new("footer")), Some(page.max_scroll()));
    assert_eq!(page.scroll_target(&SectionId::new("missing")), None);
}

#[test]
fn sweep_covers_both_ends() {
    let page = page();
    let frames = Evaluator::sweep(&page, 5, 100.0);
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0].scroll_y, 0.0);
    assert_eq!(frames[4].scroll_y, page.max_scroll());
    assert!(Evaluator::sweep(&page, 0, 100.0).is_empty());
}

#[test]
fn invalid_snapshot_is_a_layout_error() {
    let snap = LayoutSnapshot::new(Viewport { width: 0.0, height: 800.0 }, 100.0);
    let err = ResolvedPage::resolve(&sections(), snap).unwrap_err();
    assert!(err.to_string().starts_with("layout error:"));
}
