use super::*;

fn page() -> LayoutSnapshot {
    LayoutSnapshot::new(Viewport::new(1000.0, 800.0).unwrap(), 3400.0)
        .with_element("hero", 0.0, 800.0)
        .with_element("hero-title", 200.0, 100.0)
        .with_element("experience", 800.0, 800.0)
        .with_element("color", 1600.0, 800.0)
        .with_element("footer", 3000.0, 400.0)
}

fn pin(element: &str) -> TriggerSpec {
    TriggerSpec::parse(element, "top top", "+=130%").unwrap()
}

#[test]
fn unpinned_layout_matches_snapshot() {
    let layout = ResolvedLayout::unpinned(page());
    assert_eq!(layout.max_scroll(), 2600.0);
    assert_eq!(layout.top_of(&ElementId::new("color")), Some(1600.0));
    assert_eq!(
        layout.element_rect(&ElementId::new("footer")),
        page().element_rect(&ElementId::new("footer"))
    );
}

#[test]
fn pins_push_following_content_down() {
    let hero = pin("hero");
    let color = pin("color");
    let (layout, ranges) = ResolvedLayout::solve(page(), &[&hero, &color]);

    assert_eq!(ranges[0], Some(ResolvedRange { start: 0.0, end: 1040.0 }));
    assert_eq!(ranges[1], Some(ResolvedRange { start: 2640.0, end: 3680.0 }));

    // Content inside the pinned section does not move.
    assert_eq!(layout.top_of(&ElementId::new("hero-title")), Some(200.0));
    // Natural top exactly at the pinned bottom counts as below it.
    assert_eq!(layout.top_of(&ElementId::new("experience")), Some(1840.0));
    assert_eq!(layout.top_of(&ElementId::new("footer")), Some(5080.0));

    assert_eq!(layout.total_pin_distance(), 2080.0);
    assert_eq!(layout.document_height(), 5480.0);
    assert_eq!(layout.max_scroll(), 4680.0);
}

#[test]
fn declaration_order_does_not_change_spacing() {
    let hero = pin("hero");
    let color = pin("color");
    let (forward, _) = ResolvedLayout::solve(page(), &[&hero, &color]);
    let (reversed, ranges) = ResolvedLayout::solve(page(), &[&color, &hero]);

    assert_eq!(forward.spacers(), reversed.spacers());
    assert_eq!(ranges[0], Some(ResolvedRange { start: 2640.0, end: 3680.0 }));
}

#[test]
fn unmeasured_pin_inserts_no_spacing() {
    let ghost = pin("ghost");
    let hero = pin("hero");
    let (layout, ranges) = ResolvedLayout::solve(page(), &[&ghost, &hero]);
    assert_eq!(ranges[0], None);
    assert!(ranges[1].is_some());
    assert_eq!(layout.spacers().len(), 1);
}

#[test]
fn zero_height_pin_is_unresolved() {
    let snap = page().with_element("hero", 0.0, 0.0);
    let hero = pin("hero");
    let (layout, ranges) = ResolvedLayout::solve(snap, &[&hero]);
    assert_eq!(ranges, vec![None]);
    assert_eq!(layout.total_pin_distance(), 0.0);
}

#[test]
fn short_page_has_no_scroll() {
    let snap = LayoutSnapshot::new(Viewport::new(1000.0, 800.0).unwrap(), 600.0);
    assert_eq!(ResolvedLayout::unpinned(snap).max_scroll(), 0.0);
}

#[test]
fn snapshot_json_is_validated() {
    let ok = r#"{
        "viewport": {"width": 1280, "height": 720},
        "document_height": 4000,
        "elements": {"hero": {"top": 0, "height": 720}}
    }"#;
    let snap = LayoutSnapshot::from_json(ok).unwrap();
    assert_eq!(snap.element(&ElementId::new("hero")).unwrap().bottom(), 720.0);

    let bad = r#"{
        "viewport": {"width": 1280, "height": 720},
        "document_height": 4000,
        "elements": {"hero": {"top": 0, "height": -1}}
    }"#;
    let err = LayoutSnapshot::from_json(bad).unwrap_err();
    assert!(err.to_string().contains("negative height"));

    let no_vp = r#"{"viewport": {"width": 0, "height": 720}, "document_height": 1}"#;
    assert!(LayoutSnapshot::from_json(no_vp).is_err());
}
