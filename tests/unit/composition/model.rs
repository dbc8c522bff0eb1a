use super::*;

const HERO: &str = r#"{
  "sections": [
    {
      "id": "hero",
      "bindings": [
        {
          "trigger": {"element": "hero", "start": "top top", "end": "+=130%"},
          "pin": true,
          "scrub": 0.6,
          "tracks": [
            {
              "segments": [
                {"target": "hero-title", "property": "y", "from": "8vh", "to": 0,
                 "span": {"start": 0.0, "end": 0.3}, "ease": "power2.out"},
                {"target": "hero-title", "property": "y", "from": 0, "to": "-6vh",
                 "span": {"start": 0.7, "end": 1.0}, "ease": "power2.in"}
              ]
            }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn parses_pinned_section_manifest() {
    let page = PageSpec::from_json(HERO).unwrap();
    let hero = page.section("hero").unwrap();
    let binding = hero.pinned_binding().unwrap();
    assert_eq!(binding.scrub, Scrub::Smooth { lag_secs: 0.6 });
    assert_eq!(binding.trigger.end.to_string(), "+=130%");
    assert_eq!(page.session_opts(), SessionOpts::default());

    let seg = &binding.tracks[0].segments[0];
    assert_eq!(seg.from, Length::Vh(8.0));
    assert_eq!(seg.ease, Ease::OutCubic);
}

#[test]
fn tracks_resolve_against_the_viewport() {
    let page = PageSpec::from_json(HERO).unwrap();
    let binding = &page.sections[0].bindings[0];
    let vp = Viewport::new(1280.0, 800.0).unwrap();
    let tracks = binding.resolve_tracks(vp).unwrap();
    let values = tracks[0].evaluate(0.0);
    let y = values.get("hero-title", Property::Y).unwrap();
    assert!((y - 64.0).abs() < 1e-9);
    let values = tracks[0].evaluate(1.0);
    let y = values.get("hero-title", Property::Y).unwrap();
    assert!((y + 48.0).abs() < 1e-9);
}

#[test]
fn defaults_fill_optional_fields() {
    let json = r#"{"sections": [{"id": "services", "bindings": [{
        "trigger": {"element": "services", "start": "top 80%", "end": "top 30%"},
        "tracks": [{"segments": [{"target": "card", "property": "opacity", "from": 0, "to": 1}]}]
    }]}]}"#;
    let page = PageSpec::from_json(json).unwrap();
    let b = &page.sections[0].bindings[0];
    assert!(!b.pin);
    assert_eq!(b.scrub, Scrub::Immediate);
    let seg = &b.tracks[0].segments[0];
    assert_eq!(seg.span, Span::FULL);
    assert_eq!(seg.ease, Ease::OutQuad);
}

#[test]
fn rejects_duplicate_sections() {
    let json = r#"{"sections": [{"id": "a"}, {"id": "a"}]}"#;
    let err = PageSpec::from_json(json).unwrap_err();
    assert!(err.to_string().contains("duplicate section id 'a'"));
}

#[test]
fn rejects_two_pins_in_one_section() {
    let binding = r#"{"trigger": {"element": "a", "start": "top top", "end": "+=100%"}, "pin": true}"#;
    let json = format!(r#"{{"sections": [{{"id": "a", "bindings": [{binding}, {binding}]}}]}}"#);
    let err = PageSpec::from_json(&json).unwrap_err();
    assert!(err.to_string().contains("at most one"));
}

#[test]
fn rejects_overlapping_unlayered_segments() {
    let json = r#"{"sections": [{"id": "a", "bindings": [{
        "trigger": {"element": "a", "start": "top top", "end": "bottom top"},
        "tracks": [{"segments": [
            {"target": "t", "property": "opacity", "from": 0, "to": 1, "span": {"start": 0.0, "end": 0.6}},
            {"target": "t", "property": "opacity", "from": 1, "to": 0, "span": {"start": 0.5, "end": 1.0}}
        ]}]
    }]}]}"#;
    let err = PageSpec::from_json(json).unwrap_err();
    assert!(err.to_string().contains("section 'a' binding 0"));

    let layered = json.replace(r#""tracks": [{"#, r#""tracks": [{"layered": true, "#);
    assert!(PageSpec::from_json(&layered).is_ok());
}

#[test]
fn rejects_scrub_false_and_bad_marks() {
    let json = r#"{"sections": [{"id": "a", "bindings": [{
        "trigger": {"element": "a", "start": "top top", "end": "+=100%"}, "scrub": false
    }]}]}"#;
    assert!(PageSpec::from_json(json).is_err());

    let json = r#"{"sections": [{"id": "a", "bindings": [{
        "trigger": {"element": "a", "start": "top middle", "end": "+=100%"}
    }]}]}"#;
    assert!(PageSpec::from_json(json).is_err());
}

#[test]
fn session_block_is_validated() {
    let json = r#"{"sections": [], "session": {"snap_tolerance": 0.02}}"#;
    let page = PageSpec::from_json(json).unwrap();
    assert_eq!(page.session_opts().snap_tolerance, 0.02);

    let json = r#"{"sections": [], "session": {"snap_tolerance": -1}}"#;
    assert!(PageSpec::from_json(json).is_err());
}

#[test]
fn json_round_trip_preserves_manifest() {
    let page = PageSpec::from_json(HERO).unwrap();
    let text = page.to_json_pretty().unwrap();
    assert_eq!(PageSpec::from_json(&text).unwrap(), page);
}
