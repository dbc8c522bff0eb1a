use super::*;

fn controller() -> PinController {
    let mut c = PinController::new();
    c.set_range(Some(ResolvedRange {
        start: 1000.0,
        end: 2000.0,
    }));
    c
}

#[test]
fn walks_the_full_cycle_when_scrolling_down() {
    let mut c = controller();
    let states: Vec<PinState> = [500.0, 1000.0, 1500.0, 1999.0, 2000.0, 2500.0]
        .into_iter()
        .map(|y| c.update(y).state)
        .collect();
    assert_eq!(
        states,
        vec![
            PinState::Unpinned,
            PinState::EnteringPin,
            PinState::Pinned,
            PinState::Pinned,
            PinState::LeavingPin,
            PinState::Unpinned,
        ]
    );
}

#[test]
fn is_reusable_when_scrolling_back_up() {
    let mut c = controller();
    c.update(2500.0);
    assert_eq!(c.update(1800.0).state, PinState::EnteringPin);
    assert_eq!(c.update(1200.0).state, PinState::Pinned);
    assert_eq!(c.update(900.0).state, PinState::LeavingPin);
    assert_eq!(c.update(0.0).state, PinState::Unpinned);
}

#[test]
fn fast_flick_over_the_range_is_not_skipped() {
    let mut c = controller();
    c.update(0.0);
    let f = c.update(9000.0);
    assert_eq!(f.state, PinState::LeavingPin);
    assert_eq!(f.progress, 1.0);
    assert_eq!(f.offset_px, 1000.0);

    let back = c.update(0.0);
    assert_eq!(back.state, PinState::LeavingPin);
    assert_eq!(back.progress, 0.0);
}

#[test]
fn local_progress_and_offset_follow_scroll() {
    let mut c = controller();
    c.update(0.0);
    let f = c.update(1250.0);
    assert_eq!(f.progress, 0.25);
    assert_eq!(f.offset_px, 250.0);
    assert!(f.state.is_fixed());
}

#[test]
fn first_update_inside_enters_pin() {
    let mut c = controller();
    assert_eq!(c.update(1500.0).state, PinState::EnteringPin);
    assert_eq!(c.phase_at(1500.0), Some(PinPhase::Inside));
}

#[test]
fn unresolved_range_stays_unpinned() {
    let mut c = PinController::new();
    let f = c.update(1500.0);
    assert_eq!(f.state, PinState::Unpinned);
    assert_eq!(f.progress, 0.0);
    assert_eq!(c.phase_at(1500.0), None);
}

#[test]
fn degenerate_range_never_fixes() {
    let mut c = PinController::new();
    c.set_range(Some(ResolvedRange {
        start: 1000.0,
        end: 1000.0,
    }));
    assert_eq!(c.update(1000.0).state, PinState::Unpinned);
    assert_eq!(c.update(1000.0).progress, 1.0);
}

#[test]
fn demotion_releases_and_re_enters() {
    let mut c = controller();
    c.update(1100.0);
    let f = c.update(1200.0);
    assert_eq!(f.state, PinState::Pinned);

    let demoted = c.demote(f);
    assert_eq!(demoted.state, PinState::LeavingPin);
    assert_eq!(c.state(), PinState::LeavingPin);

    // Still inside on the next tick and not demoted again: fresh entry.
    assert_eq!(c.update(1300.0).state, PinState::EnteringPin);
}

#[test]
fn repeated_demotion_reports_unpinned() {
    let mut c = controller();
    let f = c.update(1100.0);
    assert_eq!(c.demote(f).state, PinState::Unpinned);
    let f = c.update(1150.0);
    assert_eq!(f.state, PinState::EnteringPin);
    assert_eq!(c.demote(f).state, PinState::Unpinned);
}

#[test]
fn steady_frame_ignores_history() {
    let range = ResolvedRange {
        start: 1000.0,
        end: 2000.0,
    };
    let inside = PinFrame::steady(range, 1250.0);
    assert_eq!(inside.state, PinState::Pinned);
    assert_eq!(inside.progress, 0.25);
    assert_eq!(inside.offset_px, 250.0);

    let after = PinFrame::steady(range, 3000.0);
    assert_eq!(after.state, PinState::Unpinned);
    assert_eq!(after.offset_px, 1000.0);
    assert_eq!(PinFrame::steady(range, 0.0).offset_px, 0.0);
}
