use crate::scroll::trigger::ResolvedRange;

/// Where the scroll position sits relative to a pinned range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPhase {
    /// Above the range start.
    Before,
    /// In `[start, end)`.
    Inside,
    /// At or past the range end.
    After,
}

impl PinPhase {
    /// Phase of `scroll_y` relative to `range`.
    pub fn of(range: ResolvedRange, scroll_y: f64) -> Self {
        if range.is_degenerate() {
            // A collapsed pin can never hold the section.
            return if scroll_y < range.start {
                Self::Before
            } else {
                Self::After
            };
        }
        if scroll_y < range.start {
            Self::Before
        } else if scroll_y < range.end {
            Self::Inside
        } else {
            Self::After
        }
    }
}

/// Pin state reported to the section layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinState {
    /// In normal flow.
    #[default]
    Unpinned,
    /// Became fixed on this tick.
    EnteringPin,
    /// Fixed; scroll drives local progress.
    Pinned,
    /// Released on this tick (including a jump over the whole range).
    LeavingPin,
}

impl PinState {
    /// Whether the section is held at its viewport slot.
    pub fn is_fixed(self) -> bool {
        matches!(self, Self::EnteringPin | Self::Pinned)
    }

    fn transition(prev: Option<PinPhase>, now: PinPhase) -> Self {
        match (prev, now) {
            (Some(PinPhase::Inside), PinPhase::Inside) => Self::Pinned,
            (_, PinPhase::Inside) => Self::EnteringPin,
            (Some(PinPhase::Inside), _) => Self::LeavingPin,
            // Crossed the whole range between two ticks.
            (Some(PinPhase::Before), PinPhase::After) | (Some(PinPhase::After), PinPhase::Before) => {
                Self::LeavingPin
            }
            _ => Self::Unpinned,
        }
    }
}

/// Output of one pin evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct PinFrame {
    /// Reported state.
    pub state: PinState,
    /// Local progress through the pinned range.
    pub progress: f64,
    /// Vertical offset the section must be shifted by to stay in its slot.
    pub offset_px: f64,
}

impl PinFrame {
    /// History-free frame: `Pinned` inside the range, `Unpinned` elsewhere.
    pub fn steady(range: ResolvedRange, scroll_y: f64) -> Self {
        let state = match PinPhase::of(range, scroll_y) {
            PinPhase::Inside => PinState::Pinned,
            PinPhase::Before | PinPhase::After => PinState::Unpinned,
        };
        Self::with_state(state, range, scroll_y)
    }

    fn with_state(state: PinState, range: ResolvedRange, scroll_y: f64) -> Self {
        Self {
            state,
            progress: range.progress_at(scroll_y),
            offset_px: (scroll_y - range.start).clamp(0.0, range.len()),
        }
    }
}

/// Continuous pin state machine for one pinned binding.
///
/// Phases are recomputed from the absolute scroll position on every update,
/// so a fast flick cannot skip the pin: progress is clamped to the far end
/// and the crossing is reported as [`PinState::LeavingPin`].
#[derive(Clone, Debug, Default)]
pub struct PinController {
    range: Option<ResolvedRange>,
    last_phase: Option<PinPhase>,
    last_state: PinState,
    prior_state: PinState,
}

impl PinController {
    /// Controller with no resolved range yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pinned range after a layout pass. `None` releases the pin.
    pub fn set_range(&mut self, range: Option<ResolvedRange>) {
        if range.is_none() {
            self.last_phase = None;
            self.last_state = PinState::Unpinned;
            self.prior_state = PinState::Unpinned;
        }
        self.range = range;
    }

    /// Current pinned range.
    pub fn range(&self) -> Option<ResolvedRange> {
        self.range
    }

    /// State from the most recent update.
    pub fn state(&self) -> PinState {
        self.last_state
    }

    /// Phase of `scroll_y` without advancing the state machine.
    pub fn phase_at(&self, scroll_y: f64) -> Option<PinPhase> {
        self.range.map(|r| PinPhase::of(r, scroll_y))
    }

    /// Advance to `scroll_y`.
    pub fn update(&mut self, scroll_y: f64) -> PinFrame {
        let Some(range) = self.range else {
            return PinFrame {
                state: PinState::Unpinned,
                progress: 0.0,
                offset_px: 0.0,
            };
        };

        let phase = PinPhase::of(range, scroll_y);
        let state = PinState::transition(self.last_phase, phase);
        self.last_phase = Some(phase);
        self.prior_state = self.last_state;
        self.last_state = state;

        PinFrame::with_state(state, range, scroll_y)
    }

    /// Force the section out of fixed positioning for this tick.
    ///
    /// Used when a later-starting pin claims the viewport during a transient
    /// overlap. Call right after [`Self::update`] for the same tick; the next
    /// update reports a fresh entry if the scroll is still inside.
    pub fn demote(&mut self, frame: PinFrame) -> PinFrame {
        let state = if self.prior_state.is_fixed() {
            PinState::LeavingPin
        } else {
            PinState::Unpinned
        };
        self.last_phase = None;
        self.last_state = state;
        PinFrame { state, ..frame }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/pin.rs"]
mod tests;
