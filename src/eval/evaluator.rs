use crate::{
    animation::track::{PropertyValues, TimelineTrack},
    composition::model::SectionSpec,
    foundation::core::{ElementId, SectionId},
    foundation::error::ScrubResult,
    foundation::math::{clamp_unit, fraction_of},
    layout::solver::{LayoutSnapshot, ResolvedLayout},
    scroll::pin::{PinFrame, PinState},
    scroll::scrub::Scrub,
    scroll::trigger::{ResolvedRange, TriggerSpec, progress_or_inactive, resolve},
    snap::coordinator::PinnedRegion,
};

#[derive(Clone, Debug, serde::Serialize)]
/// Everything the host applies for one scroll position.
pub struct FrameState {
    /// Scroll offset this frame was evaluated at.
    pub scroll_y: f64,
    /// `scroll_y / max_scroll` in `[0, 1]` (0 when the page does not scroll).
    pub progress_fraction: f64,
    /// Scroll is past the navigation threshold.
    pub scrolled: bool,
    /// Per-section output in mount order.
    pub sections: Vec<SectionFrame>,
}

impl FrameState {
    /// Frame of one section.
    pub fn section(&self, id: &str) -> Option<&SectionFrame> {
        self.sections.iter().find(|s| s.id.as_str() == id)
    }
}

#[derive(Clone, Debug, serde::Serialize)]
/// Output of one section.
pub struct SectionFrame {
    /// Section id.
    pub id: SectionId,
    /// One entry per binding, in declaration order.
    pub bindings: Vec<BindingFrame>,
    /// Merged track values; later bindings overwrite earlier ones.
    pub values: PropertyValues,
}

impl SectionFrame {
    /// Pin output of the section's pinned binding.
    pub fn pin(&self) -> Option<PinFrame> {
        self.bindings.iter().find_map(|b| b.pin)
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
/// Output of one binding.
pub struct BindingFrame {
    /// Progress applied to the tracks (after scrub smoothing).
    pub progress: f64,
    /// Raw progress of the scroll position through the range.
    pub scroll_progress: f64,
    /// Range in scroll offsets; `None` until the trigger element is measured.
    pub range: Option<ResolvedRange>,
    /// Pin output for pinned bindings.
    pub pin: Option<PinFrame>,
}

/// A binding with its range and tracks resolved for one layout.
#[derive(Clone, Debug)]
pub struct ResolvedBinding {
    /// Source trigger.
    pub trigger: TriggerSpec,
    /// Resolved scroll range.
    pub range: Option<ResolvedRange>,
    /// Whether the trigger element is pinned.
    pub pin: bool,
    /// Scrub mode.
    pub scrub: Scrub,
    /// Tracks with viewport-relative values resolved.
    pub tracks: Vec<TimelineTrack>,
}

impl ResolvedBinding {
    /// Evaluate every track at `progress` into `out`.
    pub fn evaluate_into(&self, progress: f64, out: &mut PropertyValues) {
        for track in &self.tracks {
            track.evaluate_into(progress, out);
        }
    }
}

/// A section with resolved bindings.
#[derive(Clone, Debug)]
pub struct ResolvedSection {
    /// Section id.
    pub id: SectionId,
    /// Resolved bindings in declaration order.
    pub bindings: Vec<ResolvedBinding>,
}

/// Sections resolved against one layout snapshot, with pin spacing applied.
#[derive(Clone, Debug)]
pub struct ResolvedPage {
    layout: ResolvedLayout,
    sections: Vec<ResolvedSection>,
}

impl ResolvedPage {
    /// Run one layout pass.
    ///
    /// Pinned triggers are solved first so that every other trigger is
    /// measured against spacer-adjusted geometry.
    #[tracing::instrument(skip_all, fields(sections = sections.len()))]
    pub fn resolve(sections: &[SectionSpec], snapshot: LayoutSnapshot) -> ScrubResult<Self> {
        snapshot.validate()?;
        let viewport = snapshot.viewport;

        let pinned: Vec<&TriggerSpec> = sections
            .iter()
            .flat_map(|s| s.bindings.iter())
            .filter(|b| b.pin)
            .map(|b| &b.trigger)
            .collect();
        let (layout, pin_ranges) = ResolvedLayout::solve(snapshot, &pinned);
        let mut pin_ranges = pin_ranges.into_iter();

        let mut out = Vec::with_capacity(sections.len());
        for section in sections {
            let mut bindings = Vec::with_capacity(section.bindings.len());
            for binding in &section.bindings {
                let range = if binding.pin {
                    pin_ranges.next().flatten()
                } else {
                    resolve(&binding.trigger, &layout)
                };
                bindings.push(ResolvedBinding {
                    trigger: binding.trigger.clone(),
                    range,
                    pin: binding.pin,
                    scrub: binding.scrub,
                    tracks: binding.resolve_tracks(viewport)?,
                });
            }
            out.push(ResolvedSection {
                id: section.id.clone(),
                bindings,
            });
        }

        Ok(Self {
            layout,
            sections: out,
        })
    }

    /// Spacer-adjusted layout.
    pub fn layout(&self) -> &ResolvedLayout {
        &self.layout
    }

    /// Resolved sections.
    pub fn sections(&self) -> &[ResolvedSection] {
        &self.sections
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        self.layout.max_scroll()
    }

    /// `scroll_y` as a fraction of the scrollable distance.
    pub fn progress_fraction(&self, scroll_y: f64) -> f64 {
        fraction_of(scroll_y, self.max_scroll()).map_or(0.0, clamp_unit)
    }

    /// Pinned regions in section order, skipping unresolved pins.
    pub fn pinned_regions(&self) -> Vec<PinnedRegion> {
        self.sections
            .iter()
            .flat_map(|s| {
                s.bindings
                    .iter()
                    .filter(|b| b.pin)
                    .filter_map(|b| b.range)
                    .filter_map(|r| PinnedRegion::new(s.id.clone(), r.start, r.end).ok())
            })
            .collect()
    }

    /// Scroll offset that brings `section` to the top of the viewport.
    pub fn scroll_target(&self, section: &SectionId) -> Option<f64> {
        let top = self.layout.top_of(&ElementId::new(section.as_str()))?;
        Some(top.clamp(0.0, self.max_scroll()))
    }

    /// The pin that holds the viewport at `scroll_y`.
    ///
    /// Returns `(section index, binding index)` of the inside pin with the
    /// latest start, or `None` when no pin is inside. Other inside pins are
    /// released in its favor.
    pub fn fixed_pin_at(&self, scroll_y: f64) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for (si, section) in self.sections.iter().enumerate() {
            for (bi, binding) in section.bindings.iter().enumerate() {
                if !binding.pin {
                    continue;
                }
                let Some(range) = binding.range else { continue };
                if range.is_degenerate() || scroll_y < range.start || scroll_y >= range.end {
                    continue;
                }
                match best {
                    Some((_, start)) if start > range.start => {}
                    _ => best = Some(((si, bi), range.start)),
                }
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Stateless evaluator from a resolved page and scroll offset to a frame.
///
/// Scrub smoothing and pin transitions need history and live in
/// [`PageSession`](crate::PageSession); here progress is applied directly
/// and pins report steady states.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate one scroll offset.
    #[tracing::instrument(skip(page))]
    pub fn eval_at(page: &ResolvedPage, scroll_y: f64, nav_threshold_px: f64) -> FrameState {
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        let fixed = page.fixed_pin_at(scroll_y);

        let sections = page
            .sections()
            .iter()
            .enumerate()
            .map(|(si, section)| {
                let mut values = PropertyValues::default();
                let bindings = section
                    .bindings
                    .iter()
                    .enumerate()
                    .map(|(bi, binding)| {
                        let progress = progress_or_inactive(binding.range, scroll_y);
                        binding.evaluate_into(progress, &mut values);
                        let pin = steady_pin(binding, scroll_y, fixed == Some((si, bi)));
                        BindingFrame {
                            progress,
                            scroll_progress: progress,
                            range: binding.range,
                            pin,
                        }
                    })
                    .collect();
                SectionFrame {
                    id: section.id.clone(),
                    bindings,
                    values,
                }
            })
            .collect();

        FrameState {
            scroll_y,
            progress_fraction: page.progress_fraction(scroll_y),
            scrolled: scroll_y > nav_threshold_px,
            sections,
        }
    }

    /// Evaluate `count` evenly spaced offsets from top to bottom.
    pub fn sweep(page: &ResolvedPage, count: usize, nav_threshold_px: f64) -> Vec<FrameState> {
        let max = page.max_scroll();
        let denom = count.saturating_sub(1).max(1) as f64;
        (0..count)
            .map(|i| Self::eval_at(page, max * i as f64 / denom, nav_threshold_px))
            .collect()
    }
}

fn steady_pin(binding: &ResolvedBinding, scroll_y: f64, holds: bool) -> Option<PinFrame> {
    if !binding.pin {
        return None;
    }
    let Some(range) = binding.range else {
        return Some(PinFrame::default());
    };
    let mut frame = PinFrame::steady(range, scroll_y);
    if !holds && frame.state.is_fixed() {
        frame.state = PinState::Unpinned;
    }
    Some(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
