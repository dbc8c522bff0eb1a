use std::collections::BTreeMap;
use std::time::Duration;

use crate::{
    animation::track::PropertyValues,
    composition::model::{PageSpec, SectionSpec},
    eval::evaluator::{BindingFrame, FrameState, ResolvedPage, SectionFrame},
    foundation::core::SectionId,
    foundation::error::{ScrubError, ScrubResult},
    layout::solver::LayoutSnapshot,
    scroll::pin::{PinController, PinFrame},
    scroll::scrub::ScrubSmoother,
    scroll::trigger::progress_or_inactive,
    session::config::SessionOpts,
    snap::coordinator::{PinnedRegion, RegionId, SnapRegistry},
    snap::tween::SnapTween,
};

// Snap offsets closer than this are treated as already resting.
const SNAP_EPS_PX: f64 = 0.5;

/// Handle returned by [`PageSession::mount`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MountHandle(u64);

#[derive(Clone, Debug, Default)]
struct BindingRuntime {
    pin: PinController,
    smoother: ScrubSmoother,
}

#[derive(Clone, Debug)]
struct SectionRuntime {
    handle: MountHandle,
    bindings: Vec<BindingRuntime>,
}

/// Owner of all per-page animation state.
///
/// Single-threaded and driven by the host: feed layout snapshots, call
/// [`Self::tick`] once per frame with the scroll offset and a monotonic
/// timestamp, and forward momentum-settled events to
/// [`Self::on_momentum_settled`].
#[derive(Debug)]
pub struct PageSession {
    opts: SessionOpts,
    // Parallel vectors, in mount order.
    specs: Vec<SectionSpec>,
    runtime: Vec<SectionRuntime>,
    next_handle: u64,

    snapshot: Option<LayoutSnapshot>,
    resolved: Option<ResolvedPage>,
    layout_dirty: bool,
    layout_deadline: Option<Duration>,
    layout_passes: u64,

    registry: SnapRegistry,
    regions: BTreeMap<SectionId, RegionId>,

    last_tick: Option<Duration>,
    last_mount_at: Option<Duration>,
}

impl PageSession {
    /// Empty session.
    pub fn new(opts: SessionOpts) -> ScrubResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            specs: Vec::new(),
            runtime: Vec::new(),
            next_handle: 0,
            snapshot: None,
            resolved: None,
            layout_dirty: false,
            layout_deadline: None,
            layout_passes: 0,
            registry: SnapRegistry::new(),
            regions: BTreeMap::new(),
            last_tick: None,
            last_mount_at: None,
        })
    }

    /// Session with every section of `page` mounted at `now`.
    pub fn from_page(page: &PageSpec, now: Duration) -> ScrubResult<Self> {
        page.validate()?;
        let mut session = Self::new(page.session_opts())?;
        for section in &page.sections {
            session.mount(section.clone(), now)?;
        }
        Ok(session)
    }

    /// Engine options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Add a section. Its bindings become active on the next layout pass.
    #[tracing::instrument(skip(self, section), fields(section = %section.id))]
    pub fn mount(&mut self, section: SectionSpec, now: Duration) -> ScrubResult<MountHandle> {
        section.validate()?;
        if self.specs.iter().any(|s| s.id == section.id) {
            return Err(ScrubError::validation(format!(
                "section '{}' is already mounted",
                section.id
            )));
        }
        let handle = MountHandle(self.next_handle);
        self.next_handle += 1;
        self.runtime.push(SectionRuntime {
            handle,
            bindings: vec![BindingRuntime::default(); section.bindings.len()],
        });
        self.specs.push(section);
        self.last_mount_at = Some(now);
        self.layout_dirty = true;
        tracing::debug!(mounted = self.specs.len(), "section mounted");
        Ok(handle)
    }

    /// Remove a section with its pin state, smoothers and snap region.
    pub fn unmount(&mut self, handle: MountHandle) -> Option<SectionSpec> {
        let idx = self.runtime.iter().position(|r| r.handle == handle)?;
        self.runtime.remove(idx);
        let spec = self.specs.remove(idx);
        if let Some(region) = self.regions.remove(&spec.id) {
            self.registry.unregister(region);
        }
        self.layout_dirty = true;
        tracing::debug!(section = %spec.id, "section unmounted");
        Some(spec)
    }

    /// Drop every section, region and measurement.
    pub fn teardown(&mut self) {
        self.specs.clear();
        self.runtime.clear();
        self.registry.clear();
        self.regions.clear();
        self.snapshot = None;
        self.resolved = None;
        self.layout_dirty = false;
        self.layout_deadline = None;
        self.last_tick = None;
        self.last_mount_at = None;
        tracing::debug!("session torn down");
    }

    /// Ids of mounted sections in mount order.
    pub fn mounted(&self) -> impl Iterator<Item = &SectionId> {
        self.specs.iter().map(|s| &s.id)
    }

    /// Handle of a mounted section.
    pub fn handle_of(&self, id: &SectionId) -> Option<MountHandle> {
        let idx = self.specs.iter().position(|s| &s.id == id)?;
        Some(self.runtime[idx].handle)
    }

    /// New measurements; applied on the next tick.
    pub fn set_layout(&mut self, snapshot: LayoutSnapshot) -> ScrubResult<()> {
        snapshot.validate()?;
        self.snapshot = Some(snapshot);
        self.layout_dirty = true;
        Ok(())
    }

    /// New measurements after a resize; applied once resizing has been quiet
    /// for the debounce window.
    pub fn on_resize(&mut self, snapshot: LayoutSnapshot, now: Duration) -> ScrubResult<()> {
        snapshot.validate()?;
        self.snapshot = Some(snapshot);
        self.invalidate_layout(now);
        Ok(())
    }

    /// Schedule a debounced layout pass with the current measurements.
    pub fn invalidate_layout(&mut self, now: Duration) {
        self.layout_deadline = Some(now + self.opts.resize_debounce());
    }

    /// Whether a layout pass is waiting to run.
    pub fn is_layout_pending(&self) -> bool {
        self.layout_dirty || self.layout_deadline.is_some()
    }

    /// Number of layout passes actually run.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    /// Result of the last layout pass.
    pub fn resolved(&self) -> Option<&ResolvedPage> {
        self.resolved.as_ref()
    }

    /// Largest reachable scroll offset (0 before the first layout pass).
    pub fn max_scroll(&self) -> f64 {
        self.resolved.as_ref().map_or(0.0, ResolvedPage::max_scroll)
    }

    /// Registered pinned regions ordered by start offset.
    pub fn pinned_regions(&self) -> impl Iterator<Item = &PinnedRegion> {
        self.registry.regions()
    }

    /// Snap registry.
    pub fn registry(&self) -> &SnapRegistry {
        &self.registry
    }

    /// Snap target for the scroll fraction `v` over the current regions.
    pub fn snap_target(&self, v: f64) -> f64 {
        self.registry
            .snap_target(v, self.max_scroll(), self.opts.snap_tolerance)
    }

    /// Scroll offset for navigating to `section`.
    pub fn scroll_target(&self, section: &SectionId) -> Option<f64> {
        self.resolved.as_ref()?.scroll_target(section)
    }

    /// Whether settle events may snap at `now`.
    pub fn is_snap_armed(&self, now: Duration) -> bool {
        match self.last_mount_at {
            Some(at) => now >= at + self.opts.settle_delay(),
            None => false,
        }
    }

    /// Scroll momentum came to rest at `scroll_y`.
    ///
    /// Returns the tween to run when the position should move to a pinned
    /// region's center, `None` when it already rests where it should,
    /// snapping is not armed yet, or a debounced layout pass is still waiting.
    /// A layout pass that is due runs first.
    #[tracing::instrument(skip(self))]
    pub fn on_momentum_settled(&mut self, scroll_y: f64, now: Duration) -> Option<SnapTween> {
        if !self.is_snap_armed(now) || !scroll_y.is_finite() {
            return None;
        }
        self.maybe_layout(now);
        if self.layout_deadline.is_some() {
            return None;
        }
        let resolved = self.resolved.as_ref()?;
        let max = resolved.max_scroll();
        if !(max > 0.0) {
            return None;
        }
        let v = (scroll_y / max).clamp(0.0, 1.0);
        let to = self.snap_target(v) * max;
        if (to - scroll_y).abs() < SNAP_EPS_PX {
            return None;
        }
        let viewport_h = resolved.layout().snapshot().viewport.height;
        let tween = SnapTween::new(scroll_y, to, viewport_h, &self.opts.snap_timing());
        tracing::debug!(from = scroll_y, to, secs = tween.duration.as_secs_f64(), "snap");
        Some(tween)
    }

    /// Advance all bindings to `scroll_y` at time `now` and report the frame.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, scroll_y: f64, now: Duration) -> FrameState {
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        self.maybe_layout(now);

        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
        self.last_tick = Some(now);

        let Some(resolved) = self.resolved.as_ref() else {
            return self.unresolved_frame(scroll_y);
        };
        let fixed = resolved.fixed_pin_at(scroll_y);

        let mut sections = Vec::with_capacity(self.specs.len());
        for (si, (section, runtime)) in resolved
            .sections()
            .iter()
            .zip(self.runtime.iter_mut())
            .enumerate()
        {
            let mut values = PropertyValues::default();
            let mut bindings = Vec::with_capacity(section.bindings.len());
            for (bi, (binding, rt)) in section
                .bindings
                .iter()
                .zip(runtime.bindings.iter_mut())
                .enumerate()
            {
                let raw = progress_or_inactive(binding.range, scroll_y);
                let progress = if binding.range.is_some() {
                    rt.smoother.advance(raw, dt, binding.scrub)
                } else {
                    rt.smoother.reset();
                    raw
                };
                binding.evaluate_into(progress, &mut values);

                let pin = binding.pin.then(|| {
                    let frame = rt.pin.update(scroll_y);
                    if frame.state.is_fixed() && fixed != Some((si, bi)) {
                        rt.pin.demote(frame)
                    } else {
                        frame
                    }
                });
                bindings.push(BindingFrame {
                    progress,
                    scroll_progress: raw,
                    range: binding.range,
                    pin,
                });
            }
            sections.push(SectionFrame {
                id: section.id.clone(),
                bindings,
                values,
            });
        }

        FrameState {
            scroll_y,
            progress_fraction: resolved.progress_fraction(scroll_y),
            scrolled: scroll_y > self.opts.nav_scrolled_threshold_px,
            sections,
        }
    }

    fn unresolved_frame(&self, scroll_y: f64) -> FrameState {
        let sections = self
            .specs
            .iter()
            .map(|s| SectionFrame {
                id: s.id.clone(),
                bindings: s
                    .bindings
                    .iter()
                    .map(|b| BindingFrame {
                        progress: 0.0,
                        scroll_progress: 0.0,
                        range: None,
                        pin: b.pin.then(PinFrame::default),
                    })
                    .collect(),
                values: PropertyValues::default(),
            })
            .collect();
        FrameState {
            scroll_y,
            progress_fraction: 0.0,
            scrolled: scroll_y > self.opts.nav_scrolled_threshold_px,
            sections,
        }
    }

    fn maybe_layout(&mut self, now: Duration) {
        let due = self.layout_deadline.is_some_and(|d| now >= d);
        if !(self.layout_dirty || due) {
            return;
        }
        self.layout_dirty = false;
        if due {
            self.layout_deadline = None;
        }
        let Some(snapshot) = self.snapshot.clone() else {
            return;
        };
        match ResolvedPage::resolve(&self.specs, snapshot) {
            Ok(page) => self.apply_layout(page),
            Err(e) => {
                tracing::warn!(error = %e, "layout pass failed");
                self.resolved = None;
            }
        }
    }

    fn apply_layout(&mut self, page: ResolvedPage) {
        self.layout_passes += 1;

        for (section, runtime) in page.sections().iter().zip(self.runtime.iter_mut()) {
            for (binding, rt) in section.bindings.iter().zip(runtime.bindings.iter_mut()) {
                if binding.pin {
                    rt.pin.set_range(binding.range);
                }
            }
        }

        let mut live = BTreeMap::new();
        for region in page.pinned_regions() {
            let section = region.section.clone();
            let id = match self.regions.get(&section) {
                Some(&id) => match self.registry.update(id, region.start, region.end) {
                    Ok(true) => id,
                    _ => self.registry.register(region),
                },
                None => self.registry.register(region),
            };
            live.insert(section, id);
        }
        for (section, id) in std::mem::take(&mut self.regions) {
            if !live.contains_key(&section) {
                self.registry.unregister(id);
            }
        }
        self.regions = live;

        tracing::debug!(
            passes = self.layout_passes,
            max_scroll = page.max_scroll(),
            regions = self.registry.len(),
            "layout pass"
        );
        self.resolved = Some(page);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/page.rs"]
mod tests;
