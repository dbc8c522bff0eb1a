use crate::{
    foundation::core::SectionId,
    foundation::error::{ScrubError, ScrubResult},
    foundation::math::fraction_of,
};

/// Default membership tolerance around each pinned region, as a scroll fraction.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 0.005;

/// Handle returned by [`SnapRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct RegionId(u64);

/// A pinned scroll interval in absolute pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PinnedRegion {
    /// Owning section.
    pub section: SectionId,
    /// Scroll offset where the pin starts.
    pub start: f64,
    /// Scroll offset where the pin releases.
    pub end: f64,
}

impl PinnedRegion {
    /// Build a region; bounds must be finite with `start <= end`.
    pub fn new(section: SectionId, start: f64, end: f64) -> ScrubResult<Self> {
        if !(start.is_finite() && end.is_finite()) {
            return Err(ScrubError::validation(format!(
                "pinned region for '{section}' has non-finite bounds"
            )));
        }
        if start > end {
            return Err(ScrubError::validation(format!(
                "pinned region for '{section}' starts after it ends"
            )));
        }
        Ok(Self {
            section,
            start,
            end,
        })
    }

    /// Midpoint in pixels.
    pub fn center(&self) -> f64 {
        self.start + (self.end - self.start) * 0.5
    }

    /// The region as fractions of `max_scroll`, or `None` without overflow.
    pub fn normalized(&self, max_scroll: f64) -> Option<NormalizedRegion> {
        Some(NormalizedRegion {
            start: fraction_of(self.start, max_scroll)?,
            end: fraction_of(self.end, max_scroll)?,
        })
    }
}

/// A pinned region expressed as fractions of the total scrollable distance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NormalizedRegion {
    /// Start fraction.
    pub start: f64,
    /// End fraction.
    pub end: f64,
}

impl NormalizedRegion {
    /// Midpoint fraction.
    pub fn center(self) -> f64 {
        self.start + (self.end - self.start) * 0.5
    }

    /// Tolerance-expanded membership test.
    pub fn contains(self, v: f64, tolerance: f64) -> bool {
        self.start - tolerance <= v && v <= self.end + tolerance
    }
}

/// Resting fraction for a settled scroll fraction `v`.
///
/// Outside every region `v` is returned unchanged. Otherwise the result is
/// the center of the closest-centered region among those containing `v`;
/// on a tie the earlier entry in `regions` wins. Idempotent.
pub fn compute_snap_target(v: f64, regions: &[NormalizedRegion], tolerance: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for region in regions {
        if !region.contains(v, tolerance) {
            continue;
        }
        let center = region.center();
        let dist = (center - v).abs();
        match best {
            Some((best_dist, _)) if best_dist <= dist => {}
            _ => best = Some((dist, center)),
        }
    }
    best.map_or(v, |(_, center)| center)
}

#[derive(Clone, Debug)]
struct Entry {
    id: RegionId,
    region: PinnedRegion,
}

/// Explicit registry of pinned regions owned by the page session.
///
/// Iteration is ordered by start offset; registration order breaks ties and
/// decides which region wins equal-distance snap queries.
#[derive(Clone, Debug, Default)]
pub struct SnapRegistry {
    next_id: u64,
    // Kept sorted by (start, id).
    entries: Vec<Entry>,
}

impl SnapRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region and return its handle.
    pub fn register(&mut self, region: PinnedRegion) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            section = %region.section,
            start = region.start,
            end = region.end,
            "register pinned region"
        );
        self.entries.push(Entry { id, region });
        self.sort();
        id
    }

    /// Move an existing region after a layout change. Returns `false` for an
    /// unknown handle.
    pub fn update(&mut self, id: RegionId, start: f64, end: f64) -> ScrubResult<bool> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        entry.region = PinnedRegion::new(entry.region.section.clone(), start, end)?;
        self.sort();
        Ok(true)
    }

    /// Remove one region.
    pub fn unregister(&mut self, id: RegionId) -> Option<PinnedRegion> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(idx);
        tracing::debug!(section = %entry.region.section, "unregister pinned region");
        Some(entry.region)
    }

    /// Remove every region owned by `section`; returns how many were removed.
    pub fn unregister_section(&mut self, section: &SectionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| &e.region.section != section);
        before - self.entries.len()
    }

    /// Drop everything (page teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no region is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Region for a handle.
    pub fn get(&self, id: RegionId) -> Option<&PinnedRegion> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.region)
    }

    /// Regions ordered by start offset.
    pub fn regions(&self) -> impl Iterator<Item = &PinnedRegion> {
        self.entries.iter().map(|e| &e.region)
    }

    /// Regions normalized by `max_scroll`, in registration order.
    pub fn normalized(&self, max_scroll: f64) -> Vec<NormalizedRegion> {
        let mut by_id: Vec<&Entry> = self.entries.iter().collect();
        by_id.sort_by_key(|e| e.id);
        by_id
            .into_iter()
            .filter_map(|e| e.region.normalized(max_scroll))
            .collect()
    }

    /// `computeSnapTarget` over the live registrations.
    ///
    /// With no regions or no scrollable overflow, snapping is disabled and
    /// `v` is returned unchanged.
    pub fn snap_target(&self, v: f64, max_scroll: f64, tolerance: f64) -> f64 {
        if self.entries.is_empty() || !(max_scroll > 0.0) {
            return v;
        }
        compute_snap_target(v, &self.normalized(max_scroll), tolerance)
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            a.region
                .start
                .total_cmp(&b.region.start)
                .then(a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snap/coordinator.rs"]
mod tests;
