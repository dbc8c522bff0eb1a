use std::collections::BTreeMap;

use crate::{
    foundation::core::{ElementId, Rect, Viewport},
    foundation::error::{ScrubError, ScrubResult},
    scroll::trigger::{ElementGeometry, ResolvedRange, TriggerSpec, resolve},
};

/// Natural-flow box of one element, measured without pin spacers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBox {
    /// Document-space top edge.
    pub top: f64,
    /// Box height.
    pub height: f64,
}

impl ElementBox {
    /// Bottom edge.
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }
}

/// Geometry measured by the host for one layout pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSnapshot {
    /// Current viewport.
    pub viewport: Viewport,
    /// Document height without pin spacing.
    pub document_height: f64,
    /// Measured elements keyed by id.
    #[serde(default)]
    pub elements: BTreeMap<ElementId, ElementBox>,
}

impl LayoutSnapshot {
    /// Snapshot with no elements yet.
    pub fn new(viewport: Viewport, document_height: f64) -> Self {
        Self {
            viewport,
            document_height,
            elements: BTreeMap::new(),
        }
    }

    /// Add or replace a measured element.
    pub fn with_element(mut self, id: impl Into<String>, top: f64, height: f64) -> Self {
        self.insert(id, top, height);
        self
    }

    /// Add or replace a measured element in place.
    pub fn insert(&mut self, id: impl Into<String>, top: f64, height: f64) {
        self.elements
            .insert(ElementId::new(id), ElementBox { top, height });
    }

    /// Parse a snapshot from JSON and validate it.
    pub fn from_json(s: &str) -> ScrubResult<Self> {
        let snap: Self = serde_json::from_str(s)?;
        snap.validate()?;
        Ok(snap)
    }

    /// Check viewport, document height and every box for finite, non-negative sizes.
    pub fn validate(&self) -> ScrubResult<()> {
        self.viewport.validate()?;
        if !(self.document_height.is_finite() && self.document_height >= 0.0) {
            return Err(ScrubError::layout(
                "document_height must be finite and >= 0",
            ));
        }
        for (id, b) in &self.elements {
            if !(b.top.is_finite() && b.height.is_finite()) {
                return Err(ScrubError::layout(format!(
                    "element '{id}' has non-finite geometry"
                )));
            }
            if b.height < 0.0 {
                return Err(ScrubError::layout(format!(
                    "element '{id}' has negative height"
                )));
            }
        }
        Ok(())
    }

    /// Natural box of `id`.
    pub fn element(&self, id: &ElementId) -> Option<ElementBox> {
        self.elements.get(id).copied()
    }

    fn rect_at(&self, top: f64, height: f64) -> Rect {
        Rect::new(0.0, top, self.viewport.width, top + height)
    }
}

impl ElementGeometry for LayoutSnapshot {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_rect(&self, id: &ElementId) -> Option<Rect> {
        self.element(id).map(|b| self.rect_at(b.top, b.height))
    }
}

/// Extra scroll distance inserted after a pinned element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PinSpacer {
    /// Pinned element.
    pub element: ElementId,
    /// Natural bottom edge of the pinned element.
    pub natural_bottom: f64,
    /// Inserted distance (the pin duration in pixels).
    pub distance: f64,
}

/// Layout with pin spacing applied.
///
/// Every element whose natural top is at or below a pinned element's natural
/// bottom is pushed down by that pin's distance.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLayout {
    snapshot: LayoutSnapshot,
    // Sorted by natural bottom.
    spacers: Vec<PinSpacer>,
}

impl ResolvedLayout {
    /// Layout without any pin spacing.
    pub fn unpinned(snapshot: LayoutSnapshot) -> Self {
        Self {
            snapshot,
            spacers: Vec::new(),
        }
    }

    /// Resolve pinned triggers in document order and insert their spacers.
    ///
    /// Each pinned range is measured against the layout already shifted by
    /// earlier pins. The returned ranges follow the order of `pinned`;
    /// unresolvable triggers yield `None` and insert no spacing.
    #[tracing::instrument(skip_all, fields(pins = pinned.len()))]
    pub fn solve(
        snapshot: LayoutSnapshot,
        pinned: &[&TriggerSpec],
    ) -> (Self, Vec<Option<ResolvedRange>>) {
        let mut layout = Self::unpinned(snapshot);
        let mut ranges = vec![None; pinned.len()];

        let mut order: Vec<(usize, ElementBox)> = pinned
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| layout.snapshot.element(&t.element).map(|b| (idx, b)))
            .collect();
        order.sort_by(|a, b| a.1.top.total_cmp(&b.1.top).then(a.0.cmp(&b.0)));

        for (idx, natural) in order {
            let trigger = pinned[idx];
            let Some(range) = resolve(trigger, &layout) else {
                continue;
            };
            ranges[idx] = Some(range);
            let distance = range.len();
            if distance > 0.0 {
                layout.push_spacer(PinSpacer {
                    element: trigger.element.clone(),
                    natural_bottom: natural.bottom(),
                    distance,
                });
            }
        }

        tracing::debug!(
            spacers = layout.spacers.len(),
            total = layout.total_pin_distance(),
            "layout solved"
        );
        (layout, ranges)
    }

    fn push_spacer(&mut self, spacer: PinSpacer) {
        let at = self
            .spacers
            .partition_point(|s| s.natural_bottom <= spacer.natural_bottom);
        self.spacers.insert(at, spacer);
    }

    /// Measured snapshot this layout was built from.
    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    /// Inserted spacers ordered by natural bottom.
    pub fn spacers(&self) -> &[PinSpacer] {
        &self.spacers
    }

    /// Sum of all pin distances.
    pub fn total_pin_distance(&self) -> f64 {
        self.spacers.iter().map(|s| s.distance).sum()
    }

    /// Shift applied to content whose natural top is `natural_top`.
    pub fn shift_at(&self, natural_top: f64) -> f64 {
        self.spacers
            .iter()
            .take_while(|s| s.natural_bottom <= natural_top)
            .map(|s| s.distance)
            .sum()
    }

    /// Spacer-adjusted top of `id`.
    pub fn top_of(&self, id: &ElementId) -> Option<f64> {
        self.snapshot
            .element(id)
            .map(|b| b.top + self.shift_at(b.top))
    }

    /// Document height including pin spacing.
    pub fn document_height(&self) -> f64 {
        self.snapshot.document_height + self.total_pin_distance()
    }

    /// Largest reachable scroll offset (0 when the page fits the viewport).
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.snapshot.viewport.height).max(0.0)
    }
}

impl ElementGeometry for ResolvedLayout {
    fn viewport(&self) -> Viewport {
        self.snapshot.viewport
    }

    fn element_rect(&self, id: &ElementId) -> Option<Rect> {
        let b = self.snapshot.element(id)?;
        Some(self.snapshot.rect_at(b.top + self.shift_at(b.top), b.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
