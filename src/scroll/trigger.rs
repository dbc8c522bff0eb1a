use std::fmt;
use std::str::FromStr;

use crate::{
    foundation::core::{ElementId, Length, Rect, Viewport},
    foundation::error::{ScrubError, ScrubResult},
    foundation::math::clamp_unit,
};

/// A reference line on an element or on the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Top edge.
    Top,
    /// Vertical center.
    Center,
    /// Bottom edge.
    Bottom,
    /// Percent of the extent, measured from the top.
    Percent(f64),
    /// Pixels from the top.
    Px(f64),
}

impl Edge {
    /// Offset of this edge from the top of something `extent` pixels tall.
    pub fn offset_within(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => p / 100.0 * extent,
            Self::Px(v) => v,
        }
    }
}

impl FromStr for Edge {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => match other.parse::<Length>()? {
                Length::Percent(p) => Ok(Self::Percent(p)),
                Length::Px(v) => Ok(Self::Px(v)),
                _ => Err(ScrubError::validation(format!(
                    "edge '{other}' must be top, center, bottom, N% or Npx"
                ))),
            },
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// "When `element` edge reaches `viewport` edge", e.g. `top 80%`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mark {
    /// Reference line on the trigger element.
    pub element: Edge,
    /// Reference line on the viewport.
    pub viewport: Edge,
}

impl Mark {
    /// Build a mark from its two edges.
    pub fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Absolute scroll offset at which the mark is reached.
    pub fn offset(self, rect: Rect, viewport: Viewport) -> f64 {
        rect.y0 + self.element.offset_within(rect.height())
            - self.viewport.offset_within(viewport.height)
    }
}

impl FromStr for Mark {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let element: Edge = parts
            .next()
            .ok_or_else(|| ScrubError::validation("trigger mark must be non-empty"))?
            .parse()?;
        let viewport = match parts.next() {
            Some(p) => p.parse()?,
            None => element,
        };
        if parts.next().is_some() {
            return Err(ScrubError::validation(format!(
                "trigger mark '{s}' has more than two edges"
            )));
        }
        Ok(Self { element, viewport })
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for Mark {
    type Error = ScrubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mark> for String {
    fn from(value: Mark) -> Self {
        value.to_string()
    }
}

/// End of a trigger range: an absolute mark or a distance after the start.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EndMark {
    /// Same notation as the start mark.
    Absolute(Mark),
    /// `+=<length>` after the resolved start.
    Relative(Length),
}

impl FromStr for EndMark {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_prefix("+=") {
            Some(rest) => Ok(Self::Relative(rest.parse()?)),
            None => Ok(Self::Absolute(s.parse()?)),
        }
    }
}

impl fmt::Display for EndMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(m) => write!(f, "{m}"),
            Self::Relative(len) => write!(f, "+={len}"),
        }
    }
}

impl TryFrom<String> for EndMark {
    type Error = ScrubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EndMark> for String {
    fn from(value: EndMark) -> Self {
        value.to_string()
    }
}

/// Declared scroll interval over which one binding's progress is measured.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerSpec {
    /// Element whose geometry anchors the range.
    pub element: ElementId,
    /// Where progress is 0.
    pub start: Mark,
    /// Where progress is 1.
    pub end: EndMark,
}

impl TriggerSpec {
    /// Parse both marks from authoring strings.
    pub fn parse(element: impl Into<String>, start: &str, end: &str) -> ScrubResult<Self> {
        Ok(Self {
            element: ElementId::new(element),
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

/// Source of measured geometry for trigger resolution.
pub trait ElementGeometry {
    /// Current viewport.
    fn viewport(&self) -> Viewport;
    /// Document-space bounds of `id`, if the element is present.
    fn element_rect(&self, id: &ElementId) -> Option<Rect>;
}

/// Trigger range resolved to absolute scroll offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedRange {
    /// Scroll offset where progress is 0.
    pub start: f64,
    /// Scroll offset where progress is 1.
    pub end: f64,
}

impl ResolvedRange {
    /// Whether the range collapsed (`start >= end`).
    pub fn is_degenerate(self) -> bool {
        !(self.start < self.end)
    }

    /// Scroll distance covered by the range (0 when degenerate).
    pub fn len(self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.end - self.start
        }
    }

    /// Progress at `scroll_y`; see [`progress_at`].
    pub fn progress_at(self, scroll_y: f64) -> f64 {
        progress_at(scroll_y, self.start, self.end)
    }
}

/// Normalized progress of `scroll_y` through `[start, end]`.
///
/// Clamped to `[0, 1]` on both sides and monotonic in `scroll_y`. A collapsed
/// range (`start >= end`) reports a constant `1.0`; a NaN scroll reports `0.0`.
pub fn progress_at(scroll_y: f64, start: f64, end: f64) -> f64 {
    if scroll_y.is_nan() {
        return 0.0;
    }
    if !(start < end) {
        return 1.0;
    }
    clamp_unit((scroll_y - start) / (end - start))
}

/// Resolve a trigger against current geometry.
///
/// Returns `None` when the element is absent or has no height yet; callers
/// treat that as an inactive range with progress 0.
pub fn resolve(trigger: &TriggerSpec, geometry: &impl ElementGeometry) -> Option<ResolvedRange> {
    let viewport = geometry.viewport();
    let Some(rect) = geometry.element_rect(&trigger.element) else {
        tracing::debug!(element = %trigger.element, "trigger element not measured yet");
        return None;
    };
    if !(rect.height() > 0.0) {
        tracing::debug!(element = %trigger.element, "trigger element has zero height");
        return None;
    }

    let start = trigger.start.offset(rect, viewport);
    let end = match trigger.end {
        EndMark::Absolute(mark) => mark.offset(rect, viewport),
        EndMark::Relative(len) => start + len.resolve(viewport),
    };
    Some(ResolvedRange { start, end })
}

/// Progress for a possibly-unresolved range.
pub fn progress_or_inactive(range: Option<ResolvedRange>, scroll_y: f64) -> f64 {
    range.map_or(0.0, |r| r.progress_at(scroll_y))
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
