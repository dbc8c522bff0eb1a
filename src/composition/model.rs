use std::collections::BTreeSet;
use std::path::Path;

use crate::{
    animation::ease::Ease,
    animation::track::{Property, PropertyTarget, Segment, Span, TimelineTrack},
    foundation::core::{Length, SectionId, Viewport},
    foundation::error::{ScrubError, ScrubResult},
    scroll::scrub::Scrub,
    scroll::trigger::TriggerSpec,
    session::config::SessionOpts,
};

// Span and overlap checks are viewport-independent; any valid viewport works.
const CHECK_VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    height: 1000.0,
};

/// A scroll-animated page: sections in document order plus engine options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    /// Section declarations.
    pub sections: Vec<SectionSpec>,
    /// Engine options; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionOpts>,
}

impl PageSpec {
    /// Parse a manifest and validate it.
    pub fn from_json(s: &str) -> ScrubResult<Self> {
        let page: Self = serde_json::from_str(s)?;
        page.validate()?;
        Ok(page)
    }

    /// Read a manifest from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScrubError::validation(format!("read manifest '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> ScrubResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every section and reject duplicate ids.
    pub fn validate(&self) -> ScrubResult<()> {
        let mut seen = BTreeSet::new();
        for section in &self.sections {
            if !seen.insert(&section.id) {
                return Err(ScrubError::validation(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            section.validate()?;
        }
        if let Some(opts) = &self.session {
            opts.validate()?;
        }
        Ok(())
    }

    /// Options to run this page with.
    pub fn session_opts(&self) -> SessionOpts {
        self.session.clone().unwrap_or_default()
    }

    /// Section by id.
    pub fn section(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id.as_str() == id)
    }
}

/// Animation declarations of one page section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionSpec {
    /// Section id; also the natural trigger element for its bindings.
    pub id: SectionId,
    /// Scroll bindings.
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

impl SectionSpec {
    /// Non-empty id, at most one pinned binding, valid bindings.
    pub fn validate(&self) -> ScrubResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(ScrubError::validation("section id must be non-empty"));
        }
        let pinned = self.bindings.iter().filter(|b| b.pin).count();
        if pinned > 1 {
            return Err(ScrubError::validation(format!(
                "section '{}' declares {pinned} pinned bindings, at most one is allowed",
                self.id
            )));
        }
        for (idx, binding) in self.bindings.iter().enumerate() {
            binding.validate().map_err(|e| {
                ScrubError::validation(format!("section '{}' binding {idx}: {e}", self.id))
            })?;
        }
        Ok(())
    }

    /// The pinned binding, if any.
    pub fn pinned_binding(&self) -> Option<&BindingSpec> {
        self.bindings.iter().find(|b| b.pin)
    }
}

/// One trigger driving one or more tracks, optionally pinning its element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BindingSpec {
    /// Scroll range that drives the tracks.
    pub trigger: TriggerSpec,
    /// Fix the trigger element for the duration of the range.
    #[serde(default)]
    pub pin: bool,
    /// How applied progress follows scroll progress.
    #[serde(default)]
    pub scrub: Scrub,
    /// Animated tracks.
    #[serde(default)]
    pub tracks: Vec<TrackSpec>,
}

impl BindingSpec {
    /// Check the scrub lag and every track.
    pub fn validate(&self) -> ScrubResult<()> {
        self.scrub.validate()?;
        for track in &self.tracks {
            track.validate()?;
        }
        Ok(())
    }

    /// Resolve tracks for a viewport.
    pub fn resolve_tracks(&self, viewport: Viewport) -> ScrubResult<Vec<TimelineTrack>> {
        self.tracks.iter().map(|t| t.resolve(viewport)).collect()
    }
}

/// Serialized form of a [`TimelineTrack`], with viewport-relative values.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackSpec {
    /// Allow same-property segments to overlap.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub layered: bool,
    /// Segments.
    pub segments: Vec<SegmentSpec>,
}

impl TrackSpec {
    /// Span, value and overlap checks.
    pub fn validate(&self) -> ScrubResult<()> {
        self.resolve(CHECK_VIEWPORT).map(|_| ())
    }

    /// Resolve lengths against `viewport` and build the track.
    pub fn resolve(&self, viewport: Viewport) -> ScrubResult<TimelineTrack> {
        let segments = self.segments.iter().map(|s| s.resolve(viewport)).collect();
        TimelineTrack::new(segments, self.layered)
    }
}

/// Serialized form of a [`Segment`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentSpec {
    /// Animated element id.
    pub target: String,
    /// Animated property.
    pub property: Property,
    /// Value at the span start.
    pub from: Length,
    /// Value at the span end.
    pub to: Length,
    /// Portion of the track progress.
    #[serde(default = "full_span")]
    pub span: Span,
    /// Interpolation curve.
    #[serde(default)]
    pub ease: Ease,
}

fn full_span() -> Span {
    Span::FULL
}

impl SegmentSpec {
    /// Resolve `from`/`to` against `viewport`.
    pub fn resolve(&self, viewport: Viewport) -> Segment {
        Segment {
            target: PropertyTarget::new(self.target.clone(), self.property),
            from: self.from.resolve(viewport),
            to: self.to.resolve(viewport),
            span: self.span,
            ease: self.ease,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
