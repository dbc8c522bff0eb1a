use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    animation::track::{Property, Span},
    composition::model::{BindingSpec, PageSpec, SectionSpec, SegmentSpec, TrackSpec},
    foundation::core::{Length, SectionId},
    foundation::error::{ScrubError, ScrubResult},
    scroll::scrub::Scrub,
    scroll::trigger::TriggerSpec,
    session::config::SessionOpts,
};

/// Builder for a [`PageSpec`].
pub struct PageBuilder {
    sections: Vec<SectionSpec>,
    ids: BTreeSet<SectionId>,
    session: Option<SessionOpts>,
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuilder {
    /// Empty page.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            ids: BTreeSet::new(),
            session: None,
        }
    }

    /// Append a section; ids must be unique.
    pub fn section(mut self, section: SectionSpec) -> ScrubResult<Self> {
        if !self.ids.insert(section.id.clone()) {
            return Err(ScrubError::validation(format!(
                "duplicate section id '{}'",
                section.id
            )));
        }
        self.sections.push(section);
        Ok(self)
    }

    /// Engine options stored in the manifest.
    pub fn session(mut self, opts: SessionOpts) -> Self {
        self.session = Some(opts);
        self
    }

    /// Validate and finish.
    pub fn build(self) -> ScrubResult<PageSpec> {
        let page = PageSpec {
            sections: self.sections,
            session: self.session,
        };
        page.validate()?;
        Ok(page)
    }
}

/// Builder for a [`SectionSpec`].
pub struct SectionBuilder {
    id: SectionId,
    bindings: Vec<BindingSpec>,
}

impl SectionBuilder {
    /// Section with no bindings.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: SectionId::new(id),
            bindings: Vec::new(),
        }
    }

    /// Append a binding.
    pub fn binding(mut self, binding: BindingSpec) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Validate and finish.
    pub fn build(self) -> ScrubResult<SectionSpec> {
        let section = SectionSpec {
            id: self.id,
            bindings: self.bindings,
        };
        section.validate()?;
        Ok(section)
    }
}

/// Builder for a [`BindingSpec`]; immediate scrub and no pin by default.
pub struct BindingBuilder {
    trigger: TriggerSpec,
    pin: bool,
    scrub: Scrub,
    tracks: Vec<TrackSpec>,
}

impl BindingBuilder {
    /// Binding driven by `trigger`.
    pub fn new(trigger: TriggerSpec) -> Self {
        Self {
            trigger,
            pin: false,
            scrub: Scrub::Immediate,
            tracks: Vec::new(),
        }
    }

    /// Parse `start`/`end` marks for `element`, e.g. `("hero", "top top", "+=130%")`.
    pub fn scroll(element: impl Into<String>, start: &str, end: &str) -> ScrubResult<Self> {
        Ok(Self::new(TriggerSpec::parse(element, start, end)?))
    }

    /// Pin the trigger element for the range.
    pub fn pin(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    /// Scrub mode.
    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    /// Smooth scrub with a catch-up lag in seconds.
    pub fn scrub_lag(self, lag_secs: f64) -> Self {
        self.scrub(Scrub::smooth(lag_secs))
    }

    /// Append a track.
    pub fn track(mut self, track: TrackSpec) -> Self {
        self.tracks.push(track);
        self
    }

    /// Validate and finish.
    pub fn build(self) -> ScrubResult<BindingSpec> {
        let binding = BindingSpec {
            trigger: self.trigger,
            pin: self.pin,
            scrub: self.scrub,
            tracks: self.tracks,
        };
        binding.validate()?;
        Ok(binding)
    }
}

/// One property's start and end values within a tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropTween {
    /// Animated property.
    pub property: Property,
    /// Start value.
    pub from: Length,
    /// End value.
    pub to: Length,
}

/// Shorthand for a [`PropTween`].
pub fn prop(property: Property, from: impl Into<Length>, to: impl Into<Length>) -> PropTween {
    PropTween {
        property,
        from: from.into(),
        to: to.into(),
    }
}

/// Builder for a [`TrackSpec`].
#[derive(Default)]
pub struct TrackBuilder {
    layered: bool,
    segments: Vec<SegmentSpec>,
}

impl TrackBuilder {
    /// Empty, non-layered track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow overlapping segments on the same property.
    pub fn layered(mut self, layered: bool) -> Self {
        self.layered = layered;
        self
    }

    /// One property of one target.
    pub fn from_to(
        mut self,
        target: impl Into<String>,
        property: Property,
        from: impl Into<Length>,
        to: impl Into<Length>,
        span: Span,
        ease: Ease,
    ) -> Self {
        self.segments.push(SegmentSpec {
            target: target.into(),
            property,
            from: from.into(),
            to: to.into(),
            span,
            ease,
        });
        self
    }

    /// Several properties of one target over one span.
    pub fn tween(
        mut self,
        target: impl Into<String>,
        props: &[PropTween],
        span: Span,
        ease: Ease,
    ) -> Self {
        let target = target.into();
        for p in props {
            self.segments.push(SegmentSpec {
                target: target.clone(),
                property: p.property,
                from: p.from,
                to: p.to,
                span,
                ease,
            });
        }
        self
    }

    /// The same tween for each of `targets`, each starting `each` later,
    /// all fitting inside `span`.
    pub fn stagger<I, S>(
        mut self,
        targets: I,
        each: f64,
        props: &[PropTween],
        span: Span,
        ease: Ease,
    ) -> ScrubResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets: Vec<String> = targets.into_iter().map(Into::into).collect();
        let spans = span.stagger(targets.len(), each)?;
        for (target, sub) in targets.into_iter().zip(spans) {
            self = self.tween(target, props, sub, ease);
        }
        Ok(self)
    }

    /// Validate and finish.
    pub fn build(self) -> ScrubResult<TrackSpec> {
        let track = TrackSpec {
            layered: self.layered,
            segments: self.segments,
        };
        track.validate()?;
        Ok(track)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
