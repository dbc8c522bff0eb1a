use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::{
    animation::ease::Ease,
    foundation::core::{Affine, Vec2},
    foundation::error::{ScrubError, ScrubResult},
    foundation::math::{clamp_unit, lerp},
};

/// Animatable visual property of a section element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Horizontal translation in pixels.
    X,
    /// Vertical translation in pixels.
    Y,
    /// Uniform scale factor.
    Scale,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Rotation in degrees.
    Rotate,
}

impl Property {
    /// Authoring name of the property.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Rotate => "rotate",
        }
    }

    /// Value the property has when no track touches it.
    pub fn neutral(self) -> f64 {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX | Self::ScaleY => 1.0,
            Self::X | Self::Y | Self::Rotate => 0.0,
        }
    }
}

impl FromStr for Property {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "opacity" => Self::Opacity,
            "x" => Self::X,
            "y" => Self::Y,
            "scale" => Self::Scale,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "rotate" => Self::Rotate,
            other => {
                return Err(ScrubError::validation(format!(
                    "unknown property '{other}'"
                )));
            }
        })
    }
}

/// A property of one named element inside a section, e.g. `headline.opacity`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyTarget {
    /// Element name local to the section.
    pub target: String,
    /// Animated property.
    pub property: Property,
}

impl PropertyTarget {
    /// Build a target from an element name and property.
    pub fn new(target: impl Into<String>, property: Property) -> Self {
        Self {
            target: target.into(),
            property,
        }
    }
}

impl fmt::Display for PropertyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.property.as_str())
    }
}

impl FromStr for PropertyTarget {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, prop) = s
            .rsplit_once('.')
            .ok_or_else(|| ScrubError::validation(format!("expected 'element.property', got '{s}'")))?;
        if target.is_empty() {
            return Err(ScrubError::validation("property target element must be non-empty"));
        }
        Ok(Self::new(target, prop.parse()?))
    }
}

/// Sub-range of a track's `[0, 1]` progress, half-open `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl Span {
    /// The whole track.
    pub const FULL: Span = Span {
        start: 0.0,
        end: 1.0,
    };

    /// Build a span; requires `0 <= start < end <= 1`.
    pub fn new(start: f64, end: f64) -> ScrubResult<Self> {
        let span = Self { start, end };
        span.validate()?;
        Ok(span)
    }

    /// Check the bounds invariant.
    pub fn validate(&self) -> ScrubResult<()> {
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(ScrubError::animation("span bounds must be finite"));
        }
        if !(0.0 <= self.start && self.start < self.end && self.end <= 1.0) {
            return Err(ScrubError::animation(format!(
                "span [{}, {}) must satisfy 0 <= start < end <= 1",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Span length.
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// Whether `p` lies in `[start, end)`.
    pub fn contains(self, p: f64) -> bool {
        self.start <= p && p < self.end
    }

    /// Local fraction of `p` inside the span, clamped.
    pub fn local(self, p: f64) -> f64 {
        clamp_unit((p - self.start) / self.len())
    }

    /// Split the span into `count` staggered sub-spans, each starting `each`
    /// after the previous one, all ending inside `self`.
    pub fn stagger(self, count: usize, each: f64) -> ScrubResult<Vec<Span>> {
        self.validate()?;
        if count == 0 {
            return Ok(Vec::new());
        }
        if !(each.is_finite() && each >= 0.0) {
            return Err(ScrubError::animation("stagger step must be finite and >= 0"));
        }
        let offset_total = each * (count - 1) as f64;
        let per = self.len() - offset_total;
        if per <= 0.0 {
            return Err(ScrubError::animation(format!(
                "stagger of {count} x {each} does not fit in span [{}, {})",
                self.start, self.end
            )));
        }
        (0..count)
            .map(|i| {
                let start = self.start + each * i as f64;
                // Last span ends exactly on `self.end` regardless of rounding.
                let end = if i + 1 == count {
                    self.end
                } else {
                    (start + per).min(self.end)
                };
                Span::new(start, end)
            })
            .collect()
    }
}

/// One interpolation of one property over one span.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Property written by this segment.
    pub target: PropertyTarget,
    /// Value at span start.
    pub from: f64,
    /// Value at span end.
    pub to: f64,
    /// Active sub-range of the track.
    pub span: Span,
    /// Curve applied to the local fraction.
    pub ease: Ease,
}

impl Segment {
    /// Interpolated value at track progress `p`.
    pub fn sample(&self, p: f64) -> f64 {
        lerp(self.from, self.to, self.ease.apply(self.span.local(p)))
    }
}

/// Ordered set of segments evaluated as a pure function of progress.
#[derive(Clone, Debug)]
pub struct TimelineTrack {
    segments: Vec<Segment>,
    layered: bool,
    // Per property: segment indices sorted by (span.start, declaration order).
    groups: BTreeMap<PropertyTarget, SmallVec<[usize; 4]>>,
}

impl TimelineTrack {
    /// Build and validate a track.
    ///
    /// Segments touching the same property must not overlap unless `layered`
    /// is set.
    pub fn new(segments: Vec<Segment>, layered: bool) -> ScrubResult<Self> {
        let mut groups: BTreeMap<PropertyTarget, SmallVec<[usize; 4]>> = BTreeMap::new();
        for (idx, seg) in segments.iter().enumerate() {
            if !(seg.from.is_finite() && seg.to.is_finite()) {
                return Err(ScrubError::animation(format!(
                    "segment {idx} ({}) has non-finite values",
                    seg.target
                )));
            }
            seg.span.validate()?;
            groups.entry(seg.target.clone()).or_default().push(idx);
        }

        for (target, idxs) in groups.iter_mut() {
            idxs.sort_by(|&a, &b| {
                segments[a]
                    .span
                    .start
                    .total_cmp(&segments[b].span.start)
                    .then(a.cmp(&b))
            });
            if layered {
                continue;
            }
            let mut max_end = f64::NEG_INFINITY;
            for &i in idxs.iter() {
                let span = segments[i].span;
                if span.start < max_end {
                    return Err(ScrubError::animation(format!(
                        "segments for '{target}' overlap at {}; mark the track layered to allow it",
                        span.start
                    )));
                }
                max_end = max_end.max(span.end);
            }
        }

        Ok(Self {
            segments,
            layered,
            groups,
        })
    }

    /// Declared segments in declaration order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether overlapping same-property segments are allowed.
    pub fn is_layered(&self) -> bool {
        self.layered
    }

    /// Property targets this track writes.
    pub fn targets(&self) -> impl Iterator<Item = &PropertyTarget> {
        self.groups.keys()
    }

    /// Evaluate every property at `progress` (clamped to `[0, 1]`).
    pub fn evaluate(&self, progress: f64) -> PropertyValues {
        let mut out = PropertyValues::default();
        self.evaluate_into(progress, &mut out);
        out
    }

    /// Like [`Self::evaluate`], writing into an existing map.
    pub fn evaluate_into(&self, progress: f64, out: &mut PropertyValues) {
        let p = clamp_unit(progress);
        for (target, idxs) in &self.groups {
            out.insert(target.clone(), self.value_for(idxs, p));
        }
    }

    fn value_for(&self, idxs: &[usize], p: f64) -> f64 {
        let mut active: Option<&Segment> = None;
        let mut passed: Option<&Segment> = None;
        for &i in idxs {
            let seg = &self.segments[i];
            if seg.span.contains(p) {
                // Latest start wins when layered segments overlap.
                active = Some(seg);
            } else if seg.span.end <= p {
                match passed {
                    Some(prev) if prev.span.end > seg.span.end => {}
                    _ => passed = Some(seg),
                }
            }
        }

        if let Some(seg) = active {
            return seg.sample(p);
        }
        if let Some(seg) = passed {
            return seg.to;
        }
        // Before the first segment: hold its starting value.
        self.segments[idxs[0]].from
    }
}

/// Evaluated property values keyed by [`PropertyTarget`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValues(BTreeMap<PropertyTarget, f64>);

impl PropertyValues {
    /// Insert or overwrite one value.
    pub fn insert(&mut self, target: PropertyTarget, value: f64) {
        self.0.insert(target, value);
    }

    /// Overwrite with every value of `other`.
    pub fn merge(&mut self, other: PropertyValues) {
        self.0.extend(other.0);
    }

    /// Value of `target.property`, if any track wrote it.
    pub fn get(&self, target: &str, property: Property) -> Option<f64> {
        self.0
            .get(&PropertyTarget::new(target, property))
            .copied()
    }

    /// Value of `target.property`, or the property's neutral value.
    pub fn get_or_neutral(&self, target: &str, property: Property) -> f64 {
        self.get(target, property)
            .unwrap_or_else(|| property.neutral())
    }

    /// Number of written properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property was written.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate values in target order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyTarget, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Compose the transform properties of `target` into an affine matrix.
    ///
    /// Order: translate, then rotate, then scale (about the element origin).
    pub fn transform(&self, target: &str) -> Affine {
        let x = self.get_or_neutral(target, Property::X);
        let y = self.get_or_neutral(target, Property::Y);
        let s = self.get_or_neutral(target, Property::Scale);
        let sx = self.get_or_neutral(target, Property::ScaleX) * s;
        let sy = self.get_or_neutral(target, Property::ScaleY) * s;
        let rot = self.get_or_neutral(target, Property::Rotate).to_radians();
        Affine::translate(Vec2::new(x, y)) * Affine::rotate(rot) * Affine::scale_non_uniform(sx, sy)
    }
}

impl serde::Serialize for PropertyValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k.to_string(), *v)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
