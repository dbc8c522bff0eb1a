use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScrubError, ScrubResult};

pub use kurbo::{Affine, Rect, Size, Vec2};

/// Identifier of a measurable page element (usually a section root).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Build an element id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a mounted section.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    /// Build a section id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visible scroll area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Build a viewport; both sides must be finite and positive.
    pub fn new(width: f64, height: f64) -> ScrubResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    /// Check the dimensions without constructing.
    pub fn validate(&self) -> ScrubResult<()> {
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(ScrubError::layout("viewport dimensions must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ScrubError::layout("viewport dimensions must be > 0"));
        }
        Ok(())
    }

    /// Viewport as a [`Size`].
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A length that may depend on the viewport.
///
/// Serialized as a bare number (pixels) or a string with a unit suffix:
/// `"12px"`, `"-8vw"`, `"6vh"`, `"130%"` (percent of viewport height).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    /// Absolute CSS pixels (also used for unitless values such as opacity).
    Px(f64),
    /// Percent of viewport width.
    Vw(f64),
    /// Percent of viewport height.
    Vh(f64),
    /// Percent of viewport height, written with `%`.
    Percent(f64),
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);

    /// Pixel (or unitless) value.
    pub fn px(v: f64) -> Self {
        Self::Px(v)
    }

    /// Percent of viewport width.
    pub fn vw(v: f64) -> Self {
        Self::Vw(v)
    }

    /// Percent of viewport height.
    pub fn vh(v: f64) -> Self {
        Self::Vh(v)
    }

    /// Percent of viewport height, `%` notation.
    pub fn percent(v: f64) -> Self {
        Self::Percent(v)
    }

    /// Raw magnitude regardless of unit.
    pub fn magnitude(self) -> f64 {
        match self {
            Self::Px(v) | Self::Vw(v) | Self::Vh(v) | Self::Percent(v) => v,
        }
    }

    /// Resolve to pixels for the given viewport.
    pub fn resolve(self, viewport: Viewport) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Vw(v) => v / 100.0 * viewport.width,
            Self::Vh(v) | Self::Percent(v) => v / 100.0 * viewport.height,
        }
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::Px(value)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Vw(v) => write!(f, "{v}vw"),
            Self::Vh(v) => write!(f, "{v}vh"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl FromStr for Length {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, ctor): (&str, fn(f64) -> Length) = if let Some(n) = s.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = s.strip_suffix("vw") {
            (n, Length::Vw)
        } else if let Some(n) = s.strip_suffix("vh") {
            (n, Length::Vh)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Length::Percent)
        } else {
            (s, Length::Px)
        };
        let v: f64 = num
            .trim()
            .parse()
            .map_err(|_| ScrubError::validation(format!("invalid length '{s}'")))?;
        if !v.is_finite() {
            return Err(ScrubError::validation(format!("length '{s}' is not finite")));
        }
        Ok(ctor(v))
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Num(f64),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = ScrubError;

    fn try_from(value: LengthRepr) -> Result<Self, Self::Error> {
        match value {
            LengthRepr::Num(v) if v.is_finite() => Ok(Self::Px(v)),
            LengthRepr::Num(_) => Err(ScrubError::validation("length is not finite")),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(value: Length) -> Self {
        match value {
            Length::Px(v) => Self::Num(v),
            other => Self::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
