use std::time::Duration;

use crate::foundation::error::{ScrubError, ScrubResult};

// Remaining gap below which smoothed progress lands on the target.
const SETTLE_EPS: f64 = 1e-4;

/// How applied progress follows scroll progress.
///
/// Serialized like the authoring `scrub` option: `true` for immediate, a
/// number of seconds for a lagging catch-up. `false` is rejected because
/// every binding is scroll-driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ScrubRepr", into = "ScrubRepr")]
pub enum Scrub {
    /// Applied progress equals scroll progress.
    #[default]
    Immediate,
    /// Applied progress approaches scroll progress, mostly caught up after `lag_secs`.
    Smooth {
        /// Catch-up time in seconds.
        lag_secs: f64,
    },
}

impl Scrub {
    /// Smooth scrub with the given lag; zero lag is immediate.
    pub fn smooth(lag_secs: f64) -> Self {
        if lag_secs > 0.0 {
            Self::Smooth { lag_secs }
        } else {
            Self::Immediate
        }
    }

    /// A smooth lag must be finite and positive.
    pub fn validate(&self) -> ScrubResult<()> {
        match *self {
            Self::Immediate => Ok(()),
            Self::Smooth { lag_secs } if lag_secs.is_finite() && lag_secs > 0.0 => Ok(()),
            Self::Smooth { lag_secs } => Err(ScrubError::validation(format!(
                "scrub lag must be finite and > 0, got {lag_secs}"
            ))),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum ScrubRepr {
    Flag(bool),
    Secs(f64),
}

impl TryFrom<ScrubRepr> for Scrub {
    type Error = ScrubError;

    fn try_from(value: ScrubRepr) -> Result<Self, Self::Error> {
        match value {
            ScrubRepr::Flag(true) => Ok(Self::Immediate),
            ScrubRepr::Flag(false) => Err(ScrubError::validation(
                "scrub must be true or a lag in seconds",
            )),
            ScrubRepr::Secs(s) if s.is_finite() && s >= 0.0 => Ok(Self::smooth(s)),
            ScrubRepr::Secs(s) => Err(ScrubError::validation(format!(
                "scrub lag must be finite and >= 0, got {s}"
            ))),
        }
    }
}

impl From<Scrub> for ScrubRepr {
    fn from(value: Scrub) -> Self {
        match value {
            Scrub::Immediate => Self::Flag(true),
            Scrub::Smooth { lag_secs } => Self::Secs(lag_secs),
        }
    }
}

/// Per-binding progress smoother.
#[derive(Clone, Debug, Default)]
pub struct ScrubSmoother {
    current: Option<f64>,
}

impl ScrubSmoother {
    /// Smoother with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget history; the next sample lands on its target.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Last applied progress.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Advance toward `target` by `dt` and return the applied progress.
    pub fn advance(&mut self, target: f64, dt: Duration, scrub: Scrub) -> f64 {
        let applied = match (scrub, self.current) {
            (Scrub::Immediate, _) | (_, None) => target,
            (Scrub::Smooth { lag_secs }, Some(_)) if !(lag_secs.is_finite() && lag_secs > 0.0) => {
                target
            }
            (Scrub::Smooth { lag_secs }, Some(cur)) => {
                let dt = dt.as_secs_f64();
                // ~95% of the gap is closed after `lag_secs`.
                let alpha = 1.0 - (-3.0 * dt / lag_secs).exp();
                let next = cur + (target - cur) * alpha;
                if (target - next).abs() < SETTLE_EPS {
                    target
                } else {
                    next
                }
            }
        };
        self.current = Some(applied);
        applied
    }

    /// Whether the last applied value equals `target`.
    pub fn is_settled_at(&self, target: f64) -> bool {
        self.current == Some(target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/scrub.rs"]
mod tests;
