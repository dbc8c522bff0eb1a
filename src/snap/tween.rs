use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::math::lerp;

/// Bounds for the scroll animation that carries the page to a snap target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapTiming {
    /// Shortest tween.
    pub min: Duration,
    /// Longest tween; reached at one viewport height of travel.
    pub max: Duration,
    /// Curve applied to elapsed time.
    pub ease: Ease,
}

impl Default for SnapTiming {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(150),
            max: Duration::from_millis(350),
            ease: Ease::OutCubic,
        }
    }
}

impl SnapTiming {
    /// Duration for a travel of `distance_px` in a viewport `viewport_height` tall.
    pub fn duration_for(&self, distance_px: f64, viewport_height: f64) -> Duration {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let screens = if viewport_height > 0.0 {
            (distance_px.abs() / viewport_height).min(1.0)
        } else {
            1.0
        };
        let screens = if screens.is_nan() { 1.0 } else { screens };
        lo + (hi - lo).mul_f64(screens)
    }
}

/// Scroll animation from the settled position to the snap target, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SnapTween {
    /// Settled scroll offset.
    pub from: f64,
    /// Snap target offset.
    pub to: f64,
    /// Total running time.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Curve over elapsed time.
    pub ease: Ease,
}

impl SnapTween {
    /// Tween from `from` to `to` with duration picked by `timing`.
    pub fn new(from: f64, to: f64, viewport_height: f64, timing: &SnapTiming) -> Self {
        Self {
            from,
            to,
            duration: timing.duration_for(to - from, viewport_height),
            ease: timing.ease,
        }
    }

    /// Scroll offset `elapsed` into the tween; holds `to` once finished.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, self.ease.apply(t))
    }

    /// Whether `elapsed` covers the whole tween.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

mod duration_secs {
    use std::time::Duration;

    pub fn serialize<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snap/tween.rs"]
mod tests;
