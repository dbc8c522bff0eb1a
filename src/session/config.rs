use std::path::Path;
use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::error::{ScrubError, ScrubResult},
    snap::coordinator::DEFAULT_SNAP_TOLERANCE,
    snap::tween::SnapTiming,
};

// Upper bound for either snap tween duration.
const MAX_SNAP_DURATION_SECS: f64 = 60.0;

/// Engine options for a [`PageSession`](crate::PageSession).
///
/// Every field has a default, so `{}` is a complete options document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOpts {
    /// Membership tolerance around pinned regions, as a scroll fraction.
    pub snap_tolerance: f64,
    /// Shortest snap tween in seconds.
    pub snap_duration_min_secs: f64,
    /// Longest snap tween in seconds.
    pub snap_duration_max_secs: f64,
    /// Delay after the last mount before settle events may snap.
    pub settle_delay_ms: u64,
    /// Quiet period before a layout invalidation is applied.
    pub resize_debounce_ms: u64,
    /// Scroll offset past which the frame reports `scrolled`.
    pub nav_scrolled_threshold_px: f64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            snap_duration_min_secs: 0.15,
            snap_duration_max_secs: 0.35,
            settle_delay_ms: 500,
            resize_debounce_ms: 120,
            nav_scrolled_threshold_px: 100.0,
        }
    }
}

impl SessionOpts {
    /// Parse options from JSON and validate them.
    pub fn from_json(s: &str) -> ScrubResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScrubError::validation(format!("read options '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Range checks.
    pub fn validate(&self) -> ScrubResult<()> {
        if !(self.snap_tolerance.is_finite() && self.snap_tolerance >= 0.0) {
            return Err(ScrubError::validation(
                "snap_tolerance must be finite and >= 0",
            ));
        }
        for (name, v) in [
            ("snap_duration_min_secs", self.snap_duration_min_secs),
            ("snap_duration_max_secs", self.snap_duration_max_secs),
        ] {
            if !(v.is_finite() && (0.0..=MAX_SNAP_DURATION_SECS).contains(&v)) {
                return Err(ScrubError::validation(format!(
                    "{name} must be within [0, {MAX_SNAP_DURATION_SECS}], got {v}"
                )));
            }
        }
        if self.snap_duration_min_secs > self.snap_duration_max_secs {
            return Err(ScrubError::validation(
                "snap_duration_min_secs must be <= snap_duration_max_secs",
            ));
        }
        if !self.nav_scrolled_threshold_px.is_finite() {
            return Err(ScrubError::validation(
                "nav_scrolled_threshold_px must be finite",
            ));
        }
        Ok(())
    }

    /// Snap tween bounds derived from these options.
    ///
    /// Values that skipped [`Self::validate`] are clamped to the allowed
    /// range, or replaced by the defaults when not a length of time.
    pub fn snap_timing(&self) -> SnapTiming {
        let defaults = Self::default();
        let secs = |v: f64, fallback: f64| {
            let v = if v.is_finite() && v >= 0.0 {
                v.min(MAX_SNAP_DURATION_SECS)
            } else {
                fallback
            };
            Duration::from_secs_f64(v)
        };
        let min = secs(self.snap_duration_min_secs, defaults.snap_duration_min_secs);
        let max = secs(self.snap_duration_max_secs, defaults.snap_duration_max_secs);
        SnapTiming {
            min: min.min(max),
            max,
            ease: Ease::OutCubic,
        }
    }

    /// Settle arming delay.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Layout debounce window.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
