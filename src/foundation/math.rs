/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fraction of `len` covered by `offset`, or `None` when `len` is not positive.
pub(crate) fn fraction_of(offset: f64, len: f64) -> Option<f64> {
    if len > 0.0 && len.is_finite() {
        Some(offset / len)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
