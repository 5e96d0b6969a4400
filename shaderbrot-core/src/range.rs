//! Affine interval mapping (the "Processing `map`" function).

use crate::error::CoreError;

/// Map `value` from `[src_min, src_max]` onto `[dst_min, dst_max]`.
///
/// The map is affine and unclamped: values outside the source interval land
/// outside the destination interval. Swapping either pair of endpoints flips
/// the direction of the map, which is how screen-space Y is inverted.
///
/// Precondition: `src_min != src_max`. A zero source span yields a
/// non-finite result rather than an error; use [`try_rescale`] when the
/// span comes from outside the caller's control.
#[inline]
pub fn rescale(value: f64, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> f64 {
    let t = (value - src_min) / (src_max - src_min);
    t * (dst_max - dst_min) + dst_min
}

/// Checked form of [`rescale`] that refuses a zero (or non-finite) source span.
pub fn try_rescale(
    value: f64,
    src_min: f64,
    src_max: f64,
    dst_min: f64,
    dst_max: f64,
) -> crate::Result<f64> {
    let span = src_max - src_min;
    if span == 0.0 || !span.is_finite() {
        return Err(CoreError::DegenerateRange {
            min: src_min,
            max: src_max,
        });
    }
    Ok(rescale(value, src_min, src_max, dst_min, dst_max))
}
