use crate::{FwError, FwResult};

/// Floating point type used for every physical quantity
pub type Real = f64;

/// Fail with [`FwError::NonFinite`] unless `v` is finite.
pub fn ensure_finite(v: Real, what: &'static str) -> FwResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FwError::NonFinite { what, value: v })
    }
}

/// Raise `v` to at least `floor`.
///
/// NaN inputs resolve to `floor`, so the result is always usable as a divisor
/// when `floor > 0`.
pub fn floor_positive(v: Real, floor: Real) -> Real {
    v.max(floor)
}

/// Clamp `v` into `[-limit, limit]`.
///
/// Unlike `f64::clamp` this never panics: the magnitude of `limit` is used and
/// a NaN `v` passes through unchanged.
pub fn clamp_symmetric(v: Real, limit: Real) -> Real {
    let limit = limit.abs();
    if v > limit {
        limit
    } else if v < -limit {
        -limit
    } else {
        v
    }
}

/// Round to `decimals` places (half away from zero).
pub fn round_to(v: Real, decimals: i32) -> Real {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
