use crate::WgError;

/// Floating point type used throughout system
pub type Real = f64;

/// Guide-rate sums at or below this value yield a zero fraction.
pub const GUIDE_RATE_EPSILON: Real = 1e-12;

/// Lower bound for computed group target rates.
pub const MIN_TARGET_RATE: Real = 1e-12;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WgError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WgError::NonFinite { what, value: v })
    }
}

/// `num / den`, or zero when `den` does not exceed [`GUIDE_RATE_EPSILON`].
pub fn guarded_ratio(num: Real, den: Real) -> Real {
    if den > GUIDE_RATE_EPSILON {
        num / den
    } else {
        0.0
    }
}
