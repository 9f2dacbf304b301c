//! Fail-fast parameter checks shared by config records and step builders.

use crate::foundation::error::{AmbientError, AmbientResult};

/// A duration in seconds: finite and `>= 0`.
pub fn secs(name: &str, v: f64) -> AmbientResult<f64> {
    if !v.is_finite() || v < 0.0 {
        return Err(AmbientError::config(format!(
            "{name} must be a finite duration >= 0 (got {v})"
        )));
    }
    Ok(v)
}

/// Finite and strictly positive.
pub fn positive(name: &str, v: f64) -> AmbientResult<f64> {
    if !v.is_finite() || v <= 0.0 {
        return Err(AmbientError::config(format!(
            "{name} must be finite and > 0 (got {v})"
        )));
    }
    Ok(v)
}

/// Any finite value.
pub fn finite(name: &str, v: f64) -> AmbientResult<f64> {
    if !v.is_finite() {
        return Err(AmbientError::config(format!("{name} must be finite (got {v})")));
    }
    Ok(v)
}

/// Finite and `>= 0` (widths, radii, magnitudes).
pub fn non_negative(name: &str, v: f64) -> AmbientResult<f64> {
    if !v.is_finite() || v < 0.0 {
        return Err(AmbientError::config(format!(
            "{name} must be finite and >= 0 (got {v})"
        )));
    }
    Ok(v)
}

pub fn count(name: &str, n: u32) -> AmbientResult<u32> {
    if n == 0 {
        return Err(AmbientError::config(format!("{name} must be > 0")));
    }
    Ok(n)
}

/// Finite bounds with `min <= max`.
pub fn range(name: &str, min: f64, max: f64) -> AmbientResult<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() {
        return Err(AmbientError::config(format!(
            "{name} bounds must be finite (got [{min}, {max}])"
        )));
    }
    if min > max {
        return Err(AmbientError::config(format!(
            "{name} min must be <= max (got [{min}, {max}])"
        )));
    }
    Ok((min, max))
}

/// A duration range: both bounds valid durations and ordered.
pub fn secs_range(name: &str, min: f64, max: f64) -> AmbientResult<(f64, f64)> {
    secs(name, min)?;
    secs(name, max)?;
    range(name, min, max)
}

/// Opacity-like value in `[0, 1]`.
pub fn unit(name: &str, v: f64) -> AmbientResult<f64> {
    if !(0.0..=1.0).contains(&v) {
        return Err(AmbientError::config(format!(
            "{name} must be within [0, 1] (got {v})"
        )));
    }
    Ok(v)
}
