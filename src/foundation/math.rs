/// Slack applied when comparing accumulated timeline positions against the clock.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

/// Fractional part, always in `[0, 1)` (also for negative inputs).
pub fn fract(v: f64) -> f64 {
    v - v.floor()
}

/// Round `v` to the nearest multiple of `quantum`. A non-positive quantum is a no-op.
pub fn snap(v: f64, quantum: f64) -> f64 {
    if quantum <= 0.0 {
        return v;
    }
    (v / quantum).round() * quantum
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
