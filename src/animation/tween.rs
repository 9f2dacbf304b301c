use crate::{
    animation::ease::Ease,
    foundation::check,
    foundation::core::Point,
    foundation::error::AmbientResult,
};

/// Interpolation contract for tweenable value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// A time-bounded interpolation from `from` to `to`.
///
/// Sampling is a pure function of elapsed seconds; the scheduler owns the clock and
/// writes the sampled value back into the tweened property.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub duration: f64,
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// Linear tween. Negative or non-finite durations are rejected.
    pub fn new(from: T, to: T, duration: f64) -> AmbientResult<Self> {
        let duration = check::secs("tween duration", duration)?;
        Ok(Self {
            from,
            to,
            duration,
            ease: Ease::Linear,
        })
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Normalized progress in `[0, 1]`; a zero-length tween is always complete.
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, elapsed: f64) -> bool {
        self.progress(elapsed) >= 1.0
    }

    pub fn sample(&self, elapsed: f64) -> T {
        let t = self.progress(elapsed);
        if t >= 1.0 {
            // Land exactly on the target; `a + (b - a) * 1.0` can drift by an ulp.
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
