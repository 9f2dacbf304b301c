//! Easing curves and the pure tween sampler driven by the scheduler.

pub mod ease;
pub mod tween;
