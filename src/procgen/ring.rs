use crate::{foundation::core::Point, foundation::random::RandomSource};

/// Default angular jitter for ring layouts, in radians.
pub const DEFAULT_RING_JITTER: f64 = 0.05;

/// Point on an ellipse of radius `radius` squashed vertically by `squash`.
pub fn ring_point(radius: f64, angle: f64, squash: f64) -> Point {
    Point::new(angle.cos() * radius, angle.sin() * radius * squash)
}

/// Vertical squash factor of a ring tilted by `tilt_deg` towards the viewer.
pub fn tilt_squash(tilt_deg: f64) -> f64 {
    tilt_deg.to_radians().cos()
}

/// Angles for `count` evenly spaced particles, each nudged by up to `±jitter`.
pub fn ring_angles(count: u32, jitter: f64, random: &mut dyn RandomSource) -> Vec<f64> {
    let n = f64::from(count.max(1));
    (0..count)
        .map(|i| std::f64::consts::TAU * f64::from(i) / n + random.range(-jitter, jitter))
        .collect()
}

/// Positions of a `count`-particle ring, in the order of their base angles.
pub fn ring_layout(
    radius: f64,
    squash: f64,
    count: u32,
    jitter: f64,
    random: &mut dyn RandomSource,
) -> Vec<Point> {
    ring_angles(count, jitter, random)
        .into_iter()
        .map(|a| ring_point(radius, a, squash))
        .collect()
}
