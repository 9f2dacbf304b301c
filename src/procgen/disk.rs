use std::f64::consts::TAU;

use crate::{foundation::core::Point, foundation::random::RandomSource};

/// Uniform point inside a disk of `radius` centered on the origin.
///
/// The square root on the radial sample keeps area density uniform; a plain
/// `r = radius * U` would pile points up near the center.
pub fn sample_disk(radius: f64, random: &mut dyn RandomSource) -> Point {
    let theta = random.next_f64() * TAU;
    let r = radius * random.next_f64().sqrt();
    Point::new(theta.cos() * r, theta.sin() * r)
}

/// A jagged polyline inside a disk: each point averages a fresh disk sample with the
/// previous point plus a `±bias` nudge, so consecutive segments stay close together.
pub fn jagged_path(
    radius: f64,
    points: usize,
    bias: f64,
    random: &mut dyn RandomSource,
) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points);
    for _ in 0..points {
        let sample = sample_disk(radius, random);
        let p = match out.last() {
            None => sample,
            Some(prev) => Point::new(
                (sample.x + prev.x + random.range(-bias, bias)) / 2.0,
                (sample.y + prev.y + random.range(-bias, bias)) / 2.0,
            ),
        };
        out.push(p);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/procgen/disk.rs"]
mod tests;
