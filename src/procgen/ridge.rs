use crate::{
    foundation::check,
    foundation::core::Point,
    foundation::error::{AmbientError, AmbientResult},
    foundation::math::snap,
    foundation::random::RandomSource,
};

/// Height quantum that gives generated skylines their blocky steps.
pub const DEFAULT_SNAP_QUANTUM: f64 = 0.02;

/// Slack on the `[-0.5, 0.5]` coverage check for hand-written ridges.
const COVERAGE_EPSILON: f64 = 1e-6;

/// Normalized silhouette control points: `x` is an `xRatio` in `[-0.5, 0.5]`, `y` a
/// height offset ratio (negative values rise above the baseline).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RidgeProfile {
    points: Vec<Point>,
}

impl RidgeProfile {
    /// Wrap explicit control points. Needs at least two finite points with
    /// non-decreasing `x` that reach both edges of `[-0.5, 0.5]`.
    pub fn new(points: impl IntoIterator<Item = Point>) -> AmbientResult<Self> {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 2 {
            return Err(AmbientError::config(format!(
                "ridge needs at least 2 points (got {})",
                points.len()
            )));
        }
        for (i, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(AmbientError::config(format!(
                    "ridge point {i} is not finite ({}, {})",
                    p.x, p.y
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[1].x < w[0].x) {
            return Err(AmbientError::config(format!(
                "ridge xRatio must be non-decreasing (point {} goes back)",
                i + 1
            )));
        }
        let (first, last) = (points[0].x, points[points.len() - 1].x);
        if first > -0.5 + COVERAGE_EPSILON || last < 0.5 - COVERAGE_EPSILON {
            return Err(AmbientError::config(format!(
                "ridge xRatio must cover [-0.5, 0.5] (got [{first}, {last}])"
            )));
        }
        Ok(Self { points })
    }

    /// `[xRatio, yOffsetRatio]` pairs, as scene configs spell them.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> AmbientResult<Self> {
        Self::new(pairs.iter().map(|&[x, y]| Point::new(x, y)))
    }

    /// `count + 1` evenly spaced points across `[-0.5, 0.5]`, each height drawn from
    /// `[min, max]` and snapped to a multiple of `quantum`.
    pub fn generate(
        count: u32,
        min: f64,
        max: f64,
        quantum: f64,
        random: &mut dyn RandomSource,
    ) -> AmbientResult<Self> {
        let count = check::count("generateCount", count)?;
        let (min, max) = check::range("ridge height ratio", min, max)?;
        let quantum = check::finite("snap quantum", quantum)?;

        let n = f64::from(count);
        let points = (0..=count)
            .map(|i| {
                let x = -0.5 + f64::from(i) / n;
                Point::new(x, snap(random.range(min, max), quantum))
            })
            .collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scale into scene space and close the silhouette down to `bottom_y`.
    ///
    /// The closing edge runs to the right end of the baseline, the bottom-right corner
    /// and the bottom-left corner, in that order.
    pub fn to_polygon(&self, width: f64, height: f64, base_y: f64, bottom_y: f64) -> Vec<Point> {
        let half = width / 2.0;
        let mut out: Vec<Point> = self
            .points
            .iter()
            .map(|p| Point::new(p.x * width, base_y + p.y * height))
            .collect();
        out.extend([
            Point::new(half, base_y),
            Point::new(half, bottom_y),
            Point::new(-half, bottom_y),
        ]);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/procgen/ridge.rs"]
mod tests;
