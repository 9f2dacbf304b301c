//! The built-in ambient effects.
//!
//! Each effect is a config record plus a builder. Builders validate the whole record
//! first, then insert their drawables under a caller-chosen parent group and register
//! the behaviors (and bindings) that animate them.

use crate::foundation::core::Point;

pub mod dead_star;
pub mod grid;
pub mod shooting_star;
pub mod skyline;
pub mod starfield;
pub mod striped_sun;
pub mod title;

/// Scene configs spell positions as `[x, y]`.
pub(crate) fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}
