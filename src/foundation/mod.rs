//! Value types, errors, colors, random sources and validation shared by every layer.

pub mod check;
pub mod color;
pub mod core;
pub mod error;
pub mod math;
pub mod random;
