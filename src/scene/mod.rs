//! Drawable tree, phase signals, bindings and the per-scene owner.

pub mod binding;
pub mod drawable;
pub mod graph;
pub mod session;
pub mod signal;
