//! Cooperative behaviors and the tick-driven scheduler that interleaves them.

pub mod behavior;
pub mod scheduler;
