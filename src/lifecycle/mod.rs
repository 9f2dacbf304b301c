//! Short-lived generated drawables that own their scene-graph membership.

pub mod ephemeral;
