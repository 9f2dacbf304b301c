//! Ambient-fx is a procedural ambient-scene animation engine.
//!
//! A [`Scene`] owns a tree of drawables, a cooperative scheduler and a random source.
//! Effects are built from plain config records and animate themselves through
//! behaviors that suspend on waits and tweens:
//!
//! - Build effects into a [`Scene`] ([`build_grid`], [`build_dead_star`], ...)
//! - Advance it with [`Scene::tick`] from the renderer's clock
//! - Paint [`Scene::render_list`] after every tick
//!
//! Rasterization is left to the caller; the crate does no I/O.
#![forbid(unsafe_code)]

pub mod animation;
pub mod effects;
pub mod foundation;
pub mod lifecycle;
pub mod procgen;
pub mod runtime;
pub mod scene;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Affine, Fps, FrameIndex, Point, Transform2D, Vec2};
pub use crate::foundation::error::{AmbientError, AmbientResult};
pub use crate::foundation::random::{RandomSource, SequenceRandom, StdRandom};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{Lerp, Tween};
pub use crate::lifecycle::ephemeral::Ephemeral;
pub use crate::procgen::disk::{jagged_path, sample_disk};
pub use crate::procgen::ridge::RidgeProfile;
pub use crate::procgen::ring::{ring_angles, ring_layout, ring_point, tilt_squash};
pub use crate::runtime::behavior::{
    Behavior, BehaviorCx, Goal, Looping, Step, Timeline, Track, from_fn, repeat,
};
pub use crate::runtime::scheduler::{Scheduler, TaskId};
pub use crate::scene::binding::Binding;
pub use crate::scene::drawable::{Drawable, PropertyKey, Shape, TextAlign, TextStyle};
pub use crate::scene::graph::{
    DrawableId, GraphStats, RenderItem, SceneGraph, SignalId, TweenTarget,
};
pub use crate::scene::session::{Scene, SceneStats};
pub use crate::scene::signal::PhaseSignal;

pub use crate::effects::dead_star::{DeadStar, DeadStarConfig, EmberConfig, build_dead_star};
pub use crate::effects::grid::{DepthLine, Grid, GridConfig, build_grid};
pub use crate::effects::shooting_star::{
    Projectile, ShootingStar, ShootingStarConfig, build_shooting_star,
};
pub use crate::effects::skyline::{Skyline, SkylineConfig, build_skyline};
pub use crate::effects::starfield::{
    StarFlickerConfig, Starfield, StarfieldConfig, build_starfield,
};
pub use crate::effects::striped_sun::{StripedSun, StripedSunConfig, build_striped_sun};
pub use crate::effects::title::{
    Title, TitleConfig, TitleFlickerConfig, TitleGlowStyle, TitleMainStyle, build_title,
};
