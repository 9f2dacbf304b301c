use std::f64::consts::TAU;

use crate::{
    effects::point,
    foundation::check,
    foundation::color::Color,
    foundation::error::AmbientResult,
    lifecycle::ephemeral::Ephemeral,
    procgen::disk::jagged_path,
    procgen::ring::{DEFAULT_RING_JITTER, ring_layout, ring_point, tilt_squash},
    runtime::behavior::{Behavior, BehaviorCx, Goal, Looping, Step, Timeline, repeat},
    runtime::scheduler::TaskId,
    scene::drawable::{Drawable, PropertyKey},
    scene::graph::{DrawableId, SceneGraph, TweenTarget},
    scene::session::Scene,
};

/// Occasional embers that flare up on the debris ring and burn out.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmberConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ember_min_delay")]
    pub min_delay: f64,
    #[serde(default = "default_ember_max_delay")]
    pub max_delay: f64,
    #[serde(default = "default_ember_fade_seconds")]
    pub fade_seconds: f64,
    /// Final ember diameter as a fraction of the star's diameter (at least 4 px).
    #[serde(default = "default_ember_max_radius_factor")]
    pub max_radius_factor: f64,
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_delay: default_ember_min_delay(),
            max_delay: default_ember_max_delay(),
            fade_seconds: default_ember_fade_seconds(),
            max_radius_factor: default_ember_max_radius_factor(),
        }
    }
}

fn default_ember_min_delay() -> f64 {
    4.0
}

fn default_ember_max_delay() -> f64 {
    10.0
}

fn default_ember_fade_seconds() -> f64 {
    0.8
}

fn default_ember_max_radius_factor() -> f64 {
    0.18
}

impl EmberConfig {
    pub fn validate(&self) -> AmbientResult<()> {
        check::secs_range("ember delay", self.min_delay, self.max_delay)?;
        check::secs("fadeSeconds", self.fade_seconds)?;
        check::non_negative("maxRadiusFactor", self.max_radius_factor)?;
        Ok(())
    }
}

/// A burnt-out star: pulsing halo, dark core with flickering cracks, and a slowly
/// rotating tilted debris ring.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadStarConfig {
    pub center: [f64; 2],
    pub radius: f64,
    pub core_color: Color,
    pub halo_color: Color,
    pub crack_color: Color,
    pub ring_color: Color,
    #[serde(default = "default_halo_layers")]
    pub halo_layers: u32,
    #[serde(default = "default_halo_scale_min")]
    pub halo_scale_min: f64,
    #[serde(default = "default_halo_scale_max")]
    pub halo_scale_max: f64,
    #[serde(default = "default_halo_pulse_duration")]
    pub halo_pulse_duration: f64,
    #[serde(default = "default_halo_opacity")]
    pub halo_opacity: f64,
    #[serde(default = "default_crack_count")]
    pub crack_count: u32,
    #[serde(default = "default_crack_width")]
    pub crack_width: f64,
    #[serde(default = "default_crack_flicker_min")]
    pub crack_flicker_min: f64,
    #[serde(default = "default_crack_flicker_max")]
    pub crack_flicker_max: f64,
    /// Per-segment nudge that keeps crack points near their predecessor.
    #[serde(default = "default_crack_bias")]
    pub crack_bias: f64,
    /// Horizontal jitter applied around each crack's resting x.
    #[serde(default = "default_crack_jitter")]
    pub crack_jitter: f64,
    #[serde(default = "default_ring_radius_factor")]
    pub ring_radius_factor: f64,
    #[serde(default = "default_ring_particle_count")]
    pub ring_particle_count: u32,
    #[serde(default = "default_ring_particle_min")]
    pub ring_particle_min: f64,
    #[serde(default = "default_ring_particle_max")]
    pub ring_particle_max: f64,
    #[serde(default = "default_ring_rotation_seconds")]
    pub ring_rotation_seconds: f64,
    #[serde(default = "default_ring_tilt_deg")]
    pub ring_tilt_deg: f64,
    #[serde(default = "default_ring_opacity")]
    pub ring_opacity: f64,
    #[serde(default = "default_ring_jitter")]
    pub ring_jitter: f64,
    #[serde(default)]
    pub embers: Option<EmberConfig>,
}

fn default_halo_layers() -> u32 {
    3
}

fn default_halo_scale_min() -> f64 {
    1.05
}

fn default_halo_scale_max() -> f64 {
    1.22
}

fn default_halo_pulse_duration() -> f64 {
    3.6
}

fn default_halo_opacity() -> f64 {
    0.22
}

fn default_crack_count() -> u32 {
    8
}

fn default_crack_width() -> f64 {
    3.0
}

fn default_crack_flicker_min() -> f64 {
    0.4
}

fn default_crack_flicker_max() -> f64 {
    1.2
}

fn default_crack_bias() -> f64 {
    10.0
}

fn default_crack_jitter() -> f64 {
    1.5
}

fn default_ring_radius_factor() -> f64 {
    1.35
}

fn default_ring_particle_count() -> u32 {
    56
}

fn default_ring_particle_min() -> f64 {
    1.0
}

fn default_ring_particle_max() -> f64 {
    2.0
}

fn default_ring_rotation_seconds() -> f64 {
    36.0
}

fn default_ring_tilt_deg() -> f64 {
    18.0
}

fn default_ring_opacity() -> f64 {
    0.65
}

fn default_ring_jitter() -> f64 {
    DEFAULT_RING_JITTER
}

impl DeadStarConfig {
    pub fn new(
        center: [f64; 2],
        radius: f64,
        core_color: Color,
        halo_color: Color,
        crack_color: Color,
        ring_color: Color,
    ) -> Self {
        Self {
            center,
            radius,
            core_color,
            halo_color,
            crack_color,
            ring_color,
            halo_layers: default_halo_layers(),
            halo_scale_min: default_halo_scale_min(),
            halo_scale_max: default_halo_scale_max(),
            halo_pulse_duration: default_halo_pulse_duration(),
            halo_opacity: default_halo_opacity(),
            crack_count: default_crack_count(),
            crack_width: default_crack_width(),
            crack_flicker_min: default_crack_flicker_min(),
            crack_flicker_max: default_crack_flicker_max(),
            crack_bias: default_crack_bias(),
            crack_jitter: default_crack_jitter(),
            ring_radius_factor: default_ring_radius_factor(),
            ring_particle_count: default_ring_particle_count(),
            ring_particle_min: default_ring_particle_min(),
            ring_particle_max: default_ring_particle_max(),
            ring_rotation_seconds: default_ring_rotation_seconds(),
            ring_tilt_deg: default_ring_tilt_deg(),
            ring_opacity: default_ring_opacity(),
            ring_jitter: default_ring_jitter(),
            embers: None,
        }
    }

    pub fn with_embers(mut self, embers: EmberConfig) -> Self {
        self.embers = Some(embers);
        self
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::finite("center.x", self.center[0])?;
        check::finite("center.y", self.center[1])?;
        check::positive("radius", self.radius)?;
        check::positive("haloScaleMin", self.halo_scale_min)?;
        check::positive("haloScaleMax", self.halo_scale_max)?;
        check::positive("haloPulseDuration", self.halo_pulse_duration)?;
        check::unit("haloOpacity", self.halo_opacity)?;
        check::non_negative("crackWidth", self.crack_width)?;
        check::secs_range("crackFlicker", self.crack_flicker_min, self.crack_flicker_max)?;
        check::non_negative("crackBias", self.crack_bias)?;
        check::non_negative("crackJitter", self.crack_jitter)?;
        check::positive("ringRadiusFactor", self.ring_radius_factor)?;
        check::count("ringParticleCount", self.ring_particle_count)?;
        check::range("ringParticle", self.ring_particle_min, self.ring_particle_max)?;
        check::non_negative("ringParticleMin", self.ring_particle_min)?;
        check::positive("ringRotationSeconds", self.ring_rotation_seconds)?;
        check::finite("ringTiltDeg", self.ring_tilt_deg)?;
        check::unit("ringOpacity", self.ring_opacity)?;
        check::non_negative("ringJitter", self.ring_jitter)?;
        if let Some(embers) = self.embers.as_ref().filter(|e| e.enabled) {
            embers.validate()?;
        }
        Ok(())
    }

    pub fn ring_radius(&self) -> f64 {
        self.radius * self.ring_radius_factor
    }
}

/// One ember cycle: idle for `delay`, then run the ember to removal.
struct EmberPass {
    delay: Option<f64>,
    ember: Ephemeral,
}

impl Behavior for EmberPass {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        if let Some(delay) = self.delay.take() {
            return Some(Step::wait(delay));
        }
        self.ember.resume(cx)
    }

    fn release(&mut self, graph: &mut SceneGraph) {
        self.ember.release(graph);
    }
}

/// Handles to the pieces of a built dead star.
#[derive(Clone, Debug)]
pub struct DeadStar {
    pub group: DrawableId,
    pub halos: Vec<DrawableId>,
    pub core: DrawableId,
    pub cracks: Vec<DrawableId>,
    pub ring: DrawableId,
    pub particles: Vec<DrawableId>,
    pub embers: Option<TaskId>,
}

#[tracing::instrument(skip(scene, config))]
pub fn build_dead_star(
    scene: &mut Scene,
    parent: DrawableId,
    config: &DeadStarConfig,
) -> AmbientResult<DeadStar> {
    config.validate()?;
    let radius = config.radius;
    let diameter = radius * 2.0;
    let group = scene
        .graph_mut()
        .insert(parent, Drawable::group().at(point(config.center)))?;

    let layers = f64::from(config.halo_layers);
    let mut halos = Vec::with_capacity(config.halo_layers as usize);
    for i in 0..config.halo_layers {
        let fi = f64::from(i);
        let halo = Drawable::circle(diameter)
            .with_fill(config.halo_color)
            .with_opacity(config.halo_opacity * (1.0 - fi / (layers + 1.0)))
            .with_scale(1.0 + (fi + 1.0) * ((config.halo_scale_min - 1.0) / layers));
        let id = scene.graph_mut().insert(group, halo)?;
        halos.push(id);

        let period = config.halo_pulse_duration * (1.0 + fi * 0.15);
        let scale = TweenTarget::Drawable(id, PropertyKey::Scale);
        scene.spawn(repeat(
            Timeline::new()
                .tween(scale, Goal::To(config.halo_scale_max + fi * 0.05), period)
                .tween(scale, Goal::To(config.halo_scale_min + fi * 0.05), period)
                .build()?,
        ));
    }

    let core = scene
        .graph_mut()
        .insert(group, Drawable::circle(diameter).with_fill(config.core_color))?;

    let mut cracks = Vec::with_capacity(config.crack_count as usize);
    for _ in 0..config.crack_count {
        let (graph, random) = scene.parts_mut();
        let segments = random.range(3.0, 6.0).floor() as usize;
        let points = jagged_path(radius * 0.95, segments, config.crack_bias, random);
        let crack = Drawable::polyline(points, false)
            .with_stroke(config.crack_color, config.crack_width)
            .with_opacity(random.range(0.25, 0.7));
        let id = graph.insert(group, crack)?;
        cracks.push(id);
        scene.spawn(crack_flicker(id, config));
    }

    let ring_radius = config.ring_radius();
    let squash = tilt_squash(config.ring_tilt_deg);
    let ring = scene
        .graph_mut()
        .insert(group, Drawable::group().with_opacity(config.ring_opacity))?;
    let mut particles = Vec::with_capacity(config.ring_particle_count as usize);
    {
        let (graph, random) = scene.parts_mut();
        let layout = ring_layout(
            ring_radius,
            squash,
            config.ring_particle_count,
            config.ring_jitter,
            random,
        );
        for at in layout {
            let size = random.range(config.ring_particle_min, config.ring_particle_max) * 2.0;
            let particle = Drawable::circle(size)
                .at(at)
                .with_fill(config.ring_color)
                .with_opacity(random.range(0.6, 0.95));
            particles.push(graph.insert(ring, particle)?);
        }
    }
    scene.spawn(repeat(
        Timeline::new()
            .tween(
                TweenTarget::Drawable(ring, PropertyKey::Rotation),
                Goal::By(TAU),
                config.ring_rotation_seconds,
            )
            .build()?,
    ));

    let embers = match config.embers.as_ref().filter(|e| e.enabled) {
        Some(ember_cfg) => {
            let ember_cfg = ember_cfg.clone();
            let color = config.ring_color;
            let target_size = (diameter * ember_cfg.max_radius_factor).max(4.0);
            Some(scene.spawn(Looping::new(
                move |cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
                    let delay = cx.random().range(ember_cfg.min_delay, ember_cfg.max_delay);
                    let angle = cx.random().range(0.0, TAU);
                    let ember = Drawable::circle(2.0)
                        .at(ring_point(ring_radius, angle, squash))
                        .with_fill(color)
                        .with_opacity(0.9);
                    Box::new(EmberPass {
                        delay: Some(delay),
                        ember: Ephemeral::prevalidated(group, ember, ember_cfg.fade_seconds)
                            .resize_to(target_size),
                    })
                },
            )))
        }
        None => None,
    };

    tracing::debug!(
        halos = halos.len(),
        cracks = cracks.len(),
        particles = particles.len(),
        embers = embers.is_some(),
        "dead star built"
    );
    Ok(DeadStar {
        group,
        halos,
        core,
        cracks,
        ring,
        particles,
        embers,
    })
}

/// Irregular crack flicker: random dim/recover durations every cycle, then a two-step
/// horizontal jitter around the crack's resting x.
fn crack_flicker(crack: DrawableId, config: &DeadStarConfig) -> impl Behavior + 'static {
    let (min, max) = (config.crack_flicker_min, config.crack_flicker_max);
    let jitter = config.crack_jitter;
    let opacity = TweenTarget::Drawable(crack, PropertyKey::Opacity);
    let x = TweenTarget::Drawable(crack, PropertyKey::X);
    Looping::new(move |cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
        let random = cx.random();
        let down = random.range(min, max);
        let up = random.range(min, max);
        let dim = random.range(0.15, 0.4);
        let bright = random.range(0.5, 1.0);
        let j1 = random.range(-jitter, jitter);
        let j2 = random.range(-jitter, jitter);
        Box::new(
            Timeline::new()
                .tween(opacity, Goal::To(dim), down)
                .tween(opacity, Goal::To(bright), up)
                .tween(x, Goal::To(j1), 0.1)
                .tween(x, Goal::To(j2), 0.1),
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dead_star.rs"]
mod tests;
