use crate::{
    effects::point,
    foundation::check,
    foundation::color::Color,
    foundation::core::Point,
    foundation::error::AmbientResult,
    runtime::behavior::{Goal, Timeline, repeat},
    runtime::scheduler::TaskId,
    scene::drawable::{Drawable, PropertyKey},
    scene::graph::{DrawableId, TweenTarget},
    scene::session::Scene,
};

/// A synthwave sun: a filled disc cut by horizontal stripes in the background color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripedSunConfig {
    pub radius: f64,
    pub color: Color,
    pub center: [f64; 2],
    #[serde(default = "default_stripe_gap")]
    pub stripe_gap: f64,
    #[serde(default = "default_stripe_thickness")]
    pub stripe_thickness: f64,
    #[serde(default)]
    pub animate_pulse: bool,
    #[serde(default = "default_pulse_scale")]
    pub pulse_scale: f64,
    #[serde(default = "default_pulse_duration")]
    pub pulse_duration: f64,
    #[serde(default = "default_background")]
    pub background: Color,
}

fn default_stripe_gap() -> f64 {
    16.0
}

fn default_stripe_thickness() -> f64 {
    8.0
}

fn default_pulse_scale() -> f64 {
    1.03
}

fn default_pulse_duration() -> f64 {
    2.4
}

fn default_background() -> Color {
    Color::BLACK
}

impl StripedSunConfig {
    pub fn new(radius: f64, color: Color, center: [f64; 2]) -> Self {
        Self {
            radius,
            color,
            center,
            stripe_gap: default_stripe_gap(),
            stripe_thickness: default_stripe_thickness(),
            animate_pulse: false,
            pulse_scale: default_pulse_scale(),
            pulse_duration: default_pulse_duration(),
            background: default_background(),
        }
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::positive("radius", self.radius)?;
        check::finite("center.x", self.center[0])?;
        check::finite("center.y", self.center[1])?;
        check::positive("stripeGap", self.stripe_gap)?;
        check::non_negative("stripeThickness", self.stripe_thickness)?;
        check::positive("pulseScale", self.pulse_scale)?;
        check::secs("pulseDuration", self.pulse_duration)?;
        Ok(())
    }

    /// `(y, half_width)` of every stripe chord, top to bottom. Chords shorter than 2 px
    /// are skipped.
    pub fn stripes(&self) -> Vec<(f64, f64)> {
        let r = self.radius;
        let mut out = Vec::new();
        let mut y = -r + self.stripe_gap;
        while y < r {
            let half = (r * r - y * y).max(0.0).sqrt();
            if half >= 1.0 {
                out.push((y, half));
            }
            y += self.stripe_gap;
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct StripedSun {
    pub group: DrawableId,
    pub disc: DrawableId,
    pub stripes: Vec<DrawableId>,
    pub pulse: Option<TaskId>,
}

#[tracing::instrument(skip(scene, config))]
pub fn build_striped_sun(
    scene: &mut Scene,
    parent: DrawableId,
    config: &StripedSunConfig,
) -> AmbientResult<StripedSun> {
    config.validate()?;
    let graph = scene.graph_mut();
    let group = graph.insert(parent, Drawable::group().at(point(config.center)))?;
    let disc = graph.insert(
        group,
        Drawable::circle(config.radius * 2.0).with_fill(config.color),
    )?;
    let mut stripes = Vec::new();
    for (y, half) in config.stripes() {
        let chord = Drawable::polyline([Point::new(-half, y), Point::new(half, y)], false)
            .with_stroke(config.background, config.stripe_thickness);
        stripes.push(graph.insert(group, chord)?);
    }

    let pulse = if config.animate_pulse {
        let scale = TweenTarget::Drawable(group, PropertyKey::Scale);
        Some(scene.spawn(repeat(
            Timeline::new()
                .tween(scale, Goal::To(config.pulse_scale), config.pulse_duration)
                .tween(scale, Goal::To(1.0), config.pulse_duration)
                .build()?,
        )))
    } else {
        None
    };

    tracing::debug!(stripes = stripes.len(), pulse = pulse.is_some(), "striped sun built");
    Ok(StripedSun {
        group,
        disc,
        stripes,
        pulse,
    })
}
