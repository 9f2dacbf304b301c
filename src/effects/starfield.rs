use crate::{
    foundation::check,
    foundation::color::Color,
    foundation::core::Point,
    foundation::error::AmbientResult,
    runtime::behavior::{Behavior, BehaviorCx, Goal, Looping, Timeline},
    scene::drawable::{Drawable, PropertyKey},
    scene::graph::{DrawableId, TweenTarget},
    scene::session::Scene,
};

/// Rare bright bursts layered on top of the twinkle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarFlickerConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Chance per cycle that a star bursts.
    #[serde(default = "default_probability")]
    pub probability: f64,
    #[serde(default = "default_burst_opacity")]
    pub burst_opacity: f64,
    #[serde(default = "default_min_in")]
    pub min_in: f64,
    #[serde(default = "default_max_in")]
    pub max_in: f64,
    #[serde(default = "default_min_out")]
    pub min_out: f64,
    #[serde(default = "default_max_out")]
    pub max_out: f64,
    #[serde(default = "default_scale_up")]
    pub scale_up: f64,
}

impl Default for StarFlickerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            probability: default_probability(),
            burst_opacity: default_burst_opacity(),
            min_in: default_min_in(),
            max_in: default_max_in(),
            min_out: default_min_out(),
            max_out: default_max_out(),
            scale_up: default_scale_up(),
        }
    }
}

fn default_probability() -> f64 {
    0.07
}

fn default_burst_opacity() -> f64 {
    1.0
}

fn default_min_in() -> f64 {
    0.02
}

fn default_max_in() -> f64 {
    0.08
}

fn default_min_out() -> f64 {
    0.08
}

fn default_max_out() -> f64 {
    0.16
}

fn default_scale_up() -> f64 {
    1.35
}

impl StarFlickerConfig {
    pub fn validate(&self) -> AmbientResult<()> {
        check::unit("probability", self.probability)?;
        check::unit("burstOpacity", self.burst_opacity)?;
        check::secs_range("flicker in", self.min_in, self.max_in)?;
        check::secs_range("flicker out", self.min_out, self.max_out)?;
        check::positive("scaleUp", self.scale_up)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarfieldConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    #[serde(default = "default_twinkle")]
    pub twinkle: bool,
    #[serde(default = "default_min_opacity")]
    pub min_opacity: f64,
    #[serde(default = "default_max_opacity")]
    pub max_opacity: f64,
    #[serde(default = "default_min_twinkle_duration")]
    pub min_twinkle_duration: f64,
    #[serde(default = "default_max_twinkle_duration")]
    pub max_twinkle_duration: f64,
    #[serde(default)]
    pub flicker: Option<StarFlickerConfig>,
}

fn default_count() -> u32 {
    120
}

fn default_color() -> Color {
    Color::WHITE
}

fn default_min_radius() -> f64 {
    1.0
}

fn default_max_radius() -> f64 {
    2.5
}

fn default_twinkle() -> bool {
    true
}

fn default_min_opacity() -> f64 {
    0.35
}

fn default_max_opacity() -> f64 {
    0.95
}

fn default_min_twinkle_duration() -> f64 {
    0.8
}

fn default_max_twinkle_duration() -> f64 {
    1.8
}

impl StarfieldConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            count: default_count(),
            color: default_color(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            twinkle: default_twinkle(),
            min_opacity: default_min_opacity(),
            max_opacity: default_max_opacity(),
            min_twinkle_duration: default_min_twinkle_duration(),
            max_twinkle_duration: default_max_twinkle_duration(),
            flicker: None,
        }
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::positive("width", self.width)?;
        check::positive("height", self.height)?;
        check::range("radius", self.min_radius, self.max_radius)?;
        check::non_negative("minRadius", self.min_radius)?;
        check::range("opacity", self.min_opacity, self.max_opacity)?;
        check::unit("minOpacity", self.min_opacity)?;
        check::unit("maxOpacity", self.max_opacity)?;
        check::secs_range(
            "twinkleDuration",
            self.min_twinkle_duration,
            self.max_twinkle_duration,
        )?;
        if let Some(flicker) = self.active_flicker() {
            flicker.validate()?;
        }
        Ok(())
    }

    fn active_flicker(&self) -> Option<&StarFlickerConfig> {
        self.flicker.as_ref().filter(|f| f.enabled)
    }

    /// Whether stars animate at all; a still field registers no behaviors.
    pub fn is_animated(&self) -> bool {
        self.twinkle || self.active_flicker().is_some()
    }
}

/// One twinkle cycle, optionally followed by a burst.
///
/// A burst brightens the star and settles it back to a random resting opacity; its scale
/// pop runs alongside in a spawned timeline that waits out the twinkle first.
fn star_cycle(star: DrawableId, config: &StarfieldConfig, cx: &mut BehaviorCx<'_>) -> Timeline {
    let opacity = TweenTarget::Drawable(star, PropertyKey::Opacity);
    let (lo, hi) = (config.min_opacity, config.max_opacity);
    let mut cycle = Timeline::new();
    if config.twinkle {
        let random = cx.random();
        let o1 = random.range(lo, hi);
        let d1 = random.range(config.min_twinkle_duration, config.max_twinkle_duration);
        let o2 = random.range(lo, hi);
        let d2 = random.range(config.min_twinkle_duration, config.max_twinkle_duration);
        cycle = cycle
            .tween(opacity, Goal::To(o1), d1)
            .tween(opacity, Goal::To(o2), d2);
    }

    let Some(flicker) = config.active_flicker() else {
        return cycle;
    };
    let random = cx.random();
    if !random.chance(flicker.probability) {
        return cycle;
    }
    let in_secs = random.range(flicker.min_in, flicker.max_in);
    let out_secs = random.range(flicker.min_out, flicker.max_out);
    let settle = random.range(lo, hi);

    let scale = TweenTarget::Drawable(star, PropertyKey::Scale);
    let lead = cycle.secs();
    tracing::trace!(star = star.raw(), at = cx.now() + lead, "star burst");
    // A zero wait would hold the pop back by one tick.
    let pop = if lead > 0.0 {
        Timeline::new().wait(lead)
    } else {
        Timeline::new()
    };
    cx.spawn(
        pop.tween(scale, Goal::To(flicker.scale_up), in_secs)
            .tween(scale, Goal::To(1.0), out_secs),
    );
    cycle
        .tween(opacity, Goal::To(flicker.burst_opacity), in_secs)
        .tween(opacity, Goal::To(settle), out_secs)
}

#[derive(Clone, Debug)]
pub struct Starfield {
    pub group: DrawableId,
    pub stars: Vec<DrawableId>,
}

#[tracing::instrument(skip(scene, config))]
pub fn build_starfield(
    scene: &mut Scene,
    parent: DrawableId,
    config: &StarfieldConfig,
) -> AmbientResult<Starfield> {
    config.validate()?;
    let (w, h) = (config.width, config.height);
    let group = scene.graph_mut().insert(parent, Drawable::group())?;
    let mut stars = Vec::with_capacity(config.count as usize);
    {
        let (graph, random) = scene.parts_mut();
        for _ in 0..config.count {
            let r = random.range(config.min_radius, config.max_radius);
            let at = Point::new(random.range(-w / 2.0, w / 2.0), random.range(-h / 2.0, h / 2.0));
            let opacity = random.range(config.min_opacity, config.max_opacity);
            let star = Drawable::circle(r * 2.0)
                .at(at)
                .with_fill(config.color)
                .with_opacity(opacity);
            stars.push(graph.insert(group, star)?);
        }
    }

    if config.is_animated() {
        for &star in &stars {
            let cfg = config.clone();
            scene.spawn(Looping::new(
                move |cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
                    Box::new(star_cycle(star, &cfg, cx))
                },
            ));
        }
    }

    tracing::debug!(stars = stars.len(), animated = config.is_animated(), "starfield built");
    Ok(Starfield { group, stars })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/starfield.rs"]
mod tests;
