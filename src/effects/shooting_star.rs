use crate::{
    animation::tween::Tween,
    foundation::check,
    foundation::color::Color,
    foundation::core::Point,
    foundation::error::{AmbientError, AmbientResult},
    foundation::random::RandomSource,
    lifecycle::ephemeral::Ephemeral,
    runtime::behavior::{Behavior, BehaviorCx, Goal, Looping, Step, Timeline},
    runtime::scheduler::TaskId,
    scene::drawable::{Drawable, PropertyKey},
    scene::graph::{DrawableId, TweenTarget},
    scene::session::Scene,
};

/// A meteor crossing the sky with a short decaying trail, repeated at random intervals.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootingStarConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_head_radius")]
    pub head_radius: f64,
    /// Upper bound on live trail dots.
    #[serde(default = "default_trail_count")]
    pub trail_count: u32,
    /// Distance travelled between two trail dots, in px.
    #[serde(default = "default_trail_spacing")]
    pub trail_spacing: f64,
    #[serde(default = "default_trail_opacity_decay")]
    pub trail_opacity_decay: f64,
    /// How far each dot drifts back over its life; defaults to 1.5 x spacing.
    #[serde(default)]
    pub trail_drift: Option<f64>,
    /// Travel angle for angled passes, relative to +x in screen coordinates.
    #[serde(default = "default_angle_deg")]
    pub angle_deg: f64,
    /// px per second along the path.
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_min_delay")]
    pub min_delay: f64,
    #[serde(default = "default_max_delay")]
    pub max_delay: f64,
    #[serde(default = "default_start_x_ratio_min")]
    pub start_x_ratio_min: f64,
    #[serde(default = "default_start_x_ratio_max")]
    pub start_x_ratio_max: f64,
    #[serde(default = "default_start_y_ratio_min")]
    pub start_y_ratio_min: f64,
    #[serde(default = "default_start_y_ratio_max")]
    pub start_y_ratio_max: f64,
    /// Cross the whole canvas horizontally instead of along `angle_deg`.
    #[serde(default = "default_true")]
    pub horizontal: bool,
    /// Pick left-to-right or right-to-left at random for horizontal passes.
    #[serde(default = "default_true")]
    pub random_directions: bool,
    /// Lowest y a horizontal pass may use (usually just above the horizon).
    #[serde(default)]
    pub sky_bottom_y: Option<f64>,
    #[serde(default = "default_sky_margin")]
    pub sky_margin: f64,
    #[serde(default = "default_drift_y_max")]
    pub drift_y_max: f64,
    /// The head starts fading this many seconds before arrival.
    #[serde(default = "default_head_fade_lead")]
    pub head_fade_lead: f64,
}

fn default_color() -> Color {
    Color::rgb8(0xcf, 0xe9, 0xff)
}

fn default_head_radius() -> f64 {
    3.5
}

fn default_trail_count() -> u32 {
    6
}

fn default_trail_spacing() -> f64 {
    12.0
}

fn default_trail_opacity_decay() -> f64 {
    0.14
}

fn default_angle_deg() -> f64 {
    22.0
}

fn default_speed() -> f64 {
    600.0
}

fn default_min_delay() -> f64 {
    2.5
}

fn default_max_delay() -> f64 {
    6.0
}

fn default_start_x_ratio_min() -> f64 {
    -0.55
}

fn default_start_x_ratio_max() -> f64 {
    -0.10
}

fn default_start_y_ratio_min() -> f64 {
    -0.45
}

fn default_start_y_ratio_max() -> f64 {
    -0.15
}

fn default_true() -> bool {
    true
}

fn default_sky_margin() -> f64 {
    24.0
}

fn default_drift_y_max() -> f64 {
    40.0
}

fn default_head_fade_lead() -> f64 {
    0.2
}

impl ShootingStarConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            color: default_color(),
            head_radius: default_head_radius(),
            trail_count: default_trail_count(),
            trail_spacing: default_trail_spacing(),
            trail_opacity_decay: default_trail_opacity_decay(),
            trail_drift: None,
            angle_deg: default_angle_deg(),
            speed: default_speed(),
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
            start_x_ratio_min: default_start_x_ratio_min(),
            start_x_ratio_max: default_start_x_ratio_max(),
            start_y_ratio_min: default_start_y_ratio_min(),
            start_y_ratio_max: default_start_y_ratio_max(),
            horizontal: true,
            random_directions: true,
            sky_bottom_y: None,
            sky_margin: default_sky_margin(),
            drift_y_max: default_drift_y_max(),
            head_fade_lead: default_head_fade_lead(),
        }
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::positive("width", self.width)?;
        check::positive("height", self.height)?;
        check::positive("headRadius", self.head_radius)?;
        check::finite("trailSpacing", self.trail_spacing)?;
        check::unit("trailOpacityDecay", self.trail_opacity_decay)?;
        if let Some(drift) = self.trail_drift {
            check::finite("trailDrift", drift)?;
        }
        check::finite("angleDeg", self.angle_deg)?;
        check::positive("speed", self.speed)?;
        check::secs_range("delay", self.min_delay, self.max_delay)?;
        check::range("startXRatio", self.start_x_ratio_min, self.start_x_ratio_max)?;
        check::range("startYRatio", self.start_y_ratio_min, self.start_y_ratio_max)?;
        if let Some(y) = self.sky_bottom_y {
            check::finite("skyBottomY", y)?;
        }
        check::finite("skyMargin", self.sky_margin)?;
        check::non_negative("driftYMax", self.drift_y_max)?;
        check::secs("headFadeLead", self.head_fade_lead)?;
        Ok(())
    }

    fn spacing(&self) -> f64 {
        self.trail_spacing.max(2.0)
    }

    /// Seconds between two trail dots.
    pub fn trail_interval(&self) -> f64 {
        (self.spacing() / self.speed).max(0.012)
    }

    /// Diameter of a trail dot when emitted and when its fade ends.
    pub fn trail_dot_sizes(&self) -> (f64, f64) {
        let r = self.head_radius;
        ((r * 1.2).max(1.0) * 2.0, r.max(1.0) * 2.0)
    }

    /// Fade duration of one trail dot.
    pub fn trail_life(&self) -> f64 {
        (self.trail_interval() * f64::from(self.trail_count)).max(0.4)
    }

    /// The `[top, bottom]` y band horizontal passes stay inside.
    pub fn sky_band(&self) -> (f64, f64) {
        let bottom = self
            .sky_bottom_y
            .unwrap_or(self.start_y_ratio_max * self.height)
            - self.sky_margin;
        let top = -self.height / 2.0 + self.sky_margin;
        (top, bottom)
    }

    /// Draw the start and end of the next pass.
    pub fn pick_path(&self, random: &mut dyn RandomSource) -> (Point, Point) {
        let (w, h) = (self.width, self.height);
        if !self.horizontal {
            let start = Point::new(
                random.range(self.start_x_ratio_min * w, self.start_x_ratio_max * w),
                random.range(self.start_y_ratio_min * h, self.start_y_ratio_max * h),
            );
            let angle = self.angle_deg.to_radians();
            let travel = w.hypot(h) * 1.1;
            let end = start + kurbo::Vec2::new(angle.cos(), angle.sin()) * travel;
            return (start, end);
        }

        let (top, bottom) = self.sky_band();
        // `f64::clamp` panics on an inverted band; this prefers the bottom edge instead.
        let clamp_y = |y: f64| y.max(top).min(bottom);
        let margin = (w * 0.06).max(80.0);
        let y = clamp_y(random.range(self.start_y_ratio_min * h, self.start_y_ratio_max * h));
        let y_end = clamp_y(y + random.range(-self.drift_y_max, self.drift_y_max));
        let left = -w / 2.0 - margin;
        let right = w / 2.0 + margin;
        if self.random_directions && random.chance(0.5) {
            (Point::new(right, y), Point::new(left, y_end))
        } else {
            (Point::new(left, y), Point::new(right, y_end))
        }
    }
}

/// Straight-line motion at constant speed.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    path: Tween<Point>,
}

impl Projectile {
    pub fn new(start: Point, end: Point, speed: f64) -> AmbientResult<Self> {
        let speed = check::positive("speed", speed)?;
        let duration = (end - start).hypot() / speed;
        if !start.is_finite() || !end.is_finite() {
            return Err(AmbientError::config(format!(
                "projectile endpoints must be finite ({start:?} -> {end:?})"
            )));
        }
        Ok(Self {
            path: Tween::new(start, end, duration)?,
        })
    }

    pub fn start(&self) -> Point {
        self.path.from
    }

    pub fn end(&self) -> Point {
        self.path.to
    }

    pub fn length(&self) -> f64 {
        (self.path.to - self.path.from).hypot()
    }

    /// Travel time, `length / speed`.
    pub fn duration(&self) -> f64 {
        self.path.duration
    }

    /// Head position `t` seconds into the pass; clamped to the endpoints.
    pub fn position_at(&self, t: f64) -> Point {
        self.path.sample(t)
    }
}

/// Emits trail dots at the head's position until the pass is over.
struct TrailEmitter {
    head: DrawableId,
    trail: DrawableId,
    config: ShootingStarConfig,
    /// Unit vector against the direction of travel.
    back: kurbo::Vec2,
    remaining: f64,
}

impl Behavior for TrailEmitter {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        if self.remaining <= 0.0 {
            return None;
        }
        let cfg = &self.config;
        let interval = cfg.trail_interval();
        let live = cx.graph().children(self.trail).len();
        if live < cfg.trail_count as usize {
            if let Some(at) = cx.graph().get(self.head).map(Drawable::position) {
                let drift = self.back * cfg.trail_drift.unwrap_or(cfg.spacing() * 1.5);
                let (start_size, end_size) = cfg.trail_dot_sizes();
                let dot = Drawable::circle(start_size)
                    .at(at)
                    .with_fill(cfg.color)
                    .with_opacity((1.0 - cfg.trail_opacity_decay).max(0.3));
                // Inserted now so the next resume in this tick counts it.
                match Ephemeral::inserted(cx.graph_mut(), self.trail, dot, cfg.trail_life()) {
                    Ok(ephemeral) => {
                        cx.spawn(
                            ephemeral
                                .resize_to(end_size)
                                .drift_by(drift.x, drift.y),
                        );
                    }
                    Err(err) => tracing::warn!(%err, "trail dot not spawned"),
                }
            }
        }
        self.remaining -= interval;
        Some(Step::wait(interval))
    }
}

enum PassStage {
    Idle(f64),
    Launch,
    Arrived,
    Done,
}

/// One meteor pass: wait, fly across, hide.
struct MeteorPass {
    stage: PassStage,
    root: DrawableId,
    head: DrawableId,
    trail: DrawableId,
    config: ShootingStarConfig,
}

impl MeteorPass {
    fn launch(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        let (start, end) = self.config.pick_path(cx.random());
        let projectile = match Projectile::new(start, end, self.config.speed) {
            Ok(p) => p,
            Err(err) => {
                tracing::error!(%err, "meteor path rejected; skipping pass");
                return Some(Step::wait(0.0));
            }
        };
        let duration = projectile.duration();
        let head = self.head;
        let graph = cx.graph_mut();
        graph.write(TweenTarget::Drawable(head, PropertyKey::X), start.x);
        graph.write(TweenTarget::Drawable(head, PropertyKey::Y), start.y);
        graph.write(TweenTarget::Drawable(head, PropertyKey::Opacity), 1.0);
        graph.write(TweenTarget::Drawable(self.root, PropertyKey::Opacity), 1.0);
        tracing::trace!(?start, ?end, duration, at = cx.now(), "meteor launched");

        if self.config.trail_count > 0 {
            let back = (start - end).normalize();
            cx.spawn(TrailEmitter {
                head,
                trail: self.trail,
                config: self.config.clone(),
                back,
                remaining: duration,
            });
        }
        let lead = self.config.head_fade_lead;
        cx.spawn(
            Timeline::new()
                .wait((duration - lead).max(0.0))
                .tween(TweenTarget::Drawable(head, PropertyKey::Opacity), Goal::To(0.0), lead),
        );

        self.stage = PassStage::Arrived;
        Some(
            Step::tween(TweenTarget::Drawable(head, PropertyKey::X), Goal::To(end.x), duration)
                .and(TweenTarget::Drawable(head, PropertyKey::Y), Goal::To(end.y)),
        )
    }
}

impl Behavior for MeteorPass {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        match self.stage {
            PassStage::Idle(delay) => {
                self.stage = PassStage::Launch;
                Some(Step::wait(delay))
            }
            PassStage::Launch => self.launch(cx),
            PassStage::Arrived => {
                self.stage = PassStage::Done;
                cx.graph_mut()
                    .write(TweenTarget::Drawable(self.root, PropertyKey::Opacity), 0.0);
                None
            }
            PassStage::Done => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShootingStar {
    pub root: DrawableId,
    pub trail: DrawableId,
    pub head: DrawableId,
    pub passes: TaskId,
}

#[tracing::instrument(skip(scene, config))]
pub fn build_shooting_star(
    scene: &mut Scene,
    parent: DrawableId,
    config: &ShootingStarConfig,
) -> AmbientResult<ShootingStar> {
    config.validate()?;
    let graph = scene.graph_mut();
    // Hidden until the first pass starts.
    let root = graph.insert(parent, Drawable::group().with_opacity(0.0))?;
    let trail = graph.insert(root, Drawable::group())?;
    let head = graph.insert(
        root,
        Drawable::circle(config.head_radius * 2.0).with_fill(config.color),
    )?;

    let cfg = config.clone();
    let passes = scene.spawn(Looping::new(
        move |cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
            let delay = cx.random().range(cfg.min_delay, cfg.max_delay);
            Box::new(MeteorPass {
                stage: PassStage::Idle(delay),
                root,
                head,
                trail,
                config: cfg.clone(),
            })
        },
    ));

    tracing::debug!(horizontal = config.horizontal, "shooting star built");
    Ok(ShootingStar {
        root,
        trail,
        head,
        passes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shooting_star.rs"]
mod tests;
