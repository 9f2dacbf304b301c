use crate::{
    foundation::check,
    foundation::color::Color,
    foundation::error::AmbientResult,
    foundation::random::RandomSource,
    procgen::ridge::{DEFAULT_SNAP_QUANTUM, RidgeProfile},
    scene::drawable::Drawable,
    scene::graph::DrawableId,
    scene::session::Scene,
};

/// Static filled silhouette: mountains from an explicit ridge, or a generated blocky
/// skyline when no usable ridge is given.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkylineConfig {
    pub color: Color,
    pub width: f64,
    pub height: f64,
    pub base_y: f64,
    pub bottom_y: f64,
    /// `[xRatio, yOffsetRatio]` pairs. Used verbatim when it has more than one point.
    #[serde(default)]
    pub ridge: Option<Vec<[f64; 2]>>,
    #[serde(default = "default_generate_count")]
    pub generate_count: u32,
    #[serde(default = "default_min_height_ratio")]
    pub min_height_ratio: f64,
    #[serde(default = "default_max_height_ratio")]
    pub max_height_ratio: f64,
    #[serde(default = "default_snap_quantum")]
    pub snap_quantum: f64,
}

fn default_generate_count() -> u32 {
    20
}

fn default_min_height_ratio() -> f64 {
    -0.18
}

fn default_max_height_ratio() -> f64 {
    -0.04
}

fn default_snap_quantum() -> f64 {
    DEFAULT_SNAP_QUANTUM
}

impl SkylineConfig {
    pub fn new(color: Color, width: f64, height: f64, base_y: f64, bottom_y: f64) -> Self {
        Self {
            color,
            width,
            height,
            base_y,
            bottom_y,
            ridge: None,
            generate_count: default_generate_count(),
            min_height_ratio: default_min_height_ratio(),
            max_height_ratio: default_max_height_ratio(),
            snap_quantum: default_snap_quantum(),
        }
    }

    pub fn with_ridge(mut self, ridge: Vec<[f64; 2]>) -> Self {
        self.ridge = Some(ridge);
        self
    }

    fn explicit_ridge(&self) -> Option<&[[f64; 2]]> {
        self.ridge.as_deref().filter(|r| r.len() > 1)
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::positive("width", self.width)?;
        check::positive("height", self.height)?;
        check::finite("baseY", self.base_y)?;
        check::finite("bottomY", self.bottom_y)?;
        match self.explicit_ridge() {
            Some(pairs) => {
                RidgeProfile::from_pairs(pairs)?;
            }
            None => {
                check::count("generateCount", self.generate_count)?;
                check::range("heightRatio", self.min_height_ratio, self.max_height_ratio)?;
                check::non_negative("snapQuantum", self.snap_quantum)?;
            }
        }
        Ok(())
    }

    /// The profile this config describes; draws from `random` only when generating.
    pub fn profile(&self, random: &mut dyn RandomSource) -> AmbientResult<RidgeProfile> {
        match self.explicit_ridge() {
            Some(pairs) => RidgeProfile::from_pairs(pairs),
            None => RidgeProfile::generate(
                self.generate_count,
                self.min_height_ratio,
                self.max_height_ratio,
                self.snap_quantum,
                random,
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Skyline {
    pub id: DrawableId,
    pub profile: RidgeProfile,
}

/// Insert the closed silhouette polygon under `parent`. Nothing is animated.
#[tracing::instrument(skip(scene, config))]
pub fn build_skyline(
    scene: &mut Scene,
    parent: DrawableId,
    config: &SkylineConfig,
) -> AmbientResult<Skyline> {
    config.validate()?;
    let (graph, random) = scene.parts_mut();
    let profile = config.profile(random)?;
    let polygon = profile.to_polygon(config.width, config.height, config.base_y, config.bottom_y);
    let id = graph.insert(parent, Drawable::polyline(polygon, true).with_fill(config.color))?;
    tracing::debug!(points = profile.len(), "skyline built");
    Ok(Skyline { id, profile })
}
