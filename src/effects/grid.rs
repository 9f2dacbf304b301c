use crate::{
    foundation::check,
    foundation::color::Color,
    foundation::core::Point,
    foundation::error::AmbientResult,
    foundation::math::fract,
    runtime::behavior::{Goal, Timeline, repeat},
    runtime::scheduler::TaskId,
    scene::binding::Binding,
    scene::drawable::Drawable,
    scene::graph::{DrawableId, SceneGraph, SignalId, TweenTarget},
    scene::session::Scene,
};

/// Retro perspective floor: static rails converging on a vanishing point and depth lines
/// flowing towards the viewer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub width: f64,
    pub bottom_y: f64,
    pub horizon_y: f64,
    pub vanishing_x: f64,
    pub stroke: Color,
    pub glow: Color,
    /// Rails per side; `2n + 1` rails are drawn.
    #[serde(default = "default_vertical_count")]
    pub vertical_count: u32,
    #[serde(default = "default_horizontal_count")]
    pub horizontal_count: u32,
    #[serde(default = "default_rail_bottom_width_factor")]
    pub rail_bottom_width_factor: f64,
    #[serde(default = "default_vertical_line_width")]
    pub vertical_line_width: f64,
    #[serde(default = "default_h_width_min")]
    pub h_width_min: f64,
    #[serde(default = "default_h_width_max_extra")]
    pub h_width_max_extra: f64,
    #[serde(default = "default_line_base_width")]
    pub line_base_width: f64,
    #[serde(default = "default_line_grow_width")]
    pub line_grow_width: f64,
    #[serde(default = "default_line_width_growth_power")]
    pub line_width_growth_power: f64,
    /// Seconds for the phase to advance by one full line spacing.
    #[serde(default = "default_flow_duration")]
    pub flow_duration: f64,
    #[serde(default = "default_glow_alt_frequency")]
    pub glow_alt_frequency: f64,
    #[serde(default = "default_perspective_exponent")]
    pub perspective_exponent: f64,
}

fn default_vertical_count() -> u32 {
    12
}

fn default_horizontal_count() -> u32 {
    14
}

fn default_rail_bottom_width_factor() -> f64 {
    1.2
}

fn default_vertical_line_width() -> f64 {
    2.0
}

fn default_h_width_min() -> f64 {
    0.18
}

fn default_h_width_max_extra() -> f64 {
    0.9
}

fn default_line_base_width() -> f64 {
    1.0
}

fn default_line_grow_width() -> f64 {
    2.5
}

fn default_line_width_growth_power() -> f64 {
    1.6
}

fn default_flow_duration() -> f64 {
    2.4
}

fn default_glow_alt_frequency() -> f64 {
    2.0
}

fn default_perspective_exponent() -> f64 {
    2.2
}

/// Where one depth line sits for a given phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthLine {
    pub y: f64,
    pub half_width: f64,
    pub line_width: f64,
    pub glowing: bool,
}

impl GridConfig {
    pub fn new(
        width: f64,
        bottom_y: f64,
        horizon_y: f64,
        vanishing_x: f64,
        stroke: Color,
        glow: Color,
    ) -> Self {
        Self {
            width,
            bottom_y,
            horizon_y,
            vanishing_x,
            stroke,
            glow,
            vertical_count: default_vertical_count(),
            horizontal_count: default_horizontal_count(),
            rail_bottom_width_factor: default_rail_bottom_width_factor(),
            vertical_line_width: default_vertical_line_width(),
            h_width_min: default_h_width_min(),
            h_width_max_extra: default_h_width_max_extra(),
            line_base_width: default_line_base_width(),
            line_grow_width: default_line_grow_width(),
            line_width_growth_power: default_line_width_growth_power(),
            flow_duration: default_flow_duration(),
            glow_alt_frequency: default_glow_alt_frequency(),
            perspective_exponent: default_perspective_exponent(),
        }
    }

    pub fn validate(&self) -> AmbientResult<()> {
        check::positive("width", self.width)?;
        check::finite("bottomY", self.bottom_y)?;
        check::finite("horizonY", self.horizon_y)?;
        check::finite("vanishingX", self.vanishing_x)?;
        check::count("verticalCount", self.vertical_count)?;
        check::count("horizontalCount", self.horizontal_count)?;
        check::finite("railBottomWidthFactor", self.rail_bottom_width_factor)?;
        check::non_negative("verticalLineWidth", self.vertical_line_width)?;
        check::finite("hWidthMin", self.h_width_min)?;
        check::finite("hWidthMaxExtra", self.h_width_max_extra)?;
        check::non_negative("lineBaseWidth", self.line_base_width)?;
        check::finite("lineGrowWidth", self.line_grow_width)?;
        check::positive("lineWidthGrowthPower", self.line_width_growth_power)?;
        check::positive("flowDuration", self.flow_duration)?;
        check::finite("glowAltFrequency", self.glow_alt_frequency)?;
        check::positive("perspectiveExponent", self.perspective_exponent)?;
        Ok(())
    }

    /// Project the shared phase onto depth line `index`.
    ///
    /// `p = fract(phase + index / count)`; the power curve bunches lines up near the
    /// horizon so they appear to rush towards the viewer.
    pub fn depth_line(&self, phase: f64, index: u32) -> DepthLine {
        let offset = f64::from(index) / f64::from(self.horizontal_count);
        let p = fract(phase + offset);
        DepthLine {
            y: self.horizon_y
                + (self.bottom_y - self.horizon_y) * p.powf(self.perspective_exponent),
            half_width: self.width * (self.h_width_min + self.h_width_max_extra * p),
            line_width: self.line_base_width
                + self.line_grow_width * p.powf(self.line_width_growth_power),
            glowing: fract(phase * self.glow_alt_frequency + offset) >= 0.5,
        }
    }

    /// Bottom end of rail `i` in `-vertical_count..=vertical_count`.
    pub fn rail_bottom(&self, i: i64) -> Point {
        let t = i as f64 / f64::from(self.vertical_count);
        Point::new(t * self.width * self.rail_bottom_width_factor, self.bottom_y)
    }
}

/// Re-projects every depth line from the grid phase after each tick.
struct GridFlow {
    config: GridConfig,
    phase: SignalId,
    lines: Vec<DrawableId>,
}

impl Binding for GridFlow {
    fn apply(&mut self, graph: &mut SceneGraph) {
        let Some(phase) = graph.signal(self.phase).map(|s| s.value()) else {
            return;
        };
        for (index, &id) in (0u32..).zip(&self.lines) {
            let line = self.config.depth_line(phase, index);
            let Some(d) = graph.get_mut(id) else {
                continue;
            };
            d.set_points([
                Point::new(-line.half_width, line.y),
                Point::new(line.half_width, line.y),
            ]);
            d.line_width = line.line_width;
            d.stroke = Some(if line.glowing {
                self.config.glow
            } else {
                self.config.stroke
            });
        }
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    pub group: DrawableId,
    pub phase: SignalId,
    pub rails: Vec<DrawableId>,
    pub depth_lines: Vec<DrawableId>,
    pub flow: TaskId,
}

#[tracing::instrument(skip(scene, config))]
pub fn build_grid(
    scene: &mut Scene,
    parent: DrawableId,
    config: &GridConfig,
) -> AmbientResult<Grid> {
    config.validate()?;
    let graph = scene.graph_mut();
    let group = graph.insert(parent, Drawable::group())?;

    let n = i64::from(config.vertical_count);
    let vanishing = Point::new(config.vanishing_x, config.horizon_y);
    let mut rails = Vec::with_capacity(2 * config.vertical_count as usize + 1);
    for i in -n..=n {
        let rail = Drawable::polyline([config.rail_bottom(i), vanishing], false)
            .with_stroke(config.stroke, config.vertical_line_width);
        rails.push(graph.insert(group, rail)?);
    }

    let mut depth_lines = Vec::with_capacity(config.horizontal_count as usize);
    for _ in 0..config.horizontal_count {
        let line = Drawable::polyline([Point::ZERO, Point::ZERO], false)
            .with_stroke(config.stroke, config.line_base_width);
        depth_lines.push(graph.insert(group, line)?);
    }

    let phase = graph.create_signal(0.0);
    scene.bind(GridFlow {
        config: config.clone(),
        phase,
        lines: depth_lines.clone(),
    });
    let flow = scene.spawn(repeat(
        Timeline::new()
            .tween(TweenTarget::Signal(phase), Goal::By(1.0), config.flow_duration)
            .build()?,
    ));

    tracing::debug!(rails = rails.len(), depth_lines = depth_lines.len(), "grid built");
    Ok(Grid {
        group,
        phase,
        rails,
        depth_lines,
        flow,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grid.rs"]
mod tests;
