use crate::{
    foundation::check,
    foundation::color::Color,
    foundation::core::Point,
    foundation::error::AmbientResult,
    runtime::behavior::{Goal, Timeline, repeat},
    runtime::scheduler::TaskId,
    scene::drawable::{Drawable, PropertyKey, TextAlign, TextStyle},
    scene::graph::{DrawableId, TweenTarget},
    scene::session::Scene,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleMainStyle {
    pub font_size: f64,
    pub fill: Color,
}

/// The soft copy painted underneath the crisp title.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleGlowStyle {
    pub font_size: f64,
    pub color: Color,
    pub opacity: f64,
    pub scale: f64,
}

/// One flicker cycle: dim and recover, glitch sideways twice and snap back, pulse.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleFlickerConfig {
    pub opacity_min: f64,
    pub opacity_down: f64,
    pub opacity_up: f64,
    pub glitch_x1: f64,
    pub glitch_x2: f64,
    pub glitch_step: f64,
    pub scale_up: f64,
    pub scale_up_duration: f64,
    pub scale_down_duration: f64,
}

impl TitleFlickerConfig {
    pub fn validate(&self) -> AmbientResult<()> {
        check::unit("opacityMin", self.opacity_min)?;
        check::secs("opacityDown", self.opacity_down)?;
        check::secs("opacityUp", self.opacity_up)?;
        check::finite("glitchX1", self.glitch_x1)?;
        check::finite("glitchX2", self.glitch_x2)?;
        check::secs("glitchStep", self.glitch_step)?;
        check::positive("scaleUp", self.scale_up)?;
        check::secs("scaleUpDuration", self.scale_up_duration)?;
        check::secs("scaleDownDuration", self.scale_down_duration)?;
        Ok(())
    }

    /// Total length of one cycle.
    pub fn cycle_secs(&self) -> f64 {
        self.opacity_down
            + self.opacity_up
            + 3.0 * self.glitch_step
            + self.scale_up_duration
            + self.scale_down_duration
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleConfig {
    pub y: f64,
    pub text: String,
    pub font_family: String,
    #[serde(default)]
    pub text_align: TextAlign,
    pub main: TitleMainStyle,
    pub glow: TitleGlowStyle,
    #[serde(default)]
    pub flicker: Option<TitleFlickerConfig>,
}

impl TitleConfig {
    pub fn validate(&self) -> AmbientResult<()> {
        check::finite("y", self.y)?;
        check::positive("main.fontSize", self.main.font_size)?;
        check::positive("glow.fontSize", self.glow.font_size)?;
        check::unit("glow.opacity", self.glow.opacity)?;
        check::positive("glow.scale", self.glow.scale)?;
        if let Some(flicker) = &self.flicker {
            flicker.validate()?;
        }
        Ok(())
    }

    fn style(&self, font_size: f64) -> TextStyle {
        TextStyle {
            text: self.text.clone(),
            font_family: self.font_family.clone(),
            font_size,
            align: self.text_align,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Title {
    pub group: DrawableId,
    pub glow: DrawableId,
    pub main: DrawableId,
    pub flicker: Option<TaskId>,
}

#[tracing::instrument(skip(scene, config), fields(text = %config.text))]
pub fn build_title(
    scene: &mut Scene,
    parent: DrawableId,
    config: &TitleConfig,
) -> AmbientResult<Title> {
    config.validate()?;
    let graph = scene.graph_mut();
    let group = graph.insert(parent, Drawable::group().at(Point::new(0.0, config.y)))?;
    let glow = graph.insert(
        group,
        Drawable::text(config.style(config.glow.font_size))
            .with_fill(config.glow.color)
            .with_opacity(config.glow.opacity)
            .with_scale(config.glow.scale),
    )?;
    let main = graph.insert(
        group,
        Drawable::text(config.style(config.main.font_size)).with_fill(config.main.fill),
    )?;

    let flicker = match &config.flicker {
        Some(f) => Some(scene.spawn(repeat(flicker_timeline(main, f).build()?))),
        None => None,
    };

    tracing::debug!(flicker = flicker.is_some(), "title built");
    Ok(Title {
        group,
        glow,
        main,
        flicker,
    })
}

/// The three flicker stages on the crisp copy, strictly one after another.
pub fn flicker_timeline(main: DrawableId, f: &TitleFlickerConfig) -> Timeline {
    let opacity = TweenTarget::Drawable(main, PropertyKey::Opacity);
    let x = TweenTarget::Drawable(main, PropertyKey::X);
    let scale = TweenTarget::Drawable(main, PropertyKey::Scale);
    Timeline::new()
        .tween(opacity, Goal::To(f.opacity_min), f.opacity_down)
        .tween(opacity, Goal::To(1.0), f.opacity_up)
        .tween(x, Goal::To(f.glitch_x1), f.glitch_step)
        .tween(x, Goal::To(f.glitch_x2), f.glitch_step)
        .tween(x, Goal::To(0.0), f.glitch_step)
        .tween(scale, Goal::To(f.scale_up), f.scale_up_duration)
        .tween(scale, Goal::To(1.0), f.scale_down_duration)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/title.rs"]
mod tests;
