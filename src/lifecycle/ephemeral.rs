use smallvec::SmallVec;

use crate::{
    animation::ease::Ease,
    foundation::check,
    foundation::error::AmbientResult,
    runtime::behavior::{Behavior, BehaviorCx, Goal, Step},
    scene::drawable::{Drawable, PropertyKey},
    scene::graph::{DrawableId, SceneGraph, TweenTarget},
};

enum Stage {
    Pending(Drawable),
    Inserted(DrawableId),
    Fading(DrawableId),
    Released,
}

/// Owns one generated drawable from insertion to removal.
///
/// On its first resumption the drawable is inserted under `parent`; the behavior then
/// fades it to transparent (plus any extra tracks) over `fade_secs` and removes it right
/// after the fade's last tick. Removal happens exactly once, either there or in
/// [`Behavior::release`] when the scene is torn down mid-fade.
pub struct Ephemeral {
    parent: DrawableId,
    stage: Stage,
    fade_secs: f64,
    ease: Ease,
    tracks: SmallVec<[(PropertyKey, Goal); 2]>,
}

impl Ephemeral {
    pub fn new(parent: DrawableId, drawable: Drawable, fade_secs: f64) -> AmbientResult<Self> {
        let fade_secs = check::secs("fadeSeconds", fade_secs)?;
        Ok(Self::prevalidated(parent, drawable, fade_secs))
    }

    /// Insert `drawable` right away; the fade starts when the behavior first runs.
    ///
    /// Emitters that cap their live children use this so the cap sees every dot they
    /// spawned during the current tick.
    pub fn inserted(
        graph: &mut SceneGraph,
        parent: DrawableId,
        drawable: Drawable,
        fade_secs: f64,
    ) -> AmbientResult<Self> {
        let fade_secs = check::secs("fadeSeconds", fade_secs)?;
        let id = graph.insert(parent, drawable)?;
        tracing::trace!(id = id.raw(), fade = fade_secs, "ephemeral created");
        let mut ephemeral = Self::prevalidated(parent, Drawable::group(), fade_secs);
        ephemeral.stage = Stage::Inserted(id);
        Ok(ephemeral)
    }

    /// For effects whose config already validated the fade duration.
    pub(crate) fn prevalidated(parent: DrawableId, drawable: Drawable, fade_secs: f64) -> Self {
        Self {
            parent,
            stage: Stage::Pending(drawable),
            fade_secs,
            ease: Ease::Linear,
            tracks: SmallVec::new(),
        }
    }

    /// Animate another property alongside the fade.
    pub fn with(mut self, key: PropertyKey, goal: Goal) -> Self {
        self.tracks.push((key, goal));
        self
    }

    /// Grow (or shrink) a circle to diameter `size` while fading.
    pub fn resize_to(self, size: f64) -> Self {
        self.with(PropertyKey::Size, Goal::To(size))
    }

    /// Move by `(dx, dy)` while fading.
    pub fn drift_by(self, dx: f64, dy: f64) -> Self {
        self.with(PropertyKey::X, Goal::By(dx))
            .with(PropertyKey::Y, Goal::By(dy))
    }

    pub fn eased(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// The live drawable, once inserted and until removed.
    pub fn id(&self) -> Option<DrawableId> {
        match self.stage {
            Stage::Inserted(id) | Stage::Fading(id) => Some(id),
            _ => None,
        }
    }

    fn remove(id: DrawableId, graph: &mut SceneGraph) {
        if let Err(err) = graph.remove(id) {
            tracing::error!(id = id.raw(), %err, "ephemeral drawable vanished before its removal");
            return;
        }
        tracing::trace!(id = id.raw(), "ephemeral removed");
    }

    fn fade(&mut self, id: DrawableId) -> Step {
        self.stage = Stage::Fading(id);
        let fade = Step::tween(
            TweenTarget::Drawable(id, PropertyKey::Opacity),
            Goal::To(0.0),
            self.fade_secs,
        );
        self.tracks
            .iter()
            .fold(fade, |step, &(key, goal)| {
                step.and(TweenTarget::Drawable(id, key), goal)
            })
            .eased(self.ease)
    }
}

impl Behavior for Ephemeral {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        match std::mem::replace(&mut self.stage, Stage::Released) {
            Stage::Pending(drawable) => {
                let id = match cx.graph_mut().insert(self.parent, drawable) {
                    Ok(id) => id,
                    Err(err) => {
                        tracing::warn!(%err, "ephemeral parent is gone; nothing spawned");
                        return None;
                    }
                };
                tracing::trace!(
                    id = id.raw(),
                    at = cx.now(),
                    fade = self.fade_secs,
                    "ephemeral created"
                );
                Some(self.fade(id))
            }
            Stage::Inserted(id) => Some(self.fade(id)),
            Stage::Fading(id) => {
                Self::remove(id, cx.graph_mut());
                None
            }
            Stage::Released => None,
        }
    }

    fn release(&mut self, graph: &mut SceneGraph) {
        if let Stage::Inserted(id) | Stage::Fading(id) =
            std::mem::replace(&mut self.stage, Stage::Released)
        {
            Self::remove(id, graph);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/ephemeral.rs"]
mod tests;
