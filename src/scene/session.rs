use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{AmbientError, AmbientResult},
    foundation::math::TIME_EPSILON,
    foundation::random::{RandomSource, StdRandom},
    runtime::behavior::Behavior,
    runtime::scheduler::{Scheduler, TaskId},
    scene::binding::Binding,
    scene::graph::{DrawableId, GraphStats, RenderItem, SceneGraph},
};

/// Snapshot of a scene's bookkeeping, for harnesses and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct SceneStats {
    pub time: f64,
    pub ticks: u64,
    pub behaviors: usize,
    pub bindings: usize,
    pub graph: GraphStats,
}

/// One running ambient scene: its drawables, its behaviors and its random source.
///
/// The external renderer drives a scene by calling [`Scene::tick`] (or one of the
/// frame-based helpers) and then painting [`Scene::render_list`]. Dropping or tearing
/// down the scene cancels every behavior and releases every drawable.
pub struct Scene {
    graph: SceneGraph,
    scheduler: Scheduler,
    bindings: Vec<Box<dyn Binding>>,
    random: Box<dyn RandomSource>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// A scene drawing from an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_random(StdRandom::from_entropy())
    }

    /// A scene drawing every randomized decision from `random`.
    pub fn with_random(random: impl RandomSource + 'static) -> Self {
        Self {
            graph: SceneGraph::new(),
            scheduler: Scheduler::new(),
            bindings: Vec::new(),
            random: Box::new(random),
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn root(&self) -> DrawableId {
        self.graph.root()
    }

    /// Simulated seconds since the scene started.
    pub fn time(&self) -> f64 {
        self.scheduler.clock()
    }

    pub fn random(&mut self) -> &mut dyn RandomSource {
        self.random.as_mut()
    }

    /// Graph and random source borrowed together, for builders that generate geometry.
    pub(crate) fn parts_mut(&mut self) -> (&mut SceneGraph, &mut dyn RandomSource) {
        (&mut self.graph, self.random.as_mut())
    }

    /// Register a behavior; it first runs during the next tick.
    pub fn spawn(&mut self, behavior: impl Behavior + 'static) -> TaskId {
        let id = self.scheduler.spawn(behavior);
        tracing::debug!(task = id.0, at = self.time(), "behavior spawned");
        id
    }

    /// Register a projection. It is applied once now, then after every tick.
    pub fn bind(&mut self, binding: impl Binding + 'static) {
        let mut binding: Box<dyn Binding> = Box::new(binding);
        binding.apply(&mut self.graph);
        self.bindings.push(binding);
    }

    /// Advance the simulated clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> AmbientResult<()> {
        self.scheduler
            .advance(dt, &mut self.graph, self.random.as_mut())?;
        for binding in &mut self.bindings {
            binding.apply(&mut self.graph);
        }
        Ok(())
    }

    /// Advance by exactly one frame at `fps`.
    pub fn tick_frame(&mut self, fps: Fps) -> AmbientResult<()> {
        self.tick(fps.frame_duration_secs())
    }

    /// Advance in a single tick to the start of `frame`. Seeking backwards is rejected.
    pub fn advance_to_frame(&mut self, frame: FrameIndex, fps: Fps) -> AmbientResult<()> {
        let target = fps.frames_to_secs(frame.0);
        let now = self.time();
        if target + TIME_EPSILON < now {
            return Err(AmbientError::config(format!(
                "cannot seek backwards to frame {} ({target}s) from {now}s",
                frame.0
            )));
        }
        self.tick((target - now).max(0.0))
    }

    /// Run `secs` of simulated time in ticks of `dt` (the last tick may be shorter).
    pub fn run_for(&mut self, secs: f64, dt: f64) -> AmbientResult<()> {
        let secs = crate::foundation::check::secs("run duration", secs)?;
        let dt = crate::foundation::check::positive("tick delta", dt)?;
        let end = self.time() + secs;
        while self.time() + TIME_EPSILON < end {
            let step = dt.min(end - self.time());
            self.tick(step)?;
        }
        Ok(())
    }

    /// Painter-ordered leaves for the renderer.
    pub fn render_list(&self) -> Vec<RenderItem> {
        self.graph.render_list()
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            time: self.time(),
            ticks: self.scheduler.ticks(),
            behaviors: self.scheduler.len(),
            bindings: self.bindings.len(),
            graph: self.graph.stats(),
        }
    }

    /// Cancel every behavior, release their drawables, then drop the remaining tree.
    ///
    /// The scene stays usable: the clock keeps its value and new effects may be built.
    #[tracing::instrument(skip(self))]
    pub fn teardown(&mut self) {
        let cancelled = self.scheduler.clear(&mut self.graph);
        let drawables = self.graph.len();
        self.graph.clear();
        self.bindings.clear();
        tracing::debug!(cancelled, drawables, "scene torn down");
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if !self.scheduler.is_empty() {
            self.teardown();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/session.rs"]
mod tests;
