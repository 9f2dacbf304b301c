use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::{
    animation::ease::Ease,
    foundation::check,
    foundation::error::AmbientResult,
    foundation::random::RandomSource,
    scene::graph::{SceneGraph, TweenTarget},
};

/// Where a tween track ends, resolved against the value when the step begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Goal {
    To(f64),
    By(f64),
}

impl Goal {
    pub fn resolve(self, from: f64) -> f64 {
        match self {
            Self::To(v) => v,
            Self::By(d) => from + d,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub target: TweenTarget,
    pub goal: Goal,
}

/// One suspension point of a behavior.
///
/// A tween step drives all of its tracks in parallel over one shared duration; the
/// behavior stays parked until the last tick of that duration has been applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Wait {
        secs: f64,
    },
    Tween {
        secs: f64,
        ease: Ease,
        tracks: SmallVec<[Track; 2]>,
    },
}

impl Step {
    pub fn wait(secs: f64) -> Self {
        Self::Wait { secs }
    }

    pub fn tween(target: TweenTarget, goal: Goal, secs: f64) -> Self {
        let mut tracks = SmallVec::new();
        tracks.push(Track { target, goal });
        Self::Tween {
            secs,
            ease: Ease::Linear,
            tracks,
        }
    }

    /// Add a parallel track to a tween step. No-op on waits.
    pub fn and(mut self, target: TweenTarget, goal: Goal) -> Self {
        if let Self::Tween { tracks, .. } = &mut self {
            tracks.push(Track { target, goal });
        }
        self
    }

    pub fn eased(mut self, with: Ease) -> Self {
        if let Self::Tween { ease, .. } = &mut self {
            *ease = with;
        }
        self
    }

    pub fn secs(&self) -> f64 {
        match self {
            Self::Wait { secs } | Self::Tween { secs, .. } => *secs,
        }
    }

    pub fn validate(&self) -> AmbientResult<()> {
        let name = match self {
            Self::Wait { .. } => "wait duration",
            Self::Tween { .. } => "tween duration",
        };
        check::secs(name, self.secs()).map(|_| ())
    }
}

/// What a behavior sees while it runs between two suspension points.
pub struct BehaviorCx<'a> {
    pub(crate) graph: &'a mut SceneGraph,
    pub(crate) random: &'a mut dyn RandomSource,
    pub(crate) now: f64,
    pub(crate) spawned: &'a mut Vec<Box<dyn Behavior>>,
}

impl<'a> BehaviorCx<'a> {
    pub fn new(
        graph: &'a mut SceneGraph,
        random: &'a mut dyn RandomSource,
        now: f64,
        spawned: &'a mut Vec<Box<dyn Behavior>>,
    ) -> Self {
        Self {
            graph,
            random,
            now,
            spawned,
        }
    }

    /// Logical time of this resumption (not the tick's wall position).
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn graph(&self) -> &SceneGraph {
        &*self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut *self.graph
    }

    pub fn random(&mut self) -> &mut (dyn RandomSource + 'a) {
        &mut *self.random
    }

    /// Register an independent behavior. It starts at this resumption's logical time,
    /// after the current behavior suspends, and never blocks the caller.
    pub fn spawn(&mut self, behavior: impl Behavior + 'static) {
        self.spawned.push(Box::new(behavior));
    }
}

/// A cooperative task: synchronous logic between explicit suspension points.
///
/// `resume` runs until the next suspension and returns it, or `None` when the
/// behavior is finished.
pub trait Behavior {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step>;

    /// Called once if the scene is torn down while this behavior is still registered.
    /// Behaviors that own scene-graph membership release it here.
    fn release(&mut self, _graph: &mut SceneGraph) {}
}

impl Behavior for Box<dyn Behavior> {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        (**self).resume(cx)
    }

    fn release(&mut self, graph: &mut SceneGraph) {
        (**self).release(graph)
    }
}

/// A fixed, validated sequence of steps executed strictly one after another.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    steps: VecDeque<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    pub fn wait(self, secs: f64) -> Self {
        self.then(Step::wait(secs))
    }

    pub fn tween(self, target: TweenTarget, goal: Goal, secs: f64) -> Self {
        self.then(Step::tween(target, goal, secs))
    }

    /// Reject negative or non-finite durations before the timeline is registered.
    pub fn build(self) -> AmbientResult<Self> {
        for step in &self.steps {
            step.validate()?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total duration of all steps.
    pub fn secs(&self) -> f64 {
        self.steps.iter().map(Step::secs).sum()
    }
}

impl Behavior for Timeline {
    fn resume(&mut self, _cx: &mut BehaviorCx<'_>) -> Option<Step> {
        self.steps.pop_front()
    }
}

/// Re-runs a freshly built body every time the previous one finishes.
///
/// A body that finishes without ever suspending makes the loop yield a zero wait, so an
/// empty iteration costs one tick instead of spinning.
pub struct Looping<F> {
    factory: F,
    body: Option<Box<dyn Behavior>>,
    iterations: u64,
}

impl<F> Looping<F>
where
    F: FnMut(&mut BehaviorCx<'_>) -> Box<dyn Behavior>,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            body: None,
            iterations: 0,
        }
    }

    /// Number of bodies started so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl<F> Behavior for Looping<F>
where
    F: FnMut(&mut BehaviorCx<'_>) -> Box<dyn Behavior>,
{
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        let mut fresh_bodies = 0u32;
        loop {
            if self.body.is_none() {
                if fresh_bodies > 0 {
                    return Some(Step::wait(0.0));
                }
                fresh_bodies += 1;
                self.iterations += 1;
                self.body = Some((self.factory)(cx));
            }
            let step = self.body.as_mut().and_then(|body| body.resume(cx));
            if step.is_some() {
                return step;
            }
            self.body = None;
        }
    }

    fn release(&mut self, graph: &mut SceneGraph) {
        if let Some(body) = self.body.as_mut() {
            body.release(graph);
        }
    }
}

/// Loop a validated timeline forever.
pub fn repeat(timeline: Timeline) -> impl Behavior {
    Looping::new(move |_cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
        Box::new(timeline.clone())
    })
}

/// Behavior backed by a closure; handy for one-off scripted logic.
pub struct FromFn<F>(F);

pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut BehaviorCx<'_>) -> Option<Step>,
{
    FromFn(f)
}

impl<F> Behavior for FromFn<F>
where
    F: FnMut(&mut BehaviorCx<'_>) -> Option<Step>,
{
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        (self.0)(cx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/behavior.rs"]
mod tests;
