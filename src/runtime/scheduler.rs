use smallvec::SmallVec;

use crate::{
    animation::tween::Tween,
    foundation::error::{AmbientError, AmbientResult},
    foundation::math::TIME_EPSILON,
    foundation::random::RandomSource,
    runtime::behavior::{Behavior, BehaviorCx, Step},
    scene::graph::{SceneGraph, TweenTarget},
};

/// Registration handle; ids increase in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TaskId(pub u64);

/// The interval a suspended task is parked on.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
    begun_at: f64,
    begun_tick: u64,
    secs: f64,
}

impl Span {
    fn end(self) -> f64 {
        self.begun_at + self.secs
    }

    /// Zero-length spans need a tick boundary; longer ones complete once the clock
    /// reaches their end.
    fn is_elapsed(self, target: f64, tick: u64) -> bool {
        (self.secs > TIME_EPSILON || self.begun_tick < tick) && self.end() <= target + TIME_EPSILON
    }
}

struct ActiveTween {
    span: Span,
    tracks: SmallVec<[(TweenTarget, Tween<f64>); 2]>,
}

impl ActiveTween {
    fn apply(&self, target: f64, done: bool, graph: &mut SceneGraph) {
        let elapsed = if done {
            self.span.secs
        } else {
            (target.min(self.span.end()) - self.span.begun_at).max(0.0)
        };
        for (tt, tween) in &self.tracks {
            if !graph.write(*tt, tween.sample(elapsed)) {
                tracing::error!(track = ?tt, "tween target vanished while tweening");
            }
        }
    }
}

enum TaskState {
    Runnable,
    Waiting(Span),
    Tweening(ActiveTween),
    Finished,
}

struct Task {
    id: TaskId,
    behavior: Box<dyn Behavior>,
    state: TaskState,
    /// Logical time at which the next step begins.
    cursor: f64,
    /// Tick during which `cursor` was established.
    cursor_tick: u64,
}

/// A behavior registered from inside another, with the spawner's logical time.
struct Pending {
    behavior: Box<dyn Behavior>,
    cursor: f64,
}

impl Task {
    fn is_finished(&self) -> bool {
        matches!(self.state, TaskState::Finished)
    }

    fn advance(
        &mut self,
        target: f64,
        tick: u64,
        graph: &mut SceneGraph,
        random: &mut dyn RandomSource,
        pending: &mut Vec<Pending>,
    ) {
        loop {
            self.state = match std::mem::replace(&mut self.state, TaskState::Finished) {
                TaskState::Finished => return,
                TaskState::Runnable => {
                    let mut spawned = Vec::new();
                    let step = {
                        let mut cx = BehaviorCx::new(graph, random, self.cursor, &mut spawned);
                        self.behavior.resume(&mut cx)
                    };
                    let cursor = self.cursor;
                    pending.extend(
                        spawned
                            .into_iter()
                            .map(|behavior| Pending { behavior, cursor }),
                    );
                    match step {
                        Some(step) => self.begin(step, graph),
                        None => {
                            tracing::trace!(
                                task = self.id.0,
                                at = self.cursor,
                                "behavior finished"
                            );
                            TaskState::Finished
                        }
                    }
                }
                TaskState::Waiting(span) => {
                    if !span.is_elapsed(target, tick) {
                        self.state = TaskState::Waiting(span);
                        return;
                    }
                    self.settle(span, tick);
                    TaskState::Runnable
                }
                TaskState::Tweening(tween) => {
                    let done = tween.span.is_elapsed(target, tick);
                    // Zero-length tweens land on the tick that completes them.
                    if done || tween.span.secs > TIME_EPSILON {
                        tween.apply(target, done, graph);
                    }
                    if !done {
                        self.state = TaskState::Tweening(tween);
                        return;
                    }
                    self.settle(tween.span, tick);
                    TaskState::Runnable
                }
            };
        }
    }

    fn settle(&mut self, span: Span, tick: u64) {
        self.cursor = span.end();
        self.cursor_tick = tick;
    }

    fn begin(&self, step: Step, graph: &SceneGraph) -> TaskState {
        let span = |secs: f64| Span {
            begun_at: self.cursor,
            begun_tick: self.cursor_tick,
            secs: sanitize_secs(self.id, secs),
        };
        match step {
            Step::Wait { secs } => TaskState::Waiting(span(secs)),
            Step::Tween { secs, ease, tracks } => {
                let span = span(secs);
                TaskState::Tweening(ActiveTween {
                    span,
                    tracks: tracks
                        .into_iter()
                        .filter_map(|track| {
                            let Some(from) = graph.read(track.target) else {
                                tracing::error!(
                                    task = self.id.0,
                                    track = ?track.target,
                                    "tween target is not in the scene graph; track dropped"
                                );
                                return None;
                            };
                            let tween = Tween {
                                from,
                                to: track.goal.resolve(from),
                                duration: span.secs,
                                ease,
                            };
                            Some((track.target, tween))
                        })
                        .collect(),
                })
            }
        }
    }
}

/// Steps built outside `Timeline::build` are not validated; clamp instead of failing
/// mid-tick.
fn sanitize_secs(id: TaskId, secs: f64) -> f64 {
    if secs.is_finite() && secs >= 0.0 {
        return secs;
    }
    tracing::error!(task = id.0, secs, "invalid step duration treated as zero");
    0.0
}

/// Single-threaded cooperative run-list for one scene.
///
/// Each tick advances the clock, then resumes tasks in registration order. A task runs
/// its synchronous logic to its next suspension before the next task resumes. Time a
/// step overshoots inside a tick carries into the following step, so long-running loops
/// do not drift with the tick size.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    clock: f64,
    tick: u64,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior. It first resumes during the next tick, at the current clock.
    pub fn spawn(&mut self, behavior: impl Behavior + 'static) -> TaskId {
        let clock = self.clock;
        let tick = self.tick;
        self.push(Box::new(behavior), clock, tick)
    }

    fn push(&mut self, behavior: Box<dyn Behavior>, cursor: f64, cursor_tick: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            behavior,
            state: TaskState::Runnable,
            cursor,
            cursor_tick,
        });
        id
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Registered, unfinished tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Advance the clock by `dt` seconds and resume every task whose step elapsed.
    pub fn advance(
        &mut self,
        dt: f64,
        graph: &mut SceneGraph,
        random: &mut dyn RandomSource,
    ) -> AmbientResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(AmbientError::config(format!(
                "tick delta must be finite and >= 0 (got {dt})"
            )));
        }
        self.tick += 1;
        self.clock += dt;
        let target = self.clock;
        let tick = self.tick;

        let mut pending = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            self.tasks[i].advance(target, tick, graph, random, &mut pending);
            for p in pending.drain(..) {
                self.push(p.behavior, p.cursor, tick);
            }
            i += 1;
        }

        self.tasks.retain(|t| !t.is_finished());
        Ok(())
    }

    /// Cancel every task, letting each release what it still holds in `graph`.
    pub fn clear(&mut self, graph: &mut SceneGraph) -> usize {
        let n = self.tasks.len();
        for mut task in self.tasks.drain(..) {
            task.behavior.release(graph);
        }
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
