use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::foundation::core::Point;
use crate::foundation::random::SequenceRandom;
use crate::runtime::behavior::{Goal, Timeline, from_fn};
use crate::scene::drawable::{Drawable, PropertyKey};

fn setup() -> (Scheduler, SceneGraph, SequenceRandom) {
    (Scheduler::new(), SceneGraph::new(), SequenceRandom::constant(0.5))
}

fn x_of(graph: &SceneGraph, id: crate::scene::graph::DrawableId) -> f64 {
    graph.read(TweenTarget::Drawable(id, PropertyKey::X)).unwrap()
}

/// Records `name` after one zero wait.
fn wait_then_log(name: &'static str, log: Rc<RefCell<Vec<&'static str>>>) -> impl Behavior {
    let mut waited = false;
    from_fn(move |_cx: &mut BehaviorCx<'_>| {
        if !waited {
            waited = true;
            return Some(Step::wait(0.0));
        }
        log.borrow_mut().push(name);
        None
    })
}

#[test]
fn zero_waits_resume_in_registration_order_within_one_tick() {
    let (mut sched, mut graph, mut random) = setup();
    let log = Rc::new(RefCell::new(Vec::new()));
    let a = sched.spawn(wait_then_log("a", log.clone()));
    let b = sched.spawn(wait_then_log("b", log.clone()));
    assert!(a < b);

    sched.advance(1.0 / 60.0, &mut graph, &mut random).unwrap();
    assert_eq!(*log.borrow(), vec!["a", "b"]);
    assert!(sched.is_empty());
}

#[test]
fn chained_tweens_run_strictly_in_sequence() {
    let (mut sched, mut graph, mut random) = setup();
    let dot = graph.insert(graph.root(), Drawable::circle(2.0)).unwrap();
    let x = TweenTarget::Drawable(dot, PropertyKey::X);
    sched.spawn(
        Timeline::new()
            .tween(x, Goal::To(10.0), 1.0)
            .tween(x, Goal::To(0.0), 1.0)
            .build()
            .unwrap(),
    );

    let mut at = Vec::new();
    for _ in 0..8 {
        sched.advance(0.25, &mut graph, &mut random).unwrap();
        at.push(x_of(&graph, dot));
    }
    assert_eq!(at, vec![2.5, 5.0, 7.5, 10.0, 7.5, 5.0, 2.5, 0.0]);
    assert!(sched.is_empty());
}

#[test]
fn zero_duration_tween_lands_on_the_next_tick() {
    let (mut sched, mut graph, mut random) = setup();
    let dot = graph.insert(graph.root(), Drawable::circle(2.0)).unwrap();
    sched.spawn(
        Timeline::new()
            .wait(1.0)
            .tween(TweenTarget::Drawable(dot, PropertyKey::X), Goal::To(5.0), 0.0)
            .build()
            .unwrap(),
    );

    sched.advance(0.5, &mut graph, &mut random).unwrap();
    sched.advance(0.5, &mut graph, &mut random).unwrap();
    assert_eq!(x_of(&graph, dot), 0.0);
    sched.advance(0.5, &mut graph, &mut random).unwrap();
    assert_eq!(x_of(&graph, dot), 5.0);
}

#[test]
fn overshoot_carries_into_the_next_step() {
    let (mut sched, mut graph, mut random) = setup();
    let resumes = Rc::new(Cell::new(0u32));
    let counter = resumes.clone();
    sched.spawn(from_fn(move |_cx: &mut BehaviorCx<'_>| {
        counter.set(counter.get() + 1);
        Some(Step::wait(0.25))
    }));

    for _ in 0..10 {
        sched.advance(0.1, &mut graph, &mut random).unwrap();
    }
    // Resumed at 0.0, 0.25, 0.5, 0.75 and 1.0 despite the 0.1 s tick.
    assert_eq!(resumes.get(), 5);
}

#[test]
fn spawned_behavior_starts_at_spawner_time() {
    let (mut sched, mut graph, mut random) = setup();
    let seen = Rc::new(Cell::new(f64::NAN));
    let child_seen = seen.clone();
    let mut waited = false;
    sched.spawn(from_fn(move |cx: &mut BehaviorCx<'_>| {
        if !waited {
            waited = true;
            return Some(Step::wait(0.25));
        }
        let seen = child_seen.clone();
        cx.spawn(from_fn(move |cx: &mut BehaviorCx<'_>| {
            seen.set(cx.now());
            None
        }));
        None
    }));

    sched.advance(1.0, &mut graph, &mut random).unwrap();
    assert_eq!(seen.get(), 0.25);
    assert!(sched.is_empty());
}

#[test]
fn missing_tween_target_is_dropped_not_fatal() {
    let (mut sched, mut graph, mut random) = setup();
    let gone = graph.insert(graph.root(), Drawable::circle(2.0)).unwrap();
    graph.remove(gone).unwrap();
    sched.spawn(
        Timeline::new()
            .tween(TweenTarget::Drawable(gone, PropertyKey::Opacity), Goal::To(0.0), 0.5)
            .build()
            .unwrap(),
    );

    sched.advance(0.25, &mut graph, &mut random).unwrap();
    assert_eq!(sched.len(), 1);
    sched.advance(0.25, &mut graph, &mut random).unwrap();
    assert!(sched.is_empty());
}

#[test]
fn invalid_deltas_are_config_errors() {
    let (mut sched, mut graph, mut random) = setup();
    assert!(sched.advance(-0.1, &mut graph, &mut random).unwrap_err().is_config());
    assert!(sched.advance(f64::NAN, &mut graph, &mut random).is_err());
    assert_eq!(sched.ticks(), 0);
    assert_eq!(sched.clock(), 0.0);
}

struct Holder {
    id: Option<crate::scene::graph::DrawableId>,
    released: Rc<Cell<u32>>,
}

impl Behavior for Holder {
    fn resume(&mut self, cx: &mut BehaviorCx<'_>) -> Option<Step> {
        let root = cx.graph().root();
        self.id = cx
            .graph_mut()
            .insert(root, Drawable::circle(1.0).at(Point::new(1.0, 1.0)))
            .ok();
        Some(Step::wait(100.0))
    }

    fn release(&mut self, graph: &mut SceneGraph) {
        self.released.set(self.released.get() + 1);
        if let Some(id) = self.id.take() {
            let _ = graph.remove(id);
        }
    }
}

#[test]
fn clear_releases_every_task_once() {
    let (mut sched, mut graph, mut random) = setup();
    let released = Rc::new(Cell::new(0));
    sched.spawn(Holder {
        id: None,
        released: released.clone(),
    });
    sched.advance(0.1, &mut graph, &mut random).unwrap();
    assert_eq!(graph.len(), 1);

    assert_eq!(sched.clear(&mut graph), 1);
    assert_eq!(released.get(), 1);
    assert!(graph.is_empty());
    assert!(sched.is_empty());
}
