use super::*;
use crate::foundation::random::SequenceRandom;
use crate::scene::drawable::PropertyKey;
use crate::scene::graph::DrawableId;

fn opacity(id: u64) -> TweenTarget {
    TweenTarget::Drawable(DrawableId(id), PropertyKey::Opacity)
}

#[test]
fn goal_resolves_against_start_value() {
    assert_eq!(Goal::To(3.0).resolve(10.0), 3.0);
    assert_eq!(Goal::By(1.0).resolve(2.5), 3.5);
}

#[test]
fn timeline_build_rejects_negative_durations() {
    let err = Timeline::new()
        .wait(1.0)
        .tween(opacity(1), Goal::To(0.0), -0.5)
        .build()
        .unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("tween duration"));

    assert!(Timeline::new().wait(f64::NAN).build().is_err());
}

#[test]
fn timeline_yields_steps_in_order() {
    let mut graph = SceneGraph::new();
    let mut random = SequenceRandom::constant(0.0);
    let mut spawned = Vec::new();
    let mut cx = BehaviorCx::new(&mut graph, &mut random, 0.0, &mut spawned);

    let mut tl = Timeline::new()
        .tween(opacity(1), Goal::To(0.5), 1.0)
        .wait(2.0)
        .build()
        .unwrap();
    assert_eq!(tl.len(), 2);
    assert_eq!(tl.secs(), 3.0);
    assert_eq!(tl.resume(&mut cx).map(|s| s.secs()), Some(1.0));
    assert_eq!(tl.resume(&mut cx), Some(Step::wait(2.0)));
    assert_eq!(tl.resume(&mut cx), None);
}

#[test]
fn step_and_adds_parallel_tracks() {
    let step = Step::tween(opacity(1), Goal::To(0.0), 0.5)
        .and(TweenTarget::Drawable(DrawableId(1), PropertyKey::Size), Goal::To(8.0))
        .eased(Ease::OutQuad);
    let Step::Tween { tracks, ease, .. } = step else {
        panic!("expected tween step");
    };
    assert_eq!(tracks.len(), 2);
    assert_eq!(ease, Ease::OutQuad);

    assert_eq!(Step::wait(1.0).and(opacity(1), Goal::To(0.0)), Step::wait(1.0));
}

#[test]
fn looping_restarts_body_and_guards_empty_iterations() {
    let mut graph = SceneGraph::new();
    let mut random = SequenceRandom::constant(0.0);
    let mut spawned = Vec::new();
    let mut cx = BehaviorCx::new(&mut graph, &mut random, 0.0, &mut spawned);

    let mut looping = Looping::new(|_cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
        Box::new(Timeline::new().wait(1.0))
    });
    for _ in 0..3 {
        assert_eq!(looping.resume(&mut cx), Some(Step::wait(1.0)));
    }
    assert_eq!(looping.iterations(), 3);

    let mut empty = Looping::new(|_cx: &mut BehaviorCx<'_>| -> Box<dyn Behavior> {
        Box::new(Timeline::new())
    });
    assert_eq!(empty.resume(&mut cx), Some(Step::wait(0.0)));
    assert_eq!(empty.iterations(), 1);
}

#[test]
fn spawn_queues_without_running() {
    let mut graph = SceneGraph::new();
    let mut random = SequenceRandom::constant(0.0);
    let mut spawned = Vec::new();
    {
        let mut cx = BehaviorCx::new(&mut graph, &mut random, 0.0, &mut spawned);
        cx.spawn(Timeline::new().wait(1.0));
        cx.spawn(from_fn(|_cx: &mut BehaviorCx<'_>| None));
    }
    assert_eq!(spawned.len(), 2);
}
