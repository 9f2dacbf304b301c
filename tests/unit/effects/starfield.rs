use super::*;
use crate::foundation::random::SequenceRandom;

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn read(scene: &Scene, id: DrawableId, key: PropertyKey) -> f64 {
    scene.graph().read(TweenTarget::Drawable(id, key)).unwrap()
}

fn small_field() -> StarfieldConfig {
    let mut cfg = StarfieldConfig::new(100.0, 50.0);
    cfg.count = 1;
    cfg
}

#[test]
fn stars_are_scattered_inside_the_canvas() {
    let mut scene = Scene::with_random(crate::foundation::random::StdRandom::seeded(11));
    let root = scene.root();
    let mut cfg = StarfieldConfig::new(100.0, 50.0);
    cfg.count = 200;
    let field = build_starfield(&mut scene, root, &cfg).unwrap();

    assert_eq!(field.stars.len(), 200);
    assert_eq!(scene.stats().behaviors, 200);
    for &id in &field.stars {
        let star = scene.graph().get(id).unwrap();
        let at = star.position();
        assert!((-50.0..50.0).contains(&at.x) && (-25.0..25.0).contains(&at.y));
        let size = star.get(PropertyKey::Size).unwrap();
        assert!((2.0..5.0).contains(&size));
        assert!((0.35..0.95).contains(&star.opacity));
    }
}

#[test]
fn still_field_registers_no_behaviors() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let mut cfg = small_field();
    cfg.twinkle = false;
    cfg.flicker = Some(StarFlickerConfig::default());
    assert!(!cfg.is_animated());
    build_starfield(&mut scene, root, &cfg).unwrap();
    assert_eq!(scene.stats().behaviors, 0);
}

#[test]
fn twinkle_tweens_between_random_opacities() {
    // Build draws radius, x, y, opacity; each cycle draws o1, d1, o2, d2.
    let random = SequenceRandom::new(vec![0.5, 0.5, 0.5, 0.0, 0.5, 0.2, 0.0, 0.2]);
    let mut scene = Scene::with_random(random);
    let root = scene.root();
    let field = build_starfield(&mut scene, root, &small_field()).unwrap();
    let star = field.stars[0];
    assert!(near(read(&scene, star, PropertyKey::Opacity), 0.35));

    scene.run_for(1.0, 0.1).unwrap();
    assert!(near(read(&scene, star, PropertyKey::Opacity), 0.65));
    scene.run_for(1.0, 0.1).unwrap();
    assert!(near(read(&scene, star, PropertyKey::Opacity), 0.35));
    assert_eq!(read(&scene, star, PropertyKey::Scale), 1.0);
}

#[test]
fn burst_pops_scale_alongside_opacity() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let mut cfg = small_field();
    cfg.twinkle = false;
    cfg.flicker = Some(StarFlickerConfig {
        enabled: true,
        probability: 1.0,
        ..StarFlickerConfig::default()
    });
    let field = build_starfield(&mut scene, root, &cfg).unwrap();
    let star = field.stars[0];

    // in = 0.05 s, out = 0.12 s, settle = 0.65
    scene.run_for(0.05, 0.01).unwrap();
    assert!(near(read(&scene, star, PropertyKey::Opacity), 1.0));
    assert!(near(read(&scene, star, PropertyKey::Scale), 1.35));

    scene.run_for(0.12, 0.01).unwrap();
    assert!(near(read(&scene, star, PropertyKey::Opacity), 0.65));
    assert!(near(read(&scene, star, PropertyKey::Scale), 1.0));
}

#[test]
fn inverted_opacity_range_inserts_nothing() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let mut cfg = small_field();
    cfg.min_opacity = 0.9;
    cfg.max_opacity = 0.2;
    assert!(build_starfield(&mut scene, root, &cfg).unwrap_err().is_config());
    assert!(scene.graph().is_empty());
}

#[test]
fn disabled_flicker_is_not_validated() {
    let mut cfg = small_field();
    cfg.flicker = Some(StarFlickerConfig {
        probability: 7.0,
        ..StarFlickerConfig::default()
    });
    assert!(cfg.validate().is_ok());
    cfg.flicker.as_mut().unwrap().enabled = true;
    assert!(cfg.validate().is_err());
}
