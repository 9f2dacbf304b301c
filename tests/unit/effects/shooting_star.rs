use super::*;
use crate::foundation::random::SequenceRandom;

fn config() -> ShootingStarConfig {
    let mut cfg = ShootingStarConfig::new(1000.0, 800.0);
    cfg.min_delay = 1.0;
    cfg.max_delay = 1.0;
    cfg
}

fn opacity(scene: &Scene, id: DrawableId) -> f64 {
    scene.graph().get(id).unwrap().opacity
}

#[test]
fn travel_duration_is_length_over_speed() {
    let start = Point::new(0.0, 0.0);
    let end = Point::new(600.0, 800.0);
    let p = Projectile::new(start, end, 600.0).unwrap();
    assert_eq!(p.length(), 1000.0);
    assert!((p.duration() - 1000.0 / 600.0).abs() < 1e-12);
    assert_eq!(p.position_at(0.0), start);
    assert_eq!(p.position_at(p.duration()), end);
    assert!((p.position_at(p.duration() / 2.0) - Point::new(300.0, 400.0)).hypot() < 1e-9);
}

#[test]
fn projectile_rejects_non_positive_speed() {
    assert!(Projectile::new(Point::ZERO, Point::new(1.0, 0.0), 0.0).is_err());
    assert!(Projectile::new(Point::ZERO, Point::new(f64::NAN, 0.0), 1.0).is_err());
}

#[test]
fn horizontal_path_crosses_past_both_edges() {
    let cfg = config();
    let mut random = SequenceRandom::constant(0.5);
    let (start, end) = cfg.pick_path(&mut random);
    assert_eq!(start, Point::new(-580.0, -240.0));
    assert_eq!(end, Point::new(580.0, -240.0));

    let mut random = SequenceRandom::constant(0.0);
    let (start, end) = cfg.pick_path(&mut random);
    assert!(start.x > 0.0 && end.x < 0.0, "right-to-left when the coin lands low");
}

#[test]
fn horizontal_path_stays_in_the_sky_band() {
    let mut cfg = config();
    cfg.sky_bottom_y = Some(-200.0);
    let (top, bottom) = cfg.sky_band();
    assert_eq!((top, bottom), (-376.0, -224.0));

    let mut random = SequenceRandom::constant(0.999);
    let (start, end) = cfg.pick_path(&mut random);
    assert_eq!(start.y, bottom);
    assert_eq!(end.y, bottom);
}

#[test]
fn angled_path_follows_the_configured_angle() {
    let mut cfg = config();
    cfg.horizontal = false;
    cfg.angle_deg = 0.0;
    let mut random = SequenceRandom::constant(0.0);
    let (start, end) = cfg.pick_path(&mut random);
    assert_eq!(start, Point::new(-550.0, -360.0));
    assert!((end.x - start.x - 1000.0f64.hypot(800.0) * 1.1).abs() < 1e-9);
    assert_eq!(end.y, start.y);
}

#[test]
fn trail_timing_constants() {
    let cfg = config();
    assert_eq!(cfg.trail_interval(), 0.02);
    assert_eq!(cfg.trail_life(), 0.4);

    let mut slow = config();
    slow.speed = 10.0;
    assert_eq!(slow.trail_interval(), 1.2);
    assert!((slow.trail_life() - 7.2).abs() < 1e-12);
}

#[test]
fn trail_dots_start_at_least_two_pixels_wide() {
    let mut cfg = config();
    cfg.head_radius = 0.5;
    assert_eq!(cfg.trail_dot_sizes(), (2.0, 2.0));
    cfg.head_radius = 1.0;
    assert_eq!(cfg.trail_dot_sizes(), (2.4, 2.0));
    cfg.head_radius = 5.0;
    assert_eq!(cfg.trail_dot_sizes(), (12.0, 10.0));
}

fn trail_sizes(scene: &Scene, trail: DrawableId) -> Vec<f64> {
    scene
        .graph()
        .children(trail)
        .iter()
        .filter_map(|&id| scene.graph().get(id)?.get(PropertyKey::Size))
        .collect()
}

#[test]
fn emitted_dots_shrink_from_start_to_end_size() {
    let dt = 1.0 / 60.0;

    let mut small = config();
    small.head_radius = 0.5;
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let star = build_shooting_star(&mut scene, root, &small).unwrap();
    scene.run_for(1.0 + dt, dt).unwrap();
    let sizes = trail_sizes(&scene, star.trail);
    assert!(!sizes.is_empty());
    assert!(sizes.iter().all(|&s| s == 2.0), "{sizes:?}");

    let mut large = config();
    large.head_radius = 5.0;
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let star = build_shooting_star(&mut scene, root, &large).unwrap();
    scene.run_for(1.3, dt).unwrap();
    let sizes = trail_sizes(&scene, star.trail);
    assert!(sizes.len() > 1);
    assert!(sizes.iter().all(|&s| (10.0..=12.0).contains(&s)), "{sizes:?}");
    // Children are in emission order, so older dots have shrunk further.
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "{sizes:?}");
    assert!(sizes[0] < 12.0);
}

#[test]
fn pass_shows_moves_and_hides_the_meteor() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let star = build_shooting_star(&mut scene, root, &config()).unwrap();
    assert_eq!(opacity(&scene, star.root), 0.0);

    let dt = 1.0 / 60.0;
    scene.run_for(1.5, dt).unwrap();
    assert_eq!(opacity(&scene, star.root), 1.0);
    let head = scene.graph().get(star.head).unwrap().position();
    // 0.5 s at 600 px/s from x = -580
    assert!((head.x + 280.0).abs() < 1e-6, "head at {head:?}");
    assert!((head.y + 240.0).abs() < 1e-9);

    let mut peak = 0;
    while scene.time() < 2.9 {
        scene.tick(dt).unwrap();
        let live = scene.graph().children(star.trail).len();
        assert!(live <= 6);
        peak = peak.max(live);
    }
    assert_eq!(peak, 6);
    assert!(opacity(&scene, star.head) < 1.0);

    scene.run_for(0.1, dt).unwrap();
    assert_eq!(opacity(&scene, star.root), 0.0);
    assert_eq!(opacity(&scene, star.head), 0.0);

    scene.run_for(0.5, dt).unwrap();
    assert!(scene.graph().children(star.trail).is_empty());
}

#[test]
fn invalid_speed_fails_before_building() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let mut cfg = config();
    cfg.speed = -1.0;
    assert!(build_shooting_star(&mut scene, root, &cfg).is_err());
    assert!(scene.graph().is_empty());
}
