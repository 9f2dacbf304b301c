use super::*;
use crate::foundation::random::SequenceRandom;
use crate::scene::drawable::Shape;

fn config(flicker: Option<TitleFlickerConfig>) -> TitleConfig {
    TitleConfig {
        y: -120.0,
        text: "DEAD STAR".to_owned(),
        font_family: "Orbitron".to_owned(),
        text_align: TextAlign::Center,
        main: TitleMainStyle {
            font_size: 64.0,
            fill: Color::WHITE,
        },
        glow: TitleGlowStyle {
            font_size: 66.0,
            color: Color::rgb8(0xff, 0x3c, 0xac),
            opacity: 0.5,
            scale: 1.04,
        },
        flicker,
    }
}

fn flicker() -> TitleFlickerConfig {
    TitleFlickerConfig {
        opacity_min: 0.3,
        opacity_down: 0.1,
        opacity_up: 0.1,
        glitch_x1: 4.0,
        glitch_x2: -3.0,
        glitch_step: 0.05,
        scale_up: 1.05,
        scale_up_duration: 0.1,
        scale_down_duration: 0.1,
    }
}

fn read(scene: &Scene, id: DrawableId, key: PropertyKey) -> f64 {
    scene.graph().read(TweenTarget::Drawable(id, key)).unwrap()
}

#[test]
fn glow_copy_paints_under_the_crisp_copy() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let title = build_title(&mut scene, root, &config(None)).unwrap();

    assert_eq!(scene.graph().children(title.group), &[title.glow, title.main]);
    assert_eq!(scene.graph().get(title.group).unwrap().position(), Point::new(0.0, -120.0));

    let glow = scene.graph().get(title.glow).unwrap();
    assert_eq!(glow.opacity, 0.5);
    assert_eq!(glow.get(PropertyKey::Scale), Some(1.04));
    let Shape::Text(style) = &glow.shape else {
        panic!("glow is not text");
    };
    assert_eq!(style.font_size, 66.0);
    assert_eq!(style.text, "DEAD STAR");

    assert!(title.flicker.is_none());
    assert!(scene.stats().behaviors == 0);
}

#[test]
fn flicker_stages_run_strictly_in_sequence() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let title = build_title(&mut scene, root, &config(Some(flicker()))).unwrap();
    let main = title.main;
    let near = |a: f64, b: f64| (a - b).abs() < 1e-9;

    scene.run_for(0.1, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::Opacity), 0.3));
    assert!(near(read(&scene, main, PropertyKey::X), 0.0));

    scene.run_for(0.1, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::Opacity), 1.0));

    scene.run_for(0.05, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::X), 4.0));
    scene.run_for(0.05, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::X), -3.0));
    scene.run_for(0.05, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::X), 0.0));
    assert!(near(read(&scene, main, PropertyKey::Scale), 1.0));

    scene.run_for(0.1, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::Scale), 1.05));
    scene.run_for(0.1, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::Scale), 1.0));

    // Second cycle starts right away.
    scene.run_for(0.1, 0.05).unwrap();
    assert!(near(read(&scene, main, PropertyKey::Opacity), 0.3));
    // The glow copy never flickers.
    assert_eq!(read(&scene, title.glow, PropertyKey::Opacity), 0.5);
}

#[test]
fn cycle_length_sums_every_stage() {
    assert!((flicker().cycle_secs() - 0.55).abs() < 1e-12);
}

#[test]
fn bad_flicker_durations_insert_nothing() {
    let mut scene = Scene::with_random(SequenceRandom::constant(0.5));
    let root = scene.root();
    let mut f = flicker();
    f.glitch_step = -0.05;
    let err = build_title(&mut scene, root, &config(Some(f))).unwrap_err();
    assert!(err.to_string().contains("glitchStep"));
    assert!(scene.graph().is_empty());
    assert_eq!(scene.stats().behaviors, 0);
}
