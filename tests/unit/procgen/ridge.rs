use super::*;
use crate::foundation::random::{SequenceRandom, StdRandom};

#[test]
fn generated_profile_has_count_plus_one_spanning_points() {
    let mut random = StdRandom::seeded(11);
    let ridge =
        RidgeProfile::generate(20, -0.18, -0.04, DEFAULT_SNAP_QUANTUM, &mut random).unwrap();
    let pts = ridge.points();
    assert_eq!(pts.len(), 21);
    assert_eq!(pts[0].x, -0.5);
    assert!((pts[20].x - 0.5).abs() < 1e-12);
    assert!(pts.windows(2).all(|w| w[0].x <= w[1].x));
}

#[test]
fn generated_heights_are_snapped_within_range() {
    let mut random = StdRandom::seeded(3);
    let ridge = RidgeProfile::generate(200, -0.18, -0.04, 0.02, &mut random).unwrap();
    for p in ridge.points() {
        let steps = p.y / 0.02;
        assert!((steps - steps.round()).abs() < 1e-9, "{} not snapped", p.y);
        // Snapping may move a sample by at most half a quantum.
        assert!(p.y >= -0.18 - 0.01 - 1e-12 && p.y <= -0.04 + 0.01 + 1e-12);
    }
}

#[test]
fn snapping_rounds_to_nearest_quantum() {
    // -0.18 + 0.25 * 0.14 = -0.145, nearest multiple of 0.02 is -0.14.
    let mut random = SequenceRandom::constant(0.25);
    let ridge = RidgeProfile::generate(1, -0.18, -0.04, 0.02, &mut random).unwrap();
    assert!((ridge.points()[0].y + 0.14).abs() < 1e-9);
}

#[test]
fn invalid_generation_parameters_are_rejected() {
    let mut random = SequenceRandom::constant(0.5);
    assert!(RidgeProfile::generate(0, -0.2, 0.0, 0.02, &mut random).is_err());
    assert!(RidgeProfile::generate(10, 0.0, -0.2, 0.02, &mut random).unwrap_err().is_config());
}

#[test]
fn explicit_profiles_are_validated() {
    assert!(RidgeProfile::from_pairs(&[[0.0, 0.0]]).is_err());
    assert!(RidgeProfile::from_pairs(&[[0.2, 0.0], [-0.2, 0.0]]).is_err());
    assert!(RidgeProfile::from_pairs(&[[-0.5, f64::NAN], [0.5, 0.0]]).is_err());
    assert_eq!(
        RidgeProfile::from_pairs(&[[-0.5, -0.1], [0.5, -0.2]]).unwrap().len(),
        2
    );
}

#[test]
fn polygon_closes_right_then_bottom_corners() {
    let ridge = RidgeProfile::from_pairs(&[[-0.5, -0.1], [0.0, -0.2], [0.5, -0.1]]).unwrap();
    let poly = ridge.to_polygon(1000.0, 500.0, 100.0, 400.0);
    assert_eq!(
        poly,
        vec![
            Point::new(-500.0, 50.0),
            Point::new(0.0, 0.0),
            Point::new(500.0, 50.0),
            Point::new(500.0, 100.0),
            Point::new(500.0, 400.0),
            Point::new(-500.0, 400.0),
        ]
    );
}
