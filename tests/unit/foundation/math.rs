use super::*;

#[test]
fn fract_wraps_negative_values() {
    assert_eq!(fract(2.25), 0.25);
    assert_eq!(fract(-0.25), 0.75);
    assert_eq!(fract(3.0), 0.0);
}

#[test]
fn snap_rounds_to_quantum() {
    assert!((snap(-0.171, 0.02) - -0.18).abs() < 1e-12);
    assert!((snap(0.049, 0.02) - 0.04).abs() < 1e-12);
    assert_eq!(snap(0.123, 0.0), 0.123);
}
