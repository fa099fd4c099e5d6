use super::*;

#[test]
fn test_new_rejects_non_increasing_positions() {
    let points = vec![
        DosePoint::new(0.0, 1.0),
        DosePoint::new(1.0, 1.0),
        DosePoint::new(1.0, 0.5),
    ];
    let err = DoseProfile::new(points).unwrap_err();
    assert!(matches!(err, GammaError::InvalidProfile(_)));
}

#[test]
fn test_new_rejects_non_finite() {
    let points = vec![DosePoint::new(0.0, f64::NAN), DosePoint::new(1.0, 1.0)];
    assert!(DoseProfile::new(points).is_err());
}

#[test]
fn test_from_columns_length_mismatch() {
    let err = DoseProfile::from_columns(&[0.0, 1.0], &[1.0]).unwrap_err();
    assert!(matches!(err, GammaError::InvalidProfile(_)));
}

#[test]
fn test_max_dose_and_same_positions() {
    let a = DoseProfile::from_columns(&[0.0, 1.0, 2.0], &[0.2, 0.9, 0.4]).unwrap();
    let b = DoseProfile::from_columns(&[0.0, 1.0, 2.0], &[0.0, 0.0, 0.0]).unwrap();
    let c = DoseProfile::from_columns(&[0.0, 1.0, 2.5], &[0.2, 0.9, 0.4]).unwrap();
    assert_eq!(a.max_dose(), 0.9);
    assert!(a.same_positions(&b));
    assert!(!a.same_positions(&c));
    assert_eq!(DoseProfile::new(Vec::new()).unwrap().max_dose(), 0.0);
}

#[test]
fn test_interpolate_linear_brackets_and_clamps() {
    let pts = [
        DosePoint::new(0.0, 0.0),
        DosePoint::new(1.0, 2.0),
        DosePoint::new(3.0, 4.0),
    ];
    let f = |x| interpolate_linear(&pts, x, |p: &DosePoint| (p.position, p.dose));
    assert_eq!(f(0.5), 1.0);
    assert_eq!(f(2.0), 3.0);
    assert_eq!(f(1.0), 2.0);
    assert_eq!(f(-1.0), 0.0);
    assert_eq!(f(3.0), 4.0);
    assert_eq!(f(9.0), 4.0);
}
