use super::*;

#[test]
fn test_default_matches_reference_scenario() {
    let s = GammaSettings::default();
    assert!(s.use_global_max);
    assert_eq!(s.dose_criterion, 0.03);
    assert_eq!(s.dist_criterion, 0.3);
    assert_eq!(s.resample_step, 0.01);
    assert_eq!(s.dose_threshold, 0.1);
    assert!(s.validate().is_ok());
}

#[test]
fn test_variants_do_not_touch_the_base_value() {
    let base = GammaSettings::default();
    let local = base.with_local_max();
    let tight = base.with_criteria(0.02, 0.2);
    let coarse = base.with_resample_step(1.0);
    assert!(base.use_global_max);
    assert!(!local.use_global_max);
    assert_eq!(tight.dose_criterion, 0.02);
    assert_eq!(tight.dist_criterion, 0.2);
    assert_eq!(coarse.resample_step, 1.0);
    assert_eq!(base, GammaSettings::default());
    assert!(local.with_global_max().use_global_max);
}

#[test]
fn test_validate_rejects_non_positive_fields() {
    let base = GammaSettings::default();
    for bad in [
        base.with_criteria(0.0, 0.3),
        base.with_criteria(0.03, -0.1),
        base.with_resample_step(0.0),
        base.with_threshold(-0.5),
        base.with_resample_step(f64::NAN),
        base.with_criteria(f64::INFINITY, 0.3),
    ] {
        assert!(matches!(
            bad.validate(),
            Err(GammaError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn test_label_mentions_normalization() {
    assert!(GammaSettings::default().label().starts_with("global max"));
    assert!(
        GammaSettings::default()
            .with_local_max()
            .label()
            .starts_with("local max")
    );
}
