use super::*;

fn erf_model(x0: f64, x: f64, m: &PenumbraModel) -> f64 {
    let edge = x0 - x.abs();
    m.t + (1.0 - m.t)
        * (m.a * ((libm::erf(m.b1 * edge) + 1.0) / 2.0)
            + (1.0 - m.a) * ((libm::erf(m.b2 * edge) + 1.0) / 2.0))
}

#[test]
fn test_axis_layout() {
    let axis = profile_axis(20.0, 256);
    assert_eq!(axis.len(), 256);
    assert_eq!(axis[0], -10.0);
    assert_eq!(axis[128], 0.0);
    assert!((axis[255] - (10.0 - 20.0 / 256.0)).abs() < 1e-12);
    assert!(axis.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_reference_profile_matches_closed_form() {
    let m = PenumbraModel::low_1998();
    let p = generate_profile(5.0, 0.0, 1.0, &m, 20.0, 64);
    for point in p.points() {
        let expected = erf_model(5.0, point.position, &m);
        assert_eq!(point.dose.to_bits(), expected.to_bits());
    }
}

#[test]
fn test_test_profile_is_shifted_and_scaled() {
    let m = PenumbraModel::low_1998();
    let p = generate_profile(5.0, 0.25, 1.025, &m, 20.0, 64);
    for point in p.points() {
        let expected = 1.025 * erf_model(5.25, point.position, &m);
        assert!((point.dose - expected).abs() < 1e-15);
    }
}

#[test]
fn test_pair_shares_positions() {
    let pair = generate_profile_pair(&ProfilePairParams::default()).unwrap();
    assert_eq!(pair.test.len(), 256);
    assert!(pair.test.same_positions(&pair.reference));
    // Central axis: scaled test dose above reference.
    let centre = 128;
    assert!(pair.test.points()[centre].dose > pair.reference.points()[centre].dose);
    assert!(pair.reference.max_dose() <= 1.0);
}

#[test]
fn test_zero_shift_unit_scale_is_identity() {
    let params = ProfilePairParams {
        shift: 0.0,
        eta: 1.0,
        ..ProfilePairParams::default()
    };
    let pair = generate_profile_pair(&params).unwrap();
    assert_eq!(pair.test, pair.reference);
}

#[test]
fn test_pair_rejects_degenerate_axis() {
    for params in [
        ProfilePairParams {
            width: 0.0,
            ..ProfilePairParams::default()
        },
        ProfilePairParams {
            width: f64::NAN,
            ..ProfilePairParams::default()
        },
        ProfilePairParams {
            sample_count: 0,
            ..ProfilePairParams::default()
        },
        ProfilePairParams {
            field_size: -1.0,
            ..ProfilePairParams::default()
        },
        ProfilePairParams {
            eta: f64::INFINITY,
            ..ProfilePairParams::default()
        },
    ] {
        assert!(matches!(
            generate_profile_pair(&params),
            Err(GammaError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn test_valid_params_give_strictly_increasing_profile() {
    let params = ProfilePairParams {
        width: 4.0,
        sample_count: 4,
        ..ProfilePairParams::default()
    };
    let pair = generate_profile_pair(&params).unwrap();
    assert!(DoseProfile::new(pair.reference.points().to_vec()).is_ok());
    assert!(DoseProfile::new(pair.test.points().to_vec()).is_ok());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "profile axis needs width > 0")]
fn test_zero_width_axis_is_caught_in_debug_builds() {
    let _ = generate_profile(5.0, 0.0, 1.0, &PenumbraModel::low_1998(), 0.0, 4);
}
