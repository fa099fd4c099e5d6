use super::*;

const MATERIALS: &str = r#"{
  "materials": [
    { "name": "Water", "density": 1.0,
      "composition": [ { "z": 1, "atomic_mass": 1.008, "mass_fraction": 0.111894 },
                       { "z": 8, "atomic_mass": 15.999, "mass_fraction": 0.888106 } ],
      "points": [ { "energy_kev": 40, "mass_attenuation": 0.268 },
                  { "energy_kev": 60, "mass_attenuation": 0.206 },
                  { "energy_kev": 80, "mass_attenuation": 0.184 } ] },
    { "name": "Air", "density": 0.001205,
      "points": [ { "energy_kev": 40, "mass_attenuation": 0.2485 },
                  { "energy_kev": 80, "mass_attenuation": 0.1662 } ] },
    { "name": "Lung", "density": 1.05,
      "points": [ { "energy_kev": 40, "mass_attenuation": 0.266 },
                  { "energy_kev": 80, "mass_attenuation": 0.182 } ] }
  ]
}"#;

fn spectra_json() -> String {
    let mut w = vec![0.0; 151];
    w[50] = 0.5;
    w[60] = 0.5;
    let weights = serde_json::to_string(&w).unwrap();
    format!(
        r#"{{ "spectra": [
            {{ "kvp": 120, "filter_mm": 0.0, "filter_material": "Aluminum", "weights": {weights} }},
            {{ "kvp": 80, "filter_mm": 0.0, "filter_material": "Aluminum", "weights": {weights} }}
        ] }}"#
    )
}

#[test]
fn test_attenuation_interpolates_and_scales_by_density() {
    let table = AttenuationTable::from_json_str(MATERIALS).unwrap();
    let mu = table.linear_attenuation("Water", 50.0).unwrap();
    assert!((mu - 0.237).abs() < 1e-12);
    let air = table.linear_attenuation("Air", 40.0).unwrap();
    assert!((air - 0.2485 * 0.001205).abs() < 1e-15);
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["Air", "Lung", "Water"]);
}

#[test]
fn test_attenuation_errors() {
    let table = AttenuationTable::from_json_str(MATERIALS).unwrap();
    assert!(matches!(
        table.linear_attenuation("Water", 20.0),
        Err(CtError::EnergyOutOfRange { .. })
    ));
    assert!(matches!(
        table.linear_attenuation("Gold", 50.0),
        Err(CtError::UnknownMaterial(_))
    ));
    assert!(matches!(
        AttenuationTable::from_json_str("{"),
        Err(CtError::Json(_))
    ));
}

#[test]
fn test_unordered_energies_rejected() {
    let bad = r#"{ "materials": [ { "name": "X", "density": 1.0,
        "points": [ { "energy_kev": 60, "mass_attenuation": 0.2 },
                    { "energy_kev": 40, "mass_attenuation": 0.3 } ] } ] }"#;
    assert!(matches!(
        AttenuationTable::from_json_str(bad),
        Err(CtError::InvalidTable(_))
    ));
}

#[test]
fn test_force_density_lowers_lung_hu() {
    let mut table = AttenuationTable::from_json_str(MATERIALS).unwrap();
    let solid = crate::ct::hu_range(&table, "Lung", &[60.0]).unwrap();
    table.force_density("Lung", 0.25).unwrap();
    assert_eq!(table.density("Lung").unwrap(), 0.25);
    let inflated = crate::ct::hu_range(&table, "Lung", &[60.0]).unwrap();
    assert!(inflated.max < solid.min);
    assert!(inflated.max < -500);
    assert!(table.force_density("Lung", 0.0).is_err());
    assert!(table.force_density("Gold", 1.0).is_err());
}

#[test]
fn test_spectrum_table_lookup() {
    let table = SpectrumTable::from_json_str(&spectra_json()).unwrap();
    assert_eq!(table.kvps(), vec![80.0, 120.0]);
    let s = table.spectrum(120.0, 0.0, "aluminum").unwrap();
    assert_eq!(s.mean_energy().unwrap(), 55.0);
    assert!(matches!(
        table.spectrum(100.0, 0.0, "Aluminum"),
        Err(CtError::MissingSpectrum { .. })
    ));
}

#[test]
fn test_material_info_reports_density_and_effective_z() {
    let mut table = AttenuationTable::from_json_str(MATERIALS).unwrap();
    let water = table.material_info("Water", 3.0).unwrap();
    assert_eq!(water.density, Some(1.0));
    let z = water.effective_z.unwrap();
    assert!((z - 7.4278).abs() < 1e-3);

    // No composition in the table: density only.
    let air = table.material_info("Air", 3.0).unwrap();
    assert_eq!(air.density, Some(0.001205));
    assert_eq!(air.effective_z, None);

    table.force_density("Lung", 0.25).unwrap();
    assert_eq!(table.material_info("Lung", 3.0).unwrap().density, Some(0.25));
    assert!(table.material_info("Gold", 3.0).is_err());
}

#[test]
fn test_survey_carries_material_properties() {
    let table = AttenuationTable::from_json_str(MATERIALS).unwrap();
    let spectra = SpectrumTable::from_json_str(&spectra_json()).unwrap();
    let materials = vec!["Water".to_string(), "Lung".to_string()];
    let survey =
        crate::ct::survey_hu(&table, &spectra, &[80.0, 120.0], 0.0, "Aluminum", &materials).unwrap();
    assert_eq!(survey.materials[0].range, crate::ct::HuRange { min: 0, max: 0 });
    assert!(survey.materials[0].effective_z.is_some());
    assert_eq!(survey.materials[1].density, Some(1.05));
    assert_eq!(survey.materials[1].effective_z, None);

    let json = serde_json::to_value(&survey).unwrap();
    assert!(json["materials"][0]["effective_z"].as_f64().is_some());
    assert!(json["materials"][1]["effective_z"].is_null());
}

#[test]
fn test_invalid_composition_rejected() {
    let bad = r#"{ "materials": [ { "name": "X", "density": 1.0,
        "composition": [ { "z": 0, "atomic_mass": 1.0, "mass_fraction": 1.0 } ],
        "points": [ { "energy_kev": 40, "mass_attenuation": 0.3 } ] } ] }"#;
    assert!(matches!(
        AttenuationTable::from_json_str(bad),
        Err(CtError::InvalidTable(_))
    ));
}
