pub mod tables;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of 1 keV bins in a tube spectrum (0..=150 keV).
pub const SPECTRUM_BINS: usize = 151;

pub const WATER: &str = "Water";
pub const AIR: &str = "Air";

/// Exponent of the power-law effective atomic number reported by the survey.
pub const EFFECTIVE_Z_EXPONENT: f64 = 3.0;

#[derive(Debug, Error)]
pub enum CtError {
    #[error("unknown material: {0}")]
    UnknownMaterial(String),
    #[error("energy {energy} keV outside tabulated range [{min}, {max}] for {material}")]
    EnergyOutOfRange {
        material: String,
        energy: f64,
        min: f64,
        max: f64,
    },
    #[error("no spectrum for {kvp} kVp ({filter_mm} mm {filter_material})")]
    MissingSpectrum {
        kvp: f64,
        filter_mm: f64,
        filter_material: String,
    },
    #[error("invalid spectrum: {0}")]
    InvalidSpectrum(String),
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("no effective energies given")]
    NoEnergies,
    #[error("CT number undefined for mu={mu} (water {mu_water}, air {mu_air})")]
    UndefinedCtNumber { mu: f64, mu_water: f64, mu_air: f64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Linear attenuation lookup by material name, energy in keV, result in 1/cm.
pub trait AttenuationSource {
    fn linear_attenuation(&self, material: &str, energy_kev: f64) -> Result<f64, CtError>;

    /// Density and effective atomic number, when the source knows them.
    fn material_info(&self, _material: &str, _z_exponent: f64) -> Result<MaterialInfo, CtError> {
        Ok(MaterialInfo::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MaterialInfo {
    /// g/cm^3
    pub density: Option<f64>,
    pub effective_z: Option<f64>,
}

/// One element of a material, by mass fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementFraction {
    pub z: u32,
    /// g/mol
    pub atomic_mass: f64,
    pub mass_fraction: f64,
}

/// `Z_eff = (sum_i f_i * Z_i^m)^(1/m)` with `f_i` the electron fraction of element `i`.
pub fn power_law_effective_z(elements: &[ElementFraction], exponent: f64) -> Result<f64, CtError> {
    if !exponent.is_finite() || exponent <= 0.0 {
        return Err(CtError::InvalidTable(format!(
            "effective Z exponent must be > 0 (got {exponent})"
        )));
    }
    let mut electrons = 0.0;
    let mut weighted = 0.0;
    for e in elements {
        let n = e.mass_fraction * e.z as f64 / e.atomic_mass;
        electrons += n;
        weighted += n * (e.z as f64).powf(exponent);
    }
    if electrons <= 0.0 || !electrons.is_finite() || !weighted.is_finite() {
        return Err(CtError::InvalidTable(
            "composition carries no electrons".to_string(),
        ));
    }
    Ok((weighted / electrons).powf(1.0 / exponent))
}

pub trait SpectrumSource {
    fn spectrum(&self, kvp: f64, filter_mm: f64, filter_material: &str)
    -> Result<Spectrum, CtError>;
}

/// Energy-weighted x-ray spectrum; bin `n` holds the weight at `n` keV.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    weights: Vec<f64>,
}

impl Spectrum {
    pub fn new(weights: Vec<f64>) -> Result<Self, CtError> {
        if weights.len() != SPECTRUM_BINS {
            return Err(CtError::InvalidSpectrum(format!(
                "expected {SPECTRUM_BINS} bins, got {}",
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CtError::InvalidSpectrum(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn mean_energy(&self) -> Result<f64, CtError> {
        let total: f64 = self.weights.iter().sum();
        if total <= 0.0 {
            return Err(CtError::InvalidSpectrum("spectrum has zero weight".to_string()));
        }
        let moment: f64 = self
            .weights
            .iter()
            .enumerate()
            .map(|(n, w)| w * n as f64)
            .sum();
        Ok(moment / total)
    }
}

/// Hounsfield units of `mu` relative to water and air at the same energy.
pub fn ct_number(mu: f64, mu_water: f64, mu_air: f64) -> Result<i32, CtError> {
    let hu = (1000.0 * ((mu - mu_water) / (mu_water - mu_air))).round();
    if mu_water == mu_air || !hu.is_finite() || hu.abs() > i32::MAX as f64 {
        return Err(CtError::UndefinedCtNumber {
            mu,
            mu_water,
            mu_air,
        });
    }
    Ok(hu as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HuRange {
    pub min: i32,
    pub max: i32,
}

/// CT number range of `material` over the given effective energies.
pub fn hu_range(
    source: &dyn AttenuationSource,
    material: &str,
    energies_kev: &[f64],
) -> Result<HuRange, CtError> {
    let mut range: Option<HuRange> = None;
    for &energy in energies_kev {
        let hu = ct_number(
            source.linear_attenuation(material, energy)?,
            source.linear_attenuation(WATER, energy)?,
            source.linear_attenuation(AIR, energy)?,
        )?;
        range = Some(match range {
            None => HuRange { min: hu, max: hu },
            Some(r) => HuRange {
                min: r.min.min(hu),
                max: r.max.max(hu),
            },
        });
    }
    range.ok_or(CtError::NoEnergies)
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialHu {
    pub material: String,
    pub density: Option<f64>,
    pub effective_z: Option<f64>,
    pub range: HuRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct HuSurvey {
    pub kvps: Vec<f64>,
    pub mean_energies: Vec<f64>,
    pub materials: Vec<MaterialHu>,
}

/// Mean energies of each tube voltage, then the HU range of every material.
pub fn survey_hu(
    attenuation: &dyn AttenuationSource,
    spectra: &dyn SpectrumSource,
    kvps: &[f64],
    filter_mm: f64,
    filter_material: &str,
    materials: &[String],
) -> Result<HuSurvey, CtError> {
    let mut mean_energies = Vec::with_capacity(kvps.len());
    for &kvp in kvps {
        let spectrum = spectra.spectrum(kvp, filter_mm, filter_material)?;
        mean_energies.push(spectrum.mean_energy()?);
    }
    let mut out = Vec::with_capacity(materials.len());
    for material in materials {
        let info = attenuation.material_info(material, EFFECTIVE_Z_EXPONENT)?;
        out.push(MaterialHu {
            material: material.clone(),
            density: info.density,
            effective_z: info.effective_z,
            range: hu_range(attenuation, material, &mean_energies)?,
        });
    }
    Ok(HuSurvey {
        kvps: kvps.to_vec(),
        mean_energies,
        materials: out,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/ct/mod.rs"]
mod tests;
