use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ct::{
    AttenuationSource, CtError, ElementFraction, MaterialInfo, Spectrum, SpectrumSource,
    power_law_effective_z,
};
use crate::model::profile::interpolate_linear;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AttenuationPoint {
    pub energy_kev: f64,
    /// Mass attenuation coefficient, cm^2/g.
    pub mass_attenuation: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialEntry {
    pub name: String,
    /// g/cm^3
    pub density: f64,
    pub points: Vec<AttenuationPoint>,
    /// Elemental make-up; needed only for the effective atomic number.
    #[serde(default)]
    pub composition: Vec<ElementFraction>,
}

#[derive(Debug, Deserialize)]
struct MaterialFile {
    materials: Vec<MaterialEntry>,
}

/// Pre-populated mass attenuation tables keyed by material name.
#[derive(Debug, Clone, Default)]
pub struct AttenuationTable {
    materials: BTreeMap<String, MaterialEntry>,
}

impl AttenuationTable {
    pub fn from_entries(entries: Vec<MaterialEntry>) -> Result<Self, CtError> {
        let mut materials = BTreeMap::new();
        for entry in entries {
            validate_entry(&entry)?;
            materials.insert(entry.name.clone(), entry);
        }
        Ok(Self { materials })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CtError> {
        let file: MaterialFile = serde_json::from_str(json)?;
        Self::from_entries(file.materials)
    }

    pub fn load(path: &Path) -> Result<Self, CtError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn density(&self, material: &str) -> Result<f64, CtError> {
        self.entry(material).map(|e| e.density)
    }

    /// Replaces the tabulated density, e.g. inflated lung instead of solid tissue.
    pub fn force_density(&mut self, material: &str, density: f64) -> Result<(), CtError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(CtError::InvalidTable(format!(
                "density for {material} must be > 0 (got {density})"
            )));
        }
        let entry = self
            .materials
            .get_mut(material)
            .ok_or_else(|| CtError::UnknownMaterial(material.to_string()))?;
        entry.density = density;
        Ok(())
    }

    fn entry(&self, material: &str) -> Result<&MaterialEntry, CtError> {
        self.materials
            .get(material)
            .ok_or_else(|| CtError::UnknownMaterial(material.to_string()))
    }
}

impl AttenuationSource for AttenuationTable {
    fn linear_attenuation(&self, material: &str, energy_kev: f64) -> Result<f64, CtError> {
        let entry = self.entry(material)?;
        let min = entry.points[0].energy_kev;
        let max = entry.points[entry.points.len() - 1].energy_kev;
        if !(min..=max).contains(&energy_kev) {
            return Err(CtError::EnergyOutOfRange {
                material: material.to_string(),
                energy: energy_kev,
                min,
                max,
            });
        }
        let mass = interpolate_linear(&entry.points, energy_kev, |p| {
            (p.energy_kev, p.mass_attenuation)
        });
        Ok(mass * entry.density)
    }

    fn material_info(&self, material: &str, z_exponent: f64) -> Result<MaterialInfo, CtError> {
        let entry = self.entry(material)?;
        let effective_z = if entry.composition.is_empty() {
            None
        } else {
            Some(power_law_effective_z(&entry.composition, z_exponent)?)
        };
        Ok(MaterialInfo {
            density: Some(entry.density),
            effective_z,
        })
    }
}

fn validate_entry(entry: &MaterialEntry) -> Result<(), CtError> {
    if !entry.density.is_finite() || entry.density <= 0.0 {
        return Err(CtError::InvalidTable(format!(
            "{}: density must be > 0",
            entry.name
        )));
    }
    if entry.points.is_empty() {
        return Err(CtError::InvalidTable(format!(
            "{}: no attenuation points",
            entry.name
        )));
    }
    for e in &entry.composition {
        let valid = e.z >= 1
            && e.atomic_mass.is_finite()
            && e.atomic_mass > 0.0
            && e.mass_fraction.is_finite()
            && e.mass_fraction >= 0.0;
        if !valid {
            return Err(CtError::InvalidTable(format!(
                "{}: invalid element Z={} A={} w={}",
                entry.name, e.z, e.atomic_mass, e.mass_fraction
            )));
        }
    }
    for w in entry.points.windows(2) {
        if w[1].energy_kev <= w[0].energy_kev {
            return Err(CtError::InvalidTable(format!(
                "{}: energies must be strictly increasing",
                entry.name
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpectrumEntry {
    pub kvp: f64,
    pub filter_mm: f64,
    pub filter_material: String,
    pub weights: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct SpectrumFile {
    spectra: Vec<SpectrumEntry>,
}

/// Precomputed tube spectra looked up by (kVp, filtration).
#[derive(Debug, Clone, Default)]
pub struct SpectrumTable {
    entries: Vec<SpectrumEntry>,
}

impl SpectrumTable {
    pub fn from_entries(entries: Vec<SpectrumEntry>) -> Result<Self, CtError> {
        for e in &entries {
            Spectrum::new(e.weights.clone())?;
        }
        Ok(Self { entries })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CtError> {
        let file: SpectrumFile = serde_json::from_str(json)?;
        Self::from_entries(file.spectra)
    }

    pub fn load(path: &Path) -> Result<Self, CtError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn kvps(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self.entries.iter().map(|e| e.kvp).collect();
        out.sort_by(|a, b| a.total_cmp(b));
        out.dedup();
        out
    }
}

impl SpectrumSource for SpectrumTable {
    fn spectrum(
        &self,
        kvp: f64,
        filter_mm: f64,
        filter_material: &str,
    ) -> Result<Spectrum, CtError> {
        self.entries
            .iter()
            .find(|e| {
                e.kvp == kvp
                    && e.filter_mm == filter_mm
                    && e.filter_material.eq_ignore_ascii_case(filter_material)
            })
            .ok_or_else(|| CtError::MissingSpectrum {
                kvp,
                filter_mm,
                filter_material: filter_material.to_string(),
            })
            .and_then(|e| Spectrum::new(e.weights.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/ct/tables.rs"]
mod tests;
