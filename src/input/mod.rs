use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::error::GammaError;
use crate::model::profile::DoseProfile;
use crate::pipeline::stage1_profiles::ProfilePair;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Profile(#[from] GammaError),
}

/// Reads `position test_dose reference_dose` rows, whitespace separated.
///
/// Blank lines and lines starting with `#` are skipped; a first line whose
/// fields do not parse as numbers is treated as a header.
pub fn load_profiles_tsv(path: &Path) -> Result<ProfilePair, InputError> {
    let reader = BufReader::new(File::open(path)?);
    let pair = parse_profiles(reader)?;
    info!(
        path = %path.display(),
        samples = pair.test.len(),
        "loaded dose profiles"
    );
    Ok(pair)
}

pub fn parse_profiles<R: BufRead>(reader: R) -> Result<ProfilePair, InputError> {
    let mut positions = Vec::new();
    let mut test = Vec::new();
    let mut reference = Vec::new();

    let mut header_skipped = false;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(InputError::Parse {
                line: line_no,
                msg: format!("expected 3 columns, found {}", fields.len()),
            });
        }
        let parsed: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
        match parsed {
            Ok(values) => {
                positions.push(values[0]);
                test.push(values[1]);
                reference.push(values[2]);
            }
            Err(_) if !header_skipped && positions.is_empty() => {
                header_skipped = true;
            }
            Err(e) => {
                return Err(InputError::Parse {
                    line: line_no,
                    msg: e.to_string(),
                });
            }
        }
    }

    if positions.is_empty() {
        return Err(InputError::InvalidInput(
            "no profile samples found".to_string(),
        ));
    }

    Ok(ProfilePair {
        test: DoseProfile::from_columns(&positions, &test)?,
        reference: DoseProfile::from_columns(&positions, &reference)?,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
