use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GammaError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("profile mismatch: {0}")]
    ProfileMismatch(String),
    #[error("degenerate profile: {0}")]
    DegenerateProfile(String),
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}
