pub mod ct;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scenario;

pub use crate::error::GammaError;
pub use crate::model::gamma::{GammaResult, GammaValue};
pub use crate::model::penumbra::{PenumbraModel, ProfilePairParams};
pub use crate::model::profile::{DosePoint, DoseProfile};
pub use crate::model::settings::GammaSettings;
pub use crate::pipeline::stage1_profiles::{ProfilePair, generate_profile, generate_profile_pair};
pub use crate::pipeline::stage2_resample::{ResampledProfile, resample};
pub use crate::pipeline::stage3_dose_diff::dose_difference;
pub use crate::pipeline::stage4_dta::{DTA_MATCH_TOLERANCE, DTA_NO_MATCH, distance_to_agreement};
pub use crate::pipeline::stage5_gamma::compute_gamma;
