pub mod gamma;
pub mod penumbra;
pub mod profile;
pub mod settings;
