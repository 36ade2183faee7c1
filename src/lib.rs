pub mod basin;
pub mod config;
pub mod convolution;
pub mod error;
pub mod huff;
pub mod hydrograph;
pub mod idf;
pub mod project;
pub mod report;
pub mod runoff;
pub mod unit_hydrograph;
pub mod validation;

pub use basin::BasinParameters;
pub use config::EngineConfig;
pub use error::{HydroError, HydroResult, InputError, InputWarning};
pub use hydrograph::{HydrographInputs, HydrographResult, RunoffModel};
pub use idf::{IdfCatalog, IdfFormula, IdfParameters, StormParameters};
pub use project::ProjectFile;
