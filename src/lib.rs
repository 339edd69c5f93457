pub mod config;
pub mod error;
pub mod estimator;
pub mod output;
pub mod types;

pub use config::{Config, ConfigOverrides};
pub use error::EstimateError;
pub use estimator::SolarEstimator;
pub use types::{EstimateInput, EstimateResult, PropertyType};
