pub mod app_config;
pub mod config;
pub mod listing;
pub mod products;
pub mod rates;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{ListingEnvelope, SortMode, SUCCESS_CODE};
pub use products::{CanonicalProduct, Dimensions, Weight, WeightUnit};
pub use rates::{RateSource, RateTable};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
