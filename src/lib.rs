pub mod cache;
pub mod comparison;
pub mod configuration;
pub mod error;

pub use comparison::{ComparisonResult, ConfigFileRecord};
pub use error::Error;
