use thiserror::Error;

use crate::comparison::ComparisonError;
use crate::comparison::MalformedInputError;
use crate::comparison::variables::VariableParserError;
use crate::configuration::project::ConfigurationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Variables(#[from] VariableParserError),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    #[error("no [baseline] package configured")]
    MissingBaseline,
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
