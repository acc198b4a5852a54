use thiserror::Error;

use crate::common::error::AgentError::GenericError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error(transparent)]
    MigError(#[from] migstrat::MigError),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<toml::de::Error> for AgentError {
    fn from(error: toml::de::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}

impl From<String> for AgentError {
    fn from(e: String) -> Self {
        GenericError(e)
    }
}

pub fn error<T>(message: String) -> crate::Result<T> {
    Err(GenericError(message))
}
