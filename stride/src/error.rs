//! Error types for stride.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrideError>;

#[derive(Error, Debug)]
pub enum StrideError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl StrideError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}
