use thiserror::Error;

/// Failures raised by the matching and simplification core.
///
/// Everything that touches the filesystem reports through `anyhow` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChoroplethError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no data value for '{0}'")]
    MissingValue(String),
}

pub type Result<T> = std::result::Result<T, ChoroplethError>;
