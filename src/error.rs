use std::fmt;

/// Errors raised while building or running a network.
///
/// - `Configuration`     — the network or training setup is unusable
///                         (bad shape, inconsistent parameters, zero batch size)
/// - `DimensionMismatch` — a sample or label has the wrong length for the network
/// - `NoForwardPass`     — `backward()` was called before any `forward()`
/// - `InvalidData`       — a dataset is empty or its containers are misaligned
/// - `Io` / `Json`       — reading or writing a config file failed
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    Configuration(String),
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    NoForwardPass,
    InvalidData(String),
    Io(String),
    Json(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

impl NetworkError {
    pub(crate) fn mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::DimensionMismatch { context, expected, actual }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            NetworkError::DimensionMismatch { context, expected, actual } => write!(
                f,
                "dimension mismatch in {context}: expected {expected}, got {actual}"
            ),
            NetworkError::NoForwardPass => {
                write!(f, "backward pass requested before any forward pass")
            }
            NetworkError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            NetworkError::Io(msg) => write!(f, "i/o error: {msg}"),
            NetworkError::Json(msg) => write!(f, "json error: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Json(e.to_string())
    }
}
