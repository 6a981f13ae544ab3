use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardinalError>;

#[derive(Error, Debug)]
pub enum CardinalError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Index out of bounds: {index} >= {capacity}")]
    IndexOutOfBounds { index: usize, capacity: usize },

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("SystemTime error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),

    #[error("Failed to parse environment variable {var_name}: value '{value}' - {error}")]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },
}

// Conversion from String for validation errors
impl From<String> for CardinalError {
    fn from(msg: String) -> Self {
        CardinalError::InvalidConfig(msg)
    }
}
