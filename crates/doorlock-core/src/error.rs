use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Construction errors
    #[error("Invalid ring buffer capacity {capacity}: must be 1-{max}")]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Command too long: {len} bytes, at most {max} allowed")]
    CommandTooLong { len: usize, max: usize },

    // Configuration errors
    #[error("Invalid credential `{name}`: {reason}")]
    InvalidCredential { name: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
