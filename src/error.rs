use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(dosecal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(dosecal::config))]
    Config(String),

    #[error("Reminder extraction error: {0}")]
    #[diagnostic(code(dosecal::extraction))]
    Extraction(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(dosecal::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(dosecal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(dosecal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(dosecal::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create extraction errors
pub fn extraction_error(message: &str) -> Error {
    Error::Extraction(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}
