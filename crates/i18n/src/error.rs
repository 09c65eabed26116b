use thiserror::Error;

/// Error type for message resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("No message found under code '{code}' for locale '{locale}'")]
    NoSuchMessage { code: String, locale: String },

    #[error("Malformed message pattern for code '{code}': {pattern}")]
    MalformedPattern { code: String, pattern: String },

    #[error("Message catalog unavailable: {0}")]
    Unavailable(String),
}
