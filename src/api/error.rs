use thiserror::Error;

/// Message used when the server gives us nothing better: unreachable host,
/// unparseable error body, or an envelope with no message.
pub const FALLBACK_MESSAGE: &str = "API request failed";

/// The single failure kind surfaced by the API layer.
///
/// Callers cannot (and must not) distinguish a network failure from a non-2xx
/// status from an envelope-level `success: false`; every rejection is a
/// human-readable message to show the user, nothing more. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error carrying the generic fallback message.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_MESSAGE)
    }

    /// Error from an optional server-supplied message, falling back when the
    /// server sent none.
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(m) => Self::new(m),
            None => Self::fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_message_verbatim() {
        let err = ApiError::new("Invalid master password");
        assert_eq!(err.to_string(), "Invalid master password");
    }

    #[test]
    fn missing_message_falls_back() {
        assert_eq!(ApiError::from_message(None).to_string(), FALLBACK_MESSAGE);
        assert_eq!(
            ApiError::from_message(Some("boom".into())).to_string(),
            "boom"
        );
    }
}
