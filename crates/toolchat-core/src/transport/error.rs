//! Transport error types

use thiserror::Error;

/// Errors at the chat backend boundary
#[derive(Error, Debug)]
pub enum TransportError {
    /// Backend could not be reached at all
    #[error("chat backend unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with a non-success status
    #[error("chat API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Create an API error, keeping only the head of a long body
    pub fn api_error(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 512;
        let message = if body.len() > MAX_BODY {
            // Back off to a char boundary so multi-byte bodies cannot
            // split mid-character.
            let mut cut = MAX_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &body[..cut])
        } else {
            body.to_string()
        };
        Self::Api { status, message }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_truncates_body() {
        let long = "x".repeat(2048);
        match TransportError::api_error(500, &long) {
            TransportError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.len() < long.len());
                assert!(message.ends_with("..."));
            }
            other => panic!("unexpected variant: {other}"),
        }
    }

    #[test]
    fn test_api_error_truncates_multibyte_body_on_char_boundary() {
        let long = "€".repeat(200);
        match TransportError::api_error(500, &long) {
            TransportError::Api { message, .. } => {
                assert!(message.ends_with("..."));
                assert!(message.len() <= 512 + 3);
                assert!(message.trim_end_matches("...").chars().all(|c| c == '€'));
            }
            other => panic!("unexpected variant: {other}"),
        }
    }
}
