//! Error taxonomy shared by the controller, the upload flow and the HTTP
//! client.

use thiserror::Error;

/// Everything that can go wrong talking to the gallery or validating a
/// user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// A repository call was rejected, timed out, or returned garbage.
    #[error("network failure: {message}")]
    Network { message: String },

    /// A selection refers to a record that is no longer in the listing.
    #[error("'{path}' is no longer in the current listing")]
    NotFound { path: String },

    /// A user action was blocked before it reached the server.
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl GalleryError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for GalleryError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_decode() {
            format!("malformed response: {err}")
        } else {
            err.to_string()
        };
        Self::Network { message }
    }
}

pub type GalleryResult<T> = Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_field() {
        let err = GalleryError::validation("folder", "choose a destination folder");
        assert_eq!(err.to_string(), "folder: choose a destination folder");
    }
}
