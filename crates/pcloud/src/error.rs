//! Error types for the pCloud client.

use reqwest::StatusCode;

use crate::response::ApiError;

/// Errors returned by this crate.
///
/// The variants separate the four ways a call can go wrong:
/// - [`Error::Validation`]: the request was rejected before any I/O.
/// - [`Error::Transport`] and [`Error::Status`]: the HTTP exchange itself
///   failed.
/// - [`Error::Parse`]: the server answered, but the body did not match the
///   expected shape.
/// - [`Error::Api`]: the server reported a non-zero `result`. Endpoint methods
///   never produce this variant on their own; it only appears when a caller
///   converts a response with [`ApiResponse::into_result`].
///
/// [`ApiResponse::into_result`]: crate::ApiResponse::into_result
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A request failed client-side validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection, TLS or timeout failure reported by the HTTP layer.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{endpoint} failed: HTTP {status} {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The server reported an application error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A base URL could not be used to build endpoint URLs.
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The authorize redirect did not carry an authorization code.
    #[error("authorize response did not contain an authorization code")]
    MissingAuthorizationCode,
}

/// Client-side validation failures, raised while building a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required text or list value was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A numeric value was outside its documented range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// A value was present but malformed.
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// Two fields must be provided together.
    #[error("{field} requires {other}")]
    Conflict {
        field: &'static str,
        other: &'static str,
    },
}

impl ValidationError {
    /// Returns the name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::OutOfRange { field, .. }
            | Self::Invalid { field, .. }
            | Self::Conflict { field, .. } => field,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Ensures a required string value is not blank.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

/// Ensures a required list is not empty.
pub(crate) fn require_items<T>(field: &'static str, items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

/// Ensures `value` lies within `min..=max`.
pub(crate) fn require_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_empty_display_names_field() {
        let err = ValidationError::Empty { field: "name" };
        assert_eq!(err.to_string(), "name must not be empty");
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn test_validation_error_out_of_range_display_includes_bounds() {
        let err = ValidationError::OutOfRange {
            field: "abitrate",
            value: 500,
            min: 16,
            max: 320,
        };
        assert_eq!(
            err.to_string(),
            "abitrate must be between 16 and 320, got 500"
        );
    }

    #[test]
    fn test_require_text_rejects_whitespace() {
        assert_eq!(
            require_text("toname", "   "),
            Err(ValidationError::Empty { field: "toname" })
        );
        assert!(require_text("toname", "docs").is_ok());
    }

    #[test]
    fn test_require_range_accepts_bounds_inclusive() {
        assert_eq!(require_range("abitrate", 16, 16, 320), Ok(16));
        assert_eq!(require_range("abitrate", 320, 16, 320), Ok(320));
        assert!(require_range("abitrate", 15, 16, 320).is_err());
        assert!(require_range("abitrate", 321, 16, 320).is_err());
    }

    #[test]
    fn test_validation_error_converts_into_crate_error() {
        let err: Error = ValidationError::Empty { field: "mail" }.into();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "mail must not be empty");
    }
}
