//! The `{result, error}` envelope shared by every JSON response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A decoded JSON response.
///
/// `result == 0` means success; any other value is an application error code.
/// The payload is decoded regardless of the outcome so callers can inspect
/// whatever partial data accompanied an error, which is why every payload
/// field in this crate is optional or defaulted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    /// `0` on success, otherwise an error code.
    pub result: u32,
    /// Server-supplied error text. May be absent even when `result != 0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Endpoint-specific payload.
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Returns `true` when the server reported success.
    pub fn is_success(&self) -> bool {
        self.result == 0
    }

    /// Returns the canonical message for this response's code, if known.
    pub fn known_message(&self) -> Option<&'static str> {
        known_message(self.result)
    }

    /// Returns the error for a non-zero `result`, without consuming the
    /// response.
    pub fn api_error(&self) -> Option<ApiError> {
        (!self.is_success()).then(|| ApiError {
            code: self.result,
            message: self.error.clone(),
        })
    }

    /// Converts the response into its payload, turning a non-zero `result`
    /// into [`crate::Error::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Api`] when `result != 0`.
    pub fn into_result(self) -> crate::Result<T> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ApiError {
                code: self.result,
                message: self.error,
            }
            .into())
        }
    }
}

/// Payload of endpoints that only return the envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Empty {}

/// An application error reported through the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The non-zero `result` code.
    pub code: u32,
    /// The server's `error` text, if any.
    pub message: Option<String>,
}

impl ApiError {
    /// Returns the canonical message for this code, if known.
    pub fn known_message(&self) -> Option<&'static str> {
        known_message(self.code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.message.as_deref().or_else(|| self.known_message());
        match text {
            Some(text) => write!(f, "pCloud error {}: {text}", self.code),
            None => write!(f, "pCloud error {}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}

/// Known result codes and their canonical messages.
const ERROR_CODES: &[(u32, &str)] = &[
    (1000, "Log in required"),
    (1001, "No full path or name/folderid provided"),
    (1002, "No full path or folderid provided"),
    (1004, "No fileid or path provided"),
    (2000, "Log in failed"),
    (2001, "Invalid file/folder name"),
    (2002, "A component of parent directory does not exist"),
    (2003, "Access denied"),
    (2004, "File or folder already exists"),
    (2005, "Directory does not exist"),
    (2008, "User is over quota"),
    (2009, "File not found"),
    (2010, "Invalid path"),
    (2041, "Connection broken"),
    (4000, "Too many login tries"),
    (5000, "Internal error, try again later"),
    (5001, "Internal upload error"),
];

/// Looks up the canonical message for a result code.
///
/// Unknown codes, including `0`, return `None`.
pub fn known_message(code: u32) -> Option<&'static str> {
    ERROR_CODES
        .binary_search_by_key(&code, |&(c, _)| c)
        .ok()
        .map(|i| ERROR_CODES[i].1)
}
