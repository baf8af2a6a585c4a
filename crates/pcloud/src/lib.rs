//! # pCloud API client
//!
//! Typed, async access to the pCloud HTTP/JSON API.
//!
//! A [`PCloudClient`] holds the access token and base URLs and hands out one
//! borrowed client per area of the API: [`PCloudClient::folders`],
//! [`PCloudClient::files`], [`PCloudClient::links`] and so on. Each method on
//! those clients performs exactly one round trip.
//!
//! ## Requests
//!
//! Every remote method takes a request type from [`api`]. Required values go
//! through `new`, which validates them before any I/O happens; optional
//! values are set with chained setters. Unset options are never sent.
//!
//! ```no_run
//! use pcloud::{PCloudClient, api::file::UploadFileRequest};
//!
//! # async fn example() -> pcloud::Result<()> {
//! let client = PCloudClient::new("access-token")?;
//! let request = UploadFileRequest::new(0, "notes.txt", "hello")?.rename_if_exists(true);
//! let uploaded = client.files().upload(&request).await?.into_result()?;
//! println!("uploaded {:?}", uploaded.fileids);
//! # Ok(())
//! # }
//! ```
//!
//! ## Responses and errors
//!
//! Every JSON response arrives as an [`ApiResponse`]: a `result` code, an
//! optional server `error` text and the endpoint's typed payload. A non-zero
//! `result` is *data*: the call still returns `Ok`. Use
//! [`ApiResponse::into_result`] to turn application errors into
//! [`Error::Api`], or [`known_message`] to look up the documented meaning of
//! a code.
//!
//! `Err` is reserved for failures on this side of the API: invalid arguments
//! ([`Error::Validation`]), transport problems, non-2xx statuses and bodies
//! that do not decode.
//!
//! Binary endpoints (thumbnails, zip archives, text files) return a
//! [`Download`] over the raw response body instead.
//!
//! ## Timestamps
//!
//! pCloud renders dates like `Wed, 06 Dec 2023 10:15:30 +0000`. The
//! [`timestamp`] module parses and formats that layout; request types take
//! and render [`Timestamp`] values in it.

pub mod api;
mod client;
pub mod endpoint;
mod error;
mod metadata;
mod request;
mod response;
pub mod timestamp;
mod transport;

#[cfg(test)]
mod testing;

pub use client::{ClientBuilder, DEFAULT_BASE_URL, DEFAULT_OAUTH_URL, PCloudClient};
pub use error::{Error, Result, ValidationError};
pub use metadata::{Collection, Metadata};
pub use request::{
    Item, OverwriteMode, Params, Permission, Permissions, ThumbSize, ToParams, Tree,
};
pub use response::{ApiError, ApiResponse, Empty, known_message};
pub use timestamp::Timestamp;
pub use transport::Download;
