//! Endpoint clients, one module per functional area.
//!
//! Each module defines its request types (validated at construction, with
//! optional parameters set through chained setters), its response payloads,
//! and a borrowed client obtained from [`crate::PCloudClient`]. Every client
//! method performs exactly one round trip and returns the decoded
//! [`crate::ApiResponse`]; a non-zero `result` is data, not an error.

pub mod archiving;
pub mod auth;
pub mod collection;
pub mod file;
pub mod folder;
pub mod general;
pub mod link;
pub mod revisions;
pub mod sharing;
pub mod streaming;
pub mod thumbnails;
pub mod transfer;
pub mod trash;
pub mod upload_links;
