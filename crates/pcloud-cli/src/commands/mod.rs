//! CLI command implementations.

use anyhow::{Context, Result, bail};
use pcloud::{ApiResponse, PCloudClient};

use crate::config::Config;

pub mod link;
pub mod login;
pub mod ls;
pub mod mkdir;
pub mod share;
pub mod upload;
pub mod whoami;

/// Builds an authenticated client from the stored configuration.
pub(crate) fn client_from(config: &Config) -> Result<PCloudClient> {
    let Some(token) = config.access_token.as_deref().filter(|t| !t.trim().is_empty()) else {
        bail!("not logged in; run `pcloud login` or set PCLOUD_ACCESS_TOKEN");
    };

    build_client(config, token)
}

/// Builds a client for `token` against the configured API host. An empty
/// token is fine for the unauthenticated endpoints.
pub(crate) fn build_client(config: &Config, token: &str) -> Result<PCloudClient> {
    let mut builder = PCloudClient::builder(token);
    if let Some(base_url) = config.api_base_url.as_deref() {
        builder = builder.with_base_url(with_trailing_slash(base_url));
    }
    builder.build().context("failed to create pCloud client")
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    }
}

/// Loads the configuration and builds a client from it.
pub(crate) fn load_client() -> Result<PCloudClient> {
    let config = Config::load().context("failed to load configuration")?;
    client_from(&config)
}

/// Unwraps a response, turning an application error into a CLI failure that
/// names the code and its documented meaning.
pub(crate) fn into_data<T>(response: ApiResponse<T>, action: &str) -> Result<T> {
    if let Some(error) = response.api_error() {
        let known = error.known_message().unwrap_or("unknown error");
        let detail = error
            .message
            .as_deref()
            .filter(|message| *message != known)
            .map(|message| format!(" ({message})"))
            .unwrap_or_default();
        bail!("{action} failed: error {}: {known}{detail}", error.code);
    }
    Ok(response.data)
}

#[cfg(test)]
mod tests {
    use pcloud::Empty;

    use super::*;

    #[test]
    fn test_client_from_requires_token() {
        let err = client_from(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("not logged in"));
    }

    #[test]
    fn test_client_from_uses_configured_base_url() {
        let config = Config {
            access_token: Some("tok".to_owned()),
            api_base_url: Some("https://eapi.pcloud.com".to_owned()),
            ..Config::default()
        };
        let client = client_from(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://eapi.pcloud.com/");
    }

    #[test]
    fn test_into_data_reports_code_and_known_message() {
        let response = ApiResponse {
            result: 2000,
            error: None,
            data: Empty {},
        };
        let err = into_data(response, "listing").unwrap_err();
        let expected = format!(
            "listing failed: error 2000: {}",
            pcloud::known_message(2000).unwrap()
        );
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_into_data_passes_success_through() {
        let response = ApiResponse {
            result: 0,
            error: None,
            data: 7_u32,
        };
        assert_eq!(into_data(response, "anything").unwrap(), 7);
    }
}
