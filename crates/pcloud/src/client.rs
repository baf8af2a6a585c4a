//! The top-level client and its builder.

use std::fmt;

use reqwest::{Url, redirect::Policy};

use crate::{
    api::{
        archiving::ArchivingClient, auth::AuthClient, collection::CollectionClient,
        file::FileClient, folder::FolderClient, general::GeneralClient, link::LinkClient,
        revisions::RevisionsClient, sharing::SharingClient, streaming::StreamingClient,
        thumbnails::ThumbnailsClient, transfer::TransferClient, trash::TrashClient,
        upload_links::UploadLinksClient,
    },
    error::{Error, Result},
    transport::Transport,
};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://eapi.pcloud.com/";

/// Default host for the browser-facing OAuth flow.
pub const DEFAULT_OAUTH_URL: &str = "https://my.pcloud.com/oauth2/";

/// Entry point to every endpoint area.
///
/// Holds only the bearer token, the base URLs and a shared HTTP connection
/// pool, none of which change after construction. Cloning is cheap and
/// clones share the pool.
///
/// ```no_run
/// # async fn example() -> pcloud::Result<()> {
/// let client = pcloud::PCloudClient::new("access-token")?;
/// let listing = client
///     .folders()
///     .list(&pcloud::api::folder::ListFolderRequest::new(0).recursive(true))
///     .await?;
/// if let Some(root) = listing.data.metadata {
///     println!("{}", root.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PCloudClient {
    transport: Transport,
}

impl fmt::Debug for PCloudClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PCloudClient")
            .field("transport", &self.transport)
            .finish()
    }
}

impl PCloudClient {
    /// Creates a client for the default API host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be initialised.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(token).build()
    }

    /// Starts a [`ClientBuilder`].
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// The API base URL all endpoint paths are resolved against.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn folders(&self) -> FolderClient<'_> {
        FolderClient::new(&self.transport)
    }

    pub fn files(&self) -> FileClient<'_> {
        FileClient::new(&self.transport)
    }

    pub fn links(&self) -> LinkClient<'_> {
        LinkClient::new(&self.transport)
    }

    pub fn streaming(&self) -> StreamingClient<'_> {
        StreamingClient::new(&self.transport)
    }

    pub fn thumbnails(&self) -> ThumbnailsClient<'_> {
        ThumbnailsClient::new(&self.transport)
    }

    pub fn sharing(&self) -> SharingClient<'_> {
        SharingClient::new(&self.transport)
    }

    pub fn trash(&self) -> TrashClient<'_> {
        TrashClient::new(&self.transport)
    }

    pub fn archiving(&self) -> ArchivingClient<'_> {
        ArchivingClient::new(&self.transport)
    }

    pub fn collections(&self) -> CollectionClient<'_> {
        CollectionClient::new(&self.transport)
    }

    pub fn upload_links(&self) -> UploadLinksClient<'_> {
        UploadLinksClient::new(&self.transport)
    }

    pub fn revisions(&self) -> RevisionsClient<'_> {
        RevisionsClient::new(&self.transport)
    }

    pub fn transfers(&self) -> TransferClient<'_> {
        TransferClient::new(&self.transport)
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.transport)
    }

    pub fn general(&self) -> GeneralClient<'_> {
        GeneralClient::new(&self.transport)
    }
}

/// Configures a [`PCloudClient`].
///
/// # Default Configuration
///
/// - API base URL: [`DEFAULT_BASE_URL`]
/// - OAuth base URL: [`DEFAULT_OAUTH_URL`]
/// - HTTP client: a fresh `reqwest::Client`
#[derive(Clone)]
pub struct ClientBuilder {
    token: String,
    base_url: String,
    oauth_url: String,
    http: Option<reqwest::Client>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("oauth_url", &self.oauth_url)
            .field("custom_http", &self.http.is_some())
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Creates a builder with the default hosts.
    ///
    /// An empty token is accepted; only public endpoints will then succeed.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            http: None,
        }
    }

    /// Sets the API base URL. It must end in `/`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the OAuth base URL. It must end in `/`.
    #[must_use]
    pub fn with_oauth_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_url = url.into();
        self
    }

    /// Uses an existing `reqwest::Client`, e.g. to share a connection pool or
    /// set timeouts.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBaseUrl`] if either base URL does not parse or does
    ///   not end in `/`
    /// - [`Error::Transport`] if an HTTP client cannot be initialised
    pub fn build(self) -> Result<PCloudClient> {
        let base_url = parse_base_url(&self.base_url)?;
        let oauth_url = parse_base_url(&self.oauth_url)?;
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };
        let no_redirect = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;

        Ok(PCloudClient {
            transport: Transport::new(http, no_redirect, base_url, oauth_url, self.token),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    if !raw.ends_with('/') {
        return Err(invalid("must end in '/'".to_string()));
    }
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("cannot be used as a base".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = PCloudClient::new("token").unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_without_trailing_slash_is_rejected() {
        let err = PCloudClient::builder("token")
            .with_base_url("https://eapi.pcloud.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_oauth_url_without_trailing_slash_is_rejected() {
        let err = PCloudClient::builder("token")
            .with_oauth_url("https://my.pcloud.com/oauth2")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_unparseable_base_url_is_rejected() {
        let err = PCloudClient::builder("token")
            .with_base_url("not a url/")
            .build()
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid base url 'not a url/'"));
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let client = PCloudClient::new("super-secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("eapi.pcloud.com"));
    }

    #[test]
    fn test_custom_base_url_with_path_prefix() {
        let client = PCloudClient::builder("token")
            .with_base_url("http://localhost:8080/api/")
            .build()
            .unwrap();
        let joined = Transport::join(client.base_url(), "listfolder").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/api/listfolder");
    }
}
