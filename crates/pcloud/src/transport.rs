//! The single place where HTTP requests are built and sent.

use std::fmt;

use bytes::Bytes;
use reqwest::{
    RequestBuilder, Response, Url,
    header::{self, HeaderMap},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    endpoint::{Auth, Endpoint, Verb},
    error::{Error, Result},
    request::Params,
    response::ApiResponse,
};

/// A file to send as the `file` part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Upload {
    pub(crate) filename: String,
    pub(crate) content: Bytes,
}

impl Upload {
    pub(crate) fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Immutable per-client state shared by every endpoint client.
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    no_redirect: reqwest::Client,
    base_url: Url,
    oauth_url: Url,
    token: String,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("oauth_url", &self.oauth_url.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        no_redirect: reqwest::Client,
        base_url: Url,
        oauth_url: Url,
        token: String,
    ) -> Self {
        Self {
            http,
            no_redirect,
            base_url,
            oauth_url,
            token,
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn oauth_url(&self) -> &Url {
        &self.oauth_url
    }

    /// Resolves `path` against `base`.
    pub(crate) fn join(base: &Url, path: &str) -> Result<Url> {
        base.join(path).map_err(|e| Error::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
    }

    fn request(&self, endpoint: &Endpoint, params: &Params) -> Result<RequestBuilder> {
        let url = Self::join(&self.base_url, endpoint.path)?;
        debug!(
            endpoint = endpoint.path,
            verb = ?endpoint.verb,
            auth = endpoint.requires_auth(),
            params = params.len(),
            "sending pCloud request"
        );

        let builder = match endpoint.verb {
            Verb::Get => self.http.get(url).query(params.pairs()),
            Verb::Post => self.http.post(url).form(params.pairs()),
        };
        Ok(self.authorize(builder, endpoint))
    }

    fn authorize(&self, builder: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        let builder = builder.header(header::ACCEPT, "application/json");
        match endpoint.auth {
            Auth::Bearer => builder.bearer_auth(&self.token),
            Auth::Public => builder,
        }
    }

    /// Performs one JSON round trip.
    ///
    /// A non-zero `result` is returned as data, not as an error.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &Params,
    ) -> Result<ApiResponse<T>> {
        let response = self.request(endpoint, params)?.send().await?;
        Self::decode(endpoint, response).await
    }

    /// Performs one multipart upload: every parameter becomes a text part,
    /// followed by the `file` part.
    pub(crate) async fn call_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &Params,
        upload: Upload,
    ) -> Result<ApiResponse<T>> {
        let url = Self::join(&self.base_url, endpoint.path)?;
        debug!(
            endpoint = endpoint.path,
            filename = %upload.filename,
            size = upload.content.len(),
            "sending pCloud upload"
        );

        let form = params
            .pairs()
            .iter()
            .fold(Form::new(), |form, (key, value)| form.text(*key, value.clone()))
            .part(
                "file",
                Part::bytes(Vec::from(upload.content)).file_name(upload.filename),
            );

        let builder = self.authorize(self.http.post(url).multipart(form), endpoint);
        let response = builder.send().await?;
        Self::decode(endpoint, response).await
    }

    /// Performs a request whose body is returned raw.
    pub(crate) async fn download(&self, endpoint: &Endpoint, params: &Params) -> Result<Download> {
        let response = self.request(endpoint, params)?.send().await?;
        let response = Self::check_status(endpoint, response).await?;
        Ok(Download { response })
    }

    /// Sends a GET to the OAuth host without following redirects and returns
    /// the `Location` header, if any.
    pub(crate) async fn redirect_location(
        &self,
        endpoint: &Endpoint,
        params: &Params,
    ) -> Result<Option<Url>> {
        let url = Self::join(&self.oauth_url, endpoint.path)?;
        debug!(endpoint = endpoint.path, "requesting OAuth redirect");

        let response = self
            .no_redirect
            .get(url.clone())
            .query(params.pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            let response = Self::check_status(endpoint, response).await?;
            debug!(status = %response.status(), "OAuth request did not redirect");
            return Ok(None);
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| url.join(value).ok());
        Ok(location)
    }

    async fn check_status(endpoint: &Endpoint, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(endpoint = endpoint.path, %status, "pCloud request failed");
        Err(Error::Status {
            endpoint: endpoint.path,
            status,
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &Endpoint,
        response: Response,
    ) -> Result<ApiResponse<T>> {
        let response = Self::check_status(endpoint, response).await?;
        let body = response.bytes().await?;
        let parsed: ApiResponse<T> =
            serde_json::from_slice(&body).map_err(|source| Error::Parse {
                endpoint: endpoint.path,
                source,
            })?;
        debug!(
            endpoint = endpoint.path,
            result = parsed.result,
            "received pCloud response"
        );
        Ok(parsed)
    }
}

/// A raw response body from a binary endpoint (file, zip, thumbnail, text).
#[derive(Debug)]
pub struct Download {
    response: Response,
}

impl Download {
    /// The `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// The body length, when the server announced it.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Reads the next chunk of the body, or `None` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if reading from the connection fails.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.response.chunk().await?)
    }

    /// Buffers the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if reading from the connection fails.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }

    /// Buffers the whole body as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if reading from the connection fails.
    pub async fn text(self) -> Result<String> {
        Ok(self.response.text().await?)
    }

    /// Hands back the underlying response.
    pub fn into_inner(self) -> Response {
        self.response
    }
}
