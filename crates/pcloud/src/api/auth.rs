//! OAuth2 authorization.
//!
//! The authorize step happens on the OAuth host and ends in a redirect that
//! carries an authorization code; [`AuthClient::token`] exchanges that code
//! for an access token. None of these calls send the client's bearer token.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    endpoint,
    error::{Error, Result, ValidationError, require_text},
    request::{Params, ToParams},
    response::ApiResponse,
    transport::Transport,
};

/// What the authorize redirect hands back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// An authorization code, exchanged later with [`AuthClient::token`].
    #[default]
    Code,
    /// An access token in the redirect fragment. Requires a redirect URI.
    Token,
}

impl ResponseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

/// Payload of `oauth2_token`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locationid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("uid", &self.uid)
            .field("locationid", &self.locationid)
            .field("hostname", &self.hostname)
            .finish()
    }
}

/// Parameters of the OAuth authorize page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRequest {
    client_id: String,
    response_type: ResponseType,
    redirect_uri: Option<String>,
    state: Option<String>,
    force_reapprove: bool,
}

impl AuthorizeRequest {
    /// Starts a request for an authorization code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `client_id` is blank.
    pub fn new(client_id: impl Into<String>) -> Result<Self, ValidationError> {
        let client_id = client_id.into();
        require_text("client_id", &client_id)?;
        Ok(Self {
            client_id,
            response_type: ResponseType::Code,
            redirect_uri: None,
            state: None,
            force_reapprove: false,
        })
    }

    /// Starts a request for an access token delivered to `redirect_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `client_id` or `redirect_uri`
    /// is blank.
    pub fn token(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let redirect_uri = redirect_uri.into();
        require_text("redirect_uri", &redirect_uri)?;
        let mut request = Self::new(client_id)?;
        request.response_type = ResponseType::Token;
        request.redirect_uri = Some(redirect_uri);
        Ok(request)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `uri` is blank.
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Result<Self, ValidationError> {
        let uri = uri.into();
        require_text("redirect_uri", &uri)?;
        self.redirect_uri = Some(uri);
        Ok(self)
    }

    /// Opaque value echoed back in the redirect.
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Asks the user to approve again even if they already did.
    #[must_use]
    pub fn force_reapprove(mut self, value: bool) -> Self {
        self.force_reapprove = value;
        self
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.response_type == ResponseType::Token && self.redirect_uri.is_none() {
            return Err(ValidationError::Conflict {
                field: "response_type",
                other: "redirect_uri",
            });
        }
        Ok(())
    }
}

impl ToParams for AuthorizeRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("client_id", self.client_id.as_str())
            .push("response_type", self.response_type.as_str())
            .push_opt("redirect_uri", self.redirect_uri.as_deref())
            .push_opt("state", self.state.as_deref())
            .push_flag("force_reapprove", self.force_reapprove);
        params
    }
}

/// Authorization endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthClient<'a> {
    transport: &'a Transport,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Builds the URL of the authorize page to send a user to. Performs no
    /// I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if the OAuth URL cannot be joined.
    pub fn authorize_url(&self, request: &AuthorizeRequest) -> Result<Url> {
        request.validate()?;
        let mut url = Transport::join(self.transport.oauth_url(), endpoint::OAUTH2_AUTHORIZE.path)?;
        url.query_pairs_mut()
            .extend_pairs(request.to_params().pairs().iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if an argument is blank, or a transport,
    /// status or parse error.
    pub async fn token(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<ApiResponse<TokenResponse>> {
        require_text("client_id", client_id)?;
        require_text("client_secret", client_secret)?;
        require_text("code", code)?;
        let mut params = Params::new();
        params
            .push("client_id", client_id)
            .push("client_secret", client_secret)
            .push("code", code);
        self.transport.call(&endpoint::OAUTH2_TOKEN, &params).await
    }

    /// Runs the authorize step and exchanges the returned code in one go.
    ///
    /// This only works when the OAuth host redirects straight away, i.e. the
    /// app was approved before. Interactive approval needs a browser: send
    /// the user to [`Self::authorize_url`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAuthorizationCode`] if the redirect carries no
    /// code, [`Error::Validation`] for a token-type request or a bad
    /// argument, or a transport, status or parse error.
    pub async fn authorize(
        &self,
        request: &AuthorizeRequest,
        client_secret: &str,
    ) -> Result<ApiResponse<TokenResponse>> {
        request.validate()?;
        if request.response_type == ResponseType::Token {
            return Err(ValidationError::Invalid {
                field: "response_type",
                reason: "only the code flow can be exchanged",
            }
            .into());
        }
        require_text("client_secret", client_secret)?;

        let location = self
            .transport
            .redirect_location(&endpoint::OAUTH2_AUTHORIZE, &request.to_params())
            .await?;
        let code = location
            .as_ref()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "code")
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|code| !code.is_empty())
            .ok_or(Error::MissingAuthorizationCode)?;
        debug!("received authorization code");

        self.token(&request.client_id, client_secret, &code).await
    }
}
