//! Account and service information, and the change feed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_text},
    metadata::Metadata,
    request::{Params, ToParams},
    response::{ApiResponse, Empty},
    timestamp::Timestamp,
    transport::Transport,
};

/// Payload of `getdigest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DigestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
}

/// Payload of `userinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserInfoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub emailverified: bool,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub registered: Option<Timestamp>,
    #[serde(default)]
    pub premium: bool,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub premiumexpires: Option<Timestamp>,
    /// Total storage, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usedquota: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Payload of `supportedlanguages`, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguagesResponse {
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

/// Payload of `currentserver`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurrentServerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipbin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Kind of change recorded in the diff feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffEvent {
    Reset,
    CreateFolder,
    DeleteFolder,
    ModifyFolder,
    CreateFile,
    ModifyFile,
    DeleteFile,
    RequestShareIn,
    AcceptedShareIn,
    DeclinedShareIn,
    DeclinedShareOut,
    CancelledShareIn,
    RemovedShareIn,
    ModifiedShareIn,
    ModifyUserInfo,
    /// An event this client does not know about.
    #[serde(other)]
    Unknown,
}

/// One change in the diff feed or a file's history.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiffEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffid: Option<u64>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<Timestamp>,
    pub event: DiffEvent,
    /// Set for file and folder events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Set for `modifyuserinfo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo: Option<UserInfoResponse>,
}

/// Payload of `diff`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DiffResponse {
    /// Id of the newest event returned; pass it as the next request's
    /// `diffid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffid: Option<u64>,
    #[serde(default)]
    pub entries: Vec<DiffEntry>,
}

/// Payload of `getfilehistory`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileHistoryResponse {
    #[serde(default)]
    pub entries: Vec<DiffEntry>,
}

/// Payload of `getip`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetIpResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Payload of `getapiserver`: hosts closest to the caller, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiServerResponse {
    #[serde(default)]
    pub api: Vec<String>,
    #[serde(default)]
    pub binapi: Vec<String>,
}

/// Sends feedback to pCloud support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    mail: String,
    reason: String,
    message: String,
    name: Option<String>,
}

impl FeedbackRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if any argument is blank.
    pub fn new(
        mail: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (mail, reason, message) = (mail.into(), reason.into(), message.into());
        require_text("mail", &mail)?;
        require_text("reason", &reason)?;
        require_text("message", &message)?;
        Ok(Self {
            mail,
            reason,
            message,
            name: None,
        })
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl ToParams for FeedbackRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("mail", self.mail.as_str())
            .push("reason", self.reason.as_str())
            .push("message", self.message.as_str())
            .push_opt("name", self.name.as_deref());
        params
    }
}

/// Reads the change feed.
///
/// Without arguments the feed starts from the beginning of the account's
/// history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffRequest {
    diffid: Option<u64>,
    after: Option<Timestamp>,
    last: Option<u64>,
    block: bool,
    limit: Option<u64>,
}

impl DiffRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns events newer than `diffid`.
    #[must_use]
    pub fn diff_id(mut self, diffid: u64) -> Self {
        self.diffid = Some(diffid);
        self
    }

    /// Returns events newer than `at`.
    #[must_use]
    pub fn after(mut self, at: Timestamp) -> Self {
        self.after = Some(at);
        self
    }

    /// Returns the last `count` events.
    #[must_use]
    pub fn last(mut self, count: u64) -> Self {
        self.last = Some(count);
        self
    }

    /// Waits for a new event when none is available yet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Conflict`] unless [`Self::diff_id`] was set
    /// first.
    pub fn block(mut self, value: bool) -> Result<Self, ValidationError> {
        if value && self.diffid.is_none() {
            return Err(ValidationError::Conflict {
                field: "block",
                other: "diffid",
            });
        }
        self.block = value;
        Ok(self)
    }

    #[must_use]
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }
}

impl ToParams for DiffRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt_u64("diffid", self.diffid)
            .push_timestamp("after", self.after)
            .push_opt_u64("last", self.last)
            .push_flag("block", self.block)
            .push_opt_u64("limit", self.limit);
        params
    }
}

/// Account and service endpoints.
#[derive(Debug, Clone, Copy)]
pub struct GeneralClient<'a> {
    transport: &'a Transport,
}

impl<'a> GeneralClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Returns a one-time digest for digest-based authentication.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn digest(&self) -> Result<ApiResponse<DigestResponse>> {
        self.transport.call(&endpoint::GETDIGEST, &Params::new()).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn user_info(&self) -> Result<ApiResponse<UserInfoResponse>> {
        self.transport.call(&endpoint::USERINFO, &Params::new()).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn supported_languages(&self) -> Result<ApiResponse<LanguagesResponse>> {
        self.transport
            .call(&endpoint::SUPPORTEDLANGUAGES, &Params::new())
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `language` is blank, or a
    /// transport, status or parse error.
    pub async fn set_language(&self, language: &str) -> Result<ApiResponse<Empty>> {
        require_text("language", language)?;
        let mut params = Params::new();
        params.push("language", language);
        self.transport.call(&endpoint::SETLANGUAGE, &params).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn feedback(&self, request: &FeedbackRequest) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::FEEDBACK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn current_server(&self) -> Result<ApiResponse<CurrentServerResponse>> {
        self.transport
            .call(&endpoint::CURRENTSERVER, &Params::new())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn diff(&self, request: &DiffRequest) -> Result<ApiResponse<DiffResponse>> {
        self.transport
            .call(&endpoint::DIFF, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn file_history(&self, fileid: u64) -> Result<ApiResponse<FileHistoryResponse>> {
        let mut params = Params::new();
        params.push_u64("fileid", fileid);
        self.transport.call(&endpoint::GETFILEHISTORY, &params).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn get_ip(&self) -> Result<ApiResponse<GetIpResponse>> {
        self.transport.call(&endpoint::GETIP, &Params::new()).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn api_server(&self) -> Result<ApiResponse<ApiServerResponse>> {
        self.transport
            .call(&endpoint::GETAPISERVER, &Params::new())
            .await
    }
}
