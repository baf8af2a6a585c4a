//! Folder sharing between pCloud users.

use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_text},
    request::{Params, Permissions, ToParams},
    response::{ApiResponse, Empty},
    timestamp::Timestamp,
    transport::Transport,
};

/// An established share or a pending share request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Share {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shareid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharerequestid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tomail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frommail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub canread: bool,
    #[serde(default)]
    pub cancreate: bool,
    #[serde(default)]
    pub canmodify: bool,
    #[serde(default)]
    pub candelete: bool,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<Timestamp>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
}

/// Shares split by direction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShareDirections {
    #[serde(default)]
    pub incoming: Vec<Share>,
    #[serde(default)]
    pub outgoing: Vec<Share>,
}

/// Payload of `listshares`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ListSharesResponse {
    #[serde(default)]
    pub shares: ShareDirections,
    #[serde(default)]
    pub requests: ShareDirections,
}

/// Payload of `sharerequestinfo`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShareRequestInfoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<Share>,
}

/// Offers a folder to another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFolderRequest {
    folderid: u64,
    mail: String,
    permissions: Permissions,
    name: Option<String>,
    message: Option<String>,
}

impl ShareFolderRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `mail` is blank.
    pub fn new(
        folderid: u64,
        mail: impl Into<String>,
        permissions: Permissions,
    ) -> Result<Self, ValidationError> {
        let mail = mail.into();
        require_text("mail", &mail)?;
        Ok(Self {
            folderid,
            mail,
            permissions,
            name: None,
            message: None,
        })
    }

    /// Name the share appears under for the recipient.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ToParams for ShareFolderRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push("mail", self.mail.as_str())
            .push_num("permissions", self.permissions.bits())
            .push_opt("name", self.name.as_deref())
            .push_opt("message", self.message.as_deref());
        params
    }
}

/// Filters for `listshares`. Everything is listed by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSharesRequest {
    norequests: bool,
    noshares: bool,
    noincoming: bool,
    nooutgoing: bool,
}

impl ListSharesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn no_requests(mut self, value: bool) -> Self {
        self.norequests = value;
        self
    }

    #[must_use]
    pub fn no_shares(mut self, value: bool) -> Self {
        self.noshares = value;
        self
    }

    #[must_use]
    pub fn no_incoming(mut self, value: bool) -> Self {
        self.noincoming = value;
        self
    }

    #[must_use]
    pub fn no_outgoing(mut self, value: bool) -> Self {
        self.nooutgoing = value;
        self
    }
}

impl ToParams for ListSharesRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_flag("norequests", self.norequests)
            .push_flag("noshares", self.noshares)
            .push_flag("noincoming", self.noincoming)
            .push_flag("nooutgoing", self.nooutgoing);
        params
    }
}

/// Accepts an incoming share request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptShareRequest {
    sharerequestid: u64,
    name: Option<String>,
    folderid: Option<u64>,
    always: bool,
}

impl AcceptShareRequest {
    pub fn new(sharerequestid: u64) -> Self {
        Self {
            sharerequestid,
            name: None,
            folderid: None,
            always: false,
        }
    }

    /// Local name of the accepted folder.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Where to mount the accepted folder.
    #[must_use]
    pub fn folder_id(mut self, folderid: u64) -> Self {
        self.folderid = Some(folderid);
        self
    }

    /// Accept future requests from the same user automatically.
    #[must_use]
    pub fn always(mut self, value: bool) -> Self {
        self.always = value;
        self
    }
}

impl ToParams for AcceptShareRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("sharerequestid", self.sharerequestid)
            .push_opt("name", self.name.as_deref())
            .push_opt_u64("folderid", self.folderid)
            .push_flag("always", self.always);
        params
    }
}

/// Sharing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SharingClient<'a> {
    transport: &'a Transport,
}

impl<'a> SharingClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn share_folder(&self, request: &ShareFolderRequest) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::SHAREFOLDER, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(&self, request: &ListSharesRequest) -> Result<ApiResponse<ListSharesResponse>> {
        self.transport
            .call(&endpoint::LISTSHARES, &request.to_params())
            .await
    }

    /// Looks up a share request by the code mailed to the recipient.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `code` is blank, or a
    /// transport, status or parse error.
    pub async fn request_info(&self, code: &str) -> Result<ApiResponse<ShareRequestInfoResponse>> {
        require_text("code", code)?;
        let mut params = Params::new();
        params.push("code", code);
        self.transport
            .call(&endpoint::SHAREREQUESTINFO, &params)
            .await
    }

    /// Withdraws a share request the user sent.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn cancel_request(&self, sharerequestid: u64) -> Result<ApiResponse<Empty>> {
        let mut params = Params::new();
        params.push_u64("sharerequestid", sharerequestid);
        self.transport
            .call(&endpoint::CANCELSHAREREQUEST, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn accept(&self, request: &AcceptShareRequest) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::ACCEPTSHARE, &request.to_params())
            .await
    }

    /// Declines a share request. With `block`, future requests from the same
    /// user are declined automatically.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn decline(&self, sharerequestid: u64, block: bool) -> Result<ApiResponse<Empty>> {
        let mut params = Params::new();
        params
            .push_u64("sharerequestid", sharerequestid)
            .push_flag("block", block);
        self.transport.call(&endpoint::DECLINESHARE, &params).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn remove(&self, shareid: u64) -> Result<ApiResponse<Empty>> {
        let mut params = Params::new();
        params.push_u64("shareid", shareid);
        self.transport.call(&endpoint::REMOVESHARE, &params).await
    }

    /// Replaces the permissions of an established share.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn change(&self, shareid: u64, permissions: Permissions) -> Result<ApiResponse<Empty>> {
        let mut params = Params::new();
        params
            .push_u64("shareid", shareid)
            .push_num("permissions", permissions.bits());
        self.transport.call(&endpoint::CHANGESHARE, &params).await
    }
}
