//! Thumbnails of images and videos.

use serde::{Deserialize, Serialize};

use crate::{
    api::streaming::{Source, download_url},
    endpoint,
    error::{Result, ValidationError, require_items, require_text},
    metadata::Metadata,
    request::{Params, ThumbSize, ToParams},
    response::ApiResponse,
    timestamp::Timestamp,
    transport::{Download, Transport},
};

/// Image format of a generated thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbFormat {
    Png,
    Jpeg,
}

impl ThumbFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Payload of `getthumblink` and `getpubthumblink`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThumbLinkResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
    /// The size actually produced, which may differ from the requested one
    /// to keep the aspect ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ThumbLinkResponse {
    pub fn url(&self) -> Option<String> {
        download_url(&self.hosts, self.path.as_deref())
    }
}

/// One entry of a multi-thumbnail response. Each entry carries its own
/// `result` code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThumbLink {
    #[serde(default)]
    pub result: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(flatten)]
    pub link: ThumbLinkResponse,
}

/// Payload of `getthumbslinks` and `getpubthumbslinks`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThumbLinksResponse {
    #[serde(default)]
    pub thumbs: Vec<ThumbLink>,
}

/// Payload of `savethumb` and `savepubthumb`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SaveThumbResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThumbOptions {
    size: ThumbSize,
    crop: bool,
    format: Option<ThumbFormat>,
}

impl ThumbOptions {
    fn new(size: ThumbSize) -> Self {
        Self {
            size,
            crop: false,
            format: None,
        }
    }

    fn push_to(&self, params: &mut Params) {
        params
            .push("size", self.size.to_string())
            .push_flag("crop", self.crop)
            .push_opt("type", self.format.map(ThumbFormat::as_str));
    }
}

/// One thumbnail of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbRequest {
    source: Source,
    options: ThumbOptions,
}

impl ThumbRequest {
    pub fn new(fileid: u64, size: ThumbSize) -> Self {
        Self {
            source: Source::File(fileid),
            options: ThumbOptions::new(size),
        }
    }

    /// A thumbnail of a file behind a public link.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn public(
        code: impl Into<String>,
        fileid: u64,
        size: ThumbSize,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            source: Source::link(code, Some(fileid))?,
            options: ThumbOptions::new(size),
        })
    }

    /// Crops to exactly the requested size instead of fitting inside it.
    #[must_use]
    pub fn crop(mut self, value: bool) -> Self {
        self.options.crop = value;
        self
    }

    #[must_use]
    pub fn format(mut self, format: ThumbFormat) -> Self {
        self.options.format = Some(format);
        self
    }
}

impl ToParams for ThumbRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.source.push_to(&mut params);
        self.options.push_to(&mut params);
        params
    }
}

/// Thumbnails of several files at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbsRequest {
    code: Option<String>,
    fileids: Vec<u64>,
    options: ThumbOptions,
}

impl ThumbsRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `fileids` is empty.
    pub fn new(fileids: Vec<u64>, size: ThumbSize) -> Result<Self, ValidationError> {
        require_items("fileids", &fileids)?;
        Ok(Self {
            code: None,
            fileids,
            options: ThumbOptions::new(size),
        })
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank or `fileids` is
    /// empty.
    pub fn public(
        code: impl Into<String>,
        fileids: Vec<u64>,
        size: ThumbSize,
    ) -> Result<Self, ValidationError> {
        let code = code.into();
        require_text("code", &code)?;
        Ok(Self {
            code: Some(code),
            ..Self::new(fileids, size)?
        })
    }

    #[must_use]
    pub fn crop(mut self, value: bool) -> Self {
        self.options.crop = value;
        self
    }

    #[must_use]
    pub fn format(mut self, format: ThumbFormat) -> Self {
        self.options.format = Some(format);
        self
    }
}

impl ToParams for ThumbsRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("code", self.code.as_deref())
            .push_ids("fileids", &self.fileids);
        self.options.push_to(&mut params);
        params
    }
}

/// Generates a thumbnail and stores it as a new file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveThumbRequest {
    source: Source,
    options: ThumbOptions,
    tofolderid: u64,
    toname: String,
    noover: bool,
}

impl SaveThumbRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `toname` is blank.
    pub fn new(
        fileid: u64,
        size: ThumbSize,
        tofolderid: u64,
        toname: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_source(Source::File(fileid), size, tofolderid, toname.into())
    }

    /// Saves a thumbnail of a file behind a public link.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` or `toname` is blank.
    pub fn public(
        code: impl Into<String>,
        fileid: u64,
        size: ThumbSize,
        tofolderid: u64,
        toname: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_source(
            Source::link(code, Some(fileid))?,
            size,
            tofolderid,
            toname.into(),
        )
    }

    fn with_source(
        source: Source,
        size: ThumbSize,
        tofolderid: u64,
        toname: String,
    ) -> Result<Self, ValidationError> {
        require_text("toname", &toname)?;
        Ok(Self {
            source,
            options: ThumbOptions::new(size),
            tofolderid,
            toname,
            noover: false,
        })
    }

    #[must_use]
    pub fn crop(mut self, value: bool) -> Self {
        self.options.crop = value;
        self
    }

    #[must_use]
    pub fn format(mut self, format: ThumbFormat) -> Self {
        self.options.format = Some(format);
        self
    }

    /// Fails with 2004 instead of overwriting an existing file.
    #[must_use]
    pub fn no_overwrite(mut self, value: bool) -> Self {
        self.noover = value;
        self
    }
}

impl ToParams for SaveThumbRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.source.push_to(&mut params);
        self.options.push_to(&mut params);
        params
            .push_u64("tofolderid", self.tofolderid)
            .push("toname", self.toname.as_str())
            .push_flag("noover", self.noover);
        params
    }
}

/// Thumbnail endpoints for the user's own files.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailsClient<'a> {
    transport: &'a Transport,
}

impl<'a> ThumbnailsClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn link(&self, request: &ThumbRequest) -> Result<ApiResponse<ThumbLinkResponse>> {
        self.transport
            .call(&endpoint::GETTHUMBLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn links(&self, request: &ThumbsRequest) -> Result<ApiResponse<ThumbLinksResponse>> {
        self.transport
            .call(&endpoint::GETTHUMBSLINKS, &request.to_params())
            .await
    }

    /// Downloads the thumbnail image itself.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn get(&self, request: &ThumbRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETTHUMB, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn save(&self, request: &SaveThumbRequest) -> Result<ApiResponse<SaveThumbResponse>> {
        self.transport
            .call(&endpoint::SAVETHUMB, &request.to_params())
            .await
    }
}
