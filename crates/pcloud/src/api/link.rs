//! Public links: creating and managing them, and reading content through
//! them.
//!
//! Endpoints that read through a link authenticate with the link `code` and
//! are sent without the bearer token.

use serde::{Deserialize, Serialize};

use crate::{
    api::{
        file::FileResponse,
        streaming::{AudioLinkRequest, FileLinkRequest, StreamingResponse, TextFileRequest, VideoLinksResponse},
        thumbnails::{
            SaveThumbRequest, SaveThumbResponse, ThumbLinkResponse, ThumbLinksResponse, ThumbRequest,
            ThumbsRequest,
        },
    },
    endpoint,
    error::{Result, ValidationError, require_text},
    metadata::Metadata,
    request::{Params, ToParams, Tree, require_zip_name},
    response::{ApiResponse, Empty},
    timestamp::Timestamp,
    transport::{Download, Transport},
};

/// Payload of the link-creating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LinkResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortlink: Option<String>,
}

/// One public link owned by the user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PubLink {
    pub linkid: u64,
    pub code: String,
    pub link: String,
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
    pub modified: Option<Timestamp>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isfolder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdownloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxtraffic: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortlink: Option<String>,
}

/// Payload of `listpublinks` and `listplshort`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PubLinksResponse {
    #[serde(default)]
    pub publinks: Vec<PubLink>,
}

/// What a new public link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubLinkTarget {
    File(u64),
    Folder(u64),
    /// A virtual folder made of a [`Tree`], shown under `name`.
    Tree { name: String, tree: Tree },
}

impl PubLinkTarget {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `name` is blank or `tree`
    /// includes nothing.
    pub fn tree(name: impl Into<String>, tree: Tree) -> Result<Self, ValidationError> {
        let name = name.into();
        require_text("name", &name)?;
        tree.validate()?;
        Ok(Self::Tree { name, tree })
    }

    fn endpoint(&self) -> &'static endpoint::Endpoint {
        match self {
            Self::File(_) => &endpoint::GETFILEPUBLINK,
            Self::Folder(_) => &endpoint::GETFOLDERPUBLINK,
            Self::Tree { .. } => &endpoint::GETTREEPUBLINK,
        }
    }

    fn push_to(&self, params: &mut Params) {
        match self {
            Self::File(fileid) => {
                params.push_u64("fileid", *fileid);
            }
            Self::Folder(folderid) => {
                params.push_u64("folderid", *folderid);
            }
            Self::Tree { name, tree } => {
                params.push("name", name.as_str());
                tree.push_to(params);
            }
        }
    }
}

/// Creates a public link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubLinkRequest {
    target: PubLinkTarget,
    expire: Option<Timestamp>,
    maxdownloads: Option<u64>,
    maxtraffic: Option<u64>,
    linkpassword: Option<String>,
    shortlink: bool,
}

impl PubLinkRequest {
    pub fn new(target: PubLinkTarget) -> Self {
        Self {
            target,
            expire: None,
            maxdownloads: None,
            maxtraffic: None,
            linkpassword: None,
            shortlink: false,
        }
    }

    #[must_use]
    pub fn expire(mut self, at: Timestamp) -> Self {
        self.expire = Some(at);
        self
    }

    #[must_use]
    pub fn max_downloads(mut self, count: u64) -> Self {
        self.maxdownloads = Some(count);
        self
    }

    /// Caps the total traffic, in bytes.
    #[must_use]
    pub fn max_traffic(mut self, bytes: u64) -> Self {
        self.maxtraffic = Some(bytes);
        self
    }

    #[must_use]
    pub fn link_password(mut self, password: impl Into<String>) -> Self {
        self.linkpassword = Some(password.into());
        self
    }

    /// Also creates a short link.
    #[must_use]
    pub fn short_link(mut self, value: bool) -> Self {
        self.shortlink = value;
        self
    }
}

impl ToParams for PubLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.target.push_to(&mut params);
        params
            .push_timestamp("expire", self.expire)
            .push_opt_u64("maxdownloads", self.maxdownloads)
            .push_opt_u64("maxtraffic", self.maxtraffic)
            .push_opt("linkpassword", self.linkpassword.as_deref())
            .push_flag("shortlink", self.shortlink);
        params
    }
}

/// Changes limits on an existing public link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePubLinkRequest {
    linkid: u64,
    shortlink: bool,
    deleteshortlink: bool,
    expire: Option<Timestamp>,
    deleteexpire: bool,
    maxtraffic: Option<u64>,
    maxdownloads: Option<u64>,
    linkpassword: Option<String>,
}

impl ChangePubLinkRequest {
    pub fn new(linkid: u64) -> Self {
        Self {
            linkid,
            shortlink: false,
            deleteshortlink: false,
            expire: None,
            deleteexpire: false,
            maxtraffic: None,
            maxdownloads: None,
            linkpassword: None,
        }
    }

    #[must_use]
    pub fn short_link(mut self, value: bool) -> Self {
        self.shortlink = value;
        self
    }

    #[must_use]
    pub fn delete_short_link(mut self, value: bool) -> Self {
        self.deleteshortlink = value;
        self
    }

    #[must_use]
    pub fn expire(mut self, at: Timestamp) -> Self {
        self.expire = Some(at);
        self
    }

    /// Removes the expiration date.
    #[must_use]
    pub fn delete_expire(mut self, value: bool) -> Self {
        self.deleteexpire = value;
        self
    }

    #[must_use]
    pub fn max_traffic(mut self, bytes: u64) -> Self {
        self.maxtraffic = Some(bytes);
        self
    }

    #[must_use]
    pub fn max_downloads(mut self, count: u64) -> Self {
        self.maxdownloads = Some(count);
        self
    }

    #[must_use]
    pub fn link_password(mut self, password: impl Into<String>) -> Self {
        self.linkpassword = Some(password.into());
        self
    }
}

impl ToParams for ChangePubLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("linkid", self.linkid)
            .push_flag("shortlink", self.shortlink)
            .push_flag("deleteshortlink", self.deleteshortlink)
            .push_timestamp("expire", self.expire)
            .push_flag("deleteexpire", self.deleteexpire)
            .push_opt_u64("maxtraffic", self.maxtraffic)
            .push_opt_u64("maxdownloads", self.maxdownloads)
            .push_opt("linkpassword", self.linkpassword.as_deref());
        params
    }
}

/// Copies a file from a public link into the user's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPubFileRequest {
    code: String,
    fileid: u64,
    tofolderid: u64,
    toname: Option<String>,
    noover: bool,
}

impl CopyPubFileRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn new(code: impl Into<String>, fileid: u64, tofolderid: u64) -> Result<Self, ValidationError> {
        let code = code.into();
        require_text("code", &code)?;
        Ok(Self {
            code,
            fileid,
            tofolderid,
            toname: None,
            noover: false,
        })
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `name` is blank.
    pub fn to_name(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        require_text("toname", &name)?;
        self.toname = Some(name);
        Ok(self)
    }

    #[must_use]
    pub fn no_overwrite(mut self, value: bool) -> Self {
        self.noover = value;
        self
    }
}

impl ToParams for CopyPubFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("code", self.code.as_str())
            .push_u64("fileid", self.fileid)
            .push_u64("tofolderid", self.tofolderid)
            .push_opt("toname", self.toname.as_deref())
            .push_flag("noover", self.noover);
        params
    }
}

/// Downloads a public folder link as a zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubZipRequest {
    code: String,
    forcedownload: bool,
    filename: Option<String>,
    timeoffset: Option<String>,
    maxspeed: Option<u64>,
}

impl PubZipRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        require_text("code", &code)?;
        Ok(Self {
            code,
            forcedownload: false,
            filename: None,
            timeoffset: None,
            maxspeed: None,
        })
    }

    #[must_use]
    pub fn force_download(mut self, value: bool) -> Self {
        self.forcedownload = value;
        self
    }

    /// Name of the served archive.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] unless `filename` ends in `.zip`.
    pub fn filename(mut self, filename: impl Into<String>) -> Result<Self, ValidationError> {
        let filename = filename.into();
        require_zip_name(&filename)?;
        self.filename = Some(filename);
        Ok(self)
    }

    /// Offset applied to file times inside the archive, e.g. `+02:00`.
    #[must_use]
    pub fn time_offset(mut self, offset: impl Into<String>) -> Self {
        self.timeoffset = Some(offset.into());
        self
    }

    /// Caps the download speed, in bytes per second. Only used by
    /// [`LinkClient::pub_zip_link`].
    #[must_use]
    pub fn max_speed(mut self, bytes_per_second: u64) -> Self {
        self.maxspeed = Some(bytes_per_second);
        self
    }
}

impl ToParams for PubZipRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("code", self.code.as_str())
            .push_flag("forcedownload", self.forcedownload)
            .push_opt("filename", self.filename.as_deref())
            .push_opt("timeoffset", self.timeoffset.as_deref())
            .push_opt_u64("maxspeed", self.maxspeed);
        params
    }
}

/// Saves a public folder link as a zip file in the user's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePubZipRequest {
    code: String,
    timeoffset: Option<String>,
    destination: Option<(u64, String)>,
    progresshash: Option<String>,
}

impl SavePubZipRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        require_text("code", &code)?;
        Ok(Self {
            code,
            timeoffset: None,
            destination: None,
            progresshash: None,
        })
    }

    #[must_use]
    pub fn time_offset(mut self, offset: impl Into<String>) -> Self {
        self.timeoffset = Some(offset.into());
        self
    }

    /// Where to store the archive. Both parts are sent together.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `toname` is blank.
    pub fn destination(mut self, tofolderid: u64, toname: impl Into<String>) -> Result<Self, ValidationError> {
        let toname = toname.into();
        require_text("toname", &toname)?;
        self.destination = Some((tofolderid, toname));
        Ok(self)
    }

    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }
}

impl ToParams for SavePubZipRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("code", self.code.as_str())
            .push_opt("timeoffset", self.timeoffset.as_deref());
        if let Some((tofolderid, toname)) = &self.destination {
            params
                .push_u64("tofolderid", *tofolderid)
                .push("toname", toname.as_str());
        }
        params.push_opt("progresshash", self.progresshash.as_deref());
        params
    }
}

/// Creates a public link to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLinkRequest {
    collectionid: u64,
    expire: Option<Timestamp>,
    maxdownloads: Option<u64>,
    maxtraffic: Option<u64>,
    shortlink: bool,
}

impl CollectionLinkRequest {
    pub fn new(collectionid: u64) -> Self {
        Self {
            collectionid,
            expire: None,
            maxdownloads: None,
            maxtraffic: None,
            shortlink: false,
        }
    }

    #[must_use]
    pub fn expire(mut self, at: Timestamp) -> Self {
        self.expire = Some(at);
        self
    }

    #[must_use]
    pub fn max_downloads(mut self, count: u64) -> Self {
        self.maxdownloads = Some(count);
        self
    }

    #[must_use]
    pub fn max_traffic(mut self, bytes: u64) -> Self {
        self.maxtraffic = Some(bytes);
        self
    }

    #[must_use]
    pub fn short_link(mut self, value: bool) -> Self {
        self.shortlink = value;
        self
    }
}

impl ToParams for CollectionLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("collectionid", self.collectionid)
            .push_timestamp("expire", self.expire)
            .push_opt_u64("maxdownloads", self.maxdownloads)
            .push_opt_u64("maxtraffic", self.maxtraffic)
            .push_flag("shortlink", self.shortlink);
        params
    }
}

fn code_params(code: &str) -> Result<Params> {
    require_text("code", code)?;
    let mut params = Params::new();
    params.push("code", code);
    Ok(params)
}

/// Public link endpoints.
#[derive(Debug, Clone, Copy)]
pub struct LinkClient<'a> {
    transport: &'a Transport,
}

impl<'a> LinkClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Creates a public link to a file, folder or tree.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn create(&self, request: &PubLinkRequest) -> Result<ApiResponse<LinkResponse>> {
        self.transport
            .call(request.target.endpoint(), &request.to_params())
            .await
    }

    /// Returns a download link for a file behind a public link. Build the
    /// request with [`FileLinkRequest::public`].
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn download_link(
        &self,
        request: &FileLinkRequest,
    ) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETPUBLINKDOWNLOAD, &request.to_params())
            .await
    }

    /// Returns the metadata behind a public link.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `code` is blank, or a
    /// transport, status or parse error.
    pub async fn show(&self, code: &str) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::SHOWPUBLINK, &code_params(code)?)
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn copy_file(&self, request: &CopyPubFileRequest) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::COPYPUBFILE, &request.to_params())
            .await
    }

    /// Lists the user's public links.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(&self) -> Result<ApiResponse<PubLinksResponse>> {
        self.transport
            .call(&endpoint::LISTPUBLINKS, &Params::new())
            .await
    }

    /// Lists the user's short links.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list_short(&self) -> Result<ApiResponse<PubLinksResponse>> {
        self.transport
            .call(&endpoint::LISTPLSHORT, &Params::new())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn delete(&self, linkid: u64) -> Result<ApiResponse<Empty>> {
        let mut params = Params::new();
        params.push_u64("linkid", linkid);
        self.transport.call(&endpoint::DELETEPUBLINK, &params).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn change(&self, request: &ChangePubLinkRequest) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::CHANGEPUBLINK, &request.to_params())
            .await
    }

    /// Downloads a thumbnail through a public link. Build the request with
    /// [`ThumbRequest::public`].
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn pub_thumb(&self, request: &ThumbRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETPUBTHUMB, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn pub_thumb_link(
        &self,
        request: &ThumbRequest,
    ) -> Result<ApiResponse<ThumbLinkResponse>> {
        self.transport
            .call(&endpoint::GETPUBTHUMBLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn pub_thumbs_links(
        &self,
        request: &ThumbsRequest,
    ) -> Result<ApiResponse<ThumbLinksResponse>> {
        self.transport
            .call(&endpoint::GETPUBTHUMBSLINKS, &request.to_params())
            .await
    }

    /// Saves a thumbnail of a public file into the user's account. Build the
    /// request with [`SaveThumbRequest::public`].
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn save_pub_thumb(
        &self,
        request: &SaveThumbRequest,
    ) -> Result<ApiResponse<SaveThumbResponse>> {
        self.transport
            .call(&endpoint::SAVEPUBTHUMB, &request.to_params())
            .await
    }

    /// Downloads a public folder as a zip archive.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn pub_zip(&self, request: &PubZipRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETPUBZIP, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn pub_zip_link(&self, request: &PubZipRequest) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETPUBZIPLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn save_pub_zip(&self, request: &SavePubZipRequest) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::SAVEPUBZIP, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn pub_video_links(
        &self,
        request: &FileLinkRequest,
    ) -> Result<ApiResponse<VideoLinksResponse>> {
        self.transport
            .call(&endpoint::GETPUBVIDEOLINKS, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn pub_audio_link(
        &self,
        request: &AudioLinkRequest,
    ) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETPUBAUDIOLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn pub_text_file(&self, request: &TextFileRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETPUBTEXTFILE, &request.to_params())
            .await
    }

    /// Creates a public link to a collection.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn collection_link(
        &self,
        request: &CollectionLinkRequest,
    ) -> Result<ApiResponse<LinkResponse>> {
        self.transport
            .call(&endpoint::GETCOLLECTIONPUBLINK, &request.to_params())
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;
    use crate::{
        request::ThumbSize,
        testing::{client_for, form_keys, has_authorization, json_response, metadata_json, received},
        timestamp,
    };

    #[test]
    fn test_pub_link_request_renders_expiry_in_wire_layout() {
        let expire = timestamp::parse("Fri, 01 Mar 2024 00:00:00 +0000").unwrap();
        let params = PubLinkRequest::new(PubLinkTarget::File(3))
            .expire(expire)
            .short_link(true)
            .to_params();
        assert_eq!(params.get("expire"), Some("Fri, 01 Mar 2024 00:00:00 +0000"));
        assert_eq!(params.get("shortlink"), Some("1"));
        assert!(!params.contains("maxdownloads"));
    }

    #[test]
    fn test_tree_target_requires_content() {
        assert!(PubLinkTarget::tree("bundle", Tree::new()).is_err());
        let target = PubLinkTarget::tree("bundle", Tree::new().files([1, 2])).unwrap();
        let params = PubLinkRequest::new(target).to_params();
        assert_eq!(params.to_query_string(), "name=bundle&fileids=1%2C2");
    }

    #[test]
    fn test_save_pub_zip_sends_destination_together() {
        let params = SavePubZipRequest::new("abc")
            .unwrap()
            .destination(4, "site.zip")
            .unwrap()
            .to_params();
        assert_eq!(params.to_query_string(), "code=abc&tofolderid=4&toname=site.zip");
        assert!(SavePubZipRequest::new("abc").unwrap().destination(4, "").is_err());
    }

    #[test]
    fn test_pub_zip_filename_must_be_zip() {
        assert!(PubZipRequest::new("abc").unwrap().filename("site.tar").is_err());
        assert!(PubZipRequest::new("").is_err());
    }

    #[test]
    fn test_change_pub_link_delete_expire_is_a_flag() {
        let params = ChangePubLinkRequest::new(8).delete_expire(true).to_params();
        assert_eq!(params.to_query_string(), "linkid=8&deleteexpire=1");
    }

    #[tokio::test]
    async fn test_create_file_link_uses_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getfilepublink"))
            .and(query_param("fileid", "3"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(json_response(&json!({
                "result": 0,
                "linkid": 77,
                "code": "XZabc",
                "link": "https://u.pcloud.link/publink/show?code=XZabc"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .links()
            .create(&PubLinkRequest::new(PubLinkTarget::File(3)))
            .await
            .unwrap();
        assert_eq!(response.data.code.as_deref(), Some("XZabc"));
        assert_eq!(response.data.linkid, Some(77));
    }

    #[tokio::test]
    async fn test_folder_target_uses_folder_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getfolderpublink"))
            .and(query_param("folderid", "9"))
            .respond_with(json_response(&json!({"result": 0, "linkid": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .links()
            .create(&PubLinkRequest::new(PubLinkTarget::Folder(9)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_public_read_endpoints_send_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/showpublink"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(3, "shared.pdf", false)
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getpublinkdownload"))
            .respond_with(json_response(&json!({"result": 0, "path": "/p", "hosts": ["h"]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getpubthumb"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3], "image/jpeg"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let links = client.links();
        let shown = links.show("XZabc").await.unwrap();
        assert_eq!(shown.data.metadata.unwrap().name, "shared.pdf");
        links
            .download_link(&FileLinkRequest::public("XZabc", None).unwrap())
            .await
            .unwrap();
        let size = ThumbSize::new(64, 64).unwrap();
        links
            .pub_thumb(&ThumbRequest::public("XZabc", 3, size).unwrap())
            .await
            .unwrap();

        let requests = received(&server).await;
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| !has_authorization(r)));
    }

    #[tokio::test]
    async fn test_show_blank_code_fails_before_io() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        assert!(client.links().show(" ").await.is_err());
        assert!(received(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_decodes_publinks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listpublinks"))
            .respond_with(json_response(&json!({
                "result": 0,
                "publinks": [{
                    "linkid": 5,
                    "code": "XZ1",
                    "link": "https://u.pcloud.link/publink/show?code=XZ1",
                    "created": "Wed, 06 Dec 2023 10:15:30 +0000",
                    "modified": "Wed, 06 Dec 2023 10:15:30 +0000",
                    "downloads": 4,
                    "traffic": 1024,
                    "isfolder": false,
                    "fileid": 3
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.links().list().await.unwrap();
        let link = &response.data.publinks[0];
        assert_eq!(link.downloads, Some(4));
        assert!(link.expires.is_none());
    }

    #[tokio::test]
    async fn test_delete_posts_linkid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deletepublink"))
            .respond_with(json_response(&json!({"result": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.links().delete(5).await.unwrap().is_success());
        assert_eq!(form_keys(&received(&server).await[0]), ["linkid"]);
    }

    #[tokio::test]
    async fn test_save_pub_zip_is_authenticated_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/savepubzip"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(12, "site.zip", false)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = SavePubZipRequest::new("XZ1").unwrap();
        client.links().save_pub_zip(&request).await.unwrap();
    }
}
