//! Upload links: let other people drop files into one of the user's folders.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    api::file::UploadProgressResponse,
    endpoint,
    error::{Result, ValidationError, require_text},
    metadata::Metadata,
    request::{Params, ToParams},
    response::{ApiResponse, Empty},
    timestamp::Timestamp,
    transport::{Transport, Upload},
};

/// Payload of `createuploadlink`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadLinkResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploadlinkid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One upload link owned by the user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadLink {
    pub uploadlinkid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Bytes uploaded so far.
    #[serde(default)]
    pub space: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxspace: Option<u64>,
    #[serde(default)]
    pub files: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxfiles: Option<u64>,
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
    pub expire: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Payload of `listuploadlinks`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ListUploadLinksResponse {
    #[serde(default)]
    pub uploadlinks: Vec<UploadLink>,
}

/// Payload of `showuploadlink`: what an uploader sees through the code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShowUploadLinkResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxspace: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxfiles: Option<u64>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expire: Option<Timestamp>,
}

/// Creates an upload link to a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUploadLinkRequest {
    folderid: u64,
    comment: String,
    expire: Option<Timestamp>,
    maxspace: Option<u64>,
    maxfiles: Option<u64>,
}

impl CreateUploadLinkRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `comment` is blank.
    pub fn new(folderid: u64, comment: impl Into<String>) -> Result<Self, ValidationError> {
        let comment = comment.into();
        require_text("comment", &comment)?;
        Ok(Self {
            folderid,
            comment,
            expire: None,
            maxspace: None,
            maxfiles: None,
        })
    }

    #[must_use]
    pub fn expire(mut self, at: Timestamp) -> Self {
        self.expire = Some(at);
        self
    }

    /// Caps the total upload size, in bytes.
    #[must_use]
    pub fn max_space(mut self, bytes: u64) -> Self {
        self.maxspace = Some(bytes);
        self
    }

    #[must_use]
    pub fn max_files(mut self, count: u64) -> Self {
        self.maxfiles = Some(count);
        self
    }
}

impl ToParams for CreateUploadLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push("comment", self.comment.as_str())
            .push_timestamp("expire", self.expire)
            .push_opt_u64("maxspace", self.maxspace)
            .push_opt_u64("maxfiles", self.maxfiles);
        params
    }
}

/// Changes limits on an upload link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeUploadLinkRequest {
    uploadlinkid: u64,
    expire: Option<Timestamp>,
    deleteexpire: bool,
    maxspace: Option<u64>,
    maxfiles: Option<u64>,
}

impl ChangeUploadLinkRequest {
    pub fn new(uploadlinkid: u64) -> Self {
        Self {
            uploadlinkid,
            expire: None,
            deleteexpire: false,
            maxspace: None,
            maxfiles: None,
        }
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
    pub fn max_space(mut self, bytes: u64) -> Self {
        self.maxspace = Some(bytes);
        self
    }

    #[must_use]
    pub fn max_files(mut self, count: u64) -> Self {
        self.maxfiles = Some(count);
        self
    }
}

impl ToParams for ChangeUploadLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("uploadlinkid", self.uploadlinkid)
            .push_timestamp("expire", self.expire)
            .push_flag("deleteexpire", self.deleteexpire)
            .push_opt_u64("maxspace", self.maxspace)
            .push_opt_u64("maxfiles", self.maxfiles);
        params
    }
}

/// Uploads a file through someone else's upload link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToLinkRequest {
    code: String,
    names: String,
    filename: String,
    content: Bytes,
    nopartial: bool,
    progresshash: Option<String>,
}

impl UploadToLinkRequest {
    /// `names` identifies the uploader to the link owner.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code`, `names` or `filename`
    /// is blank.
    pub fn new(
        code: impl Into<String>,
        names: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, ValidationError> {
        let code = code.into();
        let names = names.into();
        let filename = filename.into();
        require_text("code", &code)?;
        require_text("names", &names)?;
        require_text("filename", &filename)?;
        Ok(Self {
            code,
            names,
            filename,
            content: content.into(),
            nopartial: false,
            progresshash: None,
        })
    }

    #[must_use]
    pub fn no_partial(mut self, value: bool) -> Self {
        self.nopartial = value;
        self
    }

    /// Key for polling [`UploadLinksClient::upload_progress`].
    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }
}

impl ToParams for UploadToLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("code", self.code.as_str())
            .push("names", self.names.as_str())
            .push_flag("nopartial", self.nopartial)
            .push_opt("progresshash", self.progresshash.as_deref());
        params
    }
}

fn link_params(uploadlinkid: u64) -> Params {
    let mut params = Params::new();
    params.push_u64("uploadlinkid", uploadlinkid);
    params
}

fn code_params(code: &str) -> Result<Params> {
    require_text("code", code)?;
    let mut params = Params::new();
    params.push("code", code);
    Ok(params)
}

/// Upload link endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UploadLinksClient<'a> {
    transport: &'a Transport,
}

impl<'a> UploadLinksClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn create(
        &self,
        request: &CreateUploadLinkRequest,
    ) -> Result<ApiResponse<UploadLinkResponse>> {
        self.transport
            .call(&endpoint::CREATEUPLOADLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(&self) -> Result<ApiResponse<ListUploadLinksResponse>> {
        self.transport
            .call(&endpoint::LISTUPLOADLINKS, &Params::new())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn delete(&self, uploadlinkid: u64) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::DELETEUPLOADLINK, &link_params(uploadlinkid))
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn change(&self, request: &ChangeUploadLinkRequest) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::CHANGEUPLOADLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `code` is blank, or a
    /// transport, status or parse error.
    pub async fn show(&self, code: &str) -> Result<ApiResponse<ShowUploadLinkResponse>> {
        self.transport
            .call(&endpoint::SHOWUPLOADLINK, &code_params(code)?)
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn upload(&self, request: &UploadToLinkRequest) -> Result<ApiResponse<Empty>> {
        let upload = Upload::new(request.filename.clone(), request.content.clone());
        self.transport
            .call_multipart(&endpoint::UPLOADTOLINK, &request.to_params(), upload)
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `code` or `progresshash` is
    /// blank, or a transport, status or parse error.
    pub async fn upload_progress(
        &self,
        code: &str,
        progresshash: &str,
    ) -> Result<ApiResponse<UploadProgressResponse>> {
        let mut params = code_params(code)?;
        require_text("progresshash", progresshash)?;
        params.push("progresshash", progresshash);
        self.transport
            .call(&endpoint::UPLOADLINKPROGRESS, &params)
            .await
    }

    /// Copies one of the user's files into an upload link.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `code` or `toname` is blank,
    /// or a transport, status or parse error.
    pub async fn copy_to_link(
        &self,
        code: &str,
        fileid: u64,
        toname: Option<&str>,
    ) -> Result<ApiResponse<Empty>> {
        let mut params = code_params(code)?;
        if let Some(toname) = toname {
            require_text("toname", toname)?;
        }
        params.push_u64("fileid", fileid).push_opt("toname", toname);
        self.transport.call(&endpoint::COPYTOLINK, &params).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{body_string_contains, method, path, query_param},
    };

    use super::*;
    use crate::{
        testing::{client_for, form_pairs, json_response, metadata_json, received},
        timestamp,
    };

    #[test]
    fn test_create_renders_expire_and_limits() {
        let expire = timestamp::parse("Sun, 31 Mar 2024 23:59:59 +0000").unwrap();
        let params = CreateUploadLinkRequest::new(2, "Drop files here")
            .unwrap()
            .expire(expire)
            .max_files(10)
            .to_params();
        assert_eq!(params.get("expire"), Some("Sun, 31 Mar 2024 23:59:59 +0000"));
        assert_eq!(params.get("maxfiles"), Some("10"));
        assert!(!params.contains("maxspace"));
    }

    #[test]
    fn test_upload_to_link_requires_uploader_name() {
        let err = UploadToLinkRequest::new("code", " ", "a.txt", "data").unwrap_err();
        assert_eq!(err.field(), "names");
    }

    #[tokio::test]
    async fn test_list_decodes_upload_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listuploadlinks"))
            .respond_with(json_response(&json!({
                "result": 0,
                "uploadlinks": [{
                    "uploadlinkid": 4,
                    "code": "UL1",
                    "comment": "Drop files here",
                    "space": 2048,
                    "files": 3,
                    "created": "Wed, 06 Dec 2023 10:15:30 +0000",
                    "metadata": metadata_json(2, "Inbox", true)
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.upload_links().list().await.unwrap();
        let link = &response.data.uploadlinks[0];
        assert_eq!(link.files, 3);
        assert!(link.expire.is_none());
        assert!(link.metadata.as_ref().unwrap().isfolder);
    }

    #[tokio::test]
    async fn test_change_delete_expire_is_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/changeuploadlink"))
            .respond_with(json_response(&json!({"result": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ChangeUploadLinkRequest::new(4).delete_expire(true);
        client.upload_links().change(&request).await.unwrap();
        let pairs = form_pairs(&received(&server).await[0]);
        assert_eq!(
            pairs,
            [
                ("uploadlinkid".to_owned(), "4".to_owned()),
                ("deleteexpire".to_owned(), "1".to_owned())
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_with_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/uploadtolink"))
            .and(body_string_contains("name=\"names\"\r\n\r\nAlex"))
            .and(body_string_contains("filename=\"notes.txt\""))
            .respond_with(json_response(&json!({"result": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = UploadToLinkRequest::new("UL1", "Alex", "notes.txt", "hello").unwrap();
        assert!(client.upload_links().upload(&request).await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_upload_progress_sends_code_and_hash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploadlinkprogress"))
            .and(query_param("code", "UL1"))
            .and(query_param("progresshash", "up-1"))
            .respond_with(json_response(&json!({
                "result": 0,
                "total": 100,
                "uploaded": 40,
                "finished": false
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .upload_links()
            .upload_progress("UL1", "up-1")
            .await
            .unwrap();
        assert_eq!(response.data.uploaded, Some(40));
        assert!(!response.data.finished);
    }

    #[tokio::test]
    async fn test_copy_to_link_blank_name_fails_before_io() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let result = client.upload_links().copy_to_link("UL1", 3, Some("")).await;
        assert!(result.is_err());
        assert!(received(&server).await.is_empty());
    }
}
