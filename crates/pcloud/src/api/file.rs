//! File operations: uploads, remote downloads, copy, rename, delete, stat.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_items, require_text},
    metadata::Metadata,
    request::{Params, ToParams},
    response::ApiResponse,
    transport::{Transport, Upload},
};

/// Payload of `uploadfile` and `downloadfile`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UploadFileResponse {
    #[serde(default)]
    pub fileids: Vec<u64>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
}

/// Payload of the upload progress endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UploadProgressResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currentfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currentfileid: Option<u64>,
    #[serde(default)]
    pub files: Vec<Metadata>,
    #[serde(default)]
    pub finished: bool,
}

/// Payload of single-file operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileResponse {
    /// Textual id of the affected entry, set by `deletefile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Payload of `checksumfile`. Which digests are present depends on the data
/// region of the account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChecksumResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Uploads one file into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileRequest {
    folderid: u64,
    filename: String,
    content: Bytes,
    nopartial: bool,
    renameifexists: bool,
    progresshash: Option<String>,
    mtime: Option<i64>,
    ctime: Option<i64>,
}

impl UploadFileRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `filename` is blank.
    pub fn new(
        folderid: u64,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, ValidationError> {
        let filename = filename.into();
        require_text("filename", &filename)?;
        Ok(Self {
            folderid,
            filename,
            content: content.into(),
            nopartial: false,
            renameifexists: false,
            progresshash: None,
            mtime: None,
            ctime: None,
        })
    }

    /// Discards partially uploaded data if the upload is interrupted.
    #[must_use]
    pub fn no_partial(mut self, value: bool) -> Self {
        self.nopartial = value;
        self
    }

    /// Renames the upload instead of overwriting an existing file.
    #[must_use]
    pub fn rename_if_exists(mut self, value: bool) -> Self {
        self.renameifexists = value;
        self
    }

    /// Key for polling [`FileClient::upload_progress`].
    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }

    /// Sets the modification time, in unix seconds.
    #[must_use]
    pub fn mtime(mut self, seconds: i64) -> Self {
        self.mtime = Some(seconds);
        self
    }

    /// Sets the creation time, in unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Conflict`] unless [`Self::mtime`] was set
    /// first.
    pub fn ctime(mut self, seconds: i64) -> Result<Self, ValidationError> {
        if self.mtime.is_none() {
            return Err(ValidationError::Conflict {
                field: "ctime",
                other: "mtime",
            });
        }
        self.ctime = Some(seconds);
        Ok(self)
    }

    pub(crate) fn upload(&self) -> Upload {
        Upload::new(self.filename.clone(), self.content.clone())
    }
}

impl ToParams for UploadFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push("filename", self.filename.as_str())
            .push_flag("nopartial", self.nopartial)
            .push_flag("renameifexists", self.renameifexists)
            .push_opt("progresshash", self.progresshash.as_deref())
            .push_opt_num("mtime", self.mtime)
            .push_opt_num("ctime", self.ctime);
        params
    }
}

/// Asks the server to fetch files from the web into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFileRequest {
    urls: Vec<String>,
    folderid: Option<u64>,
    progresshash: Option<String>,
}

impl DownloadFileRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if no URL is given or one is blank.
    pub fn new<I, S>(urls: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        require_items("url", &urls)?;
        for url in &urls {
            require_text("url", url)?;
        }
        Ok(Self {
            urls,
            folderid: None,
            progresshash: None,
        })
    }

    /// Target folder; the root folder when unset.
    #[must_use]
    pub fn folder_id(mut self, folderid: u64) -> Self {
        self.folderid = Some(folderid);
        self
    }

    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }
}

impl ToParams for DownloadFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("url", self.urls.join(" "))
            .push_opt_u64("folderid", self.folderid)
            .push_opt("progresshash", self.progresshash.as_deref());
        params
    }
}

/// Copies a file into another folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFileRequest {
    fileid: u64,
    tofolderid: u64,
    toname: Option<String>,
    noover: bool,
}

impl CopyFileRequest {
    pub fn new(fileid: u64, tofolderid: u64) -> Self {
        Self {
            fileid,
            tofolderid,
            toname: None,
            noover: false,
        }
    }

    /// Gives the copy a new name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `name` is blank.
    pub fn to_name(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        require_text("toname", &name)?;
        self.toname = Some(name);
        Ok(self)
    }

    /// Fails with 2004 instead of overwriting an existing file.
    #[must_use]
    pub fn no_overwrite(mut self, value: bool) -> Self {
        self.noover = value;
        self
    }
}

impl ToParams for CopyFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("fileid", self.fileid)
            .push_u64("tofolderid", self.tofolderid)
            .push_opt("toname", self.toname.as_deref())
            .push_flag("noover", self.noover);
        params
    }
}

/// Renames a file in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameFileRequest {
    fileid: u64,
    toname: String,
}

impl RenameFileRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `toname` is blank.
    pub fn new(fileid: u64, toname: impl Into<String>) -> Result<Self, ValidationError> {
        let toname = toname.into();
        require_text("toname", &toname)?;
        Ok(Self { fileid, toname })
    }
}

impl ToParams for RenameFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("fileid", self.fileid)
            .push("toname", self.toname.as_str());
        params
    }
}

fn file_params(fileid: u64) -> Params {
    let mut params = Params::new();
    params.push_u64("fileid", fileid);
    params
}

/// File endpoints.
#[derive(Debug, Clone, Copy)]
pub struct FileClient<'a> {
    transport: &'a Transport,
}

impl<'a> FileClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Uploads a file as a multipart body.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn upload(&self, request: &UploadFileRequest) -> Result<ApiResponse<UploadFileResponse>> {
        self.transport
            .call_multipart(&endpoint::UPLOADFILE, &request.to_params(), request.upload())
            .await
    }

    /// Polls an upload started with a progress hash.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `progresshash` is blank, or a
    /// transport, status or parse error.
    pub async fn upload_progress(
        &self,
        progresshash: &str,
    ) -> Result<ApiResponse<UploadProgressResponse>> {
        require_text("progresshash", progresshash)?;
        let mut params = Params::new();
        params.push("progresshash", progresshash);
        self.transport.call(&endpoint::UPLOADPROGRESS, &params).await
    }

    /// Downloads the given URLs into the account, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn download_from_urls(
        &self,
        request: &DownloadFileRequest,
    ) -> Result<ApiResponse<UploadFileResponse>> {
        self.transport
            .call(&endpoint::DOWNLOADFILE, &request.to_params())
            .await
    }

    /// Like [`Self::download_from_urls`], but returns immediately.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn download_from_urls_async(
        &self,
        request: &DownloadFileRequest,
    ) -> Result<ApiResponse<UploadFileResponse>> {
        self.transport
            .call(&endpoint::DOWNLOADFILEASYNC, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn copy(&self, request: &CopyFileRequest) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::COPYFILE, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn checksum(&self, fileid: u64) -> Result<ApiResponse<ChecksumResponse>> {
        self.transport
            .call(&endpoint::CHECKSUMFILE, &file_params(fileid))
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn delete(&self, fileid: u64) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::DELETEFILE, &file_params(fileid))
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn rename(&self, request: &RenameFileRequest) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::RENAMEFILE, &request.to_params())
            .await
    }

    /// Moves a file into `tofolderid`, keeping its name.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn move_to(&self, fileid: u64, tofolderid: u64) -> Result<ApiResponse<FileResponse>> {
        let mut params = file_params(fileid);
        params.push_u64("tofolderid", tofolderid);
        self.transport.call(&endpoint::RENAMEFILE, &params).await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn stat(&self, fileid: u64) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::STAT, &file_params(fileid))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{body_string_contains, header, method, path, query_param},
    };

    use super::*;
    use crate::testing::{client_for, form_keys, json_response, metadata_json, received};

    #[test]
    fn test_upload_params_omit_unset_progress_hash() {
        let request = UploadFileRequest::new(10, "report.pdf", b"%PDF".to_vec()).unwrap();
        let params = request.to_params();
        assert_eq!(params.to_query_string(), "folderid=10&filename=report.pdf");
        assert!(!params.contains("progresshash"));
    }

    #[test]
    fn test_upload_ctime_requires_mtime() {
        let request = UploadFileRequest::new(10, "a.txt", Bytes::new()).unwrap();
        assert_eq!(
            request.clone().ctime(5).unwrap_err(),
            ValidationError::Conflict {
                field: "ctime",
                other: "mtime"
            }
        );
        let params = request.mtime(4).ctime(5).unwrap().to_params();
        assert_eq!(params.get("mtime"), Some("4"));
        assert_eq!(params.get("ctime"), Some("5"));
    }

    #[test]
    fn test_download_request_joins_urls_with_spaces() {
        let request = DownloadFileRequest::new(["https://a.example/x", "https://b.example/y"])
            .unwrap()
            .folder_id(3);
        let params = request.to_params();
        assert_eq!(
            params.get("url"),
            Some("https://a.example/x https://b.example/y")
        );
        assert_eq!(params.get("folderid"), Some("3"));
    }

    #[test]
    fn test_download_request_requires_urls() {
        assert!(DownloadFileRequest::new(Vec::<String>::new()).is_err());
        assert!(DownloadFileRequest::new([""]).is_err());
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/uploadfile"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_string_contains("name=\"folderid\"\r\n\r\n10"))
            .and(body_string_contains("name=\"filename\"\r\n\r\nreport.pdf"))
            .and(body_string_contains("filename=\"report.pdf\""))
            .respond_with(json_response(&json!({
                "result": 0,
                "fileids": [501],
                "metadata": [metadata_json(501, "report.pdf", false)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = UploadFileRequest::new(10, "report.pdf", b"%PDF-1.7".to_vec()).unwrap();
        let response = client.files().upload(&request).await.unwrap();

        assert_eq!(response.data.fileids, [501]);
        assert_eq!(response.data.metadata[0].name, "report.pdf");

        let requests = received(&server).await;
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(!body.contains("progresshash"));
        assert!(!body.contains("renameifexists"));
        assert!(body.contains("%PDF-1.7"));
        assert_eq!(body.matches("Content-Disposition").count(), 3);
    }

    #[tokio::test]
    async fn test_upload_progress_uses_progresshash_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploadprogress"))
            .and(query_param("progresshash", "abc"))
            .respond_with(json_response(&json!({
                "result": 0,
                "total": 100,
                "uploaded": 40,
                "currentfile": "big.iso",
                "files": [],
                "finished": false
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.files().upload_progress("abc").await.unwrap();
        assert_eq!(response.data.uploaded, Some(40));
        assert!(!response.data.finished);
    }

    #[tokio::test]
    async fn test_upload_progress_blank_hash_fails_before_io() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client.files().upload_progress("").await.unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
        assert!(received(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deletefile"))
            .respond_with(json_response(&json!({
                "result": 0,
                "id": "f9",
                "metadata": metadata_json(9, "old.txt", false)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.files().delete(9).await.unwrap();
        assert_eq!(response.data.id.as_deref(), Some("f9"));
        assert_eq!(form_keys(&received(&server).await[0]), ["fileid"]);
    }

    #[tokio::test]
    async fn test_checksum_decodes_digests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/checksumfile"))
            .and(query_param("fileid", "9"))
            .respond_with(json_response(&json!({
                "result": 0,
                "sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
                "md5": "d41d8cd98f00b204e9800998ecf8427e",
                "metadata": metadata_json(9, "empty.txt", false)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.files().checksum(9).await.unwrap();
        assert!(response.data.sha256.is_none());
        assert_eq!(
            response.data.md5.as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
    }

    #[tokio::test]
    async fn test_copy_renders_optional_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/copyfile"))
            .respond_with(json_response(&json!({"result": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CopyFileRequest::new(1, 2).to_name("copy.txt").unwrap();
        client.files().copy(&request).await.unwrap();

        assert_eq!(
            form_keys(&received(&server).await[0]),
            ["fileid", "tofolderid", "toname"]
        );
    }
}
