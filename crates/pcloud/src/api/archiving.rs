//! Zip archives built on the fly from a [`Tree`], and server-side extraction.

use serde::{Deserialize, Serialize};

use crate::{
    api::{file::FileResponse, streaming::StreamingResponse},
    endpoint,
    error::{Result, ValidationError, require_text},
    request::{OverwriteMode, Params, ToParams, Tree, require_zip_name},
    response::ApiResponse,
    transport::{Download, Transport},
};

/// Payload of `extractarchive` and `extractarchiveprogress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractArchiveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progresshash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipbin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u64>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub output: Vec<String>,
}

/// Payload of `savezipprogress`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SaveZipProgressResponse {
    #[serde(default)]
    pub files: u64,
    #[serde(default)]
    pub totalfiles: u64,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub totalbytes: u64,
}

/// Downloads a tree as a zip archive, or gets a link to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipRequest {
    tree: Tree,
    forcedownload: bool,
    filename: Option<String>,
    timeoffset: Option<String>,
    maxspeed: Option<u64>,
}

impl ZipRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `tree` includes nothing.
    pub fn new(tree: Tree) -> Result<Self, ValidationError> {
        tree.validate()?;
        Ok(Self {
            tree,
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

    /// Caps the download speed in bytes per second. Only sent by
    /// [`ArchivingClient::zip_link`].
    #[must_use]
    pub fn max_speed(mut self, bytes_per_second: u64) -> Self {
        self.maxspeed = Some(bytes_per_second);
        self
    }
}

impl ToParams for ZipRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.tree.push_to(&mut params);
        params
            .push_flag("forcedownload", self.forcedownload)
            .push_opt("filename", self.filename.as_deref())
            .push_opt("timeoffset", self.timeoffset.as_deref())
            .push_opt_u64("maxspeed", self.maxspeed);
        params
    }
}

/// Builds a zip from a tree and stores it in the user's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveZipRequest {
    tree: Tree,
    timeoffset: Option<String>,
    destination: Option<(u64, String)>,
    progresshash: Option<String>,
}

impl SaveZipRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `tree` includes nothing.
    pub fn new(tree: Tree) -> Result<Self, ValidationError> {
        tree.validate()?;
        Ok(Self {
            tree,
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

    /// Where to store the archive. The folder and name are always sent
    /// together.
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

    /// Hash to poll with [`ArchivingClient::save_zip_progress`].
    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }
}

impl ToParams for SaveZipRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.tree.push_to(&mut params);
        params.push_opt("timeoffset", self.timeoffset.as_deref());
        if let Some((tofolderid, toname)) = &self.destination {
            params
                .push_u64("tofolderid", *tofolderid)
                .push("toname", toname.as_str());
        }
        params.push_opt("progresshash", self.progresshash.as_deref());
        params
    }
}

/// Extracts an archive file into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractArchiveRequest {
    fileid: u64,
    tofolderid: u64,
    nooutput: Option<bool>,
    overwrite: Option<OverwriteMode>,
    password: Option<String>,
}

impl ExtractArchiveRequest {
    pub fn new(fileid: u64, tofolderid: u64) -> Self {
        Self {
            fileid,
            tofolderid,
            nooutput: None,
            overwrite: None,
            password: None,
        }
    }

    /// Suppresses the extraction log in responses.
    #[must_use]
    pub fn no_output(mut self, value: bool) -> Self {
        self.nooutput = Some(value);
        self
    }

    #[must_use]
    pub fn overwrite(mut self, mode: OverwriteMode) -> Self {
        self.overwrite = Some(mode);
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl ToParams for ExtractArchiveRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("fileid", self.fileid)
            .push_u64("tofolderid", self.tofolderid)
            .push_bool("nooutput", self.nooutput)
            .push_opt("overwrite", self.overwrite.map(OverwriteMode::as_str))
            .push_opt("password", self.password.as_deref());
        params
    }
}

fn progress_params(progresshash: &str) -> Result<Params> {
    require_text("progresshash", progresshash)?;
    let mut params = Params::new();
    params.push("progresshash", progresshash);
    Ok(params)
}

/// Archiving endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ArchivingClient<'a> {
    transport: &'a Transport,
}

impl<'a> ArchivingClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Streams the archive.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn zip(&self, request: &ZipRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETZIP, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn zip_link(&self, request: &ZipRequest) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETZIPLINK, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn save_zip(&self, request: &SaveZipRequest) -> Result<ApiResponse<FileResponse>> {
        self.transport
            .call(&endpoint::SAVEZIP, &request.to_params())
            .await
    }

    /// Starts extracting an archive. Poll with
    /// [`ArchivingClient::extract_progress`] using the returned hash.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn extract(
        &self,
        request: &ExtractArchiveRequest,
    ) -> Result<ApiResponse<ExtractArchiveResponse>> {
        self.transport
            .call(&endpoint::EXTRACTARCHIVE, &request.to_params())
            .await
    }

    /// Reads extraction progress, skipping the first `lines` lines of output
    /// already seen.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `progresshash` is blank, or a
    /// transport, status or parse error.
    pub async fn extract_progress(
        &self,
        progresshash: &str,
        lines: Option<u64>,
    ) -> Result<ApiResponse<ExtractArchiveResponse>> {
        let mut params = progress_params(progresshash)?;
        params.push_opt_u64("lines", lines);
        self.transport
            .call(&endpoint::EXTRACTARCHIVEPROGRESS, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `progresshash` is blank, or a
    /// transport, status or parse error.
    pub async fn save_zip_progress(
        &self,
        progresshash: &str,
    ) -> Result<ApiResponse<SaveZipProgressResponse>> {
        self.transport
            .call(&endpoint::SAVEZIPPROGRESS, &progress_params(progresshash)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;
    use crate::{
        Error,
        testing::{client_for, form_pairs, json_response, metadata_json, received},
    };

    #[test]
    fn test_zip_requires_non_empty_tree() {
        let err = ZipRequest::new(Tree::new()).unwrap_err();
        assert_eq!(err.field(), "tree");
    }

    #[test]
    fn test_zip_filename_extension_is_checked() {
        let tree = Tree::new().folders([1]);
        assert!(ZipRequest::new(tree.clone()).unwrap().filename("backup.zip").is_ok());
        assert!(ZipRequest::new(tree).unwrap().filename("backup").is_err());
    }

    #[test]
    fn test_extract_renders_overwrite_mode_and_tri_state() {
        let params = ExtractArchiveRequest::new(5, 6)
            .no_output(false)
            .overwrite(OverwriteMode::Skip)
            .to_params();
        assert_eq!(
            params.to_query_string(),
            "fileid=5&tofolderid=6&nooutput=0&overwrite=skip"
        );
    }

    #[tokio::test]
    async fn test_zip_streams_archive_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getzip"))
            .and(query_param("folderids", "1,2"))
            .and(query_param("excludefileids", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04".to_vec(), "application/zip"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ZipRequest::new(Tree::new().folders([1, 2]).exclude_files([9])).unwrap();
        let download = client.archiving().zip(&request).await.unwrap();
        assert_eq!(download.content_type(), Some("application/zip"));
        assert_eq!(download.bytes().await.unwrap().as_ref(), b"PK\x03\x04");
    }

    #[tokio::test]
    async fn test_save_zip_posts_paired_destination() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/savezip"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(30, "backup.zip", false)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = SaveZipRequest::new(Tree::new().files([4]))
            .unwrap()
            .destination(2, "backup.zip")
            .unwrap()
            .progress_hash("zip-1");
        let response = client.archiving().save_zip(&request).await.unwrap();
        assert_eq!(response.data.metadata.unwrap().name, "backup.zip");

        let pairs = form_pairs(&received(&server).await[0]);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["fileids", "tofolderid", "toname", "progresshash"]);
    }

    #[tokio::test]
    async fn test_extract_progress_decodes_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extractarchiveprogress"))
            .and(query_param("progresshash", "ex-1"))
            .and(query_param("lines", "2"))
            .respond_with(json_response(&json!({
                "result": 0,
                "finished": true,
                "lines": 3,
                "output": ["a.txt", "b.txt", "c.txt"]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .archiving()
            .extract_progress("ex-1", Some(2))
            .await
            .unwrap();
        assert!(response.data.finished);
        assert_eq!(response.data.output.len(), 3);
    }

    #[tokio::test]
    async fn test_save_zip_progress_rejects_blank_hash() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client.archiving().save_zip_progress("").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::Empty { field: "progresshash" })));
    }
}
