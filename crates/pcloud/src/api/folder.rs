//! Folder operations.

use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_text},
    metadata::Metadata,
    request::{Params, ToParams},
    response::ApiResponse,
    transport::Transport,
};

/// Payload of most folder operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FolderResponse {
    /// Set by `createfolderifnotexists`: whether a new folder was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Payload of `deletefolderrecursive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeleteFolderResponse {
    #[serde(default)]
    pub deletedfiles: Option<u64>,
    #[serde(default)]
    pub deletedfolders: Option<u64>,
}

/// Creates `name` inside `folderid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFolderRequest {
    folderid: u64,
    name: String,
}

impl CreateFolderRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `name` is blank.
    pub fn new(folderid: u64, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        require_text("name", &name)?;
        Ok(Self { folderid, name })
    }
}

impl ToParams for CreateFolderRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push("name", self.name.as_str());
        params
    }
}

/// Lists a folder, optionally recursively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFolderRequest {
    folderid: u64,
    recursive: bool,
    showdeleted: bool,
    nofiles: bool,
    noshares: bool,
}

impl ListFolderRequest {
    pub fn new(folderid: u64) -> Self {
        Self {
            folderid,
            ..Self::default()
        }
    }

    /// Returns the full tree under the folder in `contents`.
    #[must_use]
    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }

    /// Includes deleted entries that can still be restored.
    #[must_use]
    pub fn show_deleted(mut self, value: bool) -> Self {
        self.showdeleted = value;
        self
    }

    /// Lists folders only.
    #[must_use]
    pub fn no_files(mut self, value: bool) -> Self {
        self.nofiles = value;
        self
    }

    /// Lists only the user's own content.
    #[must_use]
    pub fn no_shares(mut self, value: bool) -> Self {
        self.noshares = value;
        self
    }
}

impl ToParams for ListFolderRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push_flag("recursive", self.recursive)
            .push_flag("showdeleted", self.showdeleted)
            .push_flag("nofiles", self.nofiles)
            .push_flag("noshares", self.noshares);
        params
    }
}

/// Renames a folder in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameFolderRequest {
    folderid: u64,
    toname: String,
}

impl RenameFolderRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `toname` is blank.
    pub fn new(folderid: u64, toname: impl Into<String>) -> Result<Self, ValidationError> {
        let toname = toname.into();
        require_text("toname", &toname)?;
        Ok(Self { folderid, toname })
    }
}

impl ToParams for RenameFolderRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push("toname", self.toname.as_str());
        params
    }
}

/// Copies a folder into another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFolderRequest {
    folderid: u64,
    tofolderid: u64,
    noover: bool,
    skipexisting: bool,
    copycontentonly: bool,
}

impl CopyFolderRequest {
    pub fn new(folderid: u64, tofolderid: u64) -> Self {
        Self {
            folderid,
            tofolderid,
            noover: false,
            skipexisting: false,
            copycontentonly: false,
        }
    }

    /// Fails with 2004 instead of overwriting existing files.
    #[must_use]
    pub fn no_overwrite(mut self, value: bool) -> Self {
        self.noover = value;
        self
    }

    /// Skips files that already exist at the destination.
    #[must_use]
    pub fn skip_existing(mut self, value: bool) -> Self {
        self.skipexisting = value;
        self
    }

    /// Copies the folder's contents rather than the folder itself.
    #[must_use]
    pub fn copy_content_only(mut self, value: bool) -> Self {
        self.copycontentonly = value;
        self
    }
}

impl ToParams for CopyFolderRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push_u64("tofolderid", self.tofolderid)
            .push_flag("noover", self.noover)
            .push_flag("skipexisting", self.skipexisting)
            .push_flag("copycontentonly", self.copycontentonly);
        params
    }
}

/// Folder endpoints.
#[derive(Debug, Clone, Copy)]
pub struct FolderClient<'a> {
    transport: &'a Transport,
}

impl<'a> FolderClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Creates a folder.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn create(&self, request: &CreateFolderRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::CREATEFOLDER, &request.to_params())
            .await
    }

    /// Creates a folder unless one with the same name already exists.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn create_if_not_exists(
        &self,
        request: &CreateFolderRequest,
    ) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::CREATEFOLDERIFNOTEXISTS, &request.to_params())
            .await
    }

    /// Lists a folder.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn list(&self, request: &ListFolderRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::LISTFOLDER, &request.to_params())
            .await
    }

    /// Renames a folder.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn rename(&self, request: &RenameFolderRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::RENAMEFOLDER, &request.to_params())
            .await
    }

    /// Moves a folder under `tofolderid`, keeping its name.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn move_to(&self, folderid: u64, tofolderid: u64) -> Result<ApiResponse<FolderResponse>> {
        let mut params = Params::new();
        params
            .push_u64("folderid", folderid)
            .push_u64("tofolderid", tofolderid);
        self.transport.call(&endpoint::RENAMEFOLDER, &params).await
    }

    /// Deletes an empty folder.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn delete(&self, folderid: u64) -> Result<ApiResponse<FolderResponse>> {
        let mut params = Params::new();
        params.push_u64("folderid", folderid);
        self.transport.call(&endpoint::DELETEFOLDER, &params).await
    }

    /// Deletes a folder and everything below it.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn delete_recursive(&self, folderid: u64) -> Result<ApiResponse<DeleteFolderResponse>> {
        let mut params = Params::new();
        params.push_u64("folderid", folderid);
        self.transport
            .call(&endpoint::DELETEFOLDERRECURSIVE, &params)
            .await
    }

    /// Copies a folder.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error; see [`crate::Error`].
    pub async fn copy(&self, request: &CopyFolderRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::COPYFOLDER, &request.to_params())
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
        Error,
        testing::{TOKEN, client_for, form_pairs, json_response, metadata_json, query_keys, received},
    };

    #[test]
    fn test_list_request_renders_only_set_flags() {
        let params = ListFolderRequest::new(5).recursive(true).to_params();
        assert_eq!(params.to_query_string(), "folderid=5&recursive=1");
    }

    #[test]
    fn test_create_request_rejects_blank_name() {
        assert_eq!(
            CreateFolderRequest::new(0, " "),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn test_copy_request_flags() {
        let params = CopyFolderRequest::new(1, 2)
            .skip_existing(true)
            .no_overwrite(false)
            .to_params();
        assert_eq!(
            params.to_query_string(),
            "folderid=1&tofolderid=2&skipexisting=1"
        );
    }

    #[tokio::test]
    async fn test_list_sends_query_with_bearer_token() {
        let server = MockServer::start().await;
        let mut root = metadata_json(5, "Projects", true);
        root["contents"] = json!([metadata_json(9, "plan.txt", false)]);

        Mock::given(method("GET"))
            .and(path("/listfolder"))
            .and(query_param("folderid", "5"))
            .and(query_param("recursive", "1"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(json_response(&json!({"result": 0, "metadata": root})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .folders()
            .list(&ListFolderRequest::new(5).recursive(true))
            .await
            .unwrap();

        assert!(response.is_success());
        let metadata = response.data.metadata.unwrap();
        assert_eq!(metadata.folderid, Some(5));
        assert_eq!(metadata.children().count(), 1);

        let requests = received(&server).await;
        assert_eq!(query_keys(&requests[0]), ["folderid", "recursive"]);
    }

    #[tokio::test]
    async fn test_create_posts_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createfolder"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(77, "Reports", true)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CreateFolderRequest::new(0, "Reports").unwrap();
        let response = client.folders().create(&request).await.unwrap();
        assert_eq!(response.data.metadata.unwrap().name, "Reports");

        let requests = received(&server).await;
        assert_eq!(
            form_pairs(&requests[0]),
            [
                ("folderid".to_string(), "0".to_string()),
                ("name".to_string(), "Reports".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_create_if_not_exists_reports_created_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createfolderifnotexists"))
            .respond_with(json_response(&json!({
                "result": 0,
                "created": false,
                "metadata": metadata_json(77, "Reports", true)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CreateFolderRequest::new(0, "Reports").unwrap();
        let response = client.folders().create_if_not_exists(&request).await.unwrap();
        assert_eq!(response.data.created, Some(false));
    }

    #[tokio::test]
    async fn test_move_uses_renamefolder_with_destination() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/renamefolder"))
            .respond_with(json_response(&json!({"result": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.folders().move_to(3, 8).await.unwrap();

        let requests = received(&server).await;
        let pairs = form_pairs(&requests[0]);
        assert!(pairs.contains(&("tofolderid".to_string(), "8".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "toname"));
    }

    #[tokio::test]
    async fn test_application_error_is_returned_as_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listfolder"))
            .respond_with(json_response(&json!({
                "result": 2005,
                "error": "Directory does not exist."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .folders()
            .list(&ListFolderRequest::new(404))
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.known_message(), Some("Directory does not exist"));
        assert!(response.data.metadata.is_none());
    }

    #[tokio::test]
    async fn test_delete_recursive_decodes_counts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deletefolderrecursive"))
            .respond_with(json_response(&json!({
                "result": 0,
                "deletedfiles": 12,
                "deletedfolders": 3
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.folders().delete_recursive(7).await.unwrap();
        assert_eq!(response.data.deletedfiles, Some(12));
        assert_eq!(response.data.deletedfolders, Some(3));
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deletefolder"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.folders().delete(1).await.unwrap_err();
        match err {
            Error::Status {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, "deletefolder");
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/copyfolder"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": {
                    "id": "d1",
                    "name": "x",
                    "isfolder": true,
                    "created": "2023-12-06T10:15:30Z",
                    "modified": "2023-12-06T10:15:30Z"
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .folders()
            .copy(&CopyFolderRequest::new(1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse { endpoint: "copyfolder", .. }));
    }
}
