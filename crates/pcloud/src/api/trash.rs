//! Trash: listing, restoring and permanently deleting removed entries.

use serde::{Deserialize, Serialize};

use crate::{
    api::folder::FolderResponse,
    endpoint,
    error::Result,
    metadata::Metadata,
    request::{Item, Params, ToParams},
    response::{ApiResponse, Empty},
    transport::Transport,
};

/// Payload of `trash_restorepath`: where an entry would be restored to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TrashRestorePathResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Metadata>,
}

/// Lists a folder in the trash. Folder `0` lists the trash root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrashListRequest {
    folderid: u64,
    nofiles: bool,
    recursive: bool,
}

impl TrashListRequest {
    pub fn new(folderid: u64) -> Self {
        Self {
            folderid,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn no_files(mut self, value: bool) -> Self {
        self.nofiles = value;
        self
    }

    #[must_use]
    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }
}

impl ToParams for TrashListRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("folderid", self.folderid)
            .push_flag("nofiles", self.nofiles)
            .push_flag("recursive", self.recursive);
        params
    }
}

/// Restores one file or folder from the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrashRestoreRequest {
    item: Item,
    restoreto: Option<u64>,
    metadata: Option<bool>,
}

impl TrashRestoreRequest {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            restoreto: None,
            metadata: None,
        }
    }

    /// Restores into this folder instead of the original location.
    #[must_use]
    pub fn restore_to(mut self, folderid: u64) -> Self {
        self.restoreto = Some(folderid);
        self
    }

    /// Whether the response should carry the restored metadata. Left unset,
    /// the server default applies.
    #[must_use]
    pub fn metadata(mut self, value: bool) -> Self {
        self.metadata = Some(value);
        self
    }
}

impl ToParams for TrashRestoreRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.item.push_to(&mut params);
        params
            .push_opt_u64("restoreto", self.restoreto)
            .push_bool("metadata", self.metadata);
        params
    }
}

fn item_params(item: Item) -> Params {
    let mut params = Params::new();
    item.push_to(&mut params);
    params
}

/// Trash endpoints.
#[derive(Debug, Clone, Copy)]
pub struct TrashClient<'a> {
    transport: &'a Transport,
}

impl<'a> TrashClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(&self, request: &TrashListRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::TRASH_LIST, &request.to_params())
            .await
    }

    /// Reports where `item` would be restored to.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn restore_path(&self, item: Item) -> Result<ApiResponse<TrashRestorePathResponse>> {
        self.transport
            .call(&endpoint::TRASH_RESTOREPATH, &item_params(item))
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn restore(&self, request: &TrashRestoreRequest) -> Result<ApiResponse<FolderResponse>> {
        self.transport
            .call(&endpoint::TRASH_RESTORE, &request.to_params())
            .await
    }

    /// Permanently deletes `item` from the trash.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn clear(&self, item: Item) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::TRASH_CLEAR, &item_params(item))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer,
        matchers::{method, path, query_param},
    };

    use super::*;
    use crate::testing::{client_for, form_pairs, json_response, metadata_json, received};

    #[test]
    fn test_restore_metadata_is_tri_state() {
        let unset = TrashRestoreRequest::new(Item::File(1)).to_params();
        assert!(!unset.contains("metadata"));
        let off = TrashRestoreRequest::new(Item::File(1)).metadata(false).to_params();
        assert_eq!(off.get("metadata"), Some("0"));
        let on = TrashRestoreRequest::new(Item::Folder(2)).metadata(true).to_params();
        assert_eq!(on.to_query_string(), "folderid=2&metadata=1");
    }

    #[tokio::test]
    async fn test_list_root_of_trash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trash_list"))
            .and(query_param("folderid", "0"))
            .and(query_param("recursive", "1"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(0, "/", true)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .trash()
            .list(&TrashListRequest::new(0).recursive(true))
            .await
            .unwrap();
        assert!(response.data.metadata.unwrap().isfolder);
    }

    #[tokio::test]
    async fn test_restore_path_reports_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trash_restorepath"))
            .and(query_param("fileid", "7"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(7, "old.txt", false),
                "destination": metadata_json(3, "Documents", true)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.trash().restore_path(Item::File(7)).await.unwrap();
        assert_eq!(response.data.destination.unwrap().name, "Documents");
    }

    #[tokio::test]
    async fn test_clear_sends_item_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/trash_clear"))
            .respond_with(json_response(&json!({"result": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.trash().clear(Item::Folder(12)).await.unwrap();
        let pairs = form_pairs(&received(&server).await[0]);
        assert_eq!(pairs, [("folderid".to_owned(), "12".to_owned())]);
    }
}
