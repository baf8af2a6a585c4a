//! Collections: ordered lists of files such as audio playlists.

use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_items, require_text},
    metadata::{Collection, Metadata},
    request::{Params, ToParams},
    response::{ApiResponse, Empty},
    transport::Transport,
};

/// Kind of collection, sent as its numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollectionType {
    #[default]
    Generic,
    Playlist,
}

impl CollectionType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Generic => 0,
            Self::Playlist => 1,
        }
    }
}

/// Payload of `collection_list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// Payload of single-collection operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CollectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,
}

/// Outcome of linking one file. Each entry carries its own result code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LinkResult {
    #[serde(default)]
    pub result: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Payload of `collection_linkfiles`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LinkFilesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,
    #[serde(default)]
    pub linkresult: Vec<LinkResult>,
}

/// Lists the user's collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCollectionsRequest {
    kind: Option<CollectionType>,
    showfiles: Option<bool>,
    pagesize: Option<u32>,
}

impl ListCollectionsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only lists collections of this type.
    #[must_use]
    pub fn kind(mut self, kind: CollectionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether each collection should include its files.
    #[must_use]
    pub fn show_files(mut self, value: bool) -> Self {
        self.showfiles = Some(value);
        self
    }

    /// Number of files returned per collection when files are shown.
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.pagesize = Some(size);
        self
    }
}

impl ToParams for ListCollectionsRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt_num("type", self.kind.map(CollectionType::code))
            .push_bool("showfiles", self.showfiles)
            .push_opt_num("pagesize", self.pagesize);
        params
    }
}

/// Creates a collection, optionally seeded with files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCollectionRequest {
    name: String,
    kind: Option<CollectionType>,
    fileids: Vec<u64>,
}

impl CreateCollectionRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        require_text("name", &name)?;
        Ok(Self {
            name,
            kind: None,
            fileids: Vec::new(),
        })
    }

    #[must_use]
    pub fn kind(mut self, kind: CollectionType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn files(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.fileids.extend(ids);
        self
    }
}

impl ToParams for CreateCollectionRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", self.name.as_str())
            .push_opt_num("type", self.kind.map(CollectionType::code))
            .push_ids("fileids", &self.fileids);
        params
    }
}

/// Adds files to the end of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilesRequest {
    collectionid: u64,
    fileids: Vec<u64>,
    noitems: Option<bool>,
}

impl LinkFilesRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `fileids` is empty.
    pub fn new(collectionid: u64, fileids: Vec<u64>) -> Result<Self, ValidationError> {
        require_items("fileids", &fileids)?;
        Ok(Self {
            collectionid,
            fileids,
            noitems: None,
        })
    }

    /// Whether to leave the collection's items out of the response.
    #[must_use]
    pub fn no_items(mut self, value: bool) -> Self {
        self.noitems = Some(value);
        self
    }
}

impl ToParams for LinkFilesRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("collectionid", self.collectionid)
            .push_ids("fileids", &self.fileids)
            .push_bool("noitems", self.noitems);
        params
    }
}

/// Which items to remove from a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unlink {
    All,
    /// 1-based positions within the collection.
    Positions(Vec<u64>),
    FileIds(Vec<u64>),
}

impl Unlink {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::All => Ok(()),
            Self::Positions(positions) => require_items("positions", positions),
            Self::FileIds(fileids) => require_items("fileids", fileids),
        }
    }

    fn push_to(&self, params: &mut Params) {
        match self {
            Self::All => {
                params.push_flag("all", true);
            }
            Self::Positions(positions) => {
                params.push_ids("positions", positions);
            }
            Self::FileIds(fileids) => {
                params.push_ids("fileids", fileids);
            }
        }
    }
}

fn collection_params(collectionid: u64) -> Params {
    let mut params = Params::new();
    params.push_u64("collectionid", collectionid);
    params
}

/// Collection endpoints.
#[derive(Debug, Clone, Copy)]
pub struct CollectionClient<'a> {
    transport: &'a Transport,
}

impl<'a> CollectionClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(
        &self,
        request: &ListCollectionsRequest,
    ) -> Result<ApiResponse<CollectionsResponse>> {
        self.transport
            .call(&endpoint::COLLECTION_LIST, &request.to_params())
            .await
    }

    /// Returns a collection with one page of its files. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn details(
        &self,
        collectionid: u64,
        page: Option<u32>,
        pagesize: Option<u32>,
    ) -> Result<ApiResponse<CollectionResponse>> {
        let mut params = collection_params(collectionid);
        params
            .push_opt_num("page", page)
            .push_opt_num("pagesize", pagesize);
        self.transport
            .call(&endpoint::COLLECTION_DETAILS, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn create(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<ApiResponse<CollectionResponse>> {
        self.transport
            .call(&endpoint::COLLECTION_CREATE, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `name` is blank, or a
    /// transport, status or parse error.
    pub async fn rename(&self, collectionid: u64, name: &str) -> Result<ApiResponse<CollectionResponse>> {
        require_text("name", name)?;
        let mut params = collection_params(collectionid);
        params.push("name", name);
        self.transport
            .call(&endpoint::COLLECTION_RENAME, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn delete(&self, collectionid: u64) -> Result<ApiResponse<Empty>> {
        self.transport
            .call(&endpoint::COLLECTION_DELETE, &collection_params(collectionid))
            .await
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn link_files(&self, request: &LinkFilesRequest) -> Result<ApiResponse<LinkFilesResponse>> {
        self.transport
            .call(&endpoint::COLLECTION_LINKFILES, &request.to_params())
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if a position or file id list is
    /// empty, or a transport, status or parse error.
    pub async fn unlink_files(
        &self,
        collectionid: u64,
        unlink: &Unlink,
    ) -> Result<ApiResponse<CollectionResponse>> {
        unlink.validate()?;
        let mut params = collection_params(collectionid);
        unlink.push_to(&mut params);
        self.transport
            .call(&endpoint::COLLECTION_UNLINKFILES, &params)
            .await
    }

    /// Moves the item at position `item` to `position`. Both are 1-based.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn move_item(
        &self,
        collectionid: u64,
        item: u64,
        position: u64,
    ) -> Result<ApiResponse<Empty>> {
        let mut params = collection_params(collectionid);
        params
            .push_u64("item", item)
            .push_u64("position", position);
        self.transport.call(&endpoint::COLLECTION_MOVE, &params).await
    }
}
