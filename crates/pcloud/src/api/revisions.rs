//! Earlier versions of a file.

use serde::{Deserialize, Serialize};

use crate::{
    api::file::FileResponse,
    endpoint,
    error::Result,
    metadata::Metadata,
    request::Params,
    response::ApiResponse,
    timestamp::Timestamp,
    transport::Transport,
};

/// One stored revision.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Revision {
    #[serde(alias = "revisionsid")]
    pub revisionid: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<u64>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<Timestamp>,
}

/// Payload of `listrevisions`: the current file and its stored revisions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RevisionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

/// Revision endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RevisionsClient<'a> {
    transport: &'a Transport,
}

impl<'a> RevisionsClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn list(&self, fileid: u64) -> Result<ApiResponse<RevisionsResponse>> {
        let mut params = Params::new();
        params.push_u64("fileid", fileid);
        self.transport.call(&endpoint::LISTREVISIONS, &params).await
    }

    /// Makes `revisionid` the current content of the file.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn revert(&self, fileid: u64, revisionid: u64) -> Result<ApiResponse<FileResponse>> {
        let mut params = Params::new();
        params
            .push_u64("fileid", fileid)
            .push_u64("revisionid", revisionid);
        self.transport.call(&endpoint::REVERTREVISION, &params).await
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

    #[tokio::test]
    async fn test_list_decodes_revisions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listrevisions"))
            .and(query_param("fileid", "8"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(8, "draft.docx", false),
                "revisions": [
                    {"revisionid": 2, "size": 2048, "hash": 77, "created": "Wed, 06 Dec 2023 10:15:30 +0000"},
                    {"revisionid": 1, "size": 1024, "created": "Tue, 05 Dec 2023 09:00:00 +0000"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.revisions().list(8).await.unwrap();
        assert_eq!(response.data.revisions.len(), 2);
        assert_eq!(response.data.revisions[0].hash, Some(77));
        assert_eq!(response.data.revisions[1].size, 1024);
    }

    #[tokio::test]
    async fn test_revert_posts_both_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/revertrevision"))
            .respond_with(json_response(&json!({
                "result": 0,
                "metadata": metadata_json(8, "draft.docx", false)
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.revisions().revert(8, 1).await.unwrap();
        let pairs = form_pairs(&received(&server).await[0]);
        assert_eq!(
            pairs,
            [
                ("fileid".to_owned(), "8".to_owned()),
                ("revisionid".to_owned(), "1".to_owned())
            ]
        );
    }
}
