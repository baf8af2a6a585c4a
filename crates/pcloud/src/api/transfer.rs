//! Sending a file to people by mail.

use bytes::Bytes;

use crate::{
    api::file::UploadProgressResponse,
    endpoint,
    error::{Result, ValidationError, require_text},
    request::{Params, ToParams},
    response::{ApiResponse, Empty},
    transport::{Transport, Upload},
};

/// Most recipients a single transfer may address.
pub const MAX_RECEIVERS: usize = 20;

/// Uploads a file and mails a download link to up to [`MAX_RECEIVERS`]
/// addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTransferRequest {
    sendermail: String,
    receivermails: Vec<String>,
    filename: String,
    content: Bytes,
    message: Option<String>,
    progresshash: Option<String>,
}

impl UploadTransferRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `sendermail` or `filename` is
    /// blank or no receiver is given, [`ValidationError::OutOfRange`] if more
    /// than [`MAX_RECEIVERS`] are given.
    pub fn new<I, S>(
        sendermail: impl Into<String>,
        receivermails: I,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sendermail = sendermail.into();
        let filename = filename.into();
        require_text("sendermail", &sendermail)?;
        require_text("filename", &filename)?;

        let receivermails: Vec<String> = receivermails.into_iter().map(Into::into).collect();
        if receivermails.is_empty() || receivermails.iter().any(|mail| mail.trim().is_empty()) {
            return Err(ValidationError::Empty {
                field: "receivermails",
            });
        }
        if receivermails.len() > MAX_RECEIVERS {
            return Err(ValidationError::OutOfRange {
                field: "receivermails",
                value: receivermails.len() as u64,
                min: 1,
                max: MAX_RECEIVERS as u64,
            });
        }

        Ok(Self {
            sendermail,
            receivermails,
            filename,
            content: content.into(),
            message: None,
            progresshash: None,
        })
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Key for polling [`TransferClient::progress`].
    #[must_use]
    pub fn progress_hash(mut self, hash: impl Into<String>) -> Self {
        self.progresshash = Some(hash.into());
        self
    }
}

impl ToParams for UploadTransferRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("sendermail", self.sendermail.as_str())
            .push("receivermails", self.receivermails.join(","))
            .push_opt("message", self.message.as_deref())
            .push_opt("progresshash", self.progresshash.as_deref());
        params
    }
}

/// Transfer endpoints.
#[derive(Debug, Clone, Copy)]
pub struct TransferClient<'a> {
    transport: &'a Transport,
}

impl<'a> TransferClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn upload(&self, request: &UploadTransferRequest) -> Result<ApiResponse<Empty>> {
        let upload = Upload::new(request.filename.clone(), request.content.clone());
        self.transport
            .call_multipart(&endpoint::UPLOADTRANSFER, &request.to_params(), upload)
            .await
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if `progresshash` is blank, or a
    /// transport, status or parse error.
    pub async fn progress(&self, progresshash: &str) -> Result<ApiResponse<UploadProgressResponse>> {
        require_text("progresshash", progresshash)?;
        let mut params = Params::new();
        params.push("progresshash", progresshash);
        self.transport
            .call(&endpoint::UPLOADTRANSFERPROGRESS, &params)
            .await
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
    use crate::testing::{client_for, json_response};

    #[test]
    fn test_receivers_are_comma_joined() {
        let params = UploadTransferRequest::new(
            "me@example.com",
            ["a@example.com", "b@example.com"],
            "slides.pdf",
            "pdf",
        )
        .unwrap()
        .to_params();
        assert_eq!(params.get("receivermails"), Some("a@example.com,b@example.com"));
        assert!(!params.contains("message"));
    }

    #[test]
    fn test_receivers_must_be_between_one_and_twenty() {
        let none = UploadTransferRequest::new("me@example.com", Vec::<String>::new(), "f", "x");
        assert!(matches!(
            none,
            Err(ValidationError::Empty {
                field: "receivermails"
            })
        ));

        let many: Vec<String> = (0..21).map(|i| format!("r{i}@example.com")).collect();
        let err = UploadTransferRequest::new("me@example.com", many, "f", "x").unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "receivermails",
                value: 21,
                min: 1,
                max: 20
            }
        );
    }

    #[tokio::test]
    async fn test_upload_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/uploadtransfer"))
            .and(body_string_contains("name=\"sendermail\"\r\n\r\nme@example.com"))
            .and(body_string_contains("filename=\"slides.pdf\""))
            .respond_with(json_response(&json!({"result": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request =
            UploadTransferRequest::new("me@example.com", ["a@example.com"], "slides.pdf", "pdf")
                .unwrap()
                .message("see attached");
        client.transfers().upload(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_progress_queries_hash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploadtransferprogress"))
            .and(query_param("progresshash", "tr-1"))
            .respond_with(json_response(&json!({"result": 0, "finished": true})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.transfers().progress("tr-1").await.unwrap();
        assert!(response.data.finished);
    }
}
