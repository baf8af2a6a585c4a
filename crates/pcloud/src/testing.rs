//! Helpers shared by the endpoint tests.

use serde_json::Value;
use wiremock::{MockServer, Request, ResponseTemplate};

use crate::PCloudClient;

pub(crate) const TOKEN: &str = "test-token";

/// A client pointed at `server` for both the API and the OAuth host.
pub(crate) fn client_for(server: &MockServer) -> PCloudClient {
    let base = format!("{}/", server.uri());
    PCloudClient::builder(TOKEN)
        .with_base_url(base.clone())
        .with_oauth_url(format!("{base}oauth2/"))
        .build()
        .expect("mock server url is a valid base")
}

/// A `200 OK` JSON response.
pub(crate) fn json_response(body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Returns `true` if the request carried an `Authorization` header.
pub(crate) fn has_authorization(request: &Request) -> bool {
    request.headers.contains_key("authorization")
}

/// Collects the received requests, panicking if the server was not recording.
pub(crate) async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
}

/// Decodes a URL-encoded form body into key/value pairs.
pub(crate) fn form_pairs(request: &Request) -> Vec<(String, String)> {
    let body = String::from_utf8_lossy(&request.body);
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |s: &str| {
                urlencoding::decode(&s.replace('+', " "))
                    .map(std::borrow::Cow::into_owned)
                    .unwrap_or_default()
            };
            (decode(key), decode(value))
        })
        .collect()
}

/// Returns the keys of a URL-encoded form body.
pub(crate) fn form_keys(request: &Request) -> Vec<String> {
    form_pairs(request).into_iter().map(|(k, _)| k).collect()
}

/// Returns the query keys of a request.
pub(crate) fn query_keys(request: &Request) -> Vec<String> {
    request
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect()
}

pub(crate) fn metadata_json(id: u64, name: &str, isfolder: bool) -> Value {
    let mut value = serde_json::json!({
        "id": if isfolder { format!("d{id}") } else { format!("f{id}") },
        "name": name,
        "isfolder": isfolder,
        "created": "Wed, 06 Dec 2023 10:15:30 +0000",
        "modified": "Wed, 06 Dec 2023 10:15:30 +0000",
        "parentfolderid": 0
    });
    let key = if isfolder { "folderid" } else { "fileid" };
    value[key] = Value::from(id);
    value
}
