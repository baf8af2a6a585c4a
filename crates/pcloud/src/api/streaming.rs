//! Download and streaming links for files the user owns.
//!
//! The request types here are shared with the public-link endpoints in
//! [`crate::api::link`]: build them with `new(fileid)` for the user's own
//! files, or with `public(code, ..)` for content behind a public link.

use serde::{Deserialize, Serialize};

use crate::{
    endpoint,
    error::{Result, ValidationError, require_range, require_text},
    request::{Params, ToParams},
    response::ApiResponse,
    timestamp::Timestamp,
    transport::{Download, Transport},
};

/// Payload of the single-link endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StreamingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl StreamingResponse {
    /// The full URL on the first host, if the server returned one.
    pub fn url(&self) -> Option<String> {
        download_url(&self.hosts, self.path.as_deref())
    }
}

pub(crate) fn download_url(hosts: &[String], path: Option<&str>) -> Option<String> {
    let host = hosts.first()?;
    Some(format!("https://{host}{}", path?))
}

/// One transcoded rendition of a video.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VideoVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isoriginal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcodetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videocodec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiocodec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videobitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiobitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiosamplerate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
}

impl VideoVariant {
    pub fn url(&self) -> Option<String> {
        download_url(&self.hosts, self.path.as_deref())
    }
}

/// Payload of `getvideolinks` and `getpubvideolinks`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VideoLinksResponse {
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

/// Which file a link request refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Source {
    /// A file owned by (or shared with) the user.
    File(u64),
    /// Content behind a public link. `fileid` picks a file inside a folder
    /// link.
    Link { code: String, fileid: Option<u64> },
}

impl Source {
    pub(crate) fn link(code: impl Into<String>, fileid: Option<u64>) -> Result<Self, ValidationError> {
        let code = code.into();
        require_text("code", &code)?;
        Ok(Self::Link { code, fileid })
    }

    pub(crate) fn push_to(&self, params: &mut Params) {
        match self {
            Self::File(fileid) => {
                params.push_u64("fileid", *fileid);
            }
            Self::Link { code, fileid } => {
                params
                    .push("code", code.as_str())
                    .push_opt_u64("fileid", *fileid);
            }
        }
    }
}

fn audio_bitrate(kbps: u32) -> Result<u32, ValidationError> {
    require_range("abitrate", kbps, 16, 320)
}

fn video_bitrate(kbps: u32) -> Result<u32, ValidationError> {
    require_range("vbitrate", kbps, 16, 4000)
}

fn resolution(value: String) -> Result<String, ValidationError> {
    let valid = value
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
    if valid {
        Ok(value)
    } else {
        Err(ValidationError::Invalid {
            field: "resolution",
            reason: "expected WIDTHxHEIGHT",
        })
    }
}

/// A plain download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLinkRequest {
    source: Source,
    forcedownload: bool,
    contenttype: Option<String>,
    maxspeed: Option<u64>,
    skipfilename: bool,
}

impl FileLinkRequest {
    pub fn new(fileid: u64) -> Self {
        Self::with_source(Source::File(fileid))
    }

    /// A link to content behind a public link `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn public(code: impl Into<String>, fileid: Option<u64>) -> Result<Self, ValidationError> {
        Ok(Self::with_source(Source::link(code, fileid)?))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            forcedownload: false,
            contenttype: None,
            maxspeed: None,
            skipfilename: false,
        }
    }

    /// Serves the file as an attachment.
    #[must_use]
    pub fn force_download(mut self, value: bool) -> Self {
        self.forcedownload = value;
        self
    }

    /// Overrides the served `Content-Type`.
    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.contenttype = Some(value.into());
        self
    }

    /// Caps the download speed, in bytes per second.
    #[must_use]
    pub fn max_speed(mut self, bytes_per_second: u64) -> Self {
        self.maxspeed = Some(bytes_per_second);
        self
    }

    /// Omits the filename from the returned path.
    #[must_use]
    pub fn skip_filename(mut self, value: bool) -> Self {
        self.skipfilename = value;
        self
    }
}

impl ToParams for FileLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.source.push_to(&mut params);
        params
            .push_flag("forcedownload", self.forcedownload)
            .push_opt("contenttype", self.contenttype.as_deref())
            .push_opt_u64("maxspeed", self.maxspeed)
            .push_flag("skipfilename", self.skipfilename);
        params
    }
}

/// A transcoded video stream link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLinkRequest {
    link: FileLinkRequest,
    abitrate: Option<u32>,
    vbitrate: Option<u32>,
    resolution: Option<String>,
    fixedbitrate: bool,
}

impl VideoLinkRequest {
    pub fn new(fileid: u64) -> Self {
        Self {
            link: FileLinkRequest::new(fileid),
            abitrate: None,
            vbitrate: None,
            resolution: None,
            fixedbitrate: false,
        }
    }

    #[must_use]
    pub fn force_download(mut self, value: bool) -> Self {
        self.link = self.link.force_download(value);
        self
    }

    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.link = self.link.content_type(value);
        self
    }

    #[must_use]
    pub fn max_speed(mut self, bytes_per_second: u64) -> Self {
        self.link = self.link.max_speed(bytes_per_second);
        self
    }

    #[must_use]
    pub fn skip_filename(mut self, value: bool) -> Self {
        self.link = self.link.skip_filename(value);
        self
    }

    /// Audio bitrate in kbit/s.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] outside `16..=320`.
    pub fn audio_bitrate(mut self, kbps: u32) -> Result<Self, ValidationError> {
        self.abitrate = Some(audio_bitrate(kbps)?);
        Ok(self)
    }

    /// Video bitrate in kbit/s.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] outside `16..=4000`.
    pub fn video_bitrate(mut self, kbps: u32) -> Result<Self, ValidationError> {
        self.vbitrate = Some(video_bitrate(kbps)?);
        Ok(self)
    }

    /// Target resolution, e.g. `1280x720`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] unless `value` is `WIDTHxHEIGHT`.
    pub fn resolution(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.resolution = Some(resolution(value.into())?);
        Ok(self)
    }

    /// Disables adaptive bitrate.
    #[must_use]
    pub fn fixed_bitrate(mut self, value: bool) -> Self {
        self.fixedbitrate = value;
        self
    }
}

impl ToParams for VideoLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = self.link.to_params();
        params
            .push_opt_num("abitrate", self.abitrate)
            .push_opt_num("vbitrate", self.vbitrate)
            .push_opt("resolution", self.resolution.as_deref())
            .push_flag("fixedbitrate", self.fixedbitrate);
        params
    }
}

/// A transcoded audio stream link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioLinkRequest {
    source: Source,
    forcedownload: bool,
    contenttype: Option<String>,
    abitrate: Option<u32>,
}

impl AudioLinkRequest {
    pub fn new(fileid: u64) -> Self {
        Self::with_source(Source::File(fileid))
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn public(code: impl Into<String>, fileid: Option<u64>) -> Result<Self, ValidationError> {
        Ok(Self::with_source(Source::link(code, fileid)?))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            forcedownload: false,
            contenttype: None,
            abitrate: None,
        }
    }

    #[must_use]
    pub fn force_download(mut self, value: bool) -> Self {
        self.forcedownload = value;
        self
    }

    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.contenttype = Some(value.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] outside `16..=320`.
    pub fn audio_bitrate(mut self, kbps: u32) -> Result<Self, ValidationError> {
        self.abitrate = Some(audio_bitrate(kbps)?);
        Ok(self)
    }
}

impl ToParams for AudioLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.source.push_to(&mut params);
        params
            .push_flag("forcedownload", self.forcedownload)
            .push_opt("contenttype", self.contenttype.as_deref())
            .push_opt_num("abitrate", self.abitrate);
        params
    }
}

/// An HTTP Live Streaming playlist link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HlsLinkRequest {
    fileid: u64,
    abitrate: Option<u32>,
    vbitrate: Option<u32>,
    resolution: Option<String>,
    skipfilename: bool,
}

impl HlsLinkRequest {
    pub fn new(fileid: u64) -> Self {
        Self {
            fileid,
            abitrate: None,
            vbitrate: None,
            resolution: None,
            skipfilename: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] outside `16..=320`.
    pub fn audio_bitrate(mut self, kbps: u32) -> Result<Self, ValidationError> {
        self.abitrate = Some(audio_bitrate(kbps)?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] outside `16..=4000`.
    pub fn video_bitrate(mut self, kbps: u32) -> Result<Self, ValidationError> {
        self.vbitrate = Some(video_bitrate(kbps)?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] unless `value` is `WIDTHxHEIGHT`.
    pub fn resolution(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.resolution = Some(resolution(value.into())?);
        Ok(self)
    }

    #[must_use]
    pub fn skip_filename(mut self, value: bool) -> Self {
        self.skipfilename = value;
        self
    }
}

impl ToParams for HlsLinkRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_u64("fileid", self.fileid)
            .push_opt_num("abitrate", self.abitrate)
            .push_opt_num("vbitrate", self.vbitrate)
            .push_opt("resolution", self.resolution.as_deref())
            .push_flag("skipfilename", self.skipfilename);
        params
    }
}

/// Fetches a text file, optionally re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFileRequest {
    source: Source,
    fromencoding: Option<String>,
    toencoding: Option<String>,
    forcedownload: bool,
    contenttype: Option<String>,
}

impl TextFileRequest {
    pub fn new(fileid: u64) -> Self {
        Self::with_source(Source::File(fileid))
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `code` is blank.
    pub fn public(code: impl Into<String>, fileid: Option<u64>) -> Result<Self, ValidationError> {
        Ok(Self::with_source(Source::link(code, fileid)?))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            fromencoding: None,
            toencoding: None,
            forcedownload: false,
            contenttype: None,
        }
    }

    /// Source encoding; guessed by the server when unset.
    #[must_use]
    pub fn from_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.fromencoding = Some(encoding.into());
        self
    }

    /// Target encoding; UTF-8 when unset.
    #[must_use]
    pub fn to_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.toencoding = Some(encoding.into());
        self
    }

    #[must_use]
    pub fn force_download(mut self, value: bool) -> Self {
        self.forcedownload = value;
        self
    }

    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.contenttype = Some(value.into());
        self
    }
}

impl ToParams for TextFileRequest {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        self.source.push_to(&mut params);
        params
            .push_opt("fromencoding", self.fromencoding.as_deref())
            .push_opt("toencoding", self.toencoding.as_deref())
            .push_flag("forcedownload", self.forcedownload)
            .push_opt("contenttype", self.contenttype.as_deref());
        params
    }
}

/// Streaming endpoints.
#[derive(Debug, Clone, Copy)]
pub struct StreamingClient<'a> {
    transport: &'a Transport,
}

impl<'a> StreamingClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Returns a download link for a file.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn file_link(&self, request: &FileLinkRequest) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETFILELINK, &request.to_params())
            .await
    }

    /// Returns a link to a transcoded video stream.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn video_link(
        &self,
        request: &VideoLinkRequest,
    ) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETVIDEOLINK, &request.to_params())
            .await
    }

    /// Returns links to every available rendition of a video.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn video_links(
        &self,
        request: &FileLinkRequest,
    ) -> Result<ApiResponse<VideoLinksResponse>> {
        self.transport
            .call(&endpoint::GETVIDEOLINKS, &request.to_params())
            .await
    }

    /// Returns a link to an MP3 audio stream.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn audio_link(
        &self,
        request: &AudioLinkRequest,
    ) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETAUDIOLINK, &request.to_params())
            .await
    }

    /// Returns an HLS playlist link.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error.
    pub async fn hls_link(&self, request: &HlsLinkRequest) -> Result<ApiResponse<StreamingResponse>> {
        self.transport
            .call(&endpoint::GETHLSLINK, &request.to_params())
            .await
    }

    /// Downloads a text file.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn text_file(&self, request: &TextFileRequest) -> Result<Download> {
        self.transport
            .download(&endpoint::GETTEXTFILE, &request.to_params())
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param, query_param_is_missing},
    };

    use super::*;
    use crate::testing::{client_for, json_response, query_keys, received};

    #[test]
    fn test_video_audio_bitrate_out_of_range_fails() {
        let err = VideoLinkRequest::new(1).audio_bitrate(500).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "abitrate",
                value: 500,
                min: 16,
                max: 320
            }
        );
    }

    #[test]
    fn test_video_bitrate_bounds() {
        assert!(VideoLinkRequest::new(1).video_bitrate(4000).is_ok());
        assert!(VideoLinkRequest::new(1).video_bitrate(4001).is_err());
        assert!(HlsLinkRequest::new(1).video_bitrate(15).is_err());
        assert!(AudioLinkRequest::new(1).audio_bitrate(16).is_ok());
    }

    #[test]
    fn test_resolution_must_be_width_by_height() {
        assert!(VideoLinkRequest::new(1).resolution("1280x720").is_ok());
        assert!(VideoLinkRequest::new(1).resolution("720p").is_err());
    }

    #[test]
    fn test_video_link_params_use_wire_names() {
        let params = VideoLinkRequest::new(7)
            .audio_bitrate(128)
            .unwrap()
            .video_bitrate(2000)
            .unwrap()
            .resolution("1280x720")
            .unwrap()
            .fixed_bitrate(true)
            .to_params();
        assert_eq!(
            params.to_query_string(),
            "fileid=7&abitrate=128&vbitrate=2000&resolution=1280x720&fixedbitrate=1"
        );
    }

    #[test]
    fn test_public_source_requires_code() {
        assert!(FileLinkRequest::public("", None).is_err());
        let params = FileLinkRequest::public("XZabc", Some(3)).unwrap().to_params();
        assert_eq!(params.to_query_string(), "code=XZabc&fileid=3");
    }

    #[test]
    fn test_streaming_response_url_joins_first_host() {
        let response: StreamingResponse = serde_json::from_value(json!({
            "path": "/cBZ/file.mp4",
            "hosts": ["p-def1.pcloud.com", "p-def2.pcloud.com"],
            "expires": "Wed, 06 Dec 2023 10:15:30 +0000"
        }))
        .unwrap();
        assert_eq!(
            response.url().as_deref(),
            Some("https://p-def1.pcloud.com/cBZ/file.mp4")
        );
        assert!(StreamingResponse::default().url().is_none());
    }

    #[tokio::test]
    async fn test_file_link_decodes_hosts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getfilelink"))
            .and(query_param("fileid", "42"))
            .and(query_param("forcedownload", "1"))
            .and(query_param_is_missing("maxspeed"))
            .respond_with(json_response(&json!({
                "result": 0,
                "path": "/abc/report.pdf",
                "hosts": ["c1.pcloud.com"],
                "expires": "Thu, 07 Dec 2023 10:15:30 +0000"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .streaming()
            .file_link(&FileLinkRequest::new(42).force_download(true))
            .await
            .unwrap();
        assert_eq!(
            response.data.url().as_deref(),
            Some("https://c1.pcloud.com/abc/report.pdf")
        );
    }

    #[tokio::test]
    async fn test_video_links_decodes_variants() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getvideolinks"))
            .respond_with(json_response(&json!({
                "result": 0,
                "variants": [
                    {"path": "/v/orig.mp4", "hosts": ["v1.pcloud.com"], "isoriginal": true, "width": 1920, "height": 1080},
                    {"path": "/v/360.mp4", "hosts": ["v1.pcloud.com"], "isoriginal": false, "width": 640, "height": 360}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .streaming()
            .video_links(&FileLinkRequest::new(1))
            .await
            .unwrap();
        assert_eq!(response.data.variants.len(), 2);
        assert_eq!(response.data.variants[1].height, Some(360));
    }

    #[tokio::test]
    async fn test_text_file_returns_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gettextfile"))
            .and(query_param("toencoding", "utf-8"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("hello, world", "text/plain; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let download = client
            .streaming()
            .text_file(&TextFileRequest::new(5).to_encoding("utf-8"))
            .await
            .unwrap();
        assert_eq!(download.content_type(), Some("text/plain; charset=utf-8"));
        assert_eq!(download.content_length(), Some(12));
        assert_eq!(download.text().await.unwrap(), "hello, world");
    }

    #[tokio::test]
    async fn test_hls_link_sends_only_set_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gethlslink"))
            .respond_with(json_response(&json!({"result": 0, "path": "/hls.m3u8", "hosts": ["h.pcloud.com"]})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = HlsLinkRequest::new(3).audio_bitrate(64).unwrap();
        client.streaming().hls_link(&request).await.unwrap();
        assert_eq!(query_keys(&received(&server).await[0]), ["fileid", "abitrate"]);
    }
}
