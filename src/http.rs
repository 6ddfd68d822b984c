//! Request pipeline and response mapping
//!
//! Every API call goes through the same steps: build the URL, encode the
//! body, attach headers, send exactly one request through a [`Transport`],
//! then map the raw response to a typed value or an [`IntaSendError`].

use crate::types::ErrorEnvelope;
use crate::{IntaSendError, Result};
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the publishable key on key-gated endpoints
pub const PUBLIC_API_KEY_HEADER: &str = "X-IntaSend-Public-API-Key";

/// Second header carrying the same publishable key
pub const PUBLIC_KEY_ID_HEADER: &str = "X-IntaSend-Public-Key-Id";

const LOG_TARGET: &str = "intasend::http";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Patch => http::Method::PATCH,
        }
    }
}

/// Request payload
pub enum RequestBody {
    /// Sent as-is
    Bytes(Vec<u8>),
    /// Sent as-is
    Text(String),
    /// Read to the end and sent as-is
    Reader(Box<dyn Read + Send>),
    /// Encoded as JSON
    Json(serde_json::Value),
}

impl RequestBody {
    /// Encode any serializable value as a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(IntaSendError::Serialization)
    }

    /// Produce the bytes that go on the wire
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            RequestBody::Bytes(bytes) => Ok(bytes),
            RequestBody::Text(text) => Ok(text.into_bytes()),
            RequestBody::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .map_err(|e| IntaSendError::Serialization(serde_json::Error::io(e)))?;
                Ok(buf)
            }
            RequestBody::Json(value) => {
                serde_json::to_vec(&value).map_err(IntaSendError::Serialization)
            }
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RequestBody::Reader(_) => f.debug_tuple("Reader").field(&"<reader>").finish(),
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Description of a single API call
#[derive(Debug)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Path relative to the base URL, or an absolute URL
    pub endpoint: String,
    pub body: Option<RequestBody>,
    pub query: BTreeMap<String, String>,
    /// Applied after the default headers and may replace them
    pub headers: Vec<(String, String)>,
    /// Attach `Authorization: Bearer <token>`
    pub use_token: bool,
    /// Attach the publishable key headers
    pub use_api_key: bool,
}

impl RequestOptions {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: BTreeMap::new(),
            headers: Vec::new(),
            use_token: false,
            use_api_key: false,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(RequestBody::json(value)?);
        Ok(self)
    }

    /// Set one query parameter, replacing any earlier value for the key
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Merge a set of query parameters
    pub fn query_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.query.extend(params);
        self
    }

    /// Add a custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_token(mut self) -> Self {
        self.use_token = true;
        self
    }

    pub fn with_api_key(mut self) -> Self {
        self.use_api_key = true;
        self
    }
}

/// A request ready for the transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Response as received from the transport
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Status 400 and above is a failure
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends prepared requests
///
/// [`ReqwestTransport`] is used unless the client is built with another
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform exactly one HTTP exchange
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the fixed request timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IntaSendError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// Join an endpoint to the base URL and merge query parameters
///
/// Absolute endpoints are kept verbatim. Keys in `query` replace same-named
/// keys already present in the endpoint; other embedded keys are kept.
pub fn build_url(base_url: &str, endpoint: &str, query: &BTreeMap<String, String>) -> Result<String> {
    let full = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        let base = base_url.strip_suffix('/').unwrap_or(base_url);
        let path = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", base, path)
    };

    if query.is_empty() {
        return Ok(full);
    }

    let mut url = Url::parse(&full).map_err(|e| IntaSendError::Transport {
        message: format!("failed to build URL from {}: {}", full, e),
        source: Some(Box::new(e)),
    })?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !query.contains_key(key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    Ok(url.to_string())
}

/// Assemble request headers
///
/// Defaults first, then credentials, then the caller's custom headers.
pub fn build_headers(
    options: &RequestOptions,
    token: Option<&str>,
    publishable_key: Option<&str>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if options.body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if options.use_token {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }
    }

    if options.use_api_key {
        if let Some(key) = publishable_key.filter(|k| !k.is_empty()) {
            let value = header_value(key)?;
            headers.insert(HeaderName::from_static("x-intasend-public-api-key"), value.clone());
            headers.insert(HeaderName::from_static("x-intasend-public-key-id"), value);
        }
    }

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| IntaSendError::Transport {
            message: format!("invalid header name {:?}", name),
            source: Some(Box::new(e)),
        })?;
        headers.insert(name, header_value(value)?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| IntaSendError::Transport {
        message: "invalid header value".to_string(),
        source: Some(Box::new(e)),
    })
}

/// Mask a secret for logging
///
/// Tokens of ten characters or fewer are hidden completely; longer ones keep
/// their first and last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 10 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

fn mask_authorization(value: &str) -> String {
    match value.strip_prefix("Bearer ") {
        Some(token) => format!("Bearer {}", mask_token(token)),
        None => mask_token(value),
    }
}

/// Percent-encode an identifier for use as one path segment
pub(crate) fn path_segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Insert a query parameter only when a value is present
pub(crate) fn push_param<T: fmt::Display>(
    query: &mut BTreeMap<String, String>,
    key: &str,
    value: Option<T>,
) {
    if let Some(value) = value {
        query.insert(key.to_string(), value.to_string());
    }
}

/// Optional filters that become query parameters
pub trait QueryParams {
    /// Present fields only; absent fields are never sent as empty strings
    fn to_query(&self) -> BTreeMap<String, String>;
}

/// Turn a failure status into an [`IntaSendError::Api`]
pub fn error_for_status(response: RawResponse) -> Result<RawResponse> {
    if !response.is_error() {
        return Ok(response);
    }

    let status = response.status.as_u16();
    match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
        Ok(envelope) if !envelope.message.is_empty() => Err(IntaSendError::Api {
            status,
            message: envelope.message,
            errors: envelope.errors,
        }),
        _ => Err(IntaSendError::api(status, response.text())),
    }
}

/// Decode a success body into `T`
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(IntaSendError::Deserialization)
}

pub(crate) fn log_request(request: &PreparedRequest) {
    info!(target: LOG_TARGET, "=== HTTP REQUEST ===");
    info!(target: LOG_TARGET, "Method: {}", request.method);
    info!(target: LOG_TARGET, "URL: {}", request.url);
    info!(target: LOG_TARGET, "Headers:");
    for (name, value) in request.headers.iter() {
        let shown = value.to_str().unwrap_or("<binary>");
        if name == AUTHORIZATION {
            info!(target: LOG_TARGET, "  {}: {}", name, mask_authorization(shown));
        } else {
            info!(target: LOG_TARGET, "  {}: {}", name, shown);
        }
    }
    if let Some(body) = &request.body {
        info!(target: LOG_TARGET, "Request Body: {}", String::from_utf8_lossy(body));
    }
}

pub(crate) fn log_response(response: &RawResponse) {
    info!(target: LOG_TARGET, "=== HTTP RESPONSE ===");
    info!(target: LOG_TARGET, "Status Code: {}", response.status.as_u16());
    info!(target: LOG_TARGET, "Response Body: {}", response.text());
}

pub(crate) fn trace_exchange(request: &PreparedRequest) {
    debug!(target: LOG_TARGET, method = %request.method, url = %request.url, "sending request");
}
