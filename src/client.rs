//! IntaSend API client

use crate::http::{
    build_headers, build_url, decode_json, error_for_status, log_request, log_response,
    trace_exchange, PreparedRequest, RawResponse, RequestBody, RequestOptions, ReqwestTransport,
    Transport,
};
use crate::types::Environment;
use crate::{IntaSendError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::sync::Arc;
use tracing::debug;

/// Environment variable holding the publishable key
pub const ENV_PUBLISHABLE_KEY: &str = "INTASEND_PUBLISHABLE_KEY";
/// Environment variable holding the secret token
pub const ENV_TOKEN: &str = "INTASEND_TOKEN";
/// Environment variable selecting the sandbox when truthy
pub const ENV_TEST_MODE: &str = "INTASEND_TEST_MODE";
/// Environment variable enabling request/response logging when truthy
pub const ENV_SHOW_LOGS: &str = "INTASEND_SHOW_LOGS";

/// Client configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Target deployment
    pub environment: Environment,
    /// Publishable key for key-gated endpoints
    pub publishable_key: Option<String>,
    /// Secret token for token-gated endpoints
    pub token: Option<String>,
    /// Log every request and response at INFO level
    pub show_logs: bool,
}

impl ClientConfig {
    /// Create a production configuration with both credentials
    pub fn new(publishable_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            publishable_key: non_empty(publishable_key.into()),
            token: non_empty(token.into()),
            ..Default::default()
        }
    }

    /// Read the configuration from `INTASEND_*` environment variables
    ///
    /// Missing or empty variables leave the corresponding setting unset.
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_test_mode(env_flag(ENV_TEST_MODE)),
            publishable_key: env::var(ENV_PUBLISHABLE_KEY).ok().and_then(non_empty),
            token: env::var(ENV_TOKEN).ok().and_then(non_empty),
            show_logs: env_flag(ENV_SHOW_LOGS),
        }
    }

    pub fn with_publishable_key(mut self, publishable_key: impl Into<String>) -> Self {
        self.publishable_key = non_empty(publishable_key.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = non_empty(token.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Target the sandbox deployment
    pub fn with_sandbox(self) -> Self {
        self.with_environment(Environment::Sandbox)
    }

    /// Target the sandbox when `test` is true, production otherwise
    pub fn with_test_mode(self, test: bool) -> Self {
        self.with_environment(Environment::from_test_mode(test))
    }

    pub fn with_logs(mut self, show_logs: bool) -> Self {
        self.show_logs = show_logs;
        self
    }

    /// Base URL selected by the environment
    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("publishable_key", &self.publishable_key)
            .field("token", &self.token.as_deref().map(crate::http::mask_token))
            .field("show_logs", &self.show_logs)
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Client for the IntaSend REST API
///
/// Cheap to clone; clones share the same transport.
#[derive(Debug, Clone)]
pub struct IntaSendClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl IntaSendClient {
    /// Create a client backed by [`ReqwestTransport`]
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    /// Create a client that sends requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &'static str {
        self.config.base_url()
    }

    /// Resolve URL, headers and body without sending anything
    pub fn prepare(&self, options: RequestOptions) -> Result<PreparedRequest> {
        let url = build_url(self.base_url(), &options.endpoint, &options.query)?;
        let headers = build_headers(
            &options,
            self.config.token.as_deref(),
            self.config.publishable_key.as_deref(),
        )?;
        let body = options.body.map(RequestBody::into_bytes).transpose()?;

        Ok(PreparedRequest {
            method: options.method,
            url,
            headers,
            body,
        })
    }

    /// Send one request and return the response whatever its status
    pub async fn execute(&self, options: RequestOptions) -> Result<RawResponse> {
        let request = self.prepare(options)?;

        if self.config.show_logs {
            log_request(&request);
        } else {
            trace_exchange(&request);
        }

        let response = self.transport.send(request).await?;

        if self.config.show_logs {
            log_response(&response);
        } else {
            debug!(target: "intasend::http", status = response.status.as_u16(), "received response");
        }

        Ok(response)
    }

    /// Send one request and decode a success body into `T`
    pub async fn execute_json<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<T> {
        let response = error_for_status(self.execute(options).await?)?;
        decode_json(&response.body)
    }

    /// Send one request and return a success body without parsing it
    pub async fn execute_bytes(&self, options: RequestOptions) -> Result<Vec<u8>> {
        let response = error_for_status(self.execute(options).await?)?;
        Ok(response.body)
    }

    /// GET an endpoint
    pub async fn get(&self, endpoint: &str, use_token: bool, use_api_key: bool) -> Result<RawResponse> {
        self.execute(flags(RequestOptions::get(endpoint), use_token, use_api_key))
            .await
    }

    /// POST a body to an endpoint
    pub async fn post(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        use_token: bool,
        use_api_key: bool,
    ) -> Result<RawResponse> {
        self.execute(with_body(RequestOptions::post(endpoint), body, use_token, use_api_key))
            .await
    }

    /// PUT a body to an endpoint
    pub async fn put(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        use_token: bool,
        use_api_key: bool,
    ) -> Result<RawResponse> {
        self.execute(with_body(RequestOptions::put(endpoint), body, use_token, use_api_key))
            .await
    }

    /// DELETE an endpoint
    pub async fn delete(&self, endpoint: &str, use_token: bool, use_api_key: bool) -> Result<RawResponse> {
        self.execute(flags(RequestOptions::delete(endpoint), use_token, use_api_key))
            .await
    }

    /// PATCH an endpoint
    pub async fn patch(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        use_token: bool,
        use_api_key: bool,
    ) -> Result<RawResponse> {
        self.execute(with_body(RequestOptions::patch(endpoint), body, use_token, use_api_key))
            .await
    }

    /// GET an endpoint and decode the result
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        use_token: bool,
        use_api_key: bool,
    ) -> Result<T> {
        self.execute_json(flags(RequestOptions::get(endpoint), use_token, use_api_key))
            .await
    }

    /// POST a JSON body and decode the result
    pub async fn post_json<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        use_token: bool,
        use_api_key: bool,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::post(endpoint).json(body)?;
        self.execute_json(flags(options, use_token, use_api_key)).await
    }

    pub(crate) fn require_token(&self) -> Result<()> {
        match self.config.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(()),
            _ => Err(IntaSendError::validation("token is required for this operation")),
        }
    }

    pub(crate) fn require_publishable_key(&self) -> Result<()> {
        match self.config.publishable_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(IntaSendError::validation(
                "publishable key is required for this operation",
            )),
        }
    }
}

fn flags(mut options: RequestOptions, use_token: bool, use_api_key: bool) -> RequestOptions {
    options.use_token = use_token;
    options.use_api_key = use_api_key;
    options
}

fn with_body(
    mut options: RequestOptions,
    body: Option<RequestBody>,
    use_token: bool,
    use_api_key: bool,
) -> RequestOptions {
    options.body = body;
    flags(options, use_token, use_api_key)
}

/// Reject empty identifiers before they reach a URL
pub(crate) fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(IntaSendError::validation(format!("{} is required", what)))
    } else {
        Ok(trimmed)
    }
}
