//! HTTP client for Azure Resource Manager.
//!
//! [`ArmClient`] is the entry point shared by every service crate. It owns the
//! HTTP transport, the credential, the ARM endpoint and the retry policy.
//!
//! # Examples
//!
//! ## Using developer tool credentials
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::auth::ArmCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .credential(ArmCredential::developer_tools()?)
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Targeting a sovereign cloud
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::auth::ArmCredential;
//! use azure_mgmt_core::cloud::CloudConfiguration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .cloud(CloudConfiguration::azure_china())
//!     .credential(ArmCredential::azure_cli()?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::ArmCredential;
use crate::cloud::CloudConfiguration;
use crate::error::{ArmError, ArmResult, ResponseError};
use crate::request::{ArmRequest, PathBuilder};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use url::Url;

use std::time::Duration;

/// Environment variable overriding the Resource Manager endpoint.
pub const ENV_ENDPOINT: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Environment variable supplying the default subscription.
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

const SDK_USER_AGENT: &str = concat!("azsdk-rust-mgmt/", env!("CARGO_PKG_VERSION"));

/// Determines if an HTTP status code represents a transient failure.
///
/// - 408 Request Timeout
/// - 429 Too Many Requests
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (zero based), with ±25% jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let base_backoff = self.initial_backoff * 2_u32.saturating_pow(attempt);
        let jitter = 0.75 + fastrand::f64() * 0.5;
        base_backoff.mul_f64(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Delay requested by the service through `retry-after-ms`,
/// `x-ms-retry-after-ms` or `Retry-After` (seconds or HTTP date).
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim);

    for name in ["retry-after-ms", "x-ms-retry-after-ms"] {
        if let Some(ms) = header(name).and_then(|v| v.parse::<u64>().ok()) {
            return Some(Duration::from_millis(ms));
        }
    }

    let value = header(RETRY_AFTER.as_str())?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delay = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
    Some(delay.to_std().unwrap_or(Duration::ZERO))
}

/// Decode a JSON body. An empty body decodes as `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ArmResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(body)?)
}

/// The base client for Azure Resource Manager.
///
/// Used by the service crates (`azure_mgmt_privatedns`, `azure_mgmt_storagecache`, ...)
/// to make API calls. The client is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ArmClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: ArmCredential,
    pub(crate) scope: String,
    pub(crate) subscription_id: Option<String>,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) user_agent: String,
}

/// Builder for constructing an [`ArmClient`].
///
/// Use [`ArmClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ArmClientBuilder {
    endpoint: Option<String>,
    cloud: Option<CloudConfiguration>,
    credential: Option<ArmCredential>,
    subscription_id: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    application_id: Option<String>,
}

impl ArmClient {
    /// Create a new builder for configuring an `ArmClient`.
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// Get the Resource Manager endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the subscription operations run against, if configured.
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    /// Get the OAuth scope requested for tokens.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Get the `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Start building an operation URL from a path template.
    pub fn path(&self, template: &str) -> PathBuilder<'_> {
        PathBuilder::new(self, template)
    }

    /// Send a request, retrying transient failures.
    ///
    /// Returns the response when its status code is in `expected`. Transient
    /// statuses (see [`is_retriable_status`]) are retried with the service's
    /// `Retry-After` delay or exponential backoff. Any other status becomes
    /// [`ArmError::Response`].
    pub async fn send(
        &self,
        request: &ArmRequest,
        expected: &[u16],
    ) -> ArmResult<reqwest::Response> {
        let auth = self.credential.resolve(&self.scope).await?;
        let mut attempt = 0;

        loop {
            let mut builder = self
                .http
                .request(request.method.clone(), request.url.clone())
                .headers(request.headers.clone())
                .header(AUTHORIZATION, &auth)
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, &self.user_agent);
            if let Some(body) = &request.body {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            tracing::trace!(method = %request.method, url = %request.url, attempt, "sending request");
            let response = builder.send().await?;
            let status = response.status().as_u16();

            if expected.contains(&status) {
                return Ok(response);
            }

            if !is_retriable_status(status) || attempt >= self.retry_policy.max_retries {
                tracing::debug!(method = %request.method, status, "unexpected response status");
                let err = ResponseError::from_response(&request.method, response).await;
                return Err(err.into());
            }

            let delay = retry_after(response.headers())
                .unwrap_or_else(|| self.retry_policy.backoff(attempt));
            tracing::debug!(status, attempt, delay_ms = delay.as_millis() as u64, "retrying transient failure");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: &ArmRequest,
        expected: &[u16],
    ) -> ArmResult<T> {
        let response = self.send(request, expected).await?;
        let body = response.bytes().await?;
        decode_body(&body)
    }
}

impl ArmClientBuilder {
    /// Set the Resource Manager endpoint.
    ///
    /// If not set, the builder checks the `AZURE_RESOURCE_MANAGER_ENDPOINT`
    /// environment variable and then falls back to the cloud's endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Select the Azure cloud. Defaults to [`CloudConfiguration::azure_public`].
    pub fn cloud(mut self, cloud: CloudConfiguration) -> Self {
        self.cloud = Some(cloud);
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder uses [`ArmCredential::from_env()`].
    pub fn credential(mut self, credential: ArmCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the subscription operations run against.
    ///
    /// If not set, the builder reads `AZURE_SUBSCRIPTION_ID`. Tenant-level
    /// services such as management groups do not need one.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout configuration
    /// via [`connect_timeout`](Self::connect_timeout) or
    /// [`read_timeout`](Self::read_timeout) is ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient errors.
    ///
    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Prefix the `User-Agent` header with an application id.
    pub fn application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// Build the `ArmClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint URL is invalid
    /// - The HTTP client cannot be created
    /// - Credential creation fails (when using environment-based credentials)
    pub fn build(self) -> ArmResult<ArmClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()?,
        };

        let cloud = self.cloud.unwrap_or_default();

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENV_ENDPOINT).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| cloud.endpoint.clone());

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| ArmError::invalid_endpoint_with_source("invalid endpoint URL", e))?;
        if endpoint.cannot_be_a_base() {
            return Err(ArmError::invalid_endpoint(format!(
                "endpoint {endpoint_str} cannot be used as a base URL"
            )));
        }

        let credential = self
            .credential
            .map(Ok)
            .unwrap_or_else(ArmCredential::from_env)?;

        let subscription_id = self
            .subscription_id
            .or_else(|| std::env::var(ENV_SUBSCRIPTION_ID).ok().filter(|v| !v.is_empty()));

        let user_agent = match self.application_id {
            Some(app) if !app.is_empty() => format!("{app} {SDK_USER_AGENT}"),
            _ => SDK_USER_AGENT.to_string(),
        };

        Ok(ArmClient {
            http,
            endpoint,
            credential,
            scope: cloud.scope(),
            subscription_id,
            retry_policy: self.retry_policy.unwrap_or_default(),
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup_mock_client, TEST_SUBSCRIPTION_ID, TEST_TOKEN};
    use reqwest::header::HeaderValue;
    use serial_test::serial;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn restore_env(name: &str, original: Option<String>) {
        match original {
            Some(val) => std::env::set_var(name, val),
            None => std::env::remove_var(name),
        }
    }

    fn build(endpoint: &str) -> ArmClient {
        ArmClient::builder()
            .endpoint(endpoint)
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build")
    }

    // --- Cycle 1: builder ---

    #[test]
    #[serial]
    fn builder_defaults_to_public_cloud() {
        let original = std::env::var(ENV_ENDPOINT).ok();
        std::env::remove_var(ENV_ENDPOINT);

        let client = ArmClient::builder()
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build");

        assert_eq!(client.endpoint().as_str(), "https://management.azure.com/");
        assert_eq!(client.scope(), "https://management.core.windows.net/.default");

        restore_env(ENV_ENDPOINT, original);
    }

    #[test]
    #[serial]
    fn builder_uses_cloud_endpoint_and_scope() {
        let original = std::env::var(ENV_ENDPOINT).ok();
        std::env::remove_var(ENV_ENDPOINT);

        let client = ArmClient::builder()
            .cloud(CloudConfiguration::azure_government())
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build");

        assert_eq!(client.endpoint().as_str(), "https://management.usgovcloudapi.net/");
        assert_eq!(client.scope(), "https://management.core.usgovcloudapi.net/.default");

        restore_env(ENV_ENDPOINT, original);
    }

    #[test]
    #[serial]
    fn builder_uses_endpoint_from_env() {
        let original = std::env::var(ENV_ENDPOINT).ok();
        std::env::set_var(ENV_ENDPOINT, "https://arm.contoso.test");

        let client = ArmClient::builder()
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build");

        assert_eq!(client.endpoint().as_str(), "https://arm.contoso.test/");

        restore_env(ENV_ENDPOINT, original);
    }

    #[test]
    #[serial]
    fn builder_endpoint_overrides_env() {
        let original = std::env::var(ENV_ENDPOINT).ok();
        std::env::set_var(ENV_ENDPOINT, "https://arm.contoso.test");

        let client = build("https://explicit.contoso.test");
        assert_eq!(client.endpoint().as_str(), "https://explicit.contoso.test/");

        restore_env(ENV_ENDPOINT, original);
    }

    #[test]
    #[serial]
    fn builder_reads_subscription_from_env() {
        let original = std::env::var(ENV_SUBSCRIPTION_ID).ok();
        std::env::set_var(ENV_SUBSCRIPTION_ID, "sub-from-env");

        let client = build("https://management.azure.com");
        assert_eq!(client.subscription_id(), Some("sub-from-env"));

        std::env::remove_var(ENV_SUBSCRIPTION_ID);
        let client = build("https://management.azure.com");
        assert_eq!(client.subscription_id(), None);

        restore_env(ENV_SUBSCRIPTION_ID, original);
    }

    #[test]
    fn builder_invalid_endpoint_url() {
        let result = ArmClient::builder()
            .endpoint("not a valid url")
            .credential(ArmCredential::access_token("test"))
            .build();

        assert!(matches!(result.unwrap_err(), ArmError::InvalidEndpoint { .. }));
    }

    #[test]
    fn builder_prefixes_user_agent_with_application_id() {
        let client = ArmClient::builder()
            .endpoint("https://management.azure.com")
            .credential(ArmCredential::access_token("test"))
            .application_id("my-app/1.0")
            .build()
            .expect("should build");

        assert!(client.user_agent().starts_with("my-app/1.0 azsdk-rust-mgmt/"));
    }

    #[test]
    fn default_retry_policy() {
        let client = build("https://management.azure.com");
        assert_eq!(client.retry_policy().max_retries, 3);
        assert_eq!(client.retry_policy().initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn client_is_cloneable() {
        let client = build("https://management.azure.com");
        let cloned = client.clone();
        assert_eq!(client.endpoint(), cloned.endpoint());
    }

    // --- Cycle 2: retry helpers ---

    #[test]
    fn identifies_retriable_http_errors() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(is_retriable_status(status), "{status} should be retriable");
        }
        for status in [200, 201, 400, 401, 403, 404, 409, 501] {
            assert!(!is_retriable_status(status), "{status} should not be retriable");
        }
    }

    #[test]
    fn retry_after_parses_seconds_and_milliseconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert("x-ms-retry-after-ms", HeaderValue::from_static("250"));
        assert_eq!(retry_after(&headers), Some(Duration::from_millis(250)));

        headers.insert("retry-after-ms", HeaderValue::from_static("100"));
        assert_eq!(retry_after(&headers), Some(Duration::from_millis(100)));
    }

    #[test]
    fn retry_after_in_the_past_is_zero() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), Some(Duration::ZERO));
    }

    #[test]
    fn retry_after_absent_or_garbage() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn backoff_grows_with_jitter_bounds() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        };
        for attempt in 0..3 {
            let base = 100.0 * 2f64.powi(attempt as i32);
            let ms = policy.backoff(attempt).as_secs_f64() * 1000.0;
            assert!(ms >= base * 0.75 - 1.0 && ms <= base * 1.25 + 1.0, "attempt {attempt}: {ms}");
        }
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let value: Option<serde_json::Value> = decode_body(b"").unwrap();
        assert!(value.is_none());
        let value: serde_json::Value = decode_body(br#"{"a":1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    // --- Cycle 3: sending ---

    #[tokio::test]
    async fn send_attaches_auth_accept_and_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/subscriptions/{TEST_SUBSCRIPTION_ID}")))
            .and(query_param("api-version", "2022-12-01"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client
            .path("/subscriptions/{subscriptionId}")
            .subscription()
            .unwrap()
            .into_url("2022-12-01")
            .unwrap();

        let body: serde_json::Value = client
            .send_json(&ArmRequest::get(url), &[200])
            .await
            .expect("should succeed");
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn send_serializes_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/thing"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"location": "westus"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "/thing"})))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/thing").into_url("1").unwrap();
        let request = ArmRequest::put(url)
            .json(&serde_json::json!({"location": "westus"}))
            .unwrap();

        let response = client.send(&request, &[200, 201]).await.expect("should succeed");
        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn unexpected_status_becomes_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("x-ms-error-code", "ResourceNotFound")
                    .set_body_json(serde_json::json!({
                        "error": {"code": "ResourceNotFound", "message": "The resource was not found."}
                    })),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/missing").into_url("1").unwrap();
        let err = client.send(&ArmRequest::get(url), &[200]).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_code(), Some("ResourceNotFound"));
        match err {
            ArmError::Response(resp) => {
                assert_eq!(resp.method, reqwest::Method::GET);
                assert!(resp.url.ends_with("/missing"));
                assert!(!resp.url.contains("api-version"));
                assert!(resp.body.contains("The resource was not found."));
            }
            other => panic!("Expected Response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_status_outside_expected_set_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/thing").into_url("1").unwrap();
        let err = client
            .send(&ArmRequest::delete(url), &[200, 204])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(202));
    }

    // --- Cycle 4: retry ---

    #[tokio::test]
    async fn retries_on_503_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/flaky").into_url("1").unwrap();
        let response = client.send(&ArmRequest::get(url), &[200]).await.expect("should retry");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn retries_honour_retry_after_ms() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/throttled"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after-ms", "10"))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/throttled"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/throttled").into_url("1").unwrap();
        let response = client.send(&ArmRequest::get(url), &[200]).await.expect("should retry");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500).set_body_string("the system is down"))
            .expect(4)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/down").into_url("1").unwrap();
        let err = client.send(&ArmRequest::get(url), &[200]).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("the system is down"));
    }

    #[tokio::test]
    async fn expected_transient_status_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/odd"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/odd").into_url("1").unwrap();
        let response = client.send(&ArmRequest::get(url), &[503]).await.expect("expected status");
        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn non_retriable_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let url = client.path("/bad").into_url("1").unwrap();
        let err = client.send(&ArmRequest::get(url), &[200]).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn request_times_out_with_configured_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = ArmClient::builder()
            .endpoint(server.uri())
            .credential(ArmCredential::access_token(TEST_TOKEN))
            .read_timeout(Duration::from_millis(50))
            .build()
            .expect("should build");

        let url = client.path("/slow").into_url("1").unwrap();
        let err = client.send(&ArmRequest::get(url), &[200]).await.unwrap_err();
        assert!(matches!(err, ArmError::Request(ref e) if e.is_timeout()));
    }
}
