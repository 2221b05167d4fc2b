//! Error types shared by every Azure Resource Manager crate.
//!
//! Any response whose status code is not in an operation's expected set is
//! turned into a [`ResponseError`] and surfaced as [`ArmError::Response`].

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Header carrying the service's error code, preferred over the body.
pub const HEADER_ERROR_CODE: &str = "x-ms-error-code";

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// Errors that can occur when interacting with Azure Resource Manager.
#[derive(Error, Debug)]
pub enum ArmError {
    /// The service answered with a status code the operation does not expect.
    #[error("{0}")]
    Response(Box<ResponseError>),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A URL could not be parsed or constructed.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A path parameter was empty.
    #[error("parameter {0} cannot be empty")]
    EmptyParameter(String),

    /// A request could not be assembled.
    #[error("Invalid request: {0}")]
    Builder(String),

    /// A long-running operation could not be tracked.
    #[error("Polling error: {0}")]
    Polling(String),

    /// A long-running operation reached the `Failed` or `Canceled` state.
    #[error("Operation {state}: {message}")]
    OperationFailed {
        state: String,
        code: Option<String>,
        message: String,
    },
}

impl ArmError {
    /// Create an [`ArmError::InvalidEndpoint`] wrapping a URL parse error.
    pub fn invalid_endpoint_with_source(message: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: format!("{}: {source}", message.into()),
            source: Some(source),
        }
    }

    /// Create an [`ArmError::InvalidEndpoint`] without an underlying cause.
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: None,
        }
    }

    /// The HTTP status code, for errors produced from a service response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(err) => Some(err.status_code),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The service error code, when one is known.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Response(err) => err.error_code.as_deref(),
            Self::OperationFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<ResponseError> for ArmError {
    fn from(err: ResponseError) -> Self {
        Self::Response(Box::new(err))
    }
}

/// Result type alias for Azure Resource Manager operations.
pub type ArmResult<T> = std::result::Result<T, ArmError>;

/// An unexpected response returned by the service.
#[derive(Debug, Clone)]
pub struct ResponseError {
    /// HTTP method of the failed request.
    pub method: Method,

    /// Request URL without its query string.
    pub url: String,

    /// Status code of the response.
    pub status_code: u16,

    /// Canonical reason phrase for the status code.
    pub reason: String,

    /// Error code from the `x-ms-error-code` header or the response body.
    pub error_code: Option<String>,

    /// Redacted, possibly truncated response body.
    pub body: String,
}

impl ResponseError {
    /// Maximum length of the captured body.
    const MAX_BODY_LEN: usize = 4000;

    /// Consume a response and capture the details needed to report it.
    pub async fn from_response(method: &Method, response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let mut url = response.url().clone();
        url.set_query(None);
        url.set_fragment(None);

        let body = response.text().await.unwrap_or_default();
        Self::new(method.clone(), url.as_str(), status, &headers, &body)
    }

    /// Build a response error from already captured parts.
    pub fn new(
        method: Method,
        url: &str,
        status: StatusCode,
        headers: &HeaderMap,
        body: &str,
    ) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();

        let error_code = headers
            .get(HEADER_ERROR_CODE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| parsed.as_ref().and_then(error_code_from_body));

        let pretty = match &parsed {
            Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| body.to_string()),
            None => body.to_string(),
        };

        Self {
            method,
            url: url.to_string(),
            status_code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            error_code,
            body: truncate_message(&pretty, Self::MAX_BODY_LEN),
        }
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "RESPONSE {}: {}", self.status_code, self.reason)?;
        match &self.error_code {
            Some(code) => writeln!(f, "ERROR CODE: {code}")?,
            None => writeln!(f, "ERROR CODE UNAVAILABLE")?,
        }
        writeln!(f, "{SEPARATOR}")?;
        if self.body.trim().is_empty() {
            writeln!(f, "Response contained no body")?;
        } else {
            writeln!(f, "{}", self.body)?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

/// Extract `error.code` or a top-level `code` from an ARM error body.
fn error_code_from_body(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| body.get("code"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
}

/// Extract `(code, message)` from an ARM error body, looking at `error` first.
pub(crate) fn error_details_from_body(body: &serde_json::Value) -> (Option<String>, Option<String>) {
    let source = body.get("error").unwrap_or(body);
    let field = |name: &str| {
        source
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    (field("code"), field("message"))
}

/// Redact bearer tokens and SAS signatures from a message.
pub(crate) fn sanitize_error_message(msg: &str) -> String {
    let mut result = redact_after(msg, "Bearer ");
    result = redact_after(&result, "sig=");
    result
}

/// Replace the token that follows every occurrence of `marker` with `[REDACTED]`.
fn redact_after(msg: &str, marker: &str) -> String {
    const REDACTED: &str = "[REDACTED]";

    let mut result = msg.to_string();
    let mut search_start = 0;
    while search_start < result.len() {
        let Some(relative_pos) = result[search_start..].find(marker) else {
            break;
        };
        let token_start = search_start + relative_pos + marker.len();
        if token_start >= result.len() {
            break;
        }
        if result[token_start..].starts_with(REDACTED) {
            search_start = token_start + REDACTED.len();
            continue;
        }

        let token_end = result[token_start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '&'))
            .map(|pos| token_start + pos)
            .unwrap_or(result.len());

        if token_end > token_start {
            result.replace_range(token_start..token_end, REDACTED);
            search_start = token_start + REDACTED.len();
        } else {
            search_start = token_start;
        }
    }
    result
}

/// Sanitize, then truncate a message to at most `max_len` bytes.
pub(crate) fn truncate_message(msg: &str, max_len: usize) -> String {
    let sanitized = sanitize_error_message(msg);
    if sanitized.len() <= max_len {
        return sanitized;
    }
    let mut end = max_len;
    while !sanitized.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &sanitized[..end])
}
