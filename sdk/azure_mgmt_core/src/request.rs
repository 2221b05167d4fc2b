//! Request construction for ARM operations.
//!
//! Every operation follows the same steps: substitute escaped path parameters
//! into a URL template, append `api-version` and optional query parameters,
//! set optional headers and serialize the JSON body.
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::request::ArmRequest;
//!
//! # fn example(client: &ArmClient) -> azure_mgmt_core::error::ArmResult<()> {
//! let url = client
//!     .path("/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}")
//!     .subscription()?
//!     .param("resourceGroupName", "my-rg")?
//!     .into_url("2021-04-01")?;
//! let request = ArmRequest::get(url).query_opt("$top", Some(10));
//! # let _ = request;
//! # Ok(())
//! # }
//! ```

use crate::client::ArmClient;
use crate::error::{ArmError, ArmResult};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

/// Builds an operation URL from a path template such as
/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`.
#[derive(Debug)]
pub struct PathBuilder<'a> {
    client: &'a ArmClient,
    path: String,
}

impl<'a> PathBuilder<'a> {
    pub(crate) fn new(client: &'a ArmClient, template: &str) -> Self {
        Self {
            client,
            path: template.to_string(),
        }
    }

    /// Substitute `{subscriptionId}` with the client's subscription.
    pub fn subscription(self) -> ArmResult<Self> {
        let subscription_id = self.client.subscription_id().unwrap_or_default().to_string();
        self.param("subscriptionId", &subscription_id)
    }

    /// Substitute `{name}` with the percent-escaped `value`.
    ///
    /// Returns [`ArmError::EmptyParameter`] when `value` is empty.
    pub fn param(mut self, name: &str, value: &str) -> ArmResult<Self> {
        if value.is_empty() {
            return Err(ArmError::EmptyParameter(name.to_string()));
        }
        let placeholder = format!("{{{name}}}");
        self.path = self
            .path
            .replace(&placeholder, &urlencoding::encode(value));
        Ok(self)
    }

    /// Resolve the full URL and attach the `api-version` query parameter.
    pub fn into_url(self, api_version: &str) -> ArmResult<Url> {
        if let Some(start) = self.path.find('{') {
            let rest = &self.path[start..];
            let end = rest.find('}').map(|i| i + 1).unwrap_or(rest.len());
            return Err(ArmError::Builder(format!(
                "unresolved path parameter {}",
                &rest[..end]
            )));
        }

        let base = self.client.endpoint().as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", self.path))
            .map_err(|e| ArmError::invalid_endpoint_with_source("failed to construct URL", e))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }
}

/// A fully described HTTP request, ready to be sent by [`ArmClient::send`].
#[derive(Debug, Clone)]
pub struct ArmRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Bytes>,
}

impl ArmRequest {
    /// Create a request with an arbitrary method.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Create a `GET` request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a `PUT` request.
    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    /// Create a `PATCH` request.
    pub fn patch(url: Url) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Create a `POST` request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Create a `DELETE` request.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URL, including query parameters.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request headers set so far.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The serialized request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Append a query parameter.
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.url
            .query_pairs_mut()
            .append_pair(name, &value.to_string());
        self
    }

    /// Append a query parameter when `value` is set.
    pub fn query_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set a header when `value` is set.
    pub fn header_opt(mut self, name: HeaderName, value: Option<&str>) -> ArmResult<Self> {
        if let Some(value) = value {
            let value = HeaderValue::from_str(value)
                .map_err(|e| ArmError::Builder(format!("invalid value for header {name}: {e}")))?;
            self.headers.insert(name, value);
        }
        Ok(self)
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> ArmResult<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }
}
