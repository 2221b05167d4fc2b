//! Tracking of ARM long-running operations.
//!
//! A `begin_*` operation returns a [`Poller`] built from the initial response.
//! The poller picks a polling URL from the `Azure-AsyncOperation` or
//! `Location` headers (falling back to the original URL for `PUT`/`PATCH`),
//! polls it until the operation reaches `Succeeded`, `Failed` or `Canceled`,
//! and then fetches the final result.
//!
//! ```rust,no_run
//! use azure_mgmt_core::poller::{Poller, DEFAULT_POLL_FREQUENCY};
//!
//! # async fn example(poller: Poller<serde_json::Value>) -> azure_mgmt_core::error::ArmResult<()> {
//! let token = poller.resume_token()?;
//! let resource = poller.poll_until_done(DEFAULT_POLL_FREQUENCY).await?;
//! # let _ = (token, resource);
//! # Ok(())
//! # }
//! ```

use crate::client::{decode_body, retry_after, ArmClient};
use crate::error::{error_details_from_body, ArmError, ArmResult, ResponseError};
use crate::request::ArmRequest;
use bytes::Bytes;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default delay between two polls when the service sends no `Retry-After`.
pub const DEFAULT_POLL_FREQUENCY: Duration = Duration::from_secs(30);

const HEADER_ASYNC_OPERATION: &str = "azure-asyncoperation";

/// Status codes accepted from a polling or final `GET`.
const POLLING_CODES: [u16; 4] = [200, 201, 202, 204];

const STATE_IN_PROGRESS: &str = "InProgress";
const STATE_SUCCEEDED: &str = "Succeeded";
const STATE_FAILED: &str = "Failed";
const STATE_CANCELED: &str = "Canceled";

/// Where the final result of an operation is read from once it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalStateVia {
    /// The `Azure-AsyncOperation` URL, or the last polling body when absent.
    #[serde(rename = "azure-async-operation")]
    AzureAsyncOperation,
    /// The `Location` URL.
    #[serde(rename = "location")]
    Location,
    /// The URL of the initial request.
    #[serde(rename = "original-uri")]
    OriginalUri,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum PollingMethod {
    #[serde(rename = "AsyncOperation")]
    AsyncOperation,
    #[serde(rename = "Location")]
    Location,
    #[serde(rename = "RequestURI")]
    RequestUri,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

/// Serializable tracking state; this is the resume token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PollerState {
    #[serde(rename = "pollerType")]
    poller_type: String,
    method: String,
    #[serde(rename = "pollingMethod", default)]
    polling_method: PollingMethod,
    #[serde(rename = "pollingURI", default)]
    polling_uri: String,
    #[serde(rename = "lroState", default)]
    lro_state: String,
    #[serde(rename = "resultURI", default)]
    result_uri: String,
    #[serde(rename = "finalStateVia", default, skip_serializing_if = "Option::is_none")]
    final_state_via: Option<FinalStateVia>,
    #[serde(rename = "originalURI", default)]
    original_uri: String,
}

impl PollerState {
    fn is_terminal(&self) -> bool {
        self.has_succeeded() || self.has_failed()
    }

    fn has_failed(&self) -> bool {
        self.lro_state.eq_ignore_ascii_case(STATE_FAILED)
            || self.lro_state.eq_ignore_ascii_case(STATE_CANCELED)
    }

    fn has_succeeded(&self) -> bool {
        self.lro_state.eq_ignore_ascii_case(STATE_SUCCEEDED)
    }

    fn is_put_or_patch(&self) -> bool {
        matches!(self.method.as_str(), "PUT" | "PATCH")
    }
}

/// The most recent response seen by the poller.
#[derive(Debug, Clone)]
struct Snapshot {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
    json: serde_json::Value,
}

impl Snapshot {
    async fn read(response: reqwest::Response) -> ArmResult<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let json = if body.iter().all(u8::is_ascii_whitespace) {
            serde_json::Value::Null
        } else {
            // Non-JSON bodies carry no state; the status code decides.
            serde_json::from_slice(&body).unwrap_or_else(|err| {
                tracing::debug!(status, error = %err, "ignoring non-JSON response body");
                serde_json::Value::Null
            })
        };
        Ok(Self {
            status,
            headers,
            body,
            json,
        })
    }

    /// An absolute URL from `name`, `None` when the header is absent.
    fn header_url(&self, name: &str) -> ArmResult<Option<String>> {
        let Some(value) = self.headers.get(name) else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|_| ArmError::Polling(format!("invalid polling URL in {name} header")))?;
        if value.is_empty() {
            return Ok(None);
        }
        Url::parse(value).map_err(|_| ArmError::Polling(format!("invalid polling URL '{value}'")))?;
        Ok(Some(value.to_string()))
    }

    fn async_operation_url(&self) -> ArmResult<Option<String>> {
        self.header_url(HEADER_ASYNC_OPERATION)
    }

    fn location_url(&self) -> ArmResult<Option<String>> {
        self.header_url(LOCATION.as_str())
    }

    fn provisioning_state(&self) -> Option<String> {
        self.json
            .get("properties")?
            .get("provisioningState")?
            .as_str()
            .map(str::to_string)
    }

    fn status_field(&self) -> Option<String> {
        self.json.get("status")?.as_str().map(str::to_string)
    }

    fn has_no_body(&self) -> bool {
        match &self.json {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// Tracks a long-running operation until it completes.
///
/// `T` is the type of the final result. Operations without a result use
/// [`serde::de::IgnoredAny`].
#[derive(Debug)]
pub struct Poller<T> {
    client: ArmClient,
    state: PollerState,
    latest: Option<Snapshot>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Poller<T> {
    /// Send the initial request of an operation and start tracking it.
    pub async fn begin(
        client: &ArmClient,
        request: ArmRequest,
        expected: &[u16],
        final_state_via: Option<FinalStateVia>,
    ) -> ArmResult<Self> {
        let response = client.send(&request, expected).await?;
        Self::from_response(client, &request, response, final_state_via).await
    }

    /// Start tracking an operation from the response to its initial request.
    pub async fn from_response(
        client: &ArmClient,
        request: &ArmRequest,
        response: reqwest::Response,
        final_state_via: Option<FinalStateVia>,
    ) -> ArmResult<Self> {
        let method = request.method().as_str().to_ascii_uppercase();
        if !is_supported_method(&method) {
            return Err(ArmError::Polling(format!("unsupported HTTP method {method}")));
        }

        let snapshot = Snapshot::read(response).await?;
        let lro_state = match snapshot.status {
            200 => snapshot
                .provisioning_state()
                .unwrap_or_else(|| STATE_SUCCEEDED.to_string()),
            201 => snapshot
                .provisioning_state()
                .unwrap_or_else(|| STATE_IN_PROGRESS.to_string()),
            202 => STATE_IN_PROGRESS.to_string(),
            204 => STATE_SUCCEEDED.to_string(),
            status => {
                let body = String::from_utf8_lossy(&snapshot.body);
                return Err(ResponseError::new(
                    request.method().clone(),
                    request.url().as_str(),
                    reqwest::StatusCode::from_u16(status)
                        .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
                    &snapshot.headers,
                    &body,
                )
                .into());
            }
        };

        let mut poller = Self {
            client: client.clone(),
            state: PollerState {
                poller_type: poller_type::<T>(),
                method,
                polling_method: PollingMethod::Unknown,
                polling_uri: String::new(),
                lro_state,
                result_uri: String::new(),
                final_state_via,
                original_uri: request.url().to_string(),
            },
            latest: Some(snapshot),
            _marker: std::marker::PhantomData,
        };

        if poller.state.has_failed() {
            return Err(poller.failure());
        }
        poller.init_polling_method()?;
        poller.update_polling_method()?;

        tracing::debug!(
            method = %poller.state.method,
            state = %poller.state.lro_state,
            polling_uri = %poller.state.polling_uri,
            "started long-running operation"
        );
        Ok(poller)
    }

    /// Recreate a poller from a token produced by [`Poller::resume_token`].
    pub fn from_resume_token(client: &ArmClient, token: &str) -> ArmResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(token)?;
        let expected = poller_type::<T>();
        let received = raw.get("pollerType").and_then(|v| v.as_str()).unwrap_or_default();
        if received != expected {
            return Err(ArmError::Polling(format!(
                "cannot resume from this poller type. Expected: {expected}, Received: {received}"
            )));
        }
        let Some(method) = raw.get("method").and_then(|v| v.as_str()) else {
            return Err(ArmError::Polling("token is missing 'method' property".into()));
        };
        if !is_supported_method(&method.to_ascii_uppercase()) {
            return Err(ArmError::Polling(format!("unsupported method '{method}'")));
        }

        let mut state: PollerState = serde_json::from_value(raw)?;
        state.method = state.method.to_ascii_uppercase();

        Ok(Self {
            client: client.clone(),
            state,
            latest: None,
            _marker: std::marker::PhantomData,
        })
    }

    /// Returns `true` once the operation has reached a terminal state.
    pub fn done(&self) -> bool {
        self.state.is_terminal()
    }

    /// The last state reported by the service, e.g. `InProgress` or `Succeeded`.
    pub fn status(&self) -> &str {
        &self.state.lro_state
    }

    /// Produce a token that [`Poller::from_resume_token`] can continue from.
    pub fn resume_token(&self) -> ArmResult<String> {
        if self.done() {
            return Err(ArmError::Polling(
                "cannot create a resume token from a poller in a terminal state".into(),
            ));
        }
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Poll the operation once.
    ///
    /// Returns [`ArmError::OperationFailed`] once the operation has failed or
    /// been canceled.
    pub async fn poll(&mut self) -> ArmResult<()> {
        if self.done() {
            return self.terminal_outcome();
        }
        if self.state.polling_uri.is_empty() {
            return Err(ArmError::Polling("missing polling URL".into()));
        }

        let url = Url::parse(&self.state.polling_uri)
            .map_err(|e| ArmError::Polling(format!("invalid polling URL: {e}")))?;
        let response = self
            .client
            .send(&ArmRequest::get(url), &POLLING_CODES)
            .await?;
        self.latest = Some(Snapshot::read(response).await?);

        self.check_for_errors()?;
        self.update_polling_state()?;
        self.init_polling_method()?;
        self.update_polling_method()?;

        tracing::debug!(state = %self.state.lro_state, "polled long-running operation");
        self.terminal_outcome()
    }

    /// Fetch the final result of a completed operation.
    pub async fn result(&self) -> ArmResult<T> {
        if !self.done() {
            return Err(ArmError::Polling(
                "cannot return a final result from a poller in a non-terminal state".into(),
            ));
        }
        if self.state.has_failed() {
            return Err(self.failure());
        }

        if self.state.is_put_or_patch() && self.state.polling_method != PollingMethod::AsyncOperation {
            if let Some(latest) = self
                .latest
                .as_ref()
                .filter(|s| s.status != 204 && !s.has_no_body())
            {
                return decode_body(&latest.body);
            }
        }

        let Some(uri) = self.final_result_uri()? else {
            return match &self.latest {
                Some(latest) => decode_body(&latest.body),
                None => Err(ArmError::Polling("missing URL for retrieving result".into())),
            };
        };

        let url = Url::parse(&uri)
            .map_err(|e| ArmError::Polling(format!("invalid result URL: {e}")))?;
        tracing::debug!(url = %url, "fetching result of long-running operation");
        let response = self
            .client
            .send(&ArmRequest::get(url), &POLLING_CODES)
            .await?;
        if response.status().as_u16() == 204 {
            return decode_body(&[]);
        }
        let body = response.bytes().await?;
        decode_body(&body)
    }

    /// Poll until the operation completes, then return its result.
    ///
    /// Waits `frequency` between polls unless the service asks for a
    /// different delay through `Retry-After`.
    pub async fn poll_until_done(mut self, frequency: Duration) -> ArmResult<T> {
        if self.done() {
            return self.result().await;
        }
        if let Some(delay) = self.latest_retry_after() {
            tokio::time::sleep(delay).await;
        }
        loop {
            self.poll().await?;
            if self.done() {
                break;
            }
            let delay = self.latest_retry_after().unwrap_or(frequency);
            tracing::trace!(delay_ms = delay.as_millis() as u64, "waiting before next poll");
            tokio::time::sleep(delay).await;
        }
        self.result().await
    }

    fn latest_retry_after(&self) -> Option<Duration> {
        self.latest
            .as_ref()
            .and_then(|s| retry_after(&s.headers))
            .filter(|d| !d.is_zero())
    }

    fn latest(&self) -> ArmResult<&Snapshot> {
        self.latest
            .as_ref()
            .ok_or_else(|| ArmError::Polling("no response has been received yet".into()))
    }

    fn terminal_outcome(&self) -> ArmResult<()> {
        if self.state.has_failed() {
            Err(self.failure())
        } else {
            Ok(())
        }
    }

    fn failure(&self) -> ArmError {
        let (code, message) = self
            .latest
            .as_ref()
            .map(|s| error_details_from_body(&s.json))
            .unwrap_or_default();
        let state = self.state.lro_state.clone();
        ArmError::OperationFailed {
            message: message
                .unwrap_or_else(|| format!("long-running operation ended in state {state}")),
            state,
            code,
        }
    }

    fn check_for_errors(&self) -> ArmResult<()> {
        let latest = self.latest()?;
        if self.state.polling_method == PollingMethod::AsyncOperation {
            if latest.has_no_body() {
                return Err(ArmError::Polling(
                    "for Azure-AsyncOperation response body cannot be empty".into(),
                ));
            }
            if latest.status_field().is_none() {
                return Err(ArmError::Polling(
                    "missing status property in Azure-AsyncOperation response body".into(),
                ));
            }
        }
        if self.state.method == "PUT"
            && latest.async_operation_url()?.is_none()
            && latest.location_url()?.is_none()
            && latest.has_no_body()
        {
            return Err(ArmError::Polling("the response did not contain a body".into()));
        }
        Ok(())
    }

    fn update_polling_state(&mut self) -> ArmResult<()> {
        let latest = self.latest()?;
        let status = latest.status;
        let provisioning_applicable = if self.state.is_put_or_patch() {
            matches!(status, 200 | 201)
        } else {
            matches!(status, 200 | 204)
        };

        let next = match latest.status_field() {
            Some(s) if self.state.polling_method == PollingMethod::AsyncOperation => s,
            _ if status == 202 => STATE_IN_PROGRESS.to_string(),
            _ if provisioning_applicable => latest
                .provisioning_state()
                .unwrap_or_else(|| STATE_SUCCEEDED.to_string()),
            _ => {
                return Err(ArmError::Polling(format!(
                    "the response from the async operation has an invalid status code: {status}"
                )))
            }
        };
        self.state.lro_state = next;
        Ok(())
    }

    fn init_polling_method(&mut self) -> ArmResult<()> {
        let latest = self.latest()?;
        let ao = latest.async_operation_url()?;
        let location = latest.location_url()?;
        match (ao, location) {
            (Some(ao), _) => {
                self.state.polling_uri = ao;
                self.state.polling_method = PollingMethod::AsyncOperation;
            }
            (None, Some(location)) => {
                self.state.polling_uri = location;
                self.state.polling_method = PollingMethod::Location;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn update_polling_method(&mut self) -> ArmResult<()> {
        let latest = self.latest()?;
        let status = latest.status;
        let ao = latest.async_operation_url()?;
        let location = latest.location_url()?;
        let state = &mut self.state;

        if state.is_put_or_patch() {
            if state.polling_uri.is_empty() {
                state.polling_uri = state.original_uri.clone();
            }
            if state.result_uri.is_empty() {
                state.result_uri = state.original_uri.clone();
            }
            if state.polling_method == PollingMethod::Unknown {
                state.polling_method = PollingMethod::RequestUri;
            }
            if let (201 | 202, Some(ao)) = (status, &ao) {
                state.polling_uri = ao.clone();
                state.polling_method = PollingMethod::AsyncOperation;
            } else if let (202, Some(location)) = (status, &location) {
                state.polling_uri = location.clone();
                state.polling_method = PollingMethod::Location;
            } else if status == 202 && state.method == "PATCH" {
                return Err(no_polling_url());
            }
            return Ok(());
        }

        match status {
            201 => {
                let location = location.ok_or_else(|| {
                    ArmError::Polling("missing Location header in 201 response".into())
                })?;
                state.polling_uri = location.clone();
                state.result_uri = location;
                state.polling_method = PollingMethod::Location;
            }
            202 => {
                if let Some(ao) = &ao {
                    state.polling_uri = ao.clone();
                    state.polling_method = PollingMethod::AsyncOperation;
                }
                if let Some(location) = location {
                    if ao.is_none() {
                        state.polling_uri = location.clone();
                        state.polling_method = PollingMethod::Location;
                    }
                    state.result_uri = location;
                }
                if state.polling_uri.is_empty() {
                    return Err(no_polling_url());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn final_result_uri(&self) -> ArmResult<Option<String>> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let uri = match self.state.final_state_via {
            Some(FinalStateVia::AzureAsyncOperation) => match &self.latest {
                Some(latest) => latest.async_operation_url()?,
                None => None,
            },
            Some(FinalStateVia::Location) => {
                let latest = match &self.latest {
                    Some(latest) => latest.location_url()?,
                    None => None,
                };
                latest.or_else(|| non_empty(&self.state.result_uri))
            }
            Some(FinalStateVia::OriginalUri) => non_empty(&self.state.original_uri),
            None => non_empty(&self.state.result_uri),
        };
        Ok(uri)
    }
}

fn is_supported_method(method: &str) -> bool {
    [Method::PUT, Method::PATCH, Method::POST, Method::DELETE]
        .iter()
        .any(|m| m.as_str() == method)
}

fn no_polling_url() -> ArmError {
    ArmError::Polling("didn't get any suitable polling URLs in 202 response".into())
}

fn poller_type<T>() -> String {
    std::any::type_name::<T>().to_string()
}
