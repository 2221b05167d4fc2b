//! Management group name availability.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;
use serde::{Deserialize, Serialize};

use crate::models::{API_VERSION, MANAGEMENT_GROUP_TYPE};

/// Why a name is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    Invalid,
    AlreadyExists,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckNameAvailabilityRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl CheckNameAvailabilityRequest {
    /// Check `name` as a management group id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: MANAGEMENT_GROUP_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameAvailabilityResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check whether a management group id is valid and unused in the tenant.
///
/// # Tracing
///
/// Emits a span named `arm::managementgroups::check_name_availability` with
/// field `name`.
#[tracing::instrument(
    name = "arm::managementgroups::check_name_availability",
    skip(client, request),
    fields(name = %request.name)
)]
pub async fn check_name_availability(
    client: &ArmClient,
    request: &CheckNameAvailabilityRequest,
) -> ArmResult<CheckNameAvailabilityResult> {
    tracing::debug!("checking management group name availability");

    let url = client
        .path("/providers/Microsoft.Management/checkNameAvailability")
        .into_url(API_VERSION)?;
    let result: CheckNameAvailabilityResult = client
        .send_json(&ArmRequest::post(url).json(request)?, &[200])
        .await?;

    tracing::debug!(available = ?result.name_available, "name availability checked");
    Ok(result)
}
