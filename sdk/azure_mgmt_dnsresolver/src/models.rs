//! Shared types for the DNS resolver management API.

use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;
use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use serde::{Deserialize, Serialize};

/// API version sent with every DNS resolver request.
pub(crate) const API_VERSION: &str = "2022-07-01";

/// Provisioning state of a resolver or endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningState {
    Creating,
    Updating,
    Deleting,
    Succeeded,
    Failed,
    Canceled,
    #[serde(untagged)]
    Other(String),
}

/// Options of the `begin_create_or_update` operations.
///
/// Either precondition can be used for optimistic concurrency.
#[derive(Debug, Clone, Default)]
pub struct CreateOrUpdateOptions {
    /// Only write if the current ETag matches. `*` overwrites any existing resource.
    pub if_match: Option<String>,
    /// Set to `*` to only create a new resource and never overwrite one.
    pub if_none_match: Option<String>,
}

impl CreateOrUpdateOptions {
    /// Options that fail when the resource already exists.
    pub fn create_only() -> Self {
        Self {
            if_none_match: Some("*".into()),
            ..Default::default()
        }
    }
}

/// Options of the `begin_update` operations.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Only update if the current ETag matches.
    pub if_match: Option<String>,
}

/// Options of the `begin_delete` operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Only delete if the current ETag matches.
    pub if_match: Option<String>,
}

/// Options of the list operations.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of results per page (`$top`).
    pub top: Option<i32>,
}

pub(crate) fn apply_create_or_update(
    request: ArmRequest,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<ArmRequest> {
    let Some(options) = options else {
        return Ok(request);
    };
    request
        .header_opt(IF_MATCH, options.if_match.as_deref())?
        .header_opt(IF_NONE_MATCH, options.if_none_match.as_deref())
}

pub(crate) fn apply_if_match(request: ArmRequest, if_match: Option<&str>) -> ArmResult<ArmRequest> {
    request.header_opt(IF_MATCH, if_match)
}

pub(crate) fn apply_list(request: ArmRequest, options: Option<&ListOptions>) -> ArmRequest {
    request.query_opt("$top", options.and_then(|o| o.top))
}
