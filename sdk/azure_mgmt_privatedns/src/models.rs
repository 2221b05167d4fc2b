//! Options and types shared by the Private DNS operations.

use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;
use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use serde::{Deserialize, Serialize};

/// API version sent with every Private DNS request.
pub(crate) const API_VERSION: &str = "2020-06-01";

/// Location of every private zone and virtual network link.
pub const GLOBAL_LOCATION: &str = "global";

/// Provisioning state of a zone or link.
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

/// Preconditions of a create or replace.
#[derive(Debug, Clone, Default)]
pub struct CreateOrUpdateOptions {
    /// ETag of the version to overwrite. `*` matches any existing resource.
    pub if_match: Option<String>,
    /// `*` fails the request when the resource already exists.
    pub if_none_match: Option<String>,
}

impl CreateOrUpdateOptions {
    /// Only create; never overwrite.
    pub fn create_only() -> Self {
        Self {
            if_match: None,
            if_none_match: Some("*".into()),
        }
    }

    /// Only overwrite the version with the given ETag.
    pub fn if_match(etag: impl Into<String>) -> Self {
        Self {
            if_match: Some(etag.into()),
            if_none_match: None,
        }
    }
}

/// Precondition of an update or delete.
#[derive(Debug, Clone, Default)]
pub struct IfMatchOptions {
    pub if_match: Option<String>,
}

/// Options of list operations.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of results per page (`$top`).
    pub top: Option<i32>,
}

/// Options of the record set list operations.
#[derive(Debug, Clone, Default)]
pub struct RecordSetListOptions {
    pub top: Option<i32>,
    /// Only return record sets whose name ends with
    /// `.<record_set_name_suffix>` (`$recordsetnamesuffix`).
    pub record_set_name_suffix: Option<String>,
}

pub(crate) fn with_preconditions(
    request: ArmRequest,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<ArmRequest> {
    match options {
        Some(o) => request
            .header_opt(IF_MATCH, o.if_match.as_deref())?
            .header_opt(IF_NONE_MATCH, o.if_none_match.as_deref()),
        None => Ok(request),
    }
}

pub(crate) fn with_if_match(
    request: ArmRequest,
    options: Option<&IfMatchOptions>,
) -> ArmResult<ArmRequest> {
    request.header_opt(IF_MATCH, options.and_then(|o| o.if_match.as_deref()))
}

pub(crate) fn with_top(request: ArmRequest, options: Option<&ListOptions>) -> ArmRequest {
    request.query_opt("$top", options.and_then(|o| o.top))
}
