//! Types shared by the management group operations.

use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;
use chrono::{DateTime, Utc};
use reqwest::header::CACHE_CONTROL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API version sent with every management group request.
pub(crate) const API_VERSION: &str = "2021-04-01";

/// Resource type of management groups.
pub const MANAGEMENT_GROUP_TYPE: &str = "Microsoft.Management/managementGroups";

// ----- Options -----

/// Options carrying only a `Cache-Control` header.
///
/// `no-cache` bypasses the service cache and reads the latest hierarchy.
#[derive(Debug, Clone, Default)]
pub struct CacheControlOptions {
    pub cache_control: Option<String>,
}

impl CacheControlOptions {
    /// Options sending `Cache-Control: no-cache`.
    pub fn no_cache() -> Self {
        Self {
            cache_control: Some("no-cache".into()),
        }
    }
}

/// Options of [`crate::management_groups::list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub cache_control: Option<String>,
    /// Continuation token from a previous, partial result (`$skiptoken`).
    pub skip_token: Option<String>,
}

/// Data to include in a [`crate::management_groups::get`] response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expand {
    /// Direct children. Combined with `recurse` the whole subtree.
    Children,
    /// The path from the root group.
    Path,
    /// The ancestor chain.
    Ancestors,
}

impl fmt::Display for Expand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Children => "children",
            Self::Path => "path",
            Self::Ancestors => "ancestors",
        })
    }
}

/// Options of [`crate::management_groups::get`].
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub expand: Option<Expand>,
    /// Include the full hierarchy below the group. Requires `expand` to be
    /// [`Expand::Children`].
    pub recurse: Option<bool>,
    /// e.g. `children.childType ne Subscription`.
    pub filter: Option<String>,
    pub cache_control: Option<String>,
}

/// Options of [`crate::management_groups::get_descendants`].
#[derive(Debug, Clone, Default)]
pub struct DescendantsOptions {
    pub skip_token: Option<String>,
    /// Maximum number of results per page (`$top`).
    pub top: Option<i32>,
}

/// Options of [`crate::subscriptions::get_subscriptions_under_management_group`].
#[derive(Debug, Clone, Default)]
pub struct SubscriptionListOptions {
    pub skip_token: Option<String>,
}

pub(crate) fn apply_cache_control(
    request: ArmRequest,
    cache_control: Option<&str>,
) -> ArmResult<ArmRequest> {
    request.header_opt(CACHE_CONTROL, cache_control)
}

// ----- Shared models -----

/// The kind of entry in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagementGroupChildType {
    #[serde(rename = "Microsoft.Management/managementGroups")]
    ManagementGroup,
    #[serde(rename = "/subscriptions")]
    Subscription,
    #[serde(untagged)]
    Other(String),
}

/// Parent of a management group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentGroupInfo {
    /// Fully qualified id, e.g. `/providers/Microsoft.Management/managementGroups/0000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// One hop of a path through the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementGroupPathElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Parent of a descendant or subscription, by id only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescendantParentGroupInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Details of the last modification of a management group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementGroupDetails {
    /// Incremented on every change of the group or its hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(
        default,
        with = "azure_mgmt_core::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentGroupInfo>,
    /// Present with `$expand=path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<ManagementGroupPathElement>>,
    /// Present with `$expand=ancestors`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_group_ancestors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_group_ancestors_chain: Option<Vec<ManagementGroupPathElement>>,
}

/// A child of a management group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementGroupChildInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub child_type: Option<ManagementGroupChildType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Grandchildren, only with `$recurse=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ManagementGroupChildInfo>>,
}

/// Properties of a management group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementGroupProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ManagementGroupDetails>,
    /// Present with `$expand=children`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ManagementGroupChildInfo>>,
}

/// A management group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagementGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// The group id, e.g. `Finance`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ManagementGroupProperties>,
}

impl ManagementGroup {
    /// The display name, if the service returned properties.
    pub fn display_name(&self) -> Option<&str> {
        self.properties.as_ref()?.display_name.as_deref()
    }
}
