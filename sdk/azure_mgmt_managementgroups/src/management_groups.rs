//! Management group operations.
//!
//! Management groups are tenant-level resources: their URLs do not contain a
//! subscription, and the client does not need a subscription id to call them.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::{FinalStateVia, Poller};
use azure_mgmt_core::request::ArmRequest;
use serde::{Deserialize, Serialize};

use crate::models::{
    apply_cache_control, CacheControlOptions, DescendantParentGroupInfo, DescendantsOptions,
    GetOptions, ListOptions, ManagementGroup, ManagementGroupChildType, ParentGroupInfo,
    API_VERSION, MANAGEMENT_GROUP_TYPE,
};

const GROUPS_PATH: &str = "/providers/Microsoft.Management/managementGroups";
const GROUP_PATH: &str = "/providers/Microsoft.Management/managementGroups/{groupId}";
const DESCENDANTS_PATH: &str =
    "/providers/Microsoft.Management/managementGroups/{groupId}/descendants";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parent to create a management group under.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParentGroupInfo {
    /// Fully qualified id of the parent group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagementGroupDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<CreateParentGroupInfo>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagementGroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CreateManagementGroupDetails>,
}

/// Body of [`begin_create_or_update`].
///
/// # Example
///
/// ```rust
/// use azure_mgmt_managementgroups::management_groups::CreateManagementGroupRequest;
///
/// let request = CreateManagementGroupRequest::new("Finance")
///     .with_parent("/providers/Microsoft.Management/managementGroups/Root");
/// assert_eq!(request.display_name(), Some("Finance"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagementGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<CreateManagementGroupProperties>,
}

impl CreateManagementGroupRequest {
    /// A group with the given display name, created under the tenant root.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            properties: Some(CreateManagementGroupProperties {
                display_name: Some(display_name.into()),
                details: None,
            }),
        }
    }

    /// Create the group under `parent_id` instead of the tenant root.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        let properties = self.properties.get_or_insert_with(Default::default);
        properties.details = Some(CreateManagementGroupDetails {
            parent: Some(CreateParentGroupInfo {
                id: Some(parent_id.into()),
            }),
        });
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.properties.as_ref()?.display_name.as_deref()
    }
}

/// Body of [`update`]. Renames the group or moves it to another parent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchManagementGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Fully qualified id of the new parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementGroupInfoProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Summary of a management group returned by [`list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagementGroupInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ManagementGroupInfoProperties>,
}

/// Final status of [`begin_delete`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AzureAsyncOperationResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ManagementGroupInfoProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescendantInfoProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DescendantParentGroupInfo>,
}

/// A management group or subscription below a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescendantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub descendant_type: Option<ManagementGroupChildType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<DescendantInfoProperties>,
}

impl DescendantInfo {
    /// Returns `true` for subscriptions, `false` for management groups.
    pub fn is_subscription(&self) -> bool {
        self.descendant_type == Some(ManagementGroupChildType::Subscription)
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn group_url(client: &ArmClient, group_id: &str) -> ArmResult<url::Url> {
    client
        .path(GROUP_PATH)
        .param("groupId", group_id)?
        .into_url(API_VERSION)
}

/// List the management groups visible to the caller.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_managementgroups::management_groups;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let mut pager = management_groups::list(client, None)?;
/// while let Some(page) = pager.next_page().await? {
///     for group in page.value {
///         println!("{:?}", group.name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(name = "arm::managementgroups::management_groups::list", skip(client, options))]
pub fn list(
    client: &ArmClient,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<ManagementGroupInfo>> {
    let url = client.path(GROUPS_PATH).into_url(API_VERSION)?;
    let request = ArmRequest::get(url)
        .query_opt("$skiptoken", options.and_then(|o| o.skip_token.as_deref()));
    let request = apply_cache_control(request, options.and_then(|o| o.cache_control.as_deref()))?;
    Ok(Pager::new(client, request))
}

/// Get a management group.
///
/// # Tracing
///
/// Emits a span named `arm::managementgroups::management_groups::get` with
/// field `group_id`.
#[tracing::instrument(
    name = "arm::managementgroups::management_groups::get",
    skip(client, options),
    fields(group_id = %group_id)
)]
pub async fn get(
    client: &ArmClient,
    group_id: &str,
    options: Option<&GetOptions>,
) -> ArmResult<ManagementGroup> {
    tracing::debug!("getting management group");

    let url = group_url(client, group_id)?;
    let request = match options {
        Some(options) => apply_cache_control(
            ArmRequest::get(url)
                .query_opt("$expand", options.expand)
                .query_opt("$recurse", options.recurse)
                .query_opt("$filter", options.filter.as_deref()),
            options.cache_control.as_deref(),
        )?,
        None => ArmRequest::get(url),
    };
    let group: ManagementGroup = client.send_json(&request, &[200]).await?;

    tracing::debug!(
        children = group
            .properties
            .as_ref()
            .and_then(|p| p.children.as_ref())
            .map_or(0, Vec::len),
        "management group retrieved"
    );
    Ok(group)
}

/// Start creating or updating a management group.
///
/// The operation completes through the async-operation URL, whose final body
/// carries the group.
///
/// # Tracing
///
/// Emits a span named
/// `arm::managementgroups::management_groups::begin_create_or_update` with
/// field `group_id`.
#[tracing::instrument(
    name = "arm::managementgroups::management_groups::begin_create_or_update",
    skip(client, request, options),
    fields(group_id = %group_id)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    group_id: &str,
    request: &CreateManagementGroupRequest,
    options: Option<&CacheControlOptions>,
) -> ArmResult<Poller<ManagementGroup>> {
    tracing::debug!("creating management group");

    let url = group_url(client, group_id)?;
    let request = apply_cache_control(
        ArmRequest::put(url).json(request)?,
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    Poller::begin(
        client,
        request,
        &[200, 202],
        Some(FinalStateVia::AzureAsyncOperation),
    )
    .await
}

/// Rename a management group or move it under another parent.
#[tracing::instrument(
    name = "arm::managementgroups::management_groups::update",
    skip(client, patch, options),
    fields(group_id = %group_id)
)]
pub async fn update(
    client: &ArmClient,
    group_id: &str,
    patch: &PatchManagementGroupRequest,
    options: Option<&CacheControlOptions>,
) -> ArmResult<ManagementGroup> {
    tracing::debug!("updating management group");

    let url = group_url(client, group_id)?;
    let request = apply_cache_control(
        ArmRequest::patch(url).json(patch)?,
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    client.send_json(&request, &[200]).await
}

/// Start deleting a management group. The group must have no children.
#[tracing::instrument(
    name = "arm::managementgroups::management_groups::begin_delete",
    skip(client, options),
    fields(group_id = %group_id)
)]
pub async fn begin_delete(
    client: &ArmClient,
    group_id: &str,
    options: Option<&CacheControlOptions>,
) -> ArmResult<Poller<AzureAsyncOperationResults>> {
    tracing::debug!("deleting management group");

    let url = group_url(client, group_id)?;
    let request = apply_cache_control(
        ArmRequest::delete(url),
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    Poller::begin(
        client,
        request,
        &[200, 202],
        Some(FinalStateVia::AzureAsyncOperation),
    )
    .await
}

/// List every management group and subscription below a group.
#[tracing::instrument(
    name = "arm::managementgroups::management_groups::get_descendants",
    skip(client, options),
    fields(group_id = %group_id)
)]
pub fn get_descendants(
    client: &ArmClient,
    group_id: &str,
    options: Option<&DescendantsOptions>,
) -> ArmResult<Pager<DescendantInfo>> {
    let url = client
        .path(DESCENDANTS_PATH)
        .param("groupId", group_id)?
        .into_url(API_VERSION)?;
    let request = ArmRequest::get(url)
        .query_opt("$skiptoken", options.and_then(|o| o.skip_token.as_deref()))
        .query_opt("$top", options.and_then(|o| o.top));
    Ok(Pager::new(client, request))
}

/// Fully qualified id of the management group `group_id`.
pub fn management_group_id(group_id: &str) -> String {
    format!("/providers/{MANAGEMENT_GROUP_TYPE}/{group_id}")
}

impl From<&ManagementGroup> for ParentGroupInfo {
    fn from(group: &ManagementGroup) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            display_name: group.display_name().map(str::to_string),
        }
    }
}
