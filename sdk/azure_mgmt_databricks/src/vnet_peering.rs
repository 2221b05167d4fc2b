//! Virtual network peerings of a workspace.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::SubResource;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::Poller;
use azure_mgmt_core::request::ArmRequest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::models::{AddressSpace, ProvisioningState, API_VERSION};

const PEERING_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Databricks/workspaces/{workspaceName}/virtualNetworkPeerings/{peeringName}";
const PEERINGS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Databricks/workspaces/{workspaceName}/virtualNetworkPeerings";

/// State of a peering link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeeringState {
    Initiated,
    Connected,
    Disconnected,
    #[serde(untagged)]
    Other(String),
}

/// Properties of a virtual network peering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkPeeringProperties {
    /// The remote network to peer with. Required.
    pub remote_virtual_network: SubResource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address_space: Option<AddressSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databricks_virtual_network: Option<SubResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databricks_address_space: Option<AddressSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_virtual_network_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_forwarded_traffic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_gateway_transit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_remote_gateways: Option<bool>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_state: Option<PeeringState>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A peering between the workspace network and a remote virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkPeering {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub properties: VirtualNetworkPeeringProperties,
}

impl VirtualNetworkPeering {
    /// A peering with the virtual network `remote_virtual_network_id`.
    pub fn new(remote_virtual_network_id: impl Into<String>) -> Self {
        Self {
            properties: VirtualNetworkPeeringProperties {
                remote_virtual_network: SubResource::new(remote_virtual_network_id),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn peering_url(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    peering_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(PEERING_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("workspaceName", workspace_name)?
        .param("peeringName", peering_name)?
        .into_url(API_VERSION)
}

/// Get a peering. Returns `None` when the service answers `204 No Content`.
#[tracing::instrument(
    name = "arm::databricks::vnet_peering::get",
    skip(client),
    fields(workspace = %workspace_name, peering = %peering_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    peering_name: &str,
) -> ArmResult<Option<VirtualNetworkPeering>> {
    tracing::debug!("getting virtual network peering");

    let url = peering_url(client, resource_group_name, workspace_name, peering_name)?;
    client.send_json(&ArmRequest::get(url), &[200, 204]).await
}

/// Start creating or updating a peering.
///
/// # Tracing
///
/// Emits a span named `arm::databricks::vnet_peering::begin_create_or_update`
/// with fields `workspace` and `peering`.
#[tracing::instrument(
    name = "arm::databricks::vnet_peering::begin_create_or_update",
    skip(client, peering),
    fields(workspace = %workspace_name, peering = %peering_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    peering_name: &str,
    peering: &VirtualNetworkPeering,
) -> ArmResult<Poller<VirtualNetworkPeering>> {
    tracing::debug!("creating virtual network peering");

    let url = peering_url(client, resource_group_name, workspace_name, peering_name)?;
    let request = ArmRequest::put(url).json(peering)?;
    Poller::begin(client, request, &[200, 201], None).await
}

/// Start deleting a peering.
#[tracing::instrument(
    name = "arm::databricks::vnet_peering::begin_delete",
    skip(client),
    fields(workspace = %workspace_name, peering = %peering_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    peering_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting virtual network peering");

    let url = peering_url(client, resource_group_name, workspace_name, peering_name)?;
    Poller::begin(client, ArmRequest::delete(url), &[200, 202, 204], None).await
}

/// List the peerings of a workspace.
#[tracing::instrument(
    name = "arm::databricks::vnet_peering::list_by_workspace",
    skip(client),
    fields(workspace = %workspace_name)
)]
pub fn list_by_workspace(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
) -> ArmResult<Pager<VirtualNetworkPeering>> {
    let url = client
        .path(PEERINGS_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("workspaceName", workspace_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}
