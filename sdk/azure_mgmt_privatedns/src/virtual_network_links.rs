//! Links between a private zone and virtual networks.
//!
//! A linked network resolves names in the zone. With registration enabled,
//! virtual machines in the network also register their own A records.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::{SubResource, Tags};
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::Poller;
use azure_mgmt_core::request::ArmRequest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::models::{
    with_if_match, with_preconditions, with_top, CreateOrUpdateOptions, IfMatchOptions,
    ListOptions, ProvisioningState, API_VERSION, GLOBAL_LOCATION,
};

const LINK_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}/virtualNetworkLinks/{virtualNetworkLinkName}";
const LINKS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}/virtualNetworkLinks";

/// Whether the link has reached the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VirtualNetworkLinkState {
    InProgress,
    Completed,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkLinkProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_network: Option<SubResource>,
    /// Auto-register virtual machine records in the zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_enabled: Option<bool>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_network_link_state: Option<VirtualNetworkLinkState>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A virtual network link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<VirtualNetworkLinkProperties>,
}

impl VirtualNetworkLink {
    /// A link to `virtual_network_id`.
    pub fn new(virtual_network_id: impl Into<String>, registration_enabled: bool) -> Self {
        Self {
            location: Some(GLOBAL_LOCATION.to_string()),
            properties: Some(VirtualNetworkLinkProperties {
                virtual_network: Some(SubResource::new(virtual_network_id)),
                registration_enabled: Some(registration_enabled),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

fn link_url(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    virtual_network_link_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(LINK_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .param("virtualNetworkLinkName", virtual_network_link_name)?
        .into_url(API_VERSION)
}

/// Start creating or replacing a virtual network link.
#[tracing::instrument(
    name = "arm::privatedns::virtual_network_links::begin_create_or_update",
    skip(client, parameters, options),
    fields(zone = %private_zone_name, link = %virtual_network_link_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    virtual_network_link_name: &str,
    parameters: &VirtualNetworkLink,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<Poller<VirtualNetworkLink>> {
    tracing::debug!("creating virtual network link");

    let url = link_url(
        client,
        resource_group_name,
        private_zone_name,
        virtual_network_link_name,
    )?;
    let request = with_preconditions(ArmRequest::put(url).json(parameters)?, options)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Start updating a virtual network link, e.g. to toggle registration.
#[tracing::instrument(
    name = "arm::privatedns::virtual_network_links::begin_update",
    skip(client, parameters, options),
    fields(zone = %private_zone_name, link = %virtual_network_link_name)
)]
pub async fn begin_update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    virtual_network_link_name: &str,
    parameters: &VirtualNetworkLink,
    options: Option<&IfMatchOptions>,
) -> ArmResult<Poller<VirtualNetworkLink>> {
    tracing::debug!("updating virtual network link");

    let url = link_url(
        client,
        resource_group_name,
        private_zone_name,
        virtual_network_link_name,
    )?;
    let request = with_if_match(ArmRequest::patch(url).json(parameters)?, options)?;
    Poller::begin(client, request, &[200, 202], None).await
}

/// Start deleting a virtual network link.
///
/// Records the network registered in the zone are removed with the link.
#[tracing::instrument(
    name = "arm::privatedns::virtual_network_links::begin_delete",
    skip(client, options),
    fields(zone = %private_zone_name, link = %virtual_network_link_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    virtual_network_link_name: &str,
    options: Option<&IfMatchOptions>,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting virtual network link");

    let url = link_url(
        client,
        resource_group_name,
        private_zone_name,
        virtual_network_link_name,
    )?;
    let request = with_if_match(ArmRequest::delete(url), options)?;
    Poller::begin(client, request, &[200, 202, 204], None).await
}

#[tracing::instrument(
    name = "arm::privatedns::virtual_network_links::get",
    skip(client),
    fields(zone = %private_zone_name, link = %virtual_network_link_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    virtual_network_link_name: &str,
) -> ArmResult<VirtualNetworkLink> {
    tracing::debug!("getting virtual network link");

    let url = link_url(
        client,
        resource_group_name,
        private_zone_name,
        virtual_network_link_name,
    )?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// List the virtual network links of a zone.
#[tracing::instrument(
    name = "arm::privatedns::virtual_network_links::list",
    skip(client, options),
    fields(zone = %private_zone_name)
)]
pub fn list(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<VirtualNetworkLink>> {
    let url = client
        .path(LINKS_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, with_top(ArmRequest::get(url), options)))
}
