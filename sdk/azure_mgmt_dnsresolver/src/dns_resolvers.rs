//! DNS resolver management.
//!
//! A DNS resolver is attached to exactly one virtual network and answers
//! queries through its inbound endpoints.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::{SubResource, SystemData, Tags};
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::Poller;
use azure_mgmt_core::request::ArmRequest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::models::{
    apply_create_or_update, apply_if_match, apply_list, CreateOrUpdateOptions, DeleteOptions,
    ListOptions, ProvisioningState, UpdateOptions, API_VERSION,
};

const RESOLVER_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/dnsResolvers/{dnsResolverName}";
const RESOURCE_GROUP_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/dnsResolvers";
const SUBSCRIPTION_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Network/dnsResolvers";
const VIRTUAL_NETWORK_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}/listDnsResolvers";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether the resolver is connected to its virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DnsResolverState {
    Connected,
    Disconnected,
    #[serde(untagged)]
    Other(String),
}

/// Properties of a DNS resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsResolverProperties {
    /// The virtual network the resolver belongs to. Cannot change after creation.
    pub virtual_network: SubResource,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_resolver_state: Option<DnsResolverState>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,
}

/// A DNS resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsResolver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    /// Read-only; pass it back through `if_match` for optimistic concurrency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub properties: DnsResolverProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

impl DnsResolver {
    /// A resolver in `location` attached to `virtual_network_id`.
    pub fn new(location: impl Into<String>, virtual_network_id: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            properties: DnsResolverProperties {
                virtual_network: SubResource::new(virtual_network_id),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Patch body of [`begin_update`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DnsResolverPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn resolver_url(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(RESOLVER_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("dnsResolverName", dns_resolver_name)?
        .into_url(API_VERSION)
}

/// Start creating or replacing a DNS resolver.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
/// # use azure_mgmt_dnsresolver::dns_resolvers::{self, DnsResolver};
/// # use azure_mgmt_dnsresolver::models::CreateOrUpdateOptions;
/// # async fn example(client: &ArmClient, current: DnsResolver) -> azure_mgmt_core::ArmResult<()> {
/// // Only overwrite the resolver if nobody changed it since it was read.
/// let options = CreateOrUpdateOptions {
///     if_match: current.etag.clone(),
///     ..Default::default()
/// };
/// let poller =
///     dns_resolvers::begin_create_or_update(client, "my-rg", "resolver1", &current, Some(&options))
///         .await?;
/// let resolver = poller.poll_until_done(DEFAULT_POLL_FREQUENCY).await?;
/// # let _ = resolver;
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `arm::dnsresolver::dns_resolvers::begin_create_or_update`
/// with fields `resource_group` and `dns_resolver`.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::begin_create_or_update",
    skip(client, parameters, options),
    fields(resource_group = %resource_group_name, dns_resolver = %dns_resolver_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    parameters: &DnsResolver,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<Poller<DnsResolver>> {
    tracing::debug!("creating dns resolver");

    let url = resolver_url(client, resource_group_name, dns_resolver_name)?;
    let request = apply_create_or_update(ArmRequest::put(url).json(parameters)?, options)?;
    let poller = Poller::begin(client, request, &[200, 201, 202], None).await?;

    tracing::debug!(status = poller.status(), "dns resolver creation started");
    Ok(poller)
}

/// Start updating the tags of a DNS resolver.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::begin_update",
    skip(client, parameters, options),
    fields(resource_group = %resource_group_name, dns_resolver = %dns_resolver_name)
)]
pub async fn begin_update(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    parameters: &DnsResolverPatch,
    options: Option<&UpdateOptions>,
) -> ArmResult<Poller<DnsResolver>> {
    tracing::debug!("updating dns resolver");

    let url = resolver_url(client, resource_group_name, dns_resolver_name)?;
    let request = apply_if_match(
        ArmRequest::patch(url).json(parameters)?,
        options.and_then(|o| o.if_match.as_deref()),
    )?;
    Poller::begin(client, request, &[200, 202], None).await
}

/// Start deleting a DNS resolver.
///
/// The resolver's inbound endpoints must be deleted first.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::begin_delete",
    skip(client, options),
    fields(resource_group = %resource_group_name, dns_resolver = %dns_resolver_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    options: Option<&DeleteOptions>,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting dns resolver");

    let url = resolver_url(client, resource_group_name, dns_resolver_name)?;
    let request = apply_if_match(
        ArmRequest::delete(url),
        options.and_then(|o| o.if_match.as_deref()),
    )?;
    Poller::begin(client, request, &[200, 202, 204], None).await
}

/// Get a DNS resolver.
///
/// # Tracing
///
/// Emits a span named `arm::dnsresolver::dns_resolvers::get` with fields
/// `resource_group` and `dns_resolver`.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::get",
    skip(client),
    fields(resource_group = %resource_group_name, dns_resolver = %dns_resolver_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
) -> ArmResult<DnsResolver> {
    tracing::debug!("getting dns resolver");

    let url = resolver_url(client, resource_group_name, dns_resolver_name)?;
    let resolver: DnsResolver = client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(etag = ?resolver.etag, "dns resolver retrieved");
    Ok(resolver)
}

/// List the DNS resolvers of the subscription.
#[tracing::instrument(name = "arm::dnsresolver::dns_resolvers::list", skip(client, options))]
pub fn list(client: &ArmClient, options: Option<&ListOptions>) -> ArmResult<Pager<DnsResolver>> {
    let url = client
        .path(SUBSCRIPTION_PATH)
        .subscription()?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, apply_list(ArmRequest::get(url), options)))
}

/// List the DNS resolvers of a resource group.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::list_by_resource_group",
    skip(client, options),
    fields(resource_group = %resource_group_name)
)]
pub fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<DnsResolver>> {
    let url = client
        .path(RESOURCE_GROUP_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, apply_list(ArmRequest::get(url), options)))
}

/// List the ids of the DNS resolvers attached to a virtual network.
///
/// The first page is requested with `POST`; following pages use `GET` on
/// `nextLink`.
#[tracing::instrument(
    name = "arm::dnsresolver::dns_resolvers::list_by_virtual_network",
    skip(client, options),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name)
)]
pub fn list_by_virtual_network(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<SubResource>> {
    let url = client
        .path(VIRTUAL_NETWORK_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("virtualNetworkName", virtual_network_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, apply_list(ArmRequest::post(url), options)))
}
