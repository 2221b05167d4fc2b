//! HPC cache management.
//!
//! Besides the usual CRUD operations, a cache can be flushed, stopped and
//! started. Those actions are long-running and complete through the
//! async-operation URL.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::{SystemData, Tags};
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::{FinalStateVia, Poller};
use azure_mgmt_core::request::ArmRequest;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ProvisioningStateType, API_VERSION};

const CACHE_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/Microsoft.StorageCache/caches/{cacheName}";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Health of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStateType {
    Unknown,
    Healthy,
    Degraded,
    Down,
    Transitioning,
    Stopping,
    Stopped,
    Upgrading,
    Flushing,
    WaitingForKey,
    StartFailed,
    UpgradeFailed,
    #[serde(untagged)]
    Other(String),
}

/// An outstanding condition that may affect the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(
        default,
        with = "azure_mgmt_core::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<HealthStateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

/// Firmware status of a cache. All read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheUpgradeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_firmware_version: Option<String>,
    /// `available` when an upgrade can be installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_update_status: Option<String>,
    #[serde(
        default,
        with = "azure_mgmt_core::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub firmware_update_deadline: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "azure_mgmt_core::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_firmware_update: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_firmware_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheNetworkSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_addresses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_search_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp_server: Option<String>,
}

/// Properties of a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheProperties {
    #[serde(rename = "cacheSizeGB", default, skip_serializing_if = "Option::is_none")]
    pub cache_size_gb: Option<i32>,
    /// Subnet the cache is deployed into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_settings: Option<CacheNetworkSettings>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<CacheHealth>,
    /// Read-only. Addresses clients mount the cache on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_addresses: Option<Vec<String>>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningStateType>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_status: Option<CacheUpgradeStatus>,
}

/// SKU of a cache, e.g. `Standard_2G`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSku {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheIdentityType {
    SystemAssigned,
    UserAssigned,
    #[serde(rename = "SystemAssigned, UserAssigned")]
    SystemAssignedUserAssigned,
    None,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAssignedIdentitiesValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Managed identity of a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheIdentity {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<CacheIdentityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Keyed by identity resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_assigned_identities: Option<HashMap<String, UserAssignedIdentitiesValue>>,
}

/// An Azure HPC Cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cache {
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
    pub identity: Option<CacheIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<CacheSku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CacheProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

impl Cache {
    /// A cache of `cache_size_gb` in `subnet`.
    pub fn new(
        location: impl Into<String>,
        sku: impl Into<String>,
        cache_size_gb: i32,
        subnet: impl Into<String>,
    ) -> Self {
        Self {
            location: Some(location.into()),
            sku: Some(CacheSku {
                name: Some(sku.into()),
            }),
            properties: Some(CacheProperties {
                cache_size_gb: Some(cache_size_gb),
                subnet: Some(subnet.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }

    /// The reported health state, if any.
    pub fn health_state(&self) -> Option<&HealthStateType> {
        self.properties.as_ref()?.health.as_ref()?.state.as_ref()
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn cache_url(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    action: &str,
) -> ArmResult<url::Url> {
    client
        .path(&format!("{CACHE_PATH}{action}"))
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("cacheName", cache_name)?
        .into_url(API_VERSION)
}

/// Start creating or replacing a cache.
///
/// Creation usually takes more than ten minutes.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
/// # use azure_mgmt_storagecache::caches::{self, Cache};
/// # async fn example(client: &ArmClient, subnet: &str) -> azure_mgmt_core::ArmResult<()> {
/// let cache = caches::begin_create_or_update(
///     client,
///     "my-rg",
///     "cache1",
///     &Cache::new("westus", "Standard_2G", 3072, subnet),
/// )
/// .await?
/// .poll_until_done(DEFAULT_POLL_FREQUENCY)
/// .await?;
/// println!("{:?}", cache.properties.and_then(|p| p.mount_addresses));
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `arm::storagecache::caches::begin_create_or_update`
/// with fields `resource_group` and `cache`.
#[tracing::instrument(
    name = "arm::storagecache::caches::begin_create_or_update",
    skip(client, cache),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    cache: &Cache,
) -> ArmResult<Poller<Cache>> {
    tracing::debug!("creating cache");

    let url = cache_url(client, resource_group_name, cache_name, "")?;
    let request = ArmRequest::put(url).json(cache)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Update a cache. Properties absent from `cache` are left unchanged.
#[tracing::instrument(
    name = "arm::storagecache::caches::update",
    skip(client, cache),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn update(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    cache: &Cache,
) -> ArmResult<Cache> {
    tracing::debug!("updating cache");

    let url = cache_url(client, resource_group_name, cache_name, "")?;
    client
        .send_json(&ArmRequest::patch(url).json(cache)?, &[200])
        .await
}

/// Start deleting a cache. Dirty data is flushed to the storage targets first.
#[tracing::instrument(
    name = "arm::storagecache::caches::begin_delete",
    skip(client),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting cache");

    let url = cache_url(client, resource_group_name, cache_name, "")?;
    Poller::begin(client, ArmRequest::delete(url), &[200, 202, 204], None).await
}

#[tracing::instrument(
    name = "arm::storagecache::caches::get",
    skip(client),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Cache> {
    tracing::debug!("getting cache");

    let url = cache_url(client, resource_group_name, cache_name, "")?;
    let cache: Cache = client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(health = ?cache.health_state(), "cache retrieved");
    Ok(cache)
}

/// List the caches of the subscription.
#[tracing::instrument(name = "arm::storagecache::caches::list", skip(client))]
pub fn list(client: &ArmClient) -> ArmResult<Pager<Cache>> {
    let url = client
        .path("/subscriptions/{subscriptionId}/providers/Microsoft.StorageCache/caches")
        .subscription()?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}

/// List the caches of a resource group.
#[tracing::instrument(
    name = "arm::storagecache::caches::list_by_resource_group",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<Pager<Cache>> {
    let url = client
        .path("/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/Microsoft.StorageCache/caches")
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}

async fn begin_action(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    action: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    let url = cache_url(client, resource_group_name, cache_name, action)?;
    Poller::begin(
        client,
        ArmRequest::post(url),
        &[200, 202, 204],
        Some(FinalStateVia::AzureAsyncOperation),
    )
    .await
}

/// Start writing all dirty data in the cache to its storage targets.
///
/// Client access is suspended until the flush completes.
#[tracing::instrument(
    name = "arm::storagecache::caches::begin_flush",
    skip(client),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn begin_flush(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("flushing cache");
    begin_action(client, resource_group_name, cache_name, "/flush").await
}

/// Start a stopped cache.
#[tracing::instrument(
    name = "arm::storagecache::caches::begin_start",
    skip(client),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn begin_start(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("starting cache");
    begin_action(client, resource_group_name, cache_name, "/start").await
}

/// Stop a cache. Dirty data is flushed first.
#[tracing::instrument(
    name = "arm::storagecache::caches::begin_stop",
    skip(client),
    fields(resource_group = %resource_group_name, cache = %cache_name)
)]
pub async fn begin_stop(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("stopping cache");
    begin_action(client, resource_group_name, cache_name, "/stop").await
}
