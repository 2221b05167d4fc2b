//! Databricks workspace management.
//!
//! Creating, updating and deleting a workspace are long-running operations:
//! the `begin_*` functions return a [`Poller`] that tracks the operation until
//! it completes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
//! use azure_mgmt_databricks::workspaces::{self, WorkspaceUpdate};
//!
//! # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
//! let update = WorkspaceUpdate::default().with_tag("team", "analytics");
//! let ws = workspaces::begin_update(client, "my-rg", "my-ws", &update)
//!     .await?
//!     .poll_until_done(DEFAULT_POLL_FREQUENCY)
//!     .await?;
//! println!("{:?}", ws.tags);
//!
//! workspaces::begin_delete(client, "my-rg", "my-ws")
//!     .await?
//!     .poll_until_done(DEFAULT_POLL_FREQUENCY)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::{SystemData, Tags};
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::Poller;
use azure_mgmt_core::request::ArmRequest;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::models::{CreatedBy, ManagedIdentityConfiguration, ProvisioningState, Sku, API_VERSION};

const WORKSPACE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Databricks/workspaces/{workspaceName}";
const RESOURCE_GROUP_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Databricks/workspaces";
const SUBSCRIPTION_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Databricks/workspaces";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Value type of a custom workspace parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomParameterType {
    Bool,
    Object,
    String,
    #[serde(untagged)]
    Other(String),
}

/// A custom workspace parameter, serialized as `{"type": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceCustomParameter<T> {
    /// Read-only; filled in by the service.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<CustomParameterType>,
    pub value: T,
}

impl<T> WorkspaceCustomParameter<T> {
    /// Wrap a parameter value.
    pub fn new(value: T) -> Self {
        Self {
            parameter_type: None,
            value,
        }
    }
}

/// Custom parameters used when creating a workspace.
///
/// Most of them deploy the workspace into a customer-managed virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCustomParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aml_workspace_id: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_virtual_network_id: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_public_subnet_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_private_subnet_name: Option<WorkspaceCustomParameter<String>>,
    /// Secure cluster connectivity: no public IPs on cluster nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_no_public_ip: Option<WorkspaceCustomParameter<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_backend_pool_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_id: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_gateway_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepare_encryption: Option<WorkspaceCustomParameter<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_infrastructure_encryption: Option<WorkspaceCustomParameter<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_sku_name: Option<WorkspaceCustomParameter<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnet_address_prefix: Option<WorkspaceCustomParameter<String>>,
    /// Read-only tags applied to the managed resource group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_tags: Option<WorkspaceCustomParameter<serde_json::Value>>,
}

/// Key Vault key used for customer-managed encryption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultKey {
    pub key_vault_uri: String,
    pub key_name: String,
    pub key_version: String,
}

/// Customer-managed key for the workspace's managed services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionV2 {
    /// Always `Microsoft.Keyvault`.
    pub key_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_vault_properties: Option<KeyVaultKey>,
}

/// Customer-managed key for the managed disks of the workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDiskEncryption {
    pub key_source: String,
    pub key_vault_properties: KeyVaultKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_to_latest_key_version_enabled: Option<bool>,
}

/// Encryption settings per workspace entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionEntitiesDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_services: Option<EncryptionV2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_disk: Option<ManagedDiskEncryption>,
}

/// Encryption settings of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspacePropertiesEncryption {
    pub entities: EncryptionEntitiesDefinition,
}

/// Whether the workspace is reachable from public networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicNetworkAccess {
    Enabled,
    Disabled,
    #[serde(untagged)]
    Other(String),
}

/// Which network security group rules the service manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredNsgRules {
    AllRules,
    NoAzureDatabricksRules,
    NoAzureServiceRules,
    #[serde(untagged)]
    Other(String),
}

/// A principal granted access to the workspace's managed resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceProviderAuthorization {
    pub principal_id: String,
    pub role_definition_id: String,
}

/// Properties of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceProperties {
    /// ARM id of the managed resource group. Required on create.
    pub managed_resource_group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<WorkspaceCustomParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_definition_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorizations: Vec<WorkspaceProviderAuthorization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<CreatedBy>,
    #[serde(
        default,
        with = "azure_mgmt_core::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date_time: Option<DateTime<Utc>>,
    /// Unique numeric id of the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Host name of the workspace, e.g. `adb-1234.5.azuredatabricks.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_identity: Option<ManagedIdentityConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_disk_identity: Option<ManagedIdentityConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_encryption_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<WorkspacePropertiesEncryption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_network_access: Option<PublicNetworkAccess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_nsg_rules: Option<RequiredNsgRules>,
}

/// A Databricks workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    pub properties: WorkspaceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

impl Workspace {
    /// A workspace in `location` whose managed resources live in
    /// `managed_resource_group_id`.
    pub fn new(location: impl Into<String>, managed_resource_group_id: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            properties: WorkspaceProperties {
                managed_resource_group_id: managed_resource_group_id.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the pricing tier (`standard`, `premium` or `trial`).
    pub fn with_sku(mut self, name: impl Into<String>) -> Self {
        self.sku = Some(Sku {
            name: name.into(),
            tier: None,
        });
        self
    }

    /// Set the custom parameters.
    pub fn with_parameters(mut self, parameters: WorkspaceCustomParameters) -> Self {
        self.properties.parameters = Some(parameters);
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Patch body of [`begin_update`]. Only tags can be updated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl WorkspaceUpdate {
    /// Add a tag to the patch.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn workspace_url(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(WORKSPACE_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("workspaceName", workspace_name)?
        .into_url(API_VERSION)
}

/// Get a workspace.
///
/// # Tracing
///
/// Emits a span named `arm::databricks::workspaces::get` with fields
/// `resource_group` and `workspace`.
#[tracing::instrument(
    name = "arm::databricks::workspaces::get",
    skip(client),
    fields(resource_group = %resource_group_name, workspace = %workspace_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
) -> ArmResult<Workspace> {
    tracing::debug!("getting workspace");

    let url = workspace_url(client, resource_group_name, workspace_name)?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// Start creating or replacing a workspace.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
/// # use azure_mgmt_databricks::workspaces::{self, Workspace};
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let ws = Workspace::new("westus", "/subscriptions/sub/resourceGroups/my-ws-managed")
///     .with_sku("premium");
/// let poller = workspaces::begin_create_or_update(client, "my-rg", "my-ws", &ws).await?;
///
/// // The token can be stored and the operation resumed from another process.
/// let token = poller.resume_token()?;
/// # let _ = token;
/// let created = poller.poll_until_done(DEFAULT_POLL_FREQUENCY).await?;
/// println!("{:?}", created.properties.workspace_url);
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `arm::databricks::workspaces::begin_create_or_update`
/// with fields `resource_group`, `workspace` and `location`.
#[tracing::instrument(
    name = "arm::databricks::workspaces::begin_create_or_update",
    skip(client, parameters),
    fields(
        resource_group = %resource_group_name,
        workspace = %workspace_name,
        location = %parameters.location
    )
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    parameters: &Workspace,
) -> ArmResult<Poller<Workspace>> {
    tracing::debug!("creating workspace");

    let url = workspace_url(client, resource_group_name, workspace_name)?;
    let request = ArmRequest::put(url).json(parameters)?;
    let poller = Poller::begin(client, request, &[200, 201], None).await?;

    tracing::debug!(status = poller.status(), "workspace creation started");
    Ok(poller)
}

/// Start updating the tags of a workspace.
#[tracing::instrument(
    name = "arm::databricks::workspaces::begin_update",
    skip(client, parameters),
    fields(resource_group = %resource_group_name, workspace = %workspace_name)
)]
pub async fn begin_update(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
    parameters: &WorkspaceUpdate,
) -> ArmResult<Poller<Workspace>> {
    tracing::debug!("updating workspace");

    let url = workspace_url(client, resource_group_name, workspace_name)?;
    let request = ArmRequest::patch(url).json(parameters)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Start deleting a workspace and its managed resource group.
///
/// # Tracing
///
/// Emits a span named `arm::databricks::workspaces::begin_delete` with fields
/// `resource_group` and `workspace`.
#[tracing::instrument(
    name = "arm::databricks::workspaces::begin_delete",
    skip(client),
    fields(resource_group = %resource_group_name, workspace = %workspace_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    workspace_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting workspace");

    let url = workspace_url(client, resource_group_name, workspace_name)?;
    let poller = Poller::begin(client, ArmRequest::delete(url), &[200, 202, 204], None).await?;

    tracing::debug!(status = poller.status(), "workspace deletion started");
    Ok(poller)
}

/// List the workspaces of a resource group.
#[tracing::instrument(
    name = "arm::databricks::workspaces::list_by_resource_group",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<Pager<Workspace>> {
    let url = client
        .path(RESOURCE_GROUP_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}

/// List the workspaces of the subscription.
#[tracing::instrument(name = "arm::databricks::workspaces::list_by_subscription", skip(client))]
pub fn list_by_subscription(client: &ArmClient) -> ArmResult<Pager<Workspace>> {
    let url = client
        .path(SUBSCRIPTION_PATH)
        .subscription()?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}
