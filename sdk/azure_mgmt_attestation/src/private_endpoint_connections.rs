//! Private endpoint connections of an attestation provider.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;
use serde::Deserialize;

use crate::models::{PrivateEndpointConnection, API_VERSION};

const CONNECTION_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Attestation/attestationProviders/{providerName}/privateEndpointConnections/{privateEndpointConnectionName}";
const CONNECTIONS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Attestation/attestationProviders/{providerName}/privateEndpointConnections";

/// The private endpoint connections of a provider. Not paged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivateEndpointConnectionListResult {
    #[serde(default)]
    pub value: Vec<PrivateEndpointConnection>,
}

/// Get a private endpoint connection.
#[tracing::instrument(
    name = "arm::attestation::private_endpoint_connections::get",
    skip(client),
    fields(provider_name = %provider_name, connection = %connection_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
    connection_name: &str,
) -> ArmResult<PrivateEndpointConnection> {
    tracing::debug!("getting private endpoint connection");

    let url = client
        .path(CONNECTION_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .param("privateEndpointConnectionName", connection_name)?
        .into_url(API_VERSION)?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// Create or update the state of a private endpoint connection.
///
/// Typically used to approve or reject a pending connection by setting
/// `properties.privateLinkServiceConnectionState.status`.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_attestation::models::*;
/// # use azure_mgmt_attestation::private_endpoint_connections;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let connection = PrivateEndpointConnection {
///     properties: Some(PrivateEndpointConnectionProperties {
///         private_link_service_connection_state: Some(PrivateLinkServiceConnectionState {
///             status: Some(PrivateEndpointServiceConnectionStatus::Approved),
///             description: Some("approved by admin".into()),
///             ..Default::default()
///         }),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// private_endpoint_connections::create(client, "my-rg", "myprovider", "conn1", &connection).await?;
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::attestation::private_endpoint_connections::create",
    skip(client, connection),
    fields(provider_name = %provider_name, connection = %connection_name)
)]
pub async fn create(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
    connection_name: &str,
    connection: &PrivateEndpointConnection,
) -> ArmResult<PrivateEndpointConnection> {
    tracing::debug!("updating private endpoint connection");

    let url = client
        .path(CONNECTION_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .param("privateEndpointConnectionName", connection_name)?
        .into_url(API_VERSION)?;
    let request = ArmRequest::put(url).json(connection)?;
    let updated: PrivateEndpointConnection = client.send_json(&request, &[200]).await?;

    tracing::debug!(
        state = ?updated
            .properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_ref()),
        "private endpoint connection updated"
    );
    Ok(updated)
}

/// Delete a private endpoint connection.
#[tracing::instrument(
    name = "arm::attestation::private_endpoint_connections::delete",
    skip(client),
    fields(provider_name = %provider_name, connection = %connection_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
    connection_name: &str,
) -> ArmResult<()> {
    tracing::debug!("deleting private endpoint connection");

    let url = client
        .path(CONNECTION_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .param("privateEndpointConnectionName", connection_name)?
        .into_url(API_VERSION)?;
    client.send(&ArmRequest::delete(url), &[200, 204]).await?;
    Ok(())
}

/// List the private endpoint connections of a provider.
#[tracing::instrument(
    name = "arm::attestation::private_endpoint_connections::list",
    skip(client),
    fields(provider_name = %provider_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
) -> ArmResult<PrivateEndpointConnectionListResult> {
    tracing::debug!("listing private endpoint connections");

    let url = client
        .path(CONNECTIONS_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .into_url(API_VERSION)?;
    let list: PrivateEndpointConnectionListResult =
        client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(count = list.value.len(), "private endpoint connections listed");
    Ok(list)
}
