//! Inbound endpoints of a DNS resolver.
//!
//! An inbound endpoint gives the resolver an address inside a subnet so that
//! on-premises and peered networks can send it queries.

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

const ENDPOINT_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/dnsResolvers/{dnsResolverName}/inboundEndpoints/{inboundEndpointName}";
const ENDPOINTS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/dnsResolvers/{dnsResolverName}/inboundEndpoints";

// ----- Types -----

/// How the private address of an IP configuration is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpAllocationMethod {
    Static,
    Dynamic,
    #[serde(untagged)]
    Other(String),
}

/// An address of the endpoint inside a subnet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    pub subnet: SubResource,
    /// Required when the allocation method is `Static`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,
}

impl IpConfiguration {
    /// A dynamically allocated address in `subnet_id`.
    pub fn dynamic(subnet_id: impl Into<String>) -> Self {
        Self {
            subnet: SubResource::new(subnet_id),
            private_ip_address: None,
            private_ip_allocation_method: Some(IpAllocationMethod::Dynamic),
        }
    }

    /// The fixed address `address` in `subnet_id`.
    pub fn fixed(subnet_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            subnet: SubResource::new(subnet_id),
            private_ip_address: Some(address.into()),
            private_ip_allocation_method: Some(IpAllocationMethod::Static),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEndpointProperties {
    pub ip_configurations: Vec<IpConfiguration>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,
}

/// An inbound endpoint of a DNS resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEndpoint {
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
    pub etag: Option<String>,
    pub properties: InboundEndpointProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

impl InboundEndpoint {
    /// An endpoint in `location` with the given addresses.
    pub fn new(location: impl Into<String>, ip_configurations: Vec<IpConfiguration>) -> Self {
        Self {
            location: location.into(),
            properties: InboundEndpointProperties {
                ip_configurations,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Patch body of [`begin_update`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct InboundEndpointPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

// ----- API functions -----

fn endpoint_url(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    inbound_endpoint_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(ENDPOINT_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("dnsResolverName", dns_resolver_name)?
        .param("inboundEndpointName", inbound_endpoint_name)?
        .into_url(API_VERSION)
}

/// Start creating or replacing an inbound endpoint.
///
/// # Tracing
///
/// Emits a span named `arm::dnsresolver::inbound_endpoints::begin_create_or_update`
/// with fields `dns_resolver` and `inbound_endpoint`.
#[tracing::instrument(
    name = "arm::dnsresolver::inbound_endpoints::begin_create_or_update",
    skip(client, parameters, options),
    fields(dns_resolver = %dns_resolver_name, inbound_endpoint = %inbound_endpoint_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    inbound_endpoint_name: &str,
    parameters: &InboundEndpoint,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<Poller<InboundEndpoint>> {
    tracing::debug!(
        ip_configurations = parameters.properties.ip_configurations.len(),
        "creating inbound endpoint"
    );

    let url = endpoint_url(
        client,
        resource_group_name,
        dns_resolver_name,
        inbound_endpoint_name,
    )?;
    let request = apply_create_or_update(ArmRequest::put(url).json(parameters)?, options)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Start updating the tags of an inbound endpoint.
#[tracing::instrument(
    name = "arm::dnsresolver::inbound_endpoints::begin_update",
    skip(client, parameters, options),
    fields(dns_resolver = %dns_resolver_name, inbound_endpoint = %inbound_endpoint_name)
)]
pub async fn begin_update(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    inbound_endpoint_name: &str,
    parameters: &InboundEndpointPatch,
    options: Option<&UpdateOptions>,
) -> ArmResult<Poller<InboundEndpoint>> {
    tracing::debug!("updating inbound endpoint");

    let url = endpoint_url(
        client,
        resource_group_name,
        dns_resolver_name,
        inbound_endpoint_name,
    )?;
    let request = apply_if_match(
        ArmRequest::patch(url).json(parameters)?,
        options.and_then(|o| o.if_match.as_deref()),
    )?;
    Poller::begin(client, request, &[200, 202], None).await
}

/// Start deleting an inbound endpoint.
#[tracing::instrument(
    name = "arm::dnsresolver::inbound_endpoints::begin_delete",
    skip(client, options),
    fields(dns_resolver = %dns_resolver_name, inbound_endpoint = %inbound_endpoint_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    inbound_endpoint_name: &str,
    options: Option<&DeleteOptions>,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting inbound endpoint");

    let url = endpoint_url(
        client,
        resource_group_name,
        dns_resolver_name,
        inbound_endpoint_name,
    )?;
    let request = apply_if_match(
        ArmRequest::delete(url),
        options.and_then(|o| o.if_match.as_deref()),
    )?;
    Poller::begin(client, request, &[200, 202, 204], None).await
}

/// Get an inbound endpoint.
#[tracing::instrument(
    name = "arm::dnsresolver::inbound_endpoints::get",
    skip(client),
    fields(dns_resolver = %dns_resolver_name, inbound_endpoint = %inbound_endpoint_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    inbound_endpoint_name: &str,
) -> ArmResult<InboundEndpoint> {
    tracing::debug!("getting inbound endpoint");

    let url = endpoint_url(
        client,
        resource_group_name,
        dns_resolver_name,
        inbound_endpoint_name,
    )?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// List the inbound endpoints of a DNS resolver.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_dnsresolver::inbound_endpoints;
/// # use azure_mgmt_dnsresolver::models::ListOptions;
/// use futures::TryStreamExt;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let options = ListOptions { top: Some(20) };
/// let endpoints: Vec<_> = inbound_endpoints::list(client, "my-rg", "resolver1", Some(&options))?
///     .into_stream()
///     .try_collect()
///     .await?;
/// # let _ = endpoints;
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::dnsresolver::inbound_endpoints::list",
    skip(client, options),
    fields(dns_resolver = %dns_resolver_name)
)]
pub fn list(
    client: &ArmClient,
    resource_group_name: &str,
    dns_resolver_name: &str,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<InboundEndpoint>> {
    let url = client
        .path(ENDPOINTS_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("dnsResolverName", dns_resolver_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, apply_list(ArmRequest::get(url), options)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use azure_mgmt_core::ArmError;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUBNET: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/inbound";

    fn endpoint_json(state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": resolver_path("/inboundEndpoints/ep1"),
            "name": "ep1",
            "type": "Microsoft.Network/dnsResolvers/inboundEndpoints",
            "location": "westus2",
            "etag": "\"etag-ep1\"",
            "properties": {
                "ipConfigurations": [{
                    "subnet": {"id": SUBNET},
                    "privateIpAddress": "10.0.0.4",
                    "privateIpAllocationMethod": "Static"
                }],
                "provisioningState": state
            }
        })
    }

    // --- Cycle 1: Model tests ---

    #[test]
    fn test_ip_configuration_serialization() {
        let dynamic = serde_json::to_value(IpConfiguration::dynamic(SUBNET)).unwrap();
        assert_eq!(
            dynamic,
            serde_json::json!({"subnet": {"id": SUBNET}, "privateIpAllocationMethod": "Dynamic"})
        );

        let fixed: IpConfiguration = serde_json::from_value(serde_json::json!({
            "subnet": {"id": SUBNET},
            "privateIpAddress": "10.0.0.9",
            "privateIpAllocationMethod": "Static"
        }))
        .unwrap();
        assert_eq!(fixed, IpConfiguration::fixed(SUBNET, "10.0.0.9"));
    }

    // --- Cycle 2: Create API tests ---

    #[tokio::test]
    async fn test_create_endpoint_polls_async_operation() {
        let server = MockServer::start().await;
        let operation_url = format!("{}/operations/ep1", server.uri());

        Mock::given(method("PUT"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .and(body_json(serde_json::json!({
                "location": "westus2",
                "properties": {
                    "ipConfigurations": [{
                        "subnet": {"id": SUBNET},
                        "privateIpAddress": "10.0.0.4",
                        "privateIpAllocationMethod": "Static"
                    }]
                }
            })))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/ep1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(endpoint_json("Succeeded")))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let endpoint = InboundEndpoint::new("westus2", vec![IpConfiguration::fixed(SUBNET, "10.0.0.4")]);
        let created = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_RESOLVER,
            "ep1",
            &endpoint,
            None,
        )
        .await
        .expect("should start")
        .poll_until_done(FAST_POLL)
        .await
        .expect("should finish");

        assert_eq!(created.etag.as_deref(), Some("\"etag-ep1\""));
        assert_eq!(
            created.properties.ip_configurations[0].private_ip_allocation_method,
            Some(IpAllocationMethod::Static)
        );
    }

    #[tokio::test]
    async fn test_create_endpoint_failure_surfaces_error() {
        let server = MockServer::start().await;
        let operation_url = format!("{}/operations/ep-bad", server.uri());

        Mock::given(method("PUT"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str())
                    .set_body_json(endpoint_json("Creating")),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/ep-bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Failed",
                "error": {"code": "SubnetInUse", "message": "subnet is delegated elsewhere"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_RESOLVER,
            "ep1",
            &InboundEndpoint::new("westus2", vec![IpConfiguration::dynamic(SUBNET)]),
            None,
        )
        .await
        .expect("should start")
        .poll_until_done(FAST_POLL)
        .await
        .expect_err("operation failed");

        assert!(matches!(err, ArmError::OperationFailed { .. }));
        assert_eq!(err.error_code(), Some("SubnetInUse"));
    }

    // --- Cycle 3: Update, get and delete API tests ---

    #[tokio::test]
    async fn test_update_get_and_delete() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .and(body_json(serde_json::json!({"tags": {"env": "prod"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(endpoint_json("Succeeded")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(endpoint_json("Succeeded")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(resolver_path("/inboundEndpoints/ep1")))
            .and(header("If-Match", "\"etag-ep1\""))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;

        let patch = InboundEndpointPatch {
            tags: Some(Tags::from([("env".to_string(), "prod".to_string())])),
        };
        let poller = begin_update(&client, TEST_RESOURCE_GROUP, TEST_RESOLVER, "ep1", &patch, None)
            .await
            .expect("should start");
        assert!(poller.done());

        let endpoint = get(&client, TEST_RESOURCE_GROUP, TEST_RESOLVER, "ep1")
            .await
            .expect("should get");

        let options = DeleteOptions {
            if_match: endpoint.etag.clone(),
        };
        let poller = begin_delete(&client, TEST_RESOURCE_GROUP, TEST_RESOLVER, "ep1", Some(&options))
            .await
            .expect("should delete");
        assert!(poller.done());
    }

    #[tokio::test]
    async fn test_get_rejects_empty_endpoint_name() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = get(&client, TEST_RESOURCE_GROUP, TEST_RESOLVER, "")
            .await
            .expect_err("empty name");
        assert_eq!(err.to_string(), "parameter inboundEndpointName cannot be empty");
    }

    // --- Cycle 4: List API tests ---

    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resolver_path("/inboundEndpoints")))
            .and(query_param("$top", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [endpoint_json("Succeeded")],
                "nextLink": format!("{}/endpoints-page2", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/endpoints-page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [endpoint_json("Updating")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let mut pager = list(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_RESOLVER,
            Some(&ListOptions { top: Some(1) }),
        )
        .unwrap();

        let mut states = Vec::new();
        while let Some(page) = pager.next_page().await.expect("page") {
            states.extend(page.value.into_iter().map(|e| e.properties.provisioning_state));
        }
        assert_eq!(
            states,
            vec![
                Some(ProvisioningState::Succeeded),
                Some(ProvisioningState::Updating)
            ]
        );
    }
}
