//! Attestation provider management.
//!
//! All operations here complete synchronously; none of them returns a poller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_mgmt_attestation::attestation_providers::{self, AttestationServicePatchParams};
//! use azure_mgmt_core::client::ArmClient;
//!
//! # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
//! let provider = attestation_providers::get(client, "my-rg", "myprovider").await?;
//! println!("status: {:?}", provider.properties.and_then(|p| p.status));
//!
//! let patch = AttestationServicePatchParams::default().with_tag("owner", "security");
//! attestation_providers::update(client, "my-rg", "myprovider", &patch).await?;
//!
//! attestation_providers::delete(client, "my-rg", "myprovider").await?;
//! # Ok(())
//! # }
//! ```

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::{ArmError, ArmResult};
use azure_mgmt_core::models::{SystemData, Tags};
use azure_mgmt_core::request::ArmRequest;
use serde::{Deserialize, Serialize};

use crate::models::{JsonWebKeySet, PrivateEndpointConnection, API_VERSION};

const PROVIDER_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Attestation/attestationProviders/{providerName}";
const RESOURCE_GROUP_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Attestation/attestationProviders";
const SUBSCRIPTION_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Attestation/attestationProviders";
const DEFAULT_PROVIDERS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Attestation/defaultProviders";
const DEFAULT_BY_LOCATION_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Attestation/locations/{location}/defaultProvider";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for creating an attestation provider.
///
/// ```rust
/// use azure_mgmt_attestation::attestation_providers::AttestationServiceCreationParams;
///
/// let params = AttestationServiceCreationParams::builder()
///     .location("eastus")
///     .tag("env", "dev")
///     .build()
///     .expect("valid params");
/// assert_eq!(params.location, "eastus");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AttestationServiceCreationParams {
    /// Azure region of the provider.
    pub location: String,

    pub properties: AttestationServiceCreationSpecificParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// Provider-specific creation parameters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationServiceCreationSpecificParams {
    /// Parent certificates of the certificate that signs policy operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_signing_certificates: Option<JsonWebKeySet>,
}

/// Builder for [`AttestationServiceCreationParams`].
#[derive(Debug, Default)]
pub struct AttestationServiceCreationParamsBuilder {
    location: Option<String>,
    policy_signing_certificates: Option<JsonWebKeySet>,
    tags: Option<Tags>,
}

impl AttestationServiceCreationParams {
    /// Create a new builder.
    pub fn builder() -> AttestationServiceCreationParamsBuilder {
        AttestationServiceCreationParamsBuilder::default()
    }
}

impl AttestationServiceCreationParamsBuilder {
    /// Set the region. **Required.**
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the policy signing certificates.
    pub fn policy_signing_certificates(mut self, keys: JsonWebKeySet) -> Self {
        self.policy_signing_certificates = Some(keys);
        self
    }

    /// Add a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build the parameters, returning an error if the location is missing.
    pub fn build(self) -> ArmResult<AttestationServiceCreationParams> {
        let location = self
            .location
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| ArmError::Builder("location is required".into()))?;

        Ok(AttestationServiceCreationParams {
            location,
            properties: AttestationServiceCreationSpecificParams {
                policy_signing_certificates: self.policy_signing_certificates,
            },
            tags: self.tags,
        })
    }
}

/// Parameters for patching an attestation provider. Only tags can change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttestationServicePatchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl AttestationServicePatchParams {
    /// Add a tag to the patch.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Status of an attestation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationServiceStatus {
    Ready,
    NotReady,
    Error,
    #[serde(untagged)]
    Other(String),
}

/// Properties of an attestation provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    /// URI of the attestation service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attest_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AttestationServiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_model: Option<String>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_endpoint_connections: Vec<PrivateEndpointConnection>,
}

/// An attestation provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationProvider {
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
    pub properties: Option<StatusResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

/// A list of attestation providers. These lists are not paged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationProviderListResult {
    #[serde(default)]
    pub value: Vec<AttestationProvider>,
    #[serde(default)]
    pub system_data: Option<SystemData>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Get an attestation provider.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_attestation::attestation_providers;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let provider = attestation_providers::get(client, "my-rg", "myprovider").await?;
/// println!("{:?}", provider.id);
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `arm::attestation::attestation_providers::get` with
/// fields `resource_group` and `provider_name`.
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::get",
    skip(client),
    fields(resource_group = %resource_group_name, provider_name = %provider_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
) -> ArmResult<AttestationProvider> {
    tracing::debug!("getting attestation provider");

    let url = client
        .path(PROVIDER_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .into_url(API_VERSION)?;
    let provider: AttestationProvider = client.send_json(&ArmRequest::get(url), &[200]).await?;

    Ok(provider)
}

/// Create or replace an attestation provider.
///
/// The service answers `201` for a new provider and `200` for a replaced one.
///
/// # Tracing
///
/// Emits a span named `arm::attestation::attestation_providers::create` with
/// fields `resource_group`, `provider_name` and `location`.
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::create",
    skip(client, params),
    fields(
        resource_group = %resource_group_name,
        provider_name = %provider_name,
        location = %params.location
    )
)]
pub async fn create(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
    params: &AttestationServiceCreationParams,
) -> ArmResult<AttestationProvider> {
    tracing::debug!("creating attestation provider");

    let url = client
        .path(PROVIDER_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .into_url(API_VERSION)?;
    let request = ArmRequest::put(url).json(params)?;
    let provider: AttestationProvider = client.send_json(&request, &[200, 201]).await?;

    tracing::debug!(id = ?provider.id, "attestation provider created");
    Ok(provider)
}

/// Update the tags of an attestation provider.
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::update",
    skip(client, params),
    fields(resource_group = %resource_group_name, provider_name = %provider_name)
)]
pub async fn update(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
    params: &AttestationServicePatchParams,
) -> ArmResult<AttestationProvider> {
    tracing::debug!("updating attestation provider");

    let url = client
        .path(PROVIDER_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .into_url(API_VERSION)?;
    let request = ArmRequest::patch(url).json(params)?;
    client.send_json(&request, &[200]).await
}

/// Delete an attestation provider.
///
/// Deleting a provider that does not exist succeeds with `204`.
///
/// # Tracing
///
/// Emits a span named `arm::attestation::attestation_providers::delete` with
/// fields `resource_group` and `provider_name`.
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::delete",
    skip(client),
    fields(resource_group = %resource_group_name, provider_name = %provider_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    provider_name: &str,
) -> ArmResult<()> {
    tracing::debug!("deleting attestation provider");

    let url = client
        .path(PROVIDER_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("providerName", provider_name)?
        .into_url(API_VERSION)?;
    let response = client.send(&ArmRequest::delete(url), &[200, 204]).await?;

    tracing::debug!(status = response.status().as_u16(), "attestation provider deleted");
    Ok(())
}

/// List the attestation providers of the subscription.
#[tracing::instrument(name = "arm::attestation::attestation_providers::list", skip(client))]
pub async fn list(client: &ArmClient) -> ArmResult<AttestationProviderListResult> {
    tracing::debug!("listing attestation providers");

    let url = client
        .path(SUBSCRIPTION_PATH)
        .subscription()?
        .into_url(API_VERSION)?;
    let list: AttestationProviderListResult =
        client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(count = list.value.len(), "attestation providers listed");
    Ok(list)
}

/// List the attestation providers of a resource group.
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::list_by_resource_group",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<AttestationProviderListResult> {
    tracing::debug!("listing attestation providers in resource group");

    let url = client
        .path(RESOURCE_GROUP_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .into_url(API_VERSION)?;
    let list: AttestationProviderListResult =
        client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(count = list.value.len(), "attestation providers listed");
    Ok(list)
}

/// List the default attestation provider of every region.
#[tracing::instrument(name = "arm::attestation::attestation_providers::list_default", skip(client))]
pub async fn list_default(client: &ArmClient) -> ArmResult<AttestationProviderListResult> {
    tracing::debug!("listing default attestation providers");

    let url = client
        .path(DEFAULT_PROVIDERS_PATH)
        .subscription()?
        .into_url(API_VERSION)?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// Get the default attestation provider of a region.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_attestation::attestation_providers;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let provider = attestation_providers::get_default_by_location(client, "westus").await?;
/// println!("{:?}", provider.properties.and_then(|p| p.attest_uri));
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::attestation::attestation_providers::get_default_by_location",
    skip(client),
    fields(location = %location)
)]
pub async fn get_default_by_location(
    client: &ArmClient,
    location: &str,
) -> ArmResult<AttestationProvider> {
    tracing::debug!("getting default attestation provider");

    let url = client
        .path(DEFAULT_BY_LOCATION_PATH)
        .subscription()?
        .param("location", location)?
        .into_url(API_VERSION)?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_path() -> String {
        resource_group_path(&format!(
            "/providers/Microsoft.Attestation/attestationProviders/{TEST_PROVIDER}"
        ))
    }

    fn provider_json() -> serde_json::Value {
        serde_json::json!({
            "id": provider_path(),
            "name": TEST_PROVIDER,
            "type": "Microsoft.Attestation/attestationProviders",
            "location": TEST_LOCATION,
            "tags": {"env": "dev"},
            "properties": {
                "attestUri": "https://myattestationprovider.eus.attest.azure.net",
                "status": "Ready",
                "trustModel": "Isolated"
            },
            "systemData": {
                "createdBy": "someone@contoso.com",
                "createdByType": "User",
                "createdAt": "2021-06-01T17:44:01Z"
            }
        })
    }

    // --- Cycle 1: Parameter serialization tests ---

    #[test]
    fn test_creation_params_serialization() {
        let params = AttestationServiceCreationParams::builder()
            .location(TEST_LOCATION)
            .tag("env", "dev")
            .build()
            .expect("valid params");

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "location": TEST_LOCATION,
                "properties": {},
                "tags": {"env": "dev"}
            })
        );
    }

    #[test]
    fn test_creation_params_require_location() {
        let err = AttestationServiceCreationParams::builder()
            .build()
            .expect_err("location is required");
        assert!(err.to_string().contains("location is required"));

        let err = AttestationServiceCreationParams::builder()
            .location("  ")
            .build()
            .expect_err("blank location");
        assert!(matches!(err, ArmError::Builder(_)));
    }

    #[test]
    fn test_patch_params_skip_absent_tags() {
        let json = serde_json::to_string(&AttestationServicePatchParams::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_provider_deserialization() {
        let provider: AttestationProvider = serde_json::from_value(provider_json()).unwrap();

        let props = provider.properties.expect("properties");
        assert_eq!(props.status, Some(AttestationServiceStatus::Ready));
        assert_eq!(props.trust_model.as_deref(), Some("Isolated"));
        assert!(props.private_endpoint_connections.is_empty());
        assert_eq!(
            provider.resource_type.as_deref(),
            Some("Microsoft.Attestation/attestationProviders")
        );
        assert!(provider.system_data.unwrap().created_at.is_some());
    }

    // --- Cycle 2: Get and create API tests ---

    #[tokio::test]
    async fn test_get_provider_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(provider_path()))
            .and(query_param("api-version", API_VERSION))
            .and(header("Authorization", bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let provider = get(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER)
            .await
            .expect("should succeed");

        assert_eq!(provider.name.as_deref(), Some(TEST_PROVIDER));
        assert_eq!(provider.tags.unwrap()["env"], "dev");
    }

    #[tokio::test]
    async fn test_get_rejects_empty_resource_group() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = get(&client, "", TEST_PROVIDER).await.expect_err("empty name");
        assert_eq!(err.to_string(), "parameter resourceGroupName cannot be empty");
    }

    #[tokio::test]
    async fn test_create_provider_accepts_201() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(provider_path()))
            .and(query_param("api-version", API_VERSION))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "location": TEST_LOCATION,
                "properties": {
                    "policySigningCertificates": {"keys": [{"kty": "RSA", "x5c": ["MIIC"]}]}
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(provider_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let params = AttestationServiceCreationParams::builder()
            .location(TEST_LOCATION)
            .policy_signing_certificates(JsonWebKeySet {
                keys: vec![crate::models::JsonWebKey {
                    kty: "RSA".into(),
                    x5c: vec!["MIIC".into()],
                    ..Default::default()
                }],
            })
            .build()
            .unwrap();

        let provider = create(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER, &params)
            .await
            .expect("should succeed");
        assert_eq!(provider.location.as_deref(), Some(TEST_LOCATION));
    }

    #[tokio::test]
    async fn test_create_provider_conflict_is_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(provider_path()))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {"code": "Conflict", "message": "provider already exists"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let params = AttestationServiceCreationParams::builder()
            .location(TEST_LOCATION)
            .build()
            .unwrap();

        let err = create(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER, &params)
            .await
            .expect_err("conflict");
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.error_code(), Some("Conflict"));
    }

    // --- Cycle 3: Update and delete API tests ---

    #[tokio::test]
    async fn test_update_provider_sends_tags() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(provider_path()))
            .and(body_json(serde_json::json!({"tags": {"owner": "security"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let patch = AttestationServicePatchParams::default().with_tag("owner", "security");
        update(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER, &patch)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn test_delete_provider_accepts_204() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(provider_path()))
            .and(query_param("api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        delete(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER)
            .await
            .expect("should succeed");
    }

    // --- Cycle 4: List API tests ---

    #[tokio::test]
    async fn test_list_by_subscription() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(subscription_path(
                "/providers/Microsoft.Attestation/attestationProviders",
            )))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"value": [provider_json(), provider_json()]})),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let list = list(&client).await.expect("should succeed");
        assert_eq!(list.value.len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_resource_group() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resource_group_path(
                "/providers/Microsoft.Attestation/attestationProviders",
            )))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"value": [provider_json()]})),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let list = list_by_resource_group(&client, TEST_RESOURCE_GROUP)
            .await
            .expect("should succeed");
        assert_eq!(list.value[0].name.as_deref(), Some(TEST_PROVIDER));
    }

    #[tokio::test]
    async fn test_default_providers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(subscription_path(
                "/providers/Microsoft.Attestation/defaultProviders",
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "sharedeus", "location": "East US"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(subscription_path(
                "/providers/Microsoft.Attestation/locations/Central%20US/defaultProvider",
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "sharedcus",
                "location": "Central US"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let defaults = list_default(&client).await.expect("should succeed");
        assert_eq!(defaults.value[0].name.as_deref(), Some("sharedeus"));

        let cus = get_default_by_location(&client, "Central US")
            .await
            .expect("should succeed");
        assert_eq!(cus.name.as_deref(), Some("sharedcus"));
    }

    // --- Cycle 5: Tracing instrumentation tests ---

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_get_emits_span() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(provider_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_json()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let _ = get(&client, TEST_RESOURCE_GROUP, TEST_PROVIDER).await;

        assert!(logs_contain("arm::attestation::attestation_providers::get"));
        assert!(logs_contain("getting attestation provider"));
    }
}
