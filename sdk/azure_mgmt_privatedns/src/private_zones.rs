//! Private DNS zones.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::Tags;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::Poller;
use azure_mgmt_core::request::ArmRequest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::models::{
    with_if_match, with_preconditions, with_top, CreateOrUpdateOptions, IfMatchOptions,
    ListOptions, ProvisioningState, API_VERSION, GLOBAL_LOCATION,
};

const ZONE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}";

// ----- Types -----

/// Properties of a private zone. All read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateZoneProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_record_sets: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_record_sets: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_virtual_network_links: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_virtual_network_links: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_virtual_network_links_with_registration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_virtual_network_links_with_registration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
}

/// A private DNS zone, e.g. `privatelink.blob.core.windows.net`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateZone {
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
    pub properties: Option<PrivateZoneProperties>,
}

impl PrivateZone {
    /// A zone in the `global` location.
    pub fn global() -> Self {
        Self {
            location: Some(GLOBAL_LOCATION.to_string()),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn provisioning_state(&self) -> Option<&ProvisioningState> {
        self.properties.as_ref()?.provisioning_state.as_ref()
    }
}

// ----- API functions -----

fn zone_url(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(ZONE_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .into_url(API_VERSION)
}

/// Start creating or replacing a private zone.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
/// # use azure_mgmt_privatedns::models::CreateOrUpdateOptions;
/// # use azure_mgmt_privatedns::private_zones::{self, PrivateZone};
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let zone = private_zones::begin_create_or_update(
///     client,
///     "my-rg",
///     "privatezone1.com",
///     &PrivateZone::global().with_tag("env", "prod"),
///     Some(&CreateOrUpdateOptions::create_only()),
/// )
/// .await?
/// .poll_until_done(DEFAULT_POLL_FREQUENCY)
/// .await?;
/// println!("{:?}", zone.etag);
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `arm::privatedns::private_zones::begin_create_or_update`
/// with fields `resource_group` and `zone`.
#[tracing::instrument(
    name = "arm::privatedns::private_zones::begin_create_or_update",
    skip(client, parameters, options),
    fields(resource_group = %resource_group_name, zone = %private_zone_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    parameters: &PrivateZone,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<Poller<PrivateZone>> {
    tracing::debug!("creating private zone");

    let url = zone_url(client, resource_group_name, private_zone_name)?;
    let request = with_preconditions(ArmRequest::put(url).json(parameters)?, options)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Start updating a private zone. Only tags can change.
#[tracing::instrument(
    name = "arm::privatedns::private_zones::begin_update",
    skip(client, parameters, options),
    fields(resource_group = %resource_group_name, zone = %private_zone_name)
)]
pub async fn begin_update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    parameters: &PrivateZone,
    options: Option<&IfMatchOptions>,
) -> ArmResult<Poller<PrivateZone>> {
    tracing::debug!("updating private zone");

    let url = zone_url(client, resource_group_name, private_zone_name)?;
    let request = with_if_match(ArmRequest::patch(url).json(parameters)?, options)?;
    Poller::begin(client, request, &[200, 202], None).await
}

/// Start deleting a private zone.
///
/// Fails while virtual network links still reference the zone.
#[tracing::instrument(
    name = "arm::privatedns::private_zones::begin_delete",
    skip(client, options),
    fields(resource_group = %resource_group_name, zone = %private_zone_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    options: Option<&IfMatchOptions>,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting private zone");

    let url = zone_url(client, resource_group_name, private_zone_name)?;
    let request = with_if_match(ArmRequest::delete(url), options)?;
    Poller::begin(client, request, &[200, 202, 204], None).await
}

/// Get a private zone. Record sets are not included.
#[tracing::instrument(
    name = "arm::privatedns::private_zones::get",
    skip(client),
    fields(resource_group = %resource_group_name, zone = %private_zone_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
) -> ArmResult<PrivateZone> {
    tracing::debug!("getting private zone");

    let url = zone_url(client, resource_group_name, private_zone_name)?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// List the private zones of the subscription.
#[tracing::instrument(name = "arm::privatedns::private_zones::list", skip(client, options))]
pub fn list(client: &ArmClient, options: Option<&ListOptions>) -> ArmResult<Pager<PrivateZone>> {
    let url = client
        .path("/subscriptions/{subscriptionId}/providers/Microsoft.Network/privateDnsZones")
        .subscription()?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, with_top(ArmRequest::get(url), options)))
}

/// List the private zones of a resource group.
#[tracing::instrument(
    name = "arm::privatedns::private_zones::list_by_resource_group",
    skip(client, options),
    fields(resource_group = %resource_group_name)
)]
pub fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
    options: Option<&ListOptions>,
) -> ArmResult<Pager<PrivateZone>> {
    let url = client
        .path("/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones")
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, with_top(ArmRequest::get(url), options)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn zone_json(state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": zone_path(""),
            "name": TEST_ZONE,
            "type": "Microsoft.Network/privateDnsZones",
            "location": "global",
            "etag": "etag1",
            "tags": {"key1": "value1"},
            "properties": {
                "maxNumberOfRecordSets": 5000,
                "numberOfRecordSets": 1,
                "maxNumberOfVirtualNetworkLinks": 100,
                "numberOfVirtualNetworkLinks": 0,
                "maxNumberOfVirtualNetworkLinksWithRegistration": 50,
                "numberOfVirtualNetworkLinksWithRegistration": 0,
                "provisioningState": state
            }
        })
    }

    // --- Cycle 1: Model tests ---

    #[test]
    fn test_global_zone_serialization() {
        let zone = PrivateZone::global().with_tag("key1", "value1");
        assert_eq!(
            serde_json::to_value(&zone).unwrap(),
            serde_json::json!({"location": "global", "tags": {"key1": "value1"}})
        );
    }

    #[test]
    fn test_zone_deserialization() {
        let zone: PrivateZone = serde_json::from_value(zone_json("Succeeded")).unwrap();
        let properties = zone.properties.as_ref().unwrap();
        assert_eq!(properties.max_number_of_record_sets, Some(5000));
        assert_eq!(zone.provisioning_state(), Some(&ProvisioningState::Succeeded));
    }

    // --- Cycle 2: Create and update API tests ---

    #[tokio::test]
    async fn test_create_zone_polls_async_operation() {
        let server = MockServer::start().await;
        let operation_url = format!("{}/privateDnsOperationStatuses/op1", server.uri());

        Mock::given(method("PUT"))
            .and(path(zone_path("")))
            .and(query_param("api-version", API_VERSION))
            .and(header("If-None-Match", "*"))
            .and(body_json(serde_json::json!({"location": "global"})))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str())
                    .insert_header("Retry-After", "0"),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/privateDnsOperationStatuses/op1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(zone_path("")))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone_json("Succeeded")))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let zone = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_ZONE,
            &PrivateZone::global(),
            Some(&CreateOrUpdateOptions::create_only()),
        )
        .await
        .expect("should start")
        .poll_until_done(FAST_POLL)
        .await
        .expect("should finish");

        assert_eq!(zone.etag.as_deref(), Some("etag1"));
    }

    #[tokio::test]
    async fn test_create_conflict_when_zone_exists() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(412).set_body_json(serde_json::json!({
                "error": {
                    "code": "PreconditionFailed",
                    "message": "The Zone privatezone1.com exists already and hence cannot be created again."
                }
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_ZONE,
            &PrivateZone::global(),
            Some(&CreateOrUpdateOptions::create_only()),
        )
        .await
        .expect_err("412");
        assert_eq!(err.status(), Some(412));
        assert_eq!(err.error_code(), Some("PreconditionFailed"));
    }

    #[tokio::test]
    async fn test_update_zone_via_location() {
        let server = MockServer::start().await;
        let location = format!("{}/privateDnsOperationResults/op2", server.uri());

        Mock::given(method("PATCH"))
            .and(path(zone_path("")))
            .and(header("If-Match", "etag1"))
            .and(body_json(serde_json::json!({"tags": {"key2": "value2"}})))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        let mut updated = zone_json("Succeeded");
        updated["tags"] = serde_json::json!({"key2": "value2"});
        Mock::given(method("GET"))
            .and(path("/privateDnsOperationResults/op2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let patch = PrivateZone::default().with_tag("key2", "value2");
        let options = IfMatchOptions {
            if_match: Some("etag1".into()),
        };
        let zone = begin_update(&client, TEST_RESOURCE_GROUP, TEST_ZONE, &patch, Some(&options))
            .await
            .expect("should start")
            .poll_until_done(FAST_POLL)
            .await
            .expect("should finish");

        assert_eq!(zone.tags.unwrap()["key2"], "value2");
    }

    // --- Cycle 3: Get, delete and list API tests ---

    #[tokio::test]
    async fn test_get_and_delete_zone() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(zone_path("")))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone_json("Succeeded")))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(zone_path("")))
            .and(header("If-Match", "etag1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let zone = get(&client, TEST_RESOURCE_GROUP, TEST_ZONE).await.expect("get");

        let options = IfMatchOptions { if_match: zone.etag };
        let poller = begin_delete(&client, TEST_RESOURCE_GROUP, TEST_ZONE, Some(&options))
            .await
            .expect("delete");
        assert!(poller.done());
    }

    #[tokio::test]
    async fn test_list_zones() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(subscription_path("/providers/Microsoft.Network/privateDnsZones")))
            .and(query_param("$top", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [zone_json("Succeeded")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resource_group_path("/providers/Microsoft.Network/privateDnsZones")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [zone_json("Succeeded"), zone_json("Updating")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let all = list(&client, Some(&ListOptions { top: Some(100) }))
            .unwrap()
            .collect_all()
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        let in_group = list_by_resource_group(&client, TEST_RESOURCE_GROUP, None)
            .unwrap()
            .collect_all()
            .await
            .unwrap();
        assert_eq!(in_group.len(), 2);
        assert_eq!(
            in_group[1].provisioning_state(),
            Some(&ProvisioningState::Updating)
        );
    }

    // --- Cycle 4: Tracing instrumentation tests ---

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_create_emits_span() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone_json("Succeeded")))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let _ = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_ZONE,
            &PrivateZone::global(),
            None,
        )
        .await;

        assert!(logs_contain("arm::privatedns::private_zones::begin_create_or_update"));
        assert!(logs_contain("creating private zone"));
    }
}
