//! Storage targets of an HPC cache.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::SystemData;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::poller::{FinalStateVia, Poller};
use azure_mgmt_core::request::ArmRequest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ProvisioningStateType, API_VERSION};

const STORAGE_TARGET_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/Microsoft.StorageCache/caches/{cacheName}/storageTargets/{storageTargetName}";

// ----- Types -----

/// Kind of back-end storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageTargetType {
    Nfs3,
    Clfs,
    Unknown,
    BlobNfs,
    #[serde(untagged)]
    Other(String),
}

/// Operational state of a storage target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalStateType {
    Ready,
    Busy,
    Suspended,
    Flushing,
    #[serde(untagged)]
    Other(String),
}

/// Maps a path in the cache namespace onto an export of the target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceJunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_export: Option<String>,
    /// Defaults to `default` on the service side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_access_policy: Option<String>,
}

impl NamespaceJunction {
    pub fn new(
        namespace_path: impl Into<String>,
        nfs_export: impl Into<String>,
        target_path: impl Into<String>,
    ) -> Self {
        Self {
            namespace_path: Some(namespace_path.into()),
            nfs_export: Some(nfs_export.into()),
            target_path: Some(target_path.into()),
            nfs_access_policy: None,
        }
    }
}

/// An NFSv3 export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nfs3Target {
    /// IP address or host name of the NFS server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// e.g. `WRITE_WORKLOAD_15`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_model: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_timer: Option<i32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_back_timer: Option<i32>,
}

/// A cloud filesystem target backed by a blob container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClfsTarget {
    /// Resource id of the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
}

/// A blob container exposed over NFS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobNfsTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_timer: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_back_timer: Option<i32>,
}

/// Properties of a storage target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageTargetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junctions: Option<Vec<NamespaceJunction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<StorageTargetType>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningStateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<OperationalStateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs3: Option<Nfs3Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clfs: Option<ClfsTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<UnknownTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_nfs: Option<BlobNfsTarget>,
    /// Read-only. Share of cache space allocated to this target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_percentage: Option<i32>,
}

/// A storage target of a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Read-only. Region of the owning cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<StorageTargetProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
}

impl StorageTarget {
    /// An NFSv3 target on `host`.
    pub fn nfs3(
        host: impl Into<String>,
        usage_model: impl Into<String>,
        junctions: Vec<NamespaceJunction>,
    ) -> Self {
        Self::with_properties(StorageTargetProperties {
            junctions: Some(junctions),
            target_type: Some(StorageTargetType::Nfs3),
            nfs3: Some(Nfs3Target {
                target: Some(host.into()),
                usage_model: Some(usage_model.into()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    /// A CLFS target on the blob container `container_id`.
    pub fn clfs(container_id: impl Into<String>, junctions: Vec<NamespaceJunction>) -> Self {
        Self::with_properties(StorageTargetProperties {
            junctions: Some(junctions),
            target_type: Some(StorageTargetType::Clfs),
            clfs: Some(ClfsTarget {
                target: Some(container_id.into()),
            }),
            ..Default::default()
        })
    }

    pub fn with_properties(properties: StorageTargetProperties) -> Self {
        Self {
            properties: Some(properties),
            ..Default::default()
        }
    }

    pub fn state(&self) -> Option<&OperationalStateType> {
        self.properties.as_ref()?.state.as_ref()
    }
}

/// Optional parameters for [`begin_delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Delete without writing dirty data back to the target first.
    pub force: Option<bool>,
}

// ----- API functions -----

fn storage_target_url(
    client: &ArmClient,
    template: &str,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(template)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("cacheName", cache_name)?
        .param("storageTargetName", storage_target_name)?
        .into_url(API_VERSION)
}

/// Start creating or updating a storage target.
///
/// # Tracing
///
/// Emits a span named `arm::storagecache::storage_targets::begin_create_or_update`
/// with fields `cache` and `storage_target`.
#[tracing::instrument(
    name = "arm::storagecache::storage_targets::begin_create_or_update",
    skip(client, storage_target),
    fields(cache = %cache_name, storage_target = %storage_target_name)
)]
pub async fn begin_create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
    storage_target: &StorageTarget,
) -> ArmResult<Poller<StorageTarget>> {
    tracing::debug!("creating storage target");

    let url = storage_target_url(
        client,
        STORAGE_TARGET_PATH,
        resource_group_name,
        cache_name,
        storage_target_name,
    )?;
    let request = ArmRequest::put(url).json(storage_target)?;
    Poller::begin(client, request, &[200, 201, 202], None).await
}

/// Start removing a storage target from its cache.
///
/// Unless `force` is set, dirty data is written back to the target before
/// it is removed, which can take a long time.
#[tracing::instrument(
    name = "arm::storagecache::storage_targets::begin_delete",
    skip(client, options),
    fields(cache = %cache_name, storage_target = %storage_target_name)
)]
pub async fn begin_delete(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
    options: Option<&DeleteOptions>,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("deleting storage target");

    let url = storage_target_url(
        client,
        STORAGE_TARGET_PATH,
        resource_group_name,
        cache_name,
        storage_target_name,
    )?;
    let request = ArmRequest::delete(url).query_opt("force", options.and_then(|o| o.force));
    Poller::begin(client, request, &[200, 202, 204], None).await
}

/// Start refreshing the DNS information of a target.
#[tracing::instrument(
    name = "arm::storagecache::storage_targets::begin_dns_refresh",
    skip(client),
    fields(cache = %cache_name, storage_target = %storage_target_name)
)]
pub async fn begin_dns_refresh(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("refreshing storage target DNS");

    let url = storage_target_url(
        client,
        &format!("{STORAGE_TARGET_PATH}/dnsRefresh"),
        resource_group_name,
        cache_name,
        storage_target_name,
    )?;
    Poller::begin(
        client,
        ArmRequest::post(url),
        &[200, 202],
        Some(FinalStateVia::AzureAsyncOperation),
    )
    .await
}

#[tracing::instrument(
    name = "arm::storagecache::storage_targets::get",
    skip(client),
    fields(cache = %cache_name, storage_target = %storage_target_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
) -> ArmResult<StorageTarget> {
    tracing::debug!("getting storage target");

    let url = storage_target_url(
        client,
        STORAGE_TARGET_PATH,
        resource_group_name,
        cache_name,
        storage_target_name,
    )?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// List the storage targets of a cache.
#[tracing::instrument(
    name = "arm::storagecache::storage_targets::list_by_cache",
    skip(client),
    fields(cache = %cache_name)
)]
pub fn list_by_cache(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
) -> ArmResult<Pager<StorageTarget>> {
    let url = client
        .path("/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/Microsoft.StorageCache/caches/{cacheName}/storageTargets")
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("cacheName", cache_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}

/// Start restoring the target's settings to their defaults.
///
/// Completes through the `Location` header of the initial response.
#[tracing::instrument(
    name = "arm::storagecache::storage_targets::begin_restore_defaults",
    skip(client),
    fields(cache = %cache_name, storage_target = %storage_target_name)
)]
pub async fn begin_restore_defaults(
    client: &ArmClient,
    resource_group_name: &str,
    cache_name: &str,
    storage_target_name: &str,
) -> ArmResult<Poller<IgnoredAny>> {
    tracing::debug!("restoring storage target defaults");

    // This one endpoint uses `resourceGroups`.
    let url = storage_target_url(
        client,
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.StorageCache/caches/{cacheName}/storageTargets/{storageTargetName}/restoreDefaults",
        resource_group_name,
        cache_name,
        storage_target_name,
    )?;
    Poller::begin(
        client,
        ArmRequest::post(url),
        &[200, 202],
        Some(FinalStateVia::Location),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use azure_mgmt_core::ArmError;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_TARGET: &str = "st1";

    fn target_path(suffix: &str) -> String {
        cache_path(&format!("/storageTargets/{TEST_TARGET}{suffix}"))
    }

    fn target_json(provisioning_state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": target_path(""),
            "name": TEST_TARGET,
            "type": "Microsoft.StorageCache/Cache/StorageTarget",
            "location": "westus",
            "properties": {
                "junctions": [{
                    "namespacePath": "/path/on/cache",
                    "targetPath": "/path/on/exp1",
                    "nfsExport": "exp1",
                    "nfsAccessPolicy": "default"
                }],
                "targetType": "nfs3",
                "provisioningState": provisioning_state,
                "state": "Ready",
                "nfs3": {"target": "10.0.44.44", "usageModel": "READ_ONLY", "verificationTimer": 30},
                "allocationPercentage": 25
            }
        })
    }

    // --- Cycle 1: Model tests ---

    #[test]
    fn test_nfs3_target_serialization() {
        let target = StorageTarget::nfs3(
            "10.0.44.44",
            "READ_ONLY",
            vec![NamespaceJunction::new("/path/on/cache", "exp1", "/path/on/exp1")],
        );
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "properties": {
                    "junctions": [{
                        "namespacePath": "/path/on/cache",
                        "targetPath": "/path/on/exp1",
                        "nfsExport": "exp1"
                    }],
                    "targetType": "nfs3",
                    "nfs3": {"target": "10.0.44.44", "usageModel": "READ_ONLY"}
                }
            })
        );
    }

    #[test]
    fn test_target_type_names() {
        let blob: StorageTargetType = serde_json::from_str("\"blobNfs\"").unwrap();
        assert_eq!(blob, StorageTargetType::BlobNfs);

        let clfs = StorageTarget::clfs("/containers/c1", vec![]);
        let json = serde_json::to_value(&clfs).unwrap();
        assert_eq!(json["properties"]["targetType"], "clfs");
        assert_eq!(json["properties"]["clfs"]["target"], "/containers/c1");
    }

    #[test]
    fn test_storage_target_deserialization() {
        let target: StorageTarget = serde_json::from_value(target_json("Succeeded")).unwrap();
        assert_eq!(target.state(), Some(&OperationalStateType::Ready));

        let properties = target.properties.unwrap();
        assert_eq!(properties.allocation_percentage, Some(25));
        assert_eq!(properties.nfs3.unwrap().verification_timer, Some(30));
    }

    // --- Cycle 2: Create and delete API tests ---

    #[tokio::test]
    async fn test_create_storage_target() {
        let server = MockServer::start().await;
        let operation_url = format!("{}/ascOperations/create-st1", server.uri());

        Mock::given(method("PUT"))
            .and(path(target_path("")))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::json!({
                "properties": {
                    "junctions": [],
                    "targetType": "nfs3",
                    "nfs3": {"target": "10.0.44.44", "usageModel": "READ_ONLY"}
                }
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(target_json("Creating"))
                    .insert_header("Azure-AsyncOperation", operation_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ascOperations/create-st1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(target_path("")))
            .respond_with(ResponseTemplate::new(200).set_body_json(target_json("Succeeded")))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let target = begin_create_or_update(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_CACHE,
            TEST_TARGET,
            &StorageTarget::nfs3("10.0.44.44", "READ_ONLY", vec![]),
        )
        .await
        .expect("should start")
        .poll_until_done(FAST_POLL)
        .await
        .expect("should finish");

        assert_eq!(
            target.properties.unwrap().provisioning_state,
            Some(ProvisioningStateType::Succeeded)
        );
    }

    #[tokio::test]
    async fn test_delete_with_force() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(target_path("")))
            .and(query_param("force", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let poller = begin_delete(
            &client,
            TEST_RESOURCE_GROUP,
            TEST_CACHE,
            TEST_TARGET,
            Some(&DeleteOptions { force: Some(true) }),
        )
        .await
        .expect("should delete");
        assert!(poller.done());
    }

    #[tokio::test]
    async fn test_delete_without_force_omits_query() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(target_path("")))
            .and(query_param_is_missing("force"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        begin_delete(&client, TEST_RESOURCE_GROUP, TEST_CACHE, TEST_TARGET, None)
            .await
            .expect("should delete");
    }

    // --- Cycle 3: Action API tests ---

    #[tokio::test]
    async fn test_dns_refresh() {
        let server = MockServer::start().await;
        let operation_url = format!("{}/ascOperations/dns1", server.uri());

        Mock::given(method("POST"))
            .and(path(target_path("/dnsRefresh")))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ascOperations/dns1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Succeeded"})),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        begin_dns_refresh(&client, TEST_RESOURCE_GROUP, TEST_CACHE, TEST_TARGET)
            .await
            .expect("should start")
            .poll_until_done(FAST_POLL)
            .await
            .expect("should finish");
    }

    #[tokio::test]
    async fn test_restore_defaults_uses_camel_case_resource_groups() {
        let server = MockServer::start().await;
        let location = format!("{}/ascOperationResults/restore1", server.uri());

        Mock::given(method("POST"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/{TEST_RESOURCE_GROUP}/providers/Microsoft.StorageCache/caches/{TEST_CACHE}/storageTargets/{TEST_TARGET}/restoreDefaults"
            )))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ascOperationResults/restore1"))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ascOperationResults/restore1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        begin_restore_defaults(&client, TEST_RESOURCE_GROUP, TEST_CACHE, TEST_TARGET)
            .await
            .expect("should start")
            .poll_until_done(FAST_POLL)
            .await
            .expect("should finish");
    }

    // --- Cycle 4: Get and list API tests ---

    #[tokio::test]
    async fn test_get_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(target_path("")))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "NotFound", "message": "storage target not found"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = get(&client, TEST_RESOURCE_GROUP, TEST_CACHE, TEST_TARGET)
            .await
            .expect_err("should fail");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_code(), Some("NotFound"));
    }

    #[tokio::test]
    async fn test_list_by_cache_follows_next_link() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(cache_path("/storageTargets")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [target_json("Succeeded")],
                "nextLink": format!("{}/targets-page2", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/targets-page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [target_json("Updating")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let targets = list_by_cache(&client, TEST_RESOURCE_GROUP, TEST_CACHE)
            .unwrap()
            .collect_all()
            .await
            .expect("should list");
        assert_eq!(targets.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_storage_target_name() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = get(&client, TEST_RESOURCE_GROUP, TEST_CACHE, "")
            .await
            .expect_err("should reject");
        assert!(matches!(err, ArmError::EmptyParameter(_)));
        assert!(err.to_string().contains("storageTargetName"));
    }
}
