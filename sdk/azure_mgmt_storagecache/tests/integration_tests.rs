//! Integration tests for azure_mgmt_storagecache.
//!
//! These tests require a live Azure subscription and an existing cache.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `AZURE_SUBSCRIPTION_ID`: The subscription to use
//! - `AZURE_RESOURCE_GROUP`: The resource group of the cache
//! - `AZURE_STORAGE_CACHE`: Name of a running cache

#![cfg(feature = "integration-tests")]

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
use azure_mgmt_storagecache::{caches, storage_targets};

fn get_client() -> ArmClient {
    ArmClient::builder().build().expect("Failed to build client")
}

fn get_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} not set"))
}

#[tokio::test]
async fn test_get_cache_and_list_storage_targets() {
    let client = get_client();
    let rg = get_env("AZURE_RESOURCE_GROUP");
    let cache_name = get_env("AZURE_STORAGE_CACHE");

    let cache = caches::get(&client, &rg, &cache_name)
        .await
        .expect("get cache");
    assert_eq!(cache.name.as_deref(), Some(cache_name.as_str()));

    let listed = caches::list_by_resource_group(&client, &rg)
        .expect("build pager")
        .collect_all()
        .await
        .expect("list caches");
    assert!(listed.iter().any(|c| c.name == cache.name));

    let targets = storage_targets::list_by_cache(&client, &rg, &cache_name)
        .expect("build pager")
        .collect_all()
        .await
        .expect("list storage targets");
    for target in targets {
        assert!(target.properties.is_some());
    }
}

#[tokio::test]
async fn test_flush_cache() {
    let client = get_client();
    let rg = get_env("AZURE_RESOURCE_GROUP");
    let cache_name = get_env("AZURE_STORAGE_CACHE");

    caches::begin_flush(&client, &rg, &cache_name)
        .await
        .expect("begin flush")
        .poll_until_done(DEFAULT_POLL_FREQUENCY)
        .await
        .expect("flush");
}
