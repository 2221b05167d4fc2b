//! Integration tests for azure_mgmt_dnsresolver.
//!
//! These tests require a live Azure subscription.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `AZURE_SUBSCRIPTION_ID`: The subscription to use
//! - `AZURE_RESOURCE_GROUP`: An existing resource group
//! - `AZURE_VIRTUAL_NETWORK`: Name of a virtual network in that resource group
//!   with a subnet named `inbound` delegated to `Microsoft.Network/dnsResolvers`

#![cfg(feature = "integration-tests")]

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
use azure_mgmt_dnsresolver::dns_resolvers::{self, DnsResolver};
use azure_mgmt_dnsresolver::inbound_endpoints::{self, InboundEndpoint, IpConfiguration};
use azure_mgmt_dnsresolver::models::{CreateOrUpdateOptions, DeleteOptions};

fn get_client() -> ArmClient {
    ArmClient::builder().build().expect("Failed to build client")
}

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} not set"))
}

#[tokio::test]
async fn test_resolver_lifecycle() {
    let client = get_client();
    let rg = env("AZURE_RESOURCE_GROUP");
    let vnet_name = env("AZURE_VIRTUAL_NETWORK");
    let subscription = client.subscription_id().expect("subscription").to_string();
    let vnet_id = format!(
        "/subscriptions/{subscription}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{vnet_name}"
    );
    let name = format!("resolver-it-{}", std::process::id());

    let resolver = dns_resolvers::begin_create_or_update(
        &client,
        &rg,
        &name,
        &DnsResolver::new("westus2", vnet_id.clone()),
        Some(&CreateOrUpdateOptions::create_only()),
    )
    .await
    .expect("begin create")
    .poll_until_done(DEFAULT_POLL_FREQUENCY)
    .await
    .expect("create resolver");
    assert!(resolver.etag.is_some());

    let endpoint = inbound_endpoints::begin_create_or_update(
        &client,
        &rg,
        &name,
        "inbound",
        &InboundEndpoint::new(
            "westus2",
            vec![IpConfiguration::dynamic(format!("{vnet_id}/subnets/inbound"))],
        ),
        None,
    )
    .await
    .expect("begin create endpoint")
    .poll_until_done(DEFAULT_POLL_FREQUENCY)
    .await
    .expect("create endpoint");
    assert_eq!(endpoint.properties.ip_configurations.len(), 1);

    let attached = dns_resolvers::list_by_virtual_network(&client, &rg, &vnet_name, None)
        .expect("build pager")
        .collect_all()
        .await
        .expect("list by virtual network");
    assert!(attached
        .iter()
        .any(|r| r.id.as_deref().is_some_and(|id| id.ends_with(&name))));

    inbound_endpoints::begin_delete(&client, &rg, &name, "inbound", None)
        .await
        .expect("begin delete endpoint")
        .poll_until_done(DEFAULT_POLL_FREQUENCY)
        .await
        .expect("delete endpoint");

    let current = dns_resolvers::get(&client, &rg, &name).await.expect("get");
    dns_resolvers::begin_delete(
        &client,
        &rg,
        &name,
        Some(&DeleteOptions {
            if_match: current.etag,
        }),
    )
    .await
    .expect("begin delete")
    .poll_until_done(DEFAULT_POLL_FREQUENCY)
    .await
    .expect("delete resolver");
}
