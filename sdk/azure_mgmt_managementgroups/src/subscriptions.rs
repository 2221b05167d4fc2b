//! Subscriptions placed under a management group.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::request::ArmRequest;
use serde::{Deserialize, Serialize};

use crate::models::{
    apply_cache_control, CacheControlOptions, DescendantParentGroupInfo,
    SubscriptionListOptions, API_VERSION,
};

const SUBSCRIPTION_PATH: &str =
    "/providers/Microsoft.Management/managementGroups/{groupId}/subscriptions/{subscriptionId}";
const SUBSCRIPTIONS_PATH: &str =
    "/providers/Microsoft.Management/managementGroups/{groupId}/subscriptions";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUnderManagementGroupProperties {
    /// Tenant the subscription belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DescendantParentGroupInfo>,
    /// e.g. `Active`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A subscription and the management group it is placed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUnderManagementGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// The subscription id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubscriptionUnderManagementGroupProperties>,
}

fn subscription_url(
    client: &ArmClient,
    group_id: &str,
    subscription_id: &str,
) -> ArmResult<url::Url> {
    client
        .path(SUBSCRIPTION_PATH)
        .param("groupId", group_id)?
        .param("subscriptionId", subscription_id)?
        .into_url(API_VERSION)
}

/// Move a subscription under a management group.
///
/// `subscription_id` is the subscription to move, which need not be the
/// client's own subscription.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_managementgroups::subscriptions;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let placed = subscriptions::create(
///     client,
///     "Finance",
///     "728bcbe4-8d56-4510-86c2-4921b8beefbc",
///     None,
/// )
/// .await?;
/// println!("{:?}", placed.properties.and_then(|p| p.parent));
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::managementgroups::subscriptions::create",
    skip(client, options),
    fields(group_id = %group_id, subscription_id = %subscription_id)
)]
pub async fn create(
    client: &ArmClient,
    group_id: &str,
    subscription_id: &str,
    options: Option<&CacheControlOptions>,
) -> ArmResult<SubscriptionUnderManagementGroup> {
    tracing::debug!("adding subscription to management group");

    let url = subscription_url(client, group_id, subscription_id)?;
    let request = apply_cache_control(
        ArmRequest::put(url),
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    client.send_json(&request, &[200]).await
}

/// Remove a subscription from a management group. It moves back to the root group.
#[tracing::instrument(
    name = "arm::managementgroups::subscriptions::delete",
    skip(client, options),
    fields(group_id = %group_id, subscription_id = %subscription_id)
)]
pub async fn delete(
    client: &ArmClient,
    group_id: &str,
    subscription_id: &str,
    options: Option<&CacheControlOptions>,
) -> ArmResult<()> {
    tracing::debug!("removing subscription from management group");

    let url = subscription_url(client, group_id, subscription_id)?;
    let request = apply_cache_control(
        ArmRequest::delete(url),
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    client.send(&request, &[200, 204]).await?;
    Ok(())
}

/// Get a subscription's placement in a management group.
#[tracing::instrument(
    name = "arm::managementgroups::subscriptions::get_subscription",
    skip(client, options),
    fields(group_id = %group_id, subscription_id = %subscription_id)
)]
pub async fn get_subscription(
    client: &ArmClient,
    group_id: &str,
    subscription_id: &str,
    options: Option<&CacheControlOptions>,
) -> ArmResult<SubscriptionUnderManagementGroup> {
    tracing::debug!("getting subscription under management group");

    let url = subscription_url(client, group_id, subscription_id)?;
    let request = apply_cache_control(
        ArmRequest::get(url),
        options.and_then(|o| o.cache_control.as_deref()),
    )?;
    client.send_json(&request, &[200]).await
}

/// List the subscriptions directly under a management group.
#[tracing::instrument(
    name = "arm::managementgroups::subscriptions::get_subscriptions_under_management_group",
    skip(client, options),
    fields(group_id = %group_id)
)]
pub fn get_subscriptions_under_management_group(
    client: &ArmClient,
    group_id: &str,
    options: Option<&SubscriptionListOptions>,
) -> ArmResult<Pager<SubscriptionUnderManagementGroup>> {
    let url = client
        .path(SUBSCRIPTIONS_PATH)
        .param("groupId", group_id)?
        .into_url(API_VERSION)?;
    let request = ArmRequest::get(url)
        .query_opt("$skiptoken", options.and_then(|o| o.skip_token.as_deref()));
    Ok(Pager::new(client, request))
}
