//! Helpers for testing code built on `azure_mgmt_core` against a mock server.
//!
//! Enabled with the `test-support` feature.

use crate::auth::ArmCredential;
use crate::client::{ArmClient, RetryPolicy};
use std::time::Duration;
use wiremock::MockServer;

/// Bearer token sent by mock clients (not a real token).
pub const TEST_TOKEN: &str = "test-token";

/// Subscription id configured on mock clients.
pub const TEST_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Resource group used by service crate tests.
pub const TEST_RESOURCE_GROUP: &str = "rg1";

/// Retry quickly so tests exercising transient failures stay fast.
fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        initial_backoff: Duration::from_millis(1),
    }
}

/// Create a client that talks to `endpoint` with a static token.
///
/// # Panics
///
/// Panics if `endpoint` is not a valid URL.
pub fn setup_mock_client_with_endpoint(endpoint: &str) -> ArmClient {
    ArmClient::builder()
        .endpoint(endpoint)
        .credential(ArmCredential::access_token(TEST_TOKEN))
        .subscription_id(TEST_SUBSCRIPTION_ID)
        .retry_policy(fast_retry())
        .build()
        .expect("should build client")
}

/// Create a test client connected to a mock server.
///
/// # Panics
///
/// Panics if the client cannot be built.
pub async fn setup_mock_client(server: &MockServer) -> ArmClient {
    setup_mock_client_with_endpoint(&server.uri())
}

/// `/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/{TEST_RESOURCE_GROUP}` followed by `suffix`.
pub fn resource_group_path(suffix: &str) -> String {
    format!("/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/{TEST_RESOURCE_GROUP}{suffix}")
}

/// `/subscriptions/{TEST_SUBSCRIPTION_ID}` followed by `suffix`.
pub fn subscription_path(suffix: &str) -> String {
    format!("/subscriptions/{TEST_SUBSCRIPTION_ID}{suffix}")
}
