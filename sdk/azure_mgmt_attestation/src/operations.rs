//! Operations exposed by `Microsoft.Attestation`.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::request::ArmRequest;

use crate::models::{OperationList, API_VERSION};

/// List the operations of the attestation resource provider.
///
/// Unlike most providers, this listing is returned in a single response.
///
/// # Tracing
///
/// Emits a span named `arm::attestation::operations::list`.
#[tracing::instrument(name = "arm::attestation::operations::list", skip(client))]
pub async fn list(client: &ArmClient) -> ArmResult<OperationList> {
    tracing::debug!("listing attestation operations");

    let url = client
        .path("/providers/Microsoft.Attestation/operations")
        .into_url(API_VERSION)?;
    let list: OperationList = client.send_json(&ArmRequest::get(url), &[200]).await?;

    tracing::debug!(count = list.value.len(), "attestation operations listed");
    Ok(list)
}
