//! Operations exposed by `Microsoft.Databricks`.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::models::Operation;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::request::ArmRequest;

use crate::models::API_VERSION;

/// List the operations of the Databricks resource provider.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_databricks::operations;
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// for op in operations::list(client)?.collect_all().await? {
///     println!("{:?}", op.name);
/// }
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(name = "arm::databricks::operations::list", skip(client))]
pub fn list(client: &ArmClient) -> ArmResult<Pager<Operation>> {
    let url = client
        .path("/providers/Microsoft.Databricks/operations")
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, ArmRequest::get(url)))
}
