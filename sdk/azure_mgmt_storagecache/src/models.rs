//! Types shared by caches and storage targets.

use serde::{Deserialize, Serialize};

/// API version sent with every storage cache request.
pub(crate) const API_VERSION: &str = "2023-05-01";

/// Provisioning state of a cache or storage target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningStateType {
    Succeeded,
    Failed,
    Canceled,
    Creating,
    Deleting,
    Updating,
    #[serde(untagged)]
    Other(String),
}

impl ProvisioningStateType {
    /// Returns `true` once no further change is in progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}
