//! Sovereign cloud presets.

/// ARM endpoint and token audience of an Azure cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfiguration {
    /// Resource Manager endpoint, e.g. `https://management.azure.com`.
    pub endpoint: String,
    /// Token audience for the Resource Manager.
    pub audience: String,
}

impl CloudConfiguration {
    /// Azure public cloud.
    pub fn azure_public() -> Self {
        Self {
            endpoint: "https://management.azure.com".into(),
            audience: "https://management.core.windows.net/".into(),
        }
    }

    /// Azure China cloud.
    pub fn azure_china() -> Self {
        Self {
            endpoint: "https://management.chinacloudapi.cn".into(),
            audience: "https://management.core.chinacloudapi.cn".into(),
        }
    }

    /// Azure US Government cloud.
    pub fn azure_government() -> Self {
        Self {
            endpoint: "https://management.usgovcloudapi.net".into(),
            audience: "https://management.core.usgovcloudapi.net".into(),
        }
    }

    /// OAuth scope requested for Resource Manager tokens.
    pub fn scope(&self) -> String {
        format!("{}/.default", self.audience.trim_end_matches('/'))
    }
}

impl Default for CloudConfiguration {
    fn default() -> Self {
        Self::azure_public()
    }
}
