//! Credentials used to authorize Azure Resource Manager requests.

use crate::error::{ArmError, ArmResult};
use azure_core::credentials::TokenCredential;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Environment variable holding a pre-acquired ARM bearer token.
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";

/// Credential types supported by the Azure Resource Manager SDK.
#[derive(Clone)]
pub enum ArmCredential {
    /// A bearer token acquired out of band (for example `az account get-access-token`).
    AccessToken(SecretString),

    /// Microsoft Entra ID token acquisition through any `azure_identity` credential.
    TokenCredential(Arc<dyn TokenCredential>),
}

impl ArmCredential {
    /// Create a credential from the environment.
    ///
    /// Uses `AZURE_ACCESS_TOKEN` when it is set and non-empty, otherwise falls
    /// back to [`ArmCredential::developer_tools`].
    pub fn from_env() -> ArmResult<Self> {
        match std::env::var(ENV_ACCESS_TOKEN) {
            Ok(token) if !token.is_empty() => Ok(Self::access_token(token)),
            _ => Self::developer_tools(),
        }
    }

    /// Create a credential from a pre-acquired bearer token.
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::from(token.into()))
    }

    /// Use the developer tool chain (Azure CLI, Azure Developer CLI) for tokens.
    pub fn developer_tools() -> ArmResult<Self> {
        let credential = azure_identity::DeveloperToolsCredential::new(None)
            .map_err(|e| ArmError::Auth(format!("failed to create developer tools credential: {e}")))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Use the Azure CLI for tokens.
    pub fn azure_cli() -> ArmResult<Self> {
        let credential = azure_identity::AzureCliCredential::new(None)
            .map_err(|e| ArmError::Auth(format!("failed to create Azure CLI credential: {e}")))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Wrap any `azure_core` token credential.
    pub fn token_credential(credential: Arc<dyn TokenCredential>) -> Self {
        Self::TokenCredential(credential)
    }

    /// Resolve the credential to an `Authorization` header value for `scope`.
    pub async fn resolve(&self, scope: &str) -> ArmResult<String> {
        match self {
            Self::AccessToken(token) => Ok(format!("Bearer {}", token.expose_secret())),
            Self::TokenCredential(credential) => {
                let token = credential
                    .get_token(&[scope], None)
                    .await
                    .map_err(|e| ArmError::Auth(format!("failed to acquire token: {e}")))?;
                tracing::trace!(scope, "acquired access token");
                Ok(format!("Bearer {}", token.token.secret()))
            }
        }
    }
}

impl std::fmt::Debug for ArmCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => write!(f, "ArmCredential::AccessToken(****)"),
            Self::TokenCredential(_) => write!(f, "ArmCredential::TokenCredential"),
        }
    }
}
