//! # Azure Attestation management
//!
//! Resource Manager client for `Microsoft.Attestation` (API version `2020-10-01`).
//!
//! Attestation providers are regional endpoints that verify the trustworthiness
//! of a platform and the integrity of the binaries running inside it. Every
//! region also has a shared default provider, exposed through
//! [`attestation_providers::list_default`] and
//! [`attestation_providers::get_default_by_location`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_attestation::attestation_providers;
//! use azure_mgmt_core::client::ArmClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder()
//!         .subscription_id("00000000-0000-0000-0000-000000000000")
//!         .build()?;
//!
//!     let providers = attestation_providers::list_by_resource_group(&client, "my-rg").await?;
//!     for provider in providers.value {
//!         println!("{:?}", provider.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`attestation_providers`] - Create, get, update, delete and list attestation providers
//! - [`private_endpoint_connections`] - Manage private endpoint connections of a provider
//! - [`operations`] - List the operations of the resource provider
//! - [`models`] - Types shared by the modules above

pub mod attestation_providers;
pub mod models;
pub mod operations;
pub mod private_endpoint_connections;
