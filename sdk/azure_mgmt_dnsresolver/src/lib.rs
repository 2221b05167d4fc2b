//! # Azure DNS Private Resolver management
//!
//! Resource Manager client for the DNS resolvers of `Microsoft.Network`
//! (API version `2022-07-01`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_dnsresolver::dns_resolvers;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder().build()?;
//!
//!     for resolver in dns_resolvers::list(&client, None)?.collect_all().await? {
//!         println!("{:?} {:?}", resolver.name, resolver.properties.dns_resolver_state);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Resolvers and endpoints carry an `etag`. Pass it back through the
//! `if_match` option to make sure a write only applies to the version that
//! was read, or use [`models::CreateOrUpdateOptions::create_only`] to never
//! overwrite an existing resource.
//!
//! ## Modules
//!
//! - [`dns_resolvers`] - Manage DNS resolvers
//! - [`inbound_endpoints`] - Manage the inbound endpoints of a resolver
//! - [`models`] - Options and types shared by the modules above

pub mod dns_resolvers;
pub mod inbound_endpoints;
pub mod models;
