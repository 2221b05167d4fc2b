//! # Azure Private DNS management
//!
//! Resource Manager client for private DNS zones of `Microsoft.Network`
//! (API version `2020-06-01`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_privatedns::record_sets::{self, RecordType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder().build()?;
//!
//!     let records = record_sets::list_by_type(&client, "my-rg", "contoso.internal", RecordType::A, None)?
//!         .collect_all()
//!         .await?;
//!     for record_set in records {
//!         println!("{:?}", record_set.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Private zone**: a DNS zone only visible from linked virtual networks.
//!   Zones always live in the `global` location.
//! - **Record set**: all records of one type and name in a zone. `@` is the
//!   zone apex.
//! - **Virtual network link**: makes a zone resolvable from a network, and
//!   optionally lets the network's virtual machines register records.
//!
//! ## Modules
//!
//! - [`private_zones`] - Manage private zones
//! - [`record_sets`] - Manage record sets in a zone
//! - [`virtual_network_links`] - Link zones to virtual networks
//! - [`models`] - Options shared by the modules above

pub mod models;
pub mod private_zones;
pub mod record_sets;
pub mod virtual_network_links;
