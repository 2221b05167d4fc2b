//! # Azure Databricks management
//!
//! Resource Manager client for `Microsoft.Databricks` (API version `2023-02-01`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_databricks::workspaces;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder()
//!         .subscription_id("00000000-0000-0000-0000-000000000000")
//!         .build()?;
//!
//!     let mut pager = workspaces::list_by_subscription(&client)?;
//!     while let Some(page) = pager.next_page().await? {
//!         for ws in page.value {
//!             println!("{:?} {:?}", ws.name, ws.properties.workspace_url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Workspace**: a Databricks deployment. Its compute lives in a managed
//!   resource group that the service creates and owns.
//! - **Virtual network peering**: connects the workspace network to another
//!   virtual network.
//!
//! ## Modules
//!
//! - [`workspaces`] - Create, update, delete, get and list workspaces
//! - [`vnet_peering`] - Manage virtual network peerings of a workspace
//! - [`operations`] - List the operations of the resource provider
//! - [`models`] - Types shared by the modules above

pub mod models;
pub mod operations;
pub mod vnet_peering;
pub mod workspaces;
