//! # Azure management groups
//!
//! Resource Manager client for `Microsoft.Management` (API version
//! `2021-04-01`).
//!
//! Management groups organize subscriptions into a hierarchy below the
//! tenant root group. All operations are tenant-level: no subscription id is
//! needed on the client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
//! use azure_mgmt_managementgroups::management_groups::{self, CreateManagementGroupRequest};
//! use azure_mgmt_managementgroups::{check_name_availability, CheckNameAvailabilityRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder().build()?;
//!
//!     let check = check_name_availability(&client, &CheckNameAvailabilityRequest::new("Finance")).await?;
//!     if check.name_available == Some(true) {
//!         let group = management_groups::begin_create_or_update(
//!             &client,
//!             "Finance",
//!             &CreateManagementGroupRequest::new("Finance"),
//!             None,
//!         )
//!         .await?
//!         .poll_until_done(DEFAULT_POLL_FREQUENCY)
//!         .await?;
//!         println!("created {:?}", group.id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`management_groups`] - Create, update, delete, get and list groups and their descendants
//! - [`subscriptions`] - Place subscriptions under a group
//! - [`name_availability`] - Check whether a group id can be used
//! - [`models`] - Options and types shared by the modules above

pub mod management_groups;
pub mod models;
pub mod name_availability;
pub mod subscriptions;

pub use name_availability::{check_name_availability, CheckNameAvailabilityRequest};
