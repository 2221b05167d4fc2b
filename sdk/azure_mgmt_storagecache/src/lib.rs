//! # Azure HPC Cache management
//!
//! Resource Manager client for `Microsoft.StorageCache` (API version
//! `2023-05-01`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::poller::DEFAULT_POLL_FREQUENCY;
//! use azure_mgmt_storagecache::{caches, storage_targets};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArmClient::builder().build()?;
//!
//!     for target in storage_targets::list_by_cache(&client, "my-rg", "cache1")?
//!         .collect_all()
//!         .await?
//!     {
//!         println!("{:?} {:?}", target.name, target.state());
//!     }
//!
//!     caches::begin_flush(&client, "my-rg", "cache1")
//!         .await?
//!         .poll_until_done(DEFAULT_POLL_FREQUENCY)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Cache**: a pool of cache nodes deployed into a subnet. Clients mount
//!   the cache instead of the storage behind it.
//! - **Storage target**: a back-end system the cache reads from and writes
//!   back to, such as an NFSv3 export or a blob container.
//! - **Junction**: maps a path in the cache namespace onto an export of a
//!   storage target.
//!
//! ## Modules
//!
//! - [`caches`] - Manage caches and run flush, start and stop
//! - [`storage_targets`] - Manage the storage targets of a cache
//! - [`models`] - Types shared by the modules above

pub mod caches;
pub mod models;
pub mod storage_targets;
