#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod cloud;
pub mod error;
pub mod models;
pub mod pager;
pub mod poller;
pub mod request;
pub mod resource_id;
pub mod rfc3339;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{ArmError, ArmResult};
