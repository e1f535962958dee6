//! # armkit
//!
//! Rust library for Azure Resource Manager operations over the `az` CLI.
//!
//! This crate provides functionality for:
//! - Resource group lifecycle (existence probe, creation)
//! - Listing and purging soft-deleted Cognitive Services accounts
//! - Enumerating and deleting resources inside a group
//! - Template deployments in incremental mode, with outputs retrieval
//! - Settle polling with exponential backoff for eventually-consistent
//!   control-plane operations
//!
//! ## Example
//!
//! ```no_run
//! use armkit::{default_provider, DeploymentMode, Provider};
//! use std::path::Path;
//!
//! // Locate the az CLI
//! let provider = default_provider().expect("Azure CLI not available");
//!
//! // Make sure the group exists
//! if !provider.group_exists("rg-document-intelligence").expect("probe failed") {
//!     provider
//!         .group_create("rg-document-intelligence", "westus")
//!         .expect("create failed");
//! }
//!
//! // Apply the template
//! let deployment = provider
//!     .deployment_create(
//!         "rg-document-intelligence",
//!         Path::new("infra/main.bicep"),
//!         "main",
//!         DeploymentMode::Incremental,
//!     )
//!     .expect("deployment failed");
//! println!("state: {}", deployment.provisioning_state());
//! ```
//!
//! ## Settle Polling
//!
//! Purges and deletes are acknowledged before the control plane converges.
//! [`wait_until`] polls a probe with exponential backoff until it reports
//! settled or the budget in [`SettleConfig`] runs out.
//!
//! ```no_run
//! use armkit::{wait_until, SettleConfig};
//! use std::time::Duration;
//!
//! let config = SettleConfig::with_max_wait(Duration::from_secs(60));
//! let outcome = wait_until(&config, || Ok(true)).unwrap();
//! assert!(outcome.is_settled());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod poll;
pub mod types;

pub use backend::{Provider, az::AzCli, default_provider};
pub use error::{Error, ErrorCategory, Result};
pub use poll::{Settle, SettleConfig, wait_until};
pub use types::{
    AzureResource, Deployment, DeploymentMode, DeploymentOutputs, DeploymentProperties,
    OutputValue, SoftDeletedAccount,
};
