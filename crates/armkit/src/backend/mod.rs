//! Backend abstraction for Azure Resource Manager operations.
//!
//! The [`Provider`] trait defines the interface for talking to the cloud
//! control plane, allowing for different implementations (real `az` CLI,
//! mock for testing).

pub mod az;

use crate::error::Result;
use crate::types::{
    AzureResource, Deployment, DeploymentMode, DeploymentOutputs, SoftDeletedAccount,
};
use std::path::Path;

/// Provider trait for resource-manager operations.
///
/// This trait abstracts the underlying control-plane implementation, enabling:
/// - Real CLI execution via the `az` command
/// - Mock implementations for testing
pub trait Provider: Send + Sync {
    /// Check whether the provider CLI is reachable at all.
    fn is_available(&self) -> bool;

    /// Check whether a resource group exists.
    fn group_exists(&self, group: &str) -> Result<bool>;

    /// Create a resource group in the given location. Idempotent on the
    /// provider side: creating an existing group succeeds.
    fn group_create(&self, group: &str, location: &str) -> Result<()>;

    /// List soft-deleted Cognitive Services accounts of the given kind in
    /// the given location, across the subscription.
    fn list_soft_deleted(&self, kind: &str, location: &str) -> Result<Vec<SoftDeletedAccount>>;

    /// Purge one soft-deleted account so its name can be reused.
    fn purge_account(&self, name: &str, group: &str, location: &str) -> Result<()>;

    /// Fetch a deployment record by name, or `None` if no deployment with
    /// that name exists in the group.
    fn deployment_show(&self, group: &str, name: &str) -> Result<Option<Deployment>>;

    /// List all resources currently in the group.
    fn resource_list(&self, group: &str) -> Result<Vec<AzureResource>>;

    /// Delete a single resource by its full ARM id. Deleting a resource
    /// that is already gone succeeds.
    fn resource_delete(&self, resource_id: &str) -> Result<()>;

    /// Run a template deployment against the group and wait for the
    /// provider to report a terminal state.
    fn deployment_create(
        &self,
        group: &str,
        template: &Path,
        name: &str,
        mode: DeploymentMode,
    ) -> Result<Deployment>;

    /// Fetch the declared outputs of a completed deployment.
    fn deployment_outputs(&self, group: &str, name: &str) -> Result<DeploymentOutputs>;
}

/// Get the default provider (real az CLI).
pub fn default_provider() -> Result<az::AzCli> {
    az::AzCli::new()
}
