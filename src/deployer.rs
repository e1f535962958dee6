//! Reconciling deployer.
//!
//! Brings a resource group into the state described by a declarative
//! template, repairing leftover state from previous runs first:
//! soft-deleted accounts holding name reservations are purged, and
//! resources from a prior deployment are deleted, before the template
//! is submitted.
//!
//! All provider calls are sequential. The purge and cleanup phases are
//! best-effort per item; authentication and connectivity failures abort
//! the run from any phase. Running two deployers against the same group
//! concurrently is unsupported.

use anyhow::{Context, Result, bail};
use armkit::{
    AzureResource, Deployment, DeploymentMode, DeploymentOutputs, Provider, Settle, SettleConfig,
    wait_until,
};
use log::{debug, warn};
use std::collections::HashSet;

use crate::config::DeployConfig;
use crate::progress;
use crate::ui;

// ============================================================================
// Outcomes
// ============================================================================

/// How the resource group was found at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Group already existed; reconciliation phases ran
    Existed,
    /// Group was absent and had to be created
    Created,
}

/// Outcome of the soft-delete purge phase.
#[derive(Debug, Default)]
pub struct PurgeOutcome {
    /// Accounts found matching the configured kind and location
    pub found: Vec<String>,
    /// Accounts whose purge was accepted
    pub purged: Vec<String>,
    /// Accounts already gone when the purge was issued
    pub already_absent: Vec<String>,
    /// Accounts whose purge failed, with the failure text
    pub failed: Vec<(String, String)>,
    /// Settle poll result; `None` when nothing was purged
    pub settle: Option<Settle>,
}

impl PurgeOutcome {
    /// Whether every found account was purged or already gone.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of the prior-deployment cleanup phase.
#[derive(Debug, Default)]
pub struct CleanupOutcome {
    /// Provisioning state of the prior deployment record
    pub prior_state: String,
    /// Resources found in the group
    pub found: Vec<AzureResource>,
    /// Resources whose deletion was accepted
    pub deleted: Vec<String>,
    /// Resources whose deletion failed, with the failure text
    pub failed: Vec<(String, String)>,
    /// Settle poll result; `None` when nothing was deleted
    pub settle: Option<Settle>,
}

/// Report produced by a completed run.
///
/// A returned report means the deployment itself succeeded (or was a dry
/// run); per-item purge and delete failures are recorded inside, not
/// surfaced as errors.
#[derive(Debug)]
pub struct RunReport {
    pub group: GroupState,
    /// `None` when the group was just created, so there was nothing to purge
    pub purge: Option<PurgeOutcome>,
    /// `None` when no prior deployment was found or the wipe is disabled
    pub cleanup: Option<CleanupOutcome>,
    /// `None` on dry run
    pub deployment: Option<Deployment>,
    pub outputs: DeploymentOutputs,
    pub dry_run: bool,
}

// ============================================================================
// Deployer
// ============================================================================

/// Reconciling deployer over a resource-management provider.
pub struct Deployer<'a> {
    provider: &'a dyn Provider,
    config: &'a DeployConfig,
    purge_settle: SettleConfig,
    cleanup_settle: SettleConfig,
}

impl<'a> Deployer<'a> {
    pub fn new(provider: &'a dyn Provider, config: &'a DeployConfig) -> Self {
        Self {
            provider,
            config,
            purge_settle: config.purge_settle(),
            cleanup_settle: config.cleanup_settle(),
        }
    }

    /// Override the settle cadence. Tests use millisecond budgets.
    pub fn with_settle(mut self, purge: SettleConfig, cleanup: SettleConfig) -> Self {
        self.purge_settle = purge;
        self.cleanup_settle = cleanup;
        self
    }

    /// Run the full reconcile-and-deploy sequence.
    ///
    /// With `dry_run` set, only read-only probes are issued and the report
    /// describes what each phase would have done.
    pub fn run(&self, dry_run: bool) -> Result<RunReport> {
        let group = &self.config.resource_group;

        let exists = self
            .provider
            .group_exists(group)
            .with_context(|| format!("Could not probe resource group '{group}'"))?;

        if exists {
            ui::info(&format!("Resource group '{group}' exists"));
            self.reconcile_and_deploy(dry_run)
        } else {
            ui::info(&format!("Resource group '{group}' not found"));
            self.deploy_fresh(dry_run)
        }
    }

    /// Fresh-group path: nothing can be left over, so skip reconciliation.
    fn deploy_fresh(&self, dry_run: bool) -> Result<RunReport> {
        let config = self.config;

        ui::step(
            1,
            2,
            &format!("Creating resource group in {}", config.location),
        );
        if dry_run {
            ui::dim("dry run: skipped");
        } else {
            self.provider
                .group_create(&config.resource_group, &config.location)
                .context("Could not create resource group")?;
        }

        let (deployment, outputs) = self.apply_template(2, 2, dry_run)?;

        Ok(RunReport {
            group: GroupState::Created,
            purge: None,
            cleanup: None,
            deployment,
            outputs,
            dry_run,
        })
    }

    /// Existing-group path: purge, optionally wipe, then deploy.
    fn reconcile_and_deploy(&self, dry_run: bool) -> Result<RunReport> {
        let total = if self.config.wipe_on_redeploy { 3 } else { 2 };

        ui::step(1, total, "Purging soft-deleted accounts");
        let purge = self.purge_soft_deleted(dry_run)?;

        let cleanup = if self.config.wipe_on_redeploy {
            ui::step(2, total, "Clearing prior deployment");
            self.clear_prior_deployment(dry_run)?
        } else {
            None
        };

        let (deployment, outputs) = self.apply_template(total, total, dry_run)?;

        Ok(RunReport {
            group: GroupState::Existed,
            purge: Some(purge),
            cleanup,
            deployment,
            outputs,
            dry_run,
        })
    }

    /// Purge soft-deleted accounts matching the configured kind and location.
    ///
    /// A failure on one account is recorded and the loop continues. Purging
    /// is asynchronous on the provider side, so once purges have been
    /// issued, the phase polls the soft-delete listing until the purged
    /// names disappear or the budget runs out. A timed-out poll is a
    /// warning, not an error: the subsequent deployment may still succeed.
    fn purge_soft_deleted(&self, dry_run: bool) -> Result<PurgeOutcome> {
        let config = self.config;
        let accounts = self
            .provider
            .list_soft_deleted(&config.account_kind, &config.location)
            .context("Could not list soft-deleted accounts")?;

        let mut outcome = PurgeOutcome {
            found: accounts.iter().map(|a| a.name.clone()).collect(),
            ..PurgeOutcome::default()
        };

        if accounts.is_empty() {
            ui::dim("no soft-deleted accounts found");
            return Ok(outcome);
        }

        if dry_run {
            for name in &outcome.found {
                ui::dim(&format!("would purge {name}"));
            }
            return Ok(outcome);
        }

        for account in &accounts {
            match self
                .provider
                .purge_account(&account.name, &config.resource_group, &config.location)
            {
                Ok(()) => {
                    ui::dim(&format!("purged {}", account.name));
                    outcome.purged.push(account.name.clone());
                }
                Err(e) if e.is_fatal() => {
                    return Err(e)
                        .with_context(|| format!("Could not purge '{}'", account.name));
                }
                Err(e) if e.is_ignorable() => {
                    ui::dim(&format!("{} already gone", account.name));
                    outcome.already_absent.push(account.name.clone());
                }
                Err(e) => {
                    warn!("purge of {} failed: {e}", account.name);
                    outcome.failed.push((account.name.clone(), e.to_string()));
                }
            }
        }

        if outcome.purged.is_empty() {
            return Ok(outcome);
        }

        // A purged name must drop out of the soft-delete listing before a
        // same-named account can be created again
        let purged: HashSet<&str> = outcome.purged.iter().map(String::as_str).collect();
        let pb = progress::spinner("Waiting for purges to settle");
        let settle = wait_until(&self.purge_settle, || {
            match self
                .provider
                .list_soft_deleted(&config.account_kind, &config.location)
            {
                Ok(listing) => Ok(!listing.iter().any(|a| purged.contains(a.name.as_str()))),
                Err(e) if e.is_fatal() => Err(e),
                Err(e) => {
                    debug!("purge settle probe failed: {e}");
                    Ok(false)
                }
            }
        });
        pb.finish_and_clear();

        let settle = settle.context("Purge settle poll failed")?;
        if !settle.is_settled() {
            ui::warn("Purges did not settle within the budget; continuing anyway");
        }
        outcome.settle = Some(settle);

        Ok(outcome)
    }

    /// Delete everything left behind by a prior deployment.
    ///
    /// Returns `None` when no deployment record with the configured name
    /// exists. Per-resource failures are recorded and skipped; a resource
    /// that is already gone counts as deleted.
    fn clear_prior_deployment(&self, dry_run: bool) -> Result<Option<CleanupOutcome>> {
        let config = self.config;
        let prior = self
            .provider
            .deployment_show(&config.resource_group, &config.deployment_name)
            .context("Could not check for a prior deployment")?;

        let Some(prior) = prior else {
            ui::dim("no prior deployment found");
            return Ok(None);
        };

        let mut outcome = CleanupOutcome {
            prior_state: prior.provisioning_state().to_string(),
            ..CleanupOutcome::default()
        };

        let resources = self
            .provider
            .resource_list(&config.resource_group)
            .context("Could not list group resources")?;

        if resources.is_empty() {
            ui::dim("prior deployment left no resources behind");
            return Ok(Some(outcome));
        }

        if dry_run {
            for resource in &resources {
                ui::dim(&format!(
                    "would delete {} ({})",
                    resource.name, resource.resource_type
                ));
            }
            outcome.found = resources;
            return Ok(Some(outcome));
        }

        let mut deleted_ids: HashSet<String> = HashSet::new();
        for resource in &resources {
            match self.provider.resource_delete(&resource.id) {
                Ok(()) => {
                    ui::dim(&format!("deleted {}", resource.name));
                    deleted_ids.insert(resource.id.clone());
                    outcome.deleted.push(resource.name.clone());
                }
                Err(e) if e.is_fatal() => {
                    return Err(e)
                        .with_context(|| format!("Could not delete '{}'", resource.name));
                }
                Err(e) => {
                    warn!("deletion of {} failed: {e}", resource.name);
                    outcome.failed.push((resource.name.clone(), e.to_string()));
                }
            }
        }
        outcome.found = resources;

        if deleted_ids.is_empty() {
            return Ok(Some(outcome));
        }

        // Deletion is asynchronous too; deploying over half-deleted
        // resources raises conflicts
        let pb = progress::spinner("Waiting for deletions to settle");
        let settle = wait_until(&self.cleanup_settle, || {
            match self.provider.resource_list(&config.resource_group) {
                Ok(listing) => Ok(!listing.iter().any(|r| deleted_ids.contains(&r.id))),
                Err(e) if e.is_fatal() => Err(e),
                Err(e) => {
                    debug!("cleanup settle probe failed: {e}");
                    Ok(false)
                }
            }
        });
        pb.finish_and_clear();

        let settle = settle.context("Cleanup settle poll failed")?;
        if !settle.is_settled() {
            ui::warn("Deletions did not settle within the budget; continuing anyway");
        }
        outcome.settle = Some(settle);

        Ok(Some(outcome))
    }

    /// Submit the template and fetch the declared outputs.
    ///
    /// A deployment failure is fatal with no retry: the causes vary too
    /// much (quota, policy, naming) to be retried blindly. Output
    /// retrieval failure is only a warning since the deployment itself
    /// already succeeded.
    fn apply_template(
        &self,
        step: usize,
        total: usize,
        dry_run: bool,
    ) -> Result<(Option<Deployment>, DeploymentOutputs)> {
        let config = self.config;
        ui::step(step, total, &format!("Deploying {}", config.template_file));

        if dry_run {
            ui::dim("dry run: skipped");
            return Ok((None, DeploymentOutputs::empty()));
        }

        let template = config.template_path();
        let pb = progress::spinner("Waiting for the provider to evaluate the template");
        let result = self.provider.deployment_create(
            &config.resource_group,
            &template,
            &config.deployment_name,
            DeploymentMode::Incremental,
        );
        pb.finish_and_clear();

        let deployment = result.context("Template deployment failed")?;

        let state = deployment.provisioning_state();
        if !state.eq_ignore_ascii_case("succeeded") {
            bail!("Deployment finished in state '{state}'");
        }

        let outputs = match self
            .provider
            .deployment_outputs(&config.resource_group, &config.deployment_name)
        {
            Ok(outputs) => outputs,
            Err(e) => {
                ui::warn(&format!("Could not fetch deployment outputs: {e}"));
                DeploymentOutputs::empty()
            }
        };

        Ok((Some(deployment), outputs))
    }
}

// ============================================================================
// Reporting
// ============================================================================

/// Print the end-of-run report.
pub fn print_report(report: &RunReport) {
    ui::header(if report.dry_run {
        "Deploy plan"
    } else {
        "Deploy summary"
    });

    match report.group {
        GroupState::Created if report.dry_run => ui::kv("Resource group", "would be created"),
        GroupState::Created => ui::kv("Resource group", "created"),
        GroupState::Existed => ui::kv("Resource group", "existed"),
    }

    if let Some(purge) = &report.purge {
        ui::kv("Soft-deleted accounts", &purge_summary(purge, report.dry_run));
        for (name, error) in &purge.failed {
            ui::warn(&format!("purge failed for {name}: {error}"));
        }
    }

    if let Some(cleanup) = &report.cleanup {
        ui::kv("Prior deployment", &cleanup.prior_state);
        ui::kv("Resources", &cleanup_summary(cleanup, report.dry_run));
        for (name, error) in &cleanup.failed {
            ui::warn(&format!("deletion failed for {name}: {error}"));
        }
    }

    if let Some(deployment) = &report.deployment {
        ui::kv("Deployment", deployment.provisioning_state());
        if let Some(timestamp) = &deployment.properties.timestamp {
            ui::kv("Finished", timestamp);
        }
    } else if report.dry_run {
        ui::kv("Deployment", "would run");
    }

    if !report.outputs.is_empty() {
        ui::section("Outputs");
        for (key, value) in report.outputs.iter() {
            ui::kv(key, &value.display_value());
        }
    }
}

fn purge_summary(purge: &PurgeOutcome, dry_run: bool) -> String {
    if purge.found.is_empty() {
        return "none found".to_string();
    }
    if dry_run {
        return format!("would purge {}", purge.found.len());
    }
    let mut parts = vec![format!("{} purged", purge.purged.len())];
    if !purge.already_absent.is_empty() {
        parts.push(format!("{} already gone", purge.already_absent.len()));
    }
    if !purge.failed.is_empty() {
        parts.push(format!("{} failed", purge.failed.len()));
    }
    if let Some(settle) = &purge.settle {
        if !settle.is_settled() {
            parts.push("settle timed out".to_string());
        }
    }
    parts.join(", ")
}

fn cleanup_summary(cleanup: &CleanupOutcome, dry_run: bool) -> String {
    if cleanup.found.is_empty() {
        return "none left behind".to_string();
    }
    if dry_run {
        return format!("would delete {}", cleanup.found.len());
    }
    let mut parts = vec![format!("{} deleted", cleanup.deleted.len())];
    if !cleanup.failed.is_empty() {
        parts.push(format!("{} failed", cleanup.failed.len()));
    }
    if let Some(settle) = &cleanup.settle {
        if !settle.is_settled() {
            parts.push("settle timed out".to_string());
        }
    }
    parts.join(", ")
}

// ============================================================================
// Tests
// ============================================================================
