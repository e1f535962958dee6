//! Status dashboard for the deployed stack.

use anyhow::{Context, Result};
use armkit::Provider;

use crate::Context as AppContext;
use crate::config::Config;
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config) -> Result<()> {
    let deploy = &config.deploy;
    let provider =
        armkit::default_provider().context("Could not initialize the az provider")?;

    ui::header("Stack status");
    ui::kv("Resource group", &deploy.resource_group);
    ui::kv("Location", &deploy.location);

    if !provider.is_available() {
        ui::error("The az CLI is installed but not responding");
        return Ok(());
    }

    let exists = provider.group_exists(&deploy.resource_group)?;
    if !exists {
        ui::kv("State", "not deployed (group missing)");
        return Ok(());
    }
    ui::kv("State", "group exists");

    match provider.deployment_show(&deploy.resource_group, &deploy.deployment_name)? {
        Some(record) => {
            ui::kv("Deployment", record.provisioning_state());
            if let Some(timestamp) = &record.properties.timestamp {
                ui::kv("Finished", timestamp);
            }
        }
        None => ui::kv("Deployment", "none recorded"),
    }

    let soft_deleted = provider.list_soft_deleted(&deploy.account_kind, &deploy.location)?;
    if !soft_deleted.is_empty() {
        ui::section("Soft-deleted accounts");
        for account in &soft_deleted {
            ui::dim(&format!("{} ({})", account.name, account.location));
        }
        ui::info("Run 'docstack purge' to release these names before redeploying");
    }

    Ok(())
}
