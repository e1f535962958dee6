//! Purge soft-deleted accounts holding name reservations.
//!
//! Standalone version of the deployer's purge phase, for operators who
//! want to release names without redeploying. No settle wait happens
//! here since nothing is created afterwards.

use anyhow::{Context, Result};
use armkit::Provider;
use dialoguer::Confirm;

use crate::Context as AppContext;
use crate::cli::PurgeArgs;
use crate::config::Config;
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config, args: PurgeArgs) -> Result<()> {
    let deploy = &config.deploy;
    let provider =
        armkit::default_provider().context("Could not initialize the az provider")?;

    let accounts = provider
        .list_soft_deleted(&deploy.account_kind, &deploy.location)
        .context("Could not list soft-deleted accounts")?;

    if accounts.is_empty() {
        ui::success(&format!(
            "No soft-deleted {} accounts in {}",
            deploy.account_kind, deploy.location
        ));
        return Ok(());
    }

    ui::header("Soft-deleted accounts");
    for account in &accounts {
        ui::dim(&format!("{} ({})", account.name, account.location));
    }
    println!();

    if args.dry_run {
        ui::info(&format!("Would purge {} account(s)", accounts.len()));
        return Ok(());
    }

    if !args.yes {
        let proceed = Confirm::new()
            .with_prompt("Purging is irreversible. Continue?")
            .default(false)
            .interact()?;
        if !proceed {
            ui::info("Aborted");
            return Ok(());
        }
    }

    let mut purged = 0usize;
    let mut failed = 0usize;
    for account in &accounts {
        match provider.purge_account(&account.name, &deploy.resource_group, &deploy.location) {
            Ok(()) => {
                ui::success(&format!("purged {}", account.name));
                purged += 1;
            }
            Err(e) if e.is_fatal() => {
                return Err(e).with_context(|| format!("Could not purge '{}'", account.name));
            }
            Err(e) if e.is_ignorable() => {
                ui::dim(&format!("{} already gone", account.name));
            }
            Err(e) => {
                ui::error(&format!("purge of {} failed: {e}", account.name));
                failed += 1;
            }
        }
    }

    println!();
    if failed == 0 {
        ui::success(&format!("Purged {purged} account(s)"));
    } else {
        ui::warn(&format!("Purged {purged} account(s), {failed} failed"));
    }

    Ok(())
}
