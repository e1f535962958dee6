//! Reconcile-and-deploy command.

use anyhow::{Context, Result, bail};
use dialoguer::Confirm;

use crate::Context as AppContext;
use crate::cli::DeployArgs;
use crate::config::Config;
use crate::deployer::{self, Deployer};
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config, args: DeployArgs) -> Result<()> {
    let mut deploy = config.deploy.clone();
    if args.keep_resources {
        deploy.wipe_on_redeploy = false;
    }

    // The template is opaque to us, but a missing file should fail here
    // rather than minutes into the run
    let template = deploy.template_path();
    if !template.exists() {
        bail!("Template not found at {}", template.display());
    }

    ui::header("Deploy");
    ui::kv("Resource group", &deploy.resource_group);
    ui::kv("Location", &deploy.location);
    ui::kv("Deployment", &deploy.deployment_name);
    ui::kv("Template", &deploy.template_file);
    if !deploy.wipe_on_redeploy {
        ui::kv("Wipe", "disabled");
    }
    println!();

    if !args.yes && !args.dry_run {
        let prompt = if deploy.wipe_on_redeploy {
            format!(
                "Redeploying may purge soft-deleted accounts and delete resources in '{}'. Continue?",
                deploy.resource_group
            )
        } else {
            "Proceed with deployment?".to_string()
        };
        let proceed = Confirm::new().with_prompt(prompt).default(true).interact()?;
        if !proceed {
            ui::info("Aborted");
            return Ok(());
        }
    }

    let provider =
        armkit::default_provider().context("Could not initialize the az provider")?;
    let report = Deployer::new(&provider, &deploy).run(args.dry_run)?;
    deployer::print_report(&report);

    if !args.dry_run {
        println!();
        ui::success("Deployment succeeded");
    }

    Ok(())
}
