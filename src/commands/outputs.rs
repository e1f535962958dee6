//! Print declared outputs of the last deployment.

use anyhow::{Context, Result};
use armkit::Provider;

use crate::Context as AppContext;
use crate::config::Config;
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config, json: bool) -> Result<()> {
    let deploy = &config.deploy;
    let provider =
        armkit::default_provider().context("Could not initialize the az provider")?;

    let outputs = provider
        .deployment_outputs(&deploy.resource_group, &deploy.deployment_name)
        .with_context(|| {
            format!("Could not fetch outputs of deployment '{}'", deploy.deployment_name)
        })?;

    if outputs.is_empty() {
        ui::info(&format!(
            "Deployment '{}' declared no outputs",
            deploy.deployment_name
        ));
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    ui::header("Deployment outputs");
    for (key, value) in outputs.iter() {
        ui::kv(key, &value.display_value());
    }

    Ok(())
}
