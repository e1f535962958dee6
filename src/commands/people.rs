//! Count people in an image via the Content Understanding service.

use anyhow::{Context, Result, bail};
use content::Client;
use std::env;
use std::fs;

use crate::Context as AppContext;
use crate::cli::PeopleArgs;
use crate::config::Config;
use crate::progress;
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config, args: PeopleArgs) -> Result<()> {
    let endpoint = args.endpoint.clone().or_else(|| {
        let configured = config.content.endpoint.trim();
        (!configured.is_empty()).then(|| configured.to_string())
    });
    let Some(endpoint) = endpoint else {
        bail!(
            "No endpoint configured; pass --endpoint, set CONTENT_UNDERSTANDING_ENDPOINT, \
             or add content.endpoint to the config file"
        );
    };

    // The key is a secret and only ever comes from the environment
    let api_key = env::var("CONTENT_UNDERSTANDING_KEY")
        .context("CONTENT_UNDERSTANDING_KEY is not set; export the key for this endpoint")?;

    let client = Client::new(&endpoint, api_key);

    let pb = progress::spinner("Analyzing image");
    let result = client.count_people(&args.url);
    pb.finish_and_clear();

    let report = result.context("Image analysis failed")?;

    ui::header("People count");
    ui::kv("Image", &args.url);
    ui::kv("Count", &report.count.to_string());
    if !report.description.is_empty() {
        ui::kv("Description", &report.description);
    }

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(&report.raw)?;
        fs::write(path, json)
            .with_context(|| format!("Could not write {}", path.display()))?;
        ui::success(&format!("Raw analysis saved to {}", path.display()));
    }

    Ok(())
}
