//! Inspect and validate extraction schema files.

use anyhow::{Context, Result};
use content::SchemaStore;
use content::schema;

use crate::Context as AppContext;
use crate::cli::SchemasCommand;
use crate::config::Config;
use crate::ui;

pub fn run(_ctx: &AppContext, config: &Config, cmd: SchemasCommand) -> Result<()> {
    let mut store = SchemaStore::new(config.content.schemas_path());

    match cmd {
        SchemasCommand::List => list(&store),
        SchemasCommand::Validate { name, version } => validate(&mut store, &name, &version),
    }
}

fn list(store: &SchemaStore) -> Result<()> {
    let schemas = store.list()?;

    if schemas.is_empty() {
        ui::info(&format!("No schemas found in {}", store.dir().display()));
        return Ok(());
    }

    ui::header("Schemas");
    for (name, version) in &schemas {
        println!("  {name} ({version})");
    }
    ui::dim(&format!("from {}", store.dir().display()));

    Ok(())
}

fn validate(store: &mut SchemaStore, name: &str, version: &str) -> Result<()> {
    let value = store
        .load(name, version)
        .with_context(|| format!("Could not load schema '{name}' ({version})"))?;

    schema::validate(&value)
        .with_context(|| format!("Schema '{name}' ({version}) is not usable"))?;

    ui::success(&format!("Schema '{name}' ({version}) is valid"));
    Ok(())
}
