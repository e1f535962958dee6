//! Extract text from a local document and build a store record.
//!
//! Offline twin of the blob-triggered processing function: reads the
//! bytes, extracts text, and prints the exact record shape the document
//! store receives.

use anyhow::{Context, Result};
use chrono::Utc;
use content::DocumentRecord;
use content::extract::{PARTITION_KEY, STORE_CONTAINER, STORE_DATABASE};
use content::mime_for;
use std::fs;

use crate::Context as AppContext;
use crate::cli::ProcessArgs;
use crate::ui;

pub fn run(_ctx: &AppContext, args: ProcessArgs) -> Result<()> {
    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable name")?
        .to_string();

    let bytes = fs::read(&args.file)
        .with_context(|| format!("Could not read {}", args.file.display()))?;

    let record = DocumentRecord::completed(&filename, &bytes, Utc::now());
    let json = serde_json::to_string_pretty(&record)?;

    if let Some(path) = &args.output {
        fs::write(path, &json)
            .with_context(|| format!("Could not write {}", path.display()))?;
        ui::success(&format!("Record written to {}", path.display()));

        ui::section("Summary");
        ui::kv("Record id", &record.id);
        ui::kv("Content type", mime_for(&filename));
        ui::kv("Size", &ui::format_size(record.blob_size));
        if let Some(metadata) = &record.metadata {
            ui::kv("Words", &metadata.word_count.to_string());
            ui::kv("Characters", &metadata.character_count.to_string());
        }
        ui::kv(
            "Destination",
            &format!("{STORE_DATABASE}/{STORE_CONTAINER} (partition {PARTITION_KEY})"),
        );
    } else {
        println!("{json}");
    }

    Ok(())
}
