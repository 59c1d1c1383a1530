//! The `lexicard init` command.

use std::path::Path;

use anyhow::{Context, Result};

use lexicard_core::config::{CONFIG_FILE_NAME, SAMPLE_CONFIG};

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to choose a data directory");
    println!("  2. Run: lexicard categories");
    println!("  3. Run: lexicard quiz --category default");

    Ok(())
}
