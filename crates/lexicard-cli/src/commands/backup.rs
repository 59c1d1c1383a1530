//! The `lexicard backup`, `restore` and `reset` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::GlobalOpts;

pub fn backup(global: &GlobalOpts, output: Option<PathBuf>) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let json = controller.backup()?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "lexicard_backup_{}.json",
            chrono::Local::now().format("%Y-%m-%d")
        ))
    });
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Backed up {} word(s) and {} quiz record(s) to {}",
        controller.store().library().total_words(),
        controller.history().len(),
        path.display()
    );
    Ok(())
}

pub fn restore(global: &GlobalOpts, file: &Path) -> Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let (_, mut controller) = super::open(global)?;
    let summary = controller.restore(&data)?;
    println!(
        "Restored backup v{}: {} categor(ies), {} word(s)",
        summary.version, summary.categories, summary.words
    );
    if summary.dropped > 0 {
        println!("Dropped {} invalid or duplicate entr(ies)", summary.dropped);
    }
    Ok(())
}

pub fn reset(global: &GlobalOpts, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("reset deletes all words, history and settings; pass --yes to confirm");
    }
    let (config, mut controller) = super::open(global)?;
    controller.reset()?;
    println!(
        "Reset all data in {} ({} word(s) seeded)",
        config.data_dir.display(),
        controller.store().library().total_words()
    );
    Ok(())
}
