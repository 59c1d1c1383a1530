//! The `lexicard import` and `lexicard export` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lexicard_core::transfer::{export_words, import_words, TransferFormat};

use crate::GlobalOpts;

/// Format from `--format`, else from the file extension.
fn resolve_format(file: &Path, format: Option<&str>) -> Result<TransferFormat> {
    let name = match format {
        Some(f) => f.to_string(),
        None => file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string)
            .with_context(|| {
                format!(
                    "cannot infer format of {}, pass --format json|csv",
                    file.display()
                )
            })?,
    };
    Ok(name.parse::<TransferFormat>()?)
}

pub fn import(global: &GlobalOpts, file: &Path, category: &str, format: Option<&str>) -> Result<()> {
    let format = resolve_format(file, format)?;
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let (_, mut controller) = super::open(global)?;
    let report = import_words(controller.store_mut(), &data, format, category)?;
    controller.save()?;

    println!(
        "Imported {} of {} word(s) into \"{category}\" ({} skipped)",
        report.imported, report.total, report.skipped
    );
    for e in &report.errors {
        let word = if e.word.is_empty() { "<missing>" } else { e.word.as_str() };
        eprintln!("  row {}: {word}: {}", e.index + 1, e.reason);
    }
    Ok(())
}

pub fn export(global: &GlobalOpts, category: &str, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format: TransferFormat = format.parse()?;
    let (_, controller) = super::open(global)?;
    let file = export_words(controller.store(), category, format)?;

    if output.as_deref() == Some(Path::new("-")) {
        print!("{}", file.data);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&file.filename));
    std::fs::write(&path, &file.data)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Exported {} word(s) from \"{category}\" to {} ({})",
        file.word_count,
        path.display(),
        file.content_type
    );
    Ok(())
}
