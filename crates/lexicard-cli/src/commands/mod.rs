//! Subcommand implementations.

pub mod backup;
pub mod categories;
pub mod history;
pub mod init;
pub mod list;
pub mod quiz;
pub mod search;
pub mod stats;
pub mod transfer;
pub mod words;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexicard_core::config::{load_config_from, LexicardConfig};
use lexicard_core::controller::StudyController;
use lexicard_core::WordEntry;
use lexicard_storage::JsonFileStore;

use crate::GlobalOpts;

/// Load the config and open the data directory it points at.
///
/// A freshly seeded library is written back right away.
pub fn open(global: &GlobalOpts) -> Result<(LexicardConfig, StudyController)> {
    let mut config = load_config_from(global.config.as_deref())?;
    if let Some(dir) = &global.data_dir {
        config.data_dir = dir.clone();
    }

    tracing::debug!("using data directory {}", config.data_dir.display());
    let kv = JsonFileStore::open(&config.data_dir)?;
    let mut controller = StudyController::open(Box::new(kv), &config)?;
    if controller.is_dirty() {
        controller.save()?;
    }
    Ok((config, controller))
}

/// Numbered table of word entries.
pub fn word_table<'a>(words: impl IntoIterator<Item = &'a WordEntry>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Word", "POS", "Chinese", "English"]);
    for (i, w) in words.into_iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&w.word),
            Cell::new(&w.part_of_speech),
            Cell::new(&w.chinese),
            Cell::new(&w.english),
        ]);
    }
    table
}
