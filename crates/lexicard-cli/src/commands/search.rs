//! The `lexicard search` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::GlobalOpts;

pub fn execute(global: &GlobalOpts, query: &str, category: Option<&str>) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let hits = controller.store().search(query, category);

    if hits.is_empty() {
        println!("No words match \"{query}\".");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Word", "POS", "Chinese", "English"]);
    for hit in &hits {
        table.add_row(vec![
            Cell::new(&hit.category),
            Cell::new(&hit.entry.word),
            Cell::new(&hit.entry.part_of_speech),
            Cell::new(&hit.entry.chinese),
            Cell::new(&hit.entry.english),
        ]);
    }
    println!("{table}");
    println!("{} match(es)", hits.len());
    Ok(())
}
