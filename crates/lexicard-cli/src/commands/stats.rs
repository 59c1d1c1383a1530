//! The `lexicard stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::GlobalOpts;

pub fn execute(global: &GlobalOpts) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let stats = controller.store().category_stats();

    let mut table = Table::new();
    table.set_header(vec!["Category", "Words"]);
    for (name, count) in &stats.categories {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }
    println!("{table}");
    println!(
        "{} categor(ies), {} word(s)",
        stats.total_categories, stats.total_words
    );

    let history = controller.history();
    if let Some(last) = history.records().first() {
        let average =
            history.records().iter().map(|r| r.accuracy as f64).sum::<f64>() / history.len() as f64;
        println!(
            "{} quiz(zes) taken, average accuracy {average:.1}%, last {}%",
            history.len(),
            last.accuracy
        );
    }
    Ok(())
}
