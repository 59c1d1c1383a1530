//! The `lexicard history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::GlobalOpts;

pub fn execute(global: &GlobalOpts, limit: usize) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let records = controller.history().records();
    if records.is_empty() {
        println!("No quizzes taken yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Mode", "Words", "Correct", "Accuracy", "Duration"]);
    for r in records.iter().take(limit) {
        table.add_row(vec![
            Cell::new(r.date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")),
            Cell::new(r.mode),
            Cell::new(r.total_words),
            Cell::new(r.correct_count),
            Cell::new(format!("{}%", r.accuracy)),
            Cell::new(format!("{}s", r.duration)),
        ]);
    }
    println!("{table}");
    Ok(())
}
