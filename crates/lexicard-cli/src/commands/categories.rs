//! The `lexicard categories`, `create-category`, `delete-category` and
//! `clear-category` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::GlobalOpts;

pub fn execute(global: &GlobalOpts) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let store = controller.store();

    let mut table = Table::new();
    table.set_header(vec!["Category", "Words"]);
    for name in store.categories() {
        table.add_row(vec![
            Cell::new(&name),
            Cell::new(store.words_by_category(&name).len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn create(global: &GlobalOpts, name: &str) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    let name = controller.store_mut().create_category(name)?;
    controller.save()?;
    println!("Created category \"{name}\"");
    Ok(())
}

pub fn delete(global: &GlobalOpts, name: &str) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    let removed = controller.store_mut().delete_category(name)?;
    controller.save()?;
    println!("Deleted category \"{name}\" ({removed} word(s))");
    Ok(())
}

pub fn clear(global: &GlobalOpts, name: &str) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    let cleared = controller.store_mut().clear_category(name)?;
    controller.save()?;
    println!("Cleared {cleared} word(s) from \"{name}\"");
    Ok(())
}
