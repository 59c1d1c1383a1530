//! The `lexicard list` command.

use anyhow::Result;

use crate::GlobalOpts;

pub fn execute(global: &GlobalOpts, category: &str, json: bool) -> Result<()> {
    let (_, controller) = super::open(global)?;
    let store = controller.store();
    if !store.has_category(category) {
        anyhow::bail!("category \"{category}\" does not exist");
    }
    let words = store.words_by_category(category);

    if json {
        println!("{}", serde_json::to_string_pretty(words)?);
        return Ok(());
    }

    if words.is_empty() {
        println!("Category \"{category}\" is empty.");
    } else {
        println!("{}", super::word_table(words));
        println!("{} word(s) in \"{category}\"", words.len());
    }
    Ok(())
}
