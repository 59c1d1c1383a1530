//! The `lexicard add`, `remove`, `update`, `move` and `copy` commands.

use anyhow::Result;

use lexicard_core::{LibraryError, WordEntry};

use crate::{EntryArgs, GlobalOpts};

pub fn add(global: &GlobalOpts, category: &str, entry: EntryArgs) -> Result<()> {
    let entry = WordEntry::new(
        entry.word.unwrap_or_default(),
        entry.part_of_speech.unwrap_or_default(),
        entry.chinese.unwrap_or_default(),
        entry.english.unwrap_or_default(),
    );

    let (_, mut controller) = super::open(global)?;
    let added = controller.store_mut().add_word(category, &entry)?;
    controller.save()?;
    println!("Added \"{}\" to \"{category}\"", added.word);
    Ok(())
}

pub fn remove(global: &GlobalOpts, category: &str, word: &str) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    if !controller.store_mut().remove_word(category, word) {
        anyhow::bail!("word \"{word}\" does not exist in category \"{category}\"");
    }
    controller.save()?;
    println!("Removed \"{word}\" from \"{category}\"");
    Ok(())
}

pub fn update(global: &GlobalOpts, category: &str, old_word: &str, entry: EntryArgs) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    let current = controller
        .store()
        .words_by_category(category)
        .iter()
        .find(|w| w.same_word(old_word))
        .cloned()
        .ok_or_else(|| LibraryError::WordNotFound {
            category: category.to_string(),
            word: old_word.to_string(),
        })?;

    let updated = WordEntry::new(
        entry.word.unwrap_or(current.word),
        entry.part_of_speech.unwrap_or(current.part_of_speech),
        entry.chinese.unwrap_or(current.chinese),
        entry.english.unwrap_or(current.english),
    );
    let updated = controller
        .store_mut()
        .update_word(category, old_word, &updated)?;
    controller.save()?;
    println!("Updated \"{old_word}\" -> \"{}\" in \"{category}\"", updated.word);
    Ok(())
}

pub fn transfer(global: &GlobalOpts, word: &str, from: &str, to: &str, copy: bool) -> Result<()> {
    let (_, mut controller) = super::open(global)?;
    let store = controller.store_mut();
    let entry = if copy {
        store.copy_word(from, to, word)?
    } else {
        store.move_word(from, to, word)?
    };
    controller.save()?;
    let verb = if copy { "Copied" } else { "Moved" };
    println!("{verb} \"{}\" from \"{from}\" to \"{to}\"", entry.word);
    Ok(())
}
