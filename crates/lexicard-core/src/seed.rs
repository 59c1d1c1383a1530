//! Bundled starter vocabulary.

use anyhow::Context;

use crate::model::{WordEntry, WordLibrary, CUSTOM_CATEGORY, DEFAULT_CATEGORY, WRONG_WORDS_CATEGORY};

const SEED_WORDS: &str = include_str!("../data/seed_words.json");

/// Parse the dataset compiled into the binary.
pub fn bundled_library() -> anyhow::Result<WordLibrary> {
    let library: WordLibrary =
        serde_json::from_str(SEED_WORDS).context("failed to parse bundled seed words")?;
    if library.get(DEFAULT_CATEGORY).map_or(true, |c| c.is_empty()) {
        anyhow::bail!("bundled seed words have no \"{DEFAULT_CATEGORY}\" entries");
    }
    Ok(library)
}

/// Minimal library used when the bundled dataset cannot be read.
pub fn fallback_library() -> WordLibrary {
    let mut library = WordLibrary::empty();
    library.set_words(
        DEFAULT_CATEGORY,
        vec![WordEntry::new(
            "example",
            "n.",
            "例子",
            "a typical example or instance",
        )],
    );
    library
}

/// A library needs seeding when `default` is missing or empty and no
/// user-created category holds any words.
pub fn needs_seeding(library: &WordLibrary) -> bool {
    let default_empty = library.get(DEFAULT_CATEGORY).map_or(true, |c| c.is_empty());
    let user_words = library
        .iter()
        .filter(|c| {
            c.name != DEFAULT_CATEGORY && c.name != WRONG_WORDS_CATEGORY && c.name != CUSTOM_CATEGORY
        })
        .any(|c| !c.is_empty());
    default_empty && !user_words
}

/// Copy seed categories into `library` where they are missing or empty.
///
/// Existing words are never overwritten. Returns the number of categories filled.
pub fn merge_seed(library: &mut WordLibrary, seed: WordLibrary) -> usize {
    let mut filled = 0;
    for category in seed.iter() {
        let empty = library.get(&category.name).map_or(true, |c| c.is_empty());
        if empty && !category.is_empty() {
            library.set_words(&category.name, category.words.clone());
            filled += 1;
        }
    }
    for name in [WRONG_WORDS_CATEGORY, CUSTOM_CATEGORY] {
        library.get_or_create(name);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_data_parses() {
        let library = bundled_library().unwrap();
        assert!(library.len() >= 2);
        assert!(library.get(DEFAULT_CATEGORY).unwrap().contains("abandon"));
    }

    #[test]
    fn bundled_words_are_complete() {
        let library = bundled_library().unwrap();
        for category in library.iter() {
            for entry in &category.words {
                assert!(entry.normalized().is_ok(), "bad seed entry: {entry:?}");
            }
        }
    }

    #[test]
    fn needs_seeding_only_without_user_words() {
        assert!(needs_seeding(&WordLibrary::empty()));
        assert!(needs_seeding(&WordLibrary::initial()));

        let mut library = WordLibrary::initial();
        library.set_words(CUSTOM_CATEGORY, fallback_library().get(DEFAULT_CATEGORY).unwrap().words.clone());
        assert!(needs_seeding(&library));

        library.set_words("unit 1", vec![WordEntry::new("a", "b", "c", "d")]);
        assert!(!needs_seeding(&library));

        assert!(!needs_seeding(&fallback_library()));
    }

    #[test]
    fn merge_keeps_existing_words() {
        let mut library = WordLibrary::initial();
        library.set_words(
            WRONG_WORDS_CATEGORY,
            vec![WordEntry::new("keep", "v.", "保持", "to continue having")],
        );
        let filled = merge_seed(&mut library, fallback_library());
        assert_eq!(filled, 1);
        assert!(library.get(DEFAULT_CATEGORY).unwrap().contains("example"));
        assert!(library.get(WRONG_WORDS_CATEGORY).unwrap().contains("keep"));
    }

    #[test]
    fn merge_adds_system_categories() {
        let mut library = WordLibrary::empty();
        merge_seed(&mut library, fallback_library());
        assert!(library.contains(WRONG_WORDS_CATEGORY));
        assert!(library.contains(CUSTOM_CATEGORY));
    }
}
