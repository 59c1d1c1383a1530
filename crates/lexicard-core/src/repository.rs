//! Loading and saving the word library.

use anyhow::{Context, Result};

use crate::model::WordLibrary;
use crate::seed;
use crate::store::WordStore;
use crate::traits::KeyValueStore;

/// Storage key for the library document.
pub const LIBRARY_KEY: &str = "wordLibrary";

/// Moves a [`WordStore`] in and out of a [`KeyValueStore`].
pub struct LibraryRepository;

impl LibraryRepository {
    /// Load the library, seeding it when empty.
    ///
    /// A malformed stored value is treated as absent. If the store cannot be
    /// read at all, the minimal fallback library is used.
    pub fn load(kv: &dyn KeyValueStore) -> WordStore {
        let raw = match kv.get(LIBRARY_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to read word library from {}: {e:#}", kv.name());
                let mut library = WordLibrary::initial();
                seed::merge_seed(&mut library, seed::fallback_library());
                return WordStore::new(library);
            }
        };

        let mut store = match raw {
            Some(raw) => match serde_json::from_str::<WordLibrary>(&raw) {
                Ok(stored) => Self::revalidate(&stored),
                Err(e) => {
                    tracing::warn!("stored word library is malformed, reseeding: {e}");
                    WordStore::new(WordLibrary::initial())
                }
            },
            None => WordStore::new(WordLibrary::initial()),
        };
        store.seed_if_needed();
        store
    }

    /// Rebuild a stored library through the regular add path.
    ///
    /// Entries with blank fields and case-insensitive duplicates are dropped;
    /// the store is left dirty when anything was dropped so the cleaned
    /// library gets written back.
    fn revalidate(stored: &WordLibrary) -> WordStore {
        let mut store = WordStore::new(WordLibrary::empty());
        let mut dropped = 0;
        for category in stored.iter() {
            let report = store.add_words(&category.name, &category.words);
            for e in &report.errors {
                tracing::debug!("dropping stored entry \"{}\" in \"{}\": {}", e.word, category.name, e.reason);
            }
            dropped += report.skipped;
        }

        if dropped == 0 {
            store.mark_saved();
        } else {
            tracing::warn!("dropped {dropped} invalid or duplicate stored entr(ies)");
        }
        store
    }

    /// Write the library and clear the store's dirty flag.
    pub fn save(kv: &mut dyn KeyValueStore, store: &mut WordStore) -> Result<()> {
        let json =
            serde_json::to_string(store.library()).context("failed to serialize word library")?;
        kv.set(LIBRARY_KEY, &json)
            .with_context(|| format!("failed to save word library to {}", kv.name()))?;
        store.mark_saved();
        tracing::info!(
            "saved {} word(s) in {} categor(ies)",
            store.library().total_words(),
            store.library().len()
        );
        Ok(())
    }

    /// Delete every stored key and return a freshly seeded store.
    pub fn reset_all(kv: &mut dyn KeyValueStore) -> Result<WordStore> {
        kv.clear().context("failed to clear stored data")?;
        let mut store = WordStore::default();
        store.seed_if_needed();
        Self::save(kv, &mut store)?;
        Ok(store)
    }
}
