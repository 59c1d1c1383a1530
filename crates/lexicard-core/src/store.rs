//! Categorized word collection with validated CRUD.
//!
//! `WordStore` is pure in-memory state. Every successful mutation sets a
//! dirty flag; writing the library back to a [`crate::traits::KeyValueStore`]
//! is the caller's job (see [`crate::repository::LibraryRepository::save`]).

use serde::Serialize;

use crate::error::LibraryError;
use crate::model::{
    is_reserved, WordEntry, WordLibrary, DEFAULT_CATEGORY, WRONG_WORDS_CATEGORY,
};
use crate::seed;

/// Outcome of adding several entries at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<BatchError>,
}

/// One rejected entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    /// Zero-based position of the entry in the input.
    pub index: usize,
    /// The entry's word as given (may be empty).
    pub word: String,
    pub reason: LibraryError,
}

/// A search hit together with the category it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub category: String,
    #[serde(flatten)]
    pub entry: WordEntry,
}

/// Per-category word counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub categories: Vec<(String, usize)>,
    pub total_categories: usize,
    pub total_words: usize,
}

/// The authoritative word library.
#[derive(Debug, Clone)]
pub struct WordStore {
    library: WordLibrary,
    dirty: bool,
}

impl Default for WordStore {
    fn default() -> Self {
        Self::new(WordLibrary::initial())
    }
}

impl WordStore {
    pub fn new(library: WordLibrary) -> Self {
        Self {
            library,
            dirty: false,
        }
    }

    pub fn library(&self) -> &WordLibrary {
        &self.library
    }

    /// Whether the library changed since the last [`WordStore::mark_saved`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn touch(&mut self) {
        self.dirty = true;
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Category names in insertion order. `wrongWords` is left out while empty.
    pub fn categories(&self) -> Vec<String> {
        self.library
            .iter()
            .filter(|c| c.name != WRONG_WORDS_CATEGORY || !c.is_empty())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.library.contains(name)
    }

    /// Entries of `name`, or an empty slice when the category does not exist.
    pub fn words_by_category(&self, name: &str) -> &[WordEntry] {
        match self.library.get(name) {
            Some(category) => &category.words,
            None => {
                tracing::warn!("category \"{name}\" does not exist");
                &[]
            }
        }
    }

    /// Every entry of every category, in category order.
    pub fn all_words(&self) -> Vec<WordEntry> {
        self.library
            .iter()
            .flat_map(|c| c.words.iter().cloned())
            .collect()
    }

    pub fn category_stats(&self) -> CategoryStats {
        let categories: Vec<(String, usize)> = self
            .library
            .iter()
            .map(|c| (c.name.clone(), c.len()))
            .collect();
        CategoryStats {
            total_categories: categories.len(),
            total_words: self.library.total_words(),
            categories,
        }
    }

    /// Case-insensitive substring search over all four fields.
    ///
    /// Searches one category when `category` is given, otherwise all of them.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.library
            .iter()
            .filter(|c| category.map_or(true, |name| c.name == name))
            .flat_map(|c| {
                c.words
                    .iter()
                    .filter(|w| w.contains_lowercase(&needle))
                    .map(|w| SearchHit {
                        category: c.name.clone(),
                        entry: w.clone(),
                    })
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Word mutation
    // -----------------------------------------------------------------------

    /// Append `entry` to `category`, creating the category if needed.
    pub fn add_word(&mut self, category: &str, entry: &WordEntry) -> Result<WordEntry, LibraryError> {
        let entry = entry.normalized()?;
        let target = self.library.get_or_create(category);
        if target.contains(&entry.word) {
            return Err(LibraryError::DuplicateWord {
                category: category.to_string(),
                word: entry.word,
            });
        }
        target.words.push(entry.clone());
        self.touch();
        tracing::debug!("added \"{}\" to \"{category}\"", entry.word);
        Ok(entry)
    }

    /// Add each entry in turn. Invalid or duplicate entries are reported, not fatal.
    pub fn add_words<'a, I>(&mut self, category: &str, entries: I) -> BatchReport
    where
        I: IntoIterator<Item = &'a WordEntry>,
    {
        self.library.get_or_create(category);
        let mut report = BatchReport::default();

        for (index, entry) in entries.into_iter().enumerate() {
            match self.add_word(category, entry) {
                Ok(_) => report.added += 1,
                Err(reason) => {
                    report.skipped += 1;
                    report.errors.push(BatchError {
                        index,
                        word: entry.word.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            "batch add to \"{category}\": {} added, {} skipped",
            report.added,
            report.skipped
        );
        report
    }

    /// Remove `word` from `category`. Returns `false` if either is absent.
    pub fn remove_word(&mut self, category: &str, word: &str) -> bool {
        let Some(target) = self.library.get_mut(category) else {
            tracing::warn!("category \"{category}\" does not exist");
            return false;
        };
        let Some(index) = target.position(word) else {
            return false;
        };
        target.words.remove(index);
        self.touch();
        true
    }

    /// Replace `old_word` with `entry`, keeping its position.
    pub fn update_word(
        &mut self,
        category: &str,
        old_word: &str,
        entry: &WordEntry,
    ) -> Result<WordEntry, LibraryError> {
        let entry = entry.normalized()?;
        let target = self
            .library
            .get_mut(category)
            .ok_or_else(|| LibraryError::CategoryNotFound(category.to_string()))?;

        let index = target
            .position(old_word)
            .ok_or_else(|| LibraryError::WordNotFound {
                category: category.to_string(),
                word: old_word.to_string(),
            })?;

        let collides = target
            .words
            .iter()
            .enumerate()
            .any(|(i, w)| i != index && w.same_word(&entry.word));
        if collides {
            return Err(LibraryError::DuplicateWord {
                category: category.to_string(),
                word: entry.word,
            });
        }

        target.words[index] = entry.clone();
        self.touch();
        Ok(entry)
    }

    /// Move `word` from one category to another.
    pub fn move_word(&mut self, from: &str, to: &str, word: &str) -> Result<WordEntry, LibraryError> {
        let entry = self.transferable(from, to, word)?;
        if let Some(source) = self.library.get_mut(from) {
            source.words.retain(|w| !w.same_word(word));
        }
        self.library.get_or_create(to).words.push(entry.clone());
        self.touch();
        Ok(entry)
    }

    /// Copy `word` into another category, leaving the source untouched.
    pub fn copy_word(&mut self, from: &str, to: &str, word: &str) -> Result<WordEntry, LibraryError> {
        let entry = self.transferable(from, to, word)?;
        self.add_word(to, &entry)
    }

    fn transferable(&self, from: &str, to: &str, word: &str) -> Result<WordEntry, LibraryError> {
        let source = self
            .library
            .get(from)
            .ok_or_else(|| LibraryError::CategoryNotFound(from.to_string()))?;
        let target = self
            .library
            .get(to)
            .ok_or_else(|| LibraryError::CategoryNotFound(to.to_string()))?;

        let entry = source
            .position(word)
            .map(|i| source.words[i].clone())
            .ok_or_else(|| LibraryError::WordNotFound {
                category: from.to_string(),
                word: word.to_string(),
            })?;

        if target.contains(word) {
            return Err(LibraryError::DuplicateWord {
                category: to.to_string(),
                word: entry.word,
            });
        }
        Ok(entry)
    }

    // -----------------------------------------------------------------------
    // Category mutation
    // -----------------------------------------------------------------------

    /// Create an empty category under the trimmed `name`.
    pub fn create_category(&mut self, name: &str) -> Result<String, LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::InvalidFormat(
                "category name cannot be empty".into(),
            ));
        }
        if self.library.contains(name) {
            return Err(LibraryError::AlreadyExists(name.to_string()));
        }
        self.library.get_or_create(name);
        self.touch();
        tracing::info!("created category \"{name}\"");
        Ok(name.to_string())
    }

    /// Delete a category. Returns how many words it held.
    pub fn delete_category(&mut self, name: &str) -> Result<usize, LibraryError> {
        if is_reserved(name) {
            return Err(LibraryError::ProtectedCategory {
                category: name.to_string(),
                action: "deleted",
            });
        }
        let removed = self
            .library
            .remove(name)
            .ok_or_else(|| LibraryError::CategoryNotFound(name.to_string()))?;
        self.touch();
        tracing::info!("deleted category \"{name}\" ({} words)", removed.len());
        Ok(removed.len())
    }

    /// Remove every word of a category. `default` cannot be cleared.
    pub fn clear_category(&mut self, name: &str) -> Result<usize, LibraryError> {
        if name == DEFAULT_CATEGORY {
            return Err(LibraryError::ProtectedCategory {
                category: name.to_string(),
                action: "cleared",
            });
        }
        let target = self
            .library
            .get_mut(name)
            .ok_or_else(|| LibraryError::CategoryNotFound(name.to_string()))?;
        let cleared = target.words.len();
        target.words.clear();
        self.touch();
        Ok(cleared)
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    /// Merge the bundled dataset if the library holds no user data yet.
    ///
    /// Returns `true` when seed data was merged.
    pub fn seed_if_needed(&mut self) -> bool {
        if !seed::needs_seeding(&self.library) {
            return false;
        }
        let filled = match seed::bundled_library() {
            Ok(bundled) => seed::merge_seed(&mut self.library, bundled),
            Err(e) => {
                tracing::warn!("bundled word data unusable, using fallback: {e}");
                seed::merge_seed(&mut self.library, seed::fallback_library())
            }
        };
        tracing::info!("seeded {filled} categor(ies) from bundled data");
        self.touch();
        true
    }
}
