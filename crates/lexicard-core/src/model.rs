//! Core data model types for lexicard.
//!
//! These are the types the rest of the system passes around: a single
//! vocabulary entry, a named category of entries, the ordered library of
//! categories, and the quiz prompt direction.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LibraryError;

/// Seed data lives here; it can never be deleted or cleared.
pub const DEFAULT_CATEGORY: &str = "default";
/// Collects words answered incorrectly. Hidden from listings while empty.
pub const WRONG_WORDS_CATEGORY: &str = "wrongWords";
/// Scratch category for user-entered words. Present in a fresh library but not reserved.
pub const CUSTOM_CATEGORY: &str = "custom";

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// The English word or phrase. Identity key within a category.
    pub word: String,
    /// Part of speech, e.g. "n." or "phr.v.".
    pub part_of_speech: String,
    /// Chinese gloss.
    pub chinese: String,
    /// English definition.
    pub english: String,
}

impl WordEntry {
    pub fn new(
        word: impl Into<String>,
        part_of_speech: impl Into<String>,
        chinese: impl Into<String>,
        english: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            part_of_speech: part_of_speech.into(),
            chinese: chinese.into(),
            english: english.into(),
        }
    }

    /// Trim every field and reject the entry if any of them ends up empty.
    pub fn normalized(&self) -> Result<WordEntry, LibraryError> {
        let entry = WordEntry {
            word: self.word.trim().to_string(),
            part_of_speech: self.part_of_speech.trim().to_string(),
            chinese: self.chinese.trim().to_string(),
            english: self.english.trim().to_string(),
        };

        let missing: Vec<&str> = [
            ("word", &entry.word),
            ("partOfSpeech", &entry.part_of_speech),
            ("chinese", &entry.chinese),
            ("english", &entry.english),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(entry)
        } else {
            Err(LibraryError::InvalidFormat(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Case-insensitive identity comparison against another word.
    pub fn same_word(&self, other: &str) -> bool {
        self.word.trim().to_lowercase() == other.trim().to_lowercase()
    }

    /// Whether any of the four fields contains `needle` (already lowercased).
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        [
            &self.word,
            &self.part_of_speech,
            &self.chinese,
            &self.english,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A named, ordered sequence of word entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub words: Vec<WordEntry>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            words: Vec::new(),
        }
    }

    /// Position of `word` in this category, compared case-insensitively.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| w.same_word(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Returns `true` for categories that cannot be deleted.
pub fn is_reserved(name: &str) -> bool {
    name == DEFAULT_CATEGORY || name == WRONG_WORDS_CATEGORY
}

/// Ordered mapping from category name to category.
///
/// Serialized as a JSON object whose key order is the insertion order of the
/// categories, so a save/load cycle keeps listings stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordLibrary {
    categories: Vec<Category>,
}

impl WordLibrary {
    /// A library holding no categories at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh library: `default`, `wrongWords` and `custom`, all empty.
    pub fn initial() -> Self {
        let mut library = Self::empty();
        for name in [DEFAULT_CATEGORY, WRONG_WORDS_CATEGORY, CUSTOM_CATEGORY] {
            library.categories.push(Category::new(name));
        }
        library
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Return the named category, appending an empty one if it does not exist.
    pub fn get_or_create(&mut self, name: &str) -> &mut Category {
        let index = match self.categories.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.categories.push(Category::new(name));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }

    /// Replace the words of `name`, creating the category at the end if needed.
    pub fn set_words(&mut self, name: &str, words: Vec<WordEntry>) {
        self.get_or_create(name).words = words;
    }

    pub fn remove(&mut self, name: &str) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.name == name)?;
        Some(self.categories.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_words(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }
}

impl Serialize for WordLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.words)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WordLibrary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LibraryVisitor)
    }
}

struct LibraryVisitor;

impl<'de> Visitor<'de> for LibraryVisitor {
    type Value = WordLibrary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category names to word lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut library = WordLibrary::empty();
        while let Some((name, words)) = access.next_entry::<String, Vec<WordEntry>>()? {
            library.set_words(&name, words);
        }
        Ok(library)
    }
}

/// Prompt direction of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuizMode {
    /// Show the English word, expect the Chinese gloss.
    #[default]
    #[serde(rename = "en-to-zh")]
    EnToZh,
    /// Show the Chinese gloss, expect the English word.
    #[serde(rename = "zh-to-en")]
    ZhToEn,
    /// Show the English definition, expect the English word.
    #[serde(rename = "en-definition")]
    EnDefinition,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::EnToZh => write!(f, "en-to-zh"),
            QuizMode::ZhToEn => write!(f, "zh-to-en"),
            QuizMode::EnDefinition => write!(f, "en-definition"),
        }
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en-to-zh" | "en-zh" => Ok(QuizMode::EnToZh),
            "zh-to-en" | "zh-en" => Ok(QuizMode::ZhToEn),
            "en-definition" | "definition" => Ok(QuizMode::EnDefinition),
            other => Err(format!("unknown quiz mode: {other}")),
        }
    }
}
