//! Whole-application backup and restore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LibraryError;
use crate::history::QuizRecord;
use crate::model::{WordEntry, WordLibrary};
use crate::settings::UserSettings;
use crate::store::WordStore;

/// Format version written into every backup.
pub const BACKUP_VERSION: &str = "1.0.0";

/// Serialized backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub word_library: WordLibrary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<UserSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_records: Option<Vec<QuizRecord>>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl Backup {
    pub fn new(
        library: &WordLibrary,
        settings: Option<&UserSettings>,
        records: Option<&[QuizRecord]>,
    ) -> Self {
        Self {
            word_library: library.clone(),
            user_settings: settings.cloned(),
            quiz_records: records.map(<[QuizRecord]>::to_vec),
            export_date: Utc::now(),
            version: BACKUP_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LibraryError> {
        serde_json::to_string_pretty(self).map_err(|e| LibraryError::InvalidFormat(e.to_string()))
    }
}

/// Validated contents of a backup, ready to replace the current data.
#[derive(Debug)]
pub struct RestoredBackup {
    pub store: WordStore,
    pub settings: Option<UserSettings>,
    pub records: Option<Vec<QuizRecord>>,
    pub version: String,
    /// Entries dropped because they were invalid or duplicated.
    pub dropped: usize,
}

/// Parse and validate a backup document.
///
/// The document must be a JSON object carrying `wordLibrary` and `version`.
/// Every word entry goes through the same validation as a regular add, so
/// the restored library upholds the store's invariants.
pub fn restore_backup(data: &str) -> Result<RestoredBackup, LibraryError> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| LibraryError::InvalidFormat(format!("backup is not valid JSON: {e}")))?;

    let invalid = |reason: &str| LibraryError::InvalidFormat(format!("invalid backup: {reason}"));

    let library = value
        .get("wordLibrary")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| invalid("missing wordLibrary"))?;
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| invalid("missing version"))?
        .to_string();

    let mut store = WordStore::new(WordLibrary::empty());
    let mut dropped = 0;
    for (category, words) in library {
        let words = words
            .as_array()
            .ok_or_else(|| invalid(&format!("category \"{category}\" is not a list")))?;
        let entries: Vec<WordEntry> = words
            .iter()
            .filter_map(|w| match serde_json::from_value::<WordEntry>(w.clone()) {
                Ok(entry) => Some(entry),
                Err(_) => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        dropped += store.add_words(category, &entries).skipped;
    }

    let settings = value.get("userSettings").and_then(|v| {
        serde_json::from_value::<UserSettings>(v.clone())
            .map_err(|e| tracing::warn!("ignoring unreadable settings in backup: {e}"))
            .ok()
    });
    let records = value.get("quizRecords").and_then(|v| {
        serde_json::from_value::<Vec<QuizRecord>>(v.clone())
            .map_err(|e| tracing::warn!("ignoring unreadable quiz records in backup: {e}"))
            .ok()
    });

    if dropped > 0 {
        tracing::warn!("dropped {dropped} invalid entr(ies) while restoring backup");
    }

    Ok(RestoredBackup {
        store,
        settings,
        records,
        version,
        dropped,
    })
}
