//! Remembered user preferences.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuizMode, DEFAULT_CATEGORY};
use crate::traits::KeyValueStore;

pub const SETTINGS_KEY: &str = "userSettings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Mode of the last quiz started.
    #[serde(default)]
    pub quiz_mode: QuizMode,
    /// Category of the last quiz started.
    #[serde(default = "default_word_source")]
    pub word_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn default_word_source() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::with_mode(QuizMode::default())
    }
}

impl UserSettings {
    /// Fresh settings that start quizzes in `mode`.
    pub fn with_mode(mode: QuizMode) -> Self {
        Self {
            quiz_mode: mode,
            word_source: default_word_source(),
            last_page: None,
            timestamp: Utc::now(),
        }
    }

    /// Read stored settings. Absent or unreadable settings start from `default_mode`.
    pub fn load(kv: &dyn KeyValueStore, default_mode: QuizMode) -> Result<Self> {
        let raw = kv.get(SETTINGS_KEY).context("failed to read user settings")?;
        Ok(match raw {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed user settings: {e}");
                Self::with_mode(default_mode)
            }),
            None => Self::with_mode(default_mode),
        })
    }

    pub fn save(&self, kv: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self).context("failed to serialize user settings")?;
        kv.set(SETTINGS_KEY, &json)
            .context("failed to write user settings")
    }

    /// Remember the mode and category of a quiz that just started.
    pub fn remember_quiz(&mut self, category: &str, mode: QuizMode) {
        self.quiz_mode = mode;
        self.word_source = category.to_string();
        self.last_page = Some("quiz".to_string());
        self.timestamp = Utc::now();
    }
}
