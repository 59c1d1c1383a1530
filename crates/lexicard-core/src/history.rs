//! Archive of finished quiz sessions.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuizMode;
use crate::quiz::QuizResult;
use crate::traits::KeyValueStore;

/// Storage key for the archive.
pub const HISTORY_KEY: &str = "quizRecords";

/// Default number of records kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Summary of one finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub mode: QuizMode,
    pub total_words: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub accuracy: u32,
    /// Wall-clock seconds between start and finish.
    pub duration: u64,
}

impl QuizRecord {
    pub fn from_result(result: &QuizResult, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            mode: result.mode,
            total_words: result.total_words,
            correct_count: result.correct_count,
            incorrect_count: result.incorrect_count,
            accuracy: result.accuracy,
            duration: duration.as_secs(),
        }
    }
}

/// Newest-first list of quiz records with a size cap.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizHistory {
    records: Vec<QuizRecord>,
    limit: usize,
}

impl QuizHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit,
        }
    }

    /// Read the archive. Missing or malformed data yields an empty history.
    pub fn load(kv: &dyn KeyValueStore, limit: usize) -> Result<Self> {
        let mut history = Self::new(limit);
        let Some(raw) = kv.get(HISTORY_KEY).context("failed to read quiz history")? else {
            return Ok(history);
        };
        match serde_json::from_str::<Vec<QuizRecord>>(&raw) {
            Ok(records) => {
                history.records = records;
                history.records.truncate(limit);
            }
            Err(e) => tracing::warn!("ignoring malformed quiz history: {e}"),
        }
        Ok(history)
    }

    pub fn save(&self, kv: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.records).context("failed to serialize quiz history")?;
        kv.set(HISTORY_KEY, &json)
            .context("failed to write quiz history")
    }

    /// Prepend a record, dropping the oldest past the limit.
    pub fn push(&mut self, record: QuizRecord) {
        self.records.insert(0, record);
        self.records.truncate(self.limit);
    }

    /// Build a record from `result` and prepend it.
    ///
    /// The record is returned even when a limit of zero keeps nothing.
    pub fn record(&mut self, result: &QuizResult, duration: Duration) -> QuizRecord {
        let record = QuizRecord::from_result(result, duration);
        self.push(record.clone());
        record
    }

    pub fn records(&self) -> &[QuizRecord] {
        &self.records
    }

    pub(crate) fn replace(&mut self, records: Vec<QuizRecord>) {
        self.records = records;
        self.records.truncate(self.limit);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
