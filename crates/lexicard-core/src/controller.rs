//! Command dispatcher tying the word store, quiz engine and repositories together.
//!
//! Front ends send [`Command`]s and render the returned [`Outcome`]s. Nothing
//! is written to storage until [`StudyController::save`] is called.

use std::time::Instant;

use anyhow::Context;

use crate::backup::{restore_backup, Backup, RestoredBackup};
use crate::config::LexicardConfig;
use crate::error::{LibraryError, QuizError, StudyError};
use crate::history::{QuizHistory, QuizRecord};
use crate::model::{QuizMode, WRONG_WORDS_CATEGORY};
use crate::quiz::{AnswerCheck, MarkOutcome, Question, QuizEngine, QuizResult, QuizStats};
use crate::repository::LibraryRepository;
use crate::settings::UserSettings;
use crate::store::{BatchReport, WordStore};
use crate::traits::KeyValueStore;

/// A user intent during a study session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartQuiz { category: String, mode: QuizMode },
    CheckAnswer(String),
    MarkAnswer(bool),
    NextQuestion,
    Finish,
    RestartWrongOnly,
    RestartAll,
    AddWrongToWrongWords,
}

/// What a [`Command`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Started { stats: QuizStats, question: Question },
    Checked(AnswerCheck),
    Marked(MarkOutcome),
    Advanced(Question),
    /// The session is over; a history record was added.
    Finished { result: QuizResult, record: QuizRecord },
    Restarted { stats: QuizStats, question: Question },
    Reset,
    WrongWordsAdded(BatchReport),
}

pub struct StudyController {
    kv: Box<dyn KeyValueStore>,
    store: WordStore,
    engine: QuizEngine,
    history: QuizHistory,
    settings: UserSettings,
    started_at: Option<Instant>,
    /// Record written by the last finish, returned again on a repeated finish.
    last_record: Option<QuizRecord>,
    default_mode: QuizMode,
    dirty_meta: bool,
}

impl StudyController {
    /// Load everything from `kv`.
    pub fn open(kv: Box<dyn KeyValueStore>, config: &LexicardConfig) -> anyhow::Result<Self> {
        let store = LibraryRepository::load(kv.as_ref());
        let history = QuizHistory::load(kv.as_ref(), config.history_limit)?;
        let settings = UserSettings::load(kv.as_ref(), config.quiz.default_mode)?;
        tracing::debug!(
            "opened {} store: {} categor(ies), {} quiz record(s)",
            kv.name(),
            store.library().len(),
            history.len()
        );
        Ok(Self {
            kv,
            store,
            engine: QuizEngine::new(config.quiz.engine_config()),
            history,
            settings,
            started_at: None,
            last_record: None,
            default_mode: config.quiz.default_mode,
            dirty_meta: false,
        })
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn history(&self) -> &QuizHistory {
        &self.history
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, StudyError> {
        tracing::debug!("dispatch {command:?}");
        match command {
            Command::StartQuiz { category, mode } => self.start_quiz(&category, mode),
            Command::CheckAnswer(answer) => {
                if answer.trim().is_empty() {
                    return Err(LibraryError::InvalidFormat("answer cannot be empty".into()).into());
                }
                Ok(Outcome::Checked(self.engine.check_answer(&answer)?))
            }
            Command::MarkAnswer(is_correct) => Ok(Outcome::Marked(self.engine.mark_answer(is_correct)?)),
            Command::NextQuestion => {
                if self.engine.next_question()? {
                    Ok(Outcome::Advanced(self.engine.current_question()?))
                } else {
                    self.finish()
                }
            }
            Command::Finish => self.finish(),
            Command::RestartWrongOnly => {
                let stats = self.engine.restart_with_wrong_words()?;
                self.started_at = Some(Instant::now());
                Ok(Outcome::Restarted {
                    stats,
                    question: self.engine.current_question()?,
                })
            }
            Command::RestartAll => {
                self.engine.reset_stats();
                self.started_at = None;
                Ok(Outcome::Reset)
            }
            Command::AddWrongToWrongWords => {
                let wrong = self.engine.wrong_words().to_vec();
                if wrong.is_empty() {
                    return Err(QuizError::EmptyWordSet.into());
                }
                Ok(Outcome::WrongWordsAdded(
                    self.store.add_words(WRONG_WORDS_CATEGORY, &wrong),
                ))
            }
        }
    }

    fn start_quiz(&mut self, category: &str, mode: QuizMode) -> Result<Outcome, StudyError> {
        let words = self.store.words_by_category(category).to_vec();
        if words.is_empty() {
            return Err(LibraryError::EmptyCategory(category.to_string()).into());
        }
        let stats = self.engine.start(words, mode)?;
        self.started_at = Some(Instant::now());
        self.settings.remember_quiz(category, mode);
        self.dirty_meta = true;
        Ok(Outcome::Started {
            stats,
            question: self.engine.current_question()?,
        })
    }

    fn finish(&mut self) -> Result<Outcome, StudyError> {
        let already_finished = self.engine.results().is_some();
        let result = self.engine.finish()?;
        if already_finished {
            if let Some(record) = &self.last_record {
                return Ok(Outcome::Finished {
                    result,
                    record: record.clone(),
                });
            }
        }

        let elapsed = self
            .started_at
            .take()
            .map(|t| t.elapsed())
            .unwrap_or_default();
        let record = self.history.record(&result, elapsed);
        self.last_record = Some(record.clone());
        self.dirty_meta = true;
        Ok(Outcome::Finished { result, record })
    }

    /// Whether anything changed since the last [`StudyController::save`].
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty() || self.dirty_meta
    }

    /// Persist the library, quiz history and settings.
    pub fn save(&mut self) -> anyhow::Result<()> {
        if self.store.is_dirty() {
            LibraryRepository::save(self.kv.as_mut(), &mut self.store)?;
        }
        if self.dirty_meta {
            self.history.save(self.kv.as_mut())?;
            self.settings.save(self.kv.as_mut())?;
            self.dirty_meta = false;
        }
        Ok(())
    }

    /// Pretty JSON of the whole application state.
    pub fn backup(&self) -> Result<String, LibraryError> {
        Backup::new(
            self.store.library(),
            Some(&self.settings),
            Some(self.history.records()),
        )
        .to_json()
    }

    /// Replace all data with the contents of a backup document and persist it.
    pub fn restore(&mut self, data: &str) -> Result<RestoredSummary, StudyError> {
        let RestoredBackup {
            store,
            settings,
            records,
            version,
            dropped,
        } = restore_backup(data)?;

        self.store = store;
        if let Some(settings) = settings {
            self.settings = settings;
        }
        if let Some(records) = records {
            self.history.replace(records);
        }
        self.engine.reset_stats();
        self.started_at = None;
        self.dirty_meta = true;
        self.save().context("failed to persist restored backup")?;

        Ok(RestoredSummary {
            version,
            categories: self.store.library().len(),
            words: self.store.library().total_words(),
            dropped,
        })
    }

    /// Wipe every stored key and reseed the library.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.store = LibraryRepository::reset_all(self.kv.as_mut())?;
        self.history = QuizHistory::new(self.history.limit());
        self.settings = UserSettings::with_mode(self.default_mode);
        self.engine.reset_stats();
        self.started_at = None;
        self.dirty_meta = false;
        tracing::info!("all data reset");
        Ok(())
    }
}

/// Summary returned by [`StudyController::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredSummary {
    pub version: String,
    pub categories: usize,
    pub words: usize,
    pub dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::WordEntry;
    use crate::quiz::QuizPhase;
    use crate::traits::MemoryStore;

    fn controller() -> StudyController {
        let mut config = LexicardConfig::default();
        config.quiz.shuffle = false;
        let mut c = StudyController::open(Box::new(MemoryStore::new()), &config).unwrap();
        for (w, zh) in [("cat", "猫"), ("dog", "狗")] {
            c.store_mut()
                .add_word("pets", &WordEntry::new(w, "n.", zh, format!("a {w}")))
                .unwrap();
        }
        c
    }

    fn start(c: &mut StudyController) -> Outcome {
        c.dispatch(Command::StartQuiz {
            category: "pets".into(),
            mode: QuizMode::EnToZh,
        })
        .unwrap()
    }

    #[test]
    fn full_session_records_history() {
        let mut c = controller();
        let Outcome::Started { stats, question } = start(&mut c) else {
            panic!("expected Started");
        };
        assert_eq!(stats.total, 2);
        assert_eq!(question.prompt, "cat");

        c.dispatch(Command::CheckAnswer("猫".into())).unwrap();
        let Outcome::Advanced(next) = c.dispatch(Command::NextQuestion).unwrap() else {
            panic!("expected Advanced");
        };
        assert_eq!(next.prompt, "dog");

        c.dispatch(Command::CheckAnswer("cat".into())).unwrap();
        let Outcome::Finished { result, record } = c.dispatch(Command::NextQuestion).unwrap() else {
            panic!("expected Finished");
        };
        assert_eq!(result.accuracy, 50);
        assert_eq!(record.total_words, 2);
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.settings().word_source, "pets");

        let Outcome::Finished { .. } = c.dispatch(Command::Finish).unwrap() else {
            panic!("expected Finished");
        };
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn zero_history_limit_still_finishes() {
        let mut config = LexicardConfig::default();
        config.quiz.shuffle = false;
        config.history_limit = 0;
        let mut c = StudyController::open(Box::new(MemoryStore::new()), &config).unwrap();
        c.store_mut()
            .add_word("pets", &WordEntry::new("cat", "n.", "猫", "a cat"))
            .unwrap();

        start(&mut c);
        c.dispatch(Command::MarkAnswer(true)).unwrap();
        let Outcome::Finished { result, record } = c.dispatch(Command::NextQuestion).unwrap() else {
            panic!("expected Finished");
        };
        assert_eq!(result.accuracy, 100);
        assert_eq!(record.total_words, 1);
        assert!(c.history().is_empty());

        let Outcome::Finished { record: again, .. } = c.dispatch(Command::Finish).unwrap() else {
            panic!("expected Finished");
        };
        assert_eq!(again.id, record.id);
        c.save().unwrap();
    }

    #[test]
    fn configured_mode_seeds_fresh_settings() {
        let mut config = LexicardConfig::default();
        config.quiz.default_mode = QuizMode::ZhToEn;
        let mut c = StudyController::open(Box::new(MemoryStore::new()), &config).unwrap();
        assert_eq!(c.settings().quiz_mode, QuizMode::ZhToEn);

        c.reset().unwrap();
        assert_eq!(c.settings().quiz_mode, QuizMode::ZhToEn);
    }

    #[test]
    fn blank_answer_is_rejected_before_the_engine() {
        let mut c = controller();
        start(&mut c);
        let err = c.dispatch(Command::CheckAnswer("   ".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(!c.engine().is_answer_checked());
    }

    #[test]
    fn starting_on_empty_category_fails() {
        let mut c = controller();
        for category in ["custom", "nope"] {
            let err = c
                .dispatch(Command::StartQuiz {
                    category: category.into(),
                    mode: QuizMode::EnToZh,
                })
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyCategory);
        }
        assert_eq!(c.engine().phase(), QuizPhase::Idle);
    }

    #[test]
    fn wrong_words_flow() {
        let mut c = controller();
        start(&mut c);
        assert_eq!(
            c.dispatch(Command::AddWrongToWrongWords).unwrap_err().kind(),
            ErrorKind::EmptyWordSet
        );

        c.dispatch(Command::MarkAnswer(false)).unwrap();
        c.dispatch(Command::NextQuestion).unwrap();
        c.dispatch(Command::MarkAnswer(true)).unwrap();
        c.dispatch(Command::NextQuestion).unwrap();

        let Outcome::WrongWordsAdded(report) = c.dispatch(Command::AddWrongToWrongWords).unwrap()
        else {
            panic!("expected WrongWordsAdded");
        };
        assert_eq!(report.added, 1);
        assert_eq!(c.store().words_by_category(WRONG_WORDS_CATEGORY)[0].word, "cat");

        let Outcome::Restarted { stats, question } = c.dispatch(Command::RestartWrongOnly).unwrap()
        else {
            panic!("expected Restarted");
        };
        assert_eq!(stats.total, 1);
        assert_eq!(question.prompt, "cat");

        assert_eq!(c.dispatch(Command::RestartAll).unwrap(), Outcome::Reset);
        assert_eq!(c.engine().phase(), QuizPhase::Idle);
    }

    #[test]
    fn next_before_check_fails() {
        let mut c = controller();
        start(&mut c);
        let err = c.dispatch(Command::NextQuestion).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AnswerNotChecked);
    }

    #[test]
    fn save_persists_everything() {
        let mut c = controller();
        start(&mut c);
        c.dispatch(Command::MarkAnswer(true)).unwrap();
        c.dispatch(Command::NextQuestion).unwrap();
        c.dispatch(Command::MarkAnswer(true)).unwrap();
        c.dispatch(Command::NextQuestion).unwrap();
        assert!(c.is_dirty());
        c.save().unwrap();
        assert!(!c.is_dirty());

        let kv = &c.kv;
        assert!(kv.get("wordLibrary").unwrap().unwrap().contains("pets"));
        assert!(kv.get("quizRecords").unwrap().unwrap().contains("\"accuracy\":100"));
        assert!(kv.get("userSettings").unwrap().unwrap().contains("\"wordSource\":\"pets\""));
    }

    #[test]
    fn backup_restore_and_reset() {
        let mut c = controller();
        let backup = c.backup().unwrap();

        c.store_mut().delete_category("pets").unwrap();
        let summary = c.restore(&backup).unwrap();
        assert_eq!(summary.version, "1.0.0");
        assert_eq!(summary.dropped, 0);
        assert_eq!(c.store().words_by_category("pets").len(), 2);

        c.reset().unwrap();
        assert!(!c.store().has_category("pets"));
        assert!(c.history().is_empty());
    }

    #[test]
    fn restore_rejects_incomplete_backup() {
        let mut c = controller();
        let err = c.restore(r#"{"wordLibrary": {}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(c.store().has_category("pets"));
    }
}
