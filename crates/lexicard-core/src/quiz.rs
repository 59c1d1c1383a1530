//! Quiz session state machine.
//!
//! A [`QuizEngine`] moves through `Idle -> Active -> Finished`. While active it
//! serves one question at a time; every question must be evaluated, either by
//! [`QuizEngine::check_answer`] or by a manual [`QuizEngine::mark_answer`],
//! before [`QuizEngine::next_question`] moves on. At every point
//! `correct + incorrect == index + (evaluated ? 1 : 0)`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::QuizError;
use crate::model::{QuizMode, WordEntry};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Shuffle words when a session starts.
    pub shuffle: bool,
    /// Fixed RNG seed for reproducible order.
    pub seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
        }
    }
}

/// Whether a question asks for a translation or for a word from its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Translation,
    Definition,
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub kind: QuestionKind,
    pub prompt: String,
    pub expected_answer: String,
    pub part_of_speech: String,
    /// 1-based position within the session.
    pub number: usize,
    pub total: usize,
}

/// Outcome of [`QuizEngine::check_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// Outcome of [`QuizEngine::mark_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOutcome {
    pub word: WordEntry,
    pub is_correct: bool,
    /// The verdict this mark replaced, if the question was already evaluated.
    pub previous: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizStats {
    pub current: usize,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
}

/// Frozen summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Percentage, rounded to the nearest integer.
    pub accuracy: u32,
    pub correct_words: Vec<WordEntry>,
    pub incorrect_words: Vec<WordEntry>,
    pub mode: QuizMode,
    pub total_words: usize,
}

/// Public view of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Active,
    Finished,
}

#[derive(Debug, Clone)]
struct QuizSession {
    words: Vec<WordEntry>,
    mode: QuizMode,
    index: usize,
    verdict: Option<bool>,
    correct: Vec<WordEntry>,
    incorrect: Vec<WordEntry>,
}

impl QuizSession {
    fn new(words: Vec<WordEntry>, mode: QuizMode) -> Self {
        Self {
            words,
            mode,
            index: 0,
            verdict: None,
            correct: Vec::new(),
            incorrect: Vec::new(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.words.len()
    }

    fn current(&self) -> Result<&WordEntry, QuizError> {
        self.words.get(self.index).ok_or(QuizError::OutOfRange {
            index: self.index,
            total: self.words.len(),
        })
    }

    fn record(&mut self, word: WordEntry, is_correct: bool) {
        if is_correct {
            self.correct.push(word);
        } else {
            self.incorrect.push(word);
        }
        self.verdict = Some(is_correct);
    }

    fn stats(&self) -> QuizStats {
        let total = self.words.len();
        QuizStats {
            current: (self.index + 1).min(total),
            total,
            correct: self.correct.len(),
            incorrect: self.incorrect.len(),
        }
    }

    fn result(&self) -> QuizResult {
        let total = self.words.len();
        let accuracy = if total == 0 {
            0
        } else {
            (self.correct.len() as f64 / total as f64 * 100.0).round() as u32
        };
        QuizResult {
            correct_count: self.correct.len(),
            incorrect_count: self.incorrect.len(),
            accuracy,
            correct_words: self.correct.clone(),
            incorrect_words: self.incorrect.clone(),
            mode: self.mode,
            total_words: total,
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Active(QuizSession),
    Finished {
        session: QuizSession,
        result: QuizResult,
    },
}

/// Build the question for `entry` under `mode`.
fn question_for(entry: &WordEntry, mode: QuizMode, number: usize, total: usize) -> Question {
    let (kind, prompt, expected) = match mode {
        QuizMode::EnToZh => (QuestionKind::Translation, &entry.word, &entry.chinese),
        QuizMode::ZhToEn => (QuestionKind::Translation, &entry.chinese, &entry.word),
        QuizMode::EnDefinition => (QuestionKind::Definition, &entry.english, &entry.word),
    };
    Question {
        kind,
        prompt: prompt.clone(),
        expected_answer: expected.clone(),
        part_of_speech: entry.part_of_speech.clone(),
        number,
        total,
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Runs one quiz session at a time.
#[derive(Debug)]
pub struct QuizEngine {
    config: QuizConfig,
    rng: StdRng,
    state: State,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        match self.state {
            State::Idle => QuizPhase::Idle,
            State::Active(_) => QuizPhase::Active,
            State::Finished { .. } => QuizPhase::Finished,
        }
    }

    pub fn mode(&self) -> Option<QuizMode> {
        match &self.state {
            State::Idle => None,
            State::Active(s) | State::Finished { session: s, .. } => Some(s.mode),
        }
    }

    fn session(&self) -> Result<&QuizSession, QuizError> {
        match &self.state {
            State::Idle => Err(QuizError::NoActiveSession),
            State::Active(s) | State::Finished { session: s, .. } => Ok(s),
        }
    }

    fn active_mut(&mut self) -> Result<&mut QuizSession, QuizError> {
        match &mut self.state {
            State::Idle => Err(QuizError::NoActiveSession),
            State::Active(s) => Ok(s),
            State::Finished { session, .. } => Err(QuizError::OutOfRange {
                index: session.index,
                total: session.words.len(),
            }),
        }
    }

    /// Begin a new session, replacing any current one.
    pub fn start(&mut self, words: Vec<WordEntry>, mode: QuizMode) -> Result<QuizStats, QuizError> {
        if words.is_empty() {
            return Err(QuizError::EmptyWordSet);
        }
        let mut words = words;
        if self.config.shuffle {
            words.shuffle(&mut self.rng);
        }
        tracing::info!("quiz started: {} word(s), mode {mode}", words.len());
        let session = QuizSession::new(words, mode);
        let stats = session.stats();
        self.state = State::Active(session);
        Ok(stats)
    }

    pub fn current_question(&self) -> Result<Question, QuizError> {
        let session = self.session()?;
        let entry = session.current()?;
        Ok(question_for(
            entry,
            session.mode,
            session.index + 1,
            session.words.len(),
        ))
    }

    /// Evaluate `answer` against the current question.
    ///
    /// Comparison is exact after trimming and lowercasing both sides.
    pub fn check_answer(&mut self, answer: &str) -> Result<AnswerCheck, QuizError> {
        let session = self.active_mut()?;
        let entry = session.current()?.clone();
        if session.verdict.is_some() {
            return Err(QuizError::AlreadyChecked);
        }

        let question = question_for(&entry, session.mode, session.index + 1, session.words.len());
        let is_correct = normalize(answer) == normalize(&question.expected_answer);
        let explanation = format!(
            "{} ({}) {}: {}",
            entry.word, entry.part_of_speech, entry.chinese, entry.english
        );
        tracing::debug!("checked \"{}\": correct={is_correct}", entry.word);
        session.record(entry, is_correct);

        Ok(AnswerCheck {
            is_correct,
            correct_answer: question.expected_answer,
            explanation,
        })
    }

    /// Set the verdict for the current question by hand. The last verdict wins.
    pub fn mark_answer(&mut self, is_correct: bool) -> Result<MarkOutcome, QuizError> {
        let session = self.active_mut()?;
        let entry = session.current()?.clone();

        let previous = session.verdict.take();
        match previous {
            Some(true) => {
                session.correct.pop();
            }
            Some(false) => {
                session.incorrect.pop();
            }
            None => {}
        }
        session.record(entry.clone(), is_correct);

        tracing::debug!("marked \"{}\": correct={is_correct}", entry.word);
        Ok(MarkOutcome {
            word: entry,
            is_correct,
            previous,
        })
    }

    /// Advance past an evaluated question. Returns whether another question remains.
    pub fn next_question(&mut self) -> Result<bool, QuizError> {
        let session = self.active_mut()?;
        session.current()?;
        if session.verdict.is_none() {
            return Err(QuizError::AnswerNotChecked);
        }
        session.index += 1;
        session.verdict = None;
        Ok(!session.is_exhausted())
    }

    pub fn is_answer_checked(&self) -> bool {
        self.session().map_or(false, |s| s.verdict.is_some())
    }

    /// Progress counters. All zero while idle.
    pub fn stats(&self) -> QuizStats {
        self.session().map_or(
            QuizStats {
                current: 0,
                total: 0,
                correct: 0,
                incorrect: 0,
            },
            QuizSession::stats,
        )
    }

    /// Freeze the result of an exhausted session.
    ///
    /// Calling it again after finishing returns the same result.
    pub fn finish(&mut self) -> Result<QuizResult, QuizError> {
        let session = match &self.state {
            State::Idle => return Err(QuizError::NoActiveSession),
            State::Finished { result, .. } => return Ok(result.clone()),
            State::Active(session) => session,
        };
        if !session.is_exhausted() {
            return Err(QuizError::SessionInProgress {
                remaining: session.words.len() - session.index,
            });
        }

        let result = session.result();
        let session = session.clone();
        tracing::info!(
            "quiz finished: {}/{} correct ({}%)",
            result.correct_count,
            result.total_words,
            result.accuracy
        );
        self.state = State::Finished {
            session,
            result: result.clone(),
        };
        Ok(result)
    }

    /// The frozen result, once finished.
    pub fn results(&self) -> Option<&QuizResult> {
        match &self.state {
            State::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Words answered incorrectly so far in the current or finished session.
    pub fn wrong_words(&self) -> &[WordEntry] {
        match self.session() {
            Ok(session) => &session.incorrect,
            Err(_) => &[],
        }
    }

    /// Start a new session over exactly the incorrect words, in order, same mode.
    ///
    /// Fails without touching the current state when there are none.
    pub fn restart_with_wrong_words(&mut self) -> Result<QuizStats, QuizError> {
        let session = self.session()?;
        if session.incorrect.is_empty() {
            return Err(QuizError::EmptyWordSet);
        }
        let retry = QuizSession::new(session.incorrect.clone(), session.mode);
        let stats = retry.stats();
        tracing::info!("retrying {} wrong word(s)", retry.words.len());
        self.state = State::Active(retry);
        Ok(stats)
    }

    /// Drop any session and return to idle.
    pub fn reset_stats(&mut self) {
        self.state = State::Idle;
    }
}
