use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionOutcome, QuizMode, ResultSummary};

use super::progress::SessionProgress;
use super::timer::{QuizTimer, Tick};
use super::view::ReviewItem;
use crate::error::SessionError;

/// How a session reached its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Every question was answered.
    Completed,
    /// The exam countdown ran out first.
    TimedOut,
}

/// Result of committing an answer for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub position: usize,
    pub selected: usize,
    pub correct: bool,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt: a fixed, shuffled working set stepped through position
/// by position.
///
/// The exam countdown lives inside the session, so restarting (building a new
/// session) structurally replaces the old timer; there is never a second
/// countdown able to terminate the current attempt.
pub struct QuizSession {
    working_set: Vec<Question>,
    mode: QuizMode,
    current: usize,
    pending: Option<usize>,
    answers: BTreeMap<usize, usize>,
    score: u32,
    timer: QuizTimer,
    started_at: DateTime<Utc>,
    finished: Option<(DateTime<Utc>, FinishReason)>,
    result_id: Option<i64>,
}

impl QuizSession {
    /// Start a session over the given pool.
    ///
    /// The pool is shuffled uniformly (Fisher–Yates) and truncated to
    /// `min(requested, pool.len())`: a bank smaller than requested clamps
    /// silently rather than refusing the session. Exam mode arms the
    /// countdown with `duration_minutes * 60` seconds; practice mode leaves
    /// it idle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when the pool has no questions and
    /// `SessionError::NothingRequested` when `requested` is zero. No session
    /// state exists in either case.
    pub fn start(
        pool: Vec<Question>,
        requested: usize,
        mode: QuizMode,
        duration_minutes: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        if requested == 0 {
            return Err(SessionError::NothingRequested);
        }

        let mut working_set = pool;
        working_set.shuffle(&mut rng());
        working_set.truncate(requested.min(working_set.len()));

        let mut timer = QuizTimer::idle();
        if mode == QuizMode::Exam {
            timer.arm(duration_minutes.saturating_mul(60));
        }

        Ok(Self {
            working_set,
            mode,
            current: 0,
            pending: None,
            answers: BTreeMap::new(),
            score: 0,
            timer,
            started_at,
            finished: None,
            result_id: None,
        })
    }

    //
    // ─── ACCESSORS ──────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished.map(|(at, _)| at)
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finished.map(|(_, reason)| reason)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Identifier assigned by the result store once the summary is persisted.
    #[must_use]
    pub fn result_id(&self) -> Option<i64> {
        self.result_id
    }

    pub(crate) fn set_result_id(&mut self, id: i64) {
        self.result_id = Some(id);
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.working_set.len()
    }

    /// The question at the current position, if the session is still going.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.working_set.get(self.current)
    }

    /// The staged option for the current question, if one was selected.
    #[must_use]
    pub fn pending_selection(&self) -> Option<usize> {
        self.pending
    }

    /// Committed answers keyed by working-set position. Unanswered positions
    /// are absent.
    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    /// Seconds left on the exam countdown; `None` for practice sessions and
    /// once the countdown is no longer running.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.timer.remaining_secs()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.working_set.len(),
            answered: self.answers.len(),
            remaining: self.working_set.len().saturating_sub(self.current),
            is_complete: self.is_finished(),
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        Ok(())
    }

    //
    // ─── STATE TRANSITIONS ──────────────────────────────────────────────────
    //

    /// Stage an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyFinished` on a finished session and
    /// `SessionError::OptionOutOfRange` for an index past the option list.
    pub fn select(&mut self, option_index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        let Some(question) = self.working_set.get(self.current) else {
            return Err(SessionError::AlreadyFinished);
        };
        let len = question.options().len();
        if option_index >= len {
            return Err(SessionError::OptionOutOfRange {
                index: option_index,
                len,
            });
        }
        self.pending = Some(option_index);
        Ok(())
    }

    /// Commit the staged selection and move to the next question.
    ///
    /// Advancing without a staged selection is rejected outright; skipping
    /// a question is not silently treated as "no answer".
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when nothing is staged (no state
    /// changes) and `SessionError::AlreadyFinished` on a finished session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AnswerOutcome, SessionError> {
        self.ensure_active()?;
        let selected = self.pending.ok_or(SessionError::NoSelection)?;
        let Some(question) = self.working_set.get(self.current) else {
            return Err(SessionError::AlreadyFinished);
        };

        let position = self.current;
        let correct = question.is_correct(selected);

        self.answers.insert(position, selected);
        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.pending = None;
        self.current += 1;

        if self.current == self.working_set.len() {
            self.finish(now, FinishReason::Completed);
        }

        Ok(AnswerOutcome {
            position,
            selected,
            correct,
            is_complete: self.is_finished(),
        })
    }

    /// Deliver one one-second tick to the exam countdown.
    ///
    /// On expiry the session terminates exactly once with
    /// [`FinishReason::TimedOut`]; any question not yet answered stays
    /// unanswered. Ticks on practice sessions, finished sessions, or after
    /// expiry are inert.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let tick = self.timer.tick();
        if tick == Tick::Expired {
            self.finish(now, FinishReason::TimedOut);
        }
        tick
    }

    fn finish(&mut self, now: DateTime<Utc>, reason: FinishReason) {
        if self.finished.is_none() {
            self.finished = Some((now, reason));
            self.timer.stop();
            self.pending = None;
        }
    }

    //
    // ─── DERIVED VIEWS ──────────────────────────────────────────────────────
    //

    /// Aggregate the finished session into a [`ResultSummary`].
    ///
    /// Every working-set position contributes; positions truncated by a
    /// timeout count as incorrect. The output is deterministic given the
    /// final answers map.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` while the session is in progress.
    pub fn build_summary(&self) -> Result<ResultSummary, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }

        let outcomes: Vec<QuestionOutcome> = self
            .working_set
            .iter()
            .enumerate()
            .map(|(i, question)| QuestionOutcome {
                category: question.category().to_owned(),
                topic: question.topic().map(str::to_owned),
                correct: self
                    .answers
                    .get(&i)
                    .is_some_and(|selected| question.is_correct(*selected)),
            })
            .collect();

        Ok(ResultSummary::from_outcomes(self.mode, &outcomes)?)
    }

    /// Per-question review rows for the result screen, in working-set order.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.working_set
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let chosen = self.answers.get(&i).copied();
                ReviewItem {
                    position: i,
                    category: question.category().to_owned(),
                    prompt: question.prompt().to_owned(),
                    options: question.options().to_vec(),
                    chosen,
                    answer_index: question.answer_index(),
                    correct: chosen.is_some_and(|selected| question.is_correct(selected)),
                    explanation: question.explanation().map(str::to_owned),
                }
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn working_set(&self) -> &[Question] {
        &self.working_set
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions", &self.working_set.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("timer", &self.timer.state())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
