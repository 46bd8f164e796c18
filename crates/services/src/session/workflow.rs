use std::sync::Arc;

use log::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::{QuizMode, ResultSummary, SubjectFilter};
use storage::repository::ResultStore;

use super::service::{AnswerOutcome, QuizSession};
use super::timer::Tick;
use super::view::ResultListItem;
use crate::auth::PrincipalProvider;
use crate::bank::QuestionBank;
use crate::error::SessionError;

/// User-chosen settings for one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub filter: SubjectFilter,
    pub requested: usize,
    pub mode: QuizMode,
    /// Countdown budget; only meaningful in exam mode.
    pub duration_minutes: u32,
}

/// Result of committing an answer through the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceResult {
    pub outcome: AnswerOutcome,
    /// Present exactly when this answer completed the session.
    pub summary: Option<ResultSummary>,
}

/// Result of delivering a countdown tick through the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    pub tick: Tick,
    /// Present exactly when this tick expired the countdown.
    pub summary: Option<ResultSummary>,
}

/// Orchestrates session start, answering, the countdown, and result
/// persistence.
///
/// The workflow owns the collaborator seams: the loaded question bank, the
/// identity provider, and the result store. Session state itself stays in
/// the [`QuizSession`] value handed back to the caller.
#[derive(Clone)]
pub struct QuizWorkflow {
    clock: Clock,
    bank: QuestionBank,
    principals: Arc<dyn PrincipalProvider>,
    results: Arc<dyn ResultStore>,
}

impl QuizWorkflow {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: QuestionBank,
        principals: Arc<dyn PrincipalProvider>,
        results: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            clock,
            bank,
            principals,
            results,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a new session with the given settings.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` when no principal is present,
    /// `SessionError::EmptyPool` when the chosen subject has no questions.
    pub fn start_session(&self, config: QuizConfig) -> Result<QuizSession, SessionError> {
        if self.principals.current().is_none() {
            return Err(SessionError::NotSignedIn);
        }

        QuizSession::start(
            self.bank.pool(config.filter),
            config.requested,
            config.mode,
            config.duration_minutes,
            self.clock.now(),
        )
    }

    /// Commit the staged answer and, when that finishes the session, build
    /// and persist the summary.
    ///
    /// # Errors
    ///
    /// Returns the session's own errors (`NoSelection`, `AlreadyFinished`,
    /// …). Persistence failures are logged, never returned: the completion
    /// and review flow must not depend on the durability of the write.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceResult, SessionError> {
        let outcome = session.advance(self.clock.now())?;
        let summary = if outcome.is_complete {
            Some(self.finalize(session).await?)
        } else {
            None
        };
        Ok(AdvanceResult { outcome, summary })
    }

    /// Deliver one countdown tick and, when it expires the session, build
    /// and persist the summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if aggregation fails; persistence
    /// failures are logged, never returned.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<TickResult, SessionError> {
        let tick = session.tick(self.clock.now());
        let summary = if tick == Tick::Expired {
            Some(self.finalize(session).await?)
        } else {
            None
        };
        Ok(TickResult { tick, summary })
    }

    /// Build the summary and hand it to the result store, fire-and-forget.
    ///
    /// The write happens at most once per session (guarded by the stored
    /// result id) and is skipped when the principal signed out mid-session.
    /// There is deliberately no retry path.
    async fn finalize(&self, session: &mut QuizSession) -> Result<ResultSummary, SessionError> {
        let summary = session.build_summary()?;

        if session.result_id().is_none() {
            if let Some(principal) = self.principals.current() {
                match self
                    .results
                    .append_result(&principal.id, &summary, self.clock.now())
                    .await
                {
                    Ok(id) => {
                        session.set_result_id(id);
                        debug!("persisted quiz result {id} for {}", principal.id);
                    }
                    Err(err) => {
                        warn!("failed to persist quiz result: {err}");
                    }
                }
            } else {
                warn!("quiz finished with no signed-in principal; result not persisted");
            }
        }

        Ok(summary)
    }

    /// All stored results for the signed-in principal, newest first.
    ///
    /// Ordering happens here on the client; the store makes no ordering
    /// promise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a principal, or
    /// `SessionError::Storage` when the query fails.
    pub async fn history(&self) -> Result<Vec<ResultListItem>, SessionError> {
        let principal = self
            .principals
            .current()
            .ok_or(SessionError::NotSignedIn)?;

        let mut rows = self.results.list_results(&principal.id).await?;
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        Ok(rows.iter().map(ResultListItem::from_stored).collect())
    }
}
