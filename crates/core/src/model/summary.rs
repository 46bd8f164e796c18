use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bucket name used when a question carries no category.
///
/// Well-formed bank data always names a category; this keeps aggregation
/// total anyway.
pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("bucket {name:?} has correct ({correct}) > total ({total})")]
    BucketCountMismatch {
        name: String,
        correct: u32,
        total: u32,
    },

    #[error("bucket {name:?} is empty")]
    EmptyBucket { name: String },

    #[error("percentage {value} is out of range")]
    InvalidPercentage { value: u32 },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Quiz mode: `Exam` runs against a countdown, `Practice` is untimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizMode {
    Practice,
    Exam,
}

impl QuizMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::Practice => "practice",
            QuizMode::Exam => "exam",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for parsing a quiz mode from its persisted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    raw: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quiz mode: {}", self.raw)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for QuizMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practice" => Ok(QuizMode::Practice),
            "exam" => Ok(QuizMode::Exam),
            _ => Err(ParseModeError { raw: s.to_owned() }),
        }
    }
}

/// Outcome of one working-set position, as fed to the aggregator.
///
/// An unanswered position (truncated by timeout) contributes `correct: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub category: String,
    pub topic: Option<String>,
    pub correct: bool,
}

/// Correct/total/percentage counts for one subject or topic bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

impl BucketStats {
    fn accumulate(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    fn finalize(&mut self) {
        self.percentage = percentage(self.correct, self.total);
    }
}

/// `round(correct / total * 100)` with round-half-up, the same rule the
/// review screen shows. Zero totals never reach this (empty buckets are not
/// created).
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (f64::from(correct) / f64::from(total) * 100.0).round() as u32
    }
}

/// Immutable record of one completed session: overall score plus per-subject
/// and per-topic breakdowns.
///
/// Derived exactly once per completed session and handed both to the review
/// display and to the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    mode: QuizMode,
    total_questions: u32,
    score: u32,
    overall_percentage: u32,
    subjects: BTreeMap<String, BucketStats>,
    topics: BTreeMap<String, BTreeMap<String, BucketStats>>,
}

impl ResultSummary {
    /// Aggregate per-question outcomes into a summary.
    ///
    /// Buckets are keyed by category (falling back to [`OTHER_BUCKET`] for a
    /// blank category) and, when a topic is present, by (category, topic).
    /// A bucket exists iff it received at least one question.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::TooManyQuestions` if the outcome count cannot
    /// fit in `u32`.
    pub fn from_outcomes(
        mode: QuizMode,
        outcomes: &[QuestionOutcome],
    ) -> Result<Self, SummaryError> {
        let total_questions = u32::try_from(outcomes.len())
            .map_err(|_| SummaryError::TooManyQuestions { len: outcomes.len() })?;

        let mut score = 0_u32;
        let mut subjects: BTreeMap<String, BucketStats> = BTreeMap::new();
        let mut topics: BTreeMap<String, BTreeMap<String, BucketStats>> = BTreeMap::new();

        for outcome in outcomes {
            if outcome.correct {
                score = score.saturating_add(1);
            }

            let subject = if outcome.category.trim().is_empty() {
                OTHER_BUCKET.to_owned()
            } else {
                outcome.category.clone()
            };

            subjects
                .entry(subject.clone())
                .or_insert(BucketStats {
                    correct: 0,
                    total: 0,
                    percentage: 0,
                })
                .accumulate(outcome.correct);

            if let Some(topic) = &outcome.topic {
                topics
                    .entry(subject)
                    .or_default()
                    .entry(topic.clone())
                    .or_insert(BucketStats {
                        correct: 0,
                        total: 0,
                        percentage: 0,
                    })
                    .accumulate(outcome.correct);
            }
        }

        for stats in subjects.values_mut() {
            stats.finalize();
        }
        for by_topic in topics.values_mut() {
            for stats in by_topic.values_mut() {
                stats.finalize();
            }
        }

        Ok(Self {
            mode,
            total_questions,
            score,
            overall_percentage: percentage(score, total_questions),
            subjects,
            topics,
        })
    }

    /// Rehydrate a summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError` if counts do not align or a bucket is empty.
    pub fn from_persisted(
        mode: QuizMode,
        total_questions: u32,
        score: u32,
        overall_percentage: u32,
        subjects: BTreeMap<String, BucketStats>,
        topics: BTreeMap<String, BTreeMap<String, BucketStats>>,
    ) -> Result<Self, SummaryError> {
        if score > total_questions {
            return Err(SummaryError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        if overall_percentage > 100 {
            return Err(SummaryError::InvalidPercentage {
                value: overall_percentage,
            });
        }

        let subject_buckets = subjects.iter().map(|(name, stats)| (name, stats));
        let topic_buckets = topics
            .iter()
            .flat_map(|(_, by_topic)| by_topic.iter().map(|(name, stats)| (name, stats)));
        for (name, stats) in subject_buckets.chain(topic_buckets) {
            if stats.total == 0 {
                return Err(SummaryError::EmptyBucket { name: name.clone() });
            }
            if stats.correct > stats.total {
                return Err(SummaryError::BucketCountMismatch {
                    name: name.clone(),
                    correct: stats.correct,
                    total: stats.total,
                });
            }
        }

        Ok(Self {
            mode,
            total_questions,
            score,
            overall_percentage,
            subjects,
            topics,
        })
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn overall_percentage(&self) -> u32 {
        self.overall_percentage
    }

    /// Per-subject breakdown; a subject appears iff it contributed at least
    /// one question to the working set.
    #[must_use]
    pub fn subjects(&self) -> &BTreeMap<String, BucketStats> {
        &self.subjects
    }

    /// Per-topic breakdown, nested under the owning subject. Only questions
    /// that carry a topic contribute here.
    #[must_use]
    pub fn topics(&self) -> &BTreeMap<String, BTreeMap<String, BucketStats>> {
        &self.topics
    }
}
