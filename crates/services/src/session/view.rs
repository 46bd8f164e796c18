use chrono::{DateTime, Utc};

use quiz_core::model::QuizMode;
use storage::repository::StoredResult;

/// One row of the per-question review shown after a session ends.
///
/// `chosen` is absent for questions the timer cut off; those rows are never
/// correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub position: usize,
    pub category: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub chosen: Option<usize>,
    pub answer_index: usize,
    pub correct: bool,
    pub explanation: Option<String>,
}

impl ReviewItem {
    /// Display text of the option the user picked, if any.
    #[must_use]
    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Display text of the correct option.
    #[must_use]
    pub fn answer_text(&self) -> &str {
        self.options
            .get(self.answer_index)
            .map_or("", String::as_str)
    }
}

/// Presentation-agnostic list item for the result history screen.
///
/// No pre-formatted strings and no localization assumptions; the UI formats
/// timestamps as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub mode: QuizMode,
    pub total_questions: u32,
    pub score: u32,
    pub overall_percentage: u32,
}

impl ResultListItem {
    #[must_use]
    pub fn from_stored(row: &StoredResult) -> Self {
        Self {
            id: row.id,
            recorded_at: row.recorded_at,
            mode: row.summary.mode(),
            total_questions: row.summary.total_questions(),
            score: row.summary.score(),
            overall_percentage: row.summary.overall_percentage(),
        }
    }
}
