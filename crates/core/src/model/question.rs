use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// A single multiple-choice question.
///
/// Immutable once constructed; bank loading validates every record before it
/// becomes visible to session code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category: String,
    topic: Option<String>,
    prompt: String,
    options: Vec<String>,
    answer_index: usize,
    explanation: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, there are fewer than
    /// two options, or the answer index does not point at an option.
    pub fn new(
        category: impl Into<String>,
        topic: Option<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if answer_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: answer_index,
                len: options.len(),
            });
        }

        Ok(Self {
            category: category.into(),
            topic,
            prompt,
            options,
            answer_index,
            explanation,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// True when the given option index matches the correct answer.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.answer_index
    }
}

/// Unvalidated question record as it appears in the bank JSON files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub category: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into a domain [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for the same conditions as [`Question::new`].
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(
            self.category,
            self.topic,
            self.question,
            self.options,
            self.answer_index,
            self.explanation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn new_validates_option_count() {
        let err = Question::new("Maths", None, "2+2?", options(1), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn new_validates_answer_index() {
        let err = Question::new("Maths", None, "2+2?", options(4), 4, None).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 4, len: 4 });
    }

    #[test]
    fn new_rejects_blank_prompt() {
        let err = Question::new("Maths", None, "   ", options(2), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn draft_decodes_bank_json_shape() {
        let json = r#"{
            "category": "Maths",
            "topic": "fractions",
            "question": "What is 1/2 + 1/4?",
            "options": ["3/4", "1/4", "2/6", "1"],
            "answerIndex": 0,
            "explanation": "Use a common denominator of 4."
        }"#;

        let draft: QuestionDraft = serde_json::from_str(json).unwrap();
        let question = draft.validate().unwrap();

        assert_eq!(question.category(), "Maths");
        assert_eq!(question.topic(), Some("fractions"));
        assert!(question.is_correct(0));
        assert!(!question.is_correct(1));
    }

    #[test]
    fn draft_topic_and_explanation_default_to_absent() {
        let json = r#"{
            "category": "NVR",
            "question": "Which shape completes the series?",
            "options": ["a", "b", "c"],
            "answerIndex": 2
        }"#;

        let question = serde_json::from_str::<QuestionDraft>(json)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(question.topic(), None);
        assert_eq!(question.explanation(), None);
    }
}
