use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use reqwest::Client;

use quiz_core::model::{Question, QuestionDraft, Subject};

use crate::error::SourceError;

/// External origin of question collections, one fetch per subject.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch and validate the question collection for one subject.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the collection cannot be fetched or any
    /// record fails validation.
    async fn fetch(&self, subject: Subject) -> Result<Vec<Question>, SourceError>;
}

/// Fetches `{base_url}/{subject}.json` files over HTTP.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self, subject: Subject) -> Result<Vec<Question>, SourceError> {
        let url = format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            subject.slug()
        );

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                subject: subject.name(),
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let drafts: Vec<QuestionDraft> = serde_json::from_str(&body)?;

        let mut questions = Vec::with_capacity(drafts.len());
        for draft in drafts {
            questions.push(draft.validate()?);
        }
        Ok(questions)
    }
}

/// In-memory source for tests; subjects without seeded questions yield an
/// empty collection, and individual subjects can be made to fail to exercise
/// the all-or-nothing load.
#[derive(Clone, Default)]
pub struct StaticQuestionSource {
    by_subject: BTreeMap<Subject, Vec<Question>>,
    failing: BTreeSet<Subject>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(mut self, subject: Subject, questions: Vec<Question>) -> Self {
        self.by_subject.insert(subject, questions);
        self
    }

    #[must_use]
    pub fn with_failure(mut self, subject: Subject) -> Self {
        self.failing.insert(subject);
        self
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch(&self, subject: Subject) -> Result<Vec<Question>, SourceError> {
        if self.failing.contains(&subject) {
            return Err(SourceError::Unavailable {
                subject: subject.name(),
            });
        }
        Ok(self.by_subject.get(&subject).cloned().unwrap_or_default())
    }
}
