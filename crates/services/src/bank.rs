use std::collections::BTreeMap;

use quiz_core::model::{Question, Subject, SubjectFilter};

use crate::error::SourceError;
use crate::source::QuestionSource;

/// The loaded question repository: one collection per subject.
///
/// A bank only exists once all four subjects loaded successfully: the
/// "ready" gate is the constructor. Partial availability is not a state this
/// type can represent; a failed load keeps session start disabled.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    by_subject: BTreeMap<Subject, Vec<Question>>,
}

impl QuestionBank {
    /// Load all four subject collections from the source, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns the first `SourceError` encountered; no partially loaded bank
    /// is produced.
    pub async fn load(source: &dyn QuestionSource) -> Result<Self, SourceError> {
        let mut by_subject = BTreeMap::new();
        for subject in Subject::ALL {
            by_subject.insert(subject, source.fetch(subject).await?);
        }
        Ok(Self { by_subject })
    }

    /// Build a bank directly from per-subject collections (tests, seeds).
    /// Subjects missing from the map get an empty collection.
    #[must_use]
    pub fn from_questions(mut questions: BTreeMap<Subject, Vec<Question>>) -> Self {
        let by_subject = Subject::ALL
            .into_iter()
            .map(|subject| (subject, questions.remove(&subject).unwrap_or_default()))
            .collect();
        Self { by_subject }
    }

    /// Questions for a single subject.
    #[must_use]
    pub fn subject_pool(&self, subject: Subject) -> &[Question] {
        self.by_subject
            .get(&subject)
            .map_or(&[], Vec::as_slice)
    }

    /// Candidate pool for the given filter: one subject's collection, or the
    /// concatenation of all four in [`Subject::ALL`] order.
    ///
    /// The returned pool is owned; a session shuffles and truncates it
    /// without disturbing the bank.
    #[must_use]
    pub fn pool(&self, filter: SubjectFilter) -> Vec<Question> {
        match filter {
            SubjectFilter::Only(subject) => self.subject_pool(subject).to_vec(),
            SubjectFilter::All => Subject::ALL
                .into_iter()
                .flat_map(|subject| self.subject_pool(subject).iter().cloned())
                .collect(),
        }
    }

    /// Total question count across all subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_subject.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticQuestionSource;
    use quiz_core::model::QuestionError;

    fn question(category: &str, prompt: &str) -> Question {
        Question::new(
            category,
            None,
            prompt,
            vec!["a".into(), "b".into()],
            0,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn load_requires_all_four_subjects() {
        let source = StaticQuestionSource::new()
            .with_questions(Subject::Maths, vec![question("Maths", "m1")])
            .with_failure(Subject::Nvr);

        let err = QuestionBank::load(&source).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn loaded_bank_serves_pools() {
        let source = StaticQuestionSource::new()
            .with_questions(Subject::Maths, vec![question("Maths", "m1")])
            .with_questions(Subject::English, vec![question("English", "e1")]);

        let bank = QuestionBank::load(&source).await.unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.subject_pool(Subject::Maths).len(), 1);
        assert!(bank.subject_pool(Subject::Verbal).is_empty());
    }

    #[test]
    fn all_pool_concatenates_in_fixed_subject_order() {
        let mut questions = BTreeMap::new();
        questions.insert(Subject::Nvr, vec![question("NVR", "n1")]);
        questions.insert(Subject::Maths, vec![question("Maths", "m1")]);
        questions.insert(Subject::English, vec![question("English", "e1")]);
        let bank = QuestionBank::from_questions(questions);

        let pool = bank.pool(SubjectFilter::All);
        let categories: Vec<_> = pool.iter().map(Question::category).collect();
        assert_eq!(categories, vec!["Maths", "English", "NVR"]);
    }

    #[test]
    fn single_subject_pool_is_that_collection_only() {
        let mut questions = BTreeMap::new();
        questions.insert(
            Subject::Maths,
            vec![question("Maths", "m1"), question("Maths", "m2")],
        );
        questions.insert(Subject::English, vec![question("English", "e1")]);
        let bank = QuestionBank::from_questions(questions);

        let pool = bank.pool(SubjectFilter::Only(Subject::Maths));
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|q| q.category() == "Maths"));
    }

    #[test]
    fn question_validation_guards_the_bank() {
        let err =
            Question::new("Maths", None, "p", vec!["only".into()], 0, None).unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions { .. }));
    }
}
