use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four question-bank subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    Maths,
    English,
    Verbal,
    Nvr,
}

impl Subject {
    /// All subjects in their fixed, stable order.
    ///
    /// Pool concatenation for [`SubjectFilter::All`] uses this order.
    pub const ALL: [Subject; 4] = [
        Subject::Maths,
        Subject::English,
        Subject::Verbal,
        Subject::Nvr,
    ];

    /// Lowercase slug used for question bank file names.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Subject::Maths => "maths",
            Subject::English => "english",
            Subject::Verbal => "verbal",
            Subject::Nvr => "nvr",
        }
    }

    /// Human-readable subject name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Maths => "Maths",
            Subject::English => "English",
            Subject::Verbal => "Verbal",
            Subject::Nvr => "NVR",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for parsing a subject or filter from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSubjectError {
    raw: String,
}

impl fmt::Display for ParseSubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized subject: {}", self.raw)
    }
}

impl std::error::Error for ParseSubjectError {}

impl FromStr for Subject {
    type Err = ParseSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Maths" | "maths" => Ok(Subject::Maths),
            "English" | "english" => Ok(Subject::English),
            "Verbal" | "verbal" => Ok(Subject::Verbal),
            "NVR" | "nvr" => Ok(Subject::Nvr),
            _ => Err(ParseSubjectError { raw: s.to_owned() }),
        }
    }
}

/// Pool choice for a quiz session: one subject, or the union of all four.
///
/// These five values are the only recognized filters; anything else must be
/// rejected before reaching pool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectFilter {
    All,
    Only(Subject),
}

impl FromStr for SubjectFilter {
    type Err = ParseSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" | "all" => Ok(SubjectFilter::All),
            other => other.parse::<Subject>().map(SubjectFilter::Only),
        }
    }
}

impl fmt::Display for SubjectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectFilter::All => write!(f, "All"),
            SubjectFilter::Only(s) => write!(f, "{s}"),
        }
    }
}
