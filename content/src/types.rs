use std::fmt;

/// What flavour of session is running. Drives prompt style and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Flashcard,
    Interview,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentKind::Flashcard => "flashcard",
            ContentKind::Interview => "interview",
        };
        f.write_str(s)
    }
}

const PLACEHOLDER_QUESTION: &str =
    "Unable to generate a question right now. The next one will follow shortly.";

/// One generated question, optionally with its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub question: String,
    pub answer: Option<String>,
}

impl ContentUnit {
    pub fn new(question: impl Into<String>, answer: Option<String>) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }

    pub fn question(question: impl Into<String>) -> Self {
        Self::new(question, None)
    }

    /// Synthetic unit delivered when generation keeps failing.
    pub fn placeholder() -> Self {
        Self::question(PLACEHOLDER_QUESTION)
    }

    pub fn is_placeholder(&self) -> bool {
        self.answer.is_none() && self.question == PLACEHOLDER_QUESTION
    }
}
