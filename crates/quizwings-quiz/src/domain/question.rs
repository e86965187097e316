//! The question model and grading rules.

use std::collections::BTreeSet;

use quizwings_core::delivery::QuestionPrompt;
use serde::{Deserialize, Serialize};

/// The two kinds of question a quiz can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Pick one or more options.
    MultipleChoice,
    /// Type the answer.
    FreeText,
}

/// The correct answer of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Indices of the correct options. Always non-empty and within range.
    Choices(BTreeSet<usize>),
    /// Expected text as the organizer wrote it. Compared through
    /// [`normalize_text`].
    Text(String),
}

/// A participant's reply to the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    /// Indices of the options the participant selected, in any order.
    Choices(Vec<usize>),
    /// Raw text typed by the participant.
    Text(String),
}

/// Outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The submission matches the answer key.
    Correct,
    /// It does not.
    Incorrect,
}

impl Verdict {
    /// Whether the verdict awards a point.
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Result of [`Question::grade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// The submission was graded.
    Graded(Verdict),
    /// The submission is of the wrong kind for this question and was not graded.
    KindMismatch,
}

/// Errors raised while building a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyPrompt,
    #[error("multiple-choice question has no options")]
    NoOptions,
    #[error("multiple-choice question has no correct option")]
    NoCorrectOption,
    #[error("correct option {index} is out of range for {options} options")]
    CorrectOutOfRange { index: usize, options: usize },
    #[error("free-text question has an empty expected answer")]
    EmptyExpectedText,
}

/// Immutable description of one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    key: AnswerKey,
}

impl Question {
    /// Build a multiple-choice question.
    ///
    /// Duplicate correct indices collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are no options,
    /// the correct set is empty, or an index does not name an option.
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl IntoIterator<Item = usize>,
    ) -> Result<Self, QuestionError> {
        let prompt = non_blank(prompt.into())?;
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let correct: BTreeSet<usize> = correct.into_iter().collect();
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectOption);
        }
        if let Some(&index) = correct.iter().find(|&&index| index >= options.len()) {
            return Err(QuestionError::CorrectOutOfRange {
                index,
                options: options.len(),
            });
        }
        Ok(Self {
            prompt,
            options,
            key: AnswerKey::Choices(correct),
        })
    }

    /// Build a free-text question. The expected answer is kept as written.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or the expected answer is blank.
    pub fn free_text(
        prompt: impl Into<String>,
        expected: impl AsRef<str>,
    ) -> Result<Self, QuestionError> {
        let prompt = non_blank(prompt.into())?;
        let expected = expected.as_ref();
        if normalize_text(expected).is_empty() {
            return Err(QuestionError::EmptyExpectedText);
        }
        Ok(Self {
            prompt,
            options: Vec::new(),
            key: AnswerKey::Text(expected.to_owned()),
        })
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self.key {
            AnswerKey::Choices(_) => QuestionKind::MultipleChoice,
            AnswerKey::Text(_) => QuestionKind::FreeText,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Option texts; empty for free-text questions.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    /// Grade a submission against the answer key.
    ///
    /// Multiple-choice requires the selected set to equal the correct set
    /// exactly; order and repeats are irrelevant and there is no partial
    /// credit. Free text is compared after trimming and case-folding.
    #[must_use]
    pub fn grade(&self, submission: &Submission) -> Grade {
        let correct = match (&self.key, submission) {
            (AnswerKey::Choices(expected), Submission::Choices(selected)) => {
                selected.iter().copied().collect::<BTreeSet<_>>() == *expected
            }
            (AnswerKey::Text(expected), Submission::Text(text)) => {
                normalize_text(text) == normalize_text(expected)
            }
            _ => return Grade::KindMismatch,
        };
        Grade::Graded(if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        })
    }

    /// Render a submission for the organizer: selected option texts joined
    /// by `"; "` (unknown indices are skipped), or the raw text.
    #[must_use]
    pub fn describe_submission(&self, submission: &Submission) -> String {
        match submission {
            Submission::Choices(selected) => selected
                .iter()
                .filter_map(|&index| self.options.get(index).map(String::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            Submission::Text(text) => text.clone(),
        }
    }

    /// The transport-facing view of this question, without the answer key.
    #[must_use]
    pub fn to_prompt(&self) -> QuestionPrompt {
        match self.kind() {
            QuestionKind::MultipleChoice => QuestionPrompt::MultipleChoice {
                prompt: self.prompt.clone(),
                options: self.options.clone(),
            },
            QuestionKind::FreeText => QuestionPrompt::FreeText {
                prompt: self.prompt.clone(),
            },
        }
    }
}

/// Trim surrounding whitespace and fold case.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

fn non_blank(prompt: String) -> Result<String, QuestionError> {
    if prompt.trim().is_empty() {
        Err(QuestionError::EmptyPrompt)
    } else {
        Ok(prompt)
    }
}
