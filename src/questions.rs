//! Multiple-choice question drafts: building and answer shuffling

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layout::{RowLayout, SkipReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    #[default]
    MultipleChoice,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "MULTIPLE_CHOICE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MULTIPLE_CHOICE" => Some(QuestionKind::MultipleChoice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDraft {
    pub text: String,
    pub is_correct: bool,
}

impl OptionDraft {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<OptionDraft>,
    #[serde(default)]
    pub kind: QuestionKind,
}

impl QuestionDraft {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }

    pub fn correct_option(&self) -> Option<&OptionDraft> {
        self.options.iter().find(|o| o.is_correct)
    }

    /// At least 2 options and exactly one of them flagged correct
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.options.len() >= 2 && self.correct_count() == 1
    }
}

/// Shuffle an option pool whose first element is the correct answer.
///
/// Only the first occurrence of the correct text is flagged after the
/// shuffle; any duplicate of it stays unflagged.
pub fn shuffle_answers<R: Rng + ?Sized>(mut options: Vec<String>, rng: &mut R) -> Vec<OptionDraft> {
    let correct = match options.first() {
        Some(first) => first.clone(),
        None => return Vec::new(),
    };

    options.shuffle(rng);

    let correct_index = options.iter().position(|o| *o == correct);
    options
        .into_iter()
        .enumerate()
        .map(|(i, text)| OptionDraft {
            text,
            is_correct: Some(i) == correct_index,
        })
        .collect()
}

/// Turn a resolved row into a question draft.
///
/// Index-terminated rows keep their option order; answer-first rows are
/// shuffled. Empty options are dropped before the count check.
pub fn build_question<R: Rng + ?Sized>(layout: RowLayout, rng: &mut R) -> Result<QuestionDraft, SkipReason> {
    let (text, options) = match layout {
        RowLayout::IndexTerminated {
            question,
            options,
            correct_index,
        } => {
            let options: Vec<OptionDraft> = options
                .into_iter()
                .enumerate()
                .map(|(i, text)| OptionDraft::new(text, i == correct_index))
                .filter(|o| !o.text.is_empty())
                .collect();
            if !options.iter().any(|o| o.is_correct) {
                return Err(SkipReason::EmptyCorrectAnswer);
            }
            (question, options)
        }
        RowLayout::AnswerFirst {
            question,
            correct,
            distractors,
        } => {
            if correct.is_empty() {
                return Err(SkipReason::EmptyCorrectAnswer);
            }
            let mut pool = Vec::with_capacity(distractors.len() + 1);
            pool.push(correct);
            pool.extend(distractors.into_iter().filter(|d| !d.is_empty()));
            if pool.len() < 2 {
                return Err(SkipReason::TooFewOptions);
            }
            (question, shuffle_answers(pool, rng))
        }
    };

    if options.len() < 2 {
        return Err(SkipReason::TooFewOptions);
    }

    Ok(QuestionDraft {
        text,
        options,
        kind: QuestionKind::MultipleChoice,
    })
}
