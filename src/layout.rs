//! Row layout resolution.
//!
//! A row is either index-terminated (`question, options..., correct_index`)
//! or answer-first (`question, correct, distractors...`). Which one is
//! decided by whether the trailing field is a valid in-range option index.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLayout {
    /// Options in their final order; `correct_index` points into `options`.
    IndexTerminated {
        question: String,
        options: Vec<String>,
        correct_index: usize,
    },
    /// Correct answer first, to be shuffled together with the distractors.
    AnswerFirst {
        question: String,
        correct: String,
        distractors: Vec<String>,
    },
}

/// Why a row did not become a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields,
    EmptyQuestion,
    EmptyCorrectAnswer,
    TooFewOptions,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields => write!(f, "row has fewer than 2 fields"),
            SkipReason::EmptyQuestion => write!(f, "question text is empty"),
            SkipReason::EmptyCorrectAnswer => write!(f, "correct answer is empty"),
            SkipReason::TooFewOptions => write!(f, "fewer than 2 non-empty options"),
        }
    }
}

/// Decide the layout of one tokenized data row
pub fn resolve_row(mut fields: Vec<String>) -> Result<RowLayout, SkipReason> {
    if fields.len() < 2 {
        return Err(SkipReason::TooFewFields);
    }
    if fields[0].trim().is_empty() {
        return Err(SkipReason::EmptyQuestion);
    }

    let candidate_count = fields.len() - 2;
    let trailing_index = fields
        .last()
        .and_then(|last| last.trim().parse::<usize>().ok())
        .filter(|&index| index < candidate_count);

    let mut rest = fields.split_off(1);
    let question = fields.swap_remove(0).trim().to_string();

    match trailing_index {
        Some(correct_index) => {
            rest.pop();
            Ok(RowLayout::IndexTerminated {
                question,
                options: rest,
                correct_index,
            })
        }
        None => {
            let distractors = rest.split_off(1);
            let correct = rest.swap_remove(0);
            Ok(RowLayout::AnswerFirst {
                question,
                correct,
                distractors,
            })
        }
    }
}
