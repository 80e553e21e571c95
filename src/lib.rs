//! Quiz Importer - turns delimited question tables into multiple-choice drafts
//!
//! Provides line splitting, quote-aware tokenizing, row layout resolution,
//! answer shuffling, file input, CSV export, and SQLite quiz storage.

mod config;
mod db;
mod error;
mod export;
mod files;
mod importer;
mod layout;
mod lines;
mod questions;
mod tokenizer;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use config::ImportConfig;
pub use db::{create_quiz, create_quiz_from_import, create_schema, delete_quiz, get_quiz, init_database, list_quizzes, NewQuiz, QuizSummary, StoredQuiz};
pub use error::{ImportError, Result};
pub use export::export_questions;
pub use files::{default_title, import_file, read_document};
pub use importer::{import_document, import_questions, import_rows, ImportResult, SkippedRow};
pub use layout::{resolve_row, RowLayout, SkipReason};
pub use lines::{detect_delimiter, split_lines, LogicalLine};
pub use questions::{build_question, shuffle_answers, OptionDraft, QuestionDraft, QuestionKind};
pub use tokenizer::tokenize_row;

/// Quiz Importer Python Module
#[cfg(feature = "python")]
#[pymodule]
fn quiz_importer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Import
    m.add_function(wrap_pyfunction!(importer::py_import_questions, m)?)?;
    m.add_function(wrap_pyfunction!(files::py_import_file, m)?)?;
    m.add_function(wrap_pyfunction!(files::py_default_title, m)?)?;

    // Export
    m.add_function(wrap_pyfunction!(export::py_export_questions, m)?)?;

    // Database functions
    m.add_function(wrap_pyfunction!(db::py_init_database, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_create_quiz, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_list_quizzes, m)?)?;
    m.add_function(wrap_pyfunction!(db::py_delete_quiz, m)?)?;

    Ok(())
}
