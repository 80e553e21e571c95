//! Whole-document import: lines -> fields -> layouts -> question drafts

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ImportError;
use crate::layout::{resolve_row, SkipReason};
use crate::lines::{detect_delimiter, split_lines};
use crate::questions::{build_question, QuestionDraft};
use crate::tokenizer::tokenize_row;

/// A data row that did not produce a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Outcome of one import. `error` is set iff `questions` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub questions: Vec<QuestionDraft>,
    pub error: Option<String>,
    #[serde(skip)]
    skipped: Vec<SkippedRow>,
}

impl ImportResult {
    pub(crate) fn failed(error: ImportError, skipped: Vec<SkippedRow>) -> Self {
        Self {
            questions: Vec::new(),
            error: Some(error.to_string()),
            skipped,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Rows that were omitted, in document order
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Run already-tokenized data rows through layout resolution and building.
///
/// Each row carries its line number; the header must not be included.
pub fn import_rows<I, R>(rows: I, rng: &mut R) -> ImportResult
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
    R: Rng + ?Sized,
{
    let mut questions = Vec::new();
    let mut skipped = Vec::new();

    for (line_number, fields) in rows {
        match resolve_row(fields).and_then(|layout| build_question(layout, &mut *rng)) {
            Ok(question) => questions.push(question),
            Err(reason) => {
                debug!(line_number, %reason, "skipping row");
                skipped.push(SkippedRow { line_number, reason });
            }
        }
    }

    if questions.is_empty() {
        warn!(skipped = skipped.len(), "no usable questions in import");
        return ImportResult::failed(ImportError::NoQuestions, skipped);
    }

    info!(
        questions = questions.len(),
        skipped = skipped.len(),
        "import finished"
    );
    ImportResult {
        questions,
        error: None,
        skipped,
    }
}

/// Import a delimited-text document using the given random source
pub fn import_document<R: Rng + ?Sized>(text: &str, rng: &mut R) -> ImportResult {
    let lines = split_lines(text);
    let Some((header, data)) = lines.split_first().filter(|(_, data)| !data.is_empty()) else {
        warn!(lines = lines.len(), "document has no data rows");
        return ImportResult::failed(ImportError::MissingRows, Vec::new());
    };

    let delimiter = detect_delimiter(header.text);
    debug!(%delimiter, rows = data.len(), "tokenizing document");

    let rows = data
        .iter()
        .map(|line| (line.number, tokenize_row(line.text, delimiter)));
    import_rows(rows, rng)
}

/// Import a delimited-text document with the thread-local random source
pub fn import_questions(text: &str) -> ImportResult {
    import_document(text, &mut rand::thread_rng())
}

// ============= Python Binding =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "import_questions")]
pub fn py_import_questions(text: &str) -> PyResult<String> {
    Ok(import_questions(text).to_json()?)
}
