//! Write question drafts back out as an index-terminated delimited file

#[cfg(feature = "python")]
use pyo3::prelude::*;
use csv::{QuoteStyle, WriterBuilder};

use crate::error::{ImportError, Result};
use crate::questions::QuestionDraft;

/// Serialize questions as `question, options..., correct_index` rows.
///
/// Importing the output again yields the same questions in the same option
/// order. Questions holding a value the importer would change (empty,
/// surrounding whitespace, double quotes, line breaks) are refused.
pub fn export_questions(questions: &[QuestionDraft], delimiter: char) -> Result<String> {
    if delimiter != ',' && delimiter != ';' {
        return Err(ImportError::Csv(format!("unsupported delimiter: {:?}", delimiter)));
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    let widest = questions.iter().map(|q| q.options.len()).max().unwrap_or(2).max(2);
    let mut header = vec!["question".to_string()];
    header.extend((1..=widest).map(|i| format!("option {}", i)));
    header.push("correct".to_string());
    writer.write_record(&header)?;

    for (position, question) in questions.iter().enumerate() {
        let correct_index = question
            .options
            .iter()
            .position(|o| o.is_correct)
            .filter(|_| question.is_valid())
            .ok_or_else(|| {
                ImportError::Rejected(format!("question {} has no single correct option", position + 1))
            })?;

        if let Some(value) = std::iter::once(&question.text)
            .chain(question.options.iter().map(|o| &o.text))
            .find(|v| !survives_import(v))
        {
            return Err(ImportError::Rejected(format!(
                "question {} has a value that would not import unchanged: {:?}",
                position + 1,
                value
            )));
        }

        let mut record = Vec::with_capacity(question.options.len() + 2);
        record.push(question.text.clone());
        record.extend(question.options.iter().map(|o| o.text.clone()));
        record.push(correct_index.to_string());
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Io(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Serialization(e.to_string()))
}

/// The importer trims fields, drops empty options and never keeps quote characters
fn survives_import(value: &str) -> bool {
    !value.is_empty() && value.trim() == value && !value.contains(['"', '\r', '\n'])
}

// ============= Python Binding =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "export_questions", signature = (questions_json, delimiter=None))]
pub fn py_export_questions(questions_json: &str, delimiter: Option<char>) -> PyResult<String> {
    let questions: Vec<QuestionDraft> = serde_json::from_str(questions_json).map_err(ImportError::from)?;
    Ok(export_questions(&questions, delimiter.unwrap_or(','))?)
}
