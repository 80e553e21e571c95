//! Database operations for storing created quizzes

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ImportError, Result};
use crate::importer::ImportResult;
use crate::questions::{OptionDraft, QuestionDraft, QuestionKind};

/// Quiz to be created from imported questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionDraft>,
    /// Minutes; `None` means untimed.
    pub time_limit: Option<u32>,
    /// Percentage of correct answers needed to pass.
    pub passing_score: Option<u8>,
}

impl NewQuiz {
    pub fn new(title: impl Into<String>, questions: Vec<QuestionDraft>) -> Self {
        Self {
            title: title.into(),
            description: None,
            questions,
            time_limit: None,
            passing_score: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ImportError::Rejected("quiz title is empty".to_string()));
        }
        if self.questions.is_empty() {
            return Err(ImportError::Rejected("quiz has no questions".to_string()));
        }
        if self.passing_score.is_some_and(|score| score > 100) {
            return Err(ImportError::Rejected("passing score must be between 0 and 100".to_string()));
        }
        if let Some(position) = self.questions.iter().position(|q| !q.is_valid()) {
            return Err(ImportError::Rejected(format!(
                "question {} needs at least 2 options and exactly one correct answer",
                position + 1
            )));
        }
        Ok(())
    }
}

/// A stored quiz with its questions in original order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time_limit: Option<u32>,
    pub passing_score: Option<u8>,
    pub created_at: String,
    pub questions: Vec<QuestionDraft>,
}

/// Quiz listing entry with question count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub question_count: i64,
    pub created_at: String,
}

/// Initialize database with schema
pub fn init_database(db_path: &str) -> SqliteResult<Connection> {
    let conn = Connection::open(db_path)?;
    create_schema(&conn)?;
    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS quizzes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            time_limit INTEGER,
            passing_score INTEGER,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quiz_id INTEGER NOT NULL REFERENCES quizzes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            kind TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS options (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            is_correct INTEGER NOT NULL
        );",
    )
}

/// Store a quiz and all its questions in one transaction, returning the quiz id
pub fn create_quiz(conn: &mut Connection, quiz: &NewQuiz) -> Result<i64> {
    quiz.validate()?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO quizzes (title, description, time_limit, passing_score, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            quiz.title.trim(),
            quiz.description,
            quiz.time_limit,
            quiz.passing_score,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    let quiz_id = tx.last_insert_rowid();

    for (position, question) in quiz.questions.iter().enumerate() {
        tx.execute(
            "INSERT INTO questions (quiz_id, position, text, kind) VALUES (?1, ?2, ?3, ?4)",
            params![quiz_id, position as i64, question.text, question.kind.as_str()],
        )?;
        let question_id = tx.last_insert_rowid();

        for (option_position, option) in question.options.iter().enumerate() {
            tx.execute(
                "INSERT INTO options (question_id, position, text, is_correct) VALUES (?1, ?2, ?3, ?4)",
                params![question_id, option_position as i64, option.text, option.is_correct as i32],
            )?;
        }
    }
    tx.commit()?;

    info!(quiz_id, questions = quiz.questions.len(), "quiz created");
    Ok(quiz_id)
}

/// Create a quiz from an import, refusing results that carry an error
pub fn create_quiz_from_import(
    conn: &mut Connection,
    title: &str,
    result: &ImportResult,
    description: Option<String>,
    time_limit: Option<u32>,
    passing_score: Option<u8>,
) -> Result<i64> {
    if let Some(error) = &result.error {
        return Err(ImportError::Rejected(error.clone()));
    }
    let quiz = NewQuiz {
        title: title.to_string(),
        description,
        questions: result.questions.clone(),
        time_limit,
        passing_score,
    };
    create_quiz(conn, &quiz)
}

/// Get a quiz with its questions and options
pub fn get_quiz(conn: &Connection, quiz_id: i64) -> Result<Option<StoredQuiz>> {
    let quiz = conn
        .query_row(
            "SELECT id, title, description, time_limit, passing_score, created_at FROM quizzes WHERE id = ?1",
            params![quiz_id],
            |row| {
                Ok(StoredQuiz {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    time_limit: row.get(3)?,
                    passing_score: row.get(4)?,
                    created_at: row.get(5)?,
                    questions: Vec::new(),
                })
            },
        )
        .optional()?;

    let Some(mut quiz) = quiz else {
        return Ok(None);
    };

    let mut question_stmt =
        conn.prepare("SELECT id, text, kind FROM questions WHERE quiz_id = ?1 ORDER BY position")?;
    let rows = question_stmt
        .query_map(params![quiz_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;

    let mut option_stmt =
        conn.prepare("SELECT text, is_correct FROM options WHERE question_id = ?1 ORDER BY position")?;
    for (question_id, text, kind) in rows {
        let kind = QuestionKind::parse(&kind)
            .ok_or_else(|| ImportError::Database(format!("unknown question kind: {}", kind)))?;
        let options = option_stmt
            .query_map(params![question_id], |row| {
                Ok(OptionDraft {
                    text: row.get(0)?,
                    is_correct: row.get::<_, i32>(1)? != 0,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        quiz.questions.push(QuestionDraft { text, options, kind });
    }

    Ok(Some(quiz))
}

/// List quizzes, newest first
pub fn list_quizzes(conn: &Connection) -> SqliteResult<Vec<QuizSummary>> {
    let mut stmt = conn.prepare(
        "SELECT q.id, q.title, COUNT(qs.id), q.created_at
         FROM quizzes q
         LEFT JOIN questions qs ON qs.quiz_id = q.id
         GROUP BY q.id
         ORDER BY q.id DESC",
    )?;

    let quizzes = stmt
        .query_map([], |row| {
            Ok(QuizSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                question_count: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(quizzes)
}

/// Delete a quiz together with its questions and options
pub fn delete_quiz(conn: &Connection, quiz_id: i64) -> SqliteResult<bool> {
    conn.execute(
        "DELETE FROM options WHERE question_id IN (SELECT id FROM questions WHERE quiz_id = ?1)",
        params![quiz_id],
    )?;
    conn.execute("DELETE FROM questions WHERE quiz_id = ?1", params![quiz_id])?;
    let deleted = conn.execute("DELETE FROM quizzes WHERE id = ?1", params![quiz_id])?;
    Ok(deleted > 0)
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "init_database")]
pub fn py_init_database(db_path: &str) -> PyResult<()> {
    init_database(db_path)
        .map(|_| ())
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "create_quiz", signature = (db_path, title, questions_json, description=None, time_limit=None, passing_score=None))]
pub fn py_create_quiz(
    db_path: &str,
    title: &str,
    questions_json: &str,
    description: Option<String>,
    time_limit: Option<u32>,
    passing_score: Option<u8>,
) -> PyResult<i64> {
    let questions: Vec<QuestionDraft> = serde_json::from_str(questions_json).map_err(ImportError::from)?;
    let mut conn = init_database(db_path).map_err(ImportError::from)?;
    let quiz = NewQuiz {
        title: title.to_string(),
        description,
        questions,
        time_limit,
        passing_score,
    };
    Ok(create_quiz(&mut conn, &quiz)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "list_quizzes")]
pub fn py_list_quizzes(db_path: &str) -> PyResult<String> {
    let conn = init_database(db_path).map_err(ImportError::from)?;
    let quizzes = list_quizzes(&conn).map_err(ImportError::from)?;
    Ok(serde_json::to_string(&quizzes).map_err(ImportError::from)?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "delete_quiz")]
pub fn py_delete_quiz(db_path: &str, quiz_id: i64) -> PyResult<bool> {
    let conn = init_database(db_path).map_err(ImportError::from)?;
    Ok(delete_quiz(&conn, quiz_id).map_err(ImportError::from)?)
}
