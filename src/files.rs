//! File input for question import (delimited text and spreadsheets)

use calamine::{open_workbook_auto, Data, Range, Reader};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::importer::{import_document, import_rows, ImportResult};

/// Read a delimited text file, refusing anything above the configured size
pub fn read_document(path: &Path, config: &ImportConfig) -> Result<String> {
    check_size(path, config)?;
    let text = fs::read_to_string(path)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn check_size(path: &Path, config: &ImportConfig) -> Result<()> {
    let size = fs::metadata(path)?.len();
    if size > config.max_document_bytes {
        warn!(path = %path.display(), size, limit = config.max_document_bytes, "file rejected");
        return Err(ImportError::DocumentTooLarge {
            size,
            limit: config.max_document_bytes,
        });
    }
    Ok(())
}

/// Import questions from a file, dispatching on its extension.
///
/// Read failures are returned as errors; parse problems are reported in the
/// returned `ImportResult`.
pub fn import_file<R: Rng + ?Sized>(path: &Path, config: &ImportConfig, rng: &mut R) -> Result<ImportResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => {
            let text = read_document(path, config)?;
            Ok(import_document(&text, rng))
        }
        "xlsx" | "xls" | "xlsm" | "ods" => {
            check_size(path, config)?;
            let rows = read_sheet_rows(path)?;
            if rows.is_empty() {
                warn!(path = %path.display(), "worksheet has no data rows");
                return Ok(ImportResult::failed(ImportError::MissingRows, Vec::new()));
            }
            Ok(import_rows(rows, rng))
        }
        _ => Err(ImportError::UnsupportedFormat(extension)),
    }
}

/// Data rows of the first worksheet
fn read_sheet_rows(path: &Path) -> Result<Vec<(usize, Vec<String>)>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Excel("no sheets found in workbook".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    debug!(sheet = %sheet_name, rows = range.height(), "reading worksheet");
    Ok(sheet_rows(&range))
}

/// Non-blank rows after the header, numbered like logical lines (header = 1)
fn sheet_rows(range: &Range<Data>) -> Vec<(usize, Vec<String>)> {
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| trim_trailing_empty(row.iter().map(get_cell_string).collect()))
        .filter(|fields| !fields.is_empty())
        .collect();

    rows.into_iter()
        .enumerate()
        .skip(1)
        .map(|(i, fields)| (i + 1, fields))
        .collect()
}

/// Spreadsheet ranges are rectangular; drop the padding cells on the right
fn trim_trailing_empty(mut fields: Vec<String>) -> Vec<String> {
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Helper to extract string from a spreadsheet cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

/// Default quiz title from an uploaded file name
pub fn default_title(file_name: &str, config: &ImportConfig) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let title = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        config.fallback_title.clone()
    } else {
        title
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "import_file", signature = (file_path, max_bytes=None))]
pub fn py_import_file(file_path: &str, max_bytes: Option<u64>) -> PyResult<String> {
    let mut config = ImportConfig::default();
    if let Some(limit) = max_bytes {
        config = config.with_max_document_bytes(limit);
    }
    let result = import_file(Path::new(file_path), &config, &mut rand::thread_rng())?;
    Ok(result.to_json()?)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "default_title")]
pub fn py_default_title(file_name: &str) -> String {
    default_title(file_name, &ImportConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::SkippedRow;
    use crate::layout::SkipReason;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn imports_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "quiz.csv", b"question;a;b;i\r\nQ;A;B;1\r\n");
        let result = import_file(&path, &ImportConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.questions[0].correct_option().unwrap().text, "B");
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bom.txt", "\u{feff}q,a,b\nQ,A,B".as_bytes());
        let text = read_document(&path, &ImportConfig::default()).unwrap();
        assert!(text.starts_with("q,a,b"));
    }

    #[test]
    fn oversized_file_is_rejected_before_parsing() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.csv", b"q,a,b\nQ,A,B\n");
        let config = ImportConfig::default().with_max_document_bytes(4);
        let err = import_file(&path, &config, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ImportError::DocumentTooLarge { size: 12, limit: 4 });
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "latin1.csv", &[b'q', b',', 0xff, b'\n']);
        let err = read_document(&path, &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "quiz.pdf", b"q,a\n");
        let err = import_file(&path, &ImportConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ImportError::UnsupportedFormat("pdf".to_string()));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");
        let err = import_file(&path, &ImportConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    fn cell_xml(reference: &str, value: &str) -> String {
        if value.parse::<f64>().is_ok() {
            format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value)
        } else {
            format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, reference, value)
        }
    }

    /// Minimal single-sheet workbook; numeric-looking cells are stored as numbers
    fn write_xlsx(dir: &TempDir, name: &str, rows: &[&[&str]]) -> std::path::PathBuf {
        let mut sheet_data = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet_data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                let reference = format!("{}{}", (b'A' + c as u8) as char, r + 1);
                sheet_data.push_str(&cell_xml(&reference, value));
            }
            sheet_data.push_str("</row>");
        }

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Questions" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet_data
                ),
            ),
        ];

        let path = dir.path().join(name);
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (part, contents) in parts.iter() {
            zip.start_file(*part, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn imports_xlsx_rows_with_numeric_index_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(
            &dir,
            "quiz.xlsx",
            &[
                &["question", "a", "b", "correct"],
                &["Q", "A", "B", "1"],
                &["OnlyOneField"],
                &["Capital of Norway?", "Oslo", "Bergen", "Tromsø"],
            ],
        );
        let result = import_file(&path, &ImportConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.questions.len(), 2);

        let indexed = &result.questions[0];
        let order: Vec<&str> = indexed.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
        assert_eq!(indexed.correct_option().unwrap().text, "B");

        let answer_first = &result.questions[1];
        assert_eq!(answer_first.options.len(), 3);
        assert_eq!(answer_first.correct_option().unwrap().text, "Oslo");

        assert_eq!(
            result.skipped_rows(),
            &[SkippedRow {
                line_number: 3,
                reason: SkipReason::TooFewFields
            }]
        );
    }

    #[test]
    fn header_only_workbook_is_missing_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(&dir, "empty.xlsx", &[&["question", "answer"]]);
        let result = import_file(&path, &ImportConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(result.questions.is_empty());
        assert_eq!(result.error, Some(ImportError::MissingRows.to_string()));

        let text = import_document("question,answer", &mut StdRng::seed_from_u64(0));
        assert_eq!(result.error, text.error);
    }

    #[test]
    fn sheet_rows_skip_header_and_blank_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (4, 3));
        range.set_value((0, 0), Data::String("question".to_string()));
        range.set_value((0, 1), Data::String("a".to_string()));
        range.set_value((2, 0), Data::String(" Q ".to_string()));
        range.set_value((2, 1), Data::String("A".to_string()));
        range.set_value((2, 2), Data::String("B".to_string()));
        range.set_value((2, 3), Data::Float(1.0));
        range.set_value((4, 0), Data::String("R".to_string()));
        range.set_value((4, 1), Data::Int(7));

        let rows = sheet_rows(&range);
        assert_eq!(
            rows,
            vec![
                (2, vec!["Q".to_string(), "A".to_string(), "B".to_string(), "1".to_string()]),
                (3, vec!["R".to_string(), "7".to_string()]),
            ]
        );
    }

    #[test]
    fn padding_cells_are_trimmed() {
        let fields = vec!["Q".to_string(), "A".to_string(), String::new(), "B".to_string(), String::new(), String::new()];
        assert_eq!(trim_trailing_empty(fields), vec!["Q", "A", "", "B"]);
    }

    #[test]
    fn title_from_file_name() {
        let config = ImportConfig::default();
        assert_eq!(default_title("world_capitals-2024.csv", &config), "world capitals 2024");
        assert_eq!(default_title("/uploads/Math  quiz.xlsx", &config), "Math quiz");
        assert_eq!(default_title("___.csv", &config), "Imported quiz");
        assert_eq!(default_title("", &config), "Imported quiz");
    }
}
