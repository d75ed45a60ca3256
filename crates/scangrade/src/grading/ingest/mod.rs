mod keys;
mod matcher;
mod normalize;
mod observation;
mod parser;
mod record;

pub use keys::{area_subject_key, area_type_key, litho_key, primary_match_key};
pub use matcher::{link_responses, responses_by_national_id, AnswerKeyIndex, IdentityIndex};
pub use observation::{
    answer_key_observation, identifier_observation, response_observation, NO_IDENTIFIER_MATCH,
    NO_ISSUES,
};
pub use parser::{parse_identifier_line, parse_response_line, ParseDiagnostic};
pub use record::{
    AnswerKeySheet, Area, IdentifierSheet, MatchKeys, ResponseSheet, ANSWER_SLOTS, LITHO_DIGITS,
    NATIONAL_ID_DIGITS, ROOM_CODE_DIGITS,
};

pub(crate) use normalize::{normalize_text, strip_digits};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Errors reading scan files. Line-level problems are diagnostics, not
/// errors; this only covers the file itself being unreadable.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("error reading file {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file grouping tag plus the counters shown on the sources screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    pub imported_at: DateTime<Utc>,
    pub total_lines: usize,
    pub valid_rows: usize,
    pub error_count: usize,
}

/// Result of importing one scan file: parsed rows tagged with the source id,
/// the line diagnostics collected along the way, and the source summary.
#[derive(Debug)]
pub struct FileImport<T> {
    pub rows: Vec<T>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub summary: SourceSummary,
}

/// Result of a dual-file answer-key import.
#[derive(Debug)]
pub struct AnswerKeyImport {
    pub rows: Vec<AnswerKeySheet>,
    pub identification_diagnostics: Vec<ParseDiagnostic>,
    pub response_diagnostics: Vec<ParseDiagnostic>,
    pub summary: AnswerKeySourceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeySourceSummary {
    pub id: String,
    pub name: String,
    pub identification_name: String,
    pub imported_at: DateTime<Utc>,
    pub area: Area,
    pub valid_rows: usize,
    pub response_errors: usize,
    pub identification_errors: usize,
}

static SOURCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_source_id() -> String {
    let id = SOURCE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("src-{id:06}")
}

pub fn import_identifiers_path<P: AsRef<Path>>(
    path: P,
    imported_at: DateTime<Utc>,
) -> Result<FileImport<IdentifierSheet>, ImportError> {
    let name = display_name(path.as_ref());
    let file = open_file(path.as_ref(), &name)?;
    import_identifiers(file, &name, imported_at)
}

pub fn import_identifiers<R: Read>(
    reader: R,
    name: &str,
    imported_at: DateTime<Utc>,
) -> Result<FileImport<IdentifierSheet>, ImportError> {
    import_sheets(reader, name, imported_at, parse_identifier_line, |sheet, id| {
        sheet.source_id = id.to_string();
    })
}

pub fn import_responses_path<P: AsRef<Path>>(
    path: P,
    imported_at: DateTime<Utc>,
) -> Result<FileImport<ResponseSheet>, ImportError> {
    let name = display_name(path.as_ref());
    let file = open_file(path.as_ref(), &name)?;
    import_responses(file, &name, imported_at)
}

pub fn import_responses<R: Read>(
    reader: R,
    name: &str,
    imported_at: DateTime<Utc>,
) -> Result<FileImport<ResponseSheet>, ImportError> {
    import_sheets(reader, name, imported_at, parse_response_line, |sheet, id| {
        sheet.source_id = id.to_string();
    })
}

/// Builds answer keys for one area from an identification/response file
/// pair. Each response row inherits its form type from the matched
/// identification row (composite key first, litho fallback second).
pub fn import_answer_keys<I: Read, R: Read>(
    area: Area,
    identification: I,
    identification_name: &str,
    responses: R,
    responses_name: &str,
    imported_at: DateTime<Utc>,
) -> Result<AnswerKeyImport, ImportError> {
    let identification = import_identifiers(identification, identification_name, imported_at)?;
    let response = import_responses(responses, responses_name, imported_at)?;

    let index = IdentityIndex::build(&identification.rows);
    let source_id = next_source_id();

    let rows: Vec<AnswerKeySheet> = response
        .rows
        .iter()
        .map(|row| {
            let matched = index.resolve(row);
            let mut sheet = AnswerKeySheet {
                area,
                form_type: matched.map(|m| m.form_type.clone()).unwrap_or_default(),
                answers: row.answers.clone(),
                indicator: row.indicator.clone(),
                folio: row.folio.clone(),
                litho: row.litho.clone(),
                observation: String::new(),
                source_id: source_id.clone(),
            };
            let base = answer_key_observation(&sheet);
            sheet.observation = if matched.is_some() {
                base
            } else if base == NO_ISSUES {
                NO_IDENTIFIER_MATCH.to_string()
            } else {
                format!("{base} · {NO_IDENTIFIER_MATCH}")
            };
            sheet
        })
        .collect();

    let summary = AnswerKeySourceSummary {
        id: source_id,
        name: responses_name.to_string(),
        identification_name: identification_name.to_string(),
        imported_at,
        area,
        valid_rows: rows.len(),
        response_errors: response.diagnostics.len(),
        identification_errors: identification.diagnostics.len(),
    };

    Ok(AnswerKeyImport {
        rows,
        identification_diagnostics: identification.diagnostics,
        response_diagnostics: response.diagnostics,
        summary,
    })
}

pub fn import_answer_keys_path<P: AsRef<Path>>(
    area: Area,
    identification: P,
    responses: P,
    imported_at: DateTime<Utc>,
) -> Result<AnswerKeyImport, ImportError> {
    let identification_name = display_name(identification.as_ref());
    let responses_name = display_name(responses.as_ref());
    let identification_file = open_file(identification.as_ref(), &identification_name)?;
    let responses_file = open_file(responses.as_ref(), &responses_name)?;
    import_answer_keys(
        area,
        identification_file,
        &identification_name,
        responses_file,
        &responses_name,
        imported_at,
    )
}

/// Caps an error listing at three entries, appending an ellipsis marker when
/// more were collected. `None` when the listing is empty.
pub fn error_preview(messages: &[String]) -> Option<String> {
    if messages.is_empty() {
        return None;
    }
    let preview = messages
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(" | ");
    Some(if messages.len() > 3 {
        format!("{preview} ...")
    } else {
        preview
    })
}

fn import_sheets<R, T, P, S>(
    reader: R,
    name: &str,
    imported_at: DateTime<Utc>,
    parse: P,
    set_source: S,
) -> Result<FileImport<T>, ImportError>
where
    R: Read,
    P: Fn(&str, usize) -> Option<Result<T, ParseDiagnostic>>,
    S: Fn(&mut T, &str),
{
    let text = decode_scan_text(reader).map_err(|source| ImportError::Io {
        name: name.to_string(),
        source,
    })?;

    let source_id = next_source_id();
    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();
    let mut total_lines = 0;

    for (index, line) in text.split('\n').enumerate() {
        if !line.trim().is_empty() {
            total_lines += 1;
        }
        match parse(line, index + 1) {
            None => {}
            Some(Err(diagnostic)) => diagnostics.push(diagnostic),
            Some(Ok(mut sheet)) => {
                set_source(&mut sheet, &source_id);
                rows.push(sheet);
            }
        }
    }

    if rows.is_empty() && !diagnostics.is_empty() {
        warn!(file = name, errors = diagnostics.len(), "no valid rows in scan file");
    }

    let summary = SourceSummary {
        id: source_id,
        name: name.to_string(),
        imported_at,
        total_lines,
        valid_rows: rows.len(),
        error_count: diagnostics.len(),
    };

    Ok(FileImport {
        rows,
        diagnostics,
        summary,
    })
}

/// Reads a scan file as Latin-1 text, dropping embedded EOF control bytes
/// (0x1A) and normalizing CR/LF and lone CR line endings.
fn decode_scan_text<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text: String = bytes
        .into_iter()
        .filter(|&byte| byte != 0x1a)
        .map(char::from)
        .collect();
    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open_file(path: &Path, name: &str) -> Result<File, ImportError> {
    File::open(path).map_err(|source| ImportError::Io {
        name: name.to_string(),
        source,
    })
}
