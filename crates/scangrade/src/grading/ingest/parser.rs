use super::normalize::remove_whitespace;
use super::observation::{identifier_observation, response_observation};
use super::record::{IdentifierSheet, ResponseSheet};

const HEADER_DIGITS: usize = 21;
const MIN_LINE_CHARS: usize = 40;
const FOLIO_PREVIEW_CHARS: usize = 10;

/// One recoverable parse failure, tagged with the 1-based line number. These
/// are collected per file and never abort an import batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDiagnostic {
    #[error("L{line}: insufficient length ({length} characters)")]
    InsufficientLength { line: usize, length: usize },
    #[error("L{line}: invalid header ({header})")]
    InvalidHeader { line: usize, header: String },
    #[error("L{line}: exam code not found")]
    MissingExamCode { line: usize },
    #[error("L{line}: folio not recognized (found: \"{found}...\")")]
    MissingFolio { line: usize, found: String },
    #[error("L{line}: status indicator not identified")]
    MissingIndicator { line: usize },
}

/// Parses one line of an identification file. `None` means the line was
/// blank (or a single stray character) and is skipped silently.
pub fn parse_identifier_line(
    line: &str,
    number: usize,
) -> Option<Result<IdentifierSheet, ParseDiagnostic>> {
    let raw = line.strip_suffix('\r').unwrap_or(line);
    if raw.trim().chars().count() <= 1 {
        return None;
    }

    let scan = match scan_common(raw, number) {
        Ok(scan) => scan,
        Err(diagnostic) => return Some(Err(diagnostic)),
    };

    let rest = &scan.rest;
    let mut sheet = IdentifierSheet {
        raw_line: raw.to_string(),
        header: scan.header,
        sequence: scan.sequence,
        exam_code: scan.exam_code,
        folio: scan.folio,
        indicator: scan.indicator,
        litho: remove_whitespace(&slice_chars(rest, 0, 6)),
        form_type: slice_chars(rest, 6, 7).trim().to_uppercase(),
        national_id: remove_whitespace(&slice_chars(rest, 7, 15)),
        room_code: remove_whitespace(&slice_chars(rest, 15, 18)),
        answers: slice_chars(rest, 18, rest.len()).trim().to_string(),
        observation: String::new(),
        source_id: String::new(),
    };
    sheet.observation = identifier_observation(&sheet);

    Some(Ok(sheet))
}

/// Parses one line of a response file. The answer segment keeps its internal
/// spacing so blank slots stay positionally aligned.
pub fn parse_response_line(
    line: &str,
    number: usize,
) -> Option<Result<ResponseSheet, ParseDiagnostic>> {
    let raw = line.strip_suffix('\r').unwrap_or(line);
    if raw.trim().chars().count() <= 1 {
        return None;
    }

    let scan = match scan_common(raw, number) {
        Ok(scan) => scan,
        Err(diagnostic) => return Some(Err(diagnostic)),
    };

    let rest = &scan.rest;
    let mut sheet = ResponseSheet {
        raw_line: raw.to_string(),
        header: scan.header,
        sequence: scan.sequence,
        exam_code: scan.exam_code,
        folio: scan.folio,
        indicator: scan.indicator,
        litho: remove_whitespace(&slice_chars(rest, 0, 6)),
        form_type: String::new(),
        national_id: String::new(),
        answers: slice_chars(rest, 6, rest.len()),
        observation: String::new(),
        source_id: String::new(),
    };
    sheet.observation = response_observation(&sheet);

    Some(Ok(sheet))
}

struct CommonScan {
    header: String,
    sequence: String,
    exam_code: String,
    folio: String,
    indicator: String,
    rest: Vec<char>,
}

/// Header plus the three whitespace-tolerant tokens every layout shares:
/// exam code (4 digits), folio (`#`-prefixed digits), status indicator
/// (single letter). Leaves the positional remainder for the caller.
fn scan_common(raw: &str, line: usize) -> Result<CommonScan, ParseDiagnostic> {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() < MIN_LINE_CHARS {
        return Err(ParseDiagnostic::InsufficientLength {
            line,
            length: chars.len(),
        });
    }

    let header: String = chars[..HEADER_DIGITS].iter().collect();
    if !header.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseDiagnostic::InvalidHeader { line, header });
    }
    let sequence: String = chars[3..9].iter().collect();

    let mut rest = &chars[HEADER_DIGITS..];

    let after_ws = skip_whitespace(rest);
    if after_ws.len() < 4 || !after_ws[..4].iter().all(|c| c.is_ascii_digit()) {
        return Err(ParseDiagnostic::MissingExamCode { line });
    }
    let exam_code: String = after_ws[..4].iter().collect();
    rest = &after_ws[4..];

    let folio_scan = rest;
    let mut after_ws = skip_whitespace(rest);
    if after_ws.first() == Some(&'#') {
        after_ws = &after_ws[1..];
    }
    let digits = after_ws
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(ParseDiagnostic::MissingFolio {
            line,
            found: folio_scan.iter().take(FOLIO_PREVIEW_CHARS).collect(),
        });
    }
    let folio: String = after_ws[..digits].iter().collect();
    rest = &after_ws[digits..];

    let after_ws = skip_whitespace(rest);
    let Some(letter) = after_ws.first().filter(|c| c.is_ascii_alphabetic()) else {
        return Err(ParseDiagnostic::MissingIndicator { line });
    };
    let indicator = letter.to_ascii_uppercase().to_string();
    let mut rest = &after_ws[1..];

    // The scanner emits one separator space before the positional block.
    if rest.first() == Some(&' ') {
        rest = &rest[1..];
    }

    Ok(CommonScan {
        header,
        sequence,
        exam_code,
        folio,
        indicator,
        rest: rest.to_vec(),
    })
}

fn skip_whitespace(chars: &[char]) -> &[char] {
    let skipped = chars.iter().take_while(|c| c.is_whitespace()).count();
    &chars[skipped..]
}

fn slice_chars(chars: &[char], start: usize, end: usize) -> String {
    let start = start.min(chars.len());
    let end = end.clamp(start, chars.len());
    chars[start..end].iter().collect()
}
