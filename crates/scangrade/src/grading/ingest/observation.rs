use super::normalize::strip_digits;
use super::record::{
    AnswerKeySheet, IdentifierSheet, ResponseSheet, ANSWER_SLOTS, LITHO_DIGITS,
    NATIONAL_ID_DIGITS, ROOM_CODE_DIGITS,
};

/// Sentinel observation for a sheet that passed every check.
pub const NO_ISSUES: &str = "no issues";

/// Appended to answer keys whose scan rows found no identification match.
pub const NO_IDENTIFIER_MATCH: &str = "no identifier match";

const SEPARATOR: &str = " · ";

/// Completeness/format issues for an identification sheet. Checks run in a
/// fixed order and are independent of each other.
pub fn identifier_observation(sheet: &IdentifierSheet) -> String {
    let mut issues = Vec::new();
    push_litho_issue(&mut issues, &sheet.litho);
    if sheet.form_type.trim().is_empty() {
        issues.push("type not marked".to_string());
    }
    push_national_id_issue(&mut issues, &sheet.national_id, "not marked");
    push_room_code_issue(&mut issues, &sheet.room_code);
    push_answer_issues(&mut issues, &sheet.answers);
    join_issues(issues)
}

/// Completeness/format issues for a response sheet. National id and form
/// type arrive through identifier linking, hence the "not linked" phrasing.
pub fn response_observation(sheet: &ResponseSheet) -> String {
    let mut issues = Vec::new();
    push_litho_issue(&mut issues, &sheet.litho);
    if sheet.form_type.trim().is_empty() {
        issues.push("type not linked".to_string());
    }
    push_national_id_issue(&mut issues, &sheet.national_id, "not linked");
    push_answer_issues(&mut issues, &sheet.answers);
    join_issues(issues)
}

/// Completeness/format issues for an answer key.
pub fn answer_key_observation(sheet: &AnswerKeySheet) -> String {
    let mut issues = Vec::new();
    push_litho_issue(&mut issues, &sheet.litho);
    if sheet.form_type.trim().is_empty() {
        issues.push("type not reported".to_string());
    }
    push_answer_issues(&mut issues, &sheet.answers);
    join_issues(issues)
}

fn join_issues(issues: Vec<String>) -> String {
    if issues.is_empty() {
        NO_ISSUES.to_string()
    } else {
        issues.join(SEPARATOR)
    }
}

fn push_litho_issue(issues: &mut Vec<String>, litho: &str) {
    let digits = strip_digits(litho);
    if digits.is_empty() {
        issues.push("litho not marked".to_string());
    } else if digits.chars().count() != LITHO_DIGITS {
        issues.push(format!("litho incomplete ({digits})"));
    }
}

fn push_national_id_issue(issues: &mut Vec<String>, national_id: &str, missing: &str) {
    let digits = strip_digits(national_id);
    if digits.is_empty() {
        issues.push(format!("national id {missing}"));
    } else if digits.chars().count() != NATIONAL_ID_DIGITS {
        issues.push(format!("national id incomplete ({digits})"));
    }
}

fn push_room_code_issue(issues: &mut Vec<String>, room_code: &str) {
    let digits = strip_digits(room_code);
    if digits.is_empty() {
        issues.push("room code not marked".to_string());
    } else if digits.chars().count() != ROOM_CODE_DIGITS {
        issues.push(format!("room code incomplete ({digits})"));
    }
}

fn push_answer_issues(issues: &mut Vec<String>, answers: &str) {
    let normalized: String = answers
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    // First matching complaint wins; answer issues never stack.
    if normalized.is_empty() {
        issues.push("no answers marked".to_string());
    } else if normalized.chars().count() != ANSWER_SLOTS {
        issues.push(format!(
            "answer string incomplete ({}/{ANSWER_SLOTS})",
            normalized.chars().count()
        ));
    } else if normalized.chars().any(|c| !matches!(c, 'A'..='E' | '*')) {
        issues.push("answers contain invalid marks".to_string());
    }
}
