use chrono::Utc;
use std::io::Cursor;

use scangrade::grading::ingest::{
    import_answer_keys, AnswerKeyIndex, Area, NO_IDENTIFIER_MATCH, NO_ISSUES,
};

const HEADER: &str = "000200002789012345678";

fn identifier_line(litho: &str, form_type: &str, folio: &str) -> String {
    format!(
        "{HEADER} 1234 #{folio} A {litho}{form_type}00000001101{}",
        "ABCDE".repeat(12)
    )
}

fn response_line(litho: &str, folio: &str) -> String {
    format!("{HEADER} 1234 #{folio} A {litho}{}", "ABCDE".repeat(12))
}

#[test]
fn answer_keys_inherit_form_type_by_composite_key() {
    let identification = identifier_line("555555", "C", "0001");
    let responses = response_line("555555", "0001");

    let import = import_answer_keys(
        Area::Biomedical,
        Cursor::new(identification),
        "claves-id.dat",
        Cursor::new(responses),
        "claves-resp.dat",
        Utc::now(),
    )
    .expect("import succeeds");

    assert_eq!(import.rows.len(), 1);
    let key = &import.rows[0];
    assert_eq!(key.area, Area::Biomedical);
    assert_eq!(key.form_type, "C");
    assert_eq!(key.answers, "ABCDE".repeat(12));
    assert_eq!(key.observation, NO_ISSUES);
    assert_eq!(import.summary.valid_rows, 1);
    assert_eq!(import.summary.identification_errors, 0);
    assert_eq!(import.summary.response_errors, 0);
}

#[test]
fn answer_keys_fall_back_to_litho_when_folio_differs() {
    let identification = identifier_line("555555", "D", "0001");
    let responses = response_line("555555", "0042");

    let import = import_answer_keys(
        Area::Social,
        Cursor::new(identification),
        "claves-id.dat",
        Cursor::new(responses),
        "claves-resp.dat",
        Utc::now(),
    )
    .expect("import succeeds");

    assert_eq!(import.rows[0].form_type, "D");
}

#[test]
fn unmatched_answer_keys_carry_the_no_match_observation() {
    let identification = identifier_line("555555", "C", "0001");
    let responses = response_line("777777", "0001");

    let import = import_answer_keys(
        Area::Social,
        Cursor::new(identification),
        "claves-id.dat",
        Cursor::new(responses),
        "claves-resp.dat",
        Utc::now(),
    )
    .expect("import succeeds");

    let key = &import.rows[0];
    assert!(key.form_type.is_empty());
    assert_eq!(
        key.observation,
        format!("type not reported · {NO_IDENTIFIER_MATCH}")
    );

    // Without a form type the key is unreachable from scoring lookups.
    let index = AnswerKeyIndex::build(&import.rows);
    assert!(index.resolve(Area::Social, "").is_none());
}

#[test]
fn later_keys_win_duplicate_area_and_type() {
    let identification = format!(
        "{}\n{}\n",
        identifier_line("555555", "C", "0001"),
        identifier_line("666666", "C", "0002")
    );
    let responses = format!(
        "{}\n{}\n",
        response_line("555555", "0001"),
        format!("{HEADER} 1234 #0002 A 666666{}", "EDCBA".repeat(12))
    );

    let import = import_answer_keys(
        Area::Engineering,
        Cursor::new(identification),
        "claves-id.dat",
        Cursor::new(responses),
        "claves-resp.dat",
        Utc::now(),
    )
    .expect("import succeeds");

    assert_eq!(import.rows.len(), 2);
    let index = AnswerKeyIndex::build(&import.rows);
    let resolved = index
        .resolve(Area::Engineering, "C")
        .expect("duplicate key resolves");
    assert_eq!(resolved.answers, "EDCBA".repeat(12));
}
