use chrono::Utc;
use std::io::Cursor;

use scangrade::grading::ingest::{
    import_identifiers, import_responses, link_responses, NO_ISSUES,
};

const HEADER: &str = "000100001789012345678";

fn identifier_line(litho: &str, form_type: &str, national_id: &str) -> String {
    format!(
        "{HEADER} 1234 #0001 A {litho}{form_type}{national_id}101{}",
        "ABCDE".repeat(12)
    )
}

fn response_line(litho: &str, folio: &str) -> String {
    format!("{HEADER} 1234 #{folio} A {litho}{}", "ABCDE".repeat(12))
}

#[test]
fn identifier_import_collects_rows_and_diagnostics() {
    let text = format!(
        "{}\r\n\r\n{}\r\nbad-header-aaaaaaaaaa 1234 #0001 A 333333C44444444102{}\r\nxx\r\n",
        identifier_line("111111", "A", "87654321"),
        "too short",
        "ABCDE".repeat(12)
    );

    let import = import_identifiers(Cursor::new(text), "identificadores.dat", Utc::now())
        .expect("import succeeds");

    assert_eq!(import.rows.len(), 1);
    assert_eq!(import.rows[0].sequence, "100001");
    assert_eq!(import.rows[0].national_id, "87654321");
    assert_eq!(import.rows[0].observation, NO_ISSUES);
    assert_eq!(import.rows[0].source_id, import.summary.id);

    // "too short" and the bad header fail; the blank and the stray "xx"...
    // "xx" is two characters, so it is parsed and fails the length check.
    assert_eq!(import.diagnostics.len(), 3);
    let messages: Vec<String> = import
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(messages[0], "L3: insufficient length (9 characters)");
    assert!(messages[1].starts_with("L4: invalid header (bad-header-aaaaaaaaaa"));
    assert_eq!(import.summary.valid_rows, 1);
    assert_eq!(import.summary.error_count, 3);
    assert_eq!(import.summary.total_lines, 4);
}

#[test]
fn embedded_eof_bytes_do_not_break_the_last_line() {
    let text = format!("{}\u{1a}\r\n", response_line("111111", "0001"));
    let import = import_responses(Cursor::new(text.into_bytes()), "respuestas.dat", Utc::now())
        .expect("import succeeds");
    assert_eq!(import.rows.len(), 1);
    assert!(import.diagnostics.is_empty());
}

#[test]
fn linked_responses_inherit_identity_and_recompute_observations() {
    let identifiers = import_identifiers(
        Cursor::new(identifier_line("111111", "B", "87654321")),
        "identificadores.dat",
        Utc::now(),
    )
    .expect("identifier import succeeds")
    .rows;

    let mut responses = import_responses(
        Cursor::new(format!(
            "{}\n{}\n",
            response_line("111111", "0001"),
            response_line("999999", "0002")
        )),
        "respuestas.dat",
        Utc::now(),
    )
    .expect("response import succeeds")
    .rows;

    // Before linking, responses carry no identity and say so.
    assert!(responses[0].national_id.is_empty());
    assert_eq!(
        responses[0].observation,
        "type not linked · national id not linked"
    );

    link_responses(&identifiers, &mut responses);

    assert_eq!(responses[0].national_id, "87654321");
    assert_eq!(responses[0].form_type, "B");
    assert_eq!(responses[0].observation, NO_ISSUES);

    // The second sheet has no identifier anywhere; it stays unlinked.
    assert!(responses[1].national_id.is_empty());
    assert_eq!(
        responses[1].observation,
        "type not linked · national id not linked"
    );
}

#[test]
fn litho_fallback_links_mis_scanned_folios() {
    let identifiers = import_identifiers(
        Cursor::new(identifier_line("111111", "B", "87654321")),
        "identificadores.dat",
        Utc::now(),
    )
    .expect("identifier import succeeds")
    .rows;

    // Folio 0009 does not match the identifier's 0001; the litho does.
    let mut responses = import_responses(
        Cursor::new(response_line("111111", "0009")),
        "respuestas.dat",
        Utc::now(),
    )
    .expect("response import succeeds")
    .rows;

    link_responses(&identifiers, &mut responses);
    assert_eq!(responses[0].national_id, "87654321");
}
