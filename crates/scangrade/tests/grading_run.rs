use chrono::{DateTime, Utc};
use std::io::Cursor;

use scangrade::grading::ingest::{
    import_answer_keys, import_identifiers, import_responses, link_responses, Area,
};
use scangrade::grading::roster::read_roster;
use scangrade::grading::scoring::{
    build_question_plan, entries_for_area, merge_overrides, plan_totals,
    read_weighting_overrides, standard_weightings, ScoringConfig, ScoringEngine,
};

const HEADER: &str = "000300003789012345678";

fn identifier_line(folio: &str, litho: &str, form_type: &str, national_id: &str) -> String {
    format!(
        "{HEADER} 1234 #{folio} A {litho}{form_type}{national_id}101{}",
        "ABCDE".repeat(12)
    )
}

fn response_line(folio: &str, litho: &str, answers: &str) -> String {
    format!("{HEADER} 1234 #{folio} A {litho}{answers}")
}

fn run_at() -> DateTime<Utc> {
    "2026-03-15T14:30:00Z".parse().expect("valid timestamp")
}

#[test]
fn full_pipeline_scores_candidates_with_the_standard_weightings() {
    let key_string = "ABCDE".repeat(12);
    let mut flipped: Vec<char> = key_string.chars().collect();
    flipped[0] = 'B'; // wrong letter on the first Arithmetic slot (weight 3.331)
    let flipped: String = flipped.into_iter().collect();

    let identifiers = import_identifiers(
        Cursor::new(format!(
            "{}\n{}\n",
            identifier_line("0001", "111111", "A", "87654321"),
            identifier_line("0002", "222222", "A", "12345678")
        )),
        "identificadores.dat",
        run_at(),
    )
    .expect("identifier import succeeds")
    .rows;

    let mut responses = import_responses(
        Cursor::new(format!(
            "{}\n{}\n",
            response_line("0001", "111111", &key_string),
            response_line("0002", "222222", &flipped)
        )),
        "respuestas.dat",
        run_at(),
    )
    .expect("response import succeeds")
    .rows;

    link_responses(&identifiers, &mut responses);

    let keys = import_answer_keys(
        Area::Biomedical,
        Cursor::new(identifier_line("0099", "999999", "A", "00000001")),
        "claves-id.dat",
        Cursor::new(response_line("0099", "999999", &key_string)),
        "claves-resp.dat",
        run_at(),
    )
    .expect("answer key import succeeds");

    let roster = read_roster(Cursor::new(
        "DNI,Apellido Paterno,Apellido Materno,Nombres,Área\n\
87654321,Quispe,Mamani,Rosa Elena,Biomédicas\n\
12345678,Flores,Huamán,Carlos,Biomédicas\n\
99999999,Condori,Apaza,María,Biomédicas\n",
    ))
    .expect("roster reads");

    let engine = ScoringEngine::new(ScoringConfig {
        area: Area::Biomedical,
        correct_value: 10.0,
        incorrect_value: 0.0,
        blank_value: 2.0,
    });
    let run = engine
        .score(
            &roster,
            &responses,
            &keys.rows,
            &standard_weightings(),
            run_at(),
        )
        .expect("scoring run succeeds");

    // Every published table sums to 300 weight points, so a perfect sheet at
    // 10 points per question is worth exactly 3000.
    assert_eq!(run.results.len(), 2);
    assert_eq!(run.results[0].national_id, "87654321");
    assert_eq!(run.results[0].score, 3000.0);
    assert_eq!(run.results[0].surnames, "Quispe Mamani");

    // One wrong Arithmetic answer forfeits its 33.31 contribution.
    assert_eq!(run.results[1].national_id, "12345678");
    assert_eq!(run.results[1].score, 2966.69);

    assert_eq!(run.summary.area, Area::Biomedical);
    assert_eq!(run.summary.run_at, run_at());
    assert_eq!(run.summary.total_candidates, 3);
    assert_eq!(run.summary.missing_responses, 1);
    assert_eq!(run.summary.missing_keys, 0);
    assert_eq!(run.summary.unlinked_responses, 0);
    assert_eq!(run.summary.total_weight, 300.0);
}

#[test]
fn rerunning_the_pipeline_is_idempotent() {
    let key_string = "ABCDE".repeat(12);

    let identifiers = import_identifiers(
        Cursor::new(identifier_line("0001", "111111", "A", "87654321")),
        "identificadores.dat",
        run_at(),
    )
    .expect("identifier import succeeds")
    .rows;

    let mut responses = import_responses(
        Cursor::new(response_line("0001", "111111", &key_string)),
        "respuestas.dat",
        run_at(),
    )
    .expect("response import succeeds")
    .rows;
    link_responses(&identifiers, &mut responses);

    let keys = import_answer_keys(
        Area::Social,
        Cursor::new(identifier_line("0099", "999999", "A", "00000001")),
        "claves-id.dat",
        Cursor::new(response_line("0099", "999999", &key_string)),
        "claves-resp.dat",
        run_at(),
    )
    .expect("answer key import succeeds");

    let roster = read_roster(Cursor::new(
        "dni,apellidos,nombres,area\n87654321,Quispe Mamani,Rosa,Sociales\n",
    ))
    .expect("roster reads");

    let engine = ScoringEngine::new(ScoringConfig {
        area: Area::Social,
        correct_value: 10.0,
        incorrect_value: 0.0,
        blank_value: 2.0,
    });
    let entries = standard_weightings();

    let first = engine
        .score(&roster, &responses, &keys.rows, &entries, run_at())
        .expect("first run succeeds");
    let second = engine
        .score(&roster, &responses, &keys.rows, &entries, run_at())
        .expect("second run succeeds");

    assert_eq!(first, second);
}

#[test]
fn weighting_overrides_reshape_the_plan() {
    let overrides = read_weighting_overrides(Cursor::new(
        "area,subject,question_count,weight,order\n\
Engineering,Arithmetic,6,5.201,1\n\
Engineering,Algebra,2,5.202,2\n",
    ))
    .expect("overrides read");

    let merged = merge_overrides(&standard_weightings(), &overrides);
    let plan = build_question_plan(&entries_for_area(&merged, Area::Engineering));

    // 6 + 2 replaces the default 4 + 4; the plan still covers 60 questions.
    assert_eq!(plan.len(), 60);
    assert_eq!(plan.iter().filter(|slot| slot.subject == "Arithmetic").count(), 6);
    assert_eq!(plan.iter().filter(|slot| slot.subject == "Algebra").count(), 2);

    let totals = plan_totals(&plan);
    assert_eq!(totals.questions, 60);
}
