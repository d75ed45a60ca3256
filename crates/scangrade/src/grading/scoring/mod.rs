mod defaults;
mod plan;
mod summary;

pub use defaults::standard_weightings;
pub use plan::{
    build_question_plan, entries_for_area, merge_overrides, plan_totals,
    read_weighting_overrides, read_weighting_overrides_path, PlanSlot, PlanTotals, WeightingEntry,
    WeightingImportError,
};
pub use summary::{RunSummary, ScoreResult, ScoringRun};

use chrono::{DateTime, Utc};
use tracing::info;

use super::ingest::{
    responses_by_national_id, strip_digits, AnswerKeyIndex, AnswerKeySheet, Area, ResponseSheet,
    ANSWER_SLOTS,
};
use super::roster::RosterEntry;

/// Point values applied per question slot, plus the area being graded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub area: Area,
    pub correct_value: f64,
    pub incorrect_value: f64,
    pub blank_value: f64,
}

/// Precondition failures. Fatal to the scoring run only; no partial result
/// is produced.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no weighting entries registered for the {label} area", label = .area.label())]
    NoWeightings { area: Area },
    #[error(
        "the selected weightings cover {covered} questions for the {label} area; they must sum to {slots}",
        label = .area.label(),
        slots = ANSWER_SLOTS
    )]
    PlanIncomplete { area: Area, covered: usize },
    #[error("the {role} answer value is not a finite number")]
    NonFiniteValue { role: &'static str },
    #[error("no candidates registered for the {label} area", label = .area.label())]
    EmptyRoster { area: Area },
}

/// Stateless engine combining the roster, linked responses, answer keys, and
/// a question plan into one ordered result set per run.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores every roster candidate of the configured area. Lookup maps are
    /// derived here from the immutable input slices; re-running with the
    /// same inputs yields identical ordered output.
    pub fn score(
        &self,
        roster: &[RosterEntry],
        responses: &[ResponseSheet],
        answer_keys: &[AnswerKeySheet],
        entries: &[WeightingEntry],
        run_at: DateTime<Utc>,
    ) -> Result<ScoringRun, ScoringError> {
        let area = self.config.area;

        let area_entries = entries_for_area(entries, area);
        if area_entries.is_empty() {
            return Err(ScoringError::NoWeightings { area });
        }

        let plan = build_question_plan(&area_entries);
        if plan.len() != ANSWER_SLOTS {
            return Err(ScoringError::PlanIncomplete {
                area,
                covered: plan.len(),
            });
        }

        for (role, value) in [
            ("correct", self.config.correct_value),
            ("incorrect", self.config.incorrect_value),
            ("blank", self.config.blank_value),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::NonFiniteValue { role });
            }
        }

        let candidates: Vec<&RosterEntry> =
            roster.iter().filter(|entry| entry.area == area).collect();
        if candidates.is_empty() {
            return Err(ScoringError::EmptyRoster { area });
        }

        let by_national_id = responses_by_national_id(responses);
        let key_index = AnswerKeyIndex::build(answer_keys);

        let mut results = Vec::new();
        let mut missing_responses: usize = 0;
        let mut missing_keys: usize = 0;

        for candidate in &candidates {
            let national_id = strip_digits(&candidate.national_id);
            let Some(candidate_responses) = by_national_id.get(&national_id) else {
                // Absence, not a zero score.
                missing_responses += 1;
                continue;
            };

            let matched = candidate_responses.iter().find_map(|response| {
                key_index
                    .resolve(area, &response.form_type)
                    .map(|key| (*response, key))
            });
            let Some((response, answer_key)) = matched else {
                missing_keys += 1;
                continue;
            };

            results.push(ScoreResult {
                national_id,
                surnames: candidate.surnames.clone(),
                given_names: candidate.given_names.clone(),
                area,
                score: grade_answers(&response.answers, &answer_key.answers, &plan, &self.config),
            });
        }

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.national_id.cmp(&b.national_id))
        });

        let unlinked_responses = responses
            .iter()
            .filter(|response| response.national_id.trim().is_empty())
            .count();

        let summary = RunSummary {
            area,
            run_at,
            total_candidates: candidates.len(),
            missing_responses,
            missing_keys,
            unlinked_responses,
            total_weight: round3(plan.iter().map(|slot| slot.weight).sum()),
        };

        info!(
            area = area.label(),
            candidates = summary.total_candidates,
            scored = results.len(),
            missing_responses,
            missing_keys,
            "scoring run complete"
        );

        Ok(ScoringRun { results, summary })
    }
}

/// Grades one answer string against the key. Both strings are uppercased and
/// padded/truncated to the plan length so malformed inputs classify the
/// trailing slots as blank. Each contribution is rounded to 2 decimals
/// before accumulating so the sum matches a per-question reference exactly.
fn grade_answers(answers: &str, key: &str, plan: &[PlanSlot], config: &ScoringConfig) -> f64 {
    let given = normalize_answer_row(answers, plan.len());
    let expected = normalize_answer_row(key, plan.len());

    let mut total = 0.0;
    for (index, slot) in plan.iter().enumerate() {
        if slot.weight <= 0.0 {
            continue;
        }

        let response_char = given[index];
        let expected_char = expected[index];

        let contribution = if is_option(expected_char)
            && is_option(response_char)
            && response_char == expected_char
        {
            config.correct_value * slot.weight
        } else if is_option(response_char) {
            config.incorrect_value * slot.weight
        } else {
            config.blank_value * slot.weight
        };

        total += round2(contribution);
    }

    round2(total)
}

fn normalize_answer_row(value: &str, slots: usize) -> Vec<char> {
    let mut chars: Vec<char> = value.to_uppercase().chars().collect();
    chars.resize(slots, ' ');
    chars
}

/// A mark counts as an answer only when it is one of the five options;
/// spaces, `*`, and any other character classify as blank.
fn is_option(c: char) -> bool {
    ('A'..='E').contains(&c)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
