use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grading::ingest::{area_subject_key, normalize_text, Area};

/// One weighting row: how many questions of a subject appear in an area's
/// exam and how many points each one is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightingEntry {
    pub area: Area,
    pub subject: String,
    pub question_count: u32,
    pub weight: f64,
    pub order: u32,
}

/// One expanded question slot. A subject with `question_count` N contributes
/// N slots, each carrying the full listed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSlot {
    pub subject: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub questions: usize,
    pub weight: f64,
}

/// Expands weighting entries, in input order, into the flat per-question
/// weight sequence. Entries with a zero count contribute nothing.
pub fn build_question_plan(entries: &[WeightingEntry]) -> Vec<PlanSlot> {
    let mut plan = Vec::new();
    for entry in entries {
        for _ in 0..entry.question_count {
            plan.push(PlanSlot {
                subject: entry.subject.clone(),
                weight: entry.weight,
            });
        }
    }
    plan
}

pub fn plan_totals(plan: &[PlanSlot]) -> PlanTotals {
    PlanTotals {
        questions: plan.len(),
        weight: plan.iter().map(|slot| slot.weight).sum(),
    }
}

/// The entries governing one area, in merged order.
pub fn entries_for_area(entries: &[WeightingEntry], area: Area) -> Vec<WeightingEntry> {
    entries
        .iter()
        .filter(|entry| entry.area == area)
        .cloned()
        .collect()
}

/// Merges override entries onto a default table. An override replaces the
/// default with the same area+subject key; new subjects are appended. The
/// result is sorted by area, then order, then normalized subject — both
/// inputs stay untouched.
pub fn merge_overrides(
    defaults: &[WeightingEntry],
    overrides: &[WeightingEntry],
) -> Vec<WeightingEntry> {
    let mut merged: Vec<WeightingEntry> = Vec::new();
    for entry in defaults.iter().chain(overrides) {
        let key = area_subject_key(entry.area, &entry.subject);
        match merged
            .iter_mut()
            .find(|existing| area_subject_key(existing.area, &existing.subject) == key)
        {
            Some(existing) => *existing = entry.clone(),
            None => merged.push(entry.clone()),
        }
    }

    merged.sort_by(|a, b| {
        (a.area, a.order, normalize_text(&a.subject)).cmp(&(
            b.area,
            b.order,
            normalize_text(&b.subject),
        ))
    });
    merged
}

#[derive(Debug, thiserror::Error)]
pub enum WeightingImportError {
    #[error("failed to read weighting overrides: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid weighting data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct WeightingRow {
    area: String,
    subject: String,
    question_count: u32,
    weight: f64,
    #[serde(default)]
    order: u32,
}

pub fn read_weighting_overrides_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<WeightingEntry>, WeightingImportError> {
    let file = File::open(path)?;
    read_weighting_overrides(file)
}

/// Reads weighting overrides from CSV
/// (`area,subject,question_count,weight,order`).
pub fn read_weighting_overrides<R: Read>(
    reader: R,
) -> Result<Vec<WeightingEntry>, WeightingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.deserialize::<WeightingRow>() {
        let row = record?;
        entries.push(WeightingEntry {
            area: Area::normalized(&row.area),
            subject: row.subject,
            question_count: row.question_count,
            weight: row.weight,
            order: row.order,
        });
    }

    Ok(entries)
}
