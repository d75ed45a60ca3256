use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::ingest::Area;

/// One candidate's rounded weighted score. Created fresh on every run and
/// never mutated; a new run replaces the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub national_id: String,
    pub surnames: String,
    pub given_names: String,
    pub area: Area,
    pub score: f64,
}

/// Run-level counters reported alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub area: Area,
    pub run_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub missing_responses: usize,
    pub missing_keys: usize,
    pub unlinked_responses: usize,
    pub total_weight: f64,
}

/// Complete output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRun {
    pub results: Vec<ScoreResult>,
    pub summary: RunSummary,
}
