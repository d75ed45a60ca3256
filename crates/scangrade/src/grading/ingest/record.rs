use serde::{Deserialize, Serialize};

use super::normalize::normalize_text;

/// Number of graded answer slots on every sheet.
pub const ANSWER_SLOTS: usize = 60;

/// Canonical digit widths for the positional segments.
pub const LITHO_DIGITS: usize = 6;
pub const NATIONAL_ID_DIGITS: usize = 8;
pub const ROOM_CODE_DIGITS: usize = 3;

/// Admission track. Determines which weighting table and answer key govern a
/// candidate's sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Biomedical,
    Social,
    Engineering,
}

impl Area {
    pub const fn ordered() -> [Self; 3] {
        [Self::Biomedical, Self::Social, Self::Engineering]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Biomedical => "Biomedical",
            Self::Social => "Social",
            Self::Engineering => "Engineering",
        }
    }

    /// Resolves free-form input (roster cells, CLI arguments, legacy Spanish
    /// spellings) to a canonical area. Blank or unrecognized input falls back
    /// to the first area, matching the behavior the import screens rely on.
    pub fn normalized(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Self::ordered()[0];
        }

        if let Some(area) = Self::ordered().into_iter().find(|a| a.label() == trimmed) {
            return area;
        }

        let folded = normalize_text(trimmed);
        match folded.as_str() {
            "biomedical" | "biomedica" | "biomedicas" | "biomedicals" => Self::Biomedical,
            "social" | "socials" | "sociales" => Self::Social,
            "engineering" | "ingenieria" | "ingenierias" | "ingeniero" | "ingenieros" => {
                Self::Engineering
            }
            _ => Self::ordered()
                .into_iter()
                .find(|a| normalize_text(a.label()) == folded)
                .unwrap_or(Self::ordered()[0]),
        }
    }
}

/// Common lookup fields shared by every sheet variant, so key building and
/// matching operate polymorphically over identification sheets, response
/// sheets, and answer keys.
pub trait MatchKeys {
    fn litho(&self) -> &str;
    fn indicator(&self) -> &str;
    fn folio(&self) -> &str;
}

/// One parsed line of an identification file. Carries the candidate linkage
/// fields (form type, national id, room code) on top of the shared layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierSheet {
    pub raw_line: String,
    pub header: String,
    pub sequence: String,
    pub exam_code: String,
    pub folio: String,
    pub indicator: String,
    pub litho: String,
    pub form_type: String,
    pub national_id: String,
    pub room_code: String,
    pub answers: String,
    pub observation: String,
    pub source_id: String,
}

/// One parsed line of a response file. `national_id` and `form_type` start
/// empty and are inherited when the sheet is linked to an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSheet {
    pub raw_line: String,
    pub header: String,
    pub sequence: String,
    pub exam_code: String,
    pub folio: String,
    pub indicator: String,
    pub litho: String,
    pub form_type: String,
    pub national_id: String,
    pub answers: String,
    pub observation: String,
    pub source_id: String,
}

/// Correct-answer string for one (area, form type) pair. Built from a dual
/// file import; keeps the scan linkage fields so duplicates stay auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeySheet {
    pub area: Area,
    pub form_type: String,
    pub answers: String,
    pub indicator: String,
    pub folio: String,
    pub litho: String,
    pub observation: String,
    pub source_id: String,
}

impl MatchKeys for IdentifierSheet {
    fn litho(&self) -> &str {
        &self.litho
    }

    fn indicator(&self) -> &str {
        &self.indicator
    }

    fn folio(&self) -> &str {
        &self.folio
    }
}

impl MatchKeys for ResponseSheet {
    fn litho(&self) -> &str {
        &self.litho
    }

    fn indicator(&self) -> &str {
        &self.indicator
    }

    fn folio(&self) -> &str {
        &self.folio
    }
}

impl MatchKeys for AnswerKeySheet {
    fn litho(&self) -> &str {
        &self.litho
    }

    fn indicator(&self) -> &str {
        &self.indicator
    }

    fn folio(&self) -> &str {
        &self.folio
    }
}
