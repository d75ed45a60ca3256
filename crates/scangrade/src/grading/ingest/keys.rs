use super::normalize::{normalize_text, strip_digits};
use super::record::{Area, MatchKeys};

/// Composite key linking a response sheet to its identification sheet:
/// digits-only litho, uppercased indicator, and trimmed folio joined with a
/// literal pipe.
pub fn primary_match_key<R: MatchKeys + ?Sized>(record: &R) -> String {
    format!(
        "{}|{}|{}",
        strip_digits(record.litho()),
        record.indicator().trim().to_ascii_uppercase(),
        record.folio().trim()
    )
}

/// Litho-only fallback key, used when the composite key fails to resolve
/// (mis-scanned folio or indicator). `None` when no litho digits were read.
pub fn litho_key<R: MatchKeys + ?Sized>(record: &R) -> Option<String> {
    let digits = strip_digits(record.litho());
    (!digits.is_empty()).then_some(digits)
}

/// Key selecting the answer key that governs a response: area label plus the
/// first letter of the form type, uppercased. `None` when the type is blank.
pub fn area_type_key(area: Area, form_type: &str) -> Option<String> {
    let letter = form_type.trim().chars().next()?.to_ascii_uppercase();
    Some(format!("{}|{}", area.label(), letter))
}

/// Deduplication key for weighting entries.
pub fn area_subject_key(area: Area, subject: &str) -> String {
    format!("{}|{}", area.label(), normalize_text(subject))
}
