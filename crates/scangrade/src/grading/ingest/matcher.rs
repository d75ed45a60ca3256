use std::collections::HashMap;

use super::keys::{area_type_key, litho_key, primary_match_key};
use super::normalize::strip_digits;
use super::observation::response_observation;
use super::record::{AnswerKeySheet, Area, IdentifierSheet, MatchKeys, ResponseSheet};

/// Two-tier lookup over identification sheets: exact composite key first,
/// litho-only fallback second. Built on demand from an immutable snapshot;
/// never the source of truth.
pub struct IdentityIndex<'a> {
    primary: HashMap<String, &'a IdentifierSheet>,
    by_litho: HashMap<String, &'a IdentifierSheet>,
}

impl<'a> IdentityIndex<'a> {
    pub fn build(identifiers: &'a [IdentifierSheet]) -> Self {
        let mut primary = HashMap::new();
        let mut by_litho = HashMap::new();
        for sheet in identifiers {
            primary.insert(primary_match_key(sheet), sheet);
            if let Some(litho) = litho_key(sheet) {
                // First sheet wins so duplicate lithos resolve deterministically.
                by_litho.entry(litho).or_insert(sheet);
            }
        }
        Self { primary, by_litho }
    }

    /// Resolves the identification sheet for a target record. `None` is a
    /// normal, reportable outcome, not an error.
    pub fn resolve<R: MatchKeys + ?Sized>(&self, target: &R) -> Option<&'a IdentifierSheet> {
        if let Some(sheet) = self.primary.get(&primary_match_key(target)) {
            return Some(sheet);
        }
        litho_key(target).and_then(|litho| self.by_litho.get(&litho).copied())
    }
}

/// (area, form type) lookup over answer keys. Later sheets overwrite earlier
/// ones for the same pair.
pub struct AnswerKeyIndex<'a> {
    by_area_type: HashMap<String, &'a AnswerKeySheet>,
}

impl<'a> AnswerKeyIndex<'a> {
    pub fn build(answer_keys: &'a [AnswerKeySheet]) -> Self {
        let mut by_area_type = HashMap::new();
        for sheet in answer_keys {
            if let Some(key) = area_type_key(sheet.area, &sheet.form_type) {
                by_area_type.insert(key, sheet);
            }
        }
        Self { by_area_type }
    }

    pub fn resolve(&self, area: Area, form_type: &str) -> Option<&'a AnswerKeySheet> {
        let key = area_type_key(area, form_type)?;
        self.by_area_type.get(&key).copied()
    }
}

/// Copies national id and form type onto each response from its matched
/// identification sheet; unmatched responses keep their own fields in
/// canonical form. Observations are recomputed either way.
pub fn link_responses(identifiers: &[IdentifierSheet], responses: &mut [ResponseSheet]) {
    let index = IdentityIndex::build(identifiers);
    for response in responses.iter_mut() {
        match index.resolve(response) {
            Some(matched) => {
                response.national_id = matched.national_id.clone();
                response.form_type = matched.form_type.clone();
            }
            None => {
                response.national_id = strip_digits(&response.national_id);
                response.form_type = response
                    .form_type
                    .trim()
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase().to_string())
                    .unwrap_or_default();
            }
        }
        response.observation = response_observation(response);
    }
}

/// Groups response sheets by digits-only national id; sheets without one are
/// left out (they surface as unlinked in the run summary).
pub fn responses_by_national_id(
    responses: &[ResponseSheet],
) -> HashMap<String, Vec<&ResponseSheet>> {
    let mut map: HashMap<String, Vec<&ResponseSheet>> = HashMap::new();
    for sheet in responses {
        let national_id = strip_digits(&sheet.national_id);
        if national_id.is_empty() {
            continue;
        }
        map.entry(national_id).or_default().push(sheet);
    }
    map
}
