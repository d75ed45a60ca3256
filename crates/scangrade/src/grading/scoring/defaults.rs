use super::plan::WeightingEntry;
use crate::grading::ingest::Area;

/// The published weighting table for the three admission tracks. Every area
/// covers the 60 graded questions; callers layer registrar overrides on top
/// with [`super::merge_overrides`].
pub fn standard_weightings() -> Vec<WeightingEntry> {
    let mut entries = Vec::new();
    entries.extend(biomedical_weightings());
    entries.extend(social_weightings());
    entries.extend(engineering_weightings());
    entries
}

fn entry(
    area: Area,
    subject: &str,
    question_count: u32,
    weight: f64,
    order: u32,
) -> WeightingEntry {
    WeightingEntry {
        area,
        subject: subject.to_string(),
        question_count,
        weight,
        order,
    }
}

fn biomedical_weightings() -> Vec<WeightingEntry> {
    let area = Area::Biomedical;
    vec![
        entry(area, "Arithmetic", 3, 3.331, 1),
        entry(area, "Algebra", 3, 3.202, 2),
        entry(area, "Geometry", 3, 3.301, 3),
        entry(area, "Trigonometry", 3, 3.404, 4),
        entry(area, "Physics", 3, 5.505, 5),
        entry(area, "Chemistry", 5, 6.623, 6),
        entry(area, "Biology and Anatomy", 6, 7.816, 7),
        entry(area, "Psychology and Philosophy", 4, 4.006, 8),
        entry(area, "Geography", 2, 2.8, 9),
        entry(area, "History", 2, 3.302, 10),
        entry(area, "Civics", 2, 3.571, 11),
        entry(area, "Economics", 2, 3.406, 12),
        entry(area, "Communication", 4, 3.302, 13),
        entry(area, "Literature", 2, 2.805, 14),
        entry(area, "Mathematical Reasoning", 6, 7.201, 15),
        entry(area, "Verbal Reasoning", 6, 7.201, 16),
        entry(area, "English", 2, 4.087, 17),
        entry(area, "Quechua and Aymara", 2, 4.087, 18),
    ]
}

fn social_weightings() -> Vec<WeightingEntry> {
    let area = Area::Social;
    vec![
        entry(area, "Arithmetic", 3, 3.331, 1),
        entry(area, "Algebra", 3, 3.185, 2),
        entry(area, "Geometry", 2, 3.12, 3),
        entry(area, "Trigonometry", 2, 3.12, 4),
        entry(area, "Physics", 2, 2.302, 5),
        entry(area, "Chemistry", 2, 2.404, 6),
        entry(area, "Biology and Anatomy", 2, 2.504, 7),
        entry(area, "Psychology and Philosophy", 4, 4.807, 8),
        entry(area, "Geography", 4, 4.907, 9),
        entry(area, "History", 4, 5.805, 10),
        entry(area, "Civics", 4, 6.576, 11),
        entry(area, "Economics", 4, 4.607, 12),
        entry(area, "Communication", 4, 6.09, 13),
        entry(area, "Literature", 4, 4.3, 14),
        entry(area, "Mathematical Reasoning", 6, 7.203, 15),
        entry(area, "Verbal Reasoning", 6, 7.603, 16),
        entry(area, "English", 2, 4.087, 17),
        entry(area, "Quechua and Aymara", 2, 4.087, 18),
    ]
}

fn engineering_weightings() -> Vec<WeightingEntry> {
    let area = Area::Engineering;
    vec![
        entry(area, "Arithmetic", 4, 5.201, 1),
        entry(area, "Algebra", 4, 5.202, 2),
        entry(area, "Geometry", 4, 5.303, 3),
        entry(area, "Trigonometry", 4, 5.404, 4),
        entry(area, "Physics", 4, 5.905, 5),
        entry(area, "Chemistry", 4, 5.406, 6),
        entry(area, "Biology and Anatomy", 2, 3.177, 7),
        entry(area, "Psychology and Philosophy", 4, 3.802, 8),
        entry(area, "Geography", 2, 2.576, 9),
        entry(area, "History", 2, 3.701, 10),
        entry(area, "Civics", 2, 3.101, 11),
        entry(area, "Economics", 2, 3.502, 12),
        entry(area, "Communication", 4, 3.352, 13),
        entry(area, "Literature", 2, 2.501, 14),
        entry(area, "Mathematical Reasoning", 6, 7.603, 15),
        entry(area, "Verbal Reasoning", 6, 7.103, 16),
        entry(area, "English", 2, 4.087, 17),
        entry(area, "Quechua and Aymara", 2, 4.087, 18),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::scoring::{build_question_plan, entries_for_area};

    #[test]
    fn every_area_covers_sixty_questions() {
        let entries = standard_weightings();
        for area in Area::ordered() {
            let plan = build_question_plan(&entries_for_area(&entries, area));
            assert_eq!(plan.len(), 60, "{} plan length", area.label());
        }
    }

    #[test]
    fn entries_keep_publication_order() {
        let entries = standard_weightings();
        for area in Area::ordered() {
            let orders: Vec<u32> = entries_for_area(&entries, area)
                .iter()
                .map(|entry| entry.order)
                .collect();
            let mut sorted = orders.clone();
            sorted.sort_unstable();
            assert_eq!(orders, sorted);
        }
    }
}
