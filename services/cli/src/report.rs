use scangrade::grading::ingest::{FileImport, IdentifierSheet, ResponseSheet, NO_ISSUES};
use scangrade::grading::scoring::ScoringRun;

/// Columns shared by the sheet variants when listing inspection output.
pub(crate) trait InspectRow {
    fn reference(&self) -> String;
    fn observation(&self) -> &str;
}

impl InspectRow for IdentifierSheet {
    fn reference(&self) -> String {
        format!("{} {} {}", self.sequence, self.national_id, self.litho)
    }

    fn observation(&self) -> &str {
        &self.observation
    }
}

impl InspectRow for ResponseSheet {
    fn reference(&self) -> String {
        format!("{} {} {}", self.sequence, self.national_id, self.litho)
    }

    fn observation(&self) -> &str {
        &self.observation
    }
}

pub(crate) fn render_file_import<T: InspectRow>(import: &FileImport<T>) {
    let summary = &import.summary;
    println!(
        "\n{} — {} content lines, {} rows, {} errors",
        summary.name, summary.total_lines, summary.valid_rows, summary.error_count
    );

    let flagged: Vec<&T> = import
        .rows
        .iter()
        .filter(|row| row.observation() != NO_ISSUES)
        .collect();
    if flagged.is_empty() {
        println!("  all rows clean");
    } else {
        println!("  {} row(s) with observations:", flagged.len());
        for row in flagged {
            println!("    {:<28} {}", row.reference(), row.observation());
        }
    }

    for diagnostic in &import.diagnostics {
        println!("    {diagnostic}");
    }
}

pub(crate) fn render_run(run: &ScoringRun) {
    let summary = &run.summary;
    println!("Scoring run — {} area", summary.area.label());
    println!("run at {}", summary.run_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    if run.results.is_empty() {
        println!("no candidates scored");
    } else {
        println!("{:>4}  {:<10} {:<32} {:>9}", "#", "document", "candidate", "score");
        for (position, result) in run.results.iter().enumerate() {
            let name = format!("{} {}", result.surnames, result.given_names);
            println!(
                "{:>4}  {:<10} {:<32} {:>9.2}",
                position + 1,
                result.national_id,
                name.trim(),
                result.score
            );
        }
    }

    println!();
    println!("candidates registered: {}", summary.total_candidates);
    println!("candidates scored: {}", run.results.len());
    println!("missing response sheets: {}", summary.missing_responses);
    println!("missing answer keys: {}", summary.missing_keys);
    println!("unlinked responses: {}", summary.unlinked_responses);
    println!("total plan weight: {:.3}", summary.total_weight);
}
