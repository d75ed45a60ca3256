use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ingest::{normalize_text, strip_digits, Area};

/// One candidate eligible for scoring in an area. Supplied externally, most
/// often exported from the registrar's spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub national_id: String,
    pub surnames: String,
    pub given_names: String,
    pub area: Area,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster data: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster has no national id column")]
    MissingNationalIdColumn,
}

pub fn read_roster_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterImportError> {
    let file = File::open(path)?;
    read_roster(file)
}

/// Reads roster rows from CSV. Headers are matched against an alias table
/// covering English names and the legacy Spanish exports ("dni",
/// "apellido paterno", "área", ...). Rows without any national id digits are
/// skipped with a warning.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = RosterColumns::resolve(&headers)?;

    let mut entries = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let national_id = strip_digits(field(&record, Some(columns.national_id)));
        if national_id.is_empty() {
            warn!(row = index + 2, "roster row skipped: no national id digits");
            continue;
        }

        entries.push(RosterEntry {
            national_id,
            surnames: columns.surnames(&record),
            given_names: field(&record, columns.given_names).to_string(),
            area: Area::normalized(field(&record, columns.area)),
        });
    }

    Ok(entries)
}

const NATIONAL_ID_ALIASES: &[&str] = &[
    "national id",
    "national_id",
    "dni",
    "documento",
    "document",
    "numdoc",
];
const SURNAME_ALIASES: &[&str] = &["surnames", "last names", "apellidos"];
const PATERNAL_ALIASES: &[&str] = &["paterno", "apellido paterno", "paternal surname"];
const MATERNAL_ALIASES: &[&str] = &["materno", "apellido materno", "maternal surname"];
const GIVEN_NAME_ALIASES: &[&str] = &["given names", "given_names", "names", "nombres", "nombre"];
const AREA_ALIASES: &[&str] = &["area", "track", "specialty", "especialidad"];

struct RosterColumns {
    national_id: usize,
    surnames: SurnameColumns,
    given_names: Option<usize>,
    area: Option<usize>,
}

enum SurnameColumns {
    Single(usize),
    Split {
        paternal: usize,
        maternal: Option<usize>,
    },
    Absent,
}

impl RosterColumns {
    fn resolve(headers: &StringRecord) -> Result<Self, RosterImportError> {
        let normalized: Vec<String> = headers.iter().map(normalize_text).collect();
        let find = |aliases: &[&str]| {
            normalized
                .iter()
                .position(|header| aliases.iter().any(|alias| header == alias))
        };

        let national_id = find(NATIONAL_ID_ALIASES)
            .ok_or(RosterImportError::MissingNationalIdColumn)?;

        // Legacy exports split the surname into paternal/maternal columns.
        let surnames = match find(SURNAME_ALIASES) {
            Some(index) => SurnameColumns::Single(index),
            None => match find(PATERNAL_ALIASES) {
                Some(paternal) => SurnameColumns::Split {
                    paternal,
                    maternal: find(MATERNAL_ALIASES),
                },
                None => SurnameColumns::Absent,
            },
        };

        Ok(Self {
            national_id,
            surnames,
            given_names: find(GIVEN_NAME_ALIASES),
            area: find(AREA_ALIASES),
        })
    }

    fn surnames(&self, record: &StringRecord) -> String {
        match self.surnames {
            SurnameColumns::Single(index) => field(record, Some(index)).to_string(),
            SurnameColumns::Split { paternal, maternal } => {
                let paternal = field(record, Some(paternal));
                let maternal = field(record, maternal);
                [paternal, maternal]
                    .iter()
                    .filter(|part| !part.is_empty())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            SurnameColumns::Absent => String::new(),
        }
    }
}

fn field<'a>(record: &'a StringRecord, index: Option<usize>) -> &'a str {
    index
        .and_then(|index| record.get(index))
        .unwrap_or_default()
        .trim()
}
