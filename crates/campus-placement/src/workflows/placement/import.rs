//! Bulk student registration from a CSV upload.
//!
//! Expected header: `username,password,email,first_name,last_name,branch,cgpa,backlogs`.
//! Passwords belong to the external identity provider and are ignored here.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::Branch;
use super::validation::StudentRegistration;

pub const STUDENT_IMPORT_HEADER: [&str; 8] = [
    "username",
    "password",
    "email",
    "first_name",
    "last_name",
    "branch",
    "cgpa",
    "backlogs",
];

const REQUIRED_COLUMNS: [&str; 4] = ["username", "email", "branch", "first_name"];

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidRow { line: u64, reason: String },
    Empty,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read student import: {}", err),
            ImportError::Csv(err) => write!(f, "invalid student CSV data: {}", err),
            ImportError::MissingColumn(column) => {
                write!(f, "student CSV is missing the `{}` column", column)
            }
            ImportError::InvalidRow { line, reason } => {
                write!(f, "student CSV line {}: {}", line, reason)
            }
            ImportError::Empty => write!(f, "student CSV contains no rows"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One validated row and the CSV line it came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportedStudent {
    pub(crate) line: u64,
    pub(crate) registration: StudentRegistration,
}

pub(crate) fn parse_students<R: Read>(reader: R) -> Result<Vec<ImportedStudent>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(ImportError::MissingColumn(missing));
    }

    let mut students = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: StudentImportRow = record
            .deserialize(Some(&headers))
            .map_err(|err| invalid(line, err.to_string()))?;
        students.push(ImportedStudent {
            line,
            registration: row.into_registration(line)?,
        });
    }

    if students.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(students)
}

fn invalid(line: u64, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidRow {
        line,
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize)]
struct StudentImportRow {
    username: String,
    email: String,
    first_name: String,
    #[serde(default)]
    last_name: String,
    branch: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cgpa: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    backlogs: Option<String>,
}

impl StudentImportRow {
    fn into_registration(self, line: u64) -> Result<StudentRegistration, ImportError> {
        let branch: Branch = self
            .branch
            .parse()
            .map_err(|err: super::domain::ParseEnumError| invalid(line, err.to_string()))?;
        let cgpa = self
            .cgpa
            .map(|raw| {
                raw.parse::<f32>()
                    .map_err(|_| invalid(line, format!("cgpa `{}` is not a number", raw)))
            })
            .transpose()?;
        let backlogs = self
            .backlogs
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| {
                    invalid(line, format!("backlogs `{}` is not a whole number", raw))
                })
            })
            .transpose()?
            .unwrap_or(0);

        StudentRegistration {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            branch,
            cgpa,
            backlogs,
        }
        .validate()
        .map_err(|err| invalid(line, err.to_string()))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
