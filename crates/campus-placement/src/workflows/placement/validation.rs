//! Input forms accepted by the portal and the checks that turn them into
//! sanitized values before anything touches the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AccountId, ApplicationId, ApplicationStatus, Branch, InterviewPlan, JobDetails, JobId,
    ParseEnumError,
};

pub(crate) const CGPA_MIN: f32 = 0.0;
pub(crate) const CGPA_MAX: f32 = 10.0;

const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Rejected input or a request that breaks a workflow rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        found: f32,
    },
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("{field} must be an http(s) URL")]
    InvalidUrl { field: &'static str },
    #[error(transparent)]
    UnknownValue(#[from] ParseEnumError),
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("unsupported file type for '{file_name}' (expected one of {expected})")]
    UnsupportedFileType {
        file_name: String,
        expected: &'static str,
    },
    #[error("job {job_id} stopped accepting applications on {deadline}")]
    ApplicationsClosed { job_id: JobId, deadline: NaiveDate },
    #[error("company {company_id} has not been approved yet")]
    CompanyNotApproved { company_id: AccountId },
    #[error("job {job_id} is already approved and cannot be rejected")]
    JobAlreadyApproved { job_id: JobId },
    #[error("application {application_id} cannot move from {from} to {to}")]
    InvalidTransition {
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("no applications were selected")]
    EmptySelection,
    #[error("job {job_id} has no shortlisted applications to schedule")]
    NoShortlistedApplications { job_id: JobId },
    #[error("account {account_id} is not a {expected} account")]
    ProfileRoleMismatch {
        account_id: AccountId,
        expected: &'static str,
    },
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidEmail(trimmed.to_string()))
    }
}

fn optional_email(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Ok(String::new())
    } else {
        email(value)
    }
}

fn optional_url(field: &'static str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(url) if url.starts_with("https://") || url.starts_with("http://") => {
            Ok(Some(url.to_string()))
        }
        Some(_) => Err(ValidationError::InvalidUrl { field }),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn cgpa(field: &'static str, value: Option<f32>) -> Result<Option<f32>, ValidationError> {
    match value {
        Some(found) if !(CGPA_MIN..=CGPA_MAX).contains(&found) || found.is_nan() => {
            Err(ValidationError::OutOfRange {
                field,
                min: CGPA_MIN,
                max: CGPA_MAX,
                found,
            })
        }
        other => Ok(other),
    }
}

fn skills(values: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for skill in values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
    {
        if !cleaned.iter().any(|known| known.eq_ignore_ascii_case(skill)) {
            cleaned.push(skill.to_string());
        }
    }
    cleaned
}

fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Accepts `.pdf`, `.doc` and `.docx` resumes.
pub(crate) fn resume_file_name(file_name: &str) -> Result<String, ValidationError> {
    let file_name = required("resume", file_name)?;
    match file_extension(&file_name) {
        Some(ext) if RESUME_EXTENSIONS.contains(&ext.as_str()) => Ok(file_name),
        _ => Err(ValidationError::UnsupportedFileType {
            file_name,
            expected: ".pdf, .doc, .docx",
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRegistration {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub branch: Branch,
    #[serde(default)]
    pub cgpa: Option<f32>,
    #[serde(default)]
    pub backlogs: u32,
}

impl StudentRegistration {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            username: required("username", &self.username)?,
            email: email(&self.email)?,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            branch: self.branch,
            cgpa: cgpa("cgpa", self.cgpa)?,
            backlogs: self.backlogs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    pub username: String,
    pub email: String,
    pub company_name: String,
}

impl CompanyRegistration {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            username: required("username", &self.username)?,
            email: email(&self.email)?,
            company_name: required("company_name", &self.company_name)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRegistration {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl AdminRegistration {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            username: required("username", &self.username)?,
            email: email(&self.email)?,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

/// Contact details any account holder may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

impl AccountUpdate {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: email(&self.email)?,
        })
    }
}

/// Student-editable profile fields. The placement flag is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub cgpa: Option<f32>,
    pub branch: Branch,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub backlogs: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
}

impl StudentProfileUpdate {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        if let Some(year) = self.graduation_year {
            if !(1950..=2100).contains(&year) {
                return Err(ValidationError::OutOfRange {
                    field: "graduation_year",
                    min: 1950.0,
                    max: 2100.0,
                    found: year as f32,
                });
            }
        }

        Ok(Self {
            phone_number: optional_text(self.phone_number.as_deref()),
            cgpa: cgpa("cgpa", self.cgpa)?,
            branch: self.branch,
            graduation_year: self.graduation_year,
            backlogs: self.backlogs,
            skills: skills(&self.skills),
            linkedin_url: optional_url("linkedin_url", self.linkedin_url.as_deref())?,
            github_url: optional_url("github_url", self.github_url.as_deref())?,
        })
    }
}

/// Company-editable profile fields. Approval stays with administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfileUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub hr_name: String,
    #[serde(default)]
    pub hr_email: String,
}

impl CompanyProfileUpdate {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        let website = optional_url("website", Some(&self.website))?.unwrap_or_default();
        Ok(Self {
            name: required("name", &self.name)?,
            description: self.description.trim().to_string(),
            website,
            hr_name: self.hr_name.trim().to_string(),
            hr_email: optional_email(&self.hr_email)?,
        })
    }
}

impl JobDetails {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        if self.allowed_branches.is_empty() {
            return Err(ValidationError::Required {
                field: "allowed_branches",
            });
        }

        Ok(Self {
            title: required("title", &self.title)?,
            description: required("description", &self.description)?,
            salary_range: self.salary_range.trim().to_string(),
            location: required("location", &self.location)?,
            application_deadline: self.application_deadline,
            min_cgpa: cgpa("min_cgpa", self.min_cgpa)?,
            max_backlogs: self.max_backlogs,
            allowed_branches: self.allowed_branches,
        })
    }
}

impl InterviewPlan {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            interview_date: self.interview_date,
            interview_time: self.interview_time,
            round_name: required("round_name", &self.round_name)?,
            mode: self.mode,
            venue_or_link: required("venue_or_link", &self.venue_or_link)?,
            additional_instructions: self.additional_instructions.trim().to_string(),
        })
    }
}

/// Metadata for a document an administrator shares with students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub title: String,
    pub file_name: String,
}

impl DocumentUpload {
    pub(crate) fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", &self.title)?,
            file_name: required("file_name", &self.file_name)?,
        })
    }
}
