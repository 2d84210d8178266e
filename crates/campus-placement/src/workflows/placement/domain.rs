use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an account; student and company profiles share it.
    AccountId
);
record_id!(JobId);
record_id!(ApplicationId);
record_id!(InterviewId);
record_id!(DocumentId);
record_id!(AuditLogId);

/// Raised when a stored or submitted label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Role tag attached to every account. Immutable once the account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
    Company,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Company => "company",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
            Role::Company => "Company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            "company" => Ok(Role::Company),
            _ => Err(ParseEnumError::new("role", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Academic departments recognised by the placement cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Branch {
    ComputerScience,
    ElectronicsCommunication,
    Mechanical,
    ElectricalElectronics,
    Civil,
    Chemical,
}

impl Branch {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ComputerScience,
            Self::ElectronicsCommunication,
            Self::Mechanical,
            Self::ElectricalElectronics,
            Self::Civil,
            Self::Chemical,
        ]
    }

    /// Short code used in job criteria, e.g. `CSE`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::ComputerScience => "CSE",
            Self::ElectronicsCommunication => "ECE",
            Self::Mechanical => "ME",
            Self::ElectricalElectronics => "EEE",
            Self::Civil => "Civil",
            Self::Chemical => "Chemical",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ComputerScience => "Computer Science Engineering",
            Self::ElectronicsCommunication => "Electronics and Communication Engineering",
            Self::Mechanical => "Mechanical Engineering",
            Self::ElectricalElectronics => "Electrical and Electronics Engineering",
            Self::Civil => "Civil Engineering",
            Self::Chemical => "Chemical Engineering",
        }
    }

    /// Exact code match after trimming.
    pub fn from_code(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|branch| branch.code() == trimmed)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Branch {
    type Err = ParseEnumError;

    /// Accepts a branch code or the full department name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(branch) = Self::from_code(value) {
            return Ok(branch);
        }

        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|branch| branch.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError::new("branch", value))
    }
}

impl Serialize for Branch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Branch codes a job accepts, kept in the order the company listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AllowedBranches(Vec<Branch>);

impl AllowedBranches {
    pub fn new(branches: impl IntoIterator<Item = Branch>) -> Self {
        let mut unique = Vec::new();
        for branch in branches {
            if !unique.contains(&branch) {
                unique.push(branch);
            }
        }
        Self(unique)
    }

    /// Parses a comma-delimited list of branch codes. Blank entries are skipped.
    pub fn parse(raw: &str) -> Result<Self, ParseEnumError> {
        let mut branches = Vec::new();
        for entry in raw.split(',') {
            let code = entry.trim();
            if code.is_empty() {
                continue;
            }
            let branch =
                Branch::from_code(code).ok_or_else(|| ParseEnumError::new("branch code", code))?;
            branches.push(branch);
        }
        Ok(Self::new(branches))
    }

    pub fn contains(&self, branch: Branch) -> bool {
        self.0.contains(&branch)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Branch> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for AllowedBranches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.0.iter().map(|branch| branch.code()).collect();
        f.write_str(&codes.join(","))
    }
}

impl TryFrom<String> for AllowedBranches {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AllowedBranches> for String {
    fn from(value: AllowedBranches) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub account_id: AccountId,
    pub phone_number: Option<String>,
    pub resume: Option<String>,
    pub cgpa: Option<f32>,
    pub branch: Branch,
    pub graduation_year: Option<i32>,
    pub backlogs: u32,
    pub skills: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub is_placed: bool,
}

impl StudentProfile {
    pub fn new(account_id: AccountId, branch: Branch) -> Self {
        Self {
            account_id,
            phone_number: None,
            resume: None,
            cgpa: None,
            branch,
            graduation_year: None,
            backlogs: 0,
            skills: Vec::new(),
            linkedin_url: None,
            github_url: None,
            is_placed: false,
        }
    }

    /// Share of the optional profile fields the student has filled in, 0-100.
    pub fn completion_pct(&self) -> u8 {
        let filled = [
            self.phone_number.is_some(),
            self.resume.is_some(),
            self.cgpa.is_some(),
            !self.skills.is_empty(),
            self.linkedin_url.is_some(),
            self.github_url.is_some(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count();

        (filled * 100 / 6) as u8
    }

    pub const fn placement_label(&self) -> &'static str {
        if self.is_placed {
            "Placed"
        } else {
            "Not Placed"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub account_id: AccountId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub hr_name: String,
    pub hr_email: String,
    pub is_approved: bool,
}

impl CompanyProfile {
    pub fn new(account_id: AccountId, name: impl Into<String>) -> Self {
        Self {
            account_id,
            name: name.into(),
            description: String::new(),
            website: String::new(),
            hr_name: String::new(),
            hr_email: String::new(),
            is_approved: false,
        }
    }
}

/// The company-editable portion of a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub salary_range: String,
    pub location: String,
    pub application_deadline: NaiveDate,
    #[serde(default)]
    pub min_cgpa: Option<f32>,
    #[serde(default)]
    pub max_backlogs: Option<u32>,
    pub allowed_branches: AllowedBranches,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: AccountId,
    #[serde(flatten)]
    pub details: JobDetails,
    pub is_approved: bool,
    pub posted_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.details.application_deadline
    }

    /// Approved and still accepting applications.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.is_approved && !self.is_expired(today)
    }

    pub fn listing_status(&self, today: NaiveDate) -> JobListingStatus {
        if !self.is_approved {
            JobListingStatus::Pending
        } else if self.is_expired(today) {
            JobListingStatus::Closed
        } else {
            JobListingStatus::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobListingStatus {
    Pending,
    Open,
    Closed,
}

impl JobListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

/// Position of an application in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Interview,
    Offered,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Applied,
            Self::Shortlisted,
            Self::Interview,
            Self::Offered,
            Self::Rejected,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Shortlisted => "shortlisted",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Shortlisted => "Shortlisted",
            Self::Interview => "Interview",
            Self::Offered => "Offered",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("application status", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: AccountId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    #[default]
    Online,
    InPerson,
}

impl InterviewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::InPerson => "in_person",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::InPerson => "In-Person",
        }
    }
}

impl FromStr for InterviewMode {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "in_person" | "in-person" => Ok(Self::InPerson),
            _ => Err(ParseEnumError::new("interview mode", value)),
        }
    }
}

/// What a company submits when scheduling a round for its shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPlan {
    pub interview_date: NaiveDate,
    pub interview_time: NaiveTime,
    pub round_name: String,
    #[serde(default)]
    pub mode: InterviewMode,
    pub venue_or_link: String,
    #[serde(default)]
    pub additional_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSchedule {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    #[serde(flatten)]
    pub plan: InterviewPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub actor: Option<AccountId>,
    pub action: String,
    pub recorded_at: DateTime<Utc>,
}
