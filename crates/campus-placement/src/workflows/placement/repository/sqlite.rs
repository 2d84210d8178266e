use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Params, Row};

use super::{
    NewAccount, NewApplication, NewAuditEntry, NewDocument, NewJob, PlacementReader,
    PlacementStore, PlacementTx, RepositoryError, APPLICATION_CONSTRAINT,
    COMPANY_PROFILE_CONSTRAINT, PROFILE_ROLE_CONSTRAINT, STUDENT_PROFILE_CONSTRAINT,
    USERNAME_CONSTRAINT,
};
use crate::workflows::placement::domain::{
    Account, AccountId, AllowedBranches, Application, ApplicationId, ApplicationStatus,
    AuditLogEntry, AuditLogId, CompanyProfile, Document, DocumentId, InterviewId, InterviewPlan,
    InterviewSchedule, JobDetails, JobId, JobPosting, Role, StudentProfile,
};

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL CHECK (role IN ('admin', 'student', 'company')),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS student_profiles (
    account_id INTEGER PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
    phone_number TEXT,
    resume TEXT,
    cgpa REAL CHECK (cgpa IS NULL OR (cgpa >= 0.0 AND cgpa <= 10.0)),
    branch TEXT NOT NULL,
    graduation_year INTEGER,
    backlogs INTEGER NOT NULL DEFAULT 0 CHECK (backlogs >= 0),
    skills TEXT NOT NULL DEFAULT '',
    linkedin_url TEXT,
    github_url TEXT,
    is_placed INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS company_profiles (
    account_id INTEGER PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    website TEXT NOT NULL DEFAULT '',
    hr_name TEXT NOT NULL DEFAULT '',
    hr_email TEXT NOT NULL DEFAULT '',
    is_approved INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company_profiles(account_id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    salary_range TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL,
    application_deadline TEXT NOT NULL,
    min_cgpa REAL,
    max_backlogs INTEGER,
    allowed_branches TEXT NOT NULL,
    is_approved INTEGER NOT NULL DEFAULT 0,
    posted_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
    student_id INTEGER NOT NULL REFERENCES student_profiles(account_id) ON DELETE CASCADE,
    status TEXT NOT NULL CHECK (status IN ('applied', 'shortlisted', 'interview', 'offered', 'rejected')),
    applied_at TEXT NOT NULL,
    UNIQUE (job_id, student_id)
);

CREATE TABLE IF NOT EXISTS interviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    interview_date TEXT NOT NULL,
    interview_time TEXT NOT NULL,
    round_name TEXT NOT NULL,
    mode TEXT NOT NULL CHECK (mode IN ('online', 'in_person')),
    venue_or_link TEXT NOT NULL,
    additional_instructions TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    file_name TEXT NOT NULL,
    content_type TEXT NOT NULL,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id INTEGER REFERENCES accounts(id) ON DELETE SET NULL,
    action TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs(company_id);
CREATE INDEX IF NOT EXISTS idx_applications_student ON applications(student_id);
CREATE INDEX IF NOT EXISTS idx_interviews_application ON interviews(application_id);
"#;

const ACCOUNT_COLUMNS: &str =
    "SELECT id, username, email, first_name, last_name, role, created_at FROM accounts";
const STUDENT_COLUMNS: &str = "SELECT account_id, phone_number, resume, cgpa, branch, \
     graduation_year, backlogs, skills, linkedin_url, github_url, is_placed FROM student_profiles";
const COMPANY_COLUMNS: &str = "SELECT account_id, name, description, website, hr_name, \
     hr_email, is_approved FROM company_profiles";
const JOB_COLUMNS: &str = "SELECT id, company_id, title, description, salary_range, location, \
     application_deadline, min_cgpa, max_backlogs, allowed_branches, is_approved, posted_at FROM jobs";
const APPLICATION_COLUMNS: &str =
    "SELECT id, job_id, student_id, status, applied_at FROM applications";
const INTERVIEW_COLUMNS: &str = "SELECT id, application_id, interview_date, interview_time, \
     round_name, mode, venue_or_link, additional_instructions FROM interviews";
const DOCUMENT_COLUMNS: &str =
    "SELECT id, title, file_name, content_type, uploaded_at FROM documents";
const AUDIT_COLUMNS: &str = "SELECT id, actor_id, action, recorded_at FROM audit_log";

/// SQLite-backed store: one connection, serialized behind a mutex.
pub struct SqlitePlacementStore {
    conn: Mutex<Connection>,
}

impl SqlitePlacementStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("sqlite connection lock poisoned".to_string())
}

impl PlacementStore for SqlitePlacementStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.conn.lock().map_err(poisoned)?;
        let tx = conn.transaction().map_err(RepositoryError::from)?;
        let value = {
            let mut view = SqliteTx { conn: &tx };
            work(&mut view)?
        };
        tx.commit().map_err(RepositoryError::from)?;
        Ok(value)
    }

    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.conn.lock().map_err(poisoned)?;
        // Dropped without commit; a read never writes.
        let tx = conn.transaction().map_err(RepositoryError::from)?;
        let view = SqliteTx { conn: &tx };
        work(&view)
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(error: rusqlite::Error) -> Self {
        match &error {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let message = message.as_deref().unwrap_or_default();
                if message.contains("FOREIGN KEY") {
                    return RepositoryError::NotFound;
                }
                let constraint = if message.contains("accounts.username") {
                    USERNAME_CONSTRAINT
                } else if message.contains("applications.job_id") {
                    APPLICATION_CONSTRAINT
                } else if message.contains("student_profiles.account_id") {
                    STUDENT_PROFILE_CONSTRAINT
                } else if message.contains("company_profiles.account_id") {
                    COMPANY_PROFILE_CONSTRAINT
                } else {
                    message
                };
                RepositoryError::conflict(constraint)
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound,
            _ => RepositoryError::Unavailable(error.to_string()),
        }
    }
}

/// Identifiers beyond `i64::MAX` were never issued, so they map to a key no row has.
fn key(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(-1)
}

fn column_u64(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn column_u32(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn column_parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn column_cgpa(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f32>> {
    let raw: Option<f64> = row.get(idx)?;
    Ok(raw.map(|value| value as f32))
}

fn account_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: AccountId(column_u64(row, 0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        role: column_parsed::<Role>(row, 5)?,
        created_at: row.get(6)?,
    })
}

fn student_row(row: &Row<'_>) -> rusqlite::Result<StudentProfile> {
    let skills: String = row.get(7)?;
    Ok(StudentProfile {
        account_id: AccountId(column_u64(row, 0)?),
        phone_number: row.get(1)?,
        resume: row.get(2)?,
        cgpa: column_cgpa(row, 3)?,
        branch: column_parsed(row, 4)?,
        graduation_year: row.get(5)?,
        backlogs: column_u32(row, 6)?,
        skills: skills
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect(),
        linkedin_url: row.get(8)?,
        github_url: row.get(9)?,
        is_placed: row.get(10)?,
    })
}

fn company_row(row: &Row<'_>) -> rusqlite::Result<CompanyProfile> {
    Ok(CompanyProfile {
        account_id: AccountId(column_u64(row, 0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        website: row.get(3)?,
        hr_name: row.get(4)?,
        hr_email: row.get(5)?,
        is_approved: row.get(6)?,
    })
}

fn job_row(row: &Row<'_>) -> rusqlite::Result<JobPosting> {
    let branches: String = row.get(9)?;
    let allowed_branches = AllowedBranches::parse(&branches)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(err)))?;
    let max_backlogs = match row.get::<_, Option<i64>>(8)? {
        Some(_) => Some(column_u32(row, 8)?),
        None => None,
    };

    Ok(JobPosting {
        id: JobId(column_u64(row, 0)?),
        company_id: AccountId(column_u64(row, 1)?),
        details: JobDetails {
            title: row.get(2)?,
            description: row.get(3)?,
            salary_range: row.get(4)?,
            location: row.get(5)?,
            application_deadline: row.get(6)?,
            min_cgpa: column_cgpa(row, 7)?,
            max_backlogs,
            allowed_branches,
        },
        is_approved: row.get(10)?,
        posted_at: row.get(11)?,
    })
}

fn application_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: ApplicationId(column_u64(row, 0)?),
        job_id: JobId(column_u64(row, 1)?),
        student_id: AccountId(column_u64(row, 2)?),
        status: column_parsed(row, 3)?,
        applied_at: row.get(4)?,
    })
}

fn interview_row(row: &Row<'_>) -> rusqlite::Result<InterviewSchedule> {
    Ok(InterviewSchedule {
        id: InterviewId(column_u64(row, 0)?),
        application_id: ApplicationId(column_u64(row, 1)?),
        plan: InterviewPlan {
            interview_date: row.get(2)?,
            interview_time: row.get(3)?,
            round_name: row.get(4)?,
            mode: column_parsed(row, 5)?,
            venue_or_link: row.get(6)?,
            additional_instructions: row.get(7)?,
        },
    })
}

fn document_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: DocumentId(column_u64(row, 0)?),
        title: row.get(1)?,
        file_name: row.get(2)?,
        content_type: row.get(3)?,
        uploaded_at: row.get(4)?,
    })
}

fn audit_row(row: &Row<'_>) -> rusqlite::Result<AuditLogEntry> {
    let actor = match row.get::<_, Option<i64>>(1)? {
        Some(_) => Some(AccountId(column_u64(row, 1)?)),
        None => None,
    };
    Ok(AuditLogEntry {
        id: AuditLogId(column_u64(row, 0)?),
        actor,
        action: row.get(2)?,
        recorded_at: row.get(3)?,
    })
}

struct SqliteTx<'conn> {
    conn: &'conn Connection,
}

impl SqliteTx<'_> {
    fn all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, RepositoryError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn first<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, RepositoryError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.conn.query_row(sql, params, map).optional()?)
    }

    fn require_changed(changed: usize) -> Result<(), RepositoryError> {
        if changed == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn require_role(&self, id: AccountId, role: Role) -> Result<(), RepositoryError> {
        let found = self.first(
            "SELECT role FROM accounts WHERE id = ?1",
            [key(id.0)],
            |row| column_parsed::<Role>(row, 0),
        )?;
        match found {
            None => Err(RepositoryError::NotFound),
            Some(actual) if actual != role => Err(RepositoryError::conflict(PROFILE_ROLE_CONSTRAINT)),
            Some(_) => Ok(()),
        }
    }

    fn last_id(&self) -> Result<u64, RepositoryError> {
        let raw = self.conn.last_insert_rowid();
        u64::try_from(raw).map_err(|_| {
            RepositoryError::Unavailable(format!("sqlite returned negative rowid {raw}"))
        })
    }
}

impl PlacementReader for SqliteTx<'_> {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        self.first(
            &format!("{ACCOUNT_COLUMNS} WHERE id = ?1"),
            [key(id.0)],
            account_row,
        )
    }

    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        self.first(
            &format!("{ACCOUNT_COLUMNS} WHERE username = ?1"),
            [username],
            account_row,
        )
    }

    fn accounts(&self, role: Role) -> Result<Vec<Account>, RepositoryError> {
        self.all(
            &format!("{ACCOUNT_COLUMNS} WHERE role = ?1 ORDER BY id"),
            [role.as_str()],
            account_row,
        )
    }

    fn student_profile(&self, id: AccountId) -> Result<Option<StudentProfile>, RepositoryError> {
        self.first(
            &format!("{STUDENT_COLUMNS} WHERE account_id = ?1"),
            [key(id.0)],
            student_row,
        )
    }

    fn student_profiles(&self) -> Result<Vec<StudentProfile>, RepositoryError> {
        self.all(
            &format!("{STUDENT_COLUMNS} ORDER BY account_id"),
            [],
            student_row,
        )
    }

    fn company_profile(&self, id: AccountId) -> Result<Option<CompanyProfile>, RepositoryError> {
        self.first(
            &format!("{COMPANY_COLUMNS} WHERE account_id = ?1"),
            [key(id.0)],
            company_row,
        )
    }

    fn company_profiles(&self) -> Result<Vec<CompanyProfile>, RepositoryError> {
        self.all(
            &format!("{COMPANY_COLUMNS} ORDER BY account_id"),
            [],
            company_row,
        )
    }

    fn job(&self, id: JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.first(&format!("{JOB_COLUMNS} WHERE id = ?1"), [key(id.0)], job_row)
    }

    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        self.all(&format!("{JOB_COLUMNS} ORDER BY id"), [], job_row)
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.first(
            &format!("{APPLICATION_COLUMNS} WHERE id = ?1"),
            [key(id.0)],
            application_row,
        )
    }

    fn application_for(
        &self,
        job_id: JobId,
        student_id: AccountId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.first(
            &format!("{APPLICATION_COLUMNS} WHERE job_id = ?1 AND student_id = ?2"),
            [key(job_id.0), key(student_id.0)],
            application_row,
        )
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        self.all(
            &format!("{APPLICATION_COLUMNS} ORDER BY id"),
            [],
            application_row,
        )
    }

    fn interviews(&self) -> Result<Vec<InterviewSchedule>, RepositoryError> {
        self.all(
            &format!("{INTERVIEW_COLUMNS} ORDER BY id"),
            [],
            interview_row,
        )
    }

    fn documents(&self) -> Result<Vec<Document>, RepositoryError> {
        self.all(&format!("{DOCUMENT_COLUMNS} ORDER BY id"), [], document_row)
    }

    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        self.all(&format!("{AUDIT_COLUMNS} ORDER BY id"), [], audit_row)
    }
}

impl PlacementTx for SqliteTx<'_> {
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, RepositoryError> {
        self.conn.execute(
            "INSERT INTO accounts (username, email, first_name, last_name, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.username,
                account.email,
                account.first_name,
                account.last_name,
                account.role.as_str(),
                account.created_at,
            ],
        )?;

        Ok(Account {
            id: AccountId(self.last_id()?),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role: account.role,
            created_at: account.created_at,
        })
    }

    fn update_account(&mut self, account: &Account) -> Result<(), RepositoryError> {
        let changed = self.conn.execute(
            "UPDATE accounts SET email = ?1, first_name = ?2, last_name = ?3 WHERE id = ?4",
            params![
                account.email,
                account.first_name,
                account.last_name,
                key(account.id.0)
            ],
        )?;
        Self::require_changed(changed)
    }

    fn insert_student_profile(&mut self, profile: StudentProfile) -> Result<(), RepositoryError> {
        self.require_role(profile.account_id, Role::Student)?;
        self.conn.execute(
            "INSERT INTO student_profiles (account_id, phone_number, resume, cgpa, branch,
                 graduation_year, backlogs, skills, linkedin_url, github_url, is_placed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                key(profile.account_id.0),
                profile.phone_number,
                profile.resume,
                profile.cgpa.map(f64::from),
                profile.branch.code(),
                profile.graduation_year,
                i64::from(profile.backlogs),
                profile.skills.join(","),
                profile.linkedin_url,
                profile.github_url,
                profile.is_placed,
            ],
        )?;
        Ok(())
    }

    fn update_student_profile(&mut self, profile: &StudentProfile) -> Result<(), RepositoryError> {
        let changed = self.conn.execute(
            "UPDATE student_profiles SET phone_number = ?1, resume = ?2, cgpa = ?3, branch = ?4,
                 graduation_year = ?5, backlogs = ?6, skills = ?7, linkedin_url = ?8,
                 github_url = ?9, is_placed = ?10
             WHERE account_id = ?11",
            params![
                profile.phone_number,
                profile.resume,
                profile.cgpa.map(f64::from),
                profile.branch.code(),
                profile.graduation_year,
                i64::from(profile.backlogs),
                profile.skills.join(","),
                profile.linkedin_url,
                profile.github_url,
                profile.is_placed,
                key(profile.account_id.0),
            ],
        )?;
        Self::require_changed(changed)
    }

    fn insert_company_profile(&mut self, profile: CompanyProfile) -> Result<(), RepositoryError> {
        self.require_role(profile.account_id, Role::Company)?;
        self.conn.execute(
            "INSERT INTO company_profiles (account_id, name, description, website, hr_name,
                 hr_email, is_approved)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                key(profile.account_id.0),
                profile.name,
                profile.description,
                profile.website,
                profile.hr_name,
                profile.hr_email,
                profile.is_approved,
            ],
        )?;
        Ok(())
    }

    fn update_company_profile(&mut self, profile: &CompanyProfile) -> Result<(), RepositoryError> {
        let changed = self.conn.execute(
            "UPDATE company_profiles SET name = ?1, description = ?2, website = ?3, hr_name = ?4,
                 hr_email = ?5, is_approved = ?6
             WHERE account_id = ?7",
            params![
                profile.name,
                profile.description,
                profile.website,
                profile.hr_name,
                profile.hr_email,
                profile.is_approved,
                key(profile.account_id.0),
            ],
        )?;
        Self::require_changed(changed)
    }

    fn insert_job(&mut self, job: NewJob) -> Result<JobPosting, RepositoryError> {
        let details = &job.details;
        self.conn.execute(
            "INSERT INTO jobs (company_id, title, description, salary_range, location,
                 application_deadline, min_cgpa, max_backlogs, allowed_branches, is_approved,
                 posted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10)",
            params![
                key(job.company_id.0),
                details.title,
                details.description,
                details.salary_range,
                details.location,
                details.application_deadline,
                details.min_cgpa.map(f64::from),
                details.max_backlogs.map(i64::from),
                details.allowed_branches.to_string(),
                job.posted_at,
            ],
        )?;

        Ok(JobPosting {
            id: JobId(self.last_id()?),
            company_id: job.company_id,
            details: job.details,
            is_approved: false,
            posted_at: job.posted_at,
        })
    }

    fn update_job(&mut self, job: &JobPosting) -> Result<(), RepositoryError> {
        let details = &job.details;
        let changed = self.conn.execute(
            "UPDATE jobs SET title = ?1, description = ?2, salary_range = ?3, location = ?4,
                 application_deadline = ?5, min_cgpa = ?6, max_backlogs = ?7,
                 allowed_branches = ?8, is_approved = ?9
             WHERE id = ?10",
            params![
                details.title,
                details.description,
                details.salary_range,
                details.location,
                details.application_deadline,
                details.min_cgpa.map(f64::from),
                details.max_backlogs.map(i64::from),
                details.allowed_branches.to_string(),
                job.is_approved,
                key(job.id.0),
            ],
        )?;
        Self::require_changed(changed)
    }

    fn delete_job(&mut self, id: JobId) -> Result<(), RepositoryError> {
        let changed = self
            .conn
            .execute("DELETE FROM jobs WHERE id = ?1", [key(id.0)])?;
        Self::require_changed(changed)
    }

    fn insert_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Application, RepositoryError> {
        self.conn.execute(
            "INSERT INTO applications (job_id, student_id, status, applied_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                key(application.job_id.0),
                key(application.student_id.0),
                ApplicationStatus::Applied.as_str(),
                application.applied_at,
            ],
        )?;

        Ok(Application {
            id: ApplicationId(self.last_id()?),
            job_id: application.job_id,
            student_id: application.student_id,
            status: ApplicationStatus::Applied,
            applied_at: application.applied_at,
        })
    }

    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let changed = self.conn.execute(
            "UPDATE applications SET status = ?1 WHERE id = ?2",
            params![status.as_str(), key(id.0)],
        )?;
        Self::require_changed(changed)
    }

    fn insert_interview(
        &mut self,
        application_id: ApplicationId,
        plan: &InterviewPlan,
    ) -> Result<InterviewSchedule, RepositoryError> {
        self.conn.execute(
            "INSERT INTO interviews (application_id, interview_date, interview_time, round_name,
                 mode, venue_or_link, additional_instructions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                key(application_id.0),
                plan.interview_date,
                plan.interview_time,
                plan.round_name,
                plan.mode.as_str(),
                plan.venue_or_link,
                plan.additional_instructions,
            ],
        )?;

        Ok(InterviewSchedule {
            id: InterviewId(self.last_id()?),
            application_id,
            plan: plan.clone(),
        })
    }

    fn insert_document(&mut self, document: NewDocument) -> Result<Document, RepositoryError> {
        self.conn.execute(
            "INSERT INTO documents (title, file_name, content_type, uploaded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                document.title,
                document.file_name,
                document.content_type,
                document.uploaded_at,
            ],
        )?;

        Ok(Document {
            id: DocumentId(self.last_id()?),
            title: document.title,
            file_name: document.file_name,
            content_type: document.content_type,
            uploaded_at: document.uploaded_at,
        })
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<(), RepositoryError> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", [key(id.0)])?;
        Self::require_changed(changed)
    }

    fn append_audit(&mut self, entry: NewAuditEntry) -> Result<AuditLogEntry, RepositoryError> {
        self.conn.execute(
            "INSERT INTO audit_log (actor_id, action, recorded_at) VALUES (?1, ?2, ?3)",
            params![
                entry.actor.map(|actor| key(actor.0)),
                entry.action,
                entry.recorded_at,
            ],
        )?;

        Ok(AuditLogEntry {
            id: AuditLogId(self.last_id()?),
            actor: entry.actor,
            action: entry.action,
            recorded_at: entry.recorded_at,
        })
    }
}
