use std::io::Read;

use serde::Deserialize;

use super::accounts::create_student;
use super::jobs::contains_ignore_case;
use super::{audit, PlacementService, PlacementServiceError};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::{
    AuditLogEntry, Document, DocumentId, JobPosting, Role, StudentProfile,
};
use crate::workflows::placement::export::{write_jobs, write_students};
use crate::workflows::placement::import::{parse_students, ImportError};
use crate::workflows::placement::report::views::{
    AUDIT_LOG_PER_PAGE, COMPANIES_PER_PAGE, INTERVIEWS_PER_PAGE, JOBS_PER_PAGE, STUDENTS_PER_PAGE,
};
use crate::workflows::placement::report::{
    AdminJobView, CompanyRow, ImportSummary, InterviewView, Page, Snapshot, StudentRow,
};
use crate::workflows::placement::repository::{NewDocument, PlacementStore, RepositoryError};
use crate::workflows::placement::validation::{DocumentUpload, ValidationError};

/// Case-insensitive substring filters for the admin job list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InterviewFilter {
    #[serde(default)]
    pub company: Option<String>,
}

/// `branch` matches code or department name; `status` is `placed` or `unplaced`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentExportFilter {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl StudentExportFilter {
    fn matches(&self, profile: &StudentProfile) -> bool {
        let branch = self.branch.as_deref();
        let branch_matches = contains_ignore_case(profile.branch.code(), branch)
            || contains_ignore_case(profile.branch.label(), branch);

        let status_matches = match self.status.as_deref().map(str::trim) {
            Some(status) if status.eq_ignore_ascii_case("placed") => profile.is_placed,
            Some(status) if status.eq_ignore_ascii_case("unplaced") => !profile.is_placed,
            _ => true,
        };

        branch_matches && status_matches
    }
}

fn student_rows(snapshot: &Snapshot) -> Vec<StudentRow> {
    let mut rows: Vec<StudentRow> = snapshot
        .students
        .iter()
        .filter_map(|profile| {
            snapshot.accounts.get(&profile.account_id).map(|account| StudentRow {
                account: account.clone(),
                profile: profile.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.account
            .first_name
            .cmp(&b.account.first_name)
            .then(a.account.id.cmp(&b.account.id))
    });
    rows
}

fn admin_job_views(
    snapshot: &Snapshot,
    today: chrono::NaiveDate,
    filter: &JobFilter,
) -> Vec<AdminJobView> {
    let mut jobs: Vec<&JobPosting> = snapshot.jobs.iter().collect();
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));

    jobs.into_iter()
        .map(|job| AdminJobView {
            job: job.clone(),
            company_name: snapshot.company_name(job.company_id),
            status: job.listing_status(today),
            applicant_count: snapshot.applicant_count(job.id),
        })
        .filter(|view| {
            contains_ignore_case(&view.job.details.title, filter.title.as_deref())
                && contains_ignore_case(&view.company_name, filter.company.as_deref())
        })
        .collect()
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    /// Students ordered by first name.
    pub fn list_students(
        &self,
        actor: &Actor,
        page: usize,
    ) -> Result<Page<StudentRow>, PlacementServiceError> {
        authorize(actor, Role::Admin, "list_students")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;
        Ok(Page::paginate(
            student_rows(&snapshot),
            page,
            STUDENTS_PER_PAGE,
        ))
    }

    pub fn list_companies(
        &self,
        actor: &Actor,
        page: usize,
    ) -> Result<Page<CompanyRow>, PlacementServiceError> {
        authorize(actor, Role::Admin, "list_companies")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let mut rows: Vec<CompanyRow> = snapshot
            .companies
            .iter()
            .filter_map(|profile| {
                snapshot.accounts.get(&profile.account_id).map(|account| CompanyRow {
                    account: account.clone(),
                    profile: profile.clone(),
                    job_count: snapshot
                        .jobs
                        .iter()
                        .filter(|job| job.company_id == profile.account_id)
                        .count(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.profile
                .name
                .cmp(&b.profile.name)
                .then(a.account.id.cmp(&b.account.id))
        });

        Ok(Page::paginate(rows, page, COMPANIES_PER_PAGE))
    }

    /// Every job regardless of approval, newest first.
    pub fn list_jobs(
        &self,
        actor: &Actor,
        filter: &JobFilter,
        page: usize,
    ) -> Result<Page<AdminJobView>, PlacementServiceError> {
        authorize(actor, Role::Admin, "list_jobs")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;
        Ok(Page::paginate(
            admin_job_views(&snapshot, today, filter),
            page,
            JOBS_PER_PAGE,
        ))
    }

    /// All interviews, latest date first.
    pub fn list_interviews(
        &self,
        actor: &Actor,
        filter: &InterviewFilter,
        page: usize,
    ) -> Result<Page<InterviewView>, PlacementServiceError> {
        authorize(actor, Role::Admin, "list_interviews")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let mut views: Vec<InterviewView> = snapshot
            .interviews_where(|_| true)
            .into_iter()
            .map(|interview| snapshot.interview_view(interview, today))
            .filter(|view| contains_ignore_case(&view.company_name, filter.company.as_deref()))
            .collect();
        views.reverse();

        Ok(Page::paginate(views, page, INTERVIEWS_PER_PAGE))
    }

    pub fn audit_log(
        &self,
        actor: &Actor,
        page: usize,
    ) -> Result<Page<AuditLogEntry>, PlacementServiceError> {
        authorize(actor, Role::Admin, "audit_log")?;
        let mut entries = self
            .store
            .read(|reader| Ok::<_, PlacementServiceError>(reader.audit_log()?))?;
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        Ok(Page::paginate(entries, page, AUDIT_LOG_PER_PAGE))
    }

    /// Records document metadata; the content type is guessed from the extension.
    pub fn upload_document(
        &self,
        actor: &Actor,
        upload: DocumentUpload,
    ) -> Result<Document, PlacementServiceError> {
        authorize(actor, Role::Admin, "upload_document")?;
        let upload = upload.validate()?;
        let now = self.now();
        let content_type = mime_guess::from_path(&upload.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let document = self.store.transaction(|tx| {
            let document = tx.insert_document(NewDocument {
                title: upload.title,
                file_name: upload.file_name,
                content_type,
                uploaded_at: now,
            })?;
            audit(
                tx,
                Some(actor.account_id),
                format!("Document uploaded: {}", document.title),
                now,
            )?;
            Ok::<_, PlacementServiceError>(document)
        })?;

        tracing::info!(
            document_id = document.id.0,
            content_type = %document.content_type,
            "document uploaded"
        );
        Ok(document)
    }

    /// Newest uploads first.
    pub fn documents(&self, actor: &Actor) -> Result<Vec<Document>, PlacementServiceError> {
        authorize(actor, Role::Admin, "documents")?;
        let mut documents = self
            .store
            .read(|reader| Ok::<_, PlacementServiceError>(reader.documents()?))?;
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(documents)
    }

    pub fn delete_document(
        &self,
        actor: &Actor,
        document_id: DocumentId,
    ) -> Result<(), PlacementServiceError> {
        authorize(actor, Role::Admin, "delete_document")?;
        let now = self.now();

        self.store.transaction(|tx| {
            let title = tx
                .documents()?
                .into_iter()
                .find(|document| document.id == document_id)
                .map(|document| document.title)
                .ok_or_else(|| PlacementServiceError::not_found("document", document_id.0))?;

            tx.delete_document(document_id).map_err(|err| match err {
                RepositoryError::NotFound => {
                    PlacementServiceError::not_found("document", document_id.0)
                }
                other => other.into(),
            })?;
            audit(
                tx,
                Some(actor.account_id),
                format!("Document deleted: {}", title),
                now,
            )?;
            Ok::<_, PlacementServiceError>(())
        })?;

        tracing::info!(document_id = document_id.0, "document deleted");
        Ok(())
    }

    /// Students report as CSV bytes, ordered like the admin student list.
    pub fn export_students(
        &self,
        actor: &Actor,
        filter: &StudentExportFilter,
    ) -> Result<Vec<u8>, PlacementServiceError> {
        authorize(actor, Role::Admin, "export_students")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let rows: Vec<StudentRow> = student_rows(&snapshot)
            .into_iter()
            .filter(|row| filter.matches(&row.profile))
            .collect();
        let bytes = write_students(Vec::new(), &rows)?;

        tracing::info!(rows = rows.len(), "students report exported");
        Ok(bytes)
    }

    pub fn export_jobs(&self, actor: &Actor) -> Result<Vec<u8>, PlacementServiceError> {
        authorize(actor, Role::Admin, "export_jobs")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let rows = admin_job_views(&snapshot, today, &JobFilter::default());
        let bytes = write_jobs(Vec::new(), &rows)?;

        tracing::info!(rows = rows.len(), "jobs report exported");
        Ok(bytes)
    }

    /// Registers every student in the CSV or none of them.
    pub fn import_students<R: Read>(
        &self,
        actor: &Actor,
        source: R,
    ) -> Result<ImportSummary, PlacementServiceError> {
        authorize(actor, Role::Admin, "import_students")?;
        let students = parse_students(source)?;
        let now = self.now();

        let result = self.store.transaction(|tx| {
            let mut usernames = Vec::with_capacity(students.len());
            for student in students {
                let line = student.line;
                let (account, _) =
                    create_student(tx, student.registration, now).map_err(|err| match err {
                        PlacementServiceError::Validation(reason) => {
                            PlacementServiceError::from(row_error(line, reason))
                        }
                        other => other,
                    })?;
                usernames.push(account.username);
            }
            audit(
                tx,
                Some(actor.account_id),
                format!("Bulk import: {} students created", usernames.len()),
                now,
            )?;
            Ok::<_, PlacementServiceError>(ImportSummary {
                created: usernames.len(),
                usernames,
            })
        });

        match &result {
            Ok(summary) => tracing::info!(created = summary.created, "students imported"),
            Err(err) => tracing::warn!(error = %err, "student import rolled back"),
        }
        result
    }
}

fn row_error(line: u64, reason: ValidationError) -> ImportError {
    ImportError::InvalidRow {
        line,
        reason: reason.to_string(),
    }
}

