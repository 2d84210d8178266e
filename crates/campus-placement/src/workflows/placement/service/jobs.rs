use serde::Deserialize;

use super::{
    audit, load_account, load_company, load_job, load_owned_job, load_student, PlacementService,
    PlacementServiceError,
};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::{JobDetails, JobId, JobPosting, Role};
use crate::workflows::placement::eligibility::{evaluate, EligibilityCriteria, StudentStanding};
use crate::workflows::placement::report::views::POSTED_JOBS_PER_PAGE;
use crate::workflows::placement::report::{
    ApplicantView, JobDetailState, JobDetailView, JobListing, JobListings, Page, PostedJobView,
    Snapshot,
};
use crate::workflows::placement::repository::{NewJob, PlacementStore};

/// Optional, case-insensitive substring filters on the student job board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim).filter(|needle| !needle.is_empty()) {
        None => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

impl ListingFilter {
    fn matches(&self, job: &JobPosting, company_name: &str) -> bool {
        contains_ignore_case(company_name, self.company_name.as_deref())
            && contains_ignore_case(&job.details.title, self.title.as_deref())
    }
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    /// New postings wait for administrator approval.
    pub fn post_job(
        &self,
        actor: &Actor,
        details: JobDetails,
    ) -> Result<JobPosting, PlacementServiceError> {
        authorize(actor, Role::Company, "post_job")?;
        let details = details.validate()?;
        let now = self.now();

        let job = self.store.transaction(|tx| {
            let company = load_company(&*tx, actor.account_id)?;
            let job = tx.insert_job(NewJob {
                company_id: company.account_id,
                details,
                posted_at: now,
            })?;
            audit(
                tx,
                Some(actor.account_id),
                format!("New job posted: {} by {}", job.details.title, company.name),
                now,
            )?;
            Ok::<_, PlacementServiceError>(job)
        })?;

        tracing::info!(
            job_id = job.id.0,
            company_id = actor.account_id.0,
            "job posted, pending approval"
        );
        Ok(job)
    }

    /// Owner-only edit. The approval flag is untouched.
    pub fn update_job(
        &self,
        actor: &Actor,
        job_id: JobId,
        details: JobDetails,
    ) -> Result<JobPosting, PlacementServiceError> {
        authorize(actor, Role::Company, "update_job")?;
        let details = details.validate()?;

        self.store.transaction(|tx| {
            let mut job = load_owned_job(&*tx, actor.account_id, job_id)?;
            job.details = details;
            tx.update_job(&job)?;
            Ok(job)
        })
    }

    /// The company's own postings, newest first, with applicant counts.
    pub fn posted_jobs(
        &self,
        actor: &Actor,
        page: usize,
    ) -> Result<Page<PostedJobView>, PlacementServiceError> {
        authorize(actor, Role::Company, "posted_jobs")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let mut jobs: Vec<&JobPosting> = snapshot
            .jobs
            .iter()
            .filter(|job| job.company_id == actor.account_id)
            .collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));

        let views = jobs
            .into_iter()
            .map(|job| {
                let status = job.listing_status(today);
                PostedJobView {
                    job: job.clone(),
                    status,
                    status_label: status.label(),
                    applicant_count: snapshot.applicant_count(job.id),
                }
            })
            .collect();
        Ok(Page::paginate(views, page, POSTED_JOBS_PER_PAGE))
    }

    /// Active jobs split into eligible and ineligible buckets for the student.
    pub fn job_listings(
        &self,
        actor: &Actor,
        filter: &ListingFilter,
    ) -> Result<JobListings, PlacementServiceError> {
        authorize(actor, Role::Student, "job_listings")?;
        let today = self.today();

        let (profile, snapshot) = self.store.read(|reader| {
            Ok::<_, PlacementServiceError>((
                load_student(reader, actor.account_id)?,
                Snapshot::load(reader)?,
            ))
        })?;
        let standing = StudentStanding::from(&profile);

        let mut active: Vec<&JobPosting> = snapshot
            .jobs
            .iter()
            .filter(|job| job.is_active(today))
            .collect();
        active.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));

        let mut listings = JobListings::default();
        for job in active {
            let company_name = snapshot.company_name(job.company_id);
            if !filter.matches(job, &company_name) {
                continue;
            }

            let has_applied = snapshot.applications.iter().any(|application| {
                application.job_id == job.id && application.student_id == actor.account_id
            });
            let verdict = evaluate(&standing, &EligibilityCriteria::from(job));
            let listing = JobListing {
                job: job.clone(),
                company_name,
                has_applied,
                ineligibility: verdict.reason().cloned(),
            };

            if verdict.is_eligible() {
                listings.eligible.push(listing);
            } else {
                listings.ineligible.push(listing);
            }
        }

        tracing::debug!(
            student_id = actor.account_id.0,
            eligible = listings.eligible.len(),
            ineligible = listings.ineligible.len(),
            "job listings computed"
        );
        Ok(listings)
    }

    /// Approved jobs only; expired ones stay readable.
    pub fn job_detail(
        &self,
        actor: &Actor,
        job_id: JobId,
    ) -> Result<JobDetailView, PlacementServiceError> {
        authorize(actor, Role::Student, "job_detail")?;

        self.store.read(|reader| {
            let job = load_job(reader, job_id)?;
            if !job.is_approved {
                return Err(PlacementServiceError::not_found("job", job_id.0));
            }
            let profile = load_student(reader, actor.account_id)?;
            let company_name = load_company(reader, job.company_id)?.name;

            let eligibility = evaluate(
                &StudentStanding::from(&profile),
                &EligibilityCriteria::from(&job),
            );
            let state = if reader.application_for(job_id, actor.account_id)?.is_some() {
                JobDetailState::Applied
            } else if eligibility.is_eligible() {
                JobDetailState::Eligible
            } else {
                JobDetailState::NotEligible
            };

            Ok(JobDetailView {
                job,
                company_name,
                state,
                eligibility,
            })
        })
    }

    /// Applicants for one of the company's jobs, newest first.
    pub fn applicants(
        &self,
        actor: &Actor,
        job_id: JobId,
    ) -> Result<Vec<ApplicantView>, PlacementServiceError> {
        authorize(actor, Role::Company, "applicants")?;

        self.store.read(|reader| {
            load_owned_job(reader, actor.account_id, job_id)?;

            let mut applications: Vec<_> = reader
                .applications()?
                .into_iter()
                .filter(|application| application.job_id == job_id)
                .collect();
            applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));

            applications
                .into_iter()
                .map(|application| {
                    let account = load_account(reader, application.student_id)?;
                    let profile = load_student(reader, application.student_id)?;
                    Ok::<_, PlacementServiceError>(ApplicantView {
                        status_label: application.status.label(),
                        student_name: account.full_name(),
                        email: account.email,
                        application,
                        profile,
                    })
                })
                .collect()
        })
    }
}
