use super::{audit, load_company, load_job, PlacementService, PlacementServiceError};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::{AccountId, CompanyProfile, JobId, JobPosting, Role};
use crate::workflows::placement::repository::PlacementStore;
use crate::workflows::placement::validation::ValidationError;

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    /// Idempotent; approving twice still records the decision.
    pub fn approve_company(
        &self,
        actor: &Actor,
        company_id: AccountId,
    ) -> Result<CompanyProfile, PlacementServiceError> {
        authorize(actor, Role::Admin, "approve_company")?;
        let now = self.now();

        let company = self.store.transaction(|tx| {
            let mut company = load_company(&*tx, company_id)?;
            company.is_approved = true;
            tx.update_company_profile(&company)?;
            audit(
                tx,
                Some(actor.account_id),
                format!("Company approved: {}", company.name),
                now,
            )?;
            Ok::<_, PlacementServiceError>(company)
        })?;

        tracing::info!(company_id = company_id.0, "company approved");
        Ok(company)
    }

    /// Only jobs of approved companies can go live.
    pub fn approve_job(
        &self,
        actor: &Actor,
        job_id: JobId,
    ) -> Result<JobPosting, PlacementServiceError> {
        authorize(actor, Role::Admin, "approve_job")?;
        let now = self.now();

        let job = self.store.transaction(|tx| {
            let mut job = load_job(&*tx, job_id)?;
            let company = load_company(&*tx, job.company_id)?;
            if !company.is_approved {
                return Err(ValidationError::CompanyNotApproved {
                    company_id: company.account_id,
                }
                .into());
            }

            job.is_approved = true;
            tx.update_job(&job)?;
            audit(
                tx,
                Some(actor.account_id),
                format!("Job approved: {} ({})", job.details.title, company.name),
                now,
            )?;
            Ok::<_, PlacementServiceError>(job)
        })?;

        tracing::info!(job_id = job_id.0, "job approved");
        Ok(job)
    }

    /// Deletes a pending job outright. Approved jobs are never removed this way.
    pub fn reject_job(&self, actor: &Actor, job_id: JobId) -> Result<(), PlacementServiceError> {
        authorize(actor, Role::Admin, "reject_job")?;
        let now = self.now();

        self.store.transaction(|tx| {
            let job = load_job(&*tx, job_id)?;
            if job.is_approved {
                return Err(ValidationError::JobAlreadyApproved { job_id }.into());
            }
            let company_name = load_company(&*tx, job.company_id)?.name;

            tx.delete_job(job_id)?;
            audit(
                tx,
                Some(actor.account_id),
                format!("Job rejected: {} ({})", job.details.title, company_name),
                now,
            )?;
            Ok::<_, PlacementServiceError>(())
        })?;

        tracing::info!(job_id = job_id.0, "pending job rejected and removed");
        Ok(())
    }

    pub fn pending_companies(
        &self,
        actor: &Actor,
    ) -> Result<Vec<CompanyProfile>, PlacementServiceError> {
        authorize(actor, Role::Admin, "pending_companies")?;
        let mut pending: Vec<CompanyProfile> = self
            .store
            .read(|reader| Ok::<_, PlacementServiceError>(reader.company_profiles()?))?
            .into_iter()
            .filter(|company| !company.is_approved)
            .collect();
        pending.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pending)
    }

    /// Unapproved jobs of approved companies, newest first.
    pub fn pending_jobs(&self, actor: &Actor) -> Result<Vec<JobPosting>, PlacementServiceError> {
        authorize(actor, Role::Admin, "pending_jobs")?;

        let (jobs, companies) = self.store.read(|reader| {
            Ok::<_, PlacementServiceError>((reader.jobs()?, reader.company_profiles()?))
        })?;

        let mut pending: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| !job.is_approved)
            .filter(|job| {
                companies
                    .iter()
                    .any(|company| company.account_id == job.company_id && company.is_approved)
            })
            .collect();
        pending.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        Ok(pending)
    }
}
