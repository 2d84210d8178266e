use std::collections::BTreeSet;

use super::{
    application_not_found, audit, load_account, load_job, load_owned_job, load_student,
    PlacementService, PlacementServiceError,
};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::{
    Application, ApplicationId, ApplicationStatus, InterviewPlan, JobId, Role,
};
use crate::workflows::placement::eligibility::{
    evaluate, Eligibility, EligibilityCriteria, StudentStanding,
};
use crate::workflows::placement::lifecycle::{transition, withdrawn_by_offer, ReviewAction};
use crate::workflows::placement::report::{
    InterviewView, OfferOutcome, PlacementStatusView, ReviewOutcome, ScheduleOutcome, Snapshot,
    StudentApplicationView,
};
use crate::workflows::placement::repository::{
    NewApplication, PlacementReader, PlacementStore, PlacementTx, APPLICATION_CONSTRAINT,
};
use crate::workflows::placement::validation::ValidationError;

/// An application that must belong to `job_id`; anything else reads as missing.
fn load_job_application<R>(
    reader: &R,
    job_id: JobId,
    id: ApplicationId,
) -> Result<Application, PlacementServiceError>
where
    R: PlacementReader + ?Sized,
{
    reader
        .application(id)?
        .filter(|application| application.job_id == job_id)
        .ok_or_else(|| application_not_found(id))
}

fn set_status(
    tx: &mut dyn PlacementTx,
    application: &mut Application,
    next: ApplicationStatus,
) -> Result<(), PlacementServiceError> {
    transition(application, next)?;
    tx.update_application_status(application.id, next)?;
    Ok(())
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    /// Submits the student's application to an approved, open job.
    ///
    /// A repeat attempt is reported as a duplicate before eligibility is looked at.
    pub fn apply(
        &self,
        actor: &Actor,
        job_id: JobId,
    ) -> Result<Application, PlacementServiceError> {
        authorize(actor, Role::Student, "apply")?;
        let student_id = actor.account_id;
        let now = self.now();
        let today = self.today();

        let result = self.store.transaction(|tx| {
            let job = load_job(&*tx, job_id)?;
            if !job.is_approved {
                return Err(PlacementServiceError::not_found("job", job_id.0));
            }
            if job.is_expired(today) {
                return Err(ValidationError::ApplicationsClosed {
                    job_id,
                    deadline: job.details.application_deadline,
                }
                .into());
            }
            if tx.application_for(job_id, student_id)?.is_some() {
                return Err(PlacementServiceError::DuplicateApplication { job_id });
            }

            let profile = load_student(&*tx, student_id)?;
            let verdict = evaluate(
                &StudentStanding::from(&profile),
                &EligibilityCriteria::from(&job),
            );
            if let Eligibility::NotEligible(reason) = verdict {
                return Err(PlacementServiceError::IneligibleStudent(reason));
            }

            tx.insert_application(NewApplication {
                job_id,
                student_id,
                applied_at: now,
            })
            .map_err(|err| {
                if err.is_conflict_on(APPLICATION_CONSTRAINT) {
                    PlacementServiceError::DuplicateApplication { job_id }
                } else {
                    err.into()
                }
            })
        });

        match &result {
            Ok(application) => tracing::info!(
                application_id = application.id.0,
                job_id = job_id.0,
                student_id = student_id.0,
                "application submitted"
            ),
            Err(
                err @ (PlacementServiceError::DuplicateApplication { .. }
                | PlacementServiceError::IneligibleStudent(_)),
            ) => tracing::warn!(
                job_id = job_id.0,
                student_id = student_id.0,
                error = %err,
                "application refused"
            ),
            Err(_) => {}
        }
        result
    }

    /// Shortlists or rejects a batch of applications on one of the company's jobs.
    /// Either every application moves or none does.
    pub fn review_applications(
        &self,
        actor: &Actor,
        job_id: JobId,
        action: ReviewAction,
        ids: &[ApplicationId],
    ) -> Result<ReviewOutcome, PlacementServiceError> {
        authorize(actor, Role::Company, "review_applications")?;
        let ids: BTreeSet<ApplicationId> = ids.iter().copied().collect();
        if ids.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        let target = action.target();

        let updated = self.store.transaction(|tx| {
            load_owned_job(&*tx, actor.account_id, job_id)?;
            let mut updated = Vec::with_capacity(ids.len());
            for id in &ids {
                let mut application = load_job_application(&*tx, job_id, *id)?;
                set_status(tx, &mut application, target)?;
                updated.push(application.id);
            }
            Ok::<_, PlacementServiceError>(updated)
        })?;

        tracing::info!(
            job_id = job_id.0,
            status = target.as_str(),
            count = updated.len(),
            "applications reviewed"
        );
        Ok(ReviewOutcome {
            status: target,
            updated,
        })
    }

    /// Schedules a round for every shortlisted application on the job and moves
    /// them all to `Interview` in one transaction.
    pub fn schedule_interviews(
        &self,
        actor: &Actor,
        job_id: JobId,
        plan: InterviewPlan,
    ) -> Result<ScheduleOutcome, PlacementServiceError> {
        authorize(actor, Role::Company, "schedule_interviews")?;
        let plan = plan.validate()?;

        let scheduled = self.store.transaction(|tx| {
            load_owned_job(&*tx, actor.account_id, job_id)?;
            let shortlisted: Vec<Application> = tx
                .applications()?
                .into_iter()
                .filter(|application| {
                    application.job_id == job_id
                        && application.status == ApplicationStatus::Shortlisted
                })
                .collect();
            if shortlisted.is_empty() {
                return Err(ValidationError::NoShortlistedApplications { job_id }.into());
            }

            let mut scheduled = Vec::with_capacity(shortlisted.len());
            for mut application in shortlisted {
                scheduled.push(tx.insert_interview(application.id, &plan)?);
                set_status(tx, &mut application, ApplicationStatus::Interview)?;
            }
            Ok::<_, PlacementServiceError>(scheduled)
        })?;

        tracing::info!(
            job_id = job_id.0,
            round = %plan.round_name,
            count = scheduled.len(),
            "interviews scheduled"
        );
        Ok(ScheduleOutcome { scheduled })
    }

    /// Offers the job to one applicant. The student is marked placed and every
    /// other open application of theirs is withdrawn, atomically.
    pub fn extend_offer(
        &self,
        actor: &Actor,
        job_id: JobId,
        application_id: ApplicationId,
    ) -> Result<OfferOutcome, PlacementServiceError> {
        authorize(actor, Role::Company, "extend_offer")?;
        let now = self.now();

        let result = self.store.transaction(|tx| {
            let job = load_owned_job(&*tx, actor.account_id, job_id)?;
            let mut application = load_job_application(&*tx, job_id, application_id)?;

            transition(&mut application, ApplicationStatus::Offered)
                .map_err(|err| PlacementServiceError::OfferFailed(err.to_string()))?;
            tx.update_application_status(application.id, ApplicationStatus::Offered)?;

            let mut profile = load_student(&*tx, application.student_id)?;
            profile.is_placed = true;
            tx.update_student_profile(&profile)?;

            let student_applications: Vec<Application> = tx
                .applications()?
                .into_iter()
                .filter(|other| other.student_id == application.student_id)
                .collect();
            let withdrawn = withdrawn_by_offer(&student_applications, application.id);
            for id in &withdrawn {
                tx.update_application_status(*id, ApplicationStatus::Rejected)?;
            }

            let student = load_account(&*tx, application.student_id)?;
            audit(
                tx,
                Some(actor.account_id),
                format!(
                    "Offer extended to {} for {}",
                    student.full_name(),
                    job.details.title
                ),
                now,
            )?;

            Ok(OfferOutcome {
                application,
                withdrawn,
            })
        });

        match result {
            Ok(outcome) => {
                tracing::info!(
                    application_id = application_id.0,
                    student_id = outcome.application.student_id.0,
                    withdrawn = outcome.withdrawn.len(),
                    "offer extended"
                );
                Ok(outcome)
            }
            Err(err @ PlacementServiceError::NotFound { .. }) => Err(err),
            Err(err) => {
                tracing::warn!(
                    application_id = application_id.0,
                    error = %err,
                    "offer aborted"
                );
                match err {
                    PlacementServiceError::OfferFailed(_) => Err(err),
                    other => Err(PlacementServiceError::OfferFailed(other.to_string())),
                }
            }
        }
    }

    /// The student's applications, newest first.
    pub fn student_applications(
        &self,
        actor: &Actor,
    ) -> Result<Vec<StudentApplicationView>, PlacementServiceError> {
        authorize(actor, Role::Student, "student_applications")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let mut own: Vec<&Application> = snapshot
            .applications
            .iter()
            .filter(|application| application.student_id == actor.account_id)
            .collect();
        own.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));

        Ok(own
            .into_iter()
            .map(|application| snapshot.application_view(application))
            .collect())
    }

    pub fn student_interviews(
        &self,
        actor: &Actor,
    ) -> Result<Vec<InterviewView>, PlacementServiceError> {
        authorize(actor, Role::Student, "student_interviews")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        Ok(snapshot
            .interviews_where(|application| application.student_id == actor.account_id)
            .into_iter()
            .map(|interview| snapshot.interview_view(interview, today))
            .collect())
    }

    /// Placement flag plus the offer behind it; the latest one if several exist.
    pub fn placement_status(
        &self,
        actor: &Actor,
    ) -> Result<PlacementStatusView, PlacementServiceError> {
        authorize(actor, Role::Student, "placement_status")?;

        let (profile, snapshot) = self.store.read(|reader| {
            Ok::<_, PlacementServiceError>((
                load_student(reader, actor.account_id)?,
                Snapshot::load(reader)?,
            ))
        })?;

        let offer = if profile.is_placed {
            snapshot
                .applications
                .iter()
                .filter(|application| {
                    application.student_id == actor.account_id
                        && application.status == ApplicationStatus::Offered
                })
                .max_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id)))
                .map(|application| snapshot.application_view(application))
        } else {
            None
        };

        Ok(PlacementStatusView {
            is_placed: profile.is_placed,
            status_label: profile.placement_label(),
            offer,
        })
    }

    /// Every interview across the company's jobs, by date and time.
    pub fn company_interviews(
        &self,
        actor: &Actor,
    ) -> Result<Vec<InterviewView>, PlacementServiceError> {
        authorize(actor, Role::Company, "company_interviews")?;
        let today = self.today();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        Ok(snapshot
            .interviews_where(|application| {
                snapshot
                    .job(application.job_id)
                    .is_some_and(|job| job.company_id == actor.account_id)
            })
            .into_iter()
            .map(|interview| snapshot.interview_view(interview, today))
            .collect())
    }
}
