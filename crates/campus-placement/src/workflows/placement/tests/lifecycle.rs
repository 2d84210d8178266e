use std::sync::Arc;
use std::thread;

use chrono::{Duration, TimeZone, Utc};

use super::common::*;

use crate::workflows::placement::domain::{ApplicationStatus, Branch, JobId};
use crate::workflows::placement::lifecycle::ReviewAction;
use crate::workflows::placement::repository::{PlacementReader, PlacementStore};
use crate::workflows::placement::service::PlacementServiceError;
use crate::workflows::placement::validation::{StudentProfileUpdate, ValidationError};

#[test]
fn eligible_student_applies_once() {
    let (campus, store) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);

    let application = campus
        .service
        .apply(&student, campus.job.id)
        .expect("application accepted");
    assert_eq!(application.status, ApplicationStatus::Applied);
    assert_eq!(application.applied_at, now());

    let again = campus.service.apply(&student, campus.job.id);
    assert!(matches!(
        again,
        Err(PlacementServiceError::DuplicateApplication { job_id }) if job_id == campus.job.id
    ));

    let rows = store
        .read(|reader| reader.applications())
        .expect("store readable");
    assert_eq!(rows.len(), 1);
}

#[test]
fn duplicate_is_reported_before_eligibility() {
    let (campus, _) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    campus
        .service
        .apply(&student, campus.job.id)
        .expect("application accepted");

    campus
        .service
        .update_student_profile(
            &student,
            StudentProfileUpdate {
                phone_number: None,
                cgpa: Some(5.0),
                branch: Branch::ComputerScience,
                graduation_year: None,
                backlogs: 0,
                skills: Vec::new(),
                linkedin_url: None,
                github_url: None,
            },
        )
        .expect("profile updated");

    assert!(matches!(
        campus.service.apply(&student, campus.job.id),
        Err(PlacementServiceError::DuplicateApplication { .. })
    ));
}

#[test]
fn concurrent_duplicates_leave_one_row() {
    let (campus, store) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let service = Arc::new(campus.service);
    let job_id = campus.job.id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || service.apply(&student, job_id))
        })
        .collect();
    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .collect();

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().filter(|outcome| outcome.is_err()).all(|outcome| matches!(
        outcome,
        Err(PlacementServiceError::DuplicateApplication { .. })
    )));
    let rows = store
        .read(|reader| reader.applications())
        .expect("store readable");
    assert_eq!(rows.len(), 1);
}

#[test]
fn ineligible_student_is_refused_without_a_row() {
    let (campus, store) = campus();
    let student = register_student(&campus.service, "mo", Branch::Mechanical, Some(9.0), 0);

    match campus.service.apply(&student, campus.job.id) {
        Err(PlacementServiceError::IneligibleStudent(reason)) => {
            assert!(reason.summary().contains("ME"));
        }
        other => panic!("expected ineligible student, got {:?}", other),
    }
    let rows = store
        .read(|reader| reader.applications())
        .expect("store readable");
    assert!(rows.is_empty());
}

#[test]
fn expired_and_unapproved_jobs_cannot_be_applied_to() {
    let (campus, store) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);

    let pending = campus
        .service
        .post_job(
            &campus.company,
            job_details("Data Analyst", None, None, "CSE"),
        )
        .expect("job posted");
    assert!(matches!(
        campus.service.apply(&student, pending.id),
        Err(PlacementServiceError::NotFound { entity: "job", .. })
    ));

    let later = service_at(store.clone(), now() + Duration::days(40));
    match later.apply(&student, campus.job.id) {
        Err(PlacementServiceError::Validation(ValidationError::ApplicationsClosed {
            job_id,
            deadline,
        })) => {
            assert_eq!(job_id, campus.job.id);
            assert_eq!(deadline, date(2024, 8, 31));
        }
        other => panic!("expected closed job, got {:?}", other),
    }

    assert!(matches!(
        campus.service.apply(&student, JobId(999)),
        Err(PlacementServiceError::NotFound { .. })
    ));
}

#[test]
fn applying_on_the_deadline_day_is_allowed() {
    let (campus, store) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let deadline_day = Utc
        .with_ymd_and_hms(2024, 8, 31, 23, 0, 0)
        .single()
        .expect("valid instant");

    let service = service_at(store, deadline_day);
    assert!(service.apply(&student, campus.job.id).is_ok());
}

#[test]
fn bulk_review_is_all_or_nothing() {
    let (campus, store) = campus();
    let asha = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let ravi = register_student(&campus.service, "ravi", Branch::ElectronicsCommunication, Some(7.5), 1);
    let first = campus.service.apply(&asha, campus.job.id).expect("applied");
    let second = campus.service.apply(&ravi, campus.job.id).expect("applied");

    campus
        .service
        .review_applications(&campus.company, campus.job.id, ReviewAction::Reject, &[second.id])
        .expect("rejection applied");

    let result = campus.service.review_applications(
        &campus.company,
        campus.job.id,
        ReviewAction::Shortlist,
        &[first.id, second.id],
    );
    assert!(matches!(
        result,
        Err(PlacementServiceError::Validation(
            ValidationError::InvalidTransition { .. }
        ))
    ));
    assert_eq!(
        application_status(store.as_ref(), first.id),
        ApplicationStatus::Applied
    );

    let outcome = campus
        .service
        .review_applications(&campus.company, campus.job.id, ReviewAction::Shortlist, &[first.id])
        .expect("shortlisted");
    assert_eq!(outcome.status, ApplicationStatus::Shortlisted);
    assert_eq!(outcome.updated, vec![first.id]);
}

#[test]
fn review_requires_a_selection_on_an_owned_job() {
    let (campus, _) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let application = campus.service.apply(&student, campus.job.id).expect("applied");

    assert!(matches!(
        campus
            .service
            .review_applications(&campus.company, campus.job.id, ReviewAction::Shortlist, &[]),
        Err(PlacementServiceError::Validation(ValidationError::EmptySelection))
    ));

    let rival = approved_company(&campus.service, &campus.admin, "Globex");
    assert!(matches!(
        campus.service.review_applications(
            &rival,
            campus.job.id,
            ReviewAction::Reject,
            &[application.id]
        ),
        Err(PlacementServiceError::NotFound { entity: "job", .. })
    ));

    assert!(matches!(
        campus
            .service
            .review_applications(&student, campus.job.id, ReviewAction::Reject, &[application.id]),
        Err(PlacementServiceError::Access(_))
    ));
}

#[test]
fn scheduling_moves_every_shortlisted_application_to_interview() {
    let (campus, store) = campus();
    let asha = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let ravi = register_student(&campus.service, "ravi", Branch::ElectronicsCommunication, Some(7.5), 1);
    let meera = register_student(&campus.service, "meera", Branch::ComputerScience, Some(9.0), 0);
    let a = campus.service.apply(&asha, campus.job.id).expect("applied");
    let b = campus.service.apply(&ravi, campus.job.id).expect("applied");
    let c = campus.service.apply(&meera, campus.job.id).expect("applied");
    campus
        .service
        .review_applications(&campus.company, campus.job.id, ReviewAction::Shortlist, &[a.id, b.id])
        .expect("shortlisted");

    let outcome = campus
        .service
        .schedule_interviews(&campus.company, campus.job.id, interview_plan())
        .expect("scheduled");

    assert_eq!(outcome.scheduled.len(), 2);
    assert_eq!(application_status(store.as_ref(), a.id), ApplicationStatus::Interview);
    assert_eq!(application_status(store.as_ref(), b.id), ApplicationStatus::Interview);
    assert_eq!(application_status(store.as_ref(), c.id), ApplicationStatus::Applied);

    assert!(matches!(
        campus
            .service
            .schedule_interviews(&campus.company, campus.job.id, interview_plan()),
        Err(PlacementServiceError::Validation(
            ValidationError::NoShortlistedApplications { .. }
        ))
    ));
}

#[test]
fn failed_scheduling_rolls_back_every_change() {
    let store = Arc::new(FaultyStore::healthy());
    let campus = campus_on(service_with_store(store.clone()));
    let asha = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let ravi = register_student(&campus.service, "ravi", Branch::ElectronicsCommunication, Some(7.5), 1);
    let a = campus.service.apply(&asha, campus.job.id).expect("applied");
    let b = campus.service.apply(&ravi, campus.job.id).expect("applied");
    campus
        .service
        .review_applications(&campus.company, campus.job.id, ReviewAction::Shortlist, &[a.id, b.id])
        .expect("shortlisted");

    store.arm(Fault::InterviewInsert { after: 1 });
    let result = campus
        .service
        .schedule_interviews(&campus.company, campus.job.id, interview_plan());

    assert!(matches!(result, Err(PlacementServiceError::Repository(_))));
    assert_eq!(
        application_status(&store.inner, a.id),
        ApplicationStatus::Shortlisted
    );
    assert_eq!(
        application_status(&store.inner, b.id),
        ApplicationStatus::Shortlisted
    );
    let interviews = store
        .read(|reader| reader.interviews())
        .expect("store readable");
    assert!(interviews.is_empty());
}

#[test]
fn offer_places_the_student_and_withdraws_open_applications() {
    let (campus, store) = campus();
    let globex = approved_company(&campus.service, &campus.admin, "Globex");
    let initech = approved_company(&campus.service, &campus.admin, "Initech");
    let globex_job = approved_job(
        &campus.service,
        &campus.admin,
        &globex,
        job_details("Backend Developer", Some(7.0), None, "CSE"),
    );
    let initech_job = approved_job(
        &campus.service,
        &campus.admin,
        &initech,
        job_details("Support Engineer", None, None, "CSE,ECE"),
    );

    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let offered = campus.service.apply(&student, campus.job.id).expect("applied");
    let shortlisted = campus.service.apply(&student, globex_job.id).expect("applied");
    let rejected = campus.service.apply(&student, initech_job.id).expect("applied");
    campus
        .service
        .review_applications(&globex, globex_job.id, ReviewAction::Shortlist, &[shortlisted.id])
        .expect("shortlisted");
    campus
        .service
        .review_applications(&initech, initech_job.id, ReviewAction::Reject, &[rejected.id])
        .expect("rejected");

    let outcome = campus
        .service
        .extend_offer(&campus.company, campus.job.id, offered.id)
        .expect("offer extended");

    assert_eq!(outcome.application.status, ApplicationStatus::Offered);
    assert_eq!(outcome.withdrawn, vec![shortlisted.id]);
    assert_eq!(application_status(store.as_ref(), offered.id), ApplicationStatus::Offered);
    assert_eq!(
        application_status(store.as_ref(), shortlisted.id),
        ApplicationStatus::Rejected
    );
    assert_eq!(application_status(store.as_ref(), rejected.id), ApplicationStatus::Rejected);

    let status = campus
        .service
        .placement_status(&student)
        .expect("status loads");
    assert!(status.is_placed);
    assert_eq!(status.status_label, "Placed");
    let offer = status.offer.expect("offer shown");
    assert_eq!(offer.application.id, offered.id);
    assert_eq!(offer.company_name, "Acme Systems");

    let log = store.read(|reader| reader.audit_log()).expect("store readable");
    assert!(log
        .iter()
        .any(|entry| entry.action == "Offer extended to Asha Student for Graduate Engineer"));
}

#[test]
fn withdrawn_application_cannot_be_offered() {
    let (campus, store) = campus();
    let globex = approved_company(&campus.service, &campus.admin, "Globex");
    let globex_job = approved_job(
        &campus.service,
        &campus.admin,
        &globex,
        job_details("Backend Developer", None, None, "CSE"),
    );
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let first = campus.service.apply(&student, campus.job.id).expect("applied");
    let second = campus.service.apply(&student, globex_job.id).expect("applied");

    campus
        .service
        .extend_offer(&campus.company, campus.job.id, first.id)
        .expect("first offer");
    let result = campus.service.extend_offer(&globex, globex_job.id, second.id);

    assert!(matches!(result, Err(PlacementServiceError::OfferFailed(_))));
    assert_eq!(application_status(store.as_ref(), second.id), ApplicationStatus::Rejected);
}

#[test]
fn failed_offer_changes_nothing() {
    let store = Arc::new(FaultyStore::healthy());
    let campus = campus_on(service_with_store(store.clone()));
    let globex = approved_company(&campus.service, &campus.admin, "Globex");
    let globex_job = approved_job(
        &campus.service,
        &campus.admin,
        &globex,
        job_details("Backend Developer", None, None, "CSE"),
    );
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let offered = campus.service.apply(&student, campus.job.id).expect("applied");
    let other = campus.service.apply(&student, globex_job.id).expect("applied");

    store.arm(Fault::AuditAppend);
    let result = campus
        .service
        .extend_offer(&campus.company, campus.job.id, offered.id);

    assert!(matches!(result, Err(PlacementServiceError::OfferFailed(_))));
    assert_eq!(application_status(&store.inner, offered.id), ApplicationStatus::Applied);
    assert_eq!(application_status(&store.inner, other.id), ApplicationStatus::Applied);
    let profile = store
        .read(|reader| reader.student_profile(student.account_id))
        .expect("store readable")
        .expect("profile exists");
    assert!(!profile.is_placed);
}

#[test]
fn offer_for_a_foreign_application_is_not_found() {
    let (campus, _) = campus();
    let globex = approved_company(&campus.service, &campus.admin, "Globex");
    let globex_job = approved_job(
        &campus.service,
        &campus.admin,
        &globex,
        job_details("Backend Developer", None, None, "CSE"),
    );
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(7.2), 0);
    let elsewhere = campus.service.apply(&student, globex_job.id).expect("applied");

    assert!(matches!(
        campus
            .service
            .extend_offer(&campus.company, campus.job.id, elsewhere.id),
        Err(PlacementServiceError::NotFound { entity: "application", .. })
    ));
}

#[test]
fn interviews_are_visible_to_student_and_company() {
    let (campus, _) = campus();
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let application = campus.service.apply(&student, campus.job.id).expect("applied");
    campus
        .service
        .review_applications(
            &campus.company,
            campus.job.id,
            ReviewAction::Shortlist,
            &[application.id],
        )
        .expect("shortlisted");
    campus
        .service
        .schedule_interviews(&campus.company, campus.job.id, interview_plan())
        .expect("scheduled");

    let mine = campus.service.student_interviews(&student).expect("loads");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].job_title, "Graduate Engineer");
    assert!(!mine[0].is_past);

    let theirs = campus
        .service
        .company_interviews(&campus.company)
        .expect("loads");
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].student_name, "Asha Student");

    let later = service_at(
        campus.service.store().clone(),
        now() + Duration::days(30),
    );
    let mine = later.student_interviews(&student).expect("loads");
    assert!(mine[0].is_past);

    let history = campus
        .service
        .student_applications(&student)
        .expect("loads");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status_label, "Interview");
}
