use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::access::Actor;
use super::domain::{AccountId, ApplicationId, DocumentId, InterviewPlan, JobDetails, JobId};
use super::lifecycle::ReviewAction;
use super::report::views::page_number;
use super::report::CompanyRow;
use super::repository::{PlacementStore, RepositoryError};
use super::service::{
    InterviewFilter, JobFilter, ListingFilter, PlacementService, PlacementServiceError,
    StudentExportFilter,
};
use super::validation::{
    AccountUpdate, CompanyProfileUpdate, CompanyRegistration, DocumentUpload,
    StudentProfileUpdate, StudentRegistration,
};

/// Header carrying the authenticated account id, set by the upstream session layer.
pub const ACCOUNT_HEADER: &str = "x-account-id";

type SharedService<S> = State<Arc<PlacementService<S>>>;

/// Router exposing the student, company and admin placement endpoints.
pub fn placement_router<S>(service: Arc<PlacementService<S>>) -> Router
where
    S: PlacementStore + 'static,
{
    Router::new()
        .route("/api/v1/register/student", post(register_student_handler::<S>))
        .route("/api/v1/register/company", post(register_company_handler::<S>))
        .route("/api/v1/account", put(update_account_handler::<S>))
        .route("/api/v1/student/dashboard", get(student_dashboard_handler::<S>))
        .route(
            "/api/v1/student/profile",
            get(student_profile_handler::<S>).put(update_student_profile_handler::<S>),
        )
        .route("/api/v1/student/resume", put(upload_resume_handler::<S>))
        .route("/api/v1/student/jobs", get(job_listings_handler::<S>))
        .route("/api/v1/student/jobs/:job_id", get(job_detail_handler::<S>))
        .route("/api/v1/student/jobs/:job_id/apply", post(apply_handler::<S>))
        .route(
            "/api/v1/student/applications",
            get(student_applications_handler::<S>),
        )
        .route(
            "/api/v1/student/interviews",
            get(student_interviews_handler::<S>),
        )
        .route("/api/v1/student/placement", get(placement_status_handler::<S>))
        .route("/api/v1/company/dashboard", get(company_dashboard_handler::<S>))
        .route(
            "/api/v1/company/profile",
            get(company_profile_handler::<S>).put(update_company_profile_handler::<S>),
        )
        .route(
            "/api/v1/company/jobs",
            get(posted_jobs_handler::<S>).post(post_job_handler::<S>),
        )
        .route("/api/v1/company/jobs/:job_id", put(update_job_handler::<S>))
        .route(
            "/api/v1/company/jobs/:job_id/applicants",
            get(applicants_handler::<S>),
        )
        .route(
            "/api/v1/company/jobs/:job_id/applications",
            post(review_applications_handler::<S>),
        )
        .route(
            "/api/v1/company/jobs/:job_id/interviews",
            post(schedule_interviews_handler::<S>),
        )
        .route(
            "/api/v1/company/jobs/:job_id/offer/:application_id",
            post(extend_offer_handler::<S>),
        )
        .route(
            "/api/v1/company/interviews",
            get(company_interviews_handler::<S>),
        )
        .route("/api/v1/admin/dashboard", get(admin_dashboard_handler::<S>))
        .route("/api/v1/admin/analytics", get(analytics_handler::<S>))
        .route("/api/v1/admin/students", get(list_students_handler::<S>))
        .route("/api/v1/admin/companies", get(list_companies_handler::<S>))
        .route(
            "/api/v1/admin/companies/pending",
            get(pending_companies_handler::<S>),
        )
        .route(
            "/api/v1/admin/companies/:company_id/approve",
            post(approve_company_handler::<S>),
        )
        .route("/api/v1/admin/jobs", get(list_jobs_handler::<S>))
        .route("/api/v1/admin/jobs/pending", get(pending_jobs_handler::<S>))
        .route(
            "/api/v1/admin/jobs/:job_id/approve",
            post(approve_job_handler::<S>),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/reject",
            post(reject_job_handler::<S>),
        )
        .route("/api/v1/admin/interviews", get(list_interviews_handler::<S>))
        .route("/api/v1/admin/audit-logs", get(audit_log_handler::<S>))
        .route(
            "/api/v1/admin/documents",
            get(documents_handler::<S>).post(upload_document_handler::<S>),
        )
        .route(
            "/api/v1/admin/documents/:document_id",
            delete(delete_document_handler::<S>),
        )
        .route(
            "/api/v1/admin/reports/students.csv",
            get(export_students_handler::<S>),
        )
        .route("/api/v1/admin/reports/jobs.csv", get(export_jobs_handler::<S>))
        .route(
            "/api/v1/admin/import/students",
            post(import_students_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default)]
    page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminJobsQuery {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminInterviewsQuery {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumeUpload {
    file_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    action: ReviewAction,
    application_ids: Vec<ApplicationId>,
}

/// Resolves the identity header. Missing, malformed and unknown ids are all
/// unauthenticated.
pub(crate) fn identify<S>(
    service: &PlacementService<S>,
    headers: &HeaderMap,
) -> Result<Actor, PlacementServiceError>
where
    S: PlacementStore + 'static,
{
    let account_id = headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or(PlacementServiceError::Unauthenticated)?;
    service.resolve_actor(AccountId(account_id))
}

/// Runs synchronous service work on the blocking pool so store I/O and its
/// mutex never hold up a runtime worker.
async fn blocking<S, T, F>(
    service: Arc<PlacementService<S>>,
    work: F,
) -> Result<T, PlacementServiceError>
where
    S: PlacementStore + 'static,
    T: Send + 'static,
    F: FnOnce(&PlacementService<S>) -> Result<T, PlacementServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .unwrap_or_else(|err| {
            Err(PlacementServiceError::Repository(RepositoryError::Unavailable(
                format!("placement worker failed: {err}"),
            )))
        })
}

/// [`blocking`] for requests that need an identified caller.
async fn as_actor<S, T, F>(
    service: Arc<PlacementService<S>>,
    headers: HeaderMap,
    work: F,
) -> Result<T, PlacementServiceError>
where
    S: PlacementStore + 'static,
    T: Send + 'static,
    F: FnOnce(&PlacementService<S>, Actor) -> Result<T, PlacementServiceError> + Send + 'static,
{
    blocking(service, move |service| {
        let actor = identify(service, &headers)?;
        work(service, actor)
    })
    .await
}

pub(crate) fn error_status(error: &PlacementServiceError) -> StatusCode {
    match error {
        PlacementServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        PlacementServiceError::Access(_) => StatusCode::FORBIDDEN,
        PlacementServiceError::IneligibleStudent(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementServiceError::DuplicateApplication { .. }
        | PlacementServiceError::OfferFailed(_) => StatusCode::CONFLICT,
        PlacementServiceError::NotFound { .. }
        | PlacementServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PlacementServiceError::Repository(RepositoryError::Conflict { .. }) => StatusCode::CONFLICT,
        PlacementServiceError::Validation(_) | PlacementServiceError::Import(_) => {
            StatusCode::BAD_REQUEST
        }
        PlacementServiceError::Export(_)
        | PlacementServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(error: PlacementServiceError) -> Response {
    let status = error_status(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "placement request failed");
    }

    let payload = match &error {
        PlacementServiceError::IneligibleStudent(reason) => json!({
            "error": error.to_string(),
            "reason": reason,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, PlacementServiceError>) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn csv_attachment(file_name: &str, result: Result<Vec<u8>, PlacementServiceError>) -> Response {
    match result {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_student_handler<S>(
    State(service): SharedService<S>,
    axum::Json(registration): axum::Json<StudentRegistration>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = blocking(service, move |service| service.register_student(registration)).await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn register_company_handler<S>(
    State(service): SharedService<S>,
    axum::Json(registration): axum::Json<CompanyRegistration>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = blocking(service, move |service| service.register_company(registration))
        .await
        .map(|(account, profile)| CompanyRow {
            account,
            profile,
            job_count: 0,
        });
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_account_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(update): axum::Json<AccountUpdate>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.update_account(&actor, update)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn student_dashboard_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.student_dashboard(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn student_profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.student_profile(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_student_profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(update): axum::Json<StudentProfileUpdate>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.update_student_profile(&actor, update)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn upload_resume_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(upload): axum::Json<ResumeUpload>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.upload_resume(&actor, &upload.file_name)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn job_listings_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.job_listings(&actor, &filter)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn job_detail_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.job_detail(&actor, JobId(job_id))
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn apply_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.apply(&actor, JobId(job_id))
    })
    .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn student_applications_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.student_applications(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn student_interviews_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.student_interviews(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn placement_status_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.placement_status(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn company_dashboard_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.company_dashboard(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn company_profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.company_profile(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_company_profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(update): axum::Json<CompanyProfileUpdate>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.update_company_profile(&actor, update)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn post_job_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(details): axum::Json<JobDetails>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.post_job(&actor, details)
    })
    .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn posted_jobs_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let result = as_actor(service, headers, move |service, actor| {
        service.posted_jobs(&actor, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_job_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
    axum::Json(details): axum::Json<JobDetails>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.update_job(&actor, JobId(job_id), details)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn applicants_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.applicants(&actor, JobId(job_id))
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn review_applications_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.review_applications(
            &actor,
            JobId(job_id),
            request.action,
            &request.application_ids,
        )
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn schedule_interviews_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
    axum::Json(plan): axum::Json<InterviewPlan>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.schedule_interviews(&actor, JobId(job_id), plan)
    })
    .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn extend_offer_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path((job_id, application_id)): Path<(u64, u64)>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.extend_offer(&actor, JobId(job_id), ApplicationId(application_id))
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn company_interviews_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.company_interviews(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn admin_dashboard_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.admin_dashboard(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn analytics_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| service.analytics(&actor)).await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_students_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let result = as_actor(service, headers, move |service, actor| {
        service.list_students(&actor, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_companies_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let result = as_actor(service, headers, move |service, actor| {
        service.list_companies(&actor, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn pending_companies_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.pending_companies(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn approve_company_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(company_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.approve_company(&actor, AccountId(company_id))
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_jobs_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<AdminJobsQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let filter = JobFilter {
        title: query.title,
        company: query.company,
    };
    let result = as_actor(service, headers, move |service, actor| {
        service.list_jobs(&actor, &filter, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn pending_jobs_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.pending_jobs(&actor)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn approve_job_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.approve_job(&actor, JobId(job_id))
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn reject_job_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(job_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    match as_actor(service, headers, move |service, actor| {
        service.reject_job(&actor, JobId(job_id))
    })
    .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_interviews_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<AdminInterviewsQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let filter = InterviewFilter {
        company: query.company,
    };
    let result = as_actor(service, headers, move |service, actor| {
        service.list_interviews(&actor, &filter, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn audit_log_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let page = page_number(query.page.as_deref());
    let result = as_actor(service, headers, move |service, actor| {
        service.audit_log(&actor, page)
    })
    .await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn documents_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| service.documents(&actor)).await;
    respond(StatusCode::OK, result)
}

pub(crate) async fn upload_document_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    axum::Json(upload): axum::Json<DocumentUpload>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.upload_document(&actor, upload)
    })
    .await;
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn delete_document_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(document_id): Path<u64>,
) -> Response
where
    S: PlacementStore + 'static,
{
    match as_actor(service, headers, move |service, actor| {
        service.delete_document(&actor, DocumentId(document_id))
    })
    .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_students_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(filter): Query<StudentExportFilter>,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.export_students(&actor, &filter)
    })
    .await;
    csv_attachment("students_report.csv", result)
}

pub(crate) async fn export_jobs_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.export_jobs(&actor)
    })
    .await;
    csv_attachment("jobs_report.csv", result)
}

pub(crate) async fn import_students_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    body: String,
) -> Response
where
    S: PlacementStore + 'static,
{
    let result = as_actor(service, headers, move |service, actor| {
        service.import_students(&actor, body.as_bytes())
    })
    .await;
    respond(StatusCode::CREATED, result)
}
