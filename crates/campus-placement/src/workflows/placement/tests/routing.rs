use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::placement::access::Actor;
use crate::workflows::placement::domain::{AccountId, Branch};
use crate::workflows::placement::repository::InMemoryPlacementStore;
use crate::workflows::placement::router::{
    apply_handler, placement_router, reject_job_handler, ACCOUNT_HEADER,
};

fn as_header(actor: &Actor) -> String {
    actor.account_id.0.to_string()
}

fn json_request(method: &str, uri: &str, actor: Option<&Actor>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACCOUNT_HEADER, as_header(actor));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json body")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

async fn send(router: &Router, request: Request<Body>) -> axum::response::Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes")
}

fn headers_for(actor: &Actor) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCOUNT_HEADER,
        HeaderValue::from_str(&as_header(actor)).expect("valid header"),
    );
    headers
}

fn campus_router() -> (Campus<InMemoryPlacementStore>, Router) {
    let (campus, store) = campus();
    let router = placement_router(Arc::new(service_with_store(store)));
    (campus, router)
}

#[tokio::test]
async fn registration_route_creates_students() {
    let (_, router) = campus_router();
    let response = send(
        &router,
        json_request(
            "POST",
            "/api/v1/register/student",
            None,
            Some(json!({
                "username": "asha",
                "email": "asha@campus.edu",
                "first_name": "Asha",
                "branch": "CSE",
                "cgpa": 8.1
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["account"]["username"], "asha");
    assert_eq!(payload["profile"]["branch"], "CSE");
    assert_eq!(payload["profile"]["is_placed"], false);

    let duplicate = send(
        &router,
        json_request(
            "POST",
            "/api/v1/register/student",
            None,
            Some(json!({
                "username": "asha",
                "email": "asha2@campus.edu",
                "branch": "ECE"
            })),
        ),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(duplicate).await;
    assert_eq!(payload["error"], "username 'asha' is already taken");
}

#[tokio::test]
async fn requests_without_a_known_account_are_unauthorized() {
    let (campus, router) = campus_router();

    let missing = send(
        &router,
        json_request("GET", "/api/v1/student/dashboard", None, None),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let unknown = send(
        &router,
        json_request(
            "GET",
            "/api/v1/student/dashboard",
            Some(&Actor::student(AccountId(999))),
            None,
        ),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let malformed = Request::builder()
        .uri("/api/v1/admin/dashboard")
        .header(ACCOUNT_HEADER, "tpo")
        .body(Body::empty())
        .expect("request builds");
    assert_eq!(send(&router, malformed).await.status(), StatusCode::UNAUTHORIZED);

    let admin = send(
        &router,
        json_request("GET", "/api/v1/admin/dashboard", Some(&campus.admin), None),
    )
    .await;
    assert_eq!(admin.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let (campus, router) = campus_router();
    let response = send(
        &router,
        json_request("GET", "/api/v1/admin/analytics", Some(&campus.company), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("admin")));
}

#[tokio::test]
async fn apply_route_maps_outcomes_to_status_codes() {
    let (campus, router) = campus_router();
    let asha = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let ravi = register_student(&campus.service, "ravi", Branch::Mechanical, Some(9.0), 0);
    let uri = format!("/api/v1/student/jobs/{}/apply", campus.job.id);

    let created = send(&router, json_request("POST", &uri, Some(&asha), None)).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload["status"], "applied");

    let duplicate = send(&router, json_request("POST", &uri, Some(&asha), None)).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let ineligible = send(&router, json_request("POST", &uri, Some(&ravi), None)).await;
    assert_eq!(ineligible.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(ineligible).await;
    assert!(payload.get("reason").is_some());
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("branch ME")));

    let missing = send(
        &router,
        json_request("POST", "/api/v1/student/jobs/404/apply", Some(&asha), None),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn company_pipeline_runs_over_http() {
    let (campus, router) = campus_router();
    let asha = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let application = campus.service.apply(&asha, campus.job.id).expect("applied");
    let job_uri = format!("/api/v1/company/jobs/{}", campus.job.id);

    let reviewed = send(
        &router,
        json_request(
            "POST",
            &format!("{job_uri}/applications"),
            Some(&campus.company),
            Some(json!({
                "action": "shortlist",
                "application_ids": [application.id.0]
            })),
        ),
    )
    .await;
    assert_eq!(reviewed.status(), StatusCode::OK);
    let payload = read_json_body(reviewed).await;
    assert_eq!(payload["status"], "shortlisted");

    let scheduled = send(
        &router,
        json_request(
            "POST",
            &format!("{job_uri}/interviews"),
            Some(&campus.company),
            Some(json!({
                "interview_date": "2024-08-12",
                "interview_time": "10:00:00",
                "round_name": "Technical Round 1",
                "mode": "in_person",
                "venue_or_link": "Seminar Hall B"
            })),
        ),
    )
    .await;
    assert_eq!(scheduled.status(), StatusCode::CREATED);
    let payload = read_json_body(scheduled).await;
    assert_eq!(payload["scheduled"].as_array().map(Vec::len), Some(1));

    let offered = send(
        &router,
        json_request(
            "POST",
            &format!("{job_uri}/offer/{}", application.id),
            Some(&campus.company),
            None,
        ),
    )
    .await;
    assert_eq!(offered.status(), StatusCode::OK);

    let again = send(
        &router,
        json_request(
            "POST",
            &format!("{job_uri}/offer/{}", application.id),
            Some(&campus.company),
            None,
        ),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let placement = send(
        &router,
        json_request("GET", "/api/v1/student/placement", Some(&asha), None),
    )
    .await;
    let payload = read_json_body(placement).await;
    assert_eq!(payload["is_placed"], true);
    assert_eq!(payload["offer"]["company_name"], "Acme Systems");
}

#[tokio::test]
async fn invalid_job_posting_is_a_bad_request() {
    let (campus, router) = campus_router();
    let response = send(
        &router,
        json_request(
            "POST",
            "/api/v1/company/jobs",
            Some(&campus.company),
            Some(json!({
                "title": "Intern",
                "description": "Summer internship",
                "location": " ",
                "application_deadline": "2024-09-15",
                "allowed_branches": "CSE"
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "location is required");
}

#[tokio::test]
async fn student_report_downloads_as_csv() {
    let (campus, router) = campus_router();
    register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);

    let response = send(
        &router,
        json_request(
            "GET",
            "/api/v1/admin/reports/students.csv?branch=CSE",
            Some(&campus.admin),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE),
        Some(&HeaderValue::from_static("text/csv"))
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION),
        Some(&HeaderValue::from_static(
            "attachment; filename=\"students_report.csv\""
        ))
    );
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let text = String::from_utf8(body.to_vec()).expect("utf-8");
    assert!(text.starts_with("Username,First Name,Last Name,Email,Branch,CGPA,Backlogs,Placed Status"));
    assert!(text.contains("asha,Asha,Student"));
}

#[tokio::test]
async fn import_route_reports_the_failing_line() {
    let (campus, router) = campus_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/admin/import/students")
        .header(ACCOUNT_HEADER, as_header(&campus.admin))
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(
            "username,email,first_name,branch\nasha,asha@campus.edu,Asha,CSE\nravi,ravi@campus.edu,Ravi,XYZ\n",
        ))
        .expect("request builds");

    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("line 3")));

    let students = campus
        .service
        .list_students(&campus.admin, 1)
        .expect("loads");
    assert_eq!(students.total_items, 0);
}

#[tokio::test]
async fn reject_handler_returns_no_content() {
    let (campus, _) = campus();
    let pending = campus
        .service
        .post_job(&campus.company, job_details("QA Engineer", None, None, "CSE"))
        .expect("posted");
    let admin_headers = headers_for(&campus.admin);
    let service = Arc::new(campus.service);

    let response = reject_job_handler::<InMemoryPlacementStore>(
        State(service.clone()),
        admin_headers.clone(),
        Path(pending.id.0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = reject_job_handler::<InMemoryPlacementStore>(
        State(service.clone()),
        admin_headers.clone(),
        Path(campus.job.id.0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = reject_job_handler::<InMemoryPlacementStore>(
        State(service),
        admin_headers,
        Path(pending.id.0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn apply_handler_returns_internal_error_when_store_is_down() {
    let service = Arc::new(service_with_store(Arc::new(UnavailableStore)));
    let response = apply_handler::<UnavailableStore>(
        State(service),
        headers_for(&Actor::student(AccountId(3))),
        Path(1),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("database offline")));
}

#[tokio::test]
async fn handlers_run_store_work_off_the_runtime_thread() {
    let store = Arc::new(ThreadRecordingStore::new());
    let campus = campus_on(service_with_store(store.clone()));
    let student = register_student(&campus.service, "asha", Branch::ComputerScience, Some(8.0), 0);
    let job_id = campus.job.id;
    store.take_threads();

    let response = apply_handler::<ThreadRecordingStore>(
        State(Arc::new(campus.service)),
        headers_for(&student),
        Path(job_id.0),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let runtime_thread = std::thread::current().id();
    let touched = store.take_threads();
    assert!(!touched.is_empty());
    assert!(touched.iter().all(|thread| *thread != runtime_thread));
}
