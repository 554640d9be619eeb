//! The HTTP client against a live server on an ephemeral port.

mod common;

use actix_web::{web, App, HttpServer};

use jobtrack::client::{DraftField, JobsApi};
use jobtrack::http::configure_routes;
use jobtrack::models::{JobPatch, NewJob};
use jobtrack::{ApiError, HttpJobsApi, JobService, JobStatus, Tracker};

use common::TestHarness;

/// Starts the REST API on 127.0.0.1:0 and returns the collection URL.
fn start_server(service: JobService) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .configure(configure_routes)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}/api/jobs", addr)
}

#[actix_web::test]
async fn test_api_round_trip() {
    let harness = TestHarness::new();
    let api = HttpJobsApi::new(&start_server(harness.service())).unwrap();

    let created = api
        .create(&NewJob::new("Acme", "Engineer").with_status(JobStatus::Interview))
        .await
        .unwrap();
    assert_eq!(created.status, JobStatus::Interview);

    let listed = api.list().await.unwrap();
    assert_eq!(listed.jobs, vec![created.clone()]);
    assert_eq!(listed.skipped, 0);

    let updated = api
        .update(&created.id, &JobPatch::status(JobStatus::Offer))
        .await
        .unwrap();
    assert_eq!(updated.status, JobStatus::Offer);

    let first = api.delete(&created.id).await.unwrap();
    let second = api.delete(&created.id).await.unwrap();
    assert!(first.deleted);
    assert!(!second.deleted);
    assert_eq!(second.message, "Job deleted");
}

#[actix_web::test]
async fn test_api_errors_map_to_variants() {
    let harness = TestHarness::new();
    let api = HttpJobsApi::new(&start_server(harness.service())).unwrap();

    let missing_role = NewJob {
        company: Some("Acme".to_string()),
        ..Default::default()
    };
    match api.create(&missing_role).await {
        Err(ApiError::Rejected(message)) => assert!(message.contains("role is required")),
        other => panic!("expected Rejected, got {:?}", other),
    }

    assert_eq!(
        api.update("ghost", &JobPatch::status(JobStatus::Offer)).await,
        Err(ApiError::NotFound("ghost".to_string()))
    );
}

#[actix_web::test]
async fn test_tracker_over_http() {
    let harness = TestHarness::new();
    let mut tracker = Tracker::new(HttpJobsApi::new(&start_server(harness.service())).unwrap());

    tracker.load().await.unwrap();
    tracker.edit_draft(DraftField::Company, "Globex").unwrap();
    tracker.edit_draft(DraftField::Role, "Analyst").unwrap();
    tracker.edit_draft(DraftField::Notes, "via referral").unwrap();
    tracker.submit_draft().await.unwrap();

    let records = tracker.state().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].notes, "via referral");

    // Same record is visible straight from the store.
    assert_eq!(harness.service().list().unwrap(), records.to_vec());
}

#[actix_web::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop a listener to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let api = HttpJobsApi::new(&format!("http://127.0.0.1:{}/api/jobs", port)).unwrap();

    assert!(matches!(api.list().await, Err(ApiError::Transport(_))));
}

#[actix_web::test]
async fn test_wrong_base_url_is_rejected_not_missing_job() {
    let harness = TestHarness::new();
    let jobs_url = start_server(harness.service());
    let api = HttpJobsApi::new(jobs_url.trim_end_matches("/jobs")).unwrap();

    match api.list().await {
        Err(ApiError::Rejected(message)) => {
            assert!(message.contains("404"), "{}", message);
            assert!(message.contains("/api"), "{}", message);
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert!(matches!(
        api.create(&NewJob::new("Acme", "Engineer")).await,
        Err(ApiError::Rejected(_))
    ));
    assert!(harness.service().list().unwrap().is_empty());
}
