//! CSV upload, job status and job reports over HTTP.

use actix_web::http::StatusCode;
use actix_web::test;
use ngo_impact_lib::models::JobStatus;
use serde_json::Value;
use uuid::Uuid;

use super::test_helpers::{
    assert_terminal, create_test_app, create_test_context, multipart_upload, wait_for_job,
};

const CSV: &str = "ngoId,month,peopleHelped,eventsConducted,fundsUtilized,region\n\
NGO1,2024-01,100,5,1500,\n\
,2024-01,50,2,200,South\n\
NGO3,2024-01,75,3,900,East\n";

#[actix_web::test]
async fn test_upload_imports_in_background() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let (content_type, body) = multipart_upload(Some(CSV), Some("North"));
    let req = test::TestRequest::post()
        .uri("/api/v1/reports/upload")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "File processing started");
    let job_id: Uuid = body["jobId"].as_str().unwrap().parse().unwrap();

    let job = wait_for_job(&ctx.pool, job_id).await;
    assert_terminal(&job, JobStatus::Completed);
    assert_eq!(ctx.upload_count(), 0, "upload should be removed after import");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/job-status/{}", job_id))
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["totalRows"], 3);
    assert_eq!(status["processedRows"], 2);
    assert_eq!(status["failedRows"], 1);
    assert_eq!(status["errors"][0]["row"], 2);
    assert_eq!(status["errors"][0]["message"], "Missing ngoId or month");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{}/reports", job_id))
        .to_request();
    let reports: Value = test::call_and_read_body_json(&app, req).await;
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);

    let ngo1 = reports.iter().find(|r| r["ngoId"] == "NGO1").unwrap();
    assert_eq!(ngo1["region"], "North");
    assert_eq!(ngo1["jobId"], job_id.to_string());
}

#[actix_web::test]
async fn test_upload_without_file_is_rejected() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let (content_type, body) = multipart_upload(None, Some("North"));
    let req = test::TestRequest::post()
        .uri("/api/v1/reports/upload")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("No file uploaded"));
}

#[actix_web::test]
async fn test_upload_with_invalid_region_leaves_nothing_behind() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let (content_type, body) = multipart_upload(Some(CSV), Some("Central"));
    let req = test::TestRequest::post()
        .uri("/api/v1/reports/upload")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.upload_count(), 0);
}

#[actix_web::test]
async fn test_upload_over_size_limit_is_rejected() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 16).await;

    let (content_type, body) = multipart_upload(Some(CSV), None);
    let req = test::TestRequest::post()
        .uri("/api/v1/reports/upload")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.upload_count(), 0);
}

#[actix_web::test]
async fn test_unknown_job_is_not_found() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/job-status/{}", Uuid::now_v7()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{}/reports", Uuid::now_v7()))
        .to_request();
    let reports: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reports, serde_json::json!([]));
}
