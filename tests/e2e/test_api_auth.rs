//! Login and dashboard access control.

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use super::test_helpers::{TEST_ADMIN_USERNAME, create_test_app, create_test_context, login};

#[actix_web::test]
async fn test_login_returns_token() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let token = login(&app).await;
    assert_eq!(token.split('.').count(), 3, "token should be a JWT");
}

#[actix_web::test]
async fn test_login_rejects_bad_password() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "username": TEST_ADMIN_USERNAME,
            "password": "wrong",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn test_dashboard_requires_token() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_dashboard_with_token_returns_empty_stats() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;
    let token = login(&app).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["stats"]["totalNGOs"], 0);
    assert_eq!(body["stats"]["totalPeopleHelped"], 0);
    assert_eq!(body["regions"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_health_and_openapi_are_public() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx, 1024 * 1024).await;

    for uri in ["/api/v1/health", "/api/v1/ready", "/api/v1/openapi.json"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
    }
}
