//! HTTP-level tests for the rugs API, driven through axum-test.

mod common;

use axum::http::{header, HeaderValue, Method, StatusCode};
use chrono::{Duration, Utc};
use common::{bearer, seed_admin, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use rugs::TokenService;
use serde_json::{json, Value};

async fn submit(app: &TestApp, name: &str) -> i64 {
    let response = app
        .server
        .post("/rug-request")
        .json(&json!({
            "name": name,
            "email": "customer@example.com",
            "details": "3x5 wool, indigo border"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["request"]["id"]
        .as_i64()
        .expect("id should be numeric")
}

// ============= Public endpoints =============

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_submit_rug_request() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/rug-request")
        .json(&json!({
            "name": "Ana",
            "email": "ana@example.com",
            "details": "Round jute rug, 2m"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Rug request submitted successfully!");
    assert_eq!(body["request"]["name"], "Ana");
    assert_eq!(body["request"]["status"], "PENDING");
}

#[tokio::test]
async fn test_submit_rug_request_validation() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/rug-request")
        .json(&json!({
            "name": "Ana",
            "email": "not-an-email",
            "details": "Round jute rug"
        }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "a valid email is required");

    let response = app
        .server
        .post("/rug-request")
        .json(&json!({ "email": "ana@example.com" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "name is required");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/rug-request")
        .json(&json!({
            "name": "Ana",
            "email": "ana@example.com",
            "details": "x".repeat(128 * 1024)
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_body_is_json_error() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/rug-request")
        .bytes("{not json".into())
        .content_type("application/json")
        .expect_failure()
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .is_some_and(|msg| msg.starts_with("Invalid request body")));
    assert!(app
        .state
        .store
        .list_rug_requests()
        .await
        .expect("query")
        .is_empty());
}

#[tokio::test]
async fn test_mistyped_fields_and_wrong_content_type_are_json_errors() {
    let app = TestApp::new().await;
    let id = submit(&app, "Ana").await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": 42, "pass": ADMIN_PASSWORD }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"].is_string());

    let response = app
        .server
        .put(&format!("/admin/rug-request/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token()))
        .text("COMPLETED")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(response.json::<Value>()["error"].is_string());
}

// ============= Login =============

#[tokio::test]
async fn test_login_returns_usable_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": ADMIN_EMAIL, "pass": ADMIN_PASSWORD }))
        .await;

    response.assert_status_ok();
    let token = response.json::<Value>()["token"]
        .as_str()
        .expect("token should be a string")
        .to_string();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(app.state.tokens.verify(&token), Ok(app.admin_id));

    let response = app
        .server
        .get("/admin/rug-requests")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_accepts_password_alias() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    let wrong_password = app
        .server
        .post("/login")
        .json(&json!({ "email": ADMIN_EMAIL, "pass": "WrongPassw0rd" }))
        .await;
    let unknown_email = app
        .server
        .post("/login")
        .json(&json!({ "email": "ghost@rugs.test", "pass": ADMIN_PASSWORD }))
        .await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();
    assert_eq!(wrong_password.text(), unknown_email.text());
    assert_eq!(
        wrong_password.json::<Value>(),
        json!({ "error": "Invalid credentials" })
    );
}

#[tokio::test]
async fn test_login_rejects_password_past_bcrypt_limit() {
    let app = TestApp::new().await;
    let stored = format!("Aa{}", "x".repeat(70));
    assert_eq!(stored.len(), 72);
    seed_admin(&app.state, "long@rugs.test", &stored).await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "long@rugs.test", "pass": format!("{stored}EXTRA-GARBAGE") }))
        .await;
    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Invalid credentials" })
    );

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "long@rugs.test", "pass": stored }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_email_ignores_case() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": ADMIN_EMAIL.to_uppercase(), "pass": ADMIN_PASSWORD }))
        .await;

    response.assert_status_ok();
}

// ============= Authentication gate =============

#[tokio::test]
async fn test_admin_route_without_header() {
    let app = TestApp::new().await;

    let response = app.server.get("/admin/rug-requests").await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Authorization header is required" })
    );
}

#[tokio::test]
async fn test_admin_route_with_malformed_header() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    for value in [token.clone(), format!("Basic {}", token), "Bearer ".to_string()] {
        let response = app
            .server
            .get("/admin/rug-requests")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&value).expect("valid header value"),
            )
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "Invalid token format");
    }
}

#[tokio::test]
async fn test_admin_route_with_foreign_token() {
    let app = TestApp::new().await;
    let foreign = TokenService::new("some-other-secret")
        .expect("valid secret")
        .issue(app.admin_id)
        .expect("should issue");

    let response = app
        .server
        .get("/admin/rug-requests")
        .add_header(header::AUTHORIZATION, bearer(&foreign))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_admin_route_with_expired_token() {
    let app = TestApp::new().await;
    let expired = app
        .state
        .tokens
        .issue_at(app.admin_id, Utc::now() - Duration::hours(7))
        .expect("should issue");

    let response = app
        .server
        .get("/admin/rug-requests")
        .add_header(header::AUTHORIZATION, bearer(&expired))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_rejected_mutation_has_no_effect() {
    let app = TestApp::new().await;
    let id = submit(&app, "Ana").await;

    let response = app
        .server
        .delete(&format!("/admin/rug-request/{}", id))
        .await;
    response.assert_status_unauthorized();

    let stored = app
        .state
        .store
        .get_rug_request(id)
        .await
        .expect("query should succeed");
    assert!(stored.is_some());
}

// ============= Admin: rug requests =============

#[tokio::test]
async fn test_list_rug_requests_newest_first() {
    let app = TestApp::new().await;
    let first = submit(&app, "First").await;
    let second = submit(&app, "Second").await;

    let response = app
        .server
        .get("/admin/rug-requests")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token()))
        .await;

    response.assert_status_ok();
    let ids: Vec<i64> = response
        .json::<Value>()
        .as_array()
        .expect("array body")
        .iter()
        .map(|r| r["id"].as_i64().expect("numeric id"))
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_update_status_and_list_completed() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let id = submit(&app, "Ana").await;

    let response = app
        .server
        .get("/admin/rug-requests/completed")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["requests"], json!([]));

    let response = app
        .server
        .put(&format!("/admin/rug-request/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "completed" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Request status updated successfully"
    );

    let response = app
        .server
        .get("/admin/rug-requests/completed")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["requests"][0]["id"], id);
    assert_eq!(body["requests"][0]["status"], "COMPLETED");
}

#[tokio::test]
async fn test_update_status_errors() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let id = submit(&app, "Ana").await;

    let response = app
        .server
        .put(&format!("/admin/rug-request/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "shipped" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "Invalid status value");

    let response = app
        .server
        .put("/admin/rug-request/not-a-number")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "APPROVED" }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "Invalid request ID");

    let response = app
        .server
        .put("/admin/rug-request/9999")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "APPROVED" }))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"], "Request not found");
}

#[tokio::test]
async fn test_delete_rug_request() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let id = submit(&app, "Ana").await;

    let response = app
        .server
        .delete(&format!("/admin/rug-request/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Rug request deleted successfully"
    );

    let response = app
        .server
        .delete(&format!("/admin/rug-request/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"], "Rug request not found");
}

// ============= Admin: provisioning =============

#[tokio::test]
async fn test_new_admin_can_log_in() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/admin/new-admin")
        .add_header(header::AUTHORIZATION, bearer(&app.admin_token()))
        .json(&json!({
            "name": "Second Admin",
            "email": "second@rugs.test",
            "pass": "An0therGoodOne"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let user_id = response.json::<Value>()["user_id"]
        .as_str()
        .expect("uuid string")
        .to_string();

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "second@rugs.test", "pass": "An0therGoodOne" }))
        .await;
    response.assert_status_ok();
    let token = response.json::<Value>()["token"]
        .as_str()
        .expect("token")
        .to_string();
    assert_eq!(
        app.state.tokens.verify(&token).map(|id| id.to_string()),
        Ok(user_id)
    );
}

#[tokio::test]
async fn test_new_admin_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/admin/new-admin")
        .json(&json!({
            "name": "Intruder",
            "email": "intruder@rugs.test",
            "pass": "Intrud3rPass"
        }))
        .await;

    response.assert_status_unauthorized();
    let lookup = app
        .state
        .store
        .get_admin_by_email("intruder@rugs.test")
        .await
        .expect("query should succeed");
    assert!(lookup.is_none());
}

#[tokio::test]
async fn test_new_admin_conflict_and_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let response = app
        .server
        .post("/admin/new-admin")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": "Duplicate",
            "email": ADMIN_EMAIL.to_uppercase(),
            "pass": "Dupl1catePass"
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = app
        .server
        .post("/admin/new-admin")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": "Weak",
            "email": "weak@rugs.test",
            "pass": "short"
        }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"],
        "password must be at least 8 characters"
    );
}

// ============= Cross-cutting =============

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = TestApp::new().await;

    let response = app
        .server
        .method(Method::OPTIONS, "/admin/rug-requests")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://shop.example.com"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("GET"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("authorization"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = TestApp::new().await;

    let response = app.server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/admin/rug-request/{id}"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer"].is_object());
}
