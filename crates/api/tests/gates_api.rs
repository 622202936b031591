//! Role gates, admin affordances and upload checks that resolve before any
//! database access.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get, get_auth, send};
use upstart_core::roles::{OnboardingStatus, Role};

fn multipart_upload(uri: &str, token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "upstart-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn unfinished_onboarding_is_redirected_from_dashboard() {
    let app = build_test_app();
    let (token, _) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::NotStarted));

    let response = get_auth(&app.router, "/api/v1/student/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REDIRECT");
    assert_eq!(json["redirect"], "/onboarding");
    assert_eq!(app.profiles.len(), 0);
}

#[tokio::test]
async fn other_role_area_redirects_to_own_dashboard() {
    let app = build_test_app();
    let (token, _) = app
        .identity
        .add_user(Some(Role::Startup), Some(OnboardingStatus::Complete));

    let json = body_json(get_auth(&app.router, "/api/v1/student/profile", &token).await).await;
    assert_eq!(json["code"], "REDIRECT");
    assert_eq!(json["redirect"], "/startup/dashboard");
}

#[tokio::test]
async fn roleless_user_gets_role_not_found() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(None, None);

    let response = get_auth(&app.router, "/api/v1/startup/profile", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ROLE_NOT_FOUND");
}

#[tokio::test]
async fn onboarded_student_reads_own_profile() {
    let app = build_test_app();
    let (token, id) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::Complete));

    let response = get_auth(&app.router, "/api/v1/student/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id.to_string());
    assert_eq!(json["data"]["skills"], serde_json::json!([]));
}

#[tokio::test]
async fn protected_areas_require_a_session() {
    let app = build_test_app();
    for uri in [
        "/api/v1/student/dashboard",
        "/api/v1/startup/dashboard",
        "/api/v1/startup/jobs",
    ] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn anonymous_caller_is_not_admin() {
    let app = build_test_app();
    let json = body_json(get(&app.router, "/api/v1/blog/admin-status").await).await;
    assert_eq!(json["data"]["is_admin"], false);

    let json = body_json(get_auth(&app.router, "/api/v1/blog/admin-status", "expired").await).await;
    assert_eq!(json["data"]["is_admin"], false);
}

#[tokio::test]
async fn upload_rejects_unknown_bucket_and_wrong_owner() {
    let app = build_test_app();
    let (student, _) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::Complete));

    let unknown = send(
        &app.router,
        multipart_upload("/api/v1/uploads/secrets", &student, "me.png", b"png"),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let wrong_owner = send(
        &app.router,
        multipart_upload("/api/v1/uploads/logos", &student, "logo.png", b"png"),
    )
    .await;
    assert_eq!(wrong_owner.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_rejects_disallowed_file_types() {
    let app = build_test_app();
    let (student, _) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::Complete));

    let response = send(
        &app.router,
        multipart_upload("/api/v1/uploads/resumes", &student, "cv.exe", b"MZ"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
