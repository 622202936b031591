//! `/api/v1/auth` and `/api/v1/onboarding` through the full router.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, post_json, post_json_auth};
use serde_json::json;
use upstart_core::identity::{IdentityError, RATE_LIMIT_MESSAGE};
use upstart_core::roles::{OnboardingStatus, Role};

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_assigns_role_on_first_visit() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(None, None);

    let response = get_auth(
        &app.router,
        "/api/v1/auth/resolve?path=/auth/callback&role=startup",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "redirect");
    assert_eq!(json["data"]["location"], "/onboarding");
    assert_eq!(app.identity.user(&token).unwrap().role, Some(Role::Startup));
    assert_eq!(app.profiles.len(), 1);
}

#[tokio::test]
async fn resolve_without_role_is_role_not_found() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(None, None);

    let response = get_auth(&app.router, "/api/v1/auth/resolve", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ROLE_NOT_FOUND");
    assert_eq!(json["error"], "Role not found");
}

#[tokio::test]
async fn resolve_surfaces_rate_limiting() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(None, None);
    app.identity
        .fail("assign_role_if_unset", IdentityError::from_provider(Some(429), "slow down"));

    let response = get_auth(&app.router, "/api/v1/auth/resolve?role=student", &token).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
    assert_eq!(json["error"], RATE_LIMIT_MESSAGE);
    assert_eq!(app.profiles.len(), 0);
}

#[tokio::test]
async fn resolve_without_session_goes_to_login() {
    let app = build_test_app();
    let json = body_json(get(&app.router, "/api/v1/auth/resolve?role=student").await).await;
    assert_eq!(json["data"]["location"], "/login");

    let json = body_json(get(&app.router, "/api/v1/auth/resolve?path=/login").await).await;
    assert_eq!(json["data"]["action"], "continue");
}

#[tokio::test]
async fn malformed_authorization_header_is_401() {
    let app = build_test_app();
    let request = axum::http::Request::get("/api/v1/auth/session")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = common::send(&app.router, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Signup / login / session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_validates_and_rejects_duplicates() {
    let app = build_test_app();

    let bad = post_json(
        &app.router,
        "/api/v1/auth/signup",
        json!({ "email": "not-an-email", "password": "secret123" }),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(bad).await["code"], "VALIDATION_ERROR");

    let body = json!({ "email": "ada@example.com", "password": "secret123" });
    let created = post_json(&app.router, "/api/v1/auth/signup", body.clone()).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let json = body_json(created).await;
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert!(json["data"]["role"].is_null());

    let duplicate = post_json(&app.router, "/api/v1/auth/signup", body).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_returns_tokens_or_401() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(Some(Role::Student), None);
    app.identity.add_credentials("ada@example.com", "secret123", &token);

    let ok = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "secret123" }),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["access_token"], token.as_str());
    assert_eq!(json["user"]["role"], "student");

    let bad = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(bad).await["error"], "Invalid email or password");
}

#[tokio::test]
async fn session_resolves_identity_kind() {
    let app = build_test_app();

    let (roleless, _) = app.identity.add_user(None, None);
    let json = body_json(get_auth(&app.router, "/api/v1/auth/session", &roleless).await).await;
    assert_eq!(json["data"]["kind"], "role_unset");
    assert_eq!(app.profiles.len(), 0);

    let (student, id) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::NotStarted));
    let json = body_json(get_auth(&app.router, "/api/v1/auth/session", &student).await).await;
    assert_eq!(json["data"]["kind"], "student");
    assert_eq!(json["data"]["profile"]["id"], id.to_string());
    assert_eq!(app.profiles.len(), 1);
}

#[tokio::test]
async fn session_requires_a_token() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn onboarding_status_follows_resolution() {
    let app = build_test_app();

    let json = body_json(get(&app.router, "/api/v1/onboarding").await).await;
    assert_eq!(json["data"]["location"], "/login");

    let (pending, _) = app
        .identity
        .add_user(Some(Role::Startup), Some(OnboardingStatus::NotStarted));
    let json = body_json(get_auth(&app.router, "/api/v1/onboarding", &pending).await).await;
    assert_eq!(json["data"]["action"], "continue");

    let (done, _) = app
        .identity
        .add_user(Some(Role::Startup), Some(OnboardingStatus::Complete));
    let json = body_json(get_auth(&app.router, "/api/v1/onboarding", &done).await).await;
    assert_eq!(json["data"]["location"], "/startup/dashboard");
}

#[tokio::test]
async fn onboarding_submission_completes_once() {
    let app = build_test_app();
    let (token, _) = app
        .identity
        .add_user(Some(Role::Student), Some(OnboardingStatus::NotStarted));

    let missing = post_json_auth(
        &app.router,
        "/api/v1/onboarding",
        &token,
        json!({ "first_name": "Ada" }),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        app.identity.user(&token).unwrap().onboarding_status,
        Some(OnboardingStatus::NotStarted)
    );

    let form = json!({ "first_name": "Ada", "last_name": "Lovelace" });
    let ok = post_json_auth(&app.router, "/api/v1/onboarding", &token, form.clone()).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["data"]["action"], "redirect");
    assert_eq!(json["data"]["location"], "/student/profile");
    assert_eq!(
        app.identity.user(&token).unwrap().onboarding_status,
        Some(OnboardingStatus::Complete)
    );

    let again = post_json_auth(&app.router, "/api/v1/onboarding", &token, form).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn onboarding_submission_without_role_is_forbidden() {
    let app = build_test_app();
    let (token, _) = app.identity.add_user(None, None);
    let response = post_json_auth(
        &app.router,
        "/api/v1/onboarding",
        &token,
        json!({ "company_name": "Acme" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
