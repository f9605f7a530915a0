//! HTTP tests for registration, login and lockout.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use chrono::Utc;
use tower::ServiceExt;

use common::{assert_status, json_body, json_request, TestApp, MAX_FAILED_ATTEMPTS};
use supplier_api::domain::UserClaim;
use supplier_api::infra::UserRepository;
use supplier_api::services::verify_token;

const PASSWORD: &str = "Secret1!";

fn register_body(email: &str, password: &str) -> Value {
    json!({"email": email, "password": password, "confirm_password": password})
}

fn login_body(email: &str, password: &str) -> Value {
    json!({"email": email, "password": password})
}

#[tokio::test]
async fn register_issues_token() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(register_body("new@example.com", PASSWORD)),
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 7200);
    assert_eq!(body["user_token"]["email"], "new@example.com");

    let claims = verify_token(body["access_token"].as_str().unwrap(), &app.config).unwrap();
    assert_eq!(claims.email, "new@example.com");

    let stored = app.users.find_by_email("new@example.com").await.unwrap().unwrap();
    assert!(stored.email_confirmed);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_case_insensitively() {
    let app = TestApp::new();

    let first = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(register_body("dup@example.com", PASSWORD)),
        )
        .await;
    assert_status(&first, StatusCode::OK);

    let second = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(register_body("DUP@example.com", PASSWORD)),
        )
        .await;
    assert_status(&second, StatusCode::BAD_REQUEST);

    let body = json_body(second).await;
    assert_eq!(body["error"]["code"], "IDENTITY_ERROR");
    assert_eq!(
        body["error"]["details"][0],
        "Email 'DUP@example.com' is already taken."
    );
}

#[tokio::test]
async fn weak_password_lists_policy_violations() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(register_body("weak@example.com", "abcdef")),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "IDENTITY_ERROR");
    // Missing digit, uppercase and non-alphanumeric.
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn mismatched_confirmation_is_a_validation_error() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "email": "user@example.com",
                "password": PASSWORD,
                "confirm_password": "Different1!"
            })),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["confirm_password"].is_array());
}

#[tokio::test]
async fn register_without_fields_reports_each_one() {
    let app = TestApp::new();

    let response = app
        .send(Method::POST, "/register", None, Some(json!({})))
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn login_carries_granted_claims() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/register",
        None,
        Some(register_body("admin@example.com", PASSWORD)),
    )
    .await;

    let user = app.users.find_by_email("admin@example.com").await.unwrap().unwrap();
    app.users
        .add_claim(user.id, UserClaim::new("RemoveSupplier", ""))
        .await
        .unwrap();

    let response = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(login_body("admin@example.com", PASSWORD)),
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user_token"]["claims"][0]["type"], "RemoveSupplier");

    let claims = verify_token(body["access_token"].as_str().unwrap(), &app.config).unwrap();
    assert_eq!(claims.claims, vec![UserClaim::new("RemoveSupplier", "")]);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_look_the_same() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/register",
        None,
        Some(register_body("user@example.com", PASSWORD)),
    )
    .await;

    let unknown = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(login_body("nobody@example.com", PASSWORD)),
        )
        .await;
    let wrong = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(login_body("user@example.com", "Wrong1!x")),
        )
        .await;

    assert_status(&unknown, StatusCode::BAD_REQUEST);
    assert_status(&wrong, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(unknown).await, json_body(wrong).await);
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/register",
        None,
        Some(register_body("target@example.com", PASSWORD)),
    )
    .await;

    for attempt in 1..=MAX_FAILED_ATTEMPTS {
        let response = app
            .send(
                Method::POST,
                "/login",
                None,
                Some(login_body("target@example.com", "Wrong1!x")),
            )
            .await;
        assert_status(&response, StatusCode::BAD_REQUEST);

        let expected = if attempt == MAX_FAILED_ATTEMPTS {
            "LOCKED_OUT"
        } else {
            "INVALID_CREDENTIALS"
        };
        assert_eq!(json_body(response).await["error"]["code"], expected);
    }

    let response = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(login_body("target@example.com", PASSWORD)),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "LOCKED_OUT");
    assert_eq!(
        body["error"]["message"],
        "User temporarily blocked for invalid attempts"
    );
}

#[tokio::test]
async fn successful_login_resets_failure_count() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/register",
        None,
        Some(register_body("reset@example.com", PASSWORD)),
    )
    .await;

    app.send(
        Method::POST,
        "/login",
        None,
        Some(login_body("reset@example.com", "Wrong1!x")),
    )
    .await;

    let response = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(login_body("reset@example.com", PASSWORD)),
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let user = app.users.find_by_email("reset@example.com").await.unwrap().unwrap();
    assert_eq!(user.access_failed_count, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failures_still_lock_the_account() {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/register",
        None,
        Some(register_body("burst@example.com", PASSWORD)),
    )
    .await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..(MAX_FAILED_ATTEMPTS * 2) {
        let router = app.router.clone();
        let request = json_request(
            Method::POST,
            "/login",
            None,
            login_body("burst@example.com", "Wrong1!x").to_string(),
        );
        tasks.spawn(async move { router.oneshot(request).await.unwrap() });
    }

    let mut codes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let body = json_body(joined.unwrap()).await;
        codes.push(body["error"]["code"].as_str().unwrap_or_default().to_string());
    }

    let invalid = codes.iter().filter(|c| *c == "INVALID_CREDENTIALS").count();
    assert!(
        invalid < MAX_FAILED_ATTEMPTS as usize,
        "too many guesses allowed: {:?}",
        codes
    );
    assert!(codes.iter().any(|c| c == "LOCKED_OUT"), "{:?}", codes);

    let user = app.users.find_by_email("burst@example.com").await.unwrap().unwrap();
    assert!(user.is_locked_out(Utc::now()));
}
