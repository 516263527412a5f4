//! Registration, login, logout and the current-user endpoint.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use paddock_integration_tests::{PASSWORD, TestApp};

#[tokio::test]
async fn test_first_account_is_admin_and_later_ones_are_customers() {
    let app = TestApp::new();

    let (_, anna) = app.register("anna").await;
    let (_, ben) = app.register("ben").await;

    assert_eq!(anna["role_id"], 1);
    assert_eq!(ben["role_id"], 3);
    assert_eq!(ben["language"], "de");
    assert!(anna.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_logs_the_new_account_in() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;

    let response = client.get("/api/user").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["id"], user["id"]);
    assert_eq!(response.json()["username"], "anna");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new();
    app.register("anna").await;

    let response = app
        .client()
        .post_json(
            "/api/register",
            &json!({
                "username": "anna",
                "password": "another-password",
                "first_name": "Anna",
                "last_name": "Zweite",
                "address": "",
                "bank_account": "",
                "birth_date": "1990-01-01",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();
    let client = app.client();

    for (username, password) in [("anna", "short"), ("a b", PASSWORD), ("x", PASSWORD)] {
        let response = client
            .post_json(
                "/api/register",
                &json!({
                    "username": username,
                    "password": password,
                    "first_name": "A",
                    "last_name": "B",
                    "address": "",
                    "bank_account": "",
                    "birth_date": "1990-01-01",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{username}");
    }
    assert_eq!(app.client().get("/api/user").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = TestApp::new();
    app.register("anna").await;

    let client = app.client();
    let wrong = client
        .post_json(
            "/api/login",
            &json!({"username": "anna", "password": "not-the-password"}),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(client.get("/api/user").await.status, StatusCode::UNAUTHORIZED);

    let unknown = client
        .post_json(
            "/api/login",
            &json!({"username": "nobody", "password": PASSWORD}),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.text(), wrong.text());

    let ok = client
        .post_json("/api/login", &json!({"username": "anna", "password": PASSWORD}))
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.json()["username"], "anna");
    assert_eq!(client.get("/api/user").await.status, StatusCode::OK);

    assert_eq!(client.post("/api/logout").await.status, StatusCode::OK);
    assert_eq!(client.get("/api/user").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::new();
    let client = app.client();

    let live = client.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");

    assert_eq!(client.get("/health/ready").await.status, StatusCode::OK);
}
