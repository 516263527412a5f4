//! Every `/api` route except register and login refuses anonymous callers
//! without touching storage.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use paddock_integration_tests::{MultipartForm, TestApp};
use paddock_server::db::Store;

fn png_form(field: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", "Impfpass")
        .text("document_type", "other")
        .text("entity_type", "horse")
        .text("entity_id", "1")
        .file(field, "pass.png", "image/png", b"\x89PNG\r\n\x1a\n")
}

#[tokio::test]
async fn test_anonymous_requests_get_401_and_change_nothing() {
    let app = TestApp::new();
    let (owner, user) = app.register("anna").await;
    let horse = app.create_horse(&owner, "Blitz").await;
    let user_id = user["id"].as_i64().unwrap();
    let horse_id = horse["id"].as_i64().unwrap();

    let users_before = app.store.count_users().await.unwrap();
    let anonymous = app.client();

    let gets = [
        "/api/user".to_owned(),
        "/api/users".to_owned(),
        "/api/horses".to_owned(),
        "/api/appointments".to_owned(),
        "/api/stables".to_owned(),
        "/api/roles".to_owned(),
        "/api/event-groups".to_owned(),
        "/api/translations/de".to_owned(),
        format!("/api/documents/horse/{horse_id}"),
    ];
    for path in &gets {
        let response = anonymous.get(path).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "GET {path}");
        assert!(response.body.is_empty(), "GET {path}");
    }

    let json_posts = [
        ("/api/horses", json!({"name": "Sturm", "age": 4, "breed": "Trakehner", "height": 165})),
        (
            "/api/appointments",
            json!({
                "title": "Hufschmied",
                "start_time": "2026-11-02T08:00:00Z",
                "end_time": "2026-11-02T09:00:00Z",
            }),
        ),
        (
            "/api/documents",
            json!({
                "title": "Rechnung",
                "document_type": "invoice",
                "file_url": "/uploads/documents/1-2.pdf",
                "entity_type": "horse",
                "entity_id": horse_id,
            }),
        ),
    ];
    for (path, body) in &json_posts {
        let response = anonymous.post_json(path, body).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "POST {path}");
    }

    let patches = [
        (format!("/api/horses/{horse_id}"), json!({"name": "Umbenannt"})),
        (format!("/api/users/{user_id}"), json!({"role_id": 3})),
    ];
    for (path, body) in &patches {
        let response = anonymous.patch_json(path, body).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "PATCH {path}");
    }

    for (path, field) in [
        ("/api/upload/profile", "profile"),
        ("/api/upload/document", "document"),
        ("/api/documents/upload", "document"),
    ] {
        let response = anonymous.post_multipart(path, png_form(field)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "POST {path}");
    }

    assert_eq!(
        anonymous.post("/api/logout").await.status,
        StatusCode::UNAUTHORIZED
    );

    assert_eq!(app.store.count_users().await.unwrap(), users_before);
    let horses = app.store.list_horses().await.unwrap();
    assert_eq!(horses.len(), 1);
    assert_eq!(horses[0].name, "Blitz");
    assert!(app.store.list_appointments().await.unwrap().is_empty());
    assert_eq!(app.store.document_count().await, 0);
    let user = app.store.list_users().await.unwrap();
    assert_eq!(user[0].role_id, paddock_core::Role::Admin);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_forged_session_cookie_is_rejected() {
    let app = TestApp::new();
    app.register("anna").await;

    let client = app.client();
    for forged in [
        "paddock_session=not-a-session-id",
        "paddock_session=AAAAAAAAAAAAAAAAAAAAAA",
    ] {
        client.set_cookie(forged);
        let response = client.get("/api/horses").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{forged}");
    }
}
