//! Document metadata: attach, list, and combined upload.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Value, json};

use paddock_integration_tests::{Client, FailingDocuments, MultipartForm, TestApp};
use paddock_server::db::Store;

async fn attach(client: &Client, title: &str, entity_type: &str, entity_id: i64) -> Value {
    let response = client
        .post_json(
            "/api/documents",
            &json!({
                "title": title,
                "document_type": "invoice",
                "file_url": "/uploads/documents/1730000000000-123.pdf",
                "entity_type": entity_type,
                "entity_id": entity_id,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_document_created_for_horse_is_listed_with_uploader() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let horse = app.create_horse(&client, "Blitz").await;
    let horse_id = horse["id"].as_i64().unwrap();

    let created = attach(&client, "Hufschmied März", "horse", horse_id).await;
    assert_eq!(created["entity_type"], "horse");
    assert_eq!(created["entity_id"], horse_id);
    assert_eq!(created["uploaded_by_id"], user["id"]);

    let listed = client.get(&format!("/api/documents/horse/{horse_id}")).await;
    assert_eq!(listed.status, StatusCode::OK);
    let listed = listed.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["title"], "Hufschmied März");
    assert_eq!(listed[0]["uploaded_by"]["username"], "anna");

    // Same id, other kind: nothing attached there.
    let user_docs = client.get(&format!("/api/documents/user/{horse_id}")).await;
    assert_eq!(user_docs.status, StatusCode::OK);
    assert_eq!(user_docs.json(), json!([]));

    let horses = client.get("/api/horses").await.json();
    assert_eq!(horses[0]["documents"][0]["id"], created["id"]);
}

#[tokio::test]
async fn test_document_for_missing_entity_is_not_found() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;

    let response = client
        .post_json(
            "/api/documents",
            &json!({
                "title": "Rechnung",
                "document_type": "invoice",
                "file_url": "/uploads/documents/1-2.pdf",
                "entity_type": "horse",
                "entity_id": 9999,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.document_count().await, 0);
}

#[tokio::test]
async fn test_document_validation() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let user_id = user["id"].as_i64().unwrap();

    let blank_title = client
        .post_json(
            "/api/documents",
            &json!({
                "title": "  ",
                "document_type": "other",
                "file_url": "/uploads/documents/1-2.pdf",
                "entity_type": "user",
                "entity_id": user_id,
            }),
        )
        .await;
    assert_eq!(blank_title.status, StatusCode::BAD_REQUEST);

    let bad_kind = client.get(&format!("/api/documents/stable/{user_id}")).await;
    assert_eq!(bad_kind.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.document_count().await, 0);
}

#[tokio::test]
async fn test_malformed_document_body_is_bad_request() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let user_id = user["id"].as_i64().unwrap();

    let unknown_kind = client
        .post_json(
            "/api/documents",
            &json!({
                "title": "Boxenvertrag",
                "document_type": "other",
                "file_url": "/uploads/documents/1-2.pdf",
                "entity_type": "stable",
                "entity_id": user_id,
            }),
        )
        .await;
    assert_eq!(unknown_kind.status, StatusCode::BAD_REQUEST);
    assert!(unknown_kind.text().contains("stable"), "{}", unknown_kind.text());
    assert!(!unknown_kind.text().contains("Failed to deserialize"));

    let missing_title = client
        .post_json(
            "/api/documents",
            &json!({
                "document_type": "invoice",
                "file_url": "/uploads/documents/1-2.pdf",
                "entity_type": "user",
                "entity_id": user_id,
            }),
        )
        .await;
    assert_eq!(missing_title.status, StatusCode::BAD_REQUEST);
    assert!(missing_title.text().contains("title"), "{}", missing_title.text());

    let not_json = client
        .post_json("/api/horses", &json!("just a string"))
        .await;
    assert_eq!(not_json.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.document_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_creates_both_succeed() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let user_id = user["id"].as_i64().unwrap();

    let (first, second) = tokio::join!(
        attach(&client, "Vertrag", "user", user_id),
        attach(&client, "Zertifikat", "user", user_id),
    );
    assert_ne!(first["id"], second["id"]);

    let listed = client.get(&format!("/api/documents/user/{user_id}")).await.json();
    let listed_ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_i64().unwrap())
        .collect();

    let mut created_ids = vec![first["id"].as_i64().unwrap(), second["id"].as_i64().unwrap()];
    created_ids.sort_unstable();
    assert_eq!(listed_ids, created_ids);
}

#[tokio::test]
async fn test_documents_are_listed_in_creation_order() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;
    let horse = app.create_horse(&client, "Blitz").await;
    let horse_id = horse["id"].as_i64().unwrap();

    for title in ["Januar", "Februar", "März"] {
        attach(&client, title, "horse", horse_id).await;
    }

    let listed = client.get(&format!("/api/documents/horse/{horse_id}")).await.json();
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Januar", "Februar", "März"]);
}

#[tokio::test]
async fn test_combined_upload_stores_file_and_row() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;
    let horse = app.create_horse(&client, "Blitz").await;
    let horse_id = horse["id"].as_i64().unwrap();

    let response = client
        .post_multipart(
            "/api/documents/upload",
            MultipartForm::new()
                .file("document", "impfpass.pdf", "application/pdf", b"%PDF-1.7\n")
                .text("title", "Impfpass")
                .text("document_type", "other")
                .text("entity_type", "horse")
                .text("entity_id", &horse_id.to_string()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());

    let document = response.json();
    assert_eq!(document["document_type"], "other");
    let url = document["file_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/documents/"), "{url}");
    assert_eq!(client.get(url).await.body.as_ref(), b"%PDF-1.7\n");
    assert_eq!(app.store.document_count().await, 1);
}

#[tokio::test]
async fn test_combined_upload_for_missing_entity_writes_nothing() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;

    let response = client
        .post_multipart(
            "/api/documents/upload",
            MultipartForm::new()
                .text("title", "Impfpass")
                .text("document_type", "other")
                .text("entity_type", "horse")
                .text("entity_id", "9999")
                .file("document", "impfpass.pdf", "application/pdf", b"%PDF"),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_combined_upload_removes_file_when_insert_fails() {
    let app = TestApp::with_store(|memory| {
        Arc::new(FailingDocuments(memory)) as Arc<dyn Store>
    });
    let (client, user) = app.register("anna").await;
    let user_id = user["id"].as_i64().unwrap();

    let response = client
        .post_multipart(
            "/api/documents/upload",
            MultipartForm::new()
                .text("title", "Vertrag")
                .text("document_type", "other")
                .text("entity_type", "user")
                .text("entity_id", &user_id.to_string())
                .file("document", "vertrag.pdf", "application/pdf", b"%PDF"),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal server error");
    assert!(app.stored_files().is_empty());
}
