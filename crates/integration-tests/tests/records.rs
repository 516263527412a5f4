//! Horses, appointments, users and lookup lists.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use paddock_core::{Role, UserId};
use paddock_integration_tests::TestApp;
use paddock_server::db::Store;

fn user_id(user: &serde_json::Value) -> UserId {
    UserId::new(i32::try_from(user["id"].as_i64().unwrap()).unwrap())
}

#[tokio::test]
async fn test_horse_vet_date_patch_leaves_other_fields() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let stable = app.store.insert_stable("C3", Some(user_id(&user))).await;
    let horse = client
        .post_json(
            "/api/horses",
            &json!({
                "name": "Blitz",
                "age": 9,
                "breed": "Haflinger",
                "height": 148,
                "owner_id": user["id"],
                "stable_id": stable.id,
                "profile_image_url": "/uploads/profiles/1-2.png",
            }),
        )
        .await
        .json();
    let id = horse["id"].as_i64().unwrap();
    assert_eq!(horse["next_vet_appointment"], json!(null));

    let patched = client
        .patch_json(
            &format!("/api/horses/{id}"),
            &json!({"next_vet_appointment": "2026-11-02"}),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK, "{}", patched.text());
    let patched = patched.json();
    assert_eq!(patched["next_vet_appointment"], "2026-11-02");
    let unchanged = [
        "id",
        "name",
        "age",
        "breed",
        "height",
        "owner_id",
        "stable_id",
        "profile_image_url",
    ];
    for field in unchanged {
        assert_eq!(patched[field], horse[field], "{field}");
    }

    let listed = client.get("/api/horses").await.json();
    assert_eq!(listed[0]["next_vet_appointment"], "2026-11-02");
    for field in unchanged {
        assert_eq!(listed[0][field], horse[field], "{field}");
    }

    let cleared = client
        .patch_json(
            &format!("/api/horses/{id}"),
            &json!({"next_vet_appointment": null}),
        )
        .await
        .json();
    assert_eq!(cleared["next_vet_appointment"], json!(null));
}

#[tokio::test]
async fn test_horse_errors() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;

    let missing = client
        .patch_json("/api/horses/9999", &json!({"name": "Geist"}))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let unnamed = client
        .post_json(
            "/api/horses",
            &json!({"name": "", "age": 3, "breed": "Pony", "height": 120}),
        )
        .await;
    assert_eq!(unnamed.status, StatusCode::BAD_REQUEST);

    let dangling_owner = client
        .post_json(
            "/api/horses",
            &json!({"name": "Nix", "age": 3, "breed": "Pony", "height": 120, "owner_id": 9999}),
        )
        .await;
    assert_eq!(dangling_owner.status, StatusCode::CONFLICT);
    assert!(app.store.list_horses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_horse_list_includes_owner_and_stable() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let stable = app
        .store
        .insert_stable("B7", Some(user_id(&user)))
        .await;

    let response = client
        .post_json(
            "/api/horses",
            &json!({
                "name": "Sturm",
                "age": 12,
                "breed": "Trakehner",
                "height": 166,
                "owner_id": user["id"],
                "stable_id": stable.id,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());

    let horses = client.get("/api/horses").await.json();
    assert_eq!(horses[0]["owner"]["username"], "anna");
    assert_eq!(horses[0]["stable"]["number"], "B7");
    assert_eq!(horses[0]["documents"], json!([]));
}

#[tokio::test]
async fn test_appointment_is_owned_by_caller() {
    let app = TestApp::new();
    let (client, user) = app.register("anna").await;
    let horse = app.create_horse(&client, "Blitz").await;
    let group = app.store.insert_event_group("Tierarzt", Some("#d9534f")).await;

    let response = client
        .post_json(
            "/api/appointments",
            &json!({
                "title": "Impfung",
                "start_time": "2026-11-02T08:00:00Z",
                "end_time": "2026-11-02T08:30:00Z",
                "horse_id": horse["id"],
                "event_group_id": group.id,
                "created_by_id": 9999,
                "recurrence": {"freq": "yearly"},
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    let created = response.json();
    assert_eq!(created["created_by_id"], user["id"]);
    assert_eq!(created["recurrence"], json!({"freq": "yearly"}));

    let listed = client.get("/api/appointments").await.json();
    assert_eq!(listed[0]["created_by"]["username"], "anna");
    assert_eq!(listed[0]["horse"]["name"], "Blitz");
    assert_eq!(listed[0]["event_group"]["name"], "Tierarzt");
    assert_eq!(listed[0]["assigned_to"], json!(null));
}

#[tokio::test]
async fn test_appointment_validation() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;

    let backwards = client
        .post_json(
            "/api/appointments",
            &json!({
                "title": "Ausritt",
                "start_time": "2026-11-02T10:00:00Z",
                "end_time": "2026-11-02T09:00:00Z",
            }),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);

    let dangling_horse = client
        .post_json(
            "/api/appointments",
            &json!({
                "title": "Ausritt",
                "start_time": "2026-11-02T09:00:00Z",
                "end_time": "2026-11-02T10:00:00Z",
                "horse_id": 9999,
            }),
        )
        .await;
    assert_eq!(dangling_horse.status, StatusCode::CONFLICT);
    assert!(app.store.list_appointments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_admins_change_roles() {
    let app = TestApp::new();
    let (admin, anna) = app.register("anna").await;
    let (customer, ben) = app.register("ben").await;
    let anna_id = anna["id"].as_i64().unwrap();
    let ben_id = ben["id"].as_i64().unwrap();

    let self_promotion = customer
        .patch_json(&format!("/api/users/{ben_id}"), &json!({"role_id": 1}))
        .await;
    assert_eq!(self_promotion.status, StatusCode::FORBIDDEN);
    let stored = app.store.get_user(user_id(&ben)).await.unwrap().unwrap();
    assert_eq!(stored.role_id, Role::Customer);

    let edit_other = customer
        .patch_json(&format!("/api/users/{anna_id}"), &json!({"first_name": "Mallory"}))
        .await;
    assert_eq!(edit_other.status, StatusCode::FORBIDDEN);

    let own_profile = customer
        .patch_json(
            &format!("/api/users/{ben_id}"),
            &json!({"first_name": "Benedikt", "role_id": 3}),
        )
        .await;
    assert_eq!(own_profile.status, StatusCode::OK, "{}", own_profile.text());
    assert_eq!(own_profile.json()["first_name"], "Benedikt");

    let promoted = admin
        .patch_json(&format!("/api/users/{ben_id}"), &json!({"role_id": 2}))
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.json()["role_id"], 2);

    let missing = admin
        .patch_json("/api/users/9999", &json!({"first_name": "Geist"}))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_list_hides_password_hash() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;
    app.register("ben").await;

    let users = client.get("/api/users").await.json();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn test_lookup_lists() {
    let app = TestApp::new();
    let (client, _) = app.register("anna").await;
    app.store.insert_stable("A1", None).await;
    app.store.insert_event_group("Hufschmied", None).await;
    app.store
        .insert_translation("de", "nav.horses", "Pferde")
        .await;
    app.store
        .insert_translation("en", "nav.horses", "Horses")
        .await;

    let roles = client.get("/api/roles").await.json();
    assert_eq!(
        roles,
        json!([
            {"id": 1, "name": "Admin"},
            {"id": 2, "name": "Staff"},
            {"id": 3, "name": "Customer"},
        ])
    );

    let stables = client.get("/api/stables").await.json();
    assert_eq!(stables[0]["number"], "A1");
    assert_eq!(stables[0]["occupied"], false);

    let groups = client.get("/api/event-groups").await.json();
    assert_eq!(groups[0]["name"], "Hufschmied");

    let german = client.get("/api/translations/de").await.json();
    assert_eq!(german, json!({"nav.horses": "Pferde"}));

    let unknown = client.get("/api/translations/fr").await.json();
    assert_eq!(unknown, json!({}));
}
