//! HTTP integration tests for Paddock.
//!
//! Tests drive the production router in-process: the same routes, session
//! layer and extractors, backed by [`MemoryStore`] and a temporary upload
//! directory instead of `PostgreSQL` and the real upload root.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p paddock-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use paddock_core::{EntityKind, EntityRef, HorseId, UserId, Username};
use paddock_server::config::PaddockConfig;
use paddock_server::db::{MemoryStore, RepositoryError, Store};
use paddock_server::middleware::session_layer;
use paddock_server::models::{
    Appointment, Document, DocumentWithUploader, EventGroup, Horse, HorsePatch, NewAppointment,
    NewDocument, NewHorse, NewUser, RoleInfo, Stable, Translation, User, UserPatch,
};
use paddock_server::routes;
use paddock_server::services::LocalDiskStore;
use paddock_server::state::AppState;

/// Password used by [`TestApp::register`].
pub const PASSWORD: &str = "hay-and-oats";

/// A running application with its backing stores.
pub struct TestApp {
    router: Router,
    /// Store behind the router, for seeding and inspecting state.
    pub store: Arc<MemoryStore>,
    upload_dir: TempDir,
}

impl TestApp {
    /// App backed by a fresh [`MemoryStore`].
    pub fn new() -> Self {
        Self::with_store(|memory| memory as Arc<dyn Store>)
    }

    /// App whose store is built around the memory store, e.g. to inject
    /// failures.
    pub fn with_store(wrap: impl FnOnce(Arc<MemoryStore>) -> Arc<dyn Store>) -> Self {
        let upload_dir = tempfile::tempdir().expect("create upload dir");
        let config = PaddockConfig::for_tests(upload_dir.path().to_path_buf());

        let memory = Arc::new(MemoryStore::new());
        let store = wrap(Arc::clone(&memory));
        let files = Arc::new(LocalDiskStore::new(upload_dir.path()));

        let state = AppState::new(config, store, files);
        let sessions = session_layer(tower_sessions::MemoryStore::default(), false);

        Self {
            router: routes::app(state, sessions),
            store: memory,
            upload_dir,
        }
    }

    /// A client without a session.
    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookie: Arc::new(Mutex::new(None)),
        }
    }

    /// Register `username` and return a client logged in as them.
    ///
    /// The first account registered in an app is an admin.
    pub async fn register(&self, username: &str) -> (Client, Value) {
        let client = self.client();
        let response = client
            .post_json(
                "/api/register",
                &json!({
                    "username": username,
                    "password": PASSWORD,
                    "first_name": "Test",
                    "last_name": username,
                    "address": "Reitweg 4",
                    "bank_account": "DE02 1203 0000 0000 2020 51",
                    "birth_date": "1988-03-14",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        let user = response.json();
        (client, user)
    }

    /// Create a horse through the API and return its record.
    pub async fn create_horse(&self, client: &Client, name: &str) -> Value {
        let response = client
            .post_json(
                "/api/horses",
                &json!({"name": name, "age": 9, "breed": "Haflinger", "height": 148}),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()
    }

    /// Root of the temporary upload directory.
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Every regular file under the upload root, temp files included.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut pending = vec![self.upload_dir.path().to_path_buf()];
        while let Some(dir) = pending.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    files.push(path);
                }
            }
        }
        files
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Cookie-carrying client for one user agent.
#[derive(Clone)]
pub struct Client {
    router: Router,
    cookie: Arc<Mutex<Option<String>>>,
}

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Client {
    /// Replace the session cookie, e.g. with a forged one.
    pub fn set_cookie(&self, pair: &str) {
        *self.cookie.lock().unwrap() = Some(pair.to_owned());
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None, Body::empty()).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.send(Method::POST, path, None, Body::empty()).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        self.send(
            Method::POST,
            path,
            Some("application/json".to_owned()),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> TestResponse {
        self.send(
            Method::PATCH,
            path,
            Some("application/json".to_owned()),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn post_multipart(&self, path: &str, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        self.send(Method::POST, path, Some(content_type), Body::from(body))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: Option<String>,
        body: Body,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap_or_default()
                .to_owned();
            let cleared = pair.ends_with('=');
            *self.cookie.lock().unwrap() = (!cleared).then_some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "paddock-test-boundary-7MA4YWxkTrZu0gW".to_owned(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, mime: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Store that refuses every document insert and otherwise delegates.
pub struct FailingDocuments(pub Arc<MemoryStore>);

#[async_trait]
impl Store for FailingDocuments {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.0.ping().await
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        self.0.count_users().await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.0.create_user(user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.0.get_user(id).await
    }

    async fn get_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.0.get_credentials(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.0.list_users().await
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        self.0.update_user(id, patch).await
    }

    async fn list_horses(&self) -> Result<Vec<Horse>, RepositoryError> {
        self.0.list_horses().await
    }

    async fn get_horse(&self, id: HorseId) -> Result<Option<Horse>, RepositoryError> {
        self.0.get_horse(id).await
    }

    async fn create_horse(&self, horse: NewHorse) -> Result<Horse, RepositoryError> {
        self.0.create_horse(horse).await
    }

    async fn update_horse(
        &self,
        id: HorseId,
        patch: HorsePatch,
    ) -> Result<Horse, RepositoryError> {
        self.0.update_horse(id, patch).await
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, RepositoryError> {
        self.0.list_appointments().await
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
        created_by: UserId,
    ) -> Result<Appointment, RepositoryError> {
        self.0.create_appointment(appointment, created_by).await
    }

    async fn entity_exists(&self, entity: EntityRef) -> Result<bool, RepositoryError> {
        self.0.entity_exists(entity).await
    }

    async fn list_documents(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentWithUploader>, RepositoryError> {
        self.0.list_documents(entity).await
    }

    async fn list_documents_of_kind(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<Document>, RepositoryError> {
        self.0.list_documents_of_kind(kind).await
    }

    async fn create_document(&self, _document: NewDocument) -> Result<Document, RepositoryError> {
        Err(RepositoryError::DataCorruption(
            "document insert disabled".to_owned(),
        ))
    }

    async fn list_roles(&self) -> Result<Vec<RoleInfo>, RepositoryError> {
        self.0.list_roles().await
    }

    async fn list_stables(&self) -> Result<Vec<Stable>, RepositoryError> {
        self.0.list_stables().await
    }

    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, RepositoryError> {
        self.0.list_event_groups().await
    }

    async fn list_translations(&self, language: &str) -> Result<Vec<Translation>, RepositoryError> {
        self.0.list_translations(language).await
    }
}
