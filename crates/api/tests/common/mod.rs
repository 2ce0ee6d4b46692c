//! Test harness: the real router over an in-memory `SQLite` database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use jobboard_api::{AppState, create_router};
use jobboard_core::storage::{StorageConfig, StorageKind, StorageService};
use jobboard_db::migration::{Migrator, MigratorTrait};
use jobboard_shared::{JwtConfig, JwtService};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "jobboard-test-boundary";

/// A running router plus its database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    /// Router with the given document storage.
    pub async fn with_storage(storage: StorageConfig) -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expires_secs: 3600,
            })),
            storage: Arc::new(StorageService::from_config(storage).unwrap()),
            dev_mode: false,
        };

        Self {
            router: create_router(state),
            db,
        }
    }

    /// Router storing document bytes on the database row.
    pub async fn new() -> Self {
        Self::with_storage(StorageConfig::new(StorageKind::Database)).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a JSON request and decode the JSON answer (`Null` for empty bodies).
    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register a user and return (id, token).
    pub async fn register(&self, role: &str, company: Option<&str>) -> (Uuid, String) {
        let (status, body) = self
            .json(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": format!("{}@example.com", Uuid::new_v4()),
                    "password": "correct horse battery",
                    "first_name": "Test",
                    "last_name": "User",
                    "role": role,
                    "company_name": company,
                    "company_sector": "Software",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        let token = body["access_token"].as_str().unwrap().to_string();
        (id, token)
    }

    pub async fn applicant(&self) -> (Uuid, String) {
        self.register("APPLICANT", None).await
    }

    pub async fn recruiter(&self) -> (Uuid, String) {
        let company = format!("Company {}", Uuid::new_v4());
        self.register("RECRUITER", Some(&company)).await
    }

    /// Publish an offer and return its id.
    pub async fn create_offer(&self, token: &str, title: &str) -> Uuid {
        let (status, body) = self
            .json(
                "POST",
                "/api/v1/offers",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "Write Rust services",
                    "location": "Lyon",
                    "contract_types": ["FULL_TIME"],
                    "remote_policy": "HYBRID",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Apply to an offer and return the application id.
    pub async fn apply(&self, token: &str, offer_id: Uuid) -> Uuid {
        let (status, body) = self
            .json(
                "POST",
                &format!("/api/v1/offers/{offer_id}/apply"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Upload a document through the multipart endpoint.
    pub async fn upload(
        &self,
        token: &str,
        application_id: Uuid,
        document_type: &str,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document_type\"\r\n\r\n{document_type}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/applications/{application_id}/documents"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Download a document: (status, content type, disposition, bytes).
    pub async fn download(
        &self,
        token: &str,
        document_id: &str,
    ) -> (StatusCode, Option<String>, Option<String>, Vec<u8>) {
        let request = Request::builder()
            .uri(format!("/api/v1/documents/{document_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        let header_value = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_value(header::CONTENT_TYPE);
        let disposition = header_value(header::CONTENT_DISPOSITION);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, disposition, bytes.to_vec())
    }
}
