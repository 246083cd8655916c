//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the router with bearer-token
//! requests against an in-memory database. Methods are intentionally broad to
//! support various test scenarios across different test files.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use spendwise::config::Config;
use spendwise::db::queries::users;
use spendwise::db::{create_in_memory_pool, migrations};
use spendwise::handlers;
use spendwise::notify::{Notification, Notifier};
use spendwise::state::AppState;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

/// A test client holding one application state, allowing sequential requests
/// against the same database.
pub struct TestClient {
    pub state: AppState,
    outbox: Mutex<UnboundedReceiver<Notification>>,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

impl TestClient {
    /// Create a new test client with a fresh in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let (notifier, rx) = Notifier::channel();
        let state = AppState {
            db: pool,
            config: Arc::new(Config::default()),
            notifier,
        };

        Self {
            state,
            outbox: Mutex::new(rx),
        }
    }

    pub fn router(&self) -> Router {
        handlers::routes(self.state.clone()).with_state(self.state.clone())
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> RawResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        RawResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let res = self.request(Method::GET, uri, Some(token), None).await;
        (res.status, res.json())
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let res = self.request(Method::POST, uri, token, Some(body)).await;
        (res.status, res.json())
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self.request(Method::PUT, uri, Some(token), Some(body)).await;
        (res.status, res.json())
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let res = self.request(Method::DELETE, uri, Some(token), None).await;
        (res.status, res.json())
    }

    // =========================================================================
    // Helper methods for accounts and data through the API
    // =========================================================================

    pub async fn register(&self, username: &str, email: &str, password: &str) -> StatusCode {
        let (status, _) = self
            .post(
                "/auth/register",
                None,
                json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        status
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register `username` with the default password and log in.
    pub async fn signup(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        assert_eq!(
            self.register(username, &email, PASSWORD).await,
            StatusCode::CREATED
        );
        self.login(username, PASSWORD).await
    }

    pub fn make_admin(&self, username: &str) {
        let conn = self.state.db.get().unwrap();
        let user = users::find_by_username(&conn, username).unwrap().unwrap();
        users::set_admin(&conn, user.id, true).unwrap();
    }

    pub async fn add_expense(&self, token: &str, date: &str, amount: f64, category: &str) {
        let (status, body) = self
            .post(
                "/expenses",
                Some(token),
                json!({ "date": date, "amount": amount, "category": category }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add expense failed: {}", body);
    }

    pub async fn add_income(&self, token: &str, date: &str, amount: f64, source: &str) {
        let (status, body) = self
            .post(
                "/income",
                Some(token),
                json!({ "date": date, "amount": amount, "source": source }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add income failed: {}", body);
    }

    /// Notifications queued so far.
    pub fn sent_mail(&self) -> Vec<Notification> {
        let mut rx = self.outbox.lock().unwrap();
        let mut sent = Vec::new();
        while let Ok(n) = rx.try_recv() {
            sent.push(n);
        }
        sent
    }
}
