//! Common test utilities and fixtures

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use shelf_server::{api, config::BCRYPT_MIN_COST, services::AuthService, state::AppState};
use shelf_storage::SqliteStore;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough!";

/// Router over a fresh SQLite file
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let store = Arc::new(shelf_storage::connect(&db_url).await?);

        let auth_service = Arc::new(create_test_auth_service());
        let router = api::router(AppState::new(Arc::clone(&store), Arc::clone(&auth_service)));

        Ok(Self {
            router,
            store,
            auth_service,
            _temp_dir: temp_dir,
        })
    }

    /// Create a user and return a `Cookie` header value for their session
    pub async fn login_as(&self, username: &str) -> Result<String> {
        let user = self
            .auth_service
            .register(&*self.store, username, fixtures::PASSWORD, fixtures::PASSWORD)
            .await?;
        let token = self.auth_service.create_session_token(&user.id)?;
        Ok(format!("__session={}", token))
    }
}

/// Auth service with the cheapest bcrypt cost
pub fn create_test_auth_service() -> AuthService {
    AuthService::new(TEST_SECRET.to_string(), 7, BCRYPT_MIN_COST)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` part of the session cookie set by a response
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("__session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test user credentials
pub mod fixtures {
    pub const PASSWORD: &str = "longenough";
}
