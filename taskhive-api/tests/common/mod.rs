/// Common test utilities for integration tests
///
/// These tests exercise the full router against a real Postgres instance.
/// They are `#[ignore]`d by default; run them with a database available:
///
/// ```bash
/// DATABASE_URL=postgresql://localhost/taskhive_test cargo test -p taskhive-api -- --ignored
/// ```

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskhive_api::app::{build_router, AppState};
use taskhive_api::config::Config;
use taskhive_shared::notify::NotificationDispatcher;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the app and a registered user
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user_id: Uuid,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh registered user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to the shared crate's Cargo.toml)
        sqlx::migrate!("../taskhive-shared/migrations").run(&db).await?;

        let notifier = NotificationDispatcher::spawn(db.clone());
        let state = AppState::new(db.clone(), config, notifier);
        let mut app = build_router(state);

        // Register a fresh user through the real endpoint
        let (status, body) = request(
            &mut app,
            "POST",
            "/register",
            None,
            Some(serde_json::json!({
                "name": "Test User",
                "email": format!("test-{}@example.com", Uuid::new_v4()),
                "password": "test-password-123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

        let user_id = body["data"]["user"]["id"]
            .as_str()
            .expect("user id in register response")
            .parse()?;
        let token = body["data"]["token"]
            .as_str()
            .expect("token in register response")
            .to_string();

        Ok(Self {
            db,
            app,
            user_id,
            token,
        })
    }

    /// Registers another user and returns (user_id, token)
    pub async fn register_user(&mut self, name: &str) -> (Uuid, String) {
        let (status, body) = request(
            &mut self.app,
            "POST",
            "/register",
            None,
            Some(serde_json::json!({
                "name": name,
                "email": format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
                "password": "test-password-123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

        let user_id = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();

        (user_id, token)
    }

    /// Sends an authenticated request as the context user
    pub async fn send(
        &mut self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = self.token.clone();
        request(&mut self.app, method, path, Some(&token), body).await
    }

    /// Sends an authenticated request with an explicit token
    pub async fn send_as(
        &mut self,
        token: &str,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        request(&mut self.app, method, path, Some(token), body).await
    }
}

/// Drives one request through the router and decodes the envelope
pub async fn request(
    app: &mut axum::Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = if let Some(body) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
