/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::AppState, config::Config};
/// use taskhive_shared::notify::NotificationDispatcher;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let notifier = NotificationDispatcher::spawn(pool.clone());
/// let state = AppState::new(pool, config, notifier);
/// let app = taskhive_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::notify::NotificationDispatcher;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Handle for emitting notification events
    pub notifier: NotificationDispatcher,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, notifier: NotificationDispatcher) -> Self {
        Self {
            db,
            config: Arc::new(config),
            notifier,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                          # Health check (public)
/// ├── POST /register                        # Registration (public)
/// ├── POST /login                           # Login (public)
/// └── (bearer token required)
///     ├── POST   /logout
///     ├── GET    /user
///     ├── GET    /dashboard
///     ├── GET/POST /projects
///     ├── GET/DELETE /projects/:id
///     ├── POST   /projects/:id/members
///     ├── DELETE /projects/:id/members/:user
///     ├── GET/POST /tasks
///     ├── GET/PUT/DELETE /tasks/:id
///     ├── POST   /tasks/:id/assign
///     ├── DELETE /tasks/:id/assign/:user
///     ├── GET/POST /comments
///     └── DELETE /comments/:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Token authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/user", get(routes::auth::current_user))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::show_project).delete(routes::projects::delete_project),
        )
        .route("/projects/:id/members", post(routes::members::add_member))
        .route(
            "/projects/:id/members/:user",
            delete(routes::members::remove_member),
        )
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::show_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/assign", post(routes::assignments::assign_user))
        .route(
            "/tasks/:id/assign/:user",
            delete(routes::assignments::unassign_user),
        )
        .route(
            "/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::token_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
