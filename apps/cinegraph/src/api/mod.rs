//! # Cinegraph HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /users` - Register a user
//! - `PUT /users` - Update a user
//! - `GET /users` - List users
//! - `GET /users/{id}` - Fetch a single user
//! - `PUT /users/{id}/friends/{friendId}` - Send a friend request
//! - `PUT /users/{id}/friends/{friendId}/confirm` - Confirm a friend request
//! - `DELETE /users/{id}/friends/{friendId}` - Remove a friendship
//! - `GET /users/{id}/friends` - List a user's friends
//! - `GET /users/{id}/friends/common/{otherId}` - Friends in common
//! - `POST /films` - Catalogue a film
//! - `PUT /films` - Update a film
//! - `GET /films` - List films
//! - `GET /films/{id}` - Fetch a single film
//! - `PUT /films/{id}/like/{userId}` - Like a film
//! - `DELETE /films/{id}/like/{userId}` - Remove a like
//! - `GET /films/popular?count=N` - Most-liked films
//! - `GET /genres`, `GET /genres/{id}` - Genre reference data
//! - `GET /mpa`, `GET /mpa/{id}` - MPA rating reference data
//! - `GET /health` - Health check
//! - `GET /status` - Catalogue status
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `CINEGRAPH_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `CINEGRAPH_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `CINEGRAPH_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `cinegraph::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    add_friend_handler, add_like_handler, common_friends_handler, confirm_friend_handler,
    create_film_handler, create_user_handler, film_handler, films_handler, friends_handler,
    genre_handler, genres_handler, health_handler, mpa_handler, mpa_list_handler, popular_handler,
    remove_friend_handler, remove_like_handler, status_handler, update_film_handler,
    update_user_handler, user_handler, users_handler,
};
#[allow(unused_imports)]
pub use types::{
    ErrorResponse, FilmPayload, FilmResponse, GenreDto, HealthResponse, MpaDto, PopularParams,
    StatusResponse, UserPayload, UserResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use cinegraph_core::{Catalog, CatalogError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the catalogue.
#[derive(Clone)]
pub struct AppState {
    /// The catalogue behind an async lock.
    pub catalog: Arc<RwLock<Catalog>>,
}

impl AppState {
    /// Create new app state with a catalogue.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `CINEGRAPH_CORS_ORIGINS`:
/// - `"*"`: allows all origins (development only)
/// - unset: localhost origins only (restrictive default)
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("CINEGRAPH_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (CINEGRAPH_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in CINEGRAPH_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No CINEGRAPH_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "⚠️  API key authentication DISABLED - all endpoints are publicly accessible! \
             Set CINEGRAPH_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/users",
            post(handlers::create_user_handler)
                .put(handlers::update_user_handler)
                .get(handlers::users_handler),
        )
        .route("/users/{id}", get(handlers::user_handler))
        .route(
            "/users/{id}/friends/{friend_id}",
            put(handlers::add_friend_handler).delete(handlers::remove_friend_handler),
        )
        .route(
            "/users/{id}/friends/{friend_id}/confirm",
            put(handlers::confirm_friend_handler),
        )
        .route("/users/{id}/friends", get(handlers::friends_handler))
        .route(
            "/users/{id}/friends/common/{other_id}",
            get(handlers::common_friends_handler),
        )
        .route(
            "/films",
            post(handlers::create_film_handler)
                .put(handlers::update_film_handler)
                .get(handlers::films_handler),
        )
        .route("/films/popular", get(handlers::popular_handler))
        .route("/films/{id}", get(handlers::film_handler))
        .route(
            "/films/{id}/like/{user_id}",
            put(handlers::add_like_handler).delete(handlers::remove_like_handler),
        )
        .route("/genres", get(handlers::genres_handler))
        .route("/genres/{id}", get(handlers::genre_handler))
        .route("/mpa", get(handlers::mpa_list_handler))
        .route("/mpa/{id}", get(handlers::mpa_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, catalog: Catalog) -> Result<(), CatalogError> {
    let state = AppState::new(catalog);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CatalogError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Cinegraph HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CatalogError::Io(format!("Server error: {}", e)))
}
