//! HTTP API Layer
//!
//! This crate provides the REST API for the lost-and-found system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for items, claims, login and health
//! - **Middleware**: Bearer authentication, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{connect_storage, create_router, AppState};
//!
//! let (items, claims) = connect_storage(&config).await?;
//! let app = create_router(AppState::new(items, claims, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_claims::ports::memory::InMemoryClaimPort;
use domain_claims::{ClaimPort, ClaimPortReferences, ClaimService};
use domain_items::ports::memory::InMemoryItemPort;
use domain_items::{ItemPort, ItemService};
use infra_db::{
    create_pool, run_migrations, DatabaseConfig, DatabaseError, JsonFileStore,
    PostgresClaimAdapter, PostgresItemAdapter,
};

use crate::auth::UserDirectory;
use crate::config::{ApiConfig, StorageBackend};
use crate::middleware::{auth_middleware, optional_auth_middleware, request_log_middleware};
use crate::handlers::{auth as login, claims, health, items};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: ItemService,
    pub claims: ClaimService,
    pub users: UserDirectory,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the services over the given stores with the demo user directory
    pub fn new(items: Arc<dyn ItemPort>, claims: Arc<dyn ClaimPort>, config: ApiConfig) -> Self {
        let references = Arc::new(ClaimPortReferences::new(claims.clone()));
        Self {
            items: ItemService::new(items.clone(), references),
            claims: ClaimService::new(items, claims, config.claim_mode),
            users: UserDirectory::demo(),
            config,
        }
    }

    pub fn with_users(mut self, users: UserDirectory) -> Self {
        self.users = users;
        self
    }
}

/// Opens the item and claim stores selected by `config.storage_backend`
///
/// The Postgres backend runs pending migrations before returning.
pub async fn connect_storage(
    config: &ApiConfig,
) -> Result<(Arc<dyn ItemPort>, Arc<dyn ClaimPort>), DatabaseError> {
    let stores: (Arc<dyn ItemPort>, Arc<dyn ClaimPort>) = match config.storage_backend {
        StorageBackend::Memory => (
            Arc::new(InMemoryItemPort::new()),
            Arc::new(InMemoryClaimPort::new()),
        ),
        StorageBackend::File => {
            let store = Arc::new(JsonFileStore::open(&config.data_file).await?);
            let items: Arc<dyn ItemPort> = store.clone();
            let claims: Arc<dyn ClaimPort> = store;
            (items, claims)
        }
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig::new(config.database_url.clone())).await?;
            run_migrations(&pool).await?;
            (
                Arc::new(PostgresItemAdapter::new(pool.clone())),
                Arc::new(PostgresClaimAdapter::new(pool)),
            )
        }
    };
    Ok(stores)
}

/// Creates the main API router
///
/// Read-only item routes are public; a valid bearer token on them only
/// reveals expected answers to the item's reporter. Everything that
/// changes state, and every claim listing, requires a token.
pub fn create_router(state: AppState) -> Router {
    // Health routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Public API routes
    let public_routes = Router::new()
        .route("/items", get(items::list_items))
        .route("/items/lost", get(items::lost_items))
        .route("/items/found", get(items::found_items))
        .route("/items/stats", get(items::stats))
        .route("/items/status/:status", get(items::items_by_status))
        .route("/items/:id", get(items::get_item))
        .route("/items/:id/matches", get(items::find_matches))
        .route("/auth/login", post(login::login))
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), optional_auth_middleware));

    // Protected API routes
    let protected_routes = Router::new()
        .route("/items", post(items::report_item))
        .route(
            "/items/:id",
            put(items::update_item).delete(items::delete_item),
        )
        .route("/items/:id/claim", post(claims::submit_claim))
        .route("/items/:id/review-claim", post(claims::review_claim))
        .route("/items/:id/return", post(items::return_item))
        .route("/items/:id/match", post(items::mark_matched))
        .route("/items/:id/claims", get(claims::claims_for_item))
        .route("/claims/mine", get(claims::my_claims))
        .route("/claims/review", get(claims::review_queue))
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .nest("/api/v1", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
