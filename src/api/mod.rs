mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use middleware::CallerTokens;

use crate::auth::{Authorizer, PermissiveAuthorizer, RoleAuthorizer};
use crate::config::ServerConfig;
use crate::notify::ViewRevisions;
use crate::service::IncidentService;
use crate::store::IncidentStore;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: IncidentService,
    /// Revisions of cached views, bumped by the service on every change.
    pub revisions: ViewRevisions,
}

impl AppState {
    /// Wire a fresh store, the configured authorizer and view revisions.
    pub fn from_config(config: &ServerConfig) -> Self {
        let authorizer: Arc<dyn Authorizer> = if config.permissive_auth {
            Arc::new(PermissiveAuthorizer::new())
        } else {
            Arc::new(RoleAuthorizer)
        };
        let revisions = ViewRevisions::new();
        let service = IncidentService::new(
            IncidentStore::new(),
            authorizer,
            Arc::new(revisions.clone()),
        )
        .with_policy(config.resolve_policy);

        Self { service, revisions }
    }
}

pub fn create_router(config: &ServerConfig) -> Router {
    create_router_with_state(AppState::from_config(config), config)
}

pub fn create_router_with_state(state: AppState, config: &ServerConfig) -> Router {
    // Only resolution depends on who the caller is; reads and submissions
    // stay open even when a stale or unknown token is presented.
    let resolve = post(handlers::resolve_incident).layer(from_fn_with_state(
        CallerTokens::from_config(config),
        middleware::resolve_caller,
    ));

    let api = Router::new()
        // Incidents
        .route(
            "/incidents",
            get(handlers::list_incidents).post(handlers::submit_incident),
        )
        .route("/incidents/{id}/resolve", resolve)
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors_layer(config.cors_origins.as_deref())),
        )
        .with_state(state)
}
