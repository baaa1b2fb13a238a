// REST API for the brain service

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::brain::Brain;

pub mod content;
pub mod error;
pub mod extract;
pub mod share;
pub mod users;


pub type AppState = Arc<Brain>;

/// Build the full HTTP router. Everything except `/health` lives under
/// `/api/v1`; content and share management require a bearer token.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/signup", post(users::signup))
        .route("/signin", post(users::signin))
        .route("/brain/{share_link}", get(share::shared_brain));

    let protected = Router::new()
        .route(
            "/content",
            post(content::add_content)
                .get(content::list_content)
                .delete(content::delete_content),
        )
        .route("/brain/share", post(share::update_sharing))
        .route_layer(middleware::from_fn_with_state(
            state.tokens().clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", public.merge(protected))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
