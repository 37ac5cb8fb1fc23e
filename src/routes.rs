// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        audit::audit_admin_handler,
        auth::auth_handler,
        catalog::catalog_handler,
        disputes::{disputes_admin_handler, disputes_handler},
        onboarding::{onboarding_admin_handler, onboarding_handler},
        payments::{payments_admin_handler, payments_handler},
        tasks::{tasks_admin_handler, tasks_handler},
        users::users_handler,
    },
    middleware::{admin_only, auth},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let onboarding_routes = Router::new()
        .merge(onboarding_handler())
        .merge(onboarding_admin_handler().layer(middleware::from_fn(admin_only)))
        .layer(middleware::from_fn(auth));

    let payment_routes = Router::new()
        .merge(payments_handler())
        .merge(payments_admin_handler().layer(middleware::from_fn(admin_only)))
        .layer(middleware::from_fn(auth));

    let task_routes = Router::new()
        .merge(tasks_handler())
        .merge(tasks_admin_handler().layer(middleware::from_fn(admin_only)))
        .layer(middleware::from_fn(auth));

    let dispute_routes = Router::new()
        .merge(disputes_handler())
        .merge(disputes_admin_handler().layer(middleware::from_fn(admin_only)))
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/onboarding", onboarding_routes)
        .nest("/tasks", task_routes)
        .nest("/payments", payment_routes)
        .nest("/disputes", dispute_routes)
        .nest("/catalog", catalog_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/audit",
            audit_admin_handler()
                .layer(middleware::from_fn(admin_only))
                .layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
