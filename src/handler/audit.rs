// handler/audit.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{dtos::userdtos::ApiResponse, error::HttpError, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct AuditQueryDto {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

pub fn audit_admin_handler() -> Router {
    Router::new().route("/:subject_id", get(events_for_subject))
}

pub async fn events_for_subject(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(subject_id): Path<Uuid>,
    Query(query): Query<AuditQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let events = app_state
        .audit_service
        .events_for(subject_id, query.limit.unwrap_or(100))
        .await?;

    Ok(Json(ApiResponse::success("Audit events retrieved", events)))
}
