// handler/disputes.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{disputedtos::*, userdtos::{ApiResponse, RequestQueryDto}},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::disputemodel::DisputeStatus,
    AppState,
};

pub fn disputes_handler() -> Router {
    Router::new()
        .route("/", post(raise_dispute))
        .route("/mine", get(list_my_disputes))
}

pub fn disputes_admin_handler() -> Router {
    Router::new()
        .route("/queue", get(open_queue))
        .route("/:dispute_id/review", put(begin_review))
        .route("/:dispute_id/close", put(close_dispute))
}

pub async fn raise_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<RaiseDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let attachment_paths = body
        .attachment_file_names
        .unwrap_or_default()
        .iter()
        .map(|name| app_state.storage_service.object_path(auth.user.id, "disputes", name))
        .collect();

    let dispute = app_state
        .dispute_service
        .raise_dispute(
            auth.user.id,
            body.against,
            body.task_id,
            body.dispute_type,
            body.description,
            attachment_paths,
        )
        .await?;

    Ok(Json(ApiResponse::success("Dispute raised", dispute)))
}

pub async fn list_my_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let disputes = app_state
        .dispute_service
        .disputes_for_user(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success("Disputes retrieved", disputes)))
}

pub async fn open_queue(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) as i64 * limit as i64;

    let disputes = app_state.dispute_service.open_queue(limit as i64, offset).await?;

    Ok(Json(ApiResponse::success("Open disputes retrieved", disputes)))
}

pub async fn begin_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let dispute = app_state
        .dispute_service
        .begin_review(auth.user.id, dispute_id)
        .await?;

    Ok(Json(ApiResponse::success("Dispute under review", dispute)))
}

pub async fn close_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(dispute_id): Path<Uuid>,
    Json(body): Json<CloseDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = if body.resolved {
        DisputeStatus::Resolved
    } else {
        DisputeStatus::Rejected
    };

    let dispute = app_state
        .dispute_service
        .close_dispute(auth.user.id, dispute_id, outcome, body.resolution)
        .await?;

    Ok(Json(ApiResponse::success("Dispute closed", dispute)))
}
