// handler/onboarding.rs
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
    db::onboardingdb::OnboardingExt,
    dtos::{onboardingdtos::*, userdtos::ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::pager::page_envelope,
    AppState,
};

pub fn onboarding_handler() -> Router {
    Router::new()
        .route("/documents", post(submit_document))
        .route("/documents", get(list_my_documents))
        .route("/overview", get(get_overview))
}

pub fn onboarding_admin_handler() -> Router {
    Router::new()
        .route("/documents/:document_id/review", put(review_document))
        .route("/workers/:worker_id/interview/schedule", put(schedule_interview))
        .route("/workers/:worker_id/interview/result", put(record_interview_result))
        .route("/workers/:worker_id/recompute", post(recompute_status))
        .route("/workers/recompute-all", post(recompute_all))
}

pub async fn submit_document(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SubmitDocumentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let file_path =
        app_state
            .storage_service
            .object_path(auth.user.id, "documents", &body.file_name);

    let document = app_state
        .onboarding_service
        .submit_document(auth.user.id, body.doc_type, file_path)
        .await?;

    Ok(Json(ApiResponse::success("Document submitted", document)))
}

pub async fn list_my_documents(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<DocumentPageQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(20);
    let cursor = match (query.cursor_at, query.cursor_id) {
        (Some(at), Some(id)) => Some((at, id)),
        _ => None,
    };

    let documents = app_state
        .db_client
        .get_documents_page(auth.user.id, cursor, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let page = page_envelope(documents, limit, |d| (d.created_at, d.id));

    Ok(Json(ApiResponse::success("Documents retrieved", page)))
}

pub async fn get_overview(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let overview = app_state.onboarding_service.overview(auth.user.id).await?;

    // Attach signed URLs so the client can fetch the files directly.
    let urls: Vec<_> = overview
        .documents
        .iter()
        .map(|d| app_state.storage_service.signed_url(&d.file_path))
        .collect::<Result<_, _>>()?;

    Ok(Json(ApiResponse::success(
        "Onboarding overview retrieved",
        serde_json::json!({
            "overview": overview,
            "document_urls": urls,
        }),
    )))
}

pub async fn review_document(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(document_id): Path<Uuid>,
    Json(body): Json<ReviewDocumentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let document = app_state
        .onboarding_service
        .review_document(auth.user.id, document_id, body.status, body.reviewer_note)
        .await?;

    Ok(Json(ApiResponse::success("Document reviewed", document)))
}

pub async fn schedule_interview(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(worker_id): Path<Uuid>,
    Json(body): Json<ScheduleInterviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let interview = app_state
        .onboarding_service
        .schedule_interview(auth.user.id, worker_id, body.scheduled_at, body.meeting_link)
        .await?;

    Ok(Json(ApiResponse::success("Interview scheduled", interview)))
}

pub async fn record_interview_result(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(worker_id): Path<Uuid>,
    Json(body): Json<InterviewResultDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let interview = app_state
        .onboarding_service
        .record_interview_result(auth.user.id, worker_id, body.result, body.notes)
        .await?;

    Ok(Json(ApiResponse::success(
        "Interview result recorded",
        interview,
    )))
}

pub async fn recompute_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .onboarding_service
        .recompute_status(auth.user.id, worker_id)
        .await?;

    Ok(Json(ApiResponse::success("Status recomputed", outcome)))
}

pub async fn recompute_all(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let changed = app_state
        .onboarding_service
        .recompute_all(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Recompute sweep finished",
        serde_json::json!({ "changed": changed }),
    )))
}
