// handler/payments.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{paymentdtos::*, userdtos::ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new()
        .route("/mine", get(list_my_payments))
        .route("/:payment_id/classification", get(classify_payment))
        .route("/:payment_id/reconcile", post(reconcile_payment))
        .route("/:payment_id/proof", put(attach_proof))
}

pub fn payments_admin_handler() -> Router {
    Router::new()
        .route("/:payment_id/complete", put(complete_payment))
        .route("/:payment_id/fail", put(fail_payment))
        .route("/reconcile-sweep", post(reconcile_sweep))
}

pub async fn list_my_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .payment_service
        .worker_payments_with_parties(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success("Payments retrieved", payments)))
}

pub async fn classify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let classification = app_state.payment_service.classify_payment(payment_id).await?;

    Ok(Json(ApiResponse::success(
        "Payment classified",
        ClassificationResponseDto::from_classification(payment_id, classification),
    )))
}

pub async fn reconcile_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .payment_service
        .reconcile(auth.user.id, payment_id)
        .await?;

    Ok(Json(ApiResponse::success("Payment reconciled", outcome)))
}

pub async fn attach_proof(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<AttachProofDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let proof_path = app_state
        .storage_service
        .object_path(auth.user.id, "payment-proofs", &body.proof_file_name);

    let outcome = app_state
        .payment_service
        .attach_proof(auth.user.id, payment_id, proof_path)
        .await?;

    Ok(Json(ApiResponse::success("Transaction proof attached", outcome)))
}

pub async fn complete_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .complete_payment(auth.user.id, payment_id)
        .await?;

    Ok(Json(ApiResponse::success("Payment completed", payment)))
}

pub async fn fail_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .payment_service
        .fail_payment(auth.user.id, payment_id)
        .await?;

    Ok(Json(ApiResponse::success("Payment marked failed", payment)))
}

pub async fn reconcile_sweep(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state.payment_service.reconcile_sweep(auth.user.id).await?;

    Ok(Json(ApiResponse::success("Reconcile sweep finished", outcome)))
}
