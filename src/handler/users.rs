// handler/users.rs
use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::status_rules,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/status", get(get_my_status))
        .route("/me/bank-details", get(get_bank_details))
        .route("/me/bank-details", put(upsert_bank_details))
        .route("/", get(get_users))
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&auth.user);

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    }))
}

/// The shared status descriptor every screen renders from; no per-screen
/// branching on raw status strings.
pub async fn get_my_status(
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let descriptor = status_rules::descriptor_or_default(auth.user.worker_status);

    Ok(Json(ApiResponse::success(
        "Worker status retrieved",
        descriptor,
    )))
}

pub async fn get_bank_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let details = app_state
        .db_client
        .get_bank_details(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let complete = details.as_ref().map_or(false, |d| d.is_complete());

    Ok(Json(ApiResponse::success(
        "Bank details retrieved",
        serde_json::json!({
            "details": details,
            "complete": complete,
        }),
    )))
}

pub async fn upsert_bank_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpsertBankDetailsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !body.account_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(HttpError::bad_request("Account number must be digits only"));
    }

    let details = app_state
        .db_client
        .upsert_bank_details(
            auth.user.id,
            body.account_holder_name,
            body.account_number,
            body.bank_name,
            body.ifsc_code,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Bank details saved", details)))
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_users(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let count = app_state
        .db_client
        .get_user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results: count,
    }))
}
