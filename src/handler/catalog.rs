// handler/catalog.rs
use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::taskdb::TaskExt,
    dtos::{taskdtos::SubcategoryPageQueryDto, userdtos::ApiResponse},
    error::HttpError,
    service::pager::page_envelope,
    AppState,
};

pub fn catalog_handler() -> Router {
    Router::new().route("/subcategories", get(list_subcategories))
}

pub async fn list_subcategories(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SubcategoryPageQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(50);

    let subcategories = app_state
        .db_client
        .get_subcategories_page(query.cursor, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let page = page_envelope(subcategories, limit, |s| s.name.clone());

    Ok(Json(ApiResponse::success("Subcategories retrieved", page)))
}
