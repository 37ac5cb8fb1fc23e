// handler/tasks.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use bigdecimal::BigDecimal;
use num_traits::FromPrimitive;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::taskdb::TaskExt,
    dtos::{taskdtos::*, userdtos::{ApiResponse, RequestQueryDto}},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::{taskmodel::SubmissionStatus, usermodel::UserRole},
    service::status_rules,
    AppState,
};

pub fn tasks_handler() -> Router {
    Router::new()
        .route("/", post(create_task))
        .route("/", get(list_open_tasks))
        .route("/mine", get(list_my_tasks))
        .route("/submissions", post(submit_work))
        .route("/submissions/worker", get(list_my_submissions))
        .route("/submissions/:submission_id/review", put(review_submission))
        .route("/submissions/:submission_id/rate", put(rate_submission))
        .route("/workers/:worker_id/rating", get(get_worker_rating))
}

pub fn tasks_admin_handler() -> Router {
    Router::new().route(
        "/workers/:worker_id/rating/recompute",
        post(recompute_worker_rating),
    )
}

pub async fn create_task(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTaskDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Employer {
        return Err(HttpError::bad_request("Only employers can create tasks"));
    }

    let amount = BigDecimal::from_f64(body.payment_amount)
        .ok_or_else(|| HttpError::bad_request("Invalid payment amount"))?;

    let task = app_state
        .db_client
        .create_task(
            auth.user.id,
            body.subcategory_id,
            body.title,
            body.description,
            amount,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Task created", task)))
}

pub async fn list_open_tasks(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Workers only see the job board once the funnel allows it.
    if auth.user.role == UserRole::Worker {
        let descriptor = status_rules::descriptor_or_default(auth.user.worker_status);
        if !descriptor.can_access_jobs {
            return Err(HttpError::bad_request(
                "Complete onboarding before browsing tasks",
            ));
        }
    }

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) as i64 * limit as i64;

    let tasks = app_state
        .db_client
        .get_open_tasks(limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Open tasks retrieved", tasks)))
}

pub async fn list_my_tasks(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tasks = app_state
        .db_client
        .get_employer_tasks(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Tasks retrieved", tasks)))
}

pub async fn submit_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateSubmissionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let descriptor = status_rules::descriptor_or_default(auth.user.worker_status);
    if !descriptor.can_submit_tasks {
        return Err(HttpError::bad_request(
            "Only active workers can submit task work",
        ));
    }

    let task = app_state
        .db_client
        .get_task(body.task_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Task not found"))?;

    let proof_path = body
        .proof_file_name
        .as_deref()
        .map(|name| app_state.storage_service.object_path(auth.user.id, "proofs", name));

    let submission = app_state
        .db_client
        .create_submission(task.id, auth.user.id, task.employer_id, proof_path)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Work submitted", submission)))
}

pub async fn list_my_submissions(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let submissions = app_state
        .db_client
        .get_worker_submissions(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Submissions retrieved",
        submissions,
    )))
}

pub async fn review_submission(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(submission_id): Path<Uuid>,
    Json(body): Json<ReviewSubmissionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let submission = app_state
        .db_client
        .get_submission(submission_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Submission not found"))?;

    if submission.employer_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "Only the task's employer can review this submission",
        ));
    }

    // A verdict is single-shot; re-approving would open a second payment.
    let current = submission.status_or_pending();
    if !current.awaiting_review() {
        return Err(HttpError::bad_request(format!(
            "Submission has already been reviewed (status {:?})",
            current
        )));
    }

    let status = if body.approve {
        SubmissionStatus::Approved
    } else {
        SubmissionStatus::Rejected
    };

    let submission = app_state
        .db_client
        .update_submission_status(submission_id, status, body.feedback)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Approval opens the payment record for this task.
    if status == SubmissionStatus::Approved {
        app_state
            .payment_service
            .open_payment_for_submission(submission_id)
            .await?;
    }

    Ok(Json(ApiResponse::success("Submission reviewed", submission)))
}

pub async fn rate_submission(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(submission_id): Path<Uuid>,
    Json(body): Json<RateSubmissionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let summary = app_state
        .rating_service
        .rate_submission(auth.user.id, submission_id, body.rating, body.feedback)
        .await?;

    Ok(Json(ApiResponse::success("Rating recorded", summary)))
}

/// Out-of-band repair of the denormalized rating columns.
pub async fn recompute_worker_rating(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state
        .rating_service
        .recompute_worker_rating(worker_id)
        .await?;

    Ok(Json(ApiResponse::success("Rating recomputed", summary)))
}

pub async fn get_worker_rating(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state.rating_service.get_worker_summary(worker_id).await?;

    Ok(Json(ApiResponse::success("Rating summary retrieved", summary)))
}
