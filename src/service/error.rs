use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::{paymentmodel::PaymentStatus, taskmodel::SubmissionStatus},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Worker {0} not found")]
    WorkerNotFound(Uuid),

    #[error("Submission {0} not found")]
    SubmissionNotFound(Uuid),

    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Dispute {0} not found")]
    DisputeNotFound(Uuid),

    #[error("Interview for worker {0} not found")]
    InterviewNotFound(Uuid),

    #[error("Submission {0} is in status {1:?}; only approved submissions can be rated")]
    InvalidSubmissionState(Uuid, SubmissionStatus),

    #[error("Payment {0} is in status {1:?}; expected pending_details")]
    InvalidPaymentState(Uuid, PaymentStatus),

    #[error("User {0} is not authorized to act on {1}")]
    Unauthorized(Uuid, Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        HttpError::new(error.to_string(), error.status_code())
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::WorkerNotFound(_)
            | ServiceError::SubmissionNotFound(_)
            | ServiceError::PaymentNotFound(_)
            | ServiceError::DisputeNotFound(_)
            | ServiceError::InterviewNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidSubmissionState(_, _)
            | ServiceError::InvalidPaymentState(_, _)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            // The caller is authenticated; they just don't own the resource.
            ServiceError::Unauthorized(_, _) => StatusCode::FORBIDDEN,

            ServiceError::Database(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acting_on_anothers_resource_is_forbidden() {
        let err = ServiceError::Unauthorized(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_transitions_are_bad_requests() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::InvalidPaymentState(id, PaymentStatus::Completed).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidSubmissionState(id, SubmissionStatus::Approved).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
