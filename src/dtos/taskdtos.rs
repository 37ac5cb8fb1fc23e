use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskDto {
    pub subcategory_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: String,

    #[validate(range(min = 0.01, message = "Payment amount must be positive"))]
    pub payment_amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSubmissionDto {
    pub task_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Proof file name is required"))]
    pub proof_file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewSubmissionDto {
    pub approve: bool,

    #[validate(length(max = 1000, message = "Feedback must be at most 1000 characters"))]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RateSubmissionDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 1000, message = "Feedback must be at most 1000 characters"))]
    pub feedback: Option<String>,
}

/// Cursor for the subcategory listing: the name of the last item of the
/// previous page.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubcategoryPageQueryDto {
    pub cursor: Option<String>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}
