use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::onboardingmodel::{DocumentStatus, DocumentType, InterviewResult};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitDocumentDto {
    pub doc_type: DocumentType,

    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewDocumentDto {
    pub status: DocumentStatus,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub reviewer_note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewDto {
    pub scheduled_at: DateTime<Utc>,

    #[validate(url(message = "Invalid meeting link"))]
    pub meeting_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct InterviewResultDto {
    pub result: InterviewResult,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Cursor for the document listing: the `created_at` and `id` of the last
/// item of the previous page, as returned in `next_cursor`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DocumentPageQueryDto {
    pub cursor_at: Option<DateTime<Utc>>,
    pub cursor_id: Option<Uuid>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}
