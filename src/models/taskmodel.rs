use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Assigned,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    Assigned,
}

impl SubmissionStatus {
    /// States an employer verdict can still be applied to. A verdict on an
    /// already-reviewed submission must be rejected: re-approving would open
    /// a second payment record for the same task.
    pub fn awaiting_review(&self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Assigned)
    }
}

/// Catalog entry tasks are filed under; the ordered collection the cursor
/// pagination walks.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Task {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub payment_amount: BigDecimal,
    pub status: Option<TaskStatus>, // Database has DEFAULT 'open', can be NULL
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A worker's proof-of-work for a task. Only approved submissions with a
/// non-null employer rating count toward the worker's average.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TaskSubmission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub worker_id: Uuid,
    pub employer_id: Uuid,
    pub status: Option<SubmissionStatus>, // Database has DEFAULT 'pending', can be NULL
    pub employer_rating_given: Option<i32>,
    pub feedback: Option<String>,
    pub proof_path: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl TaskSubmission {
    pub fn status_or_pending(&self) -> SubmissionStatus {
        self.status.unwrap_or(SubmissionStatus::Pending)
    }

    /// Whether this submission contributes to the worker's average rating.
    pub fn counts_toward_rating(&self) -> bool {
        self.status_or_pending() == SubmissionStatus::Approved
            && self.employer_rating_given.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewed_submissions_cannot_be_reviewed_again() {
        assert!(SubmissionStatus::Pending.awaiting_review());
        assert!(SubmissionStatus::Assigned.awaiting_review());

        // Approved and rejected are final verdicts; a repeat approval would
        // duplicate the payment record.
        assert!(!SubmissionStatus::Approved.awaiting_review());
        assert!(!SubmissionStatus::Rejected.awaiting_review());
    }
}
