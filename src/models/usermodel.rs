use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Worker,
    Employer,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Worker => "worker",
            UserRole::Employer => "employer",
        }
    }
}

/// Worker onboarding lifecycle. The stored value is only meaningful for
/// users with the `worker` role.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "worker_status", rename_all = "snake_case")]
pub enum WorkerStatus {
    DocumentUploadPending,
    VerificationPending,
    InterviewPending,
    InterviewScheduled,
    ActiveEmployee,
    Rejected,
}

impl WorkerStatus {
    pub fn to_str(&self) -> &str {
        match self {
            WorkerStatus::DocumentUploadPending => "document_upload_pending",
            WorkerStatus::VerificationPending => "verification_pending",
            WorkerStatus::InterviewPending => "interview_pending",
            WorkerStatus::InterviewScheduled => "interview_scheduled",
            WorkerStatus::ActiveEmployee => "active_employee",
            WorkerStatus::Rejected => "rejected",
        }
    }

    /// Unknown or missing values fall back to the most restrictive state,
    /// never to an elevated-access one.
    pub fn parse_or_default(value: Option<&str>) -> WorkerStatus {
        match value {
            Some("verification_pending") => WorkerStatus::VerificationPending,
            Some("interview_pending") => WorkerStatus::InterviewPending,
            Some("interview_scheduled") => WorkerStatus::InterviewScheduled,
            Some("active_employee") => WorkerStatus::ActiveEmployee,
            Some("rejected") => WorkerStatus::Rejected,
            _ => WorkerStatus::DocumentUploadPending,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, PartialOrd)]
#[sqlx(type_name = "designation", rename_all = "snake_case")]
pub enum Designation {
    L1,
    L2,
    L3,
}

impl Designation {
    pub fn to_str(&self) -> &str {
        match self {
            Designation::L1 => "L1",
            Designation::L2 => "L2",
            Designation::L3 => "L3",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub worker_status: Option<WorkerStatus>,
    pub rating: Option<f64>,              // Database has DEFAULT 1.0, can be NULL
    pub designation: Option<Designation>, // Database has DEFAULT 'l1', can be NULL
    pub total_earnings: Option<BigDecimal>,
    pub completed_tasks: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn worker_status_or_default(&self) -> WorkerStatus {
        self.worker_status
            .unwrap_or(WorkerStatus::DocumentUploadPending)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct BankDetails {
    pub id: uuid::Uuid,
    pub worker_id: uuid::Uuid,
    pub account_holder_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BankDetails {
    /// Completeness rule used by the payment classifier: every field present
    /// and non-empty.
    pub fn is_complete(&self) -> bool {
        [
            &self.account_holder_name,
            &self.account_number,
            &self.bank_name,
            &self.ifsc_code,
        ]
        .iter()
        .all(|f| f.as_deref().map_or(false, |v| !v.trim().is_empty()))
    }
}
