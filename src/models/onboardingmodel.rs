use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of documents every worker must upload before verification
/// can complete.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
pub enum DocumentType {
    IdentityProof,
    AddressProof,
    BankStatement,
    EducationalCertificate,
    ExperienceLetter,
}

impl DocumentType {
    pub const REQUIRED: [DocumentType; 5] = [
        DocumentType::IdentityProof,
        DocumentType::AddressProof,
        DocumentType::BankStatement,
        DocumentType::EducationalCertificate,
        DocumentType::ExperienceLetter,
    ];

    pub fn to_str(&self) -> &str {
        match self {
            DocumentType::IdentityProof => "identity_proof",
            DocumentType::AddressProof => "address_proof",
            DocumentType::BankStatement => "bank_statement",
            DocumentType::EducationalCertificate => "educational_certificate",
            DocumentType::ExperienceLetter => "experience_letter",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WorkerDocument {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub doc_type: DocumentType,
    pub file_path: String,
    pub verification_status: Option<DocumentStatus>, // Database has DEFAULT 'pending', can be NULL
    pub reviewer_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregate counts over a worker's documents, the sole document input to
/// status derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub required: usize,
    pub uploaded: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl DocumentStats {
    pub fn all_uploaded(&self) -> bool {
        self.uploaded >= self.required
    }

    pub fn all_approved(&self) -> bool {
        self.all_uploaded() && self.approved >= self.required
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "interview_status", rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "interview_result", rename_all = "snake_case")]
pub enum InterviewResult {
    Selected,
    Rejected,
    Pending,
}

/// At most one active interview exists per worker; it is created once every
/// required document is approved and closed when a result is recorded.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Interview {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub status: Option<InterviewStatus>,
    pub result: Option<InterviewResult>, // Database has DEFAULT 'pending', can be NULL
    pub scheduled_at: Option<DateTime<Utc>>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Interview {
    pub fn result_or_pending(&self) -> InterviewResult {
        self.result.unwrap_or(InterviewResult::Pending)
    }

    /// A session is booked once a time slot has been set; a freshly created
    /// interview row has no slot yet.
    pub fn is_booked(&self) -> bool {
        self.scheduled_at.is_some()
            && matches!(
                self.status,
                Some(InterviewStatus::Scheduled) | Some(InterviewStatus::Rescheduled)
            )
    }
}
