use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    PendingDetails,
    Processing,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::PendingDetails => "pending_details",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    /// Terminal states admit no further transition. Failing a completed
    /// payment would strand the earnings already credited to the worker.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }

    /// Whether detail collection (bank details, transaction proof,
    /// reconcile) still applies to this payment.
    pub fn accepts_details(&self) -> bool {
        *self == PaymentStatus::PendingDetails
    }
}

/// Who has to act to unblock a `pending_details` payment. Derived from bank
/// details completeness and transaction proof existence, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponsibleParty {
    Worker,
    Employer,
    Both,
}

/// Classifier output: either a party still owes input, or the payment is no
/// longer blocked and must be promoted to `processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingClassification {
    Blocked(ResponsibleParty),
    Resolved,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub task_id: Uuid,
    pub worker_id: Uuid,
    pub employer_id: Uuid,
    pub amount: BigDecimal,
    pub payment_status: Option<PaymentStatus>, // Database has DEFAULT 'pending', can be NULL
    pub transaction_proof_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    pub fn status_or_pending(&self) -> PaymentStatus {
        self.payment_status.unwrap_or(PaymentStatus::Pending)
    }
}
