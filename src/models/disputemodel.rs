use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    UnderReview,
    Resolved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "dispute_type", rename_all = "snake_case")]
pub enum DisputeType {
    Payment,
    TaskQuality,
    Behaviour,
    Other,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Dispute {
    pub id: Uuid,
    pub raised_by: Uuid,
    pub against: Uuid,
    pub task_id: Option<Uuid>,
    pub dispute_type: DisputeType,
    pub status: Option<DisputeStatus>, // Database has DEFAULT 'open', can be NULL
    pub description: String,
    pub attachment_paths: Option<Vec<String>>,
    pub resolution: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct AuditEvent {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub category: String,
    pub subject_id: Option<Uuid>,
    pub detail: Option<serde_json::Value>,
    pub note: String,
    pub created_at: Option<DateTime<Utc>>,
}
