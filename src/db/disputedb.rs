// db/disputedb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::disputemodel::{AuditEvent, Dispute, DisputeStatus, DisputeType};

#[async_trait]
pub trait DisputeExt {
    async fn create_dispute(
        &self,
        raised_by: Uuid,
        against: Uuid,
        task_id: Option<Uuid>,
        dispute_type: DisputeType,
        description: String,
        attachment_paths: Vec<String>,
    ) -> Result<Dispute, sqlx::Error>;

    async fn get_dispute(&self, dispute_id: Uuid) -> Result<Option<Dispute>, sqlx::Error>;

    async fn get_user_disputes(&self, user_id: Uuid) -> Result<Vec<Dispute>, sqlx::Error>;

    async fn get_disputes_by_status(
        &self,
        status: DisputeStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>, sqlx::Error>;

    async fn update_dispute_status(
        &self,
        dispute_id: Uuid,
        status: DisputeStatus,
        resolution: Option<String>,
    ) -> Result<Dispute, sqlx::Error>;

    async fn insert_audit_event(
        &self,
        actor_id: Uuid,
        category: &str,
        subject_id: Option<Uuid>,
        detail: Option<serde_json::Value>,
        note: String,
    ) -> Result<AuditEvent, sqlx::Error>;

    async fn get_audit_events_for_subject(
        &self,
        subject_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEvent>, sqlx::Error>;
}

const DISPUTE_COLUMNS: &str = "id, raised_by, against, task_id, dispute_type, status, \
     description, attachment_paths, resolution, created_at, resolved_at";

const AUDIT_COLUMNS: &str = "id, actor_id, category, subject_id, detail, note, created_at";

#[async_trait]
impl DisputeExt for DBClient {
    async fn create_dispute(
        &self,
        raised_by: Uuid,
        against: Uuid,
        task_id: Option<Uuid>,
        dispute_type: DisputeType,
        description: String,
        attachment_paths: Vec<String>,
    ) -> Result<Dispute, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "INSERT INTO disputes (raised_by, against, task_id, dispute_type, status, description, attachment_paths) \
             VALUES ($1, $2, $3, $4, 'open', $5, $6) RETURNING {DISPUTE_COLUMNS}"
        ))
        .bind(raised_by)
        .bind(against)
        .bind(task_id)
        .bind(dispute_type)
        .bind(description)
        .bind(attachment_paths)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_dispute(&self, dispute_id: Uuid) -> Result<Option<Dispute>, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes WHERE id = $1"
        ))
        .bind(dispute_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_disputes(&self, user_id: Uuid) -> Result<Vec<Dispute>, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes \
             WHERE raised_by = $1 OR against = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_disputes_by_status(
        &self,
        status: DisputeStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes WHERE status = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3"
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_dispute_status(
        &self,
        dispute_id: Uuid,
        status: DisputeStatus,
        resolution: Option<String>,
    ) -> Result<Dispute, sqlx::Error> {
        sqlx::query_as::<_, Dispute>(&format!(
            "UPDATE disputes SET status = $1, resolution = COALESCE($2, resolution), \
                    resolved_at = CASE WHEN $1 IN ('resolved'::dispute_status, 'rejected'::dispute_status) \
                                       THEN NOW() ELSE resolved_at END \
             WHERE id = $3 RETURNING {DISPUTE_COLUMNS}"
        ))
        .bind(status)
        .bind(resolution)
        .bind(dispute_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_audit_event(
        &self,
        actor_id: Uuid,
        category: &str,
        subject_id: Option<Uuid>,
        detail: Option<serde_json::Value>,
        note: String,
    ) -> Result<AuditEvent, sqlx::Error> {
        sqlx::query_as::<_, AuditEvent>(&format!(
            "INSERT INTO audit_events (actor_id, category, subject_id, detail, note) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {AUDIT_COLUMNS}"
        ))
        .bind(actor_id)
        .bind(category)
        .bind(subject_id)
        .bind(detail)
        .bind(note)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_audit_events_for_subject(
        &self,
        subject_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEvent>, sqlx::Error> {
        sqlx::query_as::<_, AuditEvent>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_events WHERE subject_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(subject_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
