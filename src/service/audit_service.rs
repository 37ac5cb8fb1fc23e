// service/audit_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, disputedb::DisputeExt},
    models::{
        disputemodel::AuditEvent, paymentmodel::PaymentStatus, usermodel::WorkerStatus,
    },
    service::{error::ServiceError, rating_service::RatingSummary},
};

/// Persists the audit trail every correcting write must leave behind.
/// Inconsistencies are overwritten, never silently.
#[derive(Debug, Clone)]
pub struct AuditService {
    db_client: Arc<DBClient>,
}

impl AuditService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn log_status_change(
        &self,
        actor_id: Uuid,
        worker_id: Uuid,
        from: WorkerStatus,
        to: WorkerStatus,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_audit_event(
                actor_id,
                "worker_status_change",
                Some(worker_id),
                Some(serde_json::json!({
                    "from": from.to_str(),
                    "to": to.to_str(),
                })),
                format!("Worker status {} -> {}", from.to_str(), to.to_str()),
            )
            .await?;
        Ok(())
    }

    pub async fn log_rating_update(
        &self,
        employer_id: Uuid,
        worker_id: Uuid,
        submission_id: Uuid,
        rating: i32,
        summary: &RatingSummary,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_audit_event(
                employer_id,
                "rating_update",
                Some(worker_id),
                Some(serde_json::json!({
                    "submission_id": submission_id,
                    "rating": rating,
                    "new_average": summary.average_rating,
                    "designation": summary.designation.to_str(),
                })),
                "Employer rating recorded, aggregate recomputed".to_string(),
            )
            .await?;
        Ok(())
    }

    pub async fn log_payment_transition(
        &self,
        actor_id: Uuid,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_audit_event(
                actor_id,
                "payment_transition",
                Some(payment_id),
                Some(serde_json::json!({
                    "from": from.to_str(),
                    "to": to.to_str(),
                })),
                format!("Payment {} -> {}", from.to_str(), to.to_str()),
            )
            .await?;
        Ok(())
    }

    pub async fn log_dispute_action(
        &self,
        actor_id: Uuid,
        dispute_id: Uuid,
        action: &str,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_audit_event(
                actor_id,
                "dispute_action",
                Some(dispute_id),
                None,
                format!("Dispute {}", action),
            )
            .await?;
        Ok(())
    }

    pub async fn events_for(
        &self,
        subject_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEvent>, ServiceError> {
        Ok(self
            .db_client
            .get_audit_events_for_subject(subject_id, limit)
            .await?)
    }
}
