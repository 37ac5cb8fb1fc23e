// service/dispute_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, disputedb::DisputeExt, userdb::UserExt},
    models::disputemodel::{Dispute, DisputeStatus, DisputeType},
    service::{audit_service::AuditService, error::ServiceError},
};

#[derive(Debug, Clone)]
pub struct DisputeService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl DisputeService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self {
            db_client,
            audit_service,
        }
    }

    pub async fn raise_dispute(
        &self,
        raised_by: Uuid,
        against: Uuid,
        task_id: Option<Uuid>,
        dispute_type: DisputeType,
        description: String,
        attachment_paths: Vec<String>,
    ) -> Result<Dispute, ServiceError> {
        if raised_by == against {
            return Err(ServiceError::Validation(
                "Cannot raise a dispute against yourself".to_string(),
            ));
        }

        let other_party = self.db_client.get_user(Some(against), None, None).await?;
        if other_party.is_none() {
            return Err(ServiceError::Validation(format!(
                "User {} does not exist",
                against
            )));
        }

        // Free text comes straight from the client.
        let description = ammonia::clean(&description);

        let dispute = self
            .db_client
            .create_dispute(
                raised_by,
                against,
                task_id,
                dispute_type,
                description,
                attachment_paths,
            )
            .await?;

        self.audit_service
            .log_dispute_action(raised_by, dispute.id, "raised")
            .await?;

        Ok(dispute)
    }

    pub async fn begin_review(
        &self,
        admin_id: Uuid,
        dispute_id: Uuid,
    ) -> Result<Dispute, ServiceError> {
        let dispute = self
            .db_client
            .get_dispute(dispute_id)
            .await?
            .ok_or(ServiceError::DisputeNotFound(dispute_id))?;

        if dispute.status != Some(DisputeStatus::Open) {
            return Err(ServiceError::Validation(format!(
                "Dispute {} is not open",
                dispute_id
            )));
        }

        let dispute = self
            .db_client
            .update_dispute_status(dispute_id, DisputeStatus::UnderReview, None)
            .await?;

        self.audit_service
            .log_dispute_action(admin_id, dispute_id, "moved under review")
            .await?;

        Ok(dispute)
    }

    pub async fn close_dispute(
        &self,
        admin_id: Uuid,
        dispute_id: Uuid,
        outcome: DisputeStatus,
        resolution: String,
    ) -> Result<Dispute, ServiceError> {
        if !matches!(outcome, DisputeStatus::Resolved | DisputeStatus::Rejected) {
            return Err(ServiceError::Validation(
                "Closing outcome must be resolved or rejected".to_string(),
            ));
        }

        let dispute = self
            .db_client
            .get_dispute(dispute_id)
            .await?
            .ok_or(ServiceError::DisputeNotFound(dispute_id))?;

        if !matches!(
            dispute.status,
            Some(DisputeStatus::Open) | Some(DisputeStatus::UnderReview)
        ) {
            return Err(ServiceError::Validation(format!(
                "Dispute {} is already closed",
                dispute_id
            )));
        }

        let resolution = ammonia::clean(&resolution);
        let dispute = self
            .db_client
            .update_dispute_status(dispute_id, outcome, Some(resolution))
            .await?;

        self.audit_service
            .log_dispute_action(admin_id, dispute_id, "closed")
            .await?;

        Ok(dispute)
    }

    pub async fn disputes_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, ServiceError> {
        Ok(self.db_client.get_user_disputes(user_id).await?)
    }

    pub async fn open_queue(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>, ServiceError> {
        Ok(self
            .db_client
            .get_disputes_by_status(DisputeStatus::Open, limit, offset)
            .await?)
    }
}
