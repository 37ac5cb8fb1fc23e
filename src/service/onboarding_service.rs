// service/onboarding_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, onboardingdb::OnboardingExt, userdb::UserExt},
    models::{
        onboardingmodel::*,
        usermodel::{User, UserRole, WorkerStatus},
    },
    service::{
        audit_service::AuditService,
        error::ServiceError,
        pager::CursorPager,
        status_rules::{self, StatusDescriptor},
    },
};

#[derive(Debug, Serialize)]
pub struct RecomputeOutcome {
    pub worker_id: Uuid,
    pub status: WorkerStatus,
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct OnboardingOverview {
    pub descriptor: &'static StatusDescriptor,
    pub documents: Vec<WorkerDocument>,
    pub stats: DocumentStats,
    pub interview: Option<Interview>,
}

#[derive(Debug, Clone)]
pub struct OnboardingService {
    db_client: Arc<DBClient>,
    audit_service: Arc<AuditService>,
}

impl OnboardingService {
    pub fn new(db_client: Arc<DBClient>, audit_service: Arc<AuditService>) -> Self {
        Self {
            db_client,
            audit_service,
        }
    }

    async fn require_worker(&self, worker_id: Uuid) -> Result<User, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(worker_id), None, None)
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_id))?;
        if user.role != UserRole::Worker {
            return Err(ServiceError::Validation(format!(
                "User {} is not a worker",
                worker_id
            )));
        }
        Ok(user)
    }

    /// Re-derives the worker's status from document counts and the active
    /// interview, writing only when the derived value differs from the
    /// stored one. Calling it twice with no underlying change performs zero
    /// writes the second time.
    pub async fn recompute_status(
        &self,
        actor_id: Uuid,
        worker_id: Uuid,
    ) -> Result<RecomputeOutcome, ServiceError> {
        let worker = self.require_worker(worker_id).await?;
        let stats = self.db_client.get_document_stats(worker_id).await?;
        let interview = self.db_client.get_active_interview(worker_id).await?;

        let derived = status_rules::derive_status(&stats, interview.as_ref());
        let stored = worker.worker_status_or_default();

        if !status_rules::recompute_writes(stored, derived) {
            return Ok(RecomputeOutcome {
                worker_id,
                status: stored,
                changed: false,
            });
        }

        // Stored status no longer matches derived state: correct by
        // overwrite and leave an audit entry.
        self.db_client
            .update_worker_status(worker_id, derived)
            .await?;
        self.audit_service
            .log_status_change(actor_id, worker_id, stored, derived)
            .await?;

        tracing::info!(
            worker_id = %worker_id,
            from = stored.to_str(),
            to = derived.to_str(),
            "worker status recomputed"
        );

        Ok(RecomputeOutcome {
            worker_id,
            status: derived,
            changed: true,
        })
    }

    /// Everything a worker's status screen needs, via the shared descriptor
    /// lookup rather than per-screen branching.
    pub async fn overview(&self, worker_id: Uuid) -> Result<OnboardingOverview, ServiceError> {
        let worker = self.require_worker(worker_id).await?;
        let documents = self.db_client.get_worker_documents(worker_id).await?;
        let stats = self.db_client.get_document_stats(worker_id).await?;
        let interview = self.db_client.get_active_interview(worker_id).await?;

        Ok(OnboardingOverview {
            descriptor: status_rules::descriptor_or_default(worker.worker_status),
            documents,
            stats,
            interview,
        })
    }

    /// Worker uploads (or re-uploads) one document slot, then the status is
    /// recomputed.
    pub async fn submit_document(
        &self,
        worker_id: Uuid,
        doc_type: DocumentType,
        file_path: String,
    ) -> Result<WorkerDocument, ServiceError> {
        self.require_worker(worker_id).await?;
        let document = self
            .db_client
            .upsert_document(worker_id, doc_type, file_path)
            .await?;
        self.recompute_status(worker_id, worker_id).await?;
        Ok(document)
    }

    /// Admin verdict on one document. Approval of the final document creates
    /// the interview row; every verdict triggers a recompute.
    pub async fn review_document(
        &self,
        admin_id: Uuid,
        document_id: Uuid,
        status: DocumentStatus,
        reviewer_note: Option<String>,
    ) -> Result<WorkerDocument, ServiceError> {
        if status == DocumentStatus::Pending {
            return Err(ServiceError::Validation(
                "Review verdict must be approved or rejected".to_string(),
            ));
        }

        let document = self
            .db_client
            .get_document(document_id)
            .await?
            .ok_or(ServiceError::Validation(format!(
                "Document {} not found",
                document_id
            )))?;

        let document = self
            .db_client
            .update_document_status(document_id, status, reviewer_note)
            .await?;

        let stats = self.db_client.get_document_stats(document.worker_id).await?;
        if stats.all_approved() {
            let existing = self
                .db_client
                .get_active_interview(document.worker_id)
                .await?;
            if existing.is_none() {
                self.db_client.create_interview(document.worker_id).await?;
            }
        }

        self.recompute_status(admin_id, document.worker_id).await?;
        Ok(document)
    }

    pub async fn schedule_interview(
        &self,
        admin_id: Uuid,
        worker_id: Uuid,
        scheduled_at: DateTime<Utc>,
        meeting_link: Option<String>,
    ) -> Result<Interview, ServiceError> {
        let interview = self
            .db_client
            .get_active_interview(worker_id)
            .await?
            .ok_or(ServiceError::InterviewNotFound(worker_id))?;

        let interview = self
            .db_client
            .schedule_interview(interview.id, scheduled_at, meeting_link)
            .await?;

        self.recompute_status(admin_id, worker_id).await?;
        Ok(interview)
    }

    /// Records the interview outcome and closes the funnel for this worker:
    /// selected activates, rejected rejects.
    pub async fn record_interview_result(
        &self,
        admin_id: Uuid,
        worker_id: Uuid,
        result: InterviewResult,
        notes: Option<String>,
    ) -> Result<Interview, ServiceError> {
        if result == InterviewResult::Pending {
            return Err(ServiceError::Validation(
                "Interview result must be selected or rejected".to_string(),
            ));
        }

        let interview = self
            .db_client
            .get_active_interview(worker_id)
            .await?
            .ok_or(ServiceError::InterviewNotFound(worker_id))?;

        let interview = self
            .db_client
            .record_interview_result(interview.id, result, notes)
            .await?;

        self.recompute_status(admin_id, worker_id).await?;
        Ok(interview)
    }

    /// Admin sweep: walk every worker in keyset pages and recompute each
    /// status, returning how many rows actually changed.
    pub async fn recompute_all(&self, actor_id: Uuid) -> Result<usize, ServiceError> {
        let pager: CursorPager<User, Uuid> = CursorPager::new(100);
        let mut changed = 0usize;

        loop {
            let mut batch: Vec<User> = Vec::new();
            let db = self.db_client.clone();
            pager
                .load_more(
                    |user| user.id,
                    |cursor, limit| async move { db.get_workers_page(cursor, limit).await },
                    &mut batch,
                )
                .await?;

            if batch.is_empty() {
                break;
            }
            let short_page = (batch.len() as i64) < pager.page_size();

            for worker in batch {
                if self.recompute_status(actor_id, worker.id).await?.changed {
                    changed += 1;
                }
            }

            if short_page {
                break;
            }
        }

        Ok(changed)
    }
}
