// db/onboardingdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::onboardingmodel::*;

#[async_trait]
pub trait OnboardingExt {
    /// Records an upload for one document slot. A re-upload replaces the file
    /// and resets the verdict to pending.
    async fn upsert_document(
        &self,
        worker_id: Uuid,
        doc_type: DocumentType,
        file_path: String,
    ) -> Result<WorkerDocument, sqlx::Error>;

    async fn get_document(&self, document_id: Uuid) -> Result<Option<WorkerDocument>, sqlx::Error>;

    async fn get_worker_documents(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<WorkerDocument>, sqlx::Error>;

    /// Keyset page over a worker's documents ordered by (created_at, id).
    async fn get_documents_page(
        &self,
        worker_id: Uuid,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<WorkerDocument>, sqlx::Error>;

    async fn update_document_status(
        &self,
        document_id: Uuid,
        status: DocumentStatus,
        reviewer_note: Option<String>,
    ) -> Result<WorkerDocument, sqlx::Error>;

    async fn get_document_stats(&self, worker_id: Uuid) -> Result<DocumentStats, sqlx::Error>;

    /// The single open interview for a worker, if any.
    async fn get_active_interview(&self, worker_id: Uuid)
        -> Result<Option<Interview>, sqlx::Error>;

    async fn create_interview(&self, worker_id: Uuid) -> Result<Interview, sqlx::Error>;

    async fn schedule_interview(
        &self,
        interview_id: Uuid,
        scheduled_at: DateTime<Utc>,
        meeting_link: Option<String>,
    ) -> Result<Interview, sqlx::Error>;

    async fn record_interview_result(
        &self,
        interview_id: Uuid,
        result: InterviewResult,
        notes: Option<String>,
    ) -> Result<Interview, sqlx::Error>;
}

const DOCUMENT_COLUMNS: &str =
    "id, worker_id, doc_type, file_path, verification_status, reviewer_note, created_at, updated_at";

const INTERVIEW_COLUMNS: &str =
    "id, worker_id, status, result, scheduled_at, meeting_link, notes, created_at, updated_at";

#[async_trait]
impl OnboardingExt for DBClient {
    async fn upsert_document(
        &self,
        worker_id: Uuid,
        doc_type: DocumentType,
        file_path: String,
    ) -> Result<WorkerDocument, sqlx::Error> {
        sqlx::query_as::<_, WorkerDocument>(&format!(
            "INSERT INTO worker_documents (worker_id, doc_type, file_path, verification_status) \
             VALUES ($1, $2, $3, 'pending') \
             ON CONFLICT (worker_id, doc_type) DO UPDATE SET \
                file_path = EXCLUDED.file_path, \
                verification_status = 'pending', \
                reviewer_note = NULL, \
                updated_at = NOW() \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(worker_id)
        .bind(doc_type)
        .bind(file_path)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_document(&self, document_id: Uuid) -> Result<Option<WorkerDocument>, sqlx::Error> {
        sqlx::query_as::<_, WorkerDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM worker_documents WHERE id = $1"
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_documents(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<WorkerDocument>, sqlx::Error> {
        sqlx::query_as::<_, WorkerDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM worker_documents WHERE worker_id = $1 ORDER BY created_at ASC"
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_documents_page(
        &self,
        worker_id: Uuid,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<WorkerDocument>, sqlx::Error> {
        let (cursor_at, cursor_id) = match cursor {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };

        sqlx::query_as::<_, WorkerDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM worker_documents \
             WHERE worker_id = $1 \
               AND ($2::timestamptz IS NULL OR (created_at, id) > ($2, $3)) \
             ORDER BY created_at ASC, id ASC LIMIT $4"
        ))
        .bind(worker_id)
        .bind(cursor_at)
        .bind(cursor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_document_status(
        &self,
        document_id: Uuid,
        status: DocumentStatus,
        reviewer_note: Option<String>,
    ) -> Result<WorkerDocument, sqlx::Error> {
        sqlx::query_as::<_, WorkerDocument>(&format!(
            "UPDATE worker_documents SET verification_status = $1, reviewer_note = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(status)
        .bind(reviewer_note)
        .bind(document_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_document_stats(&self, worker_id: Uuid) -> Result<DocumentStats, sqlx::Error> {
        let (uploaded, approved, rejected): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE verification_status = 'approved'), \
                    COUNT(*) FILTER (WHERE verification_status = 'rejected') \
             FROM worker_documents WHERE worker_id = $1",
        )
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DocumentStats {
            required: DocumentType::REQUIRED.len(),
            uploaded: uploaded as usize,
            approved: approved as usize,
            rejected: rejected as usize,
        })
    }

    async fn get_active_interview(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<Interview>, sqlx::Error> {
        sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE worker_id = $1 AND status NOT IN ('cancelled') \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_interview(&self, worker_id: Uuid) -> Result<Interview, sqlx::Error> {
        sqlx::query_as::<_, Interview>(&format!(
            "INSERT INTO interviews (worker_id, status, result) \
             VALUES ($1, 'scheduled', 'pending') \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn schedule_interview(
        &self,
        interview_id: Uuid,
        scheduled_at: DateTime<Utc>,
        meeting_link: Option<String>,
    ) -> Result<Interview, sqlx::Error> {
        sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET \
                status = CASE WHEN scheduled_at IS NULL THEN 'scheduled'::interview_status \
                              ELSE 'rescheduled'::interview_status END, \
                scheduled_at = $1, meeting_link = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(scheduled_at)
        .bind(meeting_link)
        .bind(interview_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn record_interview_result(
        &self,
        interview_id: Uuid,
        result: InterviewResult,
        notes: Option<String>,
    ) -> Result<Interview, sqlx::Error> {
        sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET status = 'completed', result = $1, notes = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(result)
        .bind(notes)
        .bind(interview_id)
        .fetch_one(&self.pool)
        .await
    }
}
