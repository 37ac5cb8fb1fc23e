// db/taskdb.rs
use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::taskmodel::*;

#[async_trait]
pub trait TaskExt {
    async fn create_task(
        &self,
        employer_id: Uuid,
        subcategory_id: Option<Uuid>,
        title: String,
        description: String,
        payment_amount: BigDecimal,
    ) -> Result<Task, sqlx::Error>;

    async fn get_task(&self, task_id: Uuid) -> Result<Option<Task>, sqlx::Error>;

    async fn get_employer_tasks(&self, employer_id: Uuid) -> Result<Vec<Task>, sqlx::Error>;

    async fn get_open_tasks(&self, limit: i64, offset: i64) -> Result<Vec<Task>, sqlx::Error>;

    async fn create_submission(
        &self,
        task_id: Uuid,
        worker_id: Uuid,
        employer_id: Uuid,
        proof_path: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error>;

    async fn get_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<TaskSubmission>, sqlx::Error>;

    /// The full submission set for a worker; rating aggregation always runs
    /// over this, never over a partial page.
    async fn get_worker_submissions(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<TaskSubmission>, sqlx::Error>;

    async fn update_submission_status(
        &self,
        submission_id: Uuid,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error>;

    /// Writes the employer rating inside the caller's transaction so the
    /// aggregate recompute commits atomically with it.
    async fn set_submission_rating_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        submission_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error>;

    async fn get_worker_submissions_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        worker_id: Uuid,
    ) -> Result<Vec<TaskSubmission>, sqlx::Error>;

    /// Keyset page over subcategories ordered by name.
    async fn get_subcategories_page(
        &self,
        cursor: Option<String>,
        limit: i64,
    ) -> Result<Vec<Subcategory>, sqlx::Error>;
}

const TASK_COLUMNS: &str = "id, employer_id, subcategory_id, title, description, payment_amount, \
     status, created_at, updated_at";

const SUBMISSION_COLUMNS: &str = "id, task_id, worker_id, employer_id, status, \
     employer_rating_given, feedback, proof_path, submitted_at, reviewed_at";

#[async_trait]
impl TaskExt for DBClient {
    async fn create_task(
        &self,
        employer_id: Uuid,
        subcategory_id: Option<Uuid>,
        title: String,
        description: String,
        payment_amount: BigDecimal,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (employer_id, subcategory_id, title, description, payment_amount, status) \
             VALUES ($1, $2, $3, $4, $5, 'open') RETURNING {TASK_COLUMNS}"
        ))
        .bind(employer_id)
        .bind(subcategory_id)
        .bind(title)
        .bind(description)
        .bind(payment_amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_task(&self, task_id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_employer_tasks(&self, employer_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE employer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_open_tasks(&self, limit: i64, offset: i64) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'open' \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_submission(
        &self,
        task_id: Uuid,
        worker_id: Uuid,
        employer_id: Uuid,
        proof_path: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "INSERT INTO task_submissions (task_id, worker_id, employer_id, status, proof_path) \
             VALUES ($1, $2, $3, 'pending', $4) RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(task_id)
        .bind(worker_id)
        .bind(employer_id)
        .bind(proof_path)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<TaskSubmission>, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM task_submissions WHERE id = $1"
        ))
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_submissions(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<TaskSubmission>, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM task_submissions \
             WHERE worker_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_submission_status(
        &self,
        submission_id: Uuid,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "UPDATE task_submissions SET status = $1, feedback = COALESCE($2, feedback), \
                    reviewed_at = NOW() \
             WHERE id = $3 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(status)
        .bind(feedback)
        .bind(submission_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_submission_rating_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        submission_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<TaskSubmission, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "UPDATE task_submissions SET employer_rating_given = $1, feedback = COALESCE($2, feedback), \
                    reviewed_at = NOW() \
             WHERE id = $3 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(rating)
        .bind(feedback)
        .bind(submission_id)
        .fetch_one(&mut **tx)
        .await
    }

    async fn get_worker_submissions_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        worker_id: Uuid,
    ) -> Result<Vec<TaskSubmission>, sqlx::Error> {
        sqlx::query_as::<_, TaskSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM task_submissions \
             WHERE worker_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(worker_id)
        .fetch_all(&mut **tx)
        .await
    }

    async fn get_subcategories_page(
        &self,
        cursor: Option<String>,
        limit: i64,
    ) -> Result<Vec<Subcategory>, sqlx::Error> {
        sqlx::query_as::<_, Subcategory>(
            "SELECT id, name, category, description, created_at FROM subcategories \
             WHERE ($1::text IS NULL OR name > $1) \
             ORDER BY name ASC LIMIT $2",
        )
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
