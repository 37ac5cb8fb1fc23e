// db/paymentdb.rs
use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::paymentmodel::{PaymentRecord, PaymentStatus};

#[async_trait]
pub trait PaymentExt {
    async fn create_payment(
        &self,
        task_id: Uuid,
        worker_id: Uuid,
        employer_id: Uuid,
        amount: BigDecimal,
    ) -> Result<PaymentRecord, sqlx::Error>;

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<PaymentRecord>, sqlx::Error>;

    async fn get_worker_payments(&self, worker_id: Uuid)
        -> Result<Vec<PaymentRecord>, sqlx::Error>;

    /// Keyset page over payments stuck in `pending_details`, for the
    /// reconcile sweep.
    async fn get_pending_details_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error>;

    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<PaymentRecord, sqlx::Error>;

    async fn attach_transaction_proof(
        &self,
        payment_id: Uuid,
        proof_path: String,
    ) -> Result<PaymentRecord, sqlx::Error>;

    /// Guarded `pending_details -> processing` transition. Matches zero rows
    /// unless the payment is currently `pending_details`, so no other status
    /// can be short-circuited into `processing`.
    async fn promote_to_processing(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<PaymentRecord>, sqlx::Error>;

    /// Server-side predicate: all bank detail fields present and non-empty.
    async fn bank_details_complete(&self, worker_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Server-side predicate: a transaction proof file has been attached.
    async fn transaction_proof_exists(&self, payment_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn credit_worker_earnings(
        &self,
        worker_id: Uuid,
        amount: BigDecimal,
    ) -> Result<(), sqlx::Error>;
}

const PAYMENT_COLUMNS: &str = "id, task_id, worker_id, employer_id, amount, payment_status, \
     transaction_proof_path, created_at, completed_at";

#[async_trait]
impl PaymentExt for DBClient {
    async fn create_payment(
        &self,
        task_id: Uuid,
        worker_id: Uuid,
        employer_id: Uuid,
        amount: BigDecimal,
    ) -> Result<PaymentRecord, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "INSERT INTO payment_records (task_id, worker_id, employer_id, amount, payment_status) \
             VALUES ($1, $2, $3, $4, 'pending') RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(task_id)
        .bind(worker_id)
        .bind(employer_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_records WHERE id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_payments(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_records \
             WHERE worker_id = $1 ORDER BY created_at DESC"
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_pending_details_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_records \
             WHERE payment_status = 'pending_details' AND ($1::uuid IS NULL OR id > $1) \
             ORDER BY id ASC LIMIT $2"
        ))
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<PaymentRecord, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "UPDATE payment_records SET payment_status = $1, \
                    completed_at = CASE WHEN $1 = 'completed'::payment_status THEN NOW() ELSE completed_at END \
             WHERE id = $2 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(status)
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn attach_transaction_proof(
        &self,
        payment_id: Uuid,
        proof_path: String,
    ) -> Result<PaymentRecord, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "UPDATE payment_records SET transaction_proof_path = $1 \
             WHERE id = $2 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(proof_path)
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn promote_to_processing(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "UPDATE payment_records SET payment_status = 'processing' \
             WHERE id = $1 AND payment_status = 'pending_details' \
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn bank_details_complete(&self, worker_id: Uuid) -> Result<bool, sqlx::Error> {
        let (complete,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM bank_details \
                WHERE worker_id = $1 \
                  AND NULLIF(TRIM(account_holder_name), '') IS NOT NULL \
                  AND NULLIF(TRIM(account_number), '') IS NOT NULL \
                  AND NULLIF(TRIM(bank_name), '') IS NOT NULL \
                  AND NULLIF(TRIM(ifsc_code), '') IS NOT NULL \
             )",
        )
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(complete)
    }

    async fn transaction_proof_exists(&self, payment_id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM payment_records \
                WHERE id = $1 AND NULLIF(TRIM(transaction_proof_path), '') IS NOT NULL \
             )",
        )
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn credit_worker_earnings(
        &self,
        worker_id: Uuid,
        amount: BigDecimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET total_earnings = COALESCE(total_earnings, 0) + $1, updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(amount)
        .bind(worker_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
