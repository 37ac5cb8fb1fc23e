// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{BankDetails, Designation, User, UserRole, WorkerStatus};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    /// Keyset page over workers ordered by id, for admin sweep jobs.
    async fn get_workers_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        password: T,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    async fn update_worker_status(
        &self,
        worker_id: Uuid,
        status: WorkerStatus,
    ) -> Result<User, sqlx::Error>;

    async fn update_worker_rating(
        &self,
        worker_id: Uuid,
        rating: f64,
        designation: Designation,
    ) -> Result<User, sqlx::Error>;

    async fn increment_completed_tasks(&self, worker_id: Uuid) -> Result<User, sqlx::Error>;

    async fn get_bank_details(&self, worker_id: Uuid) -> Result<Option<BankDetails>, sqlx::Error>;

    async fn upsert_bank_details(
        &self,
        worker_id: Uuid,
        account_holder_name: String,
        account_number: String,
        bank_name: String,
        ifsc_code: String,
    ) -> Result<BankDetails, sqlx::Error>;
}

const USER_COLUMNS: &str = "id, name, username, email, password, role, worker_status, rating, \
     designation, total_earnings, completed_tasks, created_at, updated_at";

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
            ))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_workers_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'worker' AND ($1::uuid IS NULL OR id > $1) \
             ORDER BY id ASC LIMIT $2"
        ))
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        username: T,
        email: T,
        password: T,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, username, email, password, role, worker_status) \
             VALUES ($1, $2, $3, $4, $5, \
                     CASE WHEN $5 = 'worker'::user_role THEN 'document_upload_pending'::worker_status ELSE NULL END) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name.into())
        .bind(username.into())
        .bind(email.into())
        .bind(password.into())
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_worker_status(
        &self,
        worker_id: Uuid,
        status: WorkerStatus,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET worker_status = $1, updated_at = NOW() \
             WHERE id = $2 AND role = 'worker' RETURNING {USER_COLUMNS}"
        ))
        .bind(status)
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_worker_rating(
        &self,
        worker_id: Uuid,
        rating: f64,
        designation: Designation,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET rating = $1, designation = $2, updated_at = NOW() \
             WHERE id = $3 AND role = 'worker' RETURNING {USER_COLUMNS}"
        ))
        .bind(rating)
        .bind(designation)
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn increment_completed_tasks(&self, worker_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET completed_tasks = COALESCE(completed_tasks, 0) + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_bank_details(&self, worker_id: Uuid) -> Result<Option<BankDetails>, sqlx::Error> {
        sqlx::query_as::<_, BankDetails>(
            "SELECT id, worker_id, account_holder_name, account_number, bank_name, ifsc_code, \
                    created_at, updated_at \
             FROM bank_details WHERE worker_id = $1",
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_bank_details(
        &self,
        worker_id: Uuid,
        account_holder_name: String,
        account_number: String,
        bank_name: String,
        ifsc_code: String,
    ) -> Result<BankDetails, sqlx::Error> {
        sqlx::query_as::<_, BankDetails>(
            "INSERT INTO bank_details (worker_id, account_holder_name, account_number, bank_name, ifsc_code) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (worker_id) DO UPDATE SET \
                account_holder_name = EXCLUDED.account_holder_name, \
                account_number = EXCLUDED.account_number, \
                bank_name = EXCLUDED.bank_name, \
                ifsc_code = EXCLUDED.ifsc_code, \
                updated_at = NOW() \
             RETURNING id, worker_id, account_holder_name, account_number, bank_name, ifsc_code, \
                       created_at, updated_at",
        )
        .bind(worker_id)
        .bind(account_holder_name)
        .bind(account_number)
        .bind(bank_name)
        .bind(ifsc_code)
        .fetch_one(&self.pool)
        .await
    }
}
